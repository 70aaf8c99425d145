//! Identity shared by every diagram element

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a diagram element
///
/// Ids are allocated monotonically and never reused, so a clone always gets
/// an id distinct from its original.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(u64);

impl ElementId {
    /// Allocate a fresh id
    pub fn next() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Capabilities common to everything that lives in a diagram graph
pub trait DiagramElement {
    /// Identity of this element; stable for the element's whole life
    fn id(&self) -> ElementId;

    /// Structural copy with fresh identity and no relationships to the
    /// surrounding graph
    fn duplicate(&self) -> Self
    where
        Self: Sized;
}
