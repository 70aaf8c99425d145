//! Core containment model
//!
//! Geometry, node and diagram handles, the one-sided relationship
//! primitives, and read-only views (consistency check, snapshots).

mod diagram;
mod element;
mod error;
mod geometry;
mod kind;
pub mod logging;
mod node;
mod parent;
mod snapshot;
mod validate;

pub use diagram::*;
pub use element::*;
pub use error::*;
pub use geometry::*;
pub use kind::*;
pub use logging::*;
pub use node::*;
pub use parent::*;
pub use snapshot::*;
pub use validate::*;
