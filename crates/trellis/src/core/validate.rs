//! Structural consistency check
//!
//! Walks everything a diagram owns and reports each place where the owning
//! side of a relationship disagrees with the back-reference.

use std::collections::HashSet;

use thiserror::Error;
use tracing::debug;

use super::diagram::Diagram;
use super::element::{DiagramElement, ElementId};
use super::error::Result;
use super::node::Node;

/// One breach of the containment or attachment invariants
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// The node points at a parent that does not list it as a child
    #[error("node {node} points at parent {parent}, which does not list it")]
    DanglingParent { node: ElementId, parent: ElementId },

    /// The parent lists a child whose back-reference points elsewhere or nowhere
    #[error("parent {parent} lists child {child}, which does not point back")]
    OrphanedChild { parent: ElementId, child: ElementId },

    /// A node owned by the diagram reports a different attachment
    #[error("node {node} is owned by the diagram but attached to {attached:?}")]
    DetachedMember {
        node: ElementId,
        attached: Option<ElementId>,
    },

    /// A node that only makes sense nested sits in the root list
    #[error("node {node} requires a parent but is a root")]
    MissingParent { node: ElementId },

    /// The same node is owned twice
    #[error("node {node} is reachable more than once")]
    DuplicateMembership { node: ElementId },
}

/// Every violation found in `diagram`, in traversal order
pub fn validate(diagram: &Diagram) -> Vec<Violation> {
    let mut walker = Walker {
        diagram,
        seen: HashSet::new(),
        violations: Vec::new(),
    };
    for root in diagram.roots() {
        if root.requires_parent() {
            walker
                .violations
                .push(Violation::MissingParent { node: root.id() });
        }
        walker.visit(&root);
    }
    debug!(
        diagram = %diagram.id(),
        nodes = walker.seen.len(),
        violations = walker.violations.len(),
        "Validated diagram"
    );
    walker.violations
}

struct Walker<'a> {
    diagram: &'a Diagram,
    seen: HashSet<ElementId>,
    violations: Vec<Violation>,
}

impl Walker<'_> {
    fn visit(&mut self, node: &Node) {
        if !self.seen.insert(node.id()) {
            self.violations
                .push(Violation::DuplicateMembership { node: node.id() });
            return;
        }

        let attached = node.diagram();
        if attached.as_ref() != Some(self.diagram) {
            self.violations.push(Violation::DetachedMember {
                node: node.id(),
                attached: attached.map(|d| d.id()),
            });
        }

        if let Some(parent) = node.parent_opt() {
            if !parent.contains_child(node) {
                self.violations.push(Violation::DanglingParent {
                    node: node.id(),
                    parent: parent.id(),
                });
            }
        }

        if let Some(container) = node.as_parent() {
            for child in container.children() {
                if child.parent_opt().as_ref() != Some(&container) {
                    self.violations.push(Violation::OrphanedChild {
                        parent: container.id(),
                        child: child.id(),
                    });
                }
                self.visit(&child);
            }
        }
    }
}

impl Diagram {
    /// `Ok` if the diagram satisfies every invariant, else the first violation
    pub fn check(&self) -> Result<()> {
        match validate(self).into_iter().next() {
            Some(violation) => Err(violation.into()),
            None => Ok(()),
        }
    }
}
