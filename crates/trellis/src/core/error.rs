//! Core error types for the containment model
//!
//! Every variant except [`ModelError::Rejected`] and
//! [`ModelError::Inconsistent`] is a contract violation: a caller invoked an
//! operation outside its documented precondition.

use thiserror::Error;

use super::element::ElementId;
use super::kind::NodeKind;
use super::validate::Violation;

/// Result alias used throughout the model
pub type Result<T, E = ModelError> = std::result::Result<T, E>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Node {node} has no parent")]
    NoParent { node: ElementId },

    #[error("Node {node} is already attached to diagram {diagram}")]
    AlreadyAttached { node: ElementId, diagram: ElementId },

    #[error("Node {node} is already linked to parent {parent}")]
    AlreadyLinked { node: ElementId, parent: ElementId },

    #[error("Node {node} of kind {kind} cannot hold children")]
    NotAContainer { node: ElementId, kind: NodeKind },

    #[error("Node {child} is already a child of {parent}")]
    DuplicateChild { parent: ElementId, child: ElementId },

    #[error("Node {child} is not a child of {parent}")]
    NotAChild { parent: ElementId, child: ElementId },

    #[error("Node {node} is already a root of diagram {diagram}")]
    DuplicateRoot { diagram: ElementId, node: ElementId },

    #[error("Node {node} is not a root of diagram {diagram}")]
    NotARoot { diagram: ElementId, node: ElementId },

    #[error("Nesting {child} inside {parent} would create a containment cycle")]
    ContainmentCycle { parent: ElementId, child: ElementId },

    #[error("Node {node} of kind {kind} requires a parent")]
    ParentRequired { node: ElementId, kind: NodeKind },

    #[error("Node {node} belongs to a different diagram")]
    ForeignDiagram { node: ElementId },

    #[error("Node {node} is not part of the diagram")]
    NotInDiagram { node: ElementId },

    #[error("Index {index} is out of bounds for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Diagram policy rejects nesting {child} inside {parent}")]
    Rejected { parent: ElementId, child: ElementId },

    #[error("Inconsistent model: {0}")]
    Inconsistent(#[from] Violation),
}

impl ModelError {
    /// Returns true for precondition failures (programmer errors), false for
    /// policy refusals and detected inconsistencies
    pub fn is_contract_violation(&self) -> bool {
        !matches!(self, ModelError::Rejected { .. } | ModelError::Inconsistent(_))
    }

    pub fn no_parent(node: ElementId) -> Self {
        Self::NoParent { node }
    }

    pub fn containment_cycle(parent: ElementId, child: ElementId) -> Self {
        Self::ContainmentCycle { parent, child }
    }

    pub fn index_out_of_bounds(index: usize, len: usize) -> Self {
        Self::IndexOutOfBounds { index, len }
    }
}
