//! Trellis - node ownership and containment model for diagram editors
//!
//! A diagram owns an ordered list of root nodes; container nodes own an
//! ordered list of children. Nodes keep non-owning back-references to their
//! diagram and parent. The model types expose one-sided primitives, and
//! [`builder::DiagramBuilder`] composes them into edits that keep both sides
//! consistent.
//!
//! # Quick Start
//!
//! ```rust
//! use trellis::prelude::*;
//!
//! let builder = DiagramBuilder::new(Diagram::new(DiagramType::Class));
//!
//! let package = ParentNode::new(NodeKind::Package, Point::new(0, 0)).unwrap();
//! let class = Node::new(NodeKind::Class, Point::new(10, 10));
//! builder.add_node(&package).unwrap();
//! builder.add_child(&package, &class).unwrap();
//!
//! // The whole subtree moves together
//! package.translate(5, 5);
//! assert_eq!(class.position(), Point::new(15, 15));
//!
//! // Copies are detached and unlinked
//! let copy = package.duplicate();
//! assert!(copy.diagram().is_none());
//! assert!(!copy.has_parent());
//! ```
//!
//! # Low-level primitives
//!
//! The primitives deliberately leave the other side of a relationship alone,
//! so an editing layer can record each step:
//!
//! ```rust
//! use trellis::prelude::*;
//!
//! let parent = ParentNode::new(NodeKind::Object, Point::new(0, 0)).unwrap();
//! let field = Node::new(NodeKind::Field, Point::new(0, 20));
//!
//! field.set_parent(&parent).unwrap();
//! parent.add_child(&field).unwrap();
//!
//! field.unlink().unwrap();
//! assert!(!field.has_parent());
//! assert!(parent.contains_child(&field));
//! ```

pub mod builder;
pub mod core;

pub use crate::core::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::builder::{BuilderConfig, DiagramBuilder};
    pub use crate::core::{
        validate, Diagram, DiagramElement, DiagramSnapshot, DiagramType, ElementId, ModelError,
        Node, NodeKind, NodeSnapshot, Offset, ParentNode, Point, Rectangle, Violation,
    };
}

/// Build the worked example used throughout the documentation: a class
/// diagram with a package at the origin holding one class at `(10, 10)`
///
/// # Example
/// ```rust
/// use trellis::{sample_diagram, Point};
///
/// let (builder, package, class) = sample_diagram().unwrap();
/// assert_eq!(builder.diagram().root_count(), 1);
/// assert_eq!(class.parent().unwrap(), package);
/// assert_eq!(class.position(), Point::new(10, 10));
/// ```
pub fn sample_diagram() -> Result<(builder::DiagramBuilder, ParentNode, Node)> {
    let builder = builder::DiagramBuilder::new(Diagram::new(DiagramType::Class));
    let package = ParentNode::new(NodeKind::Package, Point::new(0, 0))?;
    let class = Node::new(NodeKind::Class, Point::new(10, 10));
    builder.add_node(&package)?;
    builder.add_child(&package, &class)?;
    Ok((builder, package, class))
}
