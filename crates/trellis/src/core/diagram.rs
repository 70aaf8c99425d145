//! The diagram aggregate
//!
//! A [`Diagram`] owns an ordered list of root nodes; list order is the
//! rendering z-order. Nodes record which diagram they belong to themselves
//! (see [`Node::attach`]), so there is no central node-to-diagram index.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::{trace, warn};

use super::element::{DiagramElement, ElementId};
use super::error::{ModelError, Result};
use super::kind::DiagramType;
use super::node::Node;

pub(crate) struct DiagramInner {
    id: ElementId,
    diagram_type: DiagramType,
    roots: RefCell<Vec<Node>>,
}

/// Handle to a diagram
#[derive(Clone)]
pub struct Diagram(Rc<DiagramInner>);

/// Non-owning reference from a node back to its diagram
#[derive(Clone)]
pub(crate) struct WeakDiagram(Weak<DiagramInner>);

impl WeakDiagram {
    pub(crate) fn upgrade(&self) -> Option<Diagram> {
        self.0.upgrade().map(Diagram)
    }
}

impl Diagram {
    /// Create an empty diagram
    pub fn new(diagram_type: DiagramType) -> Self {
        let diagram = Self(Rc::new(DiagramInner {
            id: ElementId::next(),
            diagram_type,
            roots: RefCell::new(Vec::new()),
        }));
        trace!(diagram = %diagram.id(), %diagram_type, "Created diagram");
        diagram
    }

    pub fn id(&self) -> ElementId {
        self.0.id
    }

    pub fn diagram_type(&self) -> DiagramType {
        self.0.diagram_type
    }

    pub(crate) fn downgrade(&self) -> WeakDiagram {
        WeakDiagram(Rc::downgrade(&self.0))
    }

    /// Root nodes in z-order (first is drawn first)
    pub fn roots(&self) -> Vec<Node> {
        self.0.roots.borrow().clone()
    }

    pub fn root_count(&self) -> usize {
        self.0.roots.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.roots.borrow().is_empty()
    }

    pub fn contains_root(&self, node: &Node) -> bool {
        self.root_index(node).is_some()
    }

    pub fn root_index(&self, node: &Node) -> Option<usize> {
        self.0.roots.borrow().iter().position(|root| root == node)
    }

    /// Append `node` to the root list. Does not attach the node.
    pub fn add_root(&self, node: &Node) -> Result<()> {
        let len = self.root_count();
        self.insert_root(len, node)
    }

    /// Insert `node` into the root list at `index`. Does not attach the node.
    pub fn insert_root(&self, index: usize, node: &Node) -> Result<()> {
        if self.contains_root(node) {
            let error = ModelError::DuplicateRoot {
                diagram: self.id(),
                node: node.id(),
            };
            warn!(%error, "insert_root refused");
            return Err(error);
        }
        let len = self.root_count();
        if index > len {
            let error = ModelError::index_out_of_bounds(index, len);
            warn!(%error, diagram = %self.id(), "insert_root refused");
            return Err(error);
        }
        self.0.roots.borrow_mut().insert(index, node.clone());
        trace!(diagram = %self.id(), node = %node.id(), index, "Inserted root");
        Ok(())
    }

    /// Remove `node` from the root list, returning the index it held.
    /// Does not detach the node.
    pub fn remove_root(&self, node: &Node) -> Result<usize> {
        let Some(index) = self.root_index(node) else {
            let error = ModelError::NotARoot {
                diagram: self.id(),
                node: node.id(),
            };
            warn!(%error, "remove_root refused");
            return Err(error);
        };
        self.0.roots.borrow_mut().remove(index);
        trace!(diagram = %self.id(), node = %node.id(), index, "Removed root");
        Ok(index)
    }

    /// Move a root to the end of the z-order so it is drawn last
    pub fn bring_to_front(&self, node: &Node) -> Result<()> {
        self.remove_root(node)?;
        self.0.roots.borrow_mut().push(node.clone());
        Ok(())
    }

    /// Move a root to the start of the z-order so it is drawn first
    pub fn send_to_back(&self, node: &Node) -> Result<()> {
        self.remove_root(node)?;
        self.0.roots.borrow_mut().insert(0, node.clone());
        Ok(())
    }

    /// Every node owned by this diagram: each root followed by its
    /// descendants, depth-first pre-order
    pub fn all_nodes(&self) -> Vec<Node> {
        let mut out = Vec::new();
        for root in self.roots() {
            out.push(root.clone());
            out.extend(root.descendants());
        }
        out
    }

    pub fn node_count(&self) -> usize {
        self.all_nodes().len()
    }

    /// True if `node` reports this diagram as its attachment and is reachable
    /// from the root list
    pub fn contains(&self, node: &Node) -> bool {
        node.diagram().as_ref() == Some(self) && self.all_nodes().contains(node)
    }
}

impl PartialEq for Diagram {
    fn eq(&self, other: &Self) -> bool {
        self.0.id == other.0.id
    }
}

impl Eq for Diagram {}

impl fmt::Debug for Diagram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diagram")
            .field("id", &self.0.id)
            .field("diagram_type", &self.0.diagram_type)
            .field("roots", &self.root_count())
            .finish()
    }
}

impl fmt::Display for Diagram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} diagram {} ({} roots)",
            self.diagram_type(),
            self.id(),
            self.root_count()
        )
    }
}
