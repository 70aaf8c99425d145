//! Parent nodes: containers owning an ordered list of children
//!
//! [`ParentNode`] is a typed view of a [`Node`] whose kind is a container.
//! It dereferences to [`Node`], so every node operation is available on it.
//!
//! The child-list primitives here only edit the owning side. They do not set
//! or clear the child's back-reference; see [`crate::builder`] for the edits
//! that update both sides together.

use std::ops::Deref;

use tracing::{trace, warn};

use super::element::{DiagramElement, ElementId};
use super::error::{ModelError, Result};
use super::geometry::Point;
use super::kind::NodeKind;
use super::node::Node;

/// A node that can hold children
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ParentNode(Node);

impl ParentNode {
    /// Create a standalone container node.
    ///
    /// Fails with [`ModelError::NotAContainer`] if `kind` cannot hold children.
    pub fn new(kind: NodeKind, position: Point) -> Result<Self> {
        Self::try_from(Node::new(kind, position))
    }

    /// Wrap a node already known to be a container
    pub(crate) fn from_container(node: Node) -> Self {
        debug_assert!(node.is_container());
        Self(node)
    }

    pub fn as_node(&self) -> &Node {
        &self.0
    }

    pub fn into_node(self) -> Node {
        self.0
    }

    /// Children in insertion order
    pub fn children(&self) -> Vec<Node> {
        self.0.child_nodes()
    }

    pub fn child_count(&self) -> usize {
        self.0.with_children(<[Node]>::len).unwrap_or_default()
    }

    pub fn contains_child(&self, node: &Node) -> bool {
        self.child_index(node).is_some()
    }

    /// Position of `node` in the child list
    pub fn child_index(&self, node: &Node) -> Option<usize> {
        self.0
            .with_children(|c| c.iter().position(|child| child == node))
            .flatten()
    }

    /// Append `child` to the child list
    pub fn add_child(&self, child: &Node) -> Result<()> {
        let len = self.child_count();
        self.insert_child(len, child)
    }

    /// Insert `child` at `index` in the child list.
    ///
    /// Refuses duplicates, indices past the end, and children that enclose
    /// this node (which would make the containment tree cyclic).
    pub fn insert_child(&self, index: usize, child: &Node) -> Result<()> {
        if self.contains_child(child) {
            let error = ModelError::DuplicateChild {
                parent: self.id(),
                child: child.id(),
            };
            warn!(%error, "insert_child refused");
            return Err(error);
        }
        if child.encloses(&self.0) {
            let error = ModelError::containment_cycle(self.id(), child.id());
            warn!(%error, "insert_child refused");
            return Err(error);
        }
        let len = self.child_count();
        if index > len {
            let error = ModelError::index_out_of_bounds(index, len);
            warn!(%error, parent = %self.id(), "insert_child refused");
            return Err(error);
        }
        self.0
            .with_children_mut(|children| children.insert(index, child.clone()));
        trace!(parent = %self.id(), child = %child.id(), index, "Inserted child");
        Ok(())
    }

    /// Remove `child` from the child list, returning the index it held
    pub fn remove_child(&self, child: &Node) -> Result<usize> {
        let Some(index) = self.child_index(child) else {
            let error = ModelError::NotAChild {
                parent: self.id(),
                child: child.id(),
            };
            warn!(%error, "remove_child refused");
            return Err(error);
        };
        self.0.with_children_mut(|children| children.remove(index));
        trace!(parent = %self.id(), child = %child.id(), index, "Removed child");
        Ok(index)
    }
}

impl Deref for ParentNode {
    type Target = Node;

    fn deref(&self) -> &Node {
        &self.0
    }
}

impl TryFrom<Node> for ParentNode {
    type Error = ModelError;

    fn try_from(node: Node) -> Result<Self> {
        if node.is_container() {
            Ok(Self(node))
        } else {
            Err(ModelError::NotAContainer {
                node: node.id(),
                kind: node.kind(),
            })
        }
    }
}

impl From<ParentNode> for Node {
    fn from(parent: ParentNode) -> Node {
        parent.0
    }
}

impl PartialEq<Node> for ParentNode {
    fn eq(&self, other: &Node) -> bool {
        self.0 == *other
    }
}

impl PartialEq<ParentNode> for Node {
    fn eq(&self, other: &ParentNode) -> bool {
        *self == other.0
    }
}

impl DiagramElement for ParentNode {
    fn id(&self) -> ElementId {
        self.0.id()
    }

    fn duplicate(&self) -> Self {
        Self(self.0.duplicate())
    }
}

impl std::fmt::Debug for ParentNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ParentNode").field(&self.0).finish()
    }
}
