//! Nodes: the shapes of a diagram
//!
//! A [`Node`] is a shared handle to one shape. Cloning the handle with
//! [`Clone`] yields another handle to the *same* node; a structural copy with
//! fresh identity is made with [`DiagramElement::duplicate`].
//!
//! A node holds two non-owning back-references: the diagram it is attached to
//! and the parent node it is linked to. Ownership flows the other way, from a
//! diagram's root list and from a parent's child list. The primitives in this
//! module only ever touch the node's own side of a relationship; keeping both
//! sides in step is the job of [`crate::builder::DiagramBuilder`].

use std::cell::RefCell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::{Rc, Weak};

use tracing::{trace, warn};

use super::diagram::{Diagram, WeakDiagram};
use super::element::{DiagramElement, ElementId};
use super::error::{ModelError, Result};
use super::geometry::{Point, Rectangle};
use super::kind::NodeKind;
use super::parent::ParentNode;

pub(crate) struct NodeInner {
    id: ElementId,
    kind: NodeKind,
    state: RefCell<NodeState>,
}

struct NodeState {
    position: Point,
    diagram: Option<WeakDiagram>,
    parent: Option<Weak<NodeInner>>,
    /// Present exactly when `kind.is_container()`
    children: Option<Vec<Node>>,
}

/// Handle to a node of the diagram graph
#[derive(Clone)]
pub struct Node(Rc<NodeInner>);

impl Node {
    /// Create a standalone node: no diagram, no parent
    pub fn new(kind: NodeKind, position: Point) -> Self {
        let node = Node(Rc::new(NodeInner {
            id: ElementId::next(),
            kind,
            state: RefCell::new(NodeState {
                position,
                diagram: None,
                parent: None,
                children: kind.is_container().then(Vec::new),
            }),
        }));
        trace!(node = %node.id(), %kind, %position, "Created node");
        node
    }

    pub fn kind(&self) -> NodeKind {
        self.0.kind
    }

    pub fn position(&self) -> Point {
        self.0.state.borrow().position
    }

    /// Absolute move of this node only. Children of a container keep their
    /// positions; use [`Node::translate`] to move a whole subtree.
    pub fn move_to(&self, position: Point) {
        self.0.state.borrow_mut().position = position;
        trace!(node = %self.id(), %position, "Moved node");
    }

    /// Relative move. For a container every descendant moves by the same
    /// amount, so the subtree keeps its shape.
    pub fn translate(&self, dx: i32, dy: i32) {
        let children = {
            let mut state = self.0.state.borrow_mut();
            state.position = state.position.translated(dx, dy);
            state.children.clone()
        };
        for child in children.into_iter().flatten() {
            child.translate(dx, dy);
        }
    }

    /// Whether this kind of node can only exist nested inside a parent
    pub fn requires_parent(&self) -> bool {
        self.0.kind.requires_parent()
    }

    /// Whether this node carries a child list
    pub fn is_container(&self) -> bool {
        self.0.kind.is_container()
    }

    /// Typed view of this node as a parent, if its kind is a container
    pub fn as_parent(&self) -> Option<ParentNode> {
        ParentNode::try_from(self.clone()).ok()
    }

    /// Record `diagram` as the diagram this node belongs to.
    ///
    /// Does not add the node to the diagram's root list. Attaching again to
    /// the same diagram is a no-op; attaching to a different live diagram is
    /// refused.
    pub fn attach(&self, diagram: &Diagram) -> Result<()> {
        if let Some(current) = self.diagram() {
            if current == *diagram {
                return Ok(());
            }
            let error = ModelError::AlreadyAttached {
                node: self.id(),
                diagram: current.id(),
            };
            warn!(%error, "attach refused");
            return Err(error);
        }
        self.0.state.borrow_mut().diagram = Some(diagram.downgrade());
        trace!(node = %self.id(), diagram = %diagram.id(), "Attached node");
        Ok(())
    }

    /// Forget the diagram this node belongs to. No-op when not attached.
    pub fn detach(&self) {
        if self.0.state.borrow_mut().diagram.take().is_some() {
            trace!(node = %self.id(), "Detached node");
        }
    }

    /// The diagram this node is attached to, if any and if it is still alive
    pub fn diagram(&self) -> Option<Diagram> {
        self.0
            .state
            .borrow()
            .diagram
            .as_ref()
            .and_then(WeakDiagram::upgrade)
    }

    pub fn has_parent(&self) -> bool {
        self.parent_opt().is_some()
    }

    /// The parent this node is linked to.
    ///
    /// Fails with [`ModelError::NoParent`] unless [`Node::has_parent`].
    pub fn parent(&self) -> Result<ParentNode> {
        self.parent_opt().ok_or_else(|| {
            let error = ModelError::no_parent(self.id());
            warn!(%error, "parent lookup on unlinked node");
            error
        })
    }

    pub fn parent_opt(&self) -> Option<ParentNode> {
        let parent = self.0.state.borrow().parent.as_ref()?.upgrade()?;
        Some(ParentNode::from_container(Node(parent)))
    }

    /// Clear this node's back-reference to its parent.
    ///
    /// The former parent still lists this node as a child afterwards; the
    /// caller removes it from that list separately.
    pub fn unlink(&self) -> Result<()> {
        let parent = self.parent()?;
        self.0.state.borrow_mut().parent = None;
        trace!(node = %self.id(), parent = %parent.id(), "Unlinked node");
        Ok(())
    }

    /// Point this node's back-reference at `parent`.
    ///
    /// Does not insert the node into the parent's child list. Linking to the
    /// current parent again is a no-op; linking while already linked to a
    /// different parent, or to a node inside this node's own subtree, is
    /// refused.
    pub fn set_parent(&self, parent: &ParentNode) -> Result<()> {
        if let Some(current) = self.parent_opt() {
            if current == *parent {
                return Ok(());
            }
            let error = ModelError::AlreadyLinked {
                node: self.id(),
                parent: current.id(),
            };
            warn!(%error, "set_parent refused");
            return Err(error);
        }
        if self.encloses(parent) {
            let error = ModelError::containment_cycle(parent.id(), self.id());
            warn!(%error, "set_parent refused");
            return Err(error);
        }
        self.0.state.borrow_mut().parent = Some(Rc::downgrade(&parent.as_node().0));
        trace!(node = %self.id(), parent = %parent.id(), "Linked node");
        Ok(())
    }

    /// Parents of this node from the nearest outwards, following back-references
    pub fn ancestors(&self) -> Vec<ParentNode> {
        let mut ancestors = Vec::new();
        let mut current = self.parent_opt();
        while let Some(parent) = current {
            current = parent.parent_opt();
            ancestors.push(parent);
        }
        ancestors
    }

    /// The outermost node reached by following back-references
    pub fn root(&self) -> Node {
        self.ancestors()
            .pop()
            .map(ParentNode::into_node)
            .unwrap_or_else(|| self.clone())
    }

    /// Number of parents above this node
    pub fn depth(&self) -> usize {
        self.ancestors().len()
    }

    /// Every node owned below this one, depth-first pre-order. Empty for leaves.
    pub fn descendants(&self) -> Vec<Node> {
        let mut out = Vec::new();
        self.collect_descendants(&mut out);
        out
    }

    fn collect_descendants(&self, out: &mut Vec<Node>) {
        for child in self.child_nodes() {
            out.push(child.clone());
            child.collect_descendants(out);
        }
    }

    /// Bounding rectangle of this node and everything it owns, given the
    /// size every individual shape is drawn at
    pub fn bounds(&self, size: (u32, u32)) -> Rectangle {
        let own = Rectangle::new(self.position(), size.0, size.1);
        self.child_nodes()
            .iter()
            .fold(own, |acc, child| acc.union(&child.bounds(size)))
    }

    /// True if `other` is this node or lies inside its subtree, following
    /// either the owning child lists or the back-references
    pub(crate) fn encloses(&self, other: &Node) -> bool {
        if self == other {
            return true;
        }
        other.ancestors().iter().any(|a| a.as_node() == self)
            || self.descendants().iter().any(|d| d == other)
    }

    /// Snapshot of the child handles; empty for leaves
    pub(crate) fn child_nodes(&self) -> Vec<Node> {
        self.0.state.borrow().children.clone().unwrap_or_default()
    }

    /// Run `f` against the child list. `None` for leaves.
    pub(crate) fn with_children<R>(&self, f: impl FnOnce(&[Node]) -> R) -> Option<R> {
        self.0.state.borrow().children.as_deref().map(f)
    }

    pub(crate) fn with_children_mut<R>(&self, f: impl FnOnce(&mut Vec<Node>) -> R) -> Option<R> {
        self.0.state.borrow_mut().children.as_mut().map(f)
    }

    pub(crate) fn downgrade(&self) -> Weak<NodeInner> {
        Rc::downgrade(&self.0)
    }

    pub(crate) fn link_unchecked(&self, parent: Weak<NodeInner>) {
        self.0.state.borrow_mut().parent = Some(parent);
    }
}

impl DiagramElement for Node {
    fn id(&self) -> ElementId {
        self.0.id
    }

    /// Deep copy with fresh ids. The copy is neither attached nor linked;
    /// copies of children are linked to the copied parent, not the original.
    fn duplicate(&self) -> Node {
        let copy = Node::new(self.kind(), self.position());
        for child in self.child_nodes() {
            let child_copy = child.duplicate();
            child_copy.link_unchecked(copy.downgrade());
            copy.with_children_mut(|children| children.push(child_copy));
        }
        trace!(original = %self.id(), copy = %copy.id(), "Duplicated node");
        copy
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.0.id == other.0.id
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.id.hash(state);
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.0.state.borrow();
        f.debug_struct("Node")
            .field("id", &self.0.id)
            .field("kind", &self.0.kind)
            .field("position", &state.position)
            .field(
                "attached",
                &state
                    .diagram
                    .as_ref()
                    .and_then(WeakDiagram::upgrade)
                    .is_some(),
            )
            .field(
                "parent",
                &state
                    .parent
                    .as_ref()
                    .and_then(Weak::upgrade)
                    .map(|p| p.id),
            )
            .field("children", &state.children.as_ref().map(Vec::len))
            .finish()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} at {}", self.kind(), self.id(), self.position())
    }
}
