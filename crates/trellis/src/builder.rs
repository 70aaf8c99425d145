//! Composed edits that keep both sides of every relationship in step
//!
//! The model types expose one-sided primitives only. [`DiagramBuilder`]
//! sequences them into whole edits: each public method checks all of its
//! preconditions first and only then mutates, so a refused edit leaves the
//! diagram untouched and a successful one leaves it consistent.

use tracing::{debug, warn};

use crate::core::{
    Diagram, DiagramElement, DiagramSnapshot, ModelError, Node, NodeSnapshot, Offset, ParentNode,
    Point, Result, Violation,
};

/// Builder settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuilderConfig {
    /// Consult the diagram type's nesting table before nesting a node
    pub enforce_kind_policy: bool,
    /// Shift applied to a duplicated node relative to its original
    pub paste_offset: Offset,
}

impl BuilderConfig {
    pub fn new(enforce_kind_policy: bool, paste_offset: Offset) -> Self {
        Self {
            enforce_kind_policy,
            paste_offset,
        }
    }
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            enforce_kind_policy: true,
            paste_offset: Offset::new(10, 10),
        }
    }
}

/// Editing front-end for one diagram
#[derive(Debug, Clone)]
pub struct DiagramBuilder {
    diagram: Diagram,
    config: BuilderConfig,
}

impl DiagramBuilder {
    pub fn new(diagram: Diagram) -> Self {
        Self::with_config(diagram, BuilderConfig::default())
    }

    pub fn with_config(diagram: Diagram, config: BuilderConfig) -> Self {
        Self { diagram, config }
    }

    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Whether [`DiagramBuilder::add_child`] would accept this pair
    pub fn can_add_child(&self, parent: &ParentNode, child: &Node) -> bool {
        self.check_add_child(parent, child).is_ok()
    }

    /// Add `node` and its subtree as a new root
    pub fn add_node(&self, node: &Node) -> Result<()> {
        if node.requires_parent() {
            return Err(refuse(ModelError::ParentRequired {
                node: node.id(),
                kind: node.kind(),
            }));
        }
        self.check_free(node)?;

        self.diagram.add_root(node)?;
        self.attach_subtree(node)?;
        debug!(diagram = %self.diagram.id(), node = %node.id(), "Added root node");
        Ok(())
    }

    /// Nest `child` and its subtree inside `parent`, which must already be
    /// part of this diagram
    pub fn add_child(&self, parent: &ParentNode, child: &Node) -> Result<()> {
        self.check_add_child(parent, child)?;

        child.set_parent(parent)?;
        parent.add_child(child)?;
        self.attach_subtree(child)?;
        debug!(parent = %parent.id(), child = %child.id(), "Added child node");
        Ok(())
    }

    /// Move a node of this diagram, with its subtree, into `new_parent`
    pub fn move_into(&self, node: &Node, new_parent: &ParentNode) -> Result<()> {
        self.check_member(node)?;
        self.check_member(new_parent)?;
        if node.parent_opt().as_ref() == Some(new_parent) {
            return Ok(());
        }
        if node.encloses(new_parent) {
            return Err(refuse(ModelError::containment_cycle(
                new_parent.id(),
                node.id(),
            )));
        }
        self.check_policy(new_parent, node)?;

        self.release(node)?;
        node.set_parent(new_parent)?;
        new_parent.add_child(node)?;
        debug!(node = %node.id(), parent = %new_parent.id(), "Moved node into parent");
        Ok(())
    }

    /// Move a nested node, with its subtree, to the end of the root list
    pub fn move_to_root(&self, node: &Node) -> Result<()> {
        self.check_member(node)?;
        if !node.has_parent() {
            return Ok(());
        }
        if node.requires_parent() {
            return Err(refuse(ModelError::ParentRequired {
                node: node.id(),
                kind: node.kind(),
            }));
        }

        self.release(node)?;
        self.diagram.add_root(node)?;
        debug!(node = %node.id(), "Moved node to root");
        Ok(())
    }

    /// Take `node` and its subtree out of the diagram.
    ///
    /// The subtree stays intact (children remain linked to `node`) so it can
    /// be re-inserted later; every node in it is detached.
    pub fn remove_node(&self, node: &Node) -> Result<()> {
        self.check_member(node)?;

        self.release(node)?;
        node.detach();
        for descendant in node.descendants() {
            descendant.detach();
        }
        debug!(diagram = %self.diagram.id(), node = %node.id(), "Removed node");
        Ok(())
    }

    /// Copy `node` and its subtree, shift the copy by the configured paste
    /// offset and insert it right after the original in the same container
    pub fn duplicate(&self, node: &Node) -> Result<Node> {
        self.check_member(node)?;

        let copy = node.duplicate();
        let offset = self.config.paste_offset;
        copy.translate(offset.dx, offset.dy);

        match node.parent_opt() {
            Some(parent) => {
                let index = parent.child_index(node).map_or(parent.child_count(), |i| i + 1);
                copy.set_parent(&parent)?;
                parent.insert_child(index, &copy)?;
            }
            None => {
                let index = self
                    .diagram
                    .root_index(node)
                    .map_or(self.diagram.root_count(), |i| i + 1);
                self.diagram.insert_root(index, &copy)?;
            }
        }
        self.attach_subtree(&copy)?;
        debug!(original = %node.id(), copy = %copy.id(), "Duplicated node");
        Ok(copy)
    }

    /// Rebuild a diagram from a snapshot. Nodes get fresh ids; kinds,
    /// positions and nesting are reproduced through the builder edits.
    pub fn restore(snapshot: &DiagramSnapshot, config: BuilderConfig) -> Result<Self> {
        let builder = Self::with_config(Diagram::new(snapshot.diagram_type), config);
        for root in &snapshot.roots {
            builder.restore_subtree(None, root)?;
        }
        debug!(
            diagram = %builder.diagram.id(),
            nodes = snapshot.node_count(),
            "Restored diagram"
        );
        Ok(builder)
    }

    fn restore_subtree(
        &self,
        parent: Option<&ParentNode>,
        snapshot: &NodeSnapshot,
    ) -> Result<Node> {
        let node = Node::new(snapshot.kind, Point::new(snapshot.x, snapshot.y));
        match parent {
            Some(parent) => self.add_child(parent, &node)?,
            None => self.add_node(&node)?,
        }
        if !snapshot.children.is_empty() {
            let container = ParentNode::try_from(node.clone())?;
            for child in &snapshot.children {
                self.restore_subtree(Some(&container), child)?;
            }
        }
        Ok(node)
    }

    fn check_add_child(&self, parent: &ParentNode, child: &Node) -> Result<()> {
        self.check_member(parent)?;
        if parent.contains_child(child) {
            return Err(refuse(ModelError::DuplicateChild {
                parent: parent.id(),
                child: child.id(),
            }));
        }
        if child.encloses(parent) {
            return Err(refuse(ModelError::containment_cycle(
                parent.id(),
                child.id(),
            )));
        }
        self.check_free(child)?;
        self.check_policy(parent, child)
    }

    fn check_policy(&self, parent: &ParentNode, child: &Node) -> Result<()> {
        if self.config.enforce_kind_policy
            && !self
                .diagram
                .diagram_type()
                .allows_nesting(parent.kind(), child.kind())
        {
            return Err(refuse(ModelError::Rejected {
                parent: parent.id(),
                child: child.id(),
            }));
        }
        Ok(())
    }

    /// `node` must be unlinked and unattached, and its subtree must be
    /// consistent with no member attached to any diagram
    fn check_free(&self, node: &Node) -> Result<()> {
        if let Some(parent) = node.parent_opt() {
            return Err(refuse(ModelError::AlreadyLinked {
                node: node.id(),
                parent: parent.id(),
            }));
        }
        if let Some(diagram) = node.diagram() {
            return Err(refuse(ModelError::AlreadyAttached {
                node: node.id(),
                diagram: diagram.id(),
            }));
        }
        for descendant in node.descendants() {
            match descendant.diagram() {
                Some(attached) if attached == self.diagram => {
                    return Err(refuse(ModelError::AlreadyAttached {
                        node: descendant.id(),
                        diagram: attached.id(),
                    }));
                }
                Some(_) => {
                    return Err(refuse(ModelError::ForeignDiagram {
                        node: descendant.id(),
                    }));
                }
                None => {}
            }
        }
        check_subtree_links(node)
    }

    fn check_member(&self, node: &Node) -> Result<()> {
        if !self.diagram.contains(node) {
            return Err(refuse(ModelError::NotInDiagram { node: node.id() }));
        }
        Ok(())
    }

    /// Take `node` out of whichever container holds it: the parent's child
    /// list plus the back-reference, or the diagram's root list
    fn release(&self, node: &Node) -> Result<()> {
        match node.parent_opt() {
            Some(parent) => {
                parent.remove_child(node)?;
                node.unlink()
            }
            None => self.diagram.remove_root(node).map(|_| ()),
        }
    }

    fn attach_subtree(&self, node: &Node) -> Result<()> {
        node.attach(&self.diagram)?;
        for descendant in node.descendants() {
            descendant.attach(&self.diagram)?;
        }
        Ok(())
    }
}

/// Every child listed inside the subtree of `node` must point back at the
/// container listing it
fn check_subtree_links(node: &Node) -> Result<()> {
    let containers = std::iter::once(node.clone())
        .chain(node.descendants())
        .filter_map(|n| n.as_parent());
    for container in containers {
        for child in container.children() {
            if child.parent_opt().as_ref() != Some(&container) {
                return Err(refuse(
                    Violation::OrphanedChild {
                        parent: container.id(),
                        child: child.id(),
                    }
                    .into(),
                ));
            }
        }
    }
    Ok(())
}

fn refuse(error: ModelError) -> ModelError {
    warn!(%error, "Edit refused");
    error
}
