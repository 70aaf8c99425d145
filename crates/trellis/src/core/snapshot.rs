//! Read-only snapshots of the containment tree
//!
//! Snapshots are plain owned data, detached from the live handles, for
//! consumers that walk the whole graph (renderers, serializers, tools).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::diagram::Diagram;
use super::element::{DiagramElement, ElementId};
use super::kind::{DiagramType, NodeKind};
use super::node::Node;

/// One node and its subtree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub id: ElementId,
    pub kind: NodeKind,
    pub x: i32,
    pub y: i32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSnapshot>,
}

impl NodeSnapshot {
    /// Number of nodes in this subtree, this one included
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(NodeSnapshot::node_count).sum::<usize>()
    }

    fn write_tree(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        writeln!(
            f,
            "{:indent$}{} {} ({}, {})",
            "",
            self.kind,
            self.id,
            self.x,
            self.y,
            indent = depth * 2
        )?;
        for child in &self.children {
            child.write_tree(f, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for NodeSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_tree(f, 0)
    }
}

/// A whole diagram
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagramSnapshot {
    pub id: ElementId,
    pub diagram_type: DiagramType,
    pub roots: Vec<NodeSnapshot>,
}

impl DiagramSnapshot {
    pub fn node_count(&self) -> usize {
        self.roots.iter().map(NodeSnapshot::node_count).sum()
    }
}

impl fmt::Display for DiagramSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} diagram {}", self.diagram_type, self.id)?;
        for root in &self.roots {
            root.write_tree(f, 1)?;
        }
        Ok(())
    }
}

impl Node {
    pub fn snapshot(&self) -> NodeSnapshot {
        let position = self.position();
        NodeSnapshot {
            id: self.id(),
            kind: self.kind(),
            x: position.x,
            y: position.y,
            children: self.child_nodes().iter().map(Node::snapshot).collect(),
        }
    }
}

impl Diagram {
    pub fn snapshot(&self) -> DiagramSnapshot {
        DiagramSnapshot {
            id: self.id(),
            diagram_type: self.diagram_type(),
            roots: self.roots().iter().map(Node::snapshot).collect(),
        }
    }
}
