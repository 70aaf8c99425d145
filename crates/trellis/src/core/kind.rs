//! Node and diagram kinds
//!
//! Each node kind carries two static facts: whether it can hold children
//! (a container) and whether it only makes sense nested inside a parent.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kind of shape a node represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    /// Free-floating comment box
    Note,
    /// Class box in a class diagram
    Class,
    /// Interface box in a class diagram
    Interface,
    /// Stick figure in a use case diagram
    Actor,
    /// Ellipse in a use case diagram
    UseCase,
    /// Rounded box in a state diagram
    State,
    /// Filled circle starting a state machine
    InitialState,
    /// Ringed circle ending a state machine
    FinalState,
    /// Name/value slot inside an object
    Field,
    /// Activation bar on a sequence diagram lifeline
    Call,
    /// Folder that groups classifiers
    Package,
    /// Object box holding fields
    Object,
    /// Lifeline head in a sequence diagram, holding its calls
    ImplicitParameter,
}

impl NodeKind {
    pub const ALL: [NodeKind; 13] = [
        NodeKind::Note,
        NodeKind::Class,
        NodeKind::Interface,
        NodeKind::Actor,
        NodeKind::UseCase,
        NodeKind::State,
        NodeKind::InitialState,
        NodeKind::FinalState,
        NodeKind::Field,
        NodeKind::Call,
        NodeKind::Package,
        NodeKind::Object,
        NodeKind::ImplicitParameter,
    ];

    /// Returns true if nodes of this kind own an ordered list of children
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            NodeKind::Package | NodeKind::Object | NodeKind::ImplicitParameter
        )
    }

    /// Returns true if nodes of this kind are only meaningful inside a parent
    pub fn requires_parent(&self) -> bool {
        matches!(self, NodeKind::Field | NodeKind::Call)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Note => "note",
            NodeKind::Class => "class",
            NodeKind::Interface => "interface",
            NodeKind::Actor => "actor",
            NodeKind::UseCase => "use-case",
            NodeKind::State => "state",
            NodeKind::InitialState => "initial-state",
            NodeKind::FinalState => "final-state",
            NodeKind::Field => "field",
            NodeKind::Call => "call",
            NodeKind::Package => "package",
            NodeKind::Object => "object",
            NodeKind::ImplicitParameter => "implicit-parameter",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.to_lowercase();
        NodeKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| format!("Unknown node kind: {}", s))
    }
}

/// The diagram type, used by the builder's nesting policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagramType {
    #[default]
    Class,
    Sequence,
    State,
    UseCase,
    Object,
}

impl DiagramType {
    /// Whether `child` may be nested inside `parent` in this diagram type
    pub fn allows_nesting(&self, parent: NodeKind, child: NodeKind) -> bool {
        match (self, parent) {
            (DiagramType::Class, NodeKind::Package) => matches!(
                child,
                NodeKind::Class | NodeKind::Interface | NodeKind::Package | NodeKind::Note
            ),
            (DiagramType::Sequence, NodeKind::ImplicitParameter) => child == NodeKind::Call,
            (DiagramType::Object, NodeKind::Object) => child == NodeKind::Field,
            _ => false,
        }
    }
}

impl fmt::Display for DiagramType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagramType::Class => write!(f, "class"),
            DiagramType::Sequence => write!(f, "sequence"),
            DiagramType::State => write!(f, "state"),
            DiagramType::UseCase => write!(f, "use-case"),
            DiagramType::Object => write!(f, "object"),
        }
    }
}
