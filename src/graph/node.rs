//! Argument node: a claim keyed by its own text

use super::edge::EdgeKey;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of one graph instance
///
/// Stamped onto a node when it is inserted, so an edge built from a node
/// instance that lives in another graph (or in none) can be told apart from
/// one built from the graph's own stored instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphId(Uuid);

impl GraphId {
    /// Create a new random GraphId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for GraphId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for GraphId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Node-level support dimension
///
/// Doubles as the kind of a node rebuttal: a rebuttal attacks either the
/// importance of a claim or its uniqueness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeAspect {
    /// Why the claim matters
    Importance,
    /// Why the claim only holds under the argued scenario
    Uniqueness,
}

impl NodeAspect {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Importance => "importance",
            Self::Uniqueness => "uniqueness",
        }
    }

    /// Parse the wire spelling used by oracle responses
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "importance" => Some(Self::Importance),
            "uniqueness" => Some(Self::Uniqueness),
            _ => None,
        }
    }
}

impl std::fmt::Display for NodeAspect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A claim in the argument graph
///
/// The argument text is the node's identity. It cannot be changed once the
/// node exists; the annotation lists are free to grow.
#[derive(Debug, Clone)]
pub struct Node {
    argument: String,
    /// Introduced to attack another element rather than as part of the original case
    pub is_rebuttal: bool,
    pub importance: Vec<String>,
    pub uniqueness: Vec<String>,
    pub importance_rebuttals: Vec<String>,
    pub uniqueness_rebuttals: Vec<String>,
    /// Incoming edges, in insertion order
    pub(super) causes: Vec<EdgeKey>,
    /// Graph this instance was inserted into
    pub(super) owner: Option<GraphId>,
}

impl Node {
    /// Create a detached node; it joins a graph through `DebateGraph::add_node`
    pub fn new(argument: impl Into<String>, is_rebuttal: bool) -> Self {
        Self {
            argument: argument.into(),
            is_rebuttal,
            importance: Vec::new(),
            uniqueness: Vec::new(),
            importance_rebuttals: Vec::new(),
            uniqueness_rebuttals: Vec::new(),
            causes: Vec::new(),
            owner: None,
        }
    }

    /// Add an importance statement
    pub fn with_importance(mut self, statement: impl Into<String>) -> Self {
        self.importance.push(statement.into());
        self
    }

    /// Add a uniqueness statement
    pub fn with_uniqueness(mut self, statement: impl Into<String>) -> Self {
        self.uniqueness.push(statement.into());
        self
    }

    pub fn argument(&self) -> &str {
        &self.argument
    }

    /// Keys of the edges whose effect is this node
    pub fn causes(&self) -> &[EdgeKey] {
        &self.causes
    }

    /// Supporting statements for one aspect
    pub fn support(&self, aspect: NodeAspect) -> &[String] {
        match aspect {
            NodeAspect::Importance => &self.importance,
            NodeAspect::Uniqueness => &self.uniqueness,
        }
    }

    /// Statements countering one aspect
    pub fn rebuttals(&self, aspect: NodeAspect) -> &[String] {
        match aspect {
            NodeAspect::Importance => &self.importance_rebuttals,
            NodeAspect::Uniqueness => &self.uniqueness_rebuttals,
        }
    }

    pub fn push_support(&mut self, aspect: NodeAspect, statement: impl Into<String>) {
        match aspect {
            NodeAspect::Importance => self.importance.push(statement.into()),
            NodeAspect::Uniqueness => self.uniqueness.push(statement.into()),
        }
    }

    pub fn push_rebuttal(&mut self, aspect: NodeAspect, statement: impl Into<String>) {
        match aspect {
            NodeAspect::Importance => self.importance_rebuttals.push(statement.into()),
            NodeAspect::Uniqueness => self.uniqueness_rebuttals.push(statement.into()),
        }
    }

    pub(super) fn owner(&self) -> Option<GraphId> {
        self.owner
    }
}
