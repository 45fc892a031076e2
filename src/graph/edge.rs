//! Causal edge between two arguments

use super::node::{GraphId, Node};
use serde::{Deserialize, Serialize};

/// Identity of an edge: the ordered pair of endpoint arguments
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeKey {
    pub cause: String,
    pub effect: String,
}

impl EdgeKey {
    pub fn new(cause: impl Into<String>, effect: impl Into<String>) -> Self {
        Self {
            cause: cause.into(),
            effect: effect.into(),
        }
    }
}

impl std::fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}->{}", self.cause, self.effect)
    }
}

/// Edge-level support dimension, also the kind of an edge rebuttal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeAspect {
    /// How strongly the cause produces the effect
    Certainty,
    /// Whether the link only holds under the argued scenario
    Uniqueness,
}

impl EdgeAspect {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Certainty => "certainty",
            Self::Uniqueness => "uniqueness",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "certainty" => Some(Self::Certainty),
            "uniqueness" => Some(Self::Uniqueness),
            _ => None,
        }
    }
}

impl std::fmt::Display for EdgeAspect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A directed causal link: "cause leads to effect"
///
/// Endpoints are held by argument text and re-resolved through the graph.
#[derive(Debug, Clone)]
pub struct Edge {
    key: EdgeKey,
    pub is_rebuttal: bool,
    pub certainty: Vec<String>,
    pub uniqueness: Vec<String>,
    pub certainty_rebuttals: Vec<String>,
    pub uniqueness_rebuttals: Vec<String>,
    /// Graph that owned the effect node instance this edge was built from
    effect_owner: Option<GraphId>,
}

impl Edge {
    /// Build an edge from two node instances
    ///
    /// Insertion only succeeds when `effect` is the instance stored in the
    /// target graph, so build from nodes obtained through `get_node`.
    pub fn between(cause: &Node, effect: &Node, is_rebuttal: bool) -> Self {
        Self {
            key: EdgeKey::new(cause.argument(), effect.argument()),
            is_rebuttal,
            certainty: Vec::new(),
            uniqueness: Vec::new(),
            certainty_rebuttals: Vec::new(),
            uniqueness_rebuttals: Vec::new(),
            effect_owner: effect.owner(),
        }
    }

    pub fn key(&self) -> &EdgeKey {
        &self.key
    }

    pub fn cause(&self) -> &str {
        &self.key.cause
    }

    pub fn effect(&self) -> &str {
        &self.key.effect
    }

    pub fn support(&self, aspect: EdgeAspect) -> &[String] {
        match aspect {
            EdgeAspect::Certainty => &self.certainty,
            EdgeAspect::Uniqueness => &self.uniqueness,
        }
    }

    pub fn rebuttals(&self, aspect: EdgeAspect) -> &[String] {
        match aspect {
            EdgeAspect::Certainty => &self.certainty_rebuttals,
            EdgeAspect::Uniqueness => &self.uniqueness_rebuttals,
        }
    }

    pub fn push_support(&mut self, aspect: EdgeAspect, statement: impl Into<String>) {
        match aspect {
            EdgeAspect::Certainty => self.certainty.push(statement.into()),
            EdgeAspect::Uniqueness => self.uniqueness.push(statement.into()),
        }
    }

    pub fn push_rebuttal(&mut self, aspect: EdgeAspect, statement: impl Into<String>) {
        match aspect {
            EdgeAspect::Certainty => self.certainty_rebuttals.push(statement.into()),
            EdgeAspect::Uniqueness => self.uniqueness_rebuttals.push(statement.into()),
        }
    }

    pub(super) fn effect_owner(&self) -> Option<GraphId> {
        self.effect_owner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_ordered_pair_of_arguments() {
        let a = Node::new("A", false);
        let b = Node::new("B", false);
        let forward = Edge::between(&a, &b, false);
        let backward = Edge::between(&b, &a, false);

        assert_eq!(forward.key(), &EdgeKey::new("A", "B"));
        assert_ne!(forward.key(), backward.key());
        assert_eq!(forward.key().to_string(), "A->B");
    }

    #[test]
    fn edge_from_detached_nodes_has_no_owner() {
        let edge = Edge::between(&Node::new("A", false), &Node::new("B", false), true);
        assert!(edge.effect_owner().is_none());
        assert!(edge.is_rebuttal);
    }

    #[test]
    fn push_routes_by_aspect() {
        let mut edge = Edge::between(&Node::new("A", false), &Node::new("B", false), false);
        edge.push_support(EdgeAspect::Certainty, "well documented");
        edge.push_rebuttal(EdgeAspect::Uniqueness, "happens anyway");

        assert_eq!(edge.support(EdgeAspect::Certainty), ["well documented"]);
        assert_eq!(edge.rebuttals(EdgeAspect::Uniqueness), ["happens anyway"]);
        assert!(edge.uniqueness.is_empty());
    }
}
