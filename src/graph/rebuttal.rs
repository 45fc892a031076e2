//! Rebuttal satellite records
//!
//! A rebuttal is itself a node in the graph. These records bind that node to
//! what it attacks. They reference nodes and edges by argument text and are
//! only admitted by the graph once every reference resolves.

use super::edge::{EdgeAspect, EdgeKey};
use super::node::NodeAspect;

/// Attacks the importance or uniqueness of a node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRebuttal {
    pub target: String,
    pub kind: NodeAspect,
    pub rebuttal: String,
}

/// Attacks the certainty or uniqueness of a causal link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeRebuttal {
    pub target: EdgeKey,
    pub kind: EdgeAspect,
    pub rebuttal: String,
}

/// An argument asserting the opposite of its target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterArgumentRebuttal {
    pub target: String,
    pub rebuttal: String,
}

/// An argument that concedes the opponent's causes but steers them to an
/// effect favorable to the rebutting side
///
/// Recorded as a standalone fact; the conceded causes are not kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnArgumentRebuttal {
    pub rebuttal: String,
}
