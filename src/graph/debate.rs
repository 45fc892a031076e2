//! DebateGraph: nodes, causal edges, and rebuttal satellites for one debate

use super::edge::{Edge, EdgeAspect, EdgeKey};
use super::node::{GraphId, Node, NodeAspect};
use super::rebuttal::{CounterArgumentRebuttal, EdgeRebuttal, NodeRebuttal, TurnArgumentRebuttal};
use std::collections::HashMap;
use thiserror::Error;

/// Which end of an edge a lookup failed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointRole {
    Cause,
    Effect,
}

impl std::fmt::Display for EndpointRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cause => f.write_str("cause"),
            Self::Effect => f.write_str("effect"),
        }
    }
}

/// Errors raised by graph mutation and reconstruction
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("Node already exists: {0}")]
    DuplicateNode(String),

    #[error("Edge {role} not in graph: {argument}")]
    DanglingEndpoint { role: EndpointRole, argument: String },

    #[error("Effect node instance is not the one stored in this graph: {0}")]
    EndpointIdentityMismatch(String),

    #[error("Edge not found: {0}")]
    EdgeNotFound(EdgeKey),

    #[error("{context} references an element not in the graph: {reference}")]
    DanglingReference {
        context: &'static str,
        reference: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for graph operations
pub type GraphResult<T> = Result<T, GraphError>;

/// An argument graph
///
/// Nodes keep their insertion order. Edges are keyed by (cause, effect) and
/// each effect node lists its incoming edges. Rebuttal records sit beside the
/// structure and point into it by text.
#[derive(Debug)]
pub struct DebateGraph {
    id: GraphId,
    nodes: Vec<Node>,
    node_index: HashMap<String, usize>,
    edges: HashMap<EdgeKey, Edge>,
    node_rebuttals: Vec<NodeRebuttal>,
    edge_rebuttals: Vec<EdgeRebuttal>,
    counter_arguments: Vec<CounterArgumentRebuttal>,
    turn_arguments: Vec<TurnArgumentRebuttal>,
}

impl DebateGraph {
    /// Create an empty graph with a fresh identity
    pub fn new() -> Self {
        Self {
            id: GraphId::new(),
            nodes: Vec::new(),
            node_index: HashMap::new(),
            edges: HashMap::new(),
            node_rebuttals: Vec::new(),
            edge_rebuttals: Vec::new(),
            counter_arguments: Vec::new(),
            turn_arguments: Vec::new(),
        }
    }

    /// Seed a graph holding a single non-rebuttal edge `cause -> effect`
    pub fn edge_with_endpoints(cause: &str, effect: &str) -> GraphResult<Self> {
        let mut graph = Self::new();
        graph.add_node(Node::new(cause, false))?;
        graph.add_node(Node::new(effect, false))?;
        graph.connect(cause, effect, false)?;
        Ok(graph)
    }

    pub fn id(&self) -> GraphId {
        self.id
    }

    // === Nodes ===

    /// Insert a node; its argument text must be new to this graph
    pub fn add_node(&mut self, mut node: Node) -> GraphResult<&Node> {
        if self.node_index.contains_key(node.argument()) {
            return Err(GraphError::DuplicateNode(node.argument().to_string()));
        }
        node.owner = Some(self.id);
        node.causes.clear();
        let index = self.nodes.len();
        self.node_index.insert(node.argument().to_string(), index);
        self.nodes.push(node);
        Ok(&self.nodes[index])
    }

    /// Insert a node unless one with the same text exists
    ///
    /// Returns true when the node was created.
    pub fn ensure_node(&mut self, argument: &str, is_rebuttal: bool) -> GraphResult<bool> {
        if self.contains_node(argument) {
            return Ok(false);
        }
        self.add_node(Node::new(argument, is_rebuttal))?;
        Ok(true)
    }

    pub fn get_node(&self, argument: &str) -> Option<&Node> {
        self.node_index.get(argument).map(|&i| &self.nodes[i])
    }

    pub fn get_node_mut(&mut self, argument: &str) -> Option<&mut Node> {
        match self.node_index.get(argument) {
            Some(&i) => Some(&mut self.nodes[i]),
            None => None,
        }
    }

    pub fn contains_node(&self, argument: &str) -> bool {
        self.node_index.contains_key(argument)
    }

    /// Nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    // === Edges ===

    /// Insert an edge
    ///
    /// Both endpoints must be present and the effect must be this graph's
    /// stored node instance. Re-inserting an existing key is a no-op.
    pub fn add_edge(&mut self, edge: Edge) -> GraphResult<()> {
        if !self.contains_node(edge.cause()) {
            return Err(GraphError::DanglingEndpoint {
                role: EndpointRole::Cause,
                argument: edge.cause().to_string(),
            });
        }
        let effect_index = match self.node_index.get(edge.effect()) {
            Some(&i) => i,
            None => {
                return Err(GraphError::DanglingEndpoint {
                    role: EndpointRole::Effect,
                    argument: edge.effect().to_string(),
                })
            }
        };
        if edge.effect_owner() != Some(self.id) {
            return Err(GraphError::EndpointIdentityMismatch(edge.effect().to_string()));
        }
        if self.edges.contains_key(edge.key()) {
            return Ok(());
        }

        let key = edge.key().clone();
        self.nodes[effect_index].causes.push(key.clone());
        self.edges.insert(key, edge);
        Ok(())
    }

    /// Insert an edge between two stored nodes, named by text
    pub fn connect(&mut self, cause: &str, effect: &str, is_rebuttal: bool) -> GraphResult<()> {
        let edge = {
            let cause_node = self.get_node(cause).ok_or_else(|| GraphError::DanglingEndpoint {
                role: EndpointRole::Cause,
                argument: cause.to_string(),
            })?;
            let effect_node = self.get_node(effect).ok_or_else(|| GraphError::DanglingEndpoint {
                role: EndpointRole::Effect,
                argument: effect.to_string(),
            })?;
            Edge::between(cause_node, effect_node, is_rebuttal)
        };
        self.add_edge(edge)
    }

    pub fn get_edge(&self, cause: &str, effect: &str) -> Option<&Edge> {
        self.edges.get(&EdgeKey::new(cause, effect))
    }

    pub fn get_edge_mut(&mut self, cause: &str, effect: &str) -> Option<&mut Edge> {
        self.edges.get_mut(&EdgeKey::new(cause, effect))
    }

    /// Remove an edge and drop it from the effect node's incoming list
    pub fn remove_edge(&mut self, cause: &str, effect: &str) -> GraphResult<Edge> {
        let key = EdgeKey::new(cause, effect);
        let edge = self
            .edges
            .remove(&key)
            .ok_or_else(|| GraphError::EdgeNotFound(key.clone()))?;
        if let Some(&i) = self.node_index.get(effect) {
            self.nodes[i].causes.retain(|k| k != &key);
        }
        Ok(edge)
    }

    /// All edges, in no particular order
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    /// All edges in a stable order: by effect node insertion order, then by
    /// the order each edge joined its effect's incoming list
    pub fn ordered_edges(&self) -> Vec<&Edge> {
        self.nodes
            .iter()
            .flat_map(|node| node.causes.iter())
            .filter_map(|key| self.edges.get(key))
            .collect()
    }

    /// Edges whose effect is `argument`
    pub fn incoming(&self, argument: &str) -> Vec<&Edge> {
        self.get_node(argument)
            .map(|node| node.causes.iter().filter_map(|k| self.edges.get(k)).collect())
            .unwrap_or_default()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    // === Rebuttal satellites ===

    pub fn add_node_rebuttal(
        &mut self,
        target: &str,
        kind: NodeAspect,
        rebuttal: &str,
    ) -> GraphResult<()> {
        self.require_node("node rebuttal", target)?;
        self.require_node("node rebuttal", rebuttal)?;
        self.node_rebuttals.push(NodeRebuttal {
            target: target.to_string(),
            kind,
            rebuttal: rebuttal.to_string(),
        });
        Ok(())
    }

    pub fn add_edge_rebuttal(
        &mut self,
        cause: &str,
        effect: &str,
        kind: EdgeAspect,
        rebuttal: &str,
    ) -> GraphResult<()> {
        let target = EdgeKey::new(cause, effect);
        if !self.edges.contains_key(&target) {
            return Err(GraphError::DanglingReference {
                context: "edge rebuttal",
                reference: target.to_string(),
            });
        }
        self.require_node("edge rebuttal", rebuttal)?;
        self.edge_rebuttals.push(EdgeRebuttal {
            target,
            kind,
            rebuttal: rebuttal.to_string(),
        });
        Ok(())
    }

    pub fn add_counter_argument(&mut self, target: &str, rebuttal: &str) -> GraphResult<()> {
        self.require_node("counter argument", target)?;
        self.require_node("counter argument", rebuttal)?;
        self.counter_arguments.push(CounterArgumentRebuttal {
            target: target.to_string(),
            rebuttal: rebuttal.to_string(),
        });
        Ok(())
    }

    pub fn add_turn_argument(&mut self, rebuttal: &str) -> GraphResult<()> {
        self.require_node("turn argument", rebuttal)?;
        self.turn_arguments.push(TurnArgumentRebuttal {
            rebuttal: rebuttal.to_string(),
        });
        Ok(())
    }

    pub fn node_rebuttals(&self) -> &[NodeRebuttal] {
        &self.node_rebuttals
    }

    pub fn edge_rebuttals(&self) -> &[EdgeRebuttal] {
        &self.edge_rebuttals
    }

    pub fn counter_arguments(&self) -> &[CounterArgumentRebuttal] {
        &self.counter_arguments
    }

    pub fn turn_arguments(&self) -> &[TurnArgumentRebuttal] {
        &self.turn_arguments
    }

    fn require_node(&self, context: &'static str, argument: &str) -> GraphResult<()> {
        if self.contains_node(argument) {
            Ok(())
        } else {
            Err(GraphError::DanglingReference {
                context,
                reference: argument.to_string(),
            })
        }
    }
}

impl Default for DebateGraph {
    fn default() -> Self {
        Self::new()
    }
}

/// Cloning forks the graph: the copy gets its own identity, so node
/// instances from one cannot be used to build edges into the other.
impl Clone for DebateGraph {
    fn clone(&self) -> Self {
        let id = GraphId::new();
        let nodes = self
            .nodes
            .iter()
            .cloned()
            .map(|mut node| {
                node.owner = Some(id);
                node
            })
            .collect();
        Self {
            id,
            nodes,
            node_index: self.node_index.clone(),
            edges: self.edges.clone(),
            node_rebuttals: self.node_rebuttals.clone(),
            edge_rebuttals: self.edge_rebuttals.clone(),
            counter_arguments: self.counter_arguments.clone(),
            turn_arguments: self.turn_arguments.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> DebateGraph {
        let mut graph = DebateGraph::new();
        for argument in ["A", "B", "C"] {
            graph.add_node(Node::new(argument, false)).unwrap();
        }
        graph.connect("A", "B", false).unwrap();
        graph.connect("B", "C", false).unwrap();
        graph
    }

    // === Scenario: node identity ===

    #[test]
    fn add_then_get_node() {
        let mut graph = DebateGraph::new();
        let stored = graph.add_node(Node::new("A", false)).unwrap();
        assert_eq!(stored.argument(), "A");
        assert_eq!(graph.get_node("A").unwrap().argument(), "A");
        assert!(graph.get_node("missing").is_none());
    }

    #[test]
    fn duplicate_node_is_rejected() {
        let mut graph = DebateGraph::new();
        graph.add_node(Node::new("A", false)).unwrap();
        let err = graph.add_node(Node::new("A", true)).unwrap_err();
        assert!(matches!(err, GraphError::DuplicateNode(ref a) if a == "A"));
        assert_eq!(graph.node_count(), 1);
        assert!(!graph.get_node("A").unwrap().is_rebuttal);
    }

    #[test]
    fn ensure_node_reuses_existing_text() {
        let mut graph = DebateGraph::new();
        assert!(graph.ensure_node("A", true).unwrap());
        assert!(!graph.ensure_node("A", false).unwrap());
        assert_eq!(graph.node_count(), 1);
        assert!(graph.get_node("A").unwrap().is_rebuttal);
    }

    #[test]
    fn nodes_keep_insertion_order() {
        let graph = abc();
        let order: Vec<&str> = graph.nodes().map(|n| n.argument()).collect();
        assert_eq!(order, vec!["A", "B", "C"]);
    }

    // === Scenario: edge insertion ===

    #[test]
    fn adding_the_same_edge_twice_is_a_no_op() {
        let mut graph = abc();
        graph.connect("A", "B", false).unwrap();

        let edge = Edge::between(graph.get_node("A").unwrap(), graph.get_node("B").unwrap(), true);
        graph.add_edge(edge).unwrap();

        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.get_node("B").unwrap().causes().len(), 1);
        assert!(!graph.get_edge("A", "B").unwrap().is_rebuttal);
    }

    #[test]
    fn edge_with_missing_endpoint_is_dangling() {
        let mut graph = abc();
        let err = graph.connect("A", "Z", false).unwrap_err();
        assert!(matches!(
            err,
            GraphError::DanglingEndpoint {
                role: EndpointRole::Effect,
                ref argument,
            } if argument == "Z"
        ));

        let err = graph.connect("Z", "A", false).unwrap_err();
        assert!(matches!(
            err,
            GraphError::DanglingEndpoint { role: EndpointRole::Cause, .. }
        ));
    }

    #[test]
    fn edge_built_from_fresh_instance_is_rejected() {
        let mut graph = abc();
        let fresh = Node::new("C", false);
        let edge = Edge::between(graph.get_node("A").unwrap(), &fresh, false);

        let err = graph.add_edge(edge).unwrap_err();
        assert!(matches!(err, GraphError::EndpointIdentityMismatch(ref a) if a == "C"));
        assert!(graph.get_edge("A", "C").is_none());
    }

    #[test]
    fn edge_built_from_another_graphs_node_is_rejected() {
        let mut graph = abc();
        let other = abc();
        let edge = Edge::between(other.get_node("A").unwrap(), other.get_node("C").unwrap(), false);

        assert!(matches!(
            graph.add_edge(edge),
            Err(GraphError::EndpointIdentityMismatch(_))
        ));
    }

    #[test]
    fn clone_forks_node_identity() {
        let graph = abc();
        let mut fork = graph.clone();
        assert_ne!(graph.id(), fork.id());

        let edge = Edge::between(graph.get_node("A").unwrap(), graph.get_node("C").unwrap(), false);
        assert!(matches!(
            fork.add_edge(edge),
            Err(GraphError::EndpointIdentityMismatch(_))
        ));
        fork.connect("A", "C", false).unwrap();
        assert!(graph.get_edge("A", "C").is_none());
    }

    // === Scenario: edge removal ===

    #[test]
    fn remove_edge_updates_incoming_list() {
        let mut graph = abc();
        graph.remove_edge("A", "B").unwrap();

        assert!(graph.get_edge("A", "B").is_none());
        assert!(graph.get_node("B").unwrap().causes().is_empty());
        assert!(graph.get_edge("B", "C").is_some());
        assert_eq!(graph.get_node("C").unwrap().causes(), [EdgeKey::new("B", "C")]);
    }

    #[test]
    fn removing_missing_edge_fails() {
        let mut graph = abc();
        let err = graph.remove_edge("A", "C").unwrap_err();
        assert!(matches!(err, GraphError::EdgeNotFound(ref k) if k == &EdgeKey::new("A", "C")));
    }

    #[test]
    fn ordered_edges_follow_effect_order() {
        let mut graph = abc();
        graph.connect("A", "C", false).unwrap();
        let keys: Vec<String> = graph.ordered_edges().iter().map(|e| e.key().to_string()).collect();
        assert_eq!(keys, vec!["A->B", "B->C", "A->C"]);
        assert_eq!(graph.incoming("C").len(), 2);
    }

    #[test]
    fn seeded_edge_graph() {
        let graph = DebateGraph::edge_with_endpoints("cause", "effect").unwrap();
        assert_eq!(graph.node_count(), 2);
        assert!(graph.get_edge("cause", "effect").is_some());
    }

    // === Scenario: rebuttal satellites ===

    #[test]
    fn satellites_require_existing_targets() {
        let mut graph = abc();
        graph.add_node(Node::new("R", true)).unwrap();

        graph.add_node_rebuttal("A", NodeAspect::Importance, "R").unwrap();
        graph.add_edge_rebuttal("A", "B", EdgeAspect::Certainty, "R").unwrap();
        graph.add_counter_argument("C", "R").unwrap();
        graph.add_turn_argument("R").unwrap();

        assert!(matches!(
            graph.add_edge_rebuttal("A", "C", EdgeAspect::Uniqueness, "R"),
            Err(GraphError::DanglingReference { .. })
        ));
        assert!(matches!(
            graph.add_node_rebuttal("Z", NodeAspect::Uniqueness, "R"),
            Err(GraphError::DanglingReference { .. })
        ));
        assert!(matches!(
            graph.add_turn_argument("missing"),
            Err(GraphError::DanglingReference { .. })
        ));

        assert_eq!(graph.node_rebuttals().len(), 1);
        assert_eq!(graph.edge_rebuttals().len(), 1);
        assert_eq!(graph.counter_arguments().len(), 1);
        assert_eq!(graph.turn_arguments().len(), 1);
    }
}
