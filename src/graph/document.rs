//! JSON document form of a graph
//!
//! The document is the graph's persistence and transport format. Optional
//! lists are left out when empty and read back as empty when absent.

use super::debate::{DebateGraph, GraphError, GraphResult};
use super::edge::{Edge, EdgeAspect};
use super::node::{Node, NodeAspect};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NodeRecord {
    pub argument: String,
    #[serde(default)]
    pub is_rebuttal: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub importance: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub uniqueness: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub importance_rebuttals: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub uniqueness_rebuttals: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub cause: String,
    pub effect: String,
    #[serde(default)]
    pub is_rebuttal: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub certainty: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub uniqueness: Vec<String>,
    #[serde(
        default,
        rename = "certainty_rebuttal",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub certainty_rebuttals: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub uniqueness_rebuttals: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRebuttalRecord {
    pub target_argument: String,
    pub rebuttal_type: NodeAspect,
    pub rebuttal_argument: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRebuttalRecord {
    pub target_cause_argument: String,
    pub target_effect_argument: String,
    pub rebuttal_type: EdgeAspect,
    pub rebuttal_argument: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterArgumentRecord {
    pub rebuttal_argument: String,
    pub target_argument: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnArgumentRecord {
    pub rebuttal_argument: String,
}

/// Serialized graph
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GraphDocument {
    #[serde(default)]
    pub nodes: Vec<NodeRecord>,
    #[serde(default)]
    pub edges: Vec<EdgeRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub node_rebuttals: Vec<NodeRebuttalRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub edge_rebuttals: Vec<EdgeRebuttalRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub counter_argument_rebuttals: Vec<CounterArgumentRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub turn_argument_rebuttals: Vec<TurnArgumentRecord>,
}

impl GraphDocument {
    /// Sort every list so documents can be compared regardless of insertion order
    pub fn normalized(mut self) -> Self {
        self.nodes.sort_by(|a, b| a.argument.cmp(&b.argument));
        self.edges
            .sort_by(|a, b| (&a.cause, &a.effect).cmp(&(&b.cause, &b.effect)));
        self.node_rebuttals.sort_by(|a, b| {
            (&a.target_argument, a.rebuttal_type, &a.rebuttal_argument).cmp(&(
                &b.target_argument,
                b.rebuttal_type,
                &b.rebuttal_argument,
            ))
        });
        self.edge_rebuttals.sort_by(|a, b| {
            (
                &a.target_cause_argument,
                &a.target_effect_argument,
                a.rebuttal_type,
                &a.rebuttal_argument,
            )
                .cmp(&(
                    &b.target_cause_argument,
                    &b.target_effect_argument,
                    b.rebuttal_type,
                    &b.rebuttal_argument,
                ))
        });
        self.counter_argument_rebuttals.sort_by(|a, b| {
            (&a.target_argument, &a.rebuttal_argument)
                .cmp(&(&b.target_argument, &b.rebuttal_argument))
        });
        self.turn_argument_rebuttals
            .sort_by(|a, b| a.rebuttal_argument.cmp(&b.rebuttal_argument));
        self
    }
}

impl From<&Node> for NodeRecord {
    fn from(node: &Node) -> Self {
        Self {
            argument: node.argument().to_string(),
            is_rebuttal: node.is_rebuttal,
            importance: node.importance.clone(),
            uniqueness: node.uniqueness.clone(),
            importance_rebuttals: node.importance_rebuttals.clone(),
            uniqueness_rebuttals: node.uniqueness_rebuttals.clone(),
        }
    }
}

impl From<&Edge> for EdgeRecord {
    fn from(edge: &Edge) -> Self {
        Self {
            cause: edge.cause().to_string(),
            effect: edge.effect().to_string(),
            is_rebuttal: edge.is_rebuttal,
            certainty: edge.certainty.clone(),
            uniqueness: edge.uniqueness.clone(),
            certainty_rebuttals: edge.certainty_rebuttals.clone(),
            uniqueness_rebuttals: edge.uniqueness_rebuttals.clone(),
        }
    }
}

impl DebateGraph {
    pub fn to_document(&self) -> GraphDocument {
        GraphDocument {
            nodes: self.nodes().map(NodeRecord::from).collect(),
            edges: self.ordered_edges().into_iter().map(EdgeRecord::from).collect(),
            node_rebuttals: self
                .node_rebuttals()
                .iter()
                .map(|r| NodeRebuttalRecord {
                    target_argument: r.target.clone(),
                    rebuttal_type: r.kind,
                    rebuttal_argument: r.rebuttal.clone(),
                })
                .collect(),
            edge_rebuttals: self
                .edge_rebuttals()
                .iter()
                .map(|r| EdgeRebuttalRecord {
                    target_cause_argument: r.target.cause.clone(),
                    target_effect_argument: r.target.effect.clone(),
                    rebuttal_type: r.kind,
                    rebuttal_argument: r.rebuttal.clone(),
                })
                .collect(),
            counter_argument_rebuttals: self
                .counter_arguments()
                .iter()
                .map(|r| CounterArgumentRecord {
                    rebuttal_argument: r.rebuttal.clone(),
                    target_argument: r.target.clone(),
                })
                .collect(),
            turn_argument_rebuttals: self
                .turn_arguments()
                .iter()
                .map(|r| TurnArgumentRecord {
                    rebuttal_argument: r.rebuttal.clone(),
                })
                .collect(),
        }
    }

    /// Rebuild a graph from its document
    ///
    /// Order is fixed: nodes, edges, node rebuttals, edge rebuttals, counter
    /// arguments, turn arguments. The first unresolved reference aborts.
    pub fn from_document(document: &GraphDocument) -> GraphResult<Self> {
        let mut graph = Self::new();

        for record in &document.nodes {
            let mut node = Node::new(record.argument.clone(), record.is_rebuttal);
            node.importance = record.importance.clone();
            node.uniqueness = record.uniqueness.clone();
            node.importance_rebuttals = record.importance_rebuttals.clone();
            node.uniqueness_rebuttals = record.uniqueness_rebuttals.clone();
            graph.add_node(node)?;
        }

        for record in &document.edges {
            for endpoint in [&record.cause, &record.effect] {
                if !graph.contains_node(endpoint) {
                    return Err(GraphError::DanglingReference {
                        context: "edge",
                        reference: endpoint.clone(),
                    });
                }
            }
            graph.connect(&record.cause, &record.effect, record.is_rebuttal)?;
            if let Some(edge) = graph.get_edge_mut(&record.cause, &record.effect) {
                edge.certainty = record.certainty.clone();
                edge.uniqueness = record.uniqueness.clone();
                edge.certainty_rebuttals = record.certainty_rebuttals.clone();
                edge.uniqueness_rebuttals = record.uniqueness_rebuttals.clone();
            }
        }

        for record in &document.node_rebuttals {
            graph.add_node_rebuttal(
                &record.target_argument,
                record.rebuttal_type,
                &record.rebuttal_argument,
            )?;
        }
        for record in &document.edge_rebuttals {
            graph.add_edge_rebuttal(
                &record.target_cause_argument,
                &record.target_effect_argument,
                record.rebuttal_type,
                &record.rebuttal_argument,
            )?;
        }
        for record in &document.counter_argument_rebuttals {
            graph.add_counter_argument(&record.target_argument, &record.rebuttal_argument)?;
        }
        for record in &document.turn_argument_rebuttals {
            graph.add_turn_argument(&record.rebuttal_argument)?;
        }

        Ok(graph)
    }

    /// Serialize to a pretty-printed JSON document
    pub fn to_json(&self) -> GraphResult<String> {
        Ok(serde_json::to_string_pretty(&self.to_document())?)
    }

    pub fn from_json(json: &str) -> GraphResult<Self> {
        let document: GraphDocument = serde_json::from_str(json)?;
        Self::from_document(&document)
    }

    /// Compare node, edge, and rebuttal content, ignoring order and identity
    pub fn same_structure(&self, other: &DebateGraph) -> bool {
        self.to_document().normalized() == other.to_document().normalized()
    }
}

/// JSON fragment for a single node
pub fn node_to_json(node: &Node) -> GraphResult<String> {
    Ok(serde_json::to_string(&NodeRecord::from(node))?)
}

/// JSON fragment for a single edge
pub fn edge_to_json(edge: &Edge) -> GraphResult<String> {
    Ok(serde_json::to_string(&EdgeRecord::from(edge))?)
}
