//! Rebuttal items proposed by the oracle and how they bind to a graph

use crate::error::{EngineError, EngineResult};
use crate::graph::{DebateGraph, EdgeAspect, EdgeKey, NodeAspect};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Wire shape of a `find_rebuttals` answer
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub(crate) struct FoundRebuttals {
    #[serde(default)]
    pub rebuttals: Vec<RebuttalItemWire>,
}

/// One tagged rebuttal item; exactly the payload named by `rebuttal_kind` is read
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub(crate) struct RebuttalItemWire {
    /// edge_rebuttal, node_rebuttal, counter_argument, or turn_argument
    pub rebuttal_kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge_rebuttal: Option<EdgeRebuttalWire>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_rebuttal: Option<NodeRebuttalWire>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counter_argument: Option<CounterArgumentWire>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turn_argument: Option<TurnArgumentWire>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub(crate) struct EdgeRebuttalWire {
    /// certainty or uniqueness
    pub rebuttal_type: String,
    pub target_edge_cause: String,
    pub target_edge_effect: String,
    #[serde(default)]
    pub certainty_rebuttal: String,
    #[serde(default)]
    pub uniqueness_rebuttal: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub(crate) struct NodeRebuttalWire {
    /// importance or uniqueness
    pub rebuttal_type: String,
    pub target_node: String,
    #[serde(default)]
    pub importance_rebuttal: String,
    #[serde(default)]
    pub uniqueness_rebuttal: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub(crate) struct CounterArgumentWire {
    pub target_node: String,
    pub argument: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub(crate) struct TurnArgumentWire {
    #[serde(default)]
    pub target_cause_nodes: Vec<String>,
    pub effect_argument: String,
}

/// A rebuttal the oracle found in a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RebuttalItem {
    /// Attacks the importance or uniqueness of a node
    Node {
        target: String,
        kind: NodeAspect,
        argument: String,
    },
    /// Attacks the certainty or uniqueness of an edge
    Edge {
        target: EdgeKey,
        kind: EdgeAspect,
        argument: String,
    },
    /// Asserts the opposite of a node
    CounterArgument { target: String, argument: String },
    /// Concedes the listed causes and argues a different effect
    Turn {
        conceded: Vec<String>,
        argument: String,
    },
}

fn require_text(text: String, what: &str) -> EngineResult<String> {
    if text.trim().is_empty() {
        Err(EngineError::MalformedRebuttal(format!("{} is empty", what)))
    } else {
        Ok(text)
    }
}

impl RebuttalItem {
    pub(crate) fn from_wire(wire: RebuttalItemWire) -> EngineResult<Self> {
        let missing =
            |kind: &str| EngineError::MalformedRebuttal(format!("{} item without payload", kind));

        match wire.rebuttal_kind.as_str() {
            "edge_rebuttal" => {
                let payload = wire.edge_rebuttal.ok_or_else(|| missing("edge_rebuttal"))?;
                let kind = EdgeAspect::parse(&payload.rebuttal_type).ok_or_else(|| {
                    EngineError::UnrecognizedRebuttalKind {
                        field: "edge rebuttal type",
                        value: payload.rebuttal_type.clone(),
                    }
                })?;
                let text = match kind {
                    EdgeAspect::Certainty => payload.certainty_rebuttal,
                    EdgeAspect::Uniqueness => payload.uniqueness_rebuttal,
                };
                Ok(Self::Edge {
                    target: EdgeKey::new(payload.target_edge_cause, payload.target_edge_effect),
                    kind,
                    argument: require_text(text, "edge rebuttal argument")?,
                })
            }
            "node_rebuttal" => {
                let payload = wire.node_rebuttal.ok_or_else(|| missing("node_rebuttal"))?;
                let kind = NodeAspect::parse(&payload.rebuttal_type).ok_or_else(|| {
                    EngineError::UnrecognizedRebuttalKind {
                        field: "node rebuttal type",
                        value: payload.rebuttal_type.clone(),
                    }
                })?;
                let text = match kind {
                    NodeAspect::Importance => payload.importance_rebuttal,
                    NodeAspect::Uniqueness => payload.uniqueness_rebuttal,
                };
                Ok(Self::Node {
                    target: payload.target_node,
                    kind,
                    argument: require_text(text, "node rebuttal argument")?,
                })
            }
            "counter_argument" => {
                let payload = wire.counter_argument.ok_or_else(|| missing("counter_argument"))?;
                Ok(Self::CounterArgument {
                    target: payload.target_node,
                    argument: require_text(payload.argument, "counter argument")?,
                })
            }
            "turn_argument" => {
                let payload = wire.turn_argument.ok_or_else(|| missing("turn_argument"))?;
                Ok(Self::Turn {
                    conceded: payload.target_cause_nodes,
                    argument: require_text(payload.effect_argument, "turn argument")?,
                })
            }
            other => Err(EngineError::UnrecognizedRebuttalKind {
                field: "rebuttal kind",
                value: other.to_string(),
            }),
        }
    }

    /// Text of the rebuttal node this item introduces
    pub fn argument(&self) -> &str {
        match self {
            Self::Node { argument, .. }
            | Self::Edge { argument, .. }
            | Self::CounterArgument { argument, .. }
            | Self::Turn { argument, .. } => argument,
        }
    }

    /// Check that the target exists
    ///
    /// Node targets may also be rebuttal arguments in `introduced`: nodes an
    /// earlier item of the same answer will create.
    pub fn resolve(&self, graph: &DebateGraph, introduced: &[&str]) -> EngineResult<()> {
        match self {
            Self::Node { target, .. } | Self::CounterArgument { target, .. } => {
                if !graph.contains_node(target) && !introduced.contains(&target.as_str()) {
                    return Err(EngineError::UnresolvedRebuttalTarget(target.clone()));
                }
            }
            Self::Edge { target, .. } => {
                if graph.get_edge(&target.cause, &target.effect).is_none() {
                    return Err(EngineError::UnresolvedRebuttalTarget(target.to_string()));
                }
            }
            Self::Turn { .. } => {}
        }
        Ok(())
    }

    /// Add the rebuttal node (if new) and its satellite record
    ///
    /// The target is resolved before anything is written, so a failed
    /// install leaves the graph untouched. Returns true when the rebuttal
    /// node was created rather than reused.
    pub fn install(&self, graph: &mut DebateGraph) -> EngineResult<bool> {
        self.resolve(graph, &[])?;
        if let Self::Turn { conceded, .. } = self {
            debug!(conceded = conceded.len(), "turn argument concedes causes");
        }

        let created = graph.ensure_node(self.argument(), true)?;
        match self {
            Self::Node {
                target,
                kind,
                argument,
            } => graph.add_node_rebuttal(target, *kind, argument)?,
            Self::Edge {
                target,
                kind,
                argument,
            } => graph.add_edge_rebuttal(&target.cause, &target.effect, *kind, argument)?,
            Self::CounterArgument { target, argument } => {
                graph.add_counter_argument(target, argument)?
            }
            Self::Turn { argument, .. } => graph.add_turn_argument(argument)?,
        }
        debug!(argument = %self.argument(), created, "installed rebuttal");
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Node;
    use serde_json::json;

    fn wire(value: serde_json::Value) -> RebuttalItemWire {
        serde_json::from_value(value).unwrap()
    }

    fn graph() -> DebateGraph {
        DebateGraph::edge_with_endpoints("Tax cut", "Growth").unwrap()
    }

    // === Scenario: decoding tagged items ===

    #[test]
    fn edge_rebuttal_picks_text_by_type() {
        let item = RebuttalItem::from_wire(wire(json!({
            "rebuttal_kind": "edge_rebuttal",
            "edge_rebuttal": {
                "rebuttal_type": "uniqueness",
                "target_edge_cause": "Tax cut",
                "target_edge_effect": "Growth",
                "certainty_rebuttal": "",
                "uniqueness_rebuttal": "Growth happens anyway"
            }
        })))
        .unwrap();

        assert_eq!(
            item,
            RebuttalItem::Edge {
                target: EdgeKey::new("Tax cut", "Growth"),
                kind: EdgeAspect::Uniqueness,
                argument: "Growth happens anyway".to_string(),
            }
        );
    }

    #[test]
    fn node_rebuttal_decodes() {
        let item = RebuttalItem::from_wire(wire(json!({
            "rebuttal_kind": "node_rebuttal",
            "node_rebuttal": {
                "rebuttal_type": "importance",
                "target_node": "Growth",
                "importance_rebuttal": "Growth is marginal"
            }
        })))
        .unwrap();
        assert_eq!(item.argument(), "Growth is marginal");
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let err =
            RebuttalItem::from_wire(wire(json!({"rebuttal_kind": "ad_hominem"}))).unwrap_err();
        assert!(matches!(
            err,
            EngineError::UnrecognizedRebuttalKind { ref value, .. } if value == "ad_hominem"
        ));
    }

    #[test]
    fn unknown_edge_rebuttal_type_is_rejected() {
        let err = RebuttalItem::from_wire(wire(json!({
            "rebuttal_kind": "edge_rebuttal",
            "edge_rebuttal": {
                "rebuttal_type": "importance",
                "target_edge_cause": "Tax cut",
                "target_edge_effect": "Growth",
                "certainty_rebuttal": "x"
            }
        })))
        .unwrap_err();
        assert!(matches!(err, EngineError::UnrecognizedRebuttalKind { .. }));
    }

    #[test]
    fn missing_payload_or_text_is_malformed() {
        let err = RebuttalItem::from_wire(wire(json!({"rebuttal_kind": "counter_argument"})))
            .unwrap_err();
        assert!(matches!(err, EngineError::MalformedRebuttal(_)));

        let err = RebuttalItem::from_wire(wire(json!({
            "rebuttal_kind": "turn_argument",
            "turn_argument": { "target_cause_nodes": ["Tax cut"], "effect_argument": "  " }
        })))
        .unwrap_err();
        assert!(matches!(err, EngineError::MalformedRebuttal(_)));
    }

    // === Scenario: installing into a graph ===

    #[test]
    fn install_each_kind() {
        let mut graph = graph();
        let items = [
            RebuttalItem::Node {
                target: "Growth".to_string(),
                kind: NodeAspect::Importance,
                argument: "Growth is marginal".to_string(),
            },
            RebuttalItem::Edge {
                target: EdgeKey::new("Tax cut", "Growth"),
                kind: EdgeAspect::Certainty,
                argument: "Cuts are saved, not spent".to_string(),
            },
            RebuttalItem::CounterArgument {
                target: "Growth".to_string(),
                argument: "The economy shrinks".to_string(),
            },
            RebuttalItem::Turn {
                conceded: vec!["Tax cut".to_string()],
                argument: "Deficits grow".to_string(),
            },
        ];
        for item in &items {
            assert!(item.install(&mut graph).unwrap());
        }

        assert_eq!(graph.node_count(), 6);
        assert!(graph.get_node("Deficits grow").unwrap().is_rebuttal);
        assert_eq!(graph.node_rebuttals().len(), 1);
        assert_eq!(graph.edge_rebuttals().len(), 1);
        assert_eq!(graph.counter_arguments().len(), 1);
        assert_eq!(graph.turn_arguments().len(), 1);
    }

    #[test]
    fn existing_argument_is_reused() {
        let mut graph = graph();
        graph.add_node(Node::new("Growth is marginal", false)).unwrap();
        let item = RebuttalItem::Node {
            target: "Growth".to_string(),
            kind: NodeAspect::Uniqueness,
            argument: "Growth is marginal".to_string(),
        };

        assert!(!item.install(&mut graph).unwrap());
        assert_eq!(graph.node_count(), 3);
        assert!(!graph.get_node("Growth is marginal").unwrap().is_rebuttal);
        assert_eq!(graph.node_rebuttals().len(), 1);
    }

    #[test]
    fn unresolved_target_leaves_graph_untouched() {
        let mut graph = graph();
        let item = RebuttalItem::Edge {
            target: EdgeKey::new("Growth", "Tax cut"),
            kind: EdgeAspect::Certainty,
            argument: "Reverse causation".to_string(),
        };

        let err = item.install(&mut graph).unwrap_err();
        assert!(matches!(
            err,
            EngineError::UnresolvedRebuttalTarget(ref t) if t == "Growth->Tax cut"
        ));
        assert!(graph.get_node("Reverse causation").is_none());
    }

    #[test]
    fn node_target_may_be_introduced_by_an_earlier_item() {
        let graph = graph();
        let item = RebuttalItem::CounterArgument {
            target: "Growth is marginal".to_string(),
            argument: "Growth is substantial".to_string(),
        };

        assert!(item.resolve(&graph, &[]).is_err());
        assert!(item.resolve(&graph, &["Growth is marginal"]).is_ok());
    }
}
