//! Iterative strengthening of one causal link
//!
//! Starting from a subgraph holding just the edge, each iteration shows the
//! oracle the working subgraph and its context and applies the single action
//! it proposes: add supporting content to an edge, or insert an intermediate
//! step between two arguments.

use crate::error::{EngineError, EngineResult};
use crate::graph::{DebateGraph, EdgeAspect, EdgeKey, EndpointRole, GraphError, Node};
use crate::oracle::{OracleClient, OracleRequest, Task};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Number of actions requested per enhancement run
pub const ENHANCEMENT_ITERATIONS: usize = 3;

/// Add content to one support list of an edge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StrengthenEdge {
    pub cause_argument: String,
    pub effect_argument: String,
    /// uniqueness or certainty
    pub enhancement_type: String,
    pub content: String,
}

/// Replace `cause -> effect` with `cause -> intermediate -> effect`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct InsertNode {
    pub cause_argument: String,
    pub effect_argument: String,
    pub intermediate_argument: String,
}

/// Wire shape of an `enhance_logic` answer: exactly one payload is expected
#[derive(Debug, Deserialize, JsonSchema)]
struct EnhancementActionWire {
    #[serde(default)]
    strengthen_edge: Option<StrengthenEdge>,
    #[serde(default)]
    insert_node: Option<InsertNode>,
}

/// One applied enhancement, recorded as the oracle proposed it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnhancementAction {
    StrengthenEdge(StrengthenEdge),
    InsertNode(InsertNode),
}

impl EnhancementAction {
    fn from_wire(wire: EnhancementActionWire) -> EngineResult<Self> {
        match (wire.strengthen_edge, wire.insert_node) {
            (Some(strengthen), None) => Ok(Self::StrengthenEdge(strengthen)),
            (None, Some(insert)) => Ok(Self::InsertNode(insert)),
            (None, None) => Err(EngineError::MalformedAction(
                "neither strengthen_edge nor insert_node is set".to_string(),
            )),
            (Some(_), Some(_)) => Err(EngineError::MalformedAction(
                "both strengthen_edge and insert_node are set".to_string(),
            )),
        }
    }

    /// Apply to `graph`; validation happens before any mutation
    pub fn apply(&self, graph: &mut DebateGraph) -> EngineResult<()> {
        match self {
            Self::StrengthenEdge(action) => {
                let aspect = match action.enhancement_type.as_str() {
                    "uniqueness" => EdgeAspect::Uniqueness,
                    "certainty" => EdgeAspect::Certainty,
                    other => {
                        return Err(EngineError::UnrecognizedEnhancementType(other.to_string()))
                    }
                };
                let edge = graph
                    .get_edge_mut(&action.cause_argument, &action.effect_argument)
                    .ok_or_else(|| {
                        GraphError::EdgeNotFound(EdgeKey::new(
                            action.cause_argument.as_str(),
                            action.effect_argument.as_str(),
                        ))
                    })?;
                edge.push_support(aspect, action.content.clone());
            }
            Self::InsertNode(action) => {
                let (cause, effect, intermediate) = (
                    action.cause_argument.as_str(),
                    action.effect_argument.as_str(),
                    action.intermediate_argument.as_str(),
                );
                if !graph.contains_node(cause) {
                    return Err(GraphError::DanglingEndpoint {
                        role: EndpointRole::Cause,
                        argument: cause.to_string(),
                    }
                    .into());
                }
                if !graph.contains_node(effect) {
                    return Err(GraphError::DanglingEndpoint {
                        role: EndpointRole::Effect,
                        argument: effect.to_string(),
                    }
                    .into());
                }
                if graph.get_edge(cause, effect).is_none() {
                    return Err(GraphError::EdgeNotFound(EdgeKey::new(cause, effect)).into());
                }
                if graph.contains_node(intermediate) {
                    return Err(GraphError::DuplicateNode(intermediate.to_string()).into());
                }

                graph.add_node(Node::new(intermediate, false))?;
                graph.remove_edge(cause, effect)?;
                graph.connect(cause, intermediate, false)?;
                graph.connect(intermediate, effect, false)?;
            }
        }
        Ok(())
    }
}

/// Actions taken and the subgraph they built
#[derive(Debug, Clone)]
pub struct EnhancementOutcome {
    pub actions: Vec<EnhancementAction>,
    pub subgraph: DebateGraph,
}

pub struct LogicEnhancer {
    client: OracleClient,
}

impl LogicEnhancer {
    pub fn new(client: OracleClient) -> Self {
        Self { client }
    }

    /// Strengthen the link `cause -> effect`, reasoning within `context`
    ///
    /// The link need not appear in `context`; the working subgraph is seeded
    /// from the two arguments alone. The context itself is only read; all
    /// changes land in the returned subgraph.
    pub async fn enhance(
        &self,
        context: &DebateGraph,
        cause: &str,
        effect: &str,
    ) -> EngineResult<EnhancementOutcome> {
        let mut subgraph = DebateGraph::edge_with_endpoints(cause, effect)?;
        let context_json = context.to_json()?;
        let mut actions = Vec::with_capacity(ENHANCEMENT_ITERATIONS);

        info!(cause, effect, "enhancing logic");
        for iteration in 1..=ENHANCEMENT_ITERATIONS {
            let wire: EnhancementActionWire = self
                .client
                .ask(
                    OracleRequest::new(Task::EnhanceLogic)
                        .with_input("debate_graph", context_json.as_str())
                        .with_input("target_debate_graph", subgraph.to_json()?),
                )
                .await?;
            let action = EnhancementAction::from_wire(wire)?;
            action.apply(&mut subgraph)?;
            debug!(iteration, ?action, "applied enhancement");
            actions.push(action);
        }

        Ok(EnhancementOutcome { actions, subgraph })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strengthen(kind: &str, content: &str) -> EnhancementAction {
        EnhancementAction::StrengthenEdge(StrengthenEdge {
            cause_argument: "A".to_string(),
            effect_argument: "B".to_string(),
            enhancement_type: kind.to_string(),
            content: content.to_string(),
        })
    }

    fn insert(cause: &str, effect: &str, intermediate: &str) -> EnhancementAction {
        EnhancementAction::InsertNode(InsertNode {
            cause_argument: cause.to_string(),
            effect_argument: effect.to_string(),
            intermediate_argument: intermediate.to_string(),
        })
    }

    #[test]
    fn strengthen_appends_to_named_list() {
        let mut graph = DebateGraph::edge_with_endpoints("A", "B").unwrap();
        strengthen("certainty", "measured twice").apply(&mut graph).unwrap();
        strengthen("uniqueness", "nothing else does it").apply(&mut graph).unwrap();

        let edge = graph.get_edge("A", "B").unwrap();
        assert_eq!(edge.certainty, vec!["measured twice"]);
        assert_eq!(edge.uniqueness, vec!["nothing else does it"]);
    }

    #[test]
    fn unknown_enhancement_type_is_rejected() {
        let mut graph = DebateGraph::edge_with_endpoints("A", "B").unwrap();
        let err = strengthen("importance", "x").apply(&mut graph).unwrap_err();
        assert!(matches!(
            err,
            EngineError::UnrecognizedEnhancementType(ref t) if t == "importance"
        ));
    }

    #[test]
    fn insert_splits_edge() {
        let mut graph = DebateGraph::edge_with_endpoints("A", "B").unwrap();
        insert("A", "B", "M").apply(&mut graph).unwrap();

        assert!(graph.get_edge("A", "B").is_none());
        assert!(graph.get_edge("A", "M").is_some());
        assert!(graph.get_edge("M", "B").is_some());
        assert_eq!(graph.get_node("B").unwrap().causes().len(), 1);
    }

    #[test]
    fn insert_rejects_existing_intermediate_without_mutating() {
        let mut graph = DebateGraph::edge_with_endpoints("A", "B").unwrap();
        let err = insert("A", "B", "A").apply(&mut graph).unwrap_err();

        assert!(matches!(err, EngineError::Graph(GraphError::DuplicateNode(_))));
        assert!(graph.get_edge("A", "B").is_some());
        assert_eq!(graph.node_count(), 2);
    }

    #[test]
    fn insert_on_missing_edge_fails() {
        let mut graph = DebateGraph::edge_with_endpoints("A", "B").unwrap();
        let err = insert("B", "A", "M").apply(&mut graph).unwrap_err();
        assert!(matches!(err, EngineError::Graph(GraphError::EdgeNotFound(_))));
    }

    #[test]
    fn wire_with_zero_or_two_payloads_is_malformed() {
        let none: EnhancementActionWire = serde_json::from_str("{}").unwrap();
        assert!(matches!(
            EnhancementAction::from_wire(none),
            Err(EngineError::MalformedAction(_))
        ));

        let both: EnhancementActionWire = serde_json::from_value(serde_json::json!({
            "strengthen_edge": {
                "cause_argument": "A", "effect_argument": "B",
                "enhancement_type": "certainty", "content": "x"
            },
            "insert_node": {
                "cause_argument": "A", "effect_argument": "B", "intermediate_argument": "M"
            }
        }))
        .unwrap();
        assert!(matches!(
            EnhancementAction::from_wire(both),
            Err(EngineError::MalformedAction(_))
        ));
    }

    #[test]
    fn actions_serialize_externally_tagged() {
        let value = serde_json::to_value(insert("A", "B", "M")).unwrap();
        assert_eq!(value["insert_node"]["intermediate_argument"], "M");
    }
}
