//! Improvement to-do list for a subgraph
//!
//! Asks the oracle, once, what would most strengthen a target subgraph and
//! returns the suggestions as a titled list. Nothing is applied.

use super::logic::{InsertNode, StrengthenEdge};
use crate::error::EngineResult;
use crate::graph::DebateGraph;
use crate::oracle::{OracleClient, OracleRequest, Task};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Add supporting content to a node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StrengthenNode {
    pub target_argument: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImprovementStep {
    StrengthenEdge(StrengthenEdge),
    StrengthenNode(StrengthenNode),
    InsertNode(InsertNode),
}

/// One suggestion; serializes as `{"title": .., "<step kind>": {..}}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImprovementTodo {
    pub title: String,
    #[serde(flatten)]
    pub step: ImprovementStep,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct TodoSuggestions {
    #[serde(default)]
    todo: Vec<TodoWire>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct TodoWire {
    title: String,
    #[serde(default)]
    strengthen_edge: Option<StrengthenEdge>,
    #[serde(default)]
    strengthen_node: Option<StrengthenNode>,
    #[serde(default)]
    insert_node: Option<InsertNode>,
}

impl TodoWire {
    fn into_todo(self) -> Result<ImprovementTodo, (String, usize)> {
        let step = match (self.strengthen_edge, self.strengthen_node, self.insert_node) {
            (Some(edge), None, None) => ImprovementStep::StrengthenEdge(edge),
            (None, Some(node), None) => ImprovementStep::StrengthenNode(node),
            (None, None, Some(insert)) => ImprovementStep::InsertNode(insert),
            (edge, node, insert) => {
                let payloads = [edge.is_some(), node.is_some(), insert.is_some()]
                    .iter()
                    .filter(|set| **set)
                    .count();
                return Err((self.title, payloads));
            }
        };
        Ok(ImprovementTodo {
            title: self.title,
            step,
        })
    }
}

pub struct ImprovementPlanner {
    client: OracleClient,
}

impl ImprovementPlanner {
    pub fn new(client: OracleClient) -> Self {
        Self { client }
    }

    /// Suggest improvements to `target`, reasoning within `context`
    pub async fn plan(
        &self,
        context: &DebateGraph,
        target: &DebateGraph,
    ) -> EngineResult<Vec<ImprovementTodo>> {
        let suggestions: TodoSuggestions = self
            .client
            .ask(
                OracleRequest::new(Task::SuggestImprovements)
                    .with_input("debate_graph", context.to_json()?)
                    .with_input("target_debate_graph", target.to_json()?),
            )
            .await?;

        let mut todos = Vec::with_capacity(suggestions.todo.len());
        for wire in suggestions.todo {
            match wire.into_todo() {
                Ok(todo) => todos.push(todo),
                Err((title, payloads)) => {
                    warn!(%title, payloads, "dropping suggestion without exactly one step");
                }
            }
        }
        info!(suggestions = todos.len(), "improvement plan ready");
        Ok(todos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn todo_serializes_flat() {
        let todo = ImprovementTodo {
            title: "Back the claim".to_string(),
            step: ImprovementStep::StrengthenNode(StrengthenNode {
                target_argument: "A".to_string(),
                content: "cite the survey".to_string(),
            }),
        };
        assert_eq!(
            serde_json::to_value(&todo).unwrap(),
            json!({
                "title": "Back the claim",
                "strengthen_node": { "target_argument": "A", "content": "cite the survey" }
            })
        );
    }

    #[test]
    fn wire_needs_exactly_one_step() {
        let empty: TodoWire = serde_json::from_value(json!({"title": "nothing"})).unwrap();
        assert_eq!(empty.into_todo().unwrap_err(), ("nothing".to_string(), 0));

        let two: TodoWire = serde_json::from_value(json!({
            "title": "two",
            "strengthen_node": { "target_argument": "A", "content": "x" },
            "insert_node": {
                "cause_argument": "A",
                "effect_argument": "B",
                "intermediate_argument": "M"
            }
        }))
        .unwrap();
        assert_eq!(two.into_todo().unwrap_err().1, 2);
    }
}
