//! Rebuttal proposals against a target subgraph
//!
//! Collects what the oracle would say against each edge and against the
//! importance of the subgraph's claims, without touching either graph.

use crate::error::EngineResult;
use crate::graph::{edge_to_json, node_to_json, DebateGraph, EdgeAspect, NodeAspect};
use crate::oracle::{OracleClient, OracleRequest, Task};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[derive(Debug, Deserialize, JsonSchema)]
struct EvidenceRebuttals {
    #[serde(default)]
    rebuttals: Vec<EvidenceRebuttal>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct EvidenceRebuttal {
    /// certainty or uniqueness
    rebuttal_type: String,
    rebuttal: String,
}

/// Importance rebuttals grouped by which side's world they argue from
#[derive(Debug, Deserialize, JsonSchema)]
struct ImportanceRebuttals {
    #[serde(default)]
    status_quo: Vec<ImportanceRebuttal>,
    #[serde(default)]
    affirmative_plan: Vec<ImportanceRebuttal>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct ImportanceRebuttal {
    target_argument: String,
    rebuttal: String,
}

/// One proposed rebuttal
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "target_type", rename_all = "snake_case")]
pub enum RebuttalProposal {
    Edge {
        target_cause_argument: String,
        target_effect_argument: String,
        rebuttal_type: EdgeAspect,
        rebuttal: String,
    },
    Node {
        target_argument: String,
        rebuttal_type: NodeAspect,
        rebuttal: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProposalReport {
    pub proposals: Vec<RebuttalProposal>,
    pub edges_scanned: usize,
    /// Edges whose evidence query failed
    pub edges_skipped: usize,
    /// Items with an unknown kind, an unknown target, or no text
    pub items_skipped: usize,
}

pub struct ProposalAggregator {
    client: OracleClient,
}

impl ProposalAggregator {
    pub fn new(client: OracleClient) -> Self {
        Self { client }
    }

    /// Propose rebuttals against `target`, reasoning within `context`
    pub async fn propose(
        &self,
        context: &DebateGraph,
        target: &DebateGraph,
    ) -> EngineResult<ProposalReport> {
        let mut report = ProposalReport::default();
        let context_json = context.to_json()?;

        info!(edges = target.edge_count(), "finding evidence rebuttals");
        for edge in target.ordered_edges() {
            report.edges_scanned += 1;
            let endpoints = (target.get_node(edge.cause()), target.get_node(edge.effect()));
            let (cause, effect) = match endpoints {
                (Some(cause), Some(effect)) => (cause, effect),
                _ => {
                    warn!(edge = %edge.key(), "edge endpoints missing from target graph");
                    report.edges_skipped += 1;
                    continue;
                }
            };
            let request = OracleRequest::new(Task::FindEvidenceRebuttals)
                .with_input("debate_graph", context_json.as_str())
                .with_input("target_cause_node", node_to_json(cause)?)
                .with_input("target_effect_node", node_to_json(effect)?)
                .with_input("target_edge", edge_to_json(edge)?);

            let found: EvidenceRebuttals = match self.client.ask(request).await {
                Ok(found) => found,
                Err(e) => {
                    warn!(
                        edge = %edge.key(),
                        error = %e,
                        "evidence rebuttal query failed, skipping edge"
                    );
                    report.edges_skipped += 1;
                    continue;
                }
            };

            for item in found.rebuttals {
                let Some(kind) = EdgeAspect::parse(&item.rebuttal_type) else {
                    warn!(
                        edge = %edge.key(),
                        rebuttal_type = %item.rebuttal_type,
                        "unrecognized rebuttal type"
                    );
                    report.items_skipped += 1;
                    continue;
                };
                if item.rebuttal.trim().is_empty() {
                    report.items_skipped += 1;
                    continue;
                }
                report.proposals.push(RebuttalProposal::Edge {
                    target_cause_argument: edge.cause().to_string(),
                    target_effect_argument: edge.effect().to_string(),
                    rebuttal_type: kind,
                    rebuttal: item.rebuttal,
                });
            }
        }

        info!("finding importance rebuttals");
        let found: ImportanceRebuttals = self
            .client
            .ask(
                OracleRequest::new(Task::FindImportanceRebuttals)
                    .with_input("debate_graph", context_json.as_str())
                    .with_input("target_debate_graph", target.to_json()?),
            )
            .await?;

        for item in found.status_quo.into_iter().chain(found.affirmative_plan) {
            if !target.contains_node(&item.target_argument) {
                warn!(
                    target = %item.target_argument,
                    "importance rebuttal targets unknown argument"
                );
                report.items_skipped += 1;
                continue;
            }
            if item.rebuttal.trim().is_empty() {
                report.items_skipped += 1;
                continue;
            }
            report.proposals.push(RebuttalProposal::Node {
                target_argument: item.target_argument,
                rebuttal_type: NodeAspect::Importance,
                rebuttal: item.rebuttal,
            });
        }

        info!(
            proposals = report.proposals.len(),
            edges_skipped = report.edges_skipped,
            items_skipped = report.items_skipped,
            "proposal complete"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proposals_serialize_with_target_tag() {
        let proposal = RebuttalProposal::Edge {
            target_cause_argument: "A".to_string(),
            target_effect_argument: "B".to_string(),
            rebuttal_type: EdgeAspect::Certainty,
            rebuttal: "weak link".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&proposal).unwrap(),
            serde_json::json!({
                "target_type": "edge",
                "target_cause_argument": "A",
                "target_effect_argument": "B",
                "rebuttal_type": "certainty",
                "rebuttal": "weak link"
            })
        );
    }
}
