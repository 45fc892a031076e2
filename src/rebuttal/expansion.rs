//! Graph expansion for an incoming rebuttal document
//!
//! Three phases:
//! 1. Install every rebuttal item the oracle finds in the document.
//! 2. Breadth-first over newly created rebuttal nodes: ask what causes each
//!    one, create the new arguments among those causes, and wire the causes
//!    that already exist as rebuttal edges into it.
//! 3. Annotate the grown graph paragraph by paragraph.
//!
//! Each oracle answer is fully parsed and validated before it is applied, so
//! an error leaves every earlier step committed and the failing step unapplied.

use super::annotation::{Annotation, LogicAnnotations};
use super::item::{FoundRebuttals, RebuttalItem};
use crate::error::EngineResult;
use crate::graph::{DebateGraph, EndpointRole, GraphError};
use crate::oracle::{OracleClient, OracleRequest, Task};
use crate::splitter::{DocumentSplitter, MarkdownSplitter};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpansionConfig {
    /// Upper bound on nodes expanded in the breadth-first phase
    pub max_visited_nodes: usize,
}

impl Default for ExpansionConfig {
    fn default() -> Self {
        Self {
            max_visited_nodes: 64,
        }
    }
}

/// What an expansion run changed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExpansionReport {
    pub rebuttals_installed: usize,
    pub nodes_created: usize,
    pub nodes_reused: usize,
    pub edges_added: usize,
    pub nodes_visited: usize,
    pub annotations_applied: usize,
    pub annotations_discarded: usize,
    pub annotations_skipped: usize,
    /// The visit cap stopped the breadth-first phase with work queued
    pub truncated: bool,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct FoundCauses {
    #[serde(default)]
    causes: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ArgumentAndCauses<'a> {
    argument: &'a str,
    causes: &'a [String],
}

#[derive(Debug, Deserialize, JsonSchema)]
struct NewArguments {
    /// Causes that are not yet nodes and should become rebuttal nodes
    #[serde(default)]
    new_nodes: Vec<String>,
    /// Causes to wire as rebuttal edges into the current node
    #[serde(default)]
    used_causes: Vec<String>,
}

pub struct ExpansionEngine {
    client: OracleClient,
    splitter: Arc<dyn DocumentSplitter>,
    config: ExpansionConfig,
}

impl ExpansionEngine {
    pub fn new(client: OracleClient) -> Self {
        Self {
            client,
            splitter: Arc::new(MarkdownSplitter),
            config: ExpansionConfig::default(),
        }
    }

    pub fn with_splitter(mut self, splitter: Arc<dyn DocumentSplitter>) -> Self {
        self.splitter = splitter;
        self
    }

    pub fn with_config(mut self, config: ExpansionConfig) -> Self {
        self.config = config;
        self
    }

    /// Grow `graph` with the rebuttals found in `rebuttal`
    pub async fn expand(
        &self,
        graph: &mut DebateGraph,
        rebuttal: &str,
    ) -> EngineResult<ExpansionReport> {
        let mut report = ExpansionReport::default();

        info!(nodes = graph.node_count(), edges = graph.edge_count(), "finding rebuttals");
        let found: FoundRebuttals = self
            .client
            .ask(
                OracleRequest::new(Task::FindRebuttals)
                    .with_input("debate_graph", graph.to_json()?)
                    .with_input("rebuttal", rebuttal),
            )
            .await?;

        let items = found
            .rebuttals
            .into_iter()
            .map(RebuttalItem::from_wire)
            .collect::<EngineResult<Vec<_>>>()?;
        let mut introduced: Vec<&str> = Vec::with_capacity(items.len());
        for item in &items {
            item.resolve(graph, &introduced)?;
            introduced.push(item.argument());
        }

        let mut queue = VecDeque::new();
        for item in &items {
            let created = item.install(graph)?;
            report.rebuttals_installed += 1;
            if created {
                report.nodes_created += 1;
                queue.push_back(item.argument().to_string());
            } else {
                report.nodes_reused += 1;
            }
        }

        info!(queued = queue.len(), "expanding rebuttal causes");
        // Only newly created nodes are queued, so no node is expanded twice.
        while let Some(current) = queue.pop_front() {
            if report.nodes_visited >= self.config.max_visited_nodes {
                warn!(
                    cap = self.config.max_visited_nodes,
                    pending = queue.len() + 1,
                    "visit cap reached, stopping expansion"
                );
                report.truncated = true;
                break;
            }
            report.nodes_visited += 1;
            self.expand_node(graph, rebuttal, &current, &mut queue, &mut report)
                .await?;
        }

        self.annotate(graph, rebuttal, &mut report).await?;

        info!(
            installed = report.rebuttals_installed,
            created = report.nodes_created,
            edges = report.edges_added,
            annotations = report.annotations_applied,
            truncated = report.truncated,
            "expansion complete"
        );
        Ok(report)
    }

    async fn expand_node(
        &self,
        graph: &mut DebateGraph,
        rebuttal: &str,
        current: &str,
        queue: &mut VecDeque<String>,
        report: &mut ExpansionReport,
    ) -> EngineResult<()> {
        let found: FoundCauses = self
            .client
            .ask(
                OracleRequest::new(Task::FindRebuttalCauses)
                    .with_input("debate_graph", graph.to_json()?)
                    .with_input("rebuttal", rebuttal)
                    .with_input("target_argument", current),
            )
            .await?;

        let argument_and_causes = serde_json::to_string(&ArgumentAndCauses {
            argument: current,
            causes: &found.causes,
        })
        .map_err(GraphError::from)?;
        let decision: NewArguments = self
            .client
            .ask(
                OracleRequest::new(Task::FindNewArguments)
                    .with_input("debate_graph", graph.to_json()?)
                    .with_input("target_argument_and_causes", argument_and_causes),
            )
            .await?;
        debug!(
            argument = %current,
            candidates = found.causes.len(),
            new = decision.new_nodes.len(),
            used = decision.used_causes.len(),
            "cause decision"
        );

        for cause in &decision.used_causes {
            if !graph.contains_node(cause) && !decision.new_nodes.contains(cause) {
                return Err(GraphError::DanglingEndpoint {
                    role: EndpointRole::Cause,
                    argument: cause.clone(),
                }
                .into());
            }
        }

        for argument in &decision.new_nodes {
            if graph.ensure_node(argument, true)? {
                report.nodes_created += 1;
                queue.push_back(argument.clone());
            } else {
                debug!(argument = %argument, "new argument already in graph, reusing");
                report.nodes_reused += 1;
            }
        }
        for cause in &decision.used_causes {
            let before = graph.edge_count();
            graph.connect(cause, current, true)?;
            if graph.edge_count() > before {
                report.edges_added += 1;
            }
        }
        Ok(())
    }

    /// Ask for annotations on every paragraph, then apply them
    ///
    /// All paragraphs see the same graph; annotations are applied once every
    /// paragraph has been read.
    async fn annotate(
        &self,
        graph: &mut DebateGraph,
        rebuttal: &str,
        report: &mut ExpansionReport,
    ) -> EngineResult<()> {
        let paragraphs = self.splitter.split(rebuttal).await?;
        info!(paragraphs = paragraphs.len(), "annotating");

        let debate_graph = graph.to_json()?;
        let mut found = Vec::new();
        for paragraph in &paragraphs {
            let answer: LogicAnnotations = self
                .client
                .ask(
                    OracleRequest::new(Task::CreateAnnotations)
                        .with_input("debate_graph", debate_graph.as_str())
                        .with_input("rebuttal", rebuttal)
                        .with_input("target_paragraph", paragraph.as_str()),
                )
                .await?;
            found.extend(answer.annotations);
        }

        for wire in found {
            match Annotation::decode(wire) {
                Ok(Some(annotation)) => match annotation.apply(graph) {
                    Ok(()) => report.annotations_applied += 1,
                    Err(reason) => {
                        warn!(%reason, "skipping annotation");
                        report.annotations_skipped += 1;
                    }
                },
                Ok(None) => report.annotations_discarded += 1,
                Err(reason) => {
                    warn!(%reason, "skipping annotation");
                    report.annotations_skipped += 1;
                }
            }
        }
        Ok(())
    }
}
