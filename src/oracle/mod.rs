//! Oracle: the external reasoner behind every judgment call
//!
//! Algorithms never build prompt text. They hand the oracle a `Task`, named
//! inputs, and the JSON schema the answer must follow, then parse the answer
//! into typed structures before touching any graph.
//!
//! Two implementations:
//! - `SubprocessOracle`: spawns `llm-orc mcp serve` and sends MCP JSON-RPC (production)
//! - `MockOracle`: returns scripted responses (testing)

mod mock;
mod subprocess;

pub use mock::MockOracle;
pub use subprocess::SubprocessOracle;

use crate::cancel::CancellationToken;
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Kind of judgment requested; selects the template/ensemble on the oracle side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Task {
    FindRebuttals,
    FindRebuttalCauses,
    FindNewArguments,
    SplitParagraphs,
    CreateAnnotations,
    EnhanceLogic,
    SuggestImprovements,
    FindEvidenceRebuttals,
    FindImportanceRebuttals,
}

impl Task {
    pub const ALL: [Task; 9] = [
        Task::FindRebuttals,
        Task::FindRebuttalCauses,
        Task::FindNewArguments,
        Task::SplitParagraphs,
        Task::CreateAnnotations,
        Task::EnhanceLogic,
        Task::SuggestImprovements,
        Task::FindEvidenceRebuttals,
        Task::FindImportanceRebuttals,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FindRebuttals => "find_rebuttals",
            Self::FindRebuttalCauses => "find_rebuttal_causes",
            Self::FindNewArguments => "find_new_arguments",
            Self::SplitParagraphs => "split_paragraphs",
            Self::CreateAnnotations => "create_annotations",
            Self::EnhanceLogic => "enhance_logic",
            Self::SuggestImprovements => "suggest_improvements",
            Self::FindEvidenceRebuttals => "find_evidence_rebuttals",
            Self::FindImportanceRebuttals => "find_importance_rebuttals",
        }
    }
}

impl std::fmt::Display for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One question for the oracle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OracleRequest {
    pub task: Task,
    /// Named text or JSON inputs (graph documents, target arguments, paragraphs)
    pub inputs: BTreeMap<String, String>,
    /// JSON schema the response must conform to
    pub response_schema: serde_json::Value,
}

impl OracleRequest {
    pub fn new(task: Task) -> Self {
        Self {
            task,
            inputs: BTreeMap::new(),
            response_schema: serde_json::Value::Null,
        }
    }

    pub fn with_input(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.inputs.insert(name.into(), value.into());
        self
    }

    pub fn input(&self, name: &str) -> Option<&str> {
        self.inputs.get(name).map(String::as_str)
    }
}

/// Errors from oracle calls.
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    #[error("oracle not available: {0}")]
    Unavailable(String),
    #[error("ensemble not found: {0}")]
    EnsembleNotFound(String),
    #[error("invocation failed: {0}")]
    InvocationFailed(String),
    #[error("response parse error: {0}")]
    ParseError(String),
    #[error("oracle refused: {0}")]
    Refused(String),
    #[error("oracle call timed out after {0:?}")]
    Timeout(Duration),
    #[error("oracle call cancelled")]
    Cancelled,
}

/// Transport to a reasoning oracle.
///
/// Returns the raw JSON answer; schema conformance is checked by `OracleClient`.
#[async_trait]
pub trait Oracle: Send + Sync {
    /// Check if the oracle is reachable.
    async fn is_available(&self) -> bool;

    async fn consult(&self, request: &OracleRequest) -> Result<serde_json::Value, OracleError>;
}

/// Handle the algorithms use for every oracle call
///
/// Attaches the response schema, bounds each call by a timeout, races it
/// against cancellation, and parses the answer into `T`.
#[derive(Clone)]
pub struct OracleClient {
    oracle: Arc<dyn Oracle>,
    timeout: Duration,
    cancel: CancellationToken,
}

impl OracleClient {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);

    pub fn new(oracle: Arc<dyn Oracle>) -> Self {
        Self {
            oracle,
            timeout: Self::DEFAULT_TIMEOUT,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    pub async fn is_available(&self) -> bool {
        self.oracle.is_available().await
    }

    /// Ask one question and parse the answer as `T`
    pub async fn ask<T>(&self, request: OracleRequest) -> Result<T, OracleError>
    where
        T: DeserializeOwned + JsonSchema,
    {
        let mut request = request;
        request.response_schema = serde_json::to_value(schemars::schema_for!(T))
            .map_err(|e| OracleError::ParseError(format!("unserializable schema: {}", e)))?;

        if self.cancel.is_cancelled() {
            return Err(OracleError::Cancelled);
        }

        debug!(task = %request.task, inputs = request.inputs.len(), "consulting oracle");
        let value = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(OracleError::Cancelled),
            result = tokio::time::timeout(self.timeout, self.oracle.consult(&request)) => {
                match result {
                    Ok(answer) => answer?,
                    Err(_) => return Err(OracleError::Timeout(self.timeout)),
                }
            }
        };

        if let Some(reason) = value.get("refusal").and_then(|r| r.as_str()) {
            if !reason.is_empty() {
                return Err(OracleError::Refused(reason.to_string()));
            }
        }

        serde_json::from_value(value).map_err(|e| {
            OracleError::ParseError(format!(
                "{} response does not match its schema: {}",
                request.task, e
            ))
        })
    }
}

/// Extract a JSON object from oracle output.
///
/// Tries three strategies in order:
/// 1. Direct parse (response is pure JSON)
/// 2. Extract from a ```json fenced block
/// 3. Take the first `{` to last `}` span
pub(crate) fn extract_json(text: &str) -> Option<serde_json::Value> {
    let trimmed = text.trim();

    if let Ok(v) = serde_json::from_str::<serde_json::Value>(trimmed) {
        if v.is_object() {
            return Some(v);
        }
    }

    let fenced = ["```json", "```"].iter().find_map(|fence| {
        let start = trimmed.find(fence)? + fence.len();
        let rest = &trimmed[start..];
        rest.find("```").map(|end| &rest[..end])
    });
    if let Some(block) = fenced {
        if let Ok(v) = serde_json::from_str::<serde_json::Value>(block.trim()) {
            if v.is_object() {
                return Some(v);
            }
        }
    }

    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if start < end {
            if let Ok(v) = serde_json::from_str::<serde_json::Value>(&trimmed[start..=end]) {
                if v.is_object() {
                    return Some(v);
                }
            }
        }
    }

    None
}
