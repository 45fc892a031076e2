//! Production oracle: llm-orc over MCP stdio
//!
//! Spawns `llm-orc mcp serve` once and keeps the session for the lifetime of
//! the oracle. Each request becomes a `tools/call` of the `invoke` tool with
//! the ensemble configured for the request's task; the request itself
//! (task, inputs, response schema) travels as the ensemble's input data.

use super::{extract_json, Oracle, OracleError, OracleRequest};
use crate::config::OracleConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

const PROTOCOL_VERSION: &str = "2024-11-05";

/// MCP JSON-RPC request
#[derive(Debug, Serialize)]
struct McpRequest<'a> {
    jsonrpc: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<u64>,
    method: &'a str,
    params: serde_json::Value,
}

/// MCP JSON-RPC response
#[derive(Debug, Deserialize)]
struct McpResponse {
    #[serde(default)]
    id: Option<u64>,
    #[serde(default)]
    result: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<McpError>,
}

#[derive(Debug, Deserialize)]
struct McpError {
    code: i64,
    message: String,
}

/// Result of invoking an llm-orc ensemble.
#[derive(Debug, Clone, Deserialize)]
struct InvokeResponse {
    /// Per-agent results (agent name → output)
    results: HashMap<String, AgentResult>,
    #[serde(default)]
    status: String,
}

/// Result from a single agent in an ensemble.
#[derive(Debug, Clone, Deserialize)]
struct AgentResult {
    #[serde(default)]
    response: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Live connection to an `llm-orc mcp serve` process
struct McpSession {
    process: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    request_id: u64,
    /// Set while a call is between its write and its matching response
    in_flight: bool,
}

impl McpSession {
    /// Start the MCP server process and complete the initialize handshake
    async fn start(command: &str, project_dir: Option<&Path>) -> Result<Self, OracleError> {
        let mut cmd = Command::new(command);
        cmd.args(["mcp", "serve"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true);
        if let Some(dir) = project_dir {
            cmd.current_dir(dir);
        }

        let process = cmd.spawn().map_err(|e| {
            OracleError::Unavailable(format!("failed to start {} mcp serve: {}", command, e))
        })?;
        let mut session = Self::attach(process)?;

        session
            .call(
                "initialize",
                serde_json::json!({
                    "protocolVersion": PROTOCOL_VERSION,
                    "capabilities": {},
                    "clientInfo": { "name": "agora", "version": crate::VERSION }
                }),
            )
            .await?;
        session
            .send(&McpRequest {
                jsonrpc: "2.0",
                id: None,
                method: "notifications/initialized",
                params: serde_json::json!({}),
            })
            .await?;

        info!(command, "llm-orc MCP session started");
        Ok(session)
    }

    /// Wrap a spawned process whose stdin and stdout are piped
    fn attach(mut process: Child) -> Result<Self, OracleError> {
        let stdin = process
            .stdin
            .take()
            .ok_or_else(|| OracleError::Unavailable("no stdin available".to_string()))?;
        let stdout = process
            .stdout
            .take()
            .ok_or_else(|| OracleError::Unavailable("no stdout available".to_string()))?;

        Ok(Self {
            process,
            stdin,
            stdout: BufReader::new(stdout),
            request_id: 0,
            in_flight: false,
        })
    }

    /// False once a call was dropped mid-exchange; its partial request or
    /// late response would corrupt the stream.
    fn is_reusable(&self) -> bool {
        !self.in_flight
    }

    async fn send(&mut self, request: &McpRequest<'_>) -> Result<(), OracleError> {
        let mut line = serde_json::to_string(request).map_err(|e| {
            OracleError::InvocationFailed(format!("failed to serialize request: {}", e))
        })?;
        line.push('\n');
        self.stdin
            .write_all(line.as_bytes())
            .await
            .map_err(|e| OracleError::InvocationFailed(format!("failed to write request: {}", e)))?;
        self.stdin
            .flush()
            .await
            .map_err(|e| OracleError::InvocationFailed(format!("failed to flush stdin: {}", e)))
    }

    /// Send a request and wait for the response carrying the same id
    ///
    /// Lines with other ids are server notifications and are skipped. The
    /// session stays marked in flight until the matching response is read.
    async fn call(
        &mut self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<serde_json::Value, OracleError> {
        self.request_id += 1;
        let id = self.request_id;
        self.in_flight = true;
        self.send(&McpRequest {
            jsonrpc: "2.0",
            id: Some(id),
            method,
            params,
        })
        .await?;

        loop {
            let mut line = String::new();
            let read = self.stdout.read_line(&mut line).await.map_err(|e| {
                OracleError::InvocationFailed(format!("failed to read response: {}", e))
            })?;
            if read == 0 {
                return Err(OracleError::Unavailable(
                    "llm-orc closed its output".to_string(),
                ));
            }
            if line.trim().is_empty() {
                continue;
            }

            let response: McpResponse = serde_json::from_str(&line)
                .map_err(|e| OracleError::ParseError(format!("invalid JSON-RPC message: {}", e)))?;
            if response.id != Some(id) {
                debug!(expected = id, got = ?response.id, "skipping unrelated MCP message");
                continue;
            }
            self.in_flight = false;
            if let Some(error) = response.error {
                return Err(OracleError::InvocationFailed(format!(
                    "MCP error {}: {}",
                    error.code, error.message
                )));
            }
            return response
                .result
                .ok_or_else(|| OracleError::InvocationFailed("empty MCP response".to_string()));
        }
    }
}

impl Drop for McpSession {
    fn drop(&mut self) {
        let _ = self.process.start_kill();
    }
}

/// Oracle backed by llm-orc ensembles
pub struct SubprocessOracle {
    config: OracleConfig,
    session: Mutex<Option<McpSession>>,
}

impl SubprocessOracle {
    pub fn new(config: OracleConfig) -> Self {
        Self {
            config,
            session: Mutex::new(None),
        }
    }
}

#[async_trait]
impl Oracle for SubprocessOracle {
    async fn is_available(&self) -> bool {
        let mut guard = self.session.lock().await;
        if guard.is_some() {
            return true;
        }
        match McpSession::start(&self.config.command, self.config.project_dir.as_deref()).await {
            Ok(session) => {
                *guard = Some(session);
                true
            }
            Err(e) => {
                warn!(error = %e, "llm-orc unavailable");
                false
            }
        }
    }

    async fn consult(&self, request: &OracleRequest) -> Result<serde_json::Value, OracleError> {
        let ensemble = self.config.ensemble_for(request.task);
        let input_data = serde_json::to_string(request).map_err(|e| {
            OracleError::InvocationFailed(format!("failed to encode request: {}", e))
        })?;
        let params = serde_json::json!({
            "name": "invoke",
            "arguments": {
                "ensemble_name": ensemble,
                "input_data": input_data
            }
        });

        let result = {
            let mut guard = self.session.lock().await;
            if guard.as_ref().is_some_and(|session| !session.is_reusable()) {
                warn!("previous call was interrupted, restarting llm-orc session");
                *guard = None;
            }
            if guard.is_none() {
                let session =
                    McpSession::start(&self.config.command, self.config.project_dir.as_deref())
                        .await?;
                *guard = Some(session);
            }
            let session = guard
                .as_mut()
                .ok_or_else(|| OracleError::Unavailable("no session available".to_string()))?;

            debug!(task = %request.task, ensemble = %ensemble, "invoking ensemble");
            match session.call("tools/call", params).await {
                Ok(result) => result,
                Err(e) => {
                    // The process may be wedged; start fresh next time.
                    *guard = None;
                    return Err(e);
                }
            }
        };

        answer_from_tool_result(&result, self.config.agent.as_deref(), &ensemble)
    }
}

/// Pull the oracle's JSON answer out of an MCP `tools/call` result
fn answer_from_tool_result(
    result: &serde_json::Value,
    agent: Option<&str>,
    ensemble: &str,
) -> Result<serde_json::Value, OracleError> {
    let text = tool_text(result);

    if result.get("isError").and_then(|v| v.as_bool()) == Some(true) {
        if text.contains("not found") {
            return Err(OracleError::EnsembleNotFound(format!("{}: {}", ensemble, text)));
        }
        return Err(OracleError::InvocationFailed(format!("{}: {}", ensemble, text)));
    }

    let parsed = extract_json(&text).ok_or_else(|| {
        OracleError::ParseError(format!("no JSON object in output of ensemble '{}'", ensemble))
    })?;
    if parsed.get("results").is_none() {
        return Ok(parsed);
    }

    let invoked: InvokeResponse = serde_json::from_value(parsed)
        .map_err(|e| OracleError::ParseError(format!("unexpected llm-orc result shape: {}", e)))?;
    if invoked.status == "failed" {
        return Err(OracleError::InvocationFailed(format!(
            "ensemble '{}' failed",
            ensemble
        )));
    }

    let response = agent_response(&invoked, agent, ensemble)?;
    extract_json(response).ok_or_else(|| {
        OracleError::ParseError(format!(
            "agent output of ensemble '{}' holds no JSON object",
            ensemble
        ))
    })
}

/// Concatenate the text content blocks of a tool result
fn tool_text(result: &serde_json::Value) -> String {
    match result.get("content").and_then(|c| c.as_array()) {
        Some(blocks) => blocks
            .iter()
            .filter_map(|b| b.get("text").and_then(|t| t.as_str()))
            .collect::<Vec<_>>()
            .join(""),
        None => match result.as_str() {
            Some(text) => text.to_string(),
            None => result.to_string(),
        },
    }
}

/// Pick the answering agent: the configured one, or the only one that succeeded
fn agent_response<'a>(
    invoked: &'a InvokeResponse,
    agent: Option<&str>,
    ensemble: &str,
) -> Result<&'a str, OracleError> {
    if let Some(name) = agent {
        let result = invoked.results.get(name).ok_or_else(|| {
            OracleError::ParseError(format!("ensemble '{}' has no agent '{}'", ensemble, name))
        })?;
        if let Some(error) = &result.error {
            return Err(OracleError::InvocationFailed(format!("agent '{}': {}", name, error)));
        }
        return result.response.as_deref().ok_or_else(|| {
            OracleError::InvocationFailed(format!("agent '{}' returned no response", name))
        });
    }

    let answered: Vec<&str> = invoked
        .results
        .values()
        .filter(|r| r.error.is_none())
        .filter_map(|r| r.response.as_deref())
        .collect();
    match answered.as_slice() {
        [only] => Ok(*only),
        [] => Err(OracleError::InvocationFailed(format!(
            "no agent of ensemble '{}' produced a response",
            ensemble
        ))),
        _ => Err(OracleError::ParseError(format!(
            "ensemble '{}' has several answering agents; set oracle.agent",
            ensemble
        ))),
    }
}
