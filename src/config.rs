//! YAML configuration
//!
//! Loaded from `<config_dir>/agora/config.yaml` unless a path is given.
//! Every field has a default, so a missing file or a partial file is fine.

use crate::oracle::Task;
use crate::rebuttal::ExpansionConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// How rebuttal documents are split into paragraphs for annotation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitterKind {
    /// Paragraph blocks of the Markdown structure
    #[default]
    Markdown,
    /// Ask the oracle (`split_paragraphs`)
    Oracle,
}

/// llm-orc connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    /// Path to the llm-orc executable
    pub command: String,
    /// Working directory for llm-orc (where its ensembles live)
    pub project_dir: Option<PathBuf>,
    pub timeout_seconds: u64,
    /// Agent whose response is the answer, for multi-agent ensembles
    pub agent: Option<String>,
    /// Ensemble per task; unlisted tasks use `agora-<task>`
    pub ensembles: BTreeMap<Task, String>,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            command: "llm-orc".to_string(),
            project_dir: None,
            timeout_seconds: 600,
            agent: None,
            ensembles: BTreeMap::new(),
        }
    }
}

impl OracleConfig {
    pub fn ensemble_for(&self, task: Task) -> String {
        self.ensembles
            .get(&task)
            .cloned()
            .unwrap_or_else(|| format!("agora-{}", task.as_str().replace('_', "-")))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgoraConfig {
    pub oracle: OracleConfig,
    pub expansion: ExpansionConfig,
    pub splitter: SplitterKind,
}

impl AgoraConfig {
    /// `<config_dir>/agora/config.yaml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("agora").join("config.yaml"))
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        // An empty file parses as null
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml(&yaml)
    }

    /// Load an explicit path, or the default path if it exists
    ///
    /// An explicit path must exist; a missing default file yields defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::load(&path),
                _ => Ok(Self::default()),
            },
        }
    }
}
