//! Agora CLI: grow and inspect argument graphs.
//!
//! Usage:
//!   agora show <graph.json>
//!   agora expand <graph.json> <rebuttal.md> [--out path]
//!   agora enhance <graph.json> <cause> <effect> [--out path]
//!   agora propose <context.json> <target.json> [--out path]
//!   agora plan <context.json> <target.json> [--out path]

use agora::{
    AgoraConfig, CancellationToken, DebateGraph, DocumentSplitter, ExpansionEngine,
    ImprovementPlanner, LogicEnhancer, MarkdownSplitter, OracleClient, OracleSplitter,
    ProposalAggregator, SplitterKind, SubprocessOracle,
};
use clap::{Parser, Subcommand};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "agora",
    version,
    about = "Argument graph engine with oracle-driven rebuttal expansion"
)]
struct Cli {
    /// Path to config file (default: <config dir>/agora/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a graph in readable form
    Show {
        /// Graph document
        graph: PathBuf,
    },
    /// Grow a graph with the rebuttals found in a document
    Expand {
        /// Graph document
        graph: PathBuf,
        /// Rebuttal document (Markdown or plain text)
        rebuttal: PathBuf,
        /// Write the grown graph here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Strengthen one causal link of a graph
    Enhance {
        /// Context graph document
        graph: PathBuf,
        /// Cause argument of the link
        cause: String,
        /// Effect argument of the link
        effect: String,
        /// Write the actions and working subgraph here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// List rebuttals against a target subgraph
    Propose {
        /// Context graph document
        context: PathBuf,
        /// Target subgraph document
        target: PathBuf,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Suggest improvements to a target subgraph
    Plan {
        /// Context graph document
        context: PathBuf,
        /// Target subgraph document
        target: PathBuf,
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("AGORA_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_graph(path: &Path) -> Result<DebateGraph, String> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read '{}': {}", path.display(), e))?;
    DebateGraph::from_json(&json).map_err(|e| format!("invalid graph '{}': {}", path.display(), e))
}

fn write_output(out: Option<&Path>, json: &str) -> i32 {
    match out {
        Some(path) => match std::fs::write(path, json) {
            Ok(()) => {
                info!(path = %path.display(), "wrote output");
                0
            }
            Err(e) => {
                eprintln!("Error: cannot write '{}': {}", path.display(), e);
                1
            }
        },
        None => {
            println!("{}", json);
            0
        }
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("cannot serialize output: {}", e))
}

/// Build the oracle client and hook Ctrl-C to its cancellation token
fn oracle_client(config: &AgoraConfig) -> OracleClient {
    let token = CancellationToken::new();
    let on_interrupt = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, cancelling oracle calls");
            on_interrupt.cancel();
        }
    });

    OracleClient::new(Arc::new(SubprocessOracle::new(config.oracle.clone())))
        .with_timeout(config.oracle.timeout())
        .with_cancellation(token)
}

/// Run an async command on a fresh runtime
fn run<F>(future: F) -> i32
where
    F: Future<Output = i32>,
{
    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("failed to create tokio runtime: {}", e);
            return 1;
        }
    };
    rt.block_on(future)
}

fn cmd_show(graph: &Path) -> i32 {
    match read_graph(graph) {
        Ok(graph) => {
            print!("{}", graph);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

async fn cmd_expand(
    config: &AgoraConfig,
    graph: &Path,
    rebuttal: &Path,
    out: Option<&Path>,
) -> i32 {
    let mut debate = match read_graph(graph) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    let document = match std::fs::read_to_string(rebuttal) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error: cannot read '{}': {}", rebuttal.display(), e);
            return 1;
        }
    };

    let client = oracle_client(config);
    let splitter: Arc<dyn DocumentSplitter> = match config.splitter {
        SplitterKind::Markdown => Arc::new(MarkdownSplitter),
        SplitterKind::Oracle => Arc::new(OracleSplitter::new(client.clone())),
    };
    let engine = ExpansionEngine::new(client)
        .with_splitter(splitter)
        .with_config(config.expansion.clone());

    let result = engine.expand(&mut debate, &document).await;
    let code = match result {
        Ok(report) => {
            info!(?report, "expanded");
            0
        }
        Err(e) => {
            // Progress made before the failure is kept in the output.
            eprintln!("Error: {}", e);
            1
        }
    };

    match debate.to_json() {
        Ok(json) => write_output(out, &json).max(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

async fn cmd_enhance(
    config: &AgoraConfig,
    graph: &Path,
    cause: &str,
    effect: &str,
    out: Option<&Path>,
) -> i32 {
    let context = match read_graph(graph) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    let enhancer = LogicEnhancer::new(oracle_client(config));
    let outcome = match enhancer.enhance(&context, cause, effect).await {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    let output = serde_json::json!({
        "actions": outcome.actions,
        "subgraph": outcome.subgraph.to_document(),
    });
    match to_json(&output) {
        Ok(json) => write_output(out, &json),
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

async fn cmd_propose(
    config: &AgoraConfig,
    context: &Path,
    target: &Path,
    out: Option<&Path>,
) -> i32 {
    let (context, target) = match (read_graph(context), read_graph(target)) {
        (Ok(c), Ok(t)) => (c, t),
        (Err(e), _) | (_, Err(e)) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    let aggregator = ProposalAggregator::new(oracle_client(config));
    match aggregator.propose(&context, &target).await {
        Ok(report) => match to_json(&report) {
            Ok(json) => write_output(out, &json),
            Err(e) => {
                eprintln!("Error: {}", e);
                1
            }
        },
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

async fn cmd_plan(
    config: &AgoraConfig,
    context: &Path,
    target: &Path,
    out: Option<&Path>,
) -> i32 {
    let (context, target) = match (read_graph(context), read_graph(target)) {
        (Ok(c), Ok(t)) => (c, t),
        (Err(e), _) | (_, Err(e)) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    let planner = ImprovementPlanner::new(oracle_client(config));
    match planner.plan(&context, &target).await {
        Ok(todos) => match to_json(&serde_json::json!({ "todo": todos })) {
            Ok(json) => write_output(out, &json),
            Err(e) => {
                eprintln!("Error: {}", e);
                1
            }
        },
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging();

    let config = match AgoraConfig::load_or_default(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let code = match cli.command {
        Commands::Show { graph } => cmd_show(&graph),
        Commands::Expand { graph, rebuttal, out } => {
            run(cmd_expand(&config, &graph, &rebuttal, out.as_deref()))
        }
        Commands::Enhance {
            graph,
            cause,
            effect,
            out,
        } => run(cmd_enhance(&config, &graph, &cause, &effect, out.as_deref())),
        Commands::Propose { context, target, out } => {
            run(cmd_propose(&config, &context, &target, out.as_deref()))
        }
        Commands::Plan { context, target, out } => {
            run(cmd_plan(&config, &context, &target, out.as_deref()))
        }
    };
    std::process::exit(code);
}
