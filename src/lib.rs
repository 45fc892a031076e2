//! Agora: argument graph engine with oracle-driven growth
//!
//! Models a debate as a graph of claims ("arguments") joined by causal edges,
//! with rebuttals attached to the nodes and edges they attack. The graph is
//! grown and refined by handing judgment calls to an external reasoning
//! oracle and merging its structured answers back in.
//!
//! # Core Concepts
//!
//! - **DebateGraph**: nodes keyed by argument text, causal edges keyed by
//!   (cause, effect), and rebuttal records bound to both
//! - **ExpansionEngine**: installs the rebuttals found in a document and
//!   discovers their causal ancestry breadth-first
//! - **LogicEnhancer**: strengthens one causal link over three oracle rounds
//! - **ProposalAggregator**: lists rebuttals against a subgraph without
//!   changing it
//!
//! # Example
//!
//! ```
//! use agora::{DebateGraph, Node};
//!
//! let mut graph = DebateGraph::new();
//! graph.add_node(Node::new("Remote work is allowed", false)).unwrap();
//! graph.add_node(Node::new("Commuting time drops", false)).unwrap();
//! graph.connect("Remote work is allowed", "Commuting time drops", false).unwrap();
//! assert_eq!(graph.edge_count(), 1);
//! ```

pub mod cancel;
pub mod config;
pub mod enhance;
pub mod error;
pub mod graph;
pub mod oracle;
pub mod rebuttal;
pub mod splitter;

pub use cancel::CancellationToken;
pub use config::{AgoraConfig, ConfigError, OracleConfig, SplitterKind};
pub use enhance::{
    EnhancementAction, EnhancementOutcome, ImprovementPlanner, ImprovementTodo, LogicEnhancer,
    ENHANCEMENT_ITERATIONS,
};
pub use error::{EngineError, EngineResult};
pub use graph::{
    edge_to_json, node_to_json, CounterArgumentRebuttal, DebateGraph, Edge, EdgeAspect, EdgeKey,
    EdgeRebuttal, EndpointRole, GraphDocument, GraphError, GraphId, GraphResult, Node, NodeAspect,
    NodeRebuttal, TurnArgumentRebuttal,
};
pub use oracle::{
    MockOracle, Oracle, OracleClient, OracleError, OracleRequest, SubprocessOracle, Task,
};
pub use rebuttal::{
    ExpansionConfig, ExpansionEngine, ExpansionReport, ProposalAggregator, ProposalReport,
    RebuttalItem, RebuttalProposal,
};
pub use splitter::{DocumentSplitter, MarkdownSplitter, OracleSplitter};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
