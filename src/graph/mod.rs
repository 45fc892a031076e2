//! Argument graph: claims, causal links, and the rebuttals attached to them

mod debate;
mod display;
mod document;
mod edge;
mod node;
mod rebuttal;

#[cfg(test)]
mod tests;

pub use debate::{DebateGraph, EndpointRole, GraphError, GraphResult};
pub use document::{
    edge_to_json, node_to_json, CounterArgumentRecord, EdgeRebuttalRecord, EdgeRecord,
    GraphDocument, NodeRebuttalRecord, NodeRecord, TurnArgumentRecord,
};
pub use edge::{Edge, EdgeAspect, EdgeKey};
pub use node::{GraphId, Node, NodeAspect};
pub use rebuttal::{CounterArgumentRebuttal, EdgeRebuttal, NodeRebuttal, TurnArgumentRebuttal};
