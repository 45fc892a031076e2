//! Shared fixtures for the engine integration tests

#![allow(dead_code)]

use agora::{DebateGraph, MockOracle, Node, OracleClient};
use std::sync::Arc;

pub const POLICY: &str = "Remote work is allowed";
pub const COMMUTE: &str = "Commuting time drops";
pub const PRODUCTIVITY: &str = "Productivity rises";

/// `POLICY -> COMMUTE -> PRODUCTIVITY`
pub fn remote_work_graph() -> DebateGraph {
    let mut graph = DebateGraph::new();
    graph
        .add_node(Node::new(POLICY, false).with_importance("Applies to every employee"))
        .unwrap();
    graph.add_node(Node::new(COMMUTE, false)).unwrap();
    graph.add_node(Node::new(PRODUCTIVITY, false)).unwrap();
    graph.connect(POLICY, COMMUTE, false).unwrap();
    graph.connect(COMMUTE, PRODUCTIVITY, false).unwrap();
    graph
}

/// Wrap a scripted oracle in a client, keeping a handle for inspection
pub fn client_for(oracle: MockOracle) -> (OracleClient, Arc<MockOracle>) {
    let oracle = Arc::new(oracle);
    (OracleClient::new(oracle.clone()), oracle)
}
