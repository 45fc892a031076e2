//! Serialization tests against document fixtures

use serde_json::{json, Value};

/// A business case with one rebuttal of each kind
fn debate_fixture() -> Value {
    json!({
        "nodes": [
            {
                "argument": "Remote work is allowed",
                "is_rebuttal": false,
                "importance": ["Applies to every employee"]
            },
            {
                "argument": "Commuting time drops",
                "is_rebuttal": false,
                "uniqueness": ["Only remote work removes the commute"]
            },
            {
                "argument": "Productivity rises",
                "is_rebuttal": false
            },
            {
                "argument": "Home distractions offset the saved time",
                "is_rebuttal": true
            },
            {
                "argument": "Collaboration suffers",
                "is_rebuttal": true,
                "importance_rebuttals": ["Most work is individual"]
            }
        ],
        "edges": [
            {
                "cause": "Remote work is allowed",
                "effect": "Commuting time drops",
                "is_rebuttal": false,
                "certainty": ["Surveys show an hour saved per day"]
            },
            {
                "cause": "Commuting time drops",
                "effect": "Productivity rises",
                "is_rebuttal": false,
                "certainty_rebuttal": ["Saved time is not spent working"]
            }
        ],
        "node_rebuttals": [
            {
                "target_argument": "Productivity rises",
                "rebuttal_type": "importance",
                "rebuttal_argument": "Collaboration suffers"
            }
        ],
        "edge_rebuttals": [
            {
                "target_cause_argument": "Commuting time drops",
                "target_effect_argument": "Productivity rises",
                "rebuttal_type": "certainty",
                "rebuttal_argument": "Home distractions offset the saved time"
            }
        ],
        "counter_argument_rebuttals": [
            {
                "rebuttal_argument": "Collaboration suffers",
                "target_argument": "Productivity rises"
            }
        ],
        "turn_argument_rebuttals": [
            {
                "rebuttal_argument": "Home distractions offset the saved time"
            }
        ]
    })
}

#[cfg(test)]
mod serialization_tests {
    use super::*;
    use crate::graph::{
        edge_to_json, node_to_json, DebateGraph, EdgeAspect, GraphDocument, GraphError, Node,
        NodeAspect,
    };

    fn fixture_graph() -> DebateGraph {
        DebateGraph::from_json(&debate_fixture().to_string()).unwrap()
    }

    #[test]
    fn fixture_deserializes_into_graph() {
        let graph = fixture_graph();

        assert_eq!(graph.node_count(), 5);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(
            graph.get_node("Remote work is allowed").unwrap().importance,
            vec!["Applies to every employee"]
        );
        let edge = graph.get_edge("Commuting time drops", "Productivity rises").unwrap();
        assert_eq!(edge.certainty_rebuttals, vec!["Saved time is not spent working"]);
        assert_eq!(graph.get_node("Productivity rises").unwrap().causes().len(), 1);

        assert_eq!(graph.node_rebuttals()[0].kind, NodeAspect::Importance);
        assert_eq!(graph.edge_rebuttals()[0].kind, EdgeAspect::Certainty);
        assert_eq!(graph.counter_arguments().len(), 1);
        assert_eq!(graph.turn_arguments().len(), 1);
    }

    #[test]
    fn round_trip_preserves_structure() {
        let graph = fixture_graph();
        let restored = DebateGraph::from_json(&graph.to_json().unwrap()).unwrap();

        assert!(graph.same_structure(&restored));
        assert_ne!(graph.id(), restored.id());
    }

    #[test]
    fn serialized_document_matches_fixture() {
        let graph = fixture_graph();
        let value: Value = serde_json::from_str(&graph.to_json().unwrap()).unwrap();
        assert_eq!(value, debate_fixture());
    }

    #[test]
    fn empty_lists_are_omitted() {
        let mut graph = DebateGraph::new();
        graph.add_node(Node::new("A", false)).unwrap();
        let value: Value = serde_json::from_str(&graph.to_json().unwrap()).unwrap();

        assert_eq!(
            value,
            json!({
                "nodes": [{ "argument": "A", "is_rebuttal": false }],
                "edges": []
            })
        );
    }

    #[test]
    fn absent_lists_read_as_empty() {
        let graph = DebateGraph::from_json(r#"{"nodes": [{"argument": "A"}]}"#).unwrap();
        let node = graph.get_node("A").unwrap();

        assert!(!node.is_rebuttal);
        assert!(node.importance.is_empty());
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.node_rebuttals().is_empty());
    }

    #[test]
    fn edge_rebuttal_to_missing_edge_is_dangling() {
        let mut fixture = debate_fixture();
        fixture["edge_rebuttals"][0]["target_effect_argument"] = json!("Nobody cares");

        let err = DebateGraph::from_json(&fixture.to_string()).unwrap_err();
        assert!(matches!(
            err,
            GraphError::DanglingReference { context: "edge rebuttal", .. }
        ));
    }

    #[test]
    fn edge_to_missing_node_is_dangling() {
        let err = DebateGraph::from_json(
            r#"{"nodes": [{"argument": "A"}], "edges": [{"cause": "A", "effect": "B"}]}"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            GraphError::DanglingReference { context: "edge", ref reference } if reference == "B"
        ));
    }

    #[test]
    fn duplicate_node_in_document_fails() {
        let err = DebateGraph::from_json(
            r#"{"nodes": [{"argument": "A"}, {"argument": "A"}], "edges": []}"#,
        )
        .unwrap_err();
        assert!(matches!(err, GraphError::DuplicateNode(_)));
    }

    #[test]
    fn malformed_json_is_a_serialization_error() {
        let err = DebateGraph::from_json("{ not json").unwrap_err();
        assert!(matches!(err, GraphError::Serialization(_)));
    }

    #[test]
    fn unknown_rebuttal_type_is_rejected() {
        let mut fixture = debate_fixture();
        fixture["node_rebuttals"][0]["rebuttal_type"] = json!("certainty");
        assert!(DebateGraph::from_json(&fixture.to_string()).is_err());
    }

    #[test]
    fn fragments_serialize_single_elements() {
        let graph = fixture_graph();
        let productivity = graph.get_node("Productivity rises").unwrap();
        let node: Value = serde_json::from_str(&node_to_json(productivity).unwrap()).unwrap();
        assert_eq!(node, json!({ "argument": "Productivity rises", "is_rebuttal": false }));

        let edge: Value = serde_json::from_str(
            &edge_to_json(graph.get_edge("Remote work is allowed", "Commuting time drops").unwrap())
                .unwrap(),
        )
        .unwrap();
        assert_eq!(edge["certainty"], json!(["Surveys show an hour saved per day"]));
        assert!(edge.get("certainty_rebuttal").is_none());
    }

    #[test]
    fn normalized_documents_ignore_order() {
        let mut forward = DebateGraph::new();
        forward.add_node(Node::new("A", false)).unwrap();
        forward.add_node(Node::new("B", false)).unwrap();
        let mut backward = DebateGraph::new();
        backward.add_node(Node::new("B", false)).unwrap();
        backward.add_node(Node::new("A", false)).unwrap();

        assert_ne!(forward.to_document(), backward.to_document());
        assert!(forward.same_structure(&backward));
        assert_eq!(GraphDocument::default().normalized(), GraphDocument::default());
    }
}
