//! Tests graph construction over realistic transaction lists.

use fintrace_graph::build_graph;
use serde_json::{Value, json};

#[test]
fn graph_construction_tests_skips_invalid_endpoints_silently() {
    let transactions = vec![
        json!({ "sender": "", "receiver": "B" }),
        json!({ "sender": null, "receiver": "B" }),
        json!({ "sender": "A", "receiver": { "id": "B" } }),
        json!("A->B"),
        json!({ "receiver": "B", "flagged": true }),
    ];

    let graph = build_graph(&transactions);
    assert!(graph.is_empty());
    assert!(graph.links.is_empty());
}

#[test]
fn graph_construction_tests_one_node_per_account() {
    let transactions: Vec<Value> = (0..50)
        .map(|index| {
            json!({
                "sender": format!("ACC_{}", index % 5),
                "receiver": format!("ACC_{}", (index + 1) % 5),
                "amount": index,
                "flagged": index == 7
            })
        })
        .collect();

    let graph = build_graph(&transactions);
    assert_eq!(graph.nodes.len(), 5);
    assert_eq!(graph.links.len(), 50);

    let suspicious: Vec<&str> = graph
        .suspicious_nodes()
        .map(|node| node.id.as_str())
        .collect();
    assert_eq!(suspicious, vec!["ACC_2", "ACC_3"]);
}

#[test]
fn graph_construction_tests_numeric_ids_are_stringified() {
    let graph = build_graph(&[json!({ "sender": 101, "receiver": 202, "amount": 9.5 })]);
    assert_eq!(graph.links[0].source, "101");
    assert_eq!(graph.links[0].target, "202");
    assert_eq!(graph.links[0].amount, json!(9.5));
}
