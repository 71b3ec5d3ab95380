use crate::*;
use serde_json::json;

fn busy_node() -> ElkNode {
    serde_json::from_value(json!({
        "id": "root",
        "children": [{
            "id": "parent",
            "edges": [
                { "id": "e2", "source": "c1", "target": "c2" },
                { "id": "e1", "source": "c2", "target": "c1" }
            ],
            "labels": [{ "id": "l2", "text": "second" }, { "id": "l1", "text": "first" }],
            "ports": [{ "id": "p2" }, { "id": "p1" }],
            "children": [{ "id": "c2" }, { "id": "c1", "children": [{ "id": "g1" }] }]
        }]
    }))
    .unwrap()
}

#[test]
fn node_children_are_grouped_nodes_ports_labels_edges() {
    let scene = transform(&busy_node()).unwrap();
    let Some(SceneElement::Node(parent)) = scene.children.first() else {
        panic!("missing parent node");
    };
    let order: Vec<(&str, &str)> = parent.children.iter().map(|c| (c.kind(), c.id())).collect();
    assert_eq!(
        order,
        vec![
            ("node", "c2"),
            ("node", "c1"),
            ("port", "p2"),
            ("port", "p1"),
            ("label", "l2"),
            ("label", "l1"),
            ("edge", "e2"),
            ("edge", "e1"),
        ]
    );
}

#[test]
fn walk_is_depth_first_pre_order() {
    let scene = transform(&busy_node()).unwrap();
    let ids: Vec<&str> = scene.walk().map(SceneElement::id).collect();
    assert_eq!(
        ids,
        vec!["parent", "c2", "c1", "g1", "p2", "p1", "l2", "l1", "e2", "e1"]
    );
}

#[test]
fn repeated_runs_serialize_identically() {
    let graph = busy_node();
    let first = serde_json::to_string(&transform(&graph).unwrap()).unwrap();
    for _ in 0..8 {
        let again = serde_json::to_string(&transform(&graph).unwrap()).unwrap();
        assert_eq!(first, again);
    }
}

#[test]
fn failed_call_does_not_poison_the_next_one() {
    let bad: ElkNode =
        serde_json::from_value(json!({ "children": [{ "id": "a" }, { "id": "a" }] })).unwrap();
    assert!(transform(&bad).is_err());

    let good: ElkNode = serde_json::from_value(json!({ "children": [{ "id": "a" }] })).unwrap();
    assert!(transform(&good).is_ok());
    assert!(transform(&good).is_ok());
}

#[test]
fn ids_round_trip_exactly() {
    let graph = busy_node();
    let scene = transform(&graph).unwrap();
    for id in ["parent", "c1", "c2", "g1", "p1", "p2", "l1", "l2", "e1", "e2"] {
        assert!(scene.find(id).is_some(), "missing {id}");
    }
    assert_eq!(scene.walk().count(), 10);
}
