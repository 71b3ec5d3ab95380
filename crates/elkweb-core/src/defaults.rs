//! Pre-layout sizing for graphs whose authors left out dimensions.
//!
//! Layout engines treat a missing size as zero, which collapses nodes into points. Before a
//! graph is handed to the engine, shapes without a positive size get a fixed default. Label
//! sizes are estimated from the character count and will not match every renderer's font.

use crate::graph::{ElkLabel, ElkNode};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DefaultSizes {
    pub node_size: f64,
    pub port_size: f64,
    pub label_char_width: f64,
    pub label_height: f64,
}

impl Default for DefaultSizes {
    fn default() -> Self {
        Self {
            node_size: 30.0,
            port_size: 5.0,
            label_char_width: 9.0,
            label_height: 16.0,
        }
    }
}

/// Fills in missing sizes below `parent`. The parent itself is left untouched.
pub fn apply_defaults(parent: &mut ElkNode, sizes: &DefaultSizes) {
    for port in &mut parent.ports {
        fill(&mut port.width, sizes.port_size);
        fill(&mut port.height, sizes.port_size);
        size_labels(&mut port.labels, sizes);
    }
    for node in &mut parent.children {
        fill(&mut node.width, sizes.node_size);
        fill(&mut node.height, sizes.node_size);
        size_labels(&mut node.labels, sizes);
        apply_defaults(node, sizes);
    }
    for edge in &mut parent.edges {
        size_labels(edge.labels_mut(), sizes);
    }
}

fn size_labels(labels: &mut [ElkLabel], sizes: &DefaultSizes) {
    for label in labels {
        let Some(text) = label.text.as_deref().filter(|t| !t.is_empty()) else {
            continue;
        };
        let chars = text.chars().count() as f64;
        fill(&mut label.width, chars * sizes.label_char_width);
        fill(&mut label.height, sizes.label_height);
    }
}

fn fill(slot: &mut Option<f64>, value: f64) {
    if slot.is_none_or(|v| v <= 0.0) {
        *slot = Some(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{ElkEdge, ElkPort};

    #[test]
    fn missing_and_zero_sizes_are_filled() {
        let mut root = ElkNode::new("root");
        let mut n1 = ElkNode::new("n1");
        n1.width = Some(0.0);
        n1.height = Some(12.0);
        n1.ports.push(ElkPort {
            id: Some("p1".to_string()),
            ..Default::default()
        });
        root.children.push(n1);

        apply_defaults(&mut root, &DefaultSizes::default());

        assert_eq!(root.width, None);
        let n1 = &root.children[0];
        assert_eq!(n1.width, Some(30.0));
        assert_eq!(n1.height, Some(12.0));
        assert_eq!(n1.ports[0].width, Some(5.0));
        assert_eq!(n1.ports[0].height, Some(5.0));
    }

    #[test]
    fn labels_are_sized_from_text() {
        let mut root = ElkNode::new("root");
        let mut edge = ElkEdge::primitive("e1", "a", "b");
        edge.labels_mut().push(ElkLabel {
            id: Some("l1".to_string()),
            text: Some("hello".to_string()),
            ..Default::default()
        });
        edge.labels_mut().push(ElkLabel {
            id: Some("l2".to_string()),
            text: Some(String::new()),
            ..Default::default()
        });
        root.edges.push(edge);

        apply_defaults(&mut root, &DefaultSizes::default());

        let labels = root.edges[0].labels();
        assert_eq!(labels[0].width, Some(45.0));
        assert_eq!(labels[0].height, Some(16.0));
        assert_eq!(labels[1].width, None);
    }
}
