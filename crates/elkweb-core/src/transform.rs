//! Graph-to-Scene transformation.

use crate::compat;
use crate::error::TransformError;
use crate::graph::{
    ElkEdge, ElkEdgeSection, ElkLabel, ElkNode, ElkPort, ExtendedEdge, PrimitiveEdge,
};
use crate::ids::{IdRegistry, IdScope};
use crate::scene::{
    Capabilities, Dimension, Point, SceneEdge, SceneElement, SceneGraph, SceneJunction,
    SceneLabel, SceneNode, ScenePort,
};

/// Converts one laid-out graph into a scene.
///
/// Each call uses its own [`IdRegistry`], so calls are independent of each other.
pub fn transform(graph: &ElkNode) -> Result<SceneGraph, TransformError> {
    ElkGraphToScene::new().transform(graph)
}

/// Single-use transformer. Consumed by [`ElkGraphToScene::transform`] so its registry cannot
/// leak into another pass.
#[derive(Debug, Default)]
pub struct ElkGraphToScene {
    ids: IdRegistry,
}

impl ElkGraphToScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transform(mut self, graph: &ElkNode) -> Result<SceneGraph, TransformError> {
        let mut scene = SceneGraph::new(
            graph
                .id
                .clone()
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| SceneGraph::DEFAULT_ID.to_string()),
        );
        for child in &graph.children {
            let node = self.transform_node(child)?;
            scene.children.push(SceneElement::Node(node));
        }
        for edge in &graph.edges {
            let edge = self.transform_edge(edge)?;
            scene.children.push(SceneElement::Edge(edge));
        }

        tracing::debug!(
            graph = %scene.id,
            nodes = self.ids.len(IdScope::Node),
            ports = self.ids.len(IdScope::Port),
            labels = self.ids.len(IdScope::Label),
            edges = self.ids.len(IdScope::Edge),
            "transformed graph into scene"
        );
        Ok(scene)
    }

    fn transform_node(&mut self, node: &ElkNode) -> Result<SceneNode, TransformError> {
        let id = self.remember(node.id.as_deref(), IdScope::Node)?;

        let mut children = Vec::with_capacity(
            node.children.len() + node.ports.len() + node.labels.len() + node.edges.len(),
        );
        for child in &node.children {
            children.push(SceneElement::Node(self.transform_node(child)?));
        }
        for port in &node.ports {
            children.push(SceneElement::Port(self.transform_port(port)?));
        }
        for label in &node.labels {
            children.push(SceneElement::Label(self.transform_label(label)?));
        }
        for edge in &node.edges {
            children.push(SceneElement::Edge(self.transform_edge(edge)?));
        }

        Ok(SceneNode {
            id,
            position: pos(node.x, node.y),
            size: size(node.width, node.height),
            children,
            capabilities: Capabilities::node(),
        })
    }

    fn transform_port(&mut self, port: &ElkPort) -> Result<ScenePort, TransformError> {
        let id = self.remember(port.id.as_deref(), IdScope::Port)?;

        let mut children = Vec::with_capacity(port.labels.len());
        for label in &port.labels {
            children.push(SceneElement::Label(self.transform_label(label)?));
        }

        Ok(ScenePort {
            id,
            position: pos(port.x, port.y),
            size: size(port.width, port.height),
            children,
            capabilities: Capabilities::port(),
        })
    }

    fn transform_label(&mut self, label: &ElkLabel) -> Result<SceneLabel, TransformError> {
        let id = self.remember(label.id.as_deref(), IdScope::Label)?;
        Ok(SceneLabel {
            id,
            text: label.text.clone().unwrap_or_default(),
            position: pos(label.x, label.y),
            size: size(label.width, label.height),
            capabilities: Capabilities::label(),
        })
    }

    fn transform_edge(&mut self, edge: &ElkEdge) -> Result<SceneEdge, TransformError> {
        let id = self.remember(edge.id(), IdScope::Edge)?;

        let mut scene_edge = SceneEdge {
            id,
            source_id: String::new(),
            target_id: String::new(),
            routing_points: Vec::new(),
            children: Vec::new(),
            capabilities: Capabilities::edge(),
        };
        match edge {
            ElkEdge::Primitive(primitive) => self.route_primitive(primitive, &mut scene_edge)?,
            ElkEdge::Extended(extended) => self.route_extended(extended, &mut scene_edge)?,
            ElkEdge::Unrecognized(_) => {
                return Err(TransformError::UnrecognizedEdgeShape { id: scene_edge.id });
            }
        }

        // Edge labels are not rendered.
        for (i, jp) in edge.junction_points().iter().enumerate() {
            scene_edge.children.push(SceneElement::Junction(SceneJunction {
                id: format!("{}_j{i}", scene_edge.id),
                position: (*jp).into(),
                capabilities: Capabilities::junction(),
            }));
        }
        Ok(scene_edge)
    }

    fn route_primitive(
        &mut self,
        edge: &PrimitiveEdge,
        out: &mut SceneEdge,
    ) -> Result<(), TransformError> {
        out.source_id = edge.source.clone();
        out.target_id = edge.target.clone();

        if let Some(section) = compat::bugged_section(edge) {
            return self.transfer_section(section, out);
        }

        out.routing_points.extend(edge.source_point.map(Point::from));
        out.routing_points
            .extend(edge.bend_points.iter().copied().map(Point::from));
        out.routing_points.extend(edge.target_point.map(Point::from));
        Ok(())
    }

    fn route_extended(
        &mut self,
        edge: &ExtendedEdge,
        out: &mut SceneEdge,
    ) -> Result<(), TransformError> {
        out.source_id = edge.sources.first().cloned().unwrap_or_default();
        out.target_id = edge.targets.first().cloned().unwrap_or_default();
        for section in &edge.sections {
            self.transfer_section(section, out)?;
        }
        Ok(())
    }

    fn transfer_section(
        &mut self,
        section: &ElkEdgeSection,
        out: &mut SceneEdge,
    ) -> Result<(), TransformError> {
        // Sections do not become scene elements; an id is optional but must be unique.
        if let Some(id) = section.id.as_deref() {
            self.ids.check_and_remember(Some(id), IdScope::Section)?;
        }
        out.routing_points.push(section.start_point.into());
        out.routing_points
            .extend(section.bend_points.iter().copied().map(Point::from));
        out.routing_points.push(section.end_point.into());
        Ok(())
    }

    fn remember(&mut self, id: Option<&str>, scope: IdScope) -> Result<String, TransformError> {
        self.ids.check_and_remember(id, scope)?;
        Ok(id.unwrap_or_default().to_string())
    }
}

fn pos(x: Option<f64>, y: Option<f64>) -> Point {
    Point::new(x.unwrap_or(0.0), y.unwrap_or(0.0))
}

fn size(width: Option<f64>, height: Option<f64>) -> Dimension {
    Dimension::new(width.unwrap_or(0.0), height.unwrap_or(0.0))
}
