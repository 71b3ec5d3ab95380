//! Scene Description: the renderer-facing tree.
//!
//! The serialized shape follows the sprotty model schema (`type`, `id`, `position`, `size`,
//! `children`, `sourceId`, `targetId`, `routingPoints`). Interaction capabilities are attached
//! per element kind when the element is built; they are not part of the wire format.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::graph::ElkPoint;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<ElkPoint> for Point {
    fn from(p: ElkPoint) -> Self {
        Self { x: p.x, y: p.y }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    pub width: f64,
    pub height: f64,
}

impl Dimension {
    pub const EMPTY: Dimension = Dimension {
        width: 0.0,
        height: 0.0,
    };

    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

bitflags! {
    /// Interaction features a renderer may enable on an element.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Capabilities: u8 {
        const SELECT         = 0b0_0001;
        const MOVE           = 0b0_0010;
        const HOVER_FEEDBACK = 0b0_0100;
        /// Editing the routing points of an edge.
        const EDIT_ROUTING   = 0b0_1000;
        const FADE           = 0b1_0000;
    }
}

impl Capabilities {
    /// No `MOVE`: positions come from the layout engine.
    pub fn node() -> Self {
        Self::SELECT | Self::HOVER_FEEDBACK | Self::FADE
    }

    pub fn port() -> Self {
        Self::SELECT | Self::HOVER_FEEDBACK | Self::FADE
    }

    pub fn edge() -> Self {
        Self::SELECT | Self::HOVER_FEEDBACK | Self::FADE
    }

    pub fn label() -> Self {
        Self::FADE
    }

    /// Junctions are pure decoration.
    pub fn junction() -> Self {
        Self::FADE
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "graph")]
pub struct SceneGraph {
    pub id: String,
    #[serde(default)]
    pub children: Vec<SceneElement>,
}

impl SceneGraph {
    pub const DEFAULT_ID: &'static str = "root";

    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            children: Vec::new(),
        }
    }

    /// A graph that shows `message` as a single label, for front-ends that prefer rendering a
    /// failure over rendering nothing.
    pub fn error_scene(message: impl Into<String>) -> Self {
        Self {
            id: Self::DEFAULT_ID.to_string(),
            children: vec![SceneElement::Label(SceneLabel {
                id: "error".to_string(),
                text: message.into(),
                position: Point::new(20.0, 20.0),
                size: Dimension::EMPTY,
                capabilities: Capabilities::label(),
            })],
        }
    }

    /// Depth-first pre-order walk over every element below the root.
    pub fn walk(&self) -> impl Iterator<Item = &SceneElement> {
        let mut stack: Vec<&SceneElement> = self.children.iter().rev().collect();
        std::iter::from_fn(move || {
            let next = stack.pop()?;
            stack.extend(next.children().iter().rev());
            Some(next)
        })
    }

    pub fn find(&self, id: &str) -> Option<&SceneElement> {
        self.walk().find(|e| e.id() == id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SceneElement {
    Node(SceneNode),
    Port(ScenePort),
    Label(SceneLabel),
    Edge(SceneEdge),
    Junction(SceneJunction),
}

impl SceneElement {
    pub fn id(&self) -> &str {
        match self {
            Self::Node(n) => &n.id,
            Self::Port(p) => &p.id,
            Self::Label(l) => &l.id,
            Self::Edge(e) => &e.id,
            Self::Junction(j) => &j.id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Node(_) => "node",
            Self::Port(_) => "port",
            Self::Label(_) => "label",
            Self::Edge(_) => "edge",
            Self::Junction(_) => "junction",
        }
    }

    pub fn children(&self) -> &[SceneElement] {
        match self {
            Self::Node(n) => &n.children,
            Self::Port(p) => &p.children,
            Self::Edge(e) => &e.children,
            Self::Label(_) | Self::Junction(_) => &[],
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        match self {
            Self::Node(n) => n.capabilities,
            Self::Port(p) => p.capabilities,
            Self::Label(l) => l.capabilities,
            Self::Edge(e) => e.capabilities,
            Self::Junction(j) => j.capabilities,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneNode {
    pub id: String,
    pub position: Point,
    pub size: Dimension,
    /// Nested nodes, then ports, then labels, then edges.
    #[serde(default)]
    pub children: Vec<SceneElement>,
    #[serde(skip, default = "Capabilities::node")]
    pub capabilities: Capabilities,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenePort {
    pub id: String,
    pub position: Point,
    pub size: Dimension,
    /// Labels only.
    #[serde(default)]
    pub children: Vec<SceneElement>,
    #[serde(skip, default = "Capabilities::port")]
    pub capabilities: Capabilities,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneLabel {
    pub id: String,
    pub text: String,
    pub position: Point,
    pub size: Dimension,
    #[serde(skip, default = "Capabilities::label")]
    pub capabilities: Capabilities,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneEdge {
    pub id: String,
    pub source_id: String,
    pub target_id: String,
    pub routing_points: Vec<Point>,
    /// Junction markers.
    #[serde(default)]
    pub children: Vec<SceneElement>,
    #[serde(skip, default = "Capabilities::edge")]
    pub capabilities: Capabilities,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneJunction {
    pub id: String,
    pub position: Point,
    #[serde(skip, default = "Capabilities::junction")]
    pub capabilities: Capabilities,
}
