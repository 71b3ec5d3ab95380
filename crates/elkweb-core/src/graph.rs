//! External Graph model (ELK JSON).
//!
//! The shapes mirror the JSON a layout engine consumes and produces. Geometry is optional on
//! input and filled in by the engine. Fields this crate does not interpret (`layoutOptions`,
//! `properties`, ...) are preserved in `extra` so graphs survive a read/write cycle.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// ELK accepts strings or integers as identifiers; both are read as strings.
mod elk_id {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Str(String),
        Int(i64),
        Num(f64),
    }

    impl From<Id> for String {
        fn from(id: Id) -> Self {
            match id {
                Id::Str(s) => s,
                Id::Int(i) => i.to_string(),
                Id::Num(n) if n.fract() == 0.0 && n.abs() < i64::MAX as f64 => {
                    (n as i64).to_string()
                }
                Id::Num(n) => n.to_string(),
            }
        }
    }

    pub(super) fn optional<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<Id>::deserialize(deserializer)?.map(String::from))
    }

    pub(super) fn optional_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let ids = Option::<Vec<Id>>::deserialize(deserializer)?;
        Ok(ids.map(|ids| ids.into_iter().map(String::from).collect()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElkPoint {
    pub x: f64,
    pub y: f64,
}

impl ElkPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElkNode {
    #[serde(
        default,
        deserialize_with = "elk_id::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ElkNode>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<ElkPort>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<ElkLabel>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub edges: Vec<ElkEdge>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ElkNode {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }

    pub fn with_bounds(mut self, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self.width = Some(width);
        self.height = Some(height);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElkPort {
    #[serde(
        default,
        deserialize_with = "elk_id::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<ElkLabel>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElkLabel {
    #[serde(
        default,
        deserialize_with = "elk_id::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One contiguous routed piece of an edge.
///
/// The linkage fields (`incomingShape`, `outgoingSections`, ...) are carried for fidelity but
/// not interpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElkEdgeSection {
    #[serde(
        default,
        deserialize_with = "elk_id::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    pub start_point: ElkPoint,
    pub end_point: ElkPoint,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bend_points: Vec<ElkPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incoming_shape: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outgoing_shape: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub incoming_sections: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outgoing_sections: Vec<String>,
}

impl ElkEdgeSection {
    pub fn new(start_point: ElkPoint, end_point: ElkPoint) -> Self {
        Self {
            id: None,
            start_point,
            end_point,
            bend_points: Vec::new(),
            incoming_shape: None,
            outgoing_shape: None,
            incoming_sections: Vec::new(),
            outgoing_sections: Vec::new(),
        }
    }
}

/// Edge as it appears on the wire, before classification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEdge {
    #[serde(
        default,
        deserialize_with = "elk_id::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    #[serde(
        default,
        deserialize_with = "elk_id::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub source: Option<String>,
    #[serde(
        default,
        deserialize_with = "elk_id::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub source_port: Option<String>,
    #[serde(
        default,
        deserialize_with = "elk_id::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub target: Option<String>,
    #[serde(
        default,
        deserialize_with = "elk_id::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub target_port: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_point: Option<ElkPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_point: Option<ElkPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bend_points: Option<Vec<ElkPoint>>,
    #[serde(
        default,
        deserialize_with = "elk_id::optional_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub sources: Option<Vec<String>>,
    #[serde(
        default,
        deserialize_with = "elk_id::optional_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub targets: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<ElkEdgeSection>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub junction_points: Option<Vec<ElkPoint>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<ElkLabel>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Single source, single target edge.
///
/// `sections` is not part of this format; it is kept because some engine versions report the
/// computed route there instead of in `sourcePoint`/`bendPoints`/`targetPoint`
/// (see [`crate::compat`]).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrimitiveEdge {
    pub id: Option<String>,
    pub source: String,
    pub source_port: Option<String>,
    pub target: String,
    pub target_port: Option<String>,
    pub source_point: Option<ElkPoint>,
    pub target_point: Option<ElkPoint>,
    pub bend_points: Vec<ElkPoint>,
    pub sections: Vec<ElkEdgeSection>,
    pub junction_points: Vec<ElkPoint>,
    pub labels: Vec<ElkLabel>,
    pub extra: Map<String, Value>,
}

/// Hyperedge format with explicit routing sections.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtendedEdge {
    pub id: Option<String>,
    pub sources: Vec<String>,
    pub targets: Vec<String>,
    pub sections: Vec<ElkEdgeSection>,
    pub junction_points: Vec<ElkPoint>,
    pub labels: Vec<ElkLabel>,
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawEdge", into = "RawEdge")]
pub enum ElkEdge {
    Primitive(PrimitiveEdge),
    Extended(ExtendedEdge),
    /// Matches neither format. Kept so the transformer can fail with the edge's id in hand.
    Unrecognized(RawEdge),
}

impl ElkEdge {
    /// Sorts a wire edge into one of the two formats.
    ///
    /// Singular `source` + `target` wins over the plural arrays when both are present. A lone
    /// `source` or `target` does not prevent the plural arrays from being used.
    pub fn classify(raw: RawEdge) -> Self {
        match raw {
            RawEdge {
                id,
                source: Some(source),
                source_port,
                target: Some(target),
                target_port,
                source_point,
                target_point,
                bend_points,
                sections,
                junction_points,
                labels,
                extra,
                ..
            } => Self::Primitive(PrimitiveEdge {
                id,
                source,
                source_port,
                target,
                target_port,
                source_point,
                target_point,
                bend_points: bend_points.unwrap_or_default(),
                sections: sections.unwrap_or_default(),
                junction_points: junction_points.unwrap_or_default(),
                labels: labels.unwrap_or_default(),
                extra,
            }),
            RawEdge {
                id,
                sources: Some(sources),
                targets: Some(targets),
                sections,
                junction_points,
                labels,
                extra,
                ..
            } => Self::Extended(ExtendedEdge {
                id,
                sources,
                targets,
                sections: sections.unwrap_or_default(),
                junction_points: junction_points.unwrap_or_default(),
                labels: labels.unwrap_or_default(),
                extra,
            }),
            other => Self::Unrecognized(other),
        }
    }

    pub fn primitive(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self::Primitive(PrimitiveEdge {
            id: Some(id.into()),
            source: source.into(),
            target: target.into(),
            ..Default::default()
        })
    }

    pub fn extended(
        id: impl Into<String>,
        sources: impl IntoIterator<Item = impl Into<String>>,
        targets: impl IntoIterator<Item = impl Into<String>>,
        sections: Vec<ElkEdgeSection>,
    ) -> Self {
        Self::Extended(ExtendedEdge {
            id: Some(id.into()),
            sources: sources.into_iter().map(Into::into).collect(),
            targets: targets.into_iter().map(Into::into).collect(),
            sections,
            ..Default::default()
        })
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Primitive(e) => e.id.as_deref(),
            Self::Extended(e) => e.id.as_deref(),
            Self::Unrecognized(e) => e.id.as_deref(),
        }
    }

    pub fn junction_points(&self) -> &[ElkPoint] {
        match self {
            Self::Primitive(e) => &e.junction_points,
            Self::Extended(e) => &e.junction_points,
            Self::Unrecognized(e) => e.junction_points.as_deref().unwrap_or_default(),
        }
    }

    pub fn labels(&self) -> &[ElkLabel] {
        match self {
            Self::Primitive(e) => &e.labels,
            Self::Extended(e) => &e.labels,
            Self::Unrecognized(e) => e.labels.as_deref().unwrap_or_default(),
        }
    }

    pub fn labels_mut(&mut self) -> &mut Vec<ElkLabel> {
        match self {
            Self::Primitive(e) => &mut e.labels,
            Self::Extended(e) => &mut e.labels,
            Self::Unrecognized(e) => e.labels.get_or_insert_with(Vec::new),
        }
    }
}

impl From<RawEdge> for ElkEdge {
    fn from(raw: RawEdge) -> Self {
        Self::classify(raw)
    }
}

fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    (!items.is_empty()).then_some(items)
}

impl From<ElkEdge> for RawEdge {
    fn from(edge: ElkEdge) -> Self {
        match edge {
            ElkEdge::Primitive(e) => RawEdge {
                id: e.id,
                source: Some(e.source),
                source_port: e.source_port,
                target: Some(e.target),
                target_port: e.target_port,
                source_point: e.source_point,
                target_point: e.target_point,
                bend_points: non_empty(e.bend_points),
                sections: non_empty(e.sections),
                junction_points: non_empty(e.junction_points),
                labels: non_empty(e.labels),
                extra: e.extra,
                ..Default::default()
            },
            ElkEdge::Extended(e) => RawEdge {
                id: e.id,
                sources: Some(e.sources),
                targets: Some(e.targets),
                sections: Some(e.sections),
                junction_points: non_empty(e.junction_points),
                labels: non_empty(e.labels),
                extra: e.extra,
                ..Default::default()
            },
            ElkEdge::Unrecognized(raw) => raw,
        }
    }
}
