#![forbid(unsafe_code)]

//! ELK JSON graph model + graph-to-scene transformation (headless).
//!
//! Design goals:
//! - the External Graph is the layout engine's JSON shape, classified once at parse time
//! - the Scene Description is a stable, renderer-agnostic tree (sprotty-style schema)
//! - transformation is pure and deterministic; all per-call state lives in an [`IdRegistry`]

pub mod compat;
pub mod config;
pub mod defaults;
pub mod error;
pub mod graph;
pub mod ids;
pub mod parse;
pub mod scene;
pub mod transform;

#[cfg(test)]
mod tests;

pub use config::EditorConfig;
pub use defaults::{DefaultSizes, apply_defaults};
pub use error::{Error, Result, TransformError};
pub use graph::{
    ElkEdge, ElkEdgeSection, ElkLabel, ElkNode, ElkPoint, ElkPort, ExtendedEdge, PrimitiveEdge,
    RawEdge,
};
pub use ids::{IdRegistry, IdScope};
pub use parse::{Diagnostic, ParseError, parse_graph};
pub use scene::{
    Capabilities, Dimension, Point, SceneEdge, SceneElement, SceneGraph, SceneJunction,
    SceneLabel, SceneNode, ScenePort,
};
pub use transform::{ElkGraphToScene, transform};

/// Parses graph text (JSON or JSON5) and transforms it in one step.
///
/// This is the path used for layout results that already carry geometry, e.g. a graph that was
/// laid out by an external engine and saved to disk.
pub fn transform_str(text: &str) -> Result<SceneGraph> {
    let graph = parse_graph(text)?;
    Ok(transform(&graph)?)
}

/// Transforms a graph that arrived as an already-decoded JSON value.
pub fn transform_value(value: serde_json::Value) -> Result<SceneGraph> {
    let graph: ElkNode = serde_json::from_value(value)?;
    Ok(transform(&graph)?)
}
