//! Workarounds for layout engine output that does not match the documented JSON format.

use crate::graph::{ElkEdgeSection, PrimitiveEdge};

/// Returns the section that carries the real route of a primitive edge, if the engine put it
/// there.
///
/// ELK issue #553: some engine versions do not write the computed layout of primitive edges
/// back into `sourcePoint`/`bendPoints`/`targetPoint`. They emit the extended format's
/// `sections` instead. When that happens the first section is authoritative and the primitive
/// routing fields must be ignored, even if present.
pub fn bugged_section(edge: &PrimitiveEdge) -> Option<&ElkEdgeSection> {
    edge.sections.first()
}
