//! Pentagon geometry: the constant set and the irregular face of the
//! pentagonal hexecontahedron, derived in closed form from the golden ratio.
//!
//! # Invariants
//! - Constants are computed once and never mutated; callers pass them by reference.
//! - A face always has 5 vertices and the strip indices `{2, 3, 1, 4, 0}`.
//! - Vertex 2 lies on the mirror axis; vertices 3 and 4 mirror 1 and 0 exactly.

mod constants;
mod face;

pub use constants::{Constants, FaceAngleFormula, GeometryError, golden_ratio};
pub use face::{
    ACCENT_COLOR, Face, FaceVertex, INDEX_COUNT, STRIP_INDICES, VERTEX_COUNT,
};
