//! Pentagon tiler: places neighboring faces edge to edge and tracks their
//! connectivity in an arena.
//!
//! # Invariants
//! - Every node has exactly five neighbor slots, stored as optional arena ids.
//! - A child's model matrix is the parent's matrix composed with a per-slot transform.
//! - Under a mutual rule, no slot is ever filled from two different parents.

mod inspector;
mod rule;
mod tiling;

pub use inspector::{NodeInfo, TilingInspector, TilingSummary};
pub use rule::{FoldedSolid, PlacementRule, PlanarChain, RuleKind, SLOT_COUNT, Slot};
pub use tiling::{NodeId, PentagonNode, Tiling, TilingError};
