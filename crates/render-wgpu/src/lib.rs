//! wgpu render backend for pentagon tilings.
//!
//! Draws the shared face strip once per tiling node with two per-instance
//! buffers: the 20-byte [`InstanceInfo`](pentahex_render::InstanceInfo)
//! record and the node's 64-byte model matrix.
//!
//! # Invariants
//! - Renderer never mutates the tiling; it only reads uploaded draw lists.
//! - Faces are wound clockwise; back faces are culled.
//! - View motion is independent of tiling growth.

mod gpu;
mod shaders;

pub use gpu::{CLEAR_COLOR, WgpuRenderer};
