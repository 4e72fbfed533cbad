//! Rendering adapter: renderer-agnostic draw lists and view math.
//!
//! # Invariants
//! - Renderers never mutate the tiling; they consume a [`DrawList`] built from it.
//! - One shared face mesh is drawn once per tiling node through instancing.
//! - Instance records are 20 bytes and node models are 64 bytes, matching the GPU layouts.

mod draw;
mod renderer;

pub use draw::{DrawList, INSTANCE_INFO_SIZE, InstanceInfo};
pub use renderer::{DebugTextRenderer, RenderView, Renderer};

pub fn crate_info() -> &'static str {
    "pentahex-render v0.1.0"
}
