//! Desktop input mapped to view and tiling actions.
//!
//! # Invariants
//! - The application reacts to [`Action`]s, never to raw window events.
//! - Held-button rotation advances by a fixed step per frame.

pub mod action;
pub mod state;

pub use action::Action;
pub use state::{InputState, KEY_STEP, Key, ROTATE_PER_FRAME, ZOOM_STEP, key_action};
