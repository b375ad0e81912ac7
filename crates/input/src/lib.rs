//! Input timing policy (engine-facing).
//!
//! Independent of any device layer: hosts poll their own keys, report what is held
//! as [`HeldInputs`] each frame, and apply the returned [`crate::types::GameAction`]s
//! to the game state. Key mapping is the host's job.

pub mod handler;

pub use srs_tetris_core as core;
pub use srs_tetris_types as types;

pub use handler::{
    soft_drop_interval_ms, HeldInputs, InputHandler, TimingConfig, MAX_FRAME_ACTIONS,
};
