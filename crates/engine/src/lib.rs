//! Move-search bridge.
//!
//! External planners see a flattened visible board plus piece indices and reply with
//! action tokens (`move_left`, `rotate`, `hard_drop`, ...). This crate owns the token
//! codec, the planner interface, the pacing driver and a placement helper. It
//! performs no search itself.

pub mod place;
pub mod planner;
pub mod token;

pub use srs_tetris_core as core;
pub use srs_tetris_types as types;

pub use place::{placement_tokens, PlaceError};
pub use planner::{
    execute_token, AutoPlayer, MovePlanner, PlanReply, PlanRequest, ScriptedPlanner, TokenOutcome,
    DEFAULT_MOVE_INTERVAL_MS,
};
pub use token::{format_sequence, parse_sequence, ActionToken, TokenError};
