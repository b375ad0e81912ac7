//! SRS Tetris (workspace facade crate).
//!
//! Re-exports the member crates under one roof: `srs_tetris::{core,engine,input,types}`.
//! The implementation lives in the dedicated crates under `crates/`.

pub use srs_tetris_core as core;
pub use srs_tetris_engine as engine;
pub use srs_tetris_input as input;
pub use srs_tetris_types as types;
