//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains the rules of the engine. It has no dependency on rendering,
//! input devices or networking:
//!
//! - **Deterministic**: the same seed and action sequence produce identical games
//! - **Host-driven**: time only advances through [`GameState::tick`]
//! - **Total**: blocked moves return `false`, game over is state, not an error
//!
//! # Module Structure
//!
//! - [`board`]: 10x40 board (20 hidden buffer rows over 20 visible rows)
//! - [`pieces`]: tetromino catalog and SRS rotation with wall kicks
//! - [`rng`]: 7-bag randomizer
//! - [`tspin`]: corner-based T-spin classification
//! - [`scoring`]: points, combo and back-to-back state
//! - [`game_state`]: the piece state machine, lock delay and gravity
//! - [`config`]: clamped engine configuration
//! - [`snapshot`]: read-only view for renderers and planners
//!
//! # Example
//!
//! ```
//! use srs_tetris_core::{EngineConfig, GameState};
//! use srs_tetris_types::GameAction;
//!
//! let mut game = GameState::new(EngineConfig::default(), 12345);
//! game.start();
//!
//! game.apply_action(GameAction::MoveRight);
//! game.apply_action(GameAction::RotateCw);
//! game.apply_action(GameAction::HardDrop);
//!
//! assert!(game.score() > 0); // Hard drop awards points
//! ```
//!
//! # Timing
//!
//! - **Gravity**: one row every `gravity_ms` (500ms by default), paused while soft drop is held
//! - **Lock Delay**: 500ms once landed, re-armed by moves up to 15 times per piece
//!
//! Call [`GameState::tick`](game_state::GameState::tick) every frame with elapsed time.

pub mod board;
pub mod config;
pub mod error;
pub mod game_state;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod snapshot;
pub mod tspin;

pub use srs_tetris_types as types;

pub use board::Board;
pub use config::{EngineConfig, SoftDropFactor};
pub use error::ConfigError;
pub use game_state::{GameState, LockDelay, Tetromino};
pub use pieces::{get_shape, spawn_position, try_rotate, RotationResult};
pub use rng::{PieceBag, SimpleRng};
pub use scoring::{ScoreResult, ScoreState};
pub use snapshot::{ActiveSnapshot, GameSnapshot, LockSnapshot};
pub use tspin::classify_tspin;
