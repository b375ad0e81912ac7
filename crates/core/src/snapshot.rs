//! Read-only view of the engine for renderers and planners.

use arrayvec::ArrayVec;
use serde::Serialize;

use crate::game_state::Tetromino;
use crate::scoring::ScoreState;
use crate::types::{
    GameOverReason, PieceKind, PiecePhase, Rotation, BOARD_WIDTH, MAX_NEXT_QUEUE, VISIBLE_HEIGHT,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
    /// Absolute board cells (y includes the buffer rows).
    pub cells: [(i8, i8); 4],
}

impl From<Tetromino> for ActiveSnapshot {
    fn from(value: Tetromino) -> Self {
        Self {
            kind: value.kind,
            rotation: value.rotation,
            x: value.x,
            y: value.y,
            cells: value.cells(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct LockSnapshot {
    pub landed: bool,
    pub reset_count: u8,
    /// Time left before the piece locks, when the lock timer is armed.
    pub lock_in_ms: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSnapshot {
    /// Visible rows only, 0 = empty, otherwise piece index + 1.
    pub board: [[u8; BOARD_WIDTH as usize]; VISIBLE_HEIGHT as usize],
    pub active: Option<ActiveSnapshot>,
    /// Present only when the ghost piece is enabled.
    pub ghost_y: Option<i8>,
    pub hold: Option<PieceKind>,
    pub next_queue: ArrayVec<PieceKind, MAX_NEXT_QUEUE>,
    pub can_hold: bool,
    pub phase: PiecePhase,
    pub paused: bool,
    pub game_over: Option<GameOverReason>,
    pub score: ScoreState,
    pub lines: u32,
    pub lock: LockSnapshot,
    pub episode_id: u32,
    pub piece_id: u32,
    pub active_id: u32,
    pub seed: u32,
}

impl GameSnapshot {
    pub fn playable(&self) -> bool {
        self.game_over.is_none() && !self.paused && self.active.is_some()
    }
}
