//! Game state module - the piece state machine
//!
//! Ties together board, catalog, bag, T-spin evaluation and scoring. Owns the active
//! and held pieces, the next queue, and the two timers (gravity and lock delay), which
//! are driven purely by [`GameState::tick`].
//!
//! Piece lifecycle: `None -> Spawning -> Falling <-> Landed -> Locked -> None`.
//! Spawning and Locked are transient inside a single call.

use arrayvec::ArrayVec;
use tracing::{debug, info, trace};

use crate::board::Board;
use crate::config::EngineConfig;
use crate::pieces::{get_shape, spawn_position, try_rotate};
use crate::rng::PieceBag;
use crate::scoring::ScoreState;
use crate::snapshot::{ActiveSnapshot, GameSnapshot, LockSnapshot};
use crate::tspin::classify_tspin;
use crate::types::*;

/// Active falling piece. `(x, y)` is the pivot's board position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tetromino {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
}

impl Tetromino {
    /// Create a tetromino in spawn rotation at the spawn position
    pub fn spawn(kind: PieceKind) -> Self {
        let (x, y) = spawn_position(kind);
        Self {
            kind,
            rotation: Rotation::North,
            x,
            y,
        }
    }

    /// Mino offsets for the current rotation
    pub fn shape(&self) -> [(i8, i8); 4] {
        get_shape(self.kind, self.rotation)
    }

    /// Absolute board cells
    pub fn cells(&self) -> [(i8, i8); 4] {
        self.shape().map(|(dx, dy)| (self.x + dx, self.y + dy))
    }

    pub fn shifted(&self, dx: i8, dy: i8) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// True if no cell collides with the board
    pub fn fits(&self, board: &Board) -> bool {
        self.cells().iter().all(|&(x, y)| !board.is_occupied(x, y))
    }

    /// True when moving down one row would collide
    pub fn is_landed(&self, board: &Board) -> bool {
        !self.shifted(0, 1).fits(board)
    }
}

/// Lock-delay bookkeeping for the active piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LockDelay {
    pub landed: bool,
    pub reset_count: u8,
    /// Elapsed time since the lock timer was armed.
    timer_ms: Option<u32>,
}

impl LockDelay {
    fn arm(&mut self) {
        self.timer_ms = Some(0);
    }

    fn cancel(&mut self) {
        self.timer_ms = None;
    }

    pub fn is_armed(&self) -> bool {
        self.timer_ms.is_some()
    }

    pub fn elapsed_ms(&self) -> Option<u32> {
        self.timer_ms
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    config: EngineConfig,
    board: Board,
    active: Option<Tetromino>,
    hold: Option<PieceKind>,
    can_hold: bool,
    /// Always kept full; only the first `next_queue_size` entries are exposed.
    next_queue: ArrayVec<PieceKind, MAX_NEXT_QUEUE>,
    bag: PieceBag,
    score: ScoreState,
    lines: u32,
    last_action: LastAction,
    lock: LockDelay,
    gravity_ms: u32,
    soft_dropping: bool,
    paused: bool,
    started: bool,
    game_over: Option<GameOverReason>,
    /// Monotonic episode id (increments on reset).
    episode_id: u32,
    /// Increments on every spawn drawn from the next queue.
    piece_id: u32,
    /// Increments on every new active piece, including hold swaps.
    active_id: u32,
    last_event: Option<LockEvent>,
}

impl GameState {
    /// Create a new game with the given config and RNG seed
    pub fn new(config: EngineConfig, seed: u32) -> Self {
        let mut bag = PieceBag::new(seed);
        let mut next_queue = ArrayVec::new();
        while !next_queue.is_full() {
            next_queue.push(bag.draw());
        }

        Self {
            config,
            board: Board::new(),
            active: None,
            hold: None,
            can_hold: true,
            next_queue,
            bag,
            score: ScoreState::new(),
            lines: 0,
            last_action: LastAction::None,
            lock: LockDelay::default(),
            gravity_ms: 0,
            soft_dropping: false,
            paused: false,
            started: false,
            game_over: None,
            episode_id: 0,
            piece_id: 0,
            active_id: 0,
            last_event: None,
        }
    }

    /// Create a game over a prepared board. The game is not started.
    pub fn from_board(config: EngineConfig, seed: u32, board: Board) -> Self {
        let mut state = Self::new(config, seed);
        state.board = board;
        state
    }

    /// Start the game and spawn the first piece
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        self.gravity_ms = 0;
        self.spawn_piece();
    }

    /// Start a fresh game. The bag continues from the current RNG state.
    pub fn reset(&mut self) {
        let seed = self.bag.rng_state();
        self.reset_with_seed(seed);
    }

    pub fn reset_with_seed(&mut self, seed: u32) {
        let episode_id = self.episode_id.wrapping_add(1);
        let config = self.config.clone();
        *self = Self::new(config, seed);
        self.episode_id = episode_id;
        info!(episode_id, seed, "game reset");
        self.start();
    }

    /// Replace the configuration at runtime.
    ///
    /// A new gravity interval restarts the gravity timer. The queue itself is untouched;
    /// `next_queue_size` only limits how much of it [`GameState::next_queue`] exposes.
    pub fn apply_settings(&mut self, config: EngineConfig) {
        if config.gravity_ms != self.config.gravity_ms {
            self.gravity_ms = 0;
        }
        debug!(?config, "settings applied");
        self.config = config;
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn started(&self) -> bool {
        self.started
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over.is_some()
    }

    pub fn game_over_reason(&self) -> Option<GameOverReason> {
        self.game_over
    }

    pub fn can_hold(&self) -> bool {
        self.can_hold
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn piece_id(&self) -> u32 {
        self.piece_id
    }

    pub fn active_id(&self) -> u32 {
        self.active_id
    }

    pub fn score(&self) -> u32 {
        self.score.score
    }

    pub fn score_state(&self) -> &ScoreState {
        &self.score
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn hold_piece(&self) -> Option<PieceKind> {
        self.hold
    }

    pub fn next_queue(&self) -> &[PieceKind] {
        &self.next_queue[..self.config.next_queue_size.clamp(1, MAX_NEXT_QUEUE)]
    }

    pub fn active(&self) -> Option<Tetromino> {
        self.active
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn lock_delay(&self) -> &LockDelay {
        &self.lock
    }

    pub fn last_action(&self) -> LastAction {
        self.last_action
    }

    pub fn seed(&self) -> u32 {
        self.bag.seed()
    }

    pub fn is_soft_dropping(&self) -> bool {
        self.soft_dropping
    }

    pub fn phase(&self) -> PiecePhase {
        match self.active {
            None => PiecePhase::None,
            Some(_) if self.lock.landed => PiecePhase::Landed,
            Some(_) => PiecePhase::Falling,
        }
    }

    fn accepts_input(&self) -> bool {
        self.started && !self.paused && self.game_over.is_none() && self.active.is_some()
    }

    fn end_game(&mut self, reason: GameOverReason) {
        self.game_over = Some(reason);
        self.active = None;
        self.lock = LockDelay::default();
        self.gravity_ms = 0;
        info!(?reason, score = self.score.score, lines = self.lines, "game over");
    }

    /// Draw the next kind from the queue and spawn it
    pub fn spawn_piece(&mut self) -> bool {
        if self.game_over.is_some() {
            return false;
        }
        let kind = self.next_queue.remove(0);
        self.next_queue.push(self.bag.draw());
        self.piece_id = self.piece_id.wrapping_add(1);
        self.spawn(kind)
    }

    /// Place `kind` at the spawn position. A collision is a block-out.
    pub fn spawn(&mut self, kind: PieceKind) -> bool {
        let piece = Tetromino::spawn(kind);
        if !piece.fits(&self.board) {
            debug!(?kind, x = piece.x, y = piece.y, "spawn blocked");
            self.end_game(GameOverReason::BlockOut);
            return false;
        }

        self.active = Some(piece);
        self.active_id = self.active_id.wrapping_add(1);
        self.can_hold = true;
        self.last_action = LastAction::None;
        self.lock = LockDelay::default();
        if piece.is_landed(&self.board) {
            self.lock.landed = true;
            self.lock.arm();
        }
        debug!(?kind, piece_id = self.piece_id, active_id = self.active_id, "spawned");
        true
    }

    /// Landed re-check after a successful move or rotation.
    ///
    /// Landed: count a reset and re-arm the timer, or lock once the limit is exceeded.
    /// Airborne: cancel the timer and forget earlier resets.
    fn after_manipulation(&mut self) {
        let Some(piece) = self.active else {
            return;
        };
        if piece.is_landed(&self.board) {
            self.lock.landed = true;
            self.lock.reset_count = self.lock.reset_count.saturating_add(1);
            if self.lock.reset_count > self.config.max_lock_resets {
                trace!(resets = self.lock.reset_count, "lock reset limit exceeded");
                self.lock_piece();
            } else {
                self.lock.arm();
            }
        } else {
            self.lock.landed = false;
            self.lock.reset_count = 0;
            self.lock.cancel();
        }
    }

    /// Shift one column without lock bookkeeping.
    fn step_horizontal(&mut self, dx: i8) -> bool {
        let Some(active) = self.active else {
            return false;
        };
        let moved = active.shifted(dx, 0);
        if !moved.fits(&self.board) {
            return false;
        }
        self.active = Some(moved);
        self.last_action = LastAction::Move;
        true
    }

    /// Move one column left (`-1`) or right (`1`)
    pub fn try_move(&mut self, dx: i8) -> bool {
        if !self.accepts_input() || !self.step_horizontal(dx) {
            return false;
        }
        self.after_manipulation();
        true
    }

    pub fn move_left(&mut self) -> bool {
        self.try_move(Direction::Left.dx())
    }

    pub fn move_right(&mut self) -> bool {
        self.try_move(Direction::Right.dx())
    }

    /// Shift until blocked. Counts as a single move for lock resets.
    pub fn move_all_the_way(&mut self, direction: Direction) -> bool {
        if !self.accepts_input() {
            return false;
        }
        let mut moved = false;
        while self.step_horizontal(direction.dx()) {
            moved = true;
        }
        if moved {
            self.after_manipulation();
        }
        moved
    }

    /// Move down one row.
    ///
    /// Success clears the landed state; failure marks the piece landed and arms the
    /// lock timer if it was airborne.
    pub fn move_down(&mut self, soft_drop: bool) -> bool {
        if !self.accepts_input() {
            return false;
        }
        let Some(active) = self.active else {
            return false;
        };
        let moved = active.shifted(0, 1);
        if moved.fits(&self.board) {
            self.active = Some(moved);
            self.lock.landed = false;
            self.lock.reset_count = 0;
            self.lock.cancel();
            self.last_action = LastAction::Move;
            if soft_drop {
                self.score.add_drop(1, false);
            }
            true
        } else {
            if !self.lock.landed {
                self.lock.landed = true;
                self.lock.arm();
            }
            false
        }
    }

    /// Soft drop until landed. Does not lock.
    pub fn move_to_bottom(&mut self) -> bool {
        let mut moved = false;
        while self.move_down(true) {
            moved = true;
        }
        moved
    }

    /// Rotate with SRS wall kicks. O never rotates.
    pub fn rotate(&mut self, clockwise: bool) -> bool {
        if !self.accepts_input() {
            return false;
        }
        let Some(active) = self.active else {
            return false;
        };

        let board = &self.board;
        let result = try_rotate(
            active.kind,
            active.rotation,
            active.x,
            active.y,
            clockwise,
            |x, y| board.is_occupied(x, y),
        );

        let Some(result) = result else {
            return false;
        };
        trace!(kind = ?active.kind, to = ?result.rotation, kick = ?result.kick, "rotated");
        self.active = Some(Tetromino {
            rotation: result.rotation,
            x: result.x,
            y: result.y,
            ..active
        });
        self.last_action = LastAction::Rotate { kick: result.kick };
        self.after_manipulation();
        true
    }

    /// Two clockwise rotations. Not atomic: if the second fails the piece keeps the
    /// first. Stops early when the first one locked the piece.
    ///
    /// Returns true whenever the piece changed, i.e. the first step succeeded.
    pub fn rotate180(&mut self) -> bool {
        let id = self.active_id;
        if !self.rotate(true) {
            return false;
        }
        if self.active_id == id && self.active.is_some() && !self.rotate(true) {
            trace!("second half of 180 blocked, keeping single rotation");
        }
        true
    }

    /// Drop to the lowest valid row and lock immediately
    pub fn hard_drop(&mut self) -> bool {
        if !self.accepts_input() {
            return false;
        }
        let Some(mut active) = self.active else {
            return false;
        };

        let mut rows = 0u32;
        while active.shifted(0, 1).fits(&self.board) {
            active = active.shifted(0, 1);
            rows += 1;
        }
        self.active = Some(active);
        self.score.add_drop(rows, true);

        // A spin followed by a hard drop is still T-spin eligible.
        if !self.last_action.is_rotate() {
            self.last_action = LastAction::HardDrop;
        }
        self.lock_piece();
        true
    }

    /// Stash the active kind and bring in the held one (or the next queued piece).
    /// Once per piece.
    pub fn hold(&mut self) -> bool {
        if !self.accepts_input() || !self.can_hold {
            return false;
        }
        let Some(active) = self.active.take() else {
            return false;
        };

        let previous = self.hold.replace(active.kind);
        debug!(held = ?active.kind, swapped_in = ?previous, "hold");
        let spawned = match previous {
            Some(kind) => self.spawn(kind),
            None => self.spawn_piece(),
        };
        self.can_hold = false;
        spawned
    }

    /// Write the active piece to the board, evaluate the lock and spawn the next piece
    pub fn lock_piece(&mut self) {
        let Some(piece) = self.active.take() else {
            return;
        };
        self.lock = LockDelay::default();

        let cells = piece.cells();
        self.board.place(&cells, piece.kind);

        let in_visible = cells.iter().any(|&(_, y)| y >= BUFFER_HEIGHT as i8);
        let above_board = cells.iter().any(|&(_, y)| y < 0);
        if !in_visible || above_board {
            self.end_game(GameOverReason::LockOut);
            return;
        }

        let tspin = classify_tspin(&self.board, &piece, self.last_action);
        let lines_cleared = self.board.clear_and_collapse();
        let perfect_clear = lines_cleared > 0 && self.board.is_visible_area_empty();
        let result = self.score.apply_lock(lines_cleared, tspin, perfect_clear);
        self.lines += lines_cleared;

        let event = LockEvent {
            lines_cleared,
            tspin,
            perfect_clear,
            clear_kind: ClearKind::classify(lines_cleared, tspin, perfect_clear),
            points: result.total,
            combo: self.score.combo,
            back_to_back: self.score.back_to_back,
            back_to_back_count: self.score.back_to_back_count,
        };
        debug!(
            kind = ?piece.kind,
            lines = lines_cleared,
            tspin = ?tspin,
            perfect_clear,
            points = result.total,
            combo = self.score.combo,
            "locked"
        );
        self.last_event = Some(event);

        self.spawn_piece();
    }

    /// Take and clear the last lock event.
    pub fn take_last_event(&mut self) -> Option<LockEvent> {
        self.last_event.take()
    }

    /// Host reports whether soft drop is held; gravity is suppressed while it is.
    pub fn set_soft_dropping(&mut self, held: bool) {
        self.soft_dropping = held;
    }

    pub fn set_paused(&mut self, paused: bool) {
        if self.paused != paused {
            debug!(paused, "pause toggled");
        }
        self.paused = paused;
    }

    /// Lowest pivot row the active piece can fall to
    pub fn ghost_y(&self) -> Option<i8> {
        let mut piece = self.active?;
        while piece.shifted(0, 1).fits(&self.board) {
            piece = piece.shifted(0, 1);
        }
        Some(piece.y)
    }

    fn gravity_running(&self) -> bool {
        !self.soft_dropping && self.active.is_some()
    }

    fn on_lock_timer(&mut self) {
        let Some(piece) = self.active else {
            return;
        };
        if piece.is_landed(&self.board) {
            self.lock_piece();
        } else {
            self.lock.landed = false;
            self.lock.reset_count = 0;
            self.lock.cancel();
        }
    }

    /// Advance both timers by `delta_ms`, firing each as many times as it elapses.
    /// Returns true if any timer fired.
    pub fn tick(&mut self, delta_ms: u32) -> bool {
        if !self.started || self.paused || self.game_over.is_some() {
            return false;
        }

        let gravity_interval = self.config.gravity_ms.max(1);
        let mut remaining = delta_ms;
        let mut fired = false;

        while self.active.is_some() && self.game_over.is_none() {
            let to_gravity = self
                .gravity_running()
                .then(|| gravity_interval.saturating_sub(self.gravity_ms));
            let to_lock = self
                .lock
                .timer_ms
                .map(|elapsed| self.config.lock_delay_ms.saturating_sub(elapsed));

            let step = match (to_gravity, to_lock) {
                (Some(g), Some(l)) => g.min(l),
                (Some(g), None) => g,
                (None, Some(l)) => l,
                (None, None) => break,
            };
            let step = step.min(remaining);

            if self.gravity_running() {
                self.gravity_ms += step;
            }
            if let Some(elapsed) = self.lock.timer_ms.as_mut() {
                *elapsed += step;
            }
            remaining -= step;

            let lock_due = to_lock.is_some_and(|l| l == step);
            let gravity_due = to_gravity.is_some_and(|g| g == step);
            if !lock_due && !gravity_due {
                break;
            }

            let id = self.active_id;
            if lock_due {
                fired = true;
                self.on_lock_timer();
            }
            if gravity_due {
                fired = true;
                self.gravity_ms = 0;
                if self.active_id == id {
                    self.move_down(false);
                }
            }
        }

        fired
    }

    /// Apply a discrete action
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::MoveLeft => self.move_left(),
            GameAction::MoveRight => self.move_right(),
            GameAction::MoveAllTheWayLeft => self.move_all_the_way(Direction::Left),
            GameAction::MoveAllTheWayRight => self.move_all_the_way(Direction::Right),
            GameAction::SoftDrop => self.move_down(true),
            GameAction::MoveToBottom => self.move_to_bottom(),
            GameAction::HardDrop => self.hard_drop(),
            GameAction::RotateCw => self.rotate(true),
            GameAction::RotateCcw => self.rotate(false),
            GameAction::Rotate180 => self.rotate180(),
            GameAction::Hold => self.hold(),
            GameAction::Pause => {
                if self.game_over.is_some() {
                    return false;
                }
                self.set_paused(!self.paused);
                true
            }
            GameAction::Restart => {
                self.reset();
                true
            }
        }
    }

    /// Read-only view for renderers and planners
    pub fn snapshot(&self) -> GameSnapshot {
        let mut board = [[0u8; BOARD_WIDTH as usize]; VISIBLE_HEIGHT as usize];
        self.board.write_visible_grid(&mut board);

        GameSnapshot {
            board,
            active: self.active.map(ActiveSnapshot::from),
            ghost_y: if self.config.ghost_piece_enabled {
                self.ghost_y()
            } else {
                None
            },
            hold: self.hold,
            next_queue: self.next_queue().iter().copied().collect(),
            can_hold: self.can_hold,
            phase: self.phase(),
            paused: self.paused,
            game_over: self.game_over,
            score: self.score,
            lines: self.lines,
            lock: LockSnapshot {
                landed: self.lock.landed,
                reset_count: self.lock.reset_count,
                lock_in_ms: self
                    .lock
                    .timer_ms
                    .map(|e| self.config.lock_delay_ms.saturating_sub(e)),
            },
            episode_id: self.episode_id,
            piece_id: self.piece_id,
            active_id: self.active_id,
            seed: self.bag.seed(),
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(EngineConfig::default(), 1)
    }
}
