//! Planner bridge: board snapshot out, action tokens in.
//!
//! The engine never searches. A [`MovePlanner`] gets the visible occupancy plus the
//! current and next piece indices and answers with tokens; [`AutoPlayer`] paces them
//! onto a [`GameState`].

use std::collections::VecDeque;

use tracing::{debug, info};

use crate::core::GameState;
use crate::token::ActionToken;
use crate::types::{PieceKind, VISIBLE_CELLS};

/// Delay between auto-played tokens.
pub const DEFAULT_MOVE_INTERVAL_MS: u32 = 100;

/// What a planner sees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanRequest {
    /// Visible rows, row-major from the top, 1 = occupied.
    pub board: [u8; VISIBLE_CELLS],
    /// Active piece index (I=0, O=1, T=2, S=3, Z=4, J=5, L=6).
    pub current: u8,
    pub next: Option<u8>,
}

impl PlanRequest {
    /// `None` when there is no active piece.
    pub fn from_state(state: &GameState) -> Option<Self> {
        let active = state.active()?;
        Some(Self {
            board: state.board().visible_occupancy(),
            current: active.kind.index(),
            next: state.next_queue().first().map(PieceKind::index),
        })
    }

    pub fn current_kind(&self) -> Option<PieceKind> {
        PieceKind::from_index(self.current)
    }

    pub fn next_kind(&self) -> Option<PieceKind> {
        self.next.and_then(PieceKind::from_index)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanReply {
    Next(ActionToken),
    Sequence(Vec<ActionToken>),
}

/// A move-search strategy.
pub trait MovePlanner {
    fn plan(&mut self, request: &PlanRequest) -> PlanReply;
}

impl<P: MovePlanner + ?Sized> MovePlanner for Box<P> {
    fn plan(&mut self, request: &PlanRequest) -> PlanReply {
        (**self).plan(request)
    }
}

/// Replays fixed sequences, one per request.
#[derive(Debug, Clone)]
pub struct ScriptedPlanner {
    sequences: Vec<Vec<ActionToken>>,
    cursor: usize,
    repeat: bool,
}

impl ScriptedPlanner {
    /// Each sequence answers one request; `game_over` once exhausted.
    pub fn new(sequences: Vec<Vec<ActionToken>>) -> Self {
        Self {
            sequences,
            cursor: 0,
            repeat: false,
        }
    }

    /// Answer every request with the same sequence.
    pub fn repeating(sequence: Vec<ActionToken>) -> Self {
        Self {
            sequences: vec![sequence],
            cursor: 0,
            repeat: true,
        }
    }
}

impl MovePlanner for ScriptedPlanner {
    fn plan(&mut self, _request: &PlanRequest) -> PlanReply {
        if self.sequences.is_empty() {
            return PlanReply::Next(ActionToken::GameOver);
        }
        if self.repeat {
            self.cursor %= self.sequences.len();
        }
        match self.sequences.get(self.cursor) {
            Some(seq) => {
                self.cursor += 1;
                PlanReply::Sequence(seq.clone())
            }
            None => PlanReply::Next(ActionToken::GameOver),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenOutcome {
    /// The matching operation succeeded.
    Applied,
    /// The operation was a no-op (blocked, hold unavailable, ...).
    Rejected,
    /// `game_over`: the planner gave up.
    Stop,
}

/// Run one token against the game.
pub fn execute_token(state: &mut GameState, token: ActionToken) -> TokenOutcome {
    let Some(action) = token.to_action() else {
        return TokenOutcome::Stop;
    };
    if state.apply_action(action) {
        TokenOutcome::Applied
    } else {
        TokenOutcome::Rejected
    }
}

/// Paces planner tokens onto a game, one per interval.
#[derive(Debug)]
pub struct AutoPlayer<P> {
    planner: P,
    queue: VecDeque<ActionToken>,
    interval_ms: u32,
    elapsed_ms: u32,
    /// Active piece the queued tokens were planned for.
    planned_for: Option<u32>,
    stopped: bool,
}

impl<P: MovePlanner> AutoPlayer<P> {
    pub fn new(planner: P) -> Self {
        Self::with_interval(planner, DEFAULT_MOVE_INTERVAL_MS)
    }

    pub fn with_interval(planner: P, interval_ms: u32) -> Self {
        Self {
            planner,
            queue: VecDeque::new(),
            interval_ms,
            elapsed_ms: 0,
            planned_for: None,
            stopped: false,
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    pub fn planner(&self) -> &P {
        &self.planner
    }

    /// Resume after a stop, e.g. once the host resets the game.
    pub fn resume(&mut self) {
        self.stopped = false;
        self.queue.clear();
        self.planned_for = None;
    }

    /// Advance time; executes at most one token when the interval has elapsed.
    pub fn update(
        &mut self,
        state: &mut GameState,
        elapsed_ms: u32,
    ) -> Option<(ActionToken, TokenOutcome)> {
        if self.stopped || state.is_game_over() || state.paused() {
            return None;
        }
        state.active()?;

        self.elapsed_ms = self.elapsed_ms.saturating_add(elapsed_ms);
        if self.elapsed_ms < self.interval_ms {
            return None;
        }
        self.elapsed_ms = 0;

        let active_id = state.active_id();
        if self.planned_for != Some(active_id) {
            if !self.queue.is_empty() {
                debug!(dropped = self.queue.len(), "active piece changed, dropping plan");
            }
            self.queue.clear();
            self.planned_for = Some(active_id);
        }

        if self.queue.is_empty() {
            let request = PlanRequest::from_state(state)?;
            match self.planner.plan(&request) {
                PlanReply::Next(token) => self.queue.push_back(token),
                PlanReply::Sequence(tokens) => self.queue.extend(tokens),
            }
        }

        let token = self.queue.pop_front()?;
        let outcome = execute_token(state, token);
        let piece_changed = state.active_id() != active_id;
        match (token, outcome) {
            (_, TokenOutcome::Stop) => {
                info!("planner reported game over, stopping auto-play");
                self.stopped = true;
                self.queue.clear();
            }
            (ActionToken::HardDrop, _) => self.queue.clear(),
            // A hold swap is part of the plan; any other piece change (a move or
            // rotation past the lock reset cap) leaves the rest stale.
            (ActionToken::Hold, _) => {}
            _ if piece_changed => {
                debug!(
                    dropped = self.queue.len(),
                    ?token,
                    "token locked the piece, dropping plan"
                );
                self.queue.clear();
            }
            _ => {}
        }
        self.planned_for = Some(state.active_id());
        Some((token, outcome))
    }
}
