//! DAS/ARR/SDF/DCD timing policy.
//!
//! Pure state machine: the host reports which inputs are held each frame and how much
//! time passed; the handler answers with the discrete actions to apply. It never
//! touches the game state itself.

use arrayvec::ArrayVec;

use crate::core::{EngineConfig, SoftDropFactor};
use crate::types::{Direction, GameAction, BOARD_WIDTH, DEFAULT_GRAVITY_MS, VISIBLE_HEIGHT};

/// Capacity of the per-frame action buffer.
pub const MAX_FRAME_ACTIONS: usize = 32;

/// More auto-shift steps than this in one frame collapse into a single move-all-the-way.
const MAX_SHIFT_STEPS: u32 = BOARD_WIDTH as u32;

/// More soft drop steps than this in one frame collapse into a single move-to-bottom.
const MAX_SOFT_DROP_STEPS: u32 = VISIBLE_HEIGHT as u32;

/// Per-frame held state reported by the host's device layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeldInputs {
    pub left: bool,
    pub right: bool,
    pub soft_drop: bool,
}

impl HeldInputs {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn left() -> Self {
        Self {
            left: true,
            ..Self::default()
        }
    }

    pub fn right() -> Self {
        Self {
            right: true,
            ..Self::default()
        }
    }

    pub fn soft_drop() -> Self {
        Self {
            soft_drop: true,
            ..Self::default()
        }
    }
}

/// Timing fields consumed from the engine config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingConfig {
    pub das: u32,
    pub arr: u32,
    pub dcd: u32,
    pub sdf: SoftDropFactor,
    pub gravity_ms: u32,
}

impl From<&EngineConfig> for TimingConfig {
    fn from(cfg: &EngineConfig) -> Self {
        Self {
            das: cfg.das,
            arr: cfg.arr,
            dcd: cfg.dcd,
            sdf: cfg.sdf,
            gravity_ms: cfg.gravity_ms,
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self::from(&EngineConfig::default())
    }
}

/// Interval between soft drop steps, `None` for instant soft drop.
pub fn soft_drop_interval_ms(sdf: SoftDropFactor, gravity_ms: u32) -> Option<u32> {
    let gravity = if gravity_ms == 0 {
        DEFAULT_GRAVITY_MS
    } else {
        gravity_ms
    };
    sdf.interval_ms(gravity)
}

fn shift_action(direction: Direction) -> GameAction {
    match direction {
        Direction::Left => GameAction::MoveLeft,
        Direction::Right => GameAction::MoveRight,
    }
}

fn shift_all_action(direction: Direction) -> GameAction {
    match direction {
        Direction::Left => GameAction::MoveAllTheWayLeft,
        Direction::Right => GameAction::MoveAllTheWayRight,
    }
}

/// Tracks held inputs across frames for DAS/ARR handling.
#[derive(Debug, Clone)]
pub struct InputHandler {
    timing: TimingConfig,
    previous: HeldInputs,
    /// Direction currently driving auto-shift (most recent press wins).
    horizontal: Option<Direction>,
    das_timer: u32,
    das_charged: bool,
    arr_accumulator: u32,
    /// ARR = 0 shift waiting for the DCD window to pass.
    pending_shift_all: bool,
    dcd_remaining: u32,
    soft_drop_accumulator: u32,
}

impl InputHandler {
    pub fn new(timing: TimingConfig) -> Self {
        Self {
            timing,
            previous: HeldInputs::none(),
            horizontal: None,
            das_timer: 0,
            das_charged: false,
            arr_accumulator: 0,
            pending_shift_all: false,
            dcd_remaining: 0,
            soft_drop_accumulator: 0,
        }
    }

    pub fn with_config(das: u32, arr: u32) -> Self {
        Self::new(TimingConfig {
            das,
            arr,
            ..TimingConfig::default()
        })
    }

    pub fn timing(&self) -> &TimingConfig {
        &self.timing
    }

    /// Pick up new timing values; held state is kept.
    pub fn apply_settings(&mut self, config: &EngineConfig) {
        self.timing = TimingConfig::from(config);
    }

    pub fn is_das_charged(&self) -> bool {
        self.das_charged
    }

    /// A new piece entered play: pause auto-repeat for `dcd` ms.
    pub fn notify_piece_spawned(&mut self) {
        self.dcd_remaining = self.timing.dcd;
        if self.das_charged && self.timing.arr == 0 {
            self.pending_shift_all = true;
        }
    }

    fn resolve_direction(&self, held: HeldInputs) -> Option<Direction> {
        let left_edge = held.left && !self.previous.left;
        let right_edge = held.right && !self.previous.right;

        match (left_edge, right_edge) {
            (true, false) => return Some(Direction::Left),
            (false, true) => return Some(Direction::Right),
            (true, true) => return Some(Direction::Right),
            (false, false) => {}
        }

        let still_held = |d: Direction| match d {
            Direction::Left => held.left,
            Direction::Right => held.right,
        };
        match self.horizontal {
            Some(d) if still_held(d) => Some(d),
            _ if held.left => Some(Direction::Left),
            _ if held.right => Some(Direction::Right),
            _ => None,
        }
    }

    fn update_horizontal(
        &mut self,
        held: HeldInputs,
        elapsed_ms: u32,
        suppressed: bool,
        actions: &mut ArrayVec<GameAction, MAX_FRAME_ACTIONS>,
    ) {
        let direction = self.resolve_direction(held);

        if direction != self.horizontal {
            self.horizontal = direction;
            self.das_timer = 0;
            self.das_charged = false;
            self.arr_accumulator = 0;
            self.pending_shift_all = false;
            if let Some(d) = direction {
                let _ = actions.try_push(shift_action(d));
            }
            return;
        }

        let Some(direction) = direction else {
            return;
        };

        if !self.das_charged {
            self.das_timer = self.das_timer.saturating_add(elapsed_ms);
            if self.das_timer < self.timing.das {
                return;
            }
            self.das_charged = true;
            self.arr_accumulator = self.das_timer - self.timing.das;
            if self.timing.arr == 0 {
                self.pending_shift_all = true;
            }
        } else {
            self.arr_accumulator = self.arr_accumulator.saturating_add(elapsed_ms);
        }

        if self.timing.arr == 0 {
            self.arr_accumulator = 0;
            if self.pending_shift_all && !suppressed {
                self.pending_shift_all = false;
                let _ = actions.try_push(shift_all_action(direction));
            }
            return;
        }

        let steps = self.arr_accumulator / self.timing.arr;
        self.arr_accumulator %= self.timing.arr;
        if suppressed || steps == 0 {
            return;
        }
        if steps > MAX_SHIFT_STEPS {
            let _ = actions.try_push(shift_all_action(direction));
        } else {
            for _ in 0..steps {
                let _ = actions.try_push(shift_action(direction));
            }
        }
    }

    fn update_soft_drop(
        &mut self,
        held: HeldInputs,
        elapsed_ms: u32,
        actions: &mut ArrayVec<GameAction, MAX_FRAME_ACTIONS>,
    ) {
        if !held.soft_drop {
            self.soft_drop_accumulator = 0;
            return;
        }

        let interval = soft_drop_interval_ms(self.timing.sdf, self.timing.gravity_ms);
        if !self.previous.soft_drop {
            self.soft_drop_accumulator = 0;
            let _ = actions.try_push(match interval {
                None => GameAction::MoveToBottom,
                Some(_) => GameAction::SoftDrop,
            });
            return;
        }

        let Some(interval) = interval else {
            return;
        };
        self.soft_drop_accumulator = self.soft_drop_accumulator.saturating_add(elapsed_ms);
        let steps = self.soft_drop_accumulator / interval;
        self.soft_drop_accumulator %= interval;
        if steps > MAX_SOFT_DROP_STEPS {
            let _ = actions.try_push(GameAction::MoveToBottom);
        } else {
            for _ in 0..steps {
                let _ = actions.try_push(GameAction::SoftDrop);
            }
        }
    }

    /// Advance by one frame and return the actions to apply, in order.
    pub fn update(
        &mut self,
        held: HeldInputs,
        elapsed_ms: u32,
    ) -> ArrayVec<GameAction, MAX_FRAME_ACTIONS> {
        let mut actions = ArrayVec::<GameAction, MAX_FRAME_ACTIONS>::new();

        self.dcd_remaining = self.dcd_remaining.saturating_sub(elapsed_ms);
        let suppressed = self.dcd_remaining > 0;

        // Horizontal first: a press edge is never crowded out. Both passes are
        // capped well below MAX_FRAME_ACTIONS.
        self.update_horizontal(held, elapsed_ms, suppressed, &mut actions);
        self.update_soft_drop(held, elapsed_ms, &mut actions);

        self.previous = held;
        actions
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.timing);
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new(TimingConfig::default())
    }
}
