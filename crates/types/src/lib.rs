//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the engine.
//! All types are plain data with no behavior beyond conversions, making them
//! usable in any context (core logic, timing policy, planner bridge, hosts).
//!
//! # Board Dimensions
//!
//! The logical board stacks a hidden buffer above the visible playfield:
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Buffer**: 20 hidden rows (indexed 0-19)
//! - **Visible**: 20 rows (indexed 20-39)
//! - **Height**: 40 rows in total
//!
//! # Timing Defaults
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Fixed host frame interval (~60 FPS) |
//! | `DEFAULT_GRAVITY_MS` | 500 | Delay between gravity steps |
//! | `LOCK_DELAY_MS` | 500 | Time before a landed piece locks |
//! | `LOCK_RESET_LIMIT` | 15 | Max lock-delay resets per piece |
//! | `DEFAULT_DAS_MS` | 133 | Delay before auto-shift starts |
//! | `DEFAULT_ARR_MS` | 16 | Interval between auto-shift repeats |
//! | `DEFAULT_DCD_MS` | 0 | Auto-shift pause after a new piece spawns |
//!
//! # Examples
//!
//! ```
//! use srs_tetris_types::{PieceKind, Rotation, GameAction, BOARD_HEIGHT, BUFFER_HEIGHT};
//!
//! let parsed = PieceKind::from_str("t").unwrap();
//! assert_eq!(parsed, PieceKind::T);
//! assert_eq!(PieceKind::from_index(parsed.index()), Some(PieceKind::T));
//!
//! assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
//! assert_eq!(GameAction::from_str("rotate180"), Some(GameAction::Rotate180));
//!
//! assert_eq!(BOARD_HEIGHT, 40);
//! assert_eq!(BUFFER_HEIGHT, 20);
//! ```

use serde::{Deserialize, Serialize};

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Rows of the visible playfield (20 rows)
pub const VISIBLE_HEIGHT: u8 = 20;

/// Hidden buffer rows stacked above the visible playfield (20 rows)
pub const BUFFER_HEIGHT: u8 = 20;

/// Total logical board height (buffer + visible)
pub const BOARD_HEIGHT: u8 = BUFFER_HEIGHT + VISIBLE_HEIGHT;

/// Number of cells in the visible playfield.
pub const VISIBLE_CELLS: usize = BOARD_WIDTH as usize * VISIBLE_HEIGHT as usize;

/// Fixed host frame interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Default delay between gravity steps.
pub const DEFAULT_GRAVITY_MS: u32 = 500;

/// Lock delay when a piece is landed.
pub const LOCK_DELAY_MS: u32 = 500;

/// Maximum number of lock-delay resets per piece (15)
pub const LOCK_RESET_LIMIT: u8 = 15;

/// DAS (Delayed Auto Shift) delay in milliseconds.
pub const DEFAULT_DAS_MS: u32 = 133;

/// ARR (Auto Repeat Rate) in milliseconds. 0 means "teleport to the wall".
pub const DEFAULT_ARR_MS: u32 = 16;

/// DCD (DAS Cut Delay) in milliseconds.
pub const DEFAULT_DCD_MS: u32 = 0;

/// Default number of pieces shown in the next queue.
pub const DEFAULT_NEXT_QUEUE: usize = 5;

/// Upper bound for the configurable next queue.
pub const MAX_NEXT_QUEUE: usize = 7;

/// Points per row for a soft drop step.
pub const SOFT_DROP_POINTS: u32 = 1;

/// Points per row for a hard drop.
pub const HARD_DROP_POINTS: u32 = 2;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timing_defaults_match_reference_settings() {
        assert_eq!(DEFAULT_GRAVITY_MS, 500);
        assert_eq!(LOCK_DELAY_MS, 500);
        assert_eq!(LOCK_RESET_LIMIT, 15);
        assert_eq!(DEFAULT_DAS_MS, 133);
        assert_eq!(DEFAULT_ARR_MS, 16);
        assert_eq!(DEFAULT_DCD_MS, 0);
        assert_eq!(DEFAULT_NEXT_QUEUE, 5);
    }

    #[test]
    fn piece_index_roundtrip_matches_catalog_order() {
        for (i, kind) in PieceKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i as u8);
            assert_eq!(PieceKind::from_index(i as u8), Some(*kind));
        }
        assert_eq!(PieceKind::from_index(7), None);
    }

    #[test]
    fn clear_kind_labels() {
        assert_eq!(ClearKind::classify(0, TSpinKind::None, false), None);
        assert_eq!(
            ClearKind::classify(4, TSpinKind::None, false),
            Some(ClearKind::Tetris)
        );
        assert_eq!(
            ClearKind::classify(0, TSpinKind::Full, false),
            Some(ClearKind::TSpin)
        );
        assert_eq!(
            ClearKind::classify(2, TSpinKind::Mini, false),
            Some(ClearKind::TSpinMiniDouble)
        );
        // Perfect clear overrides the label.
        assert_eq!(
            ClearKind::classify(4, TSpinKind::None, true),
            Some(ClearKind::PerfectClear)
        );
    }

    #[test]
    fn far_kick_detection() {
        assert!(KickOffset::new(0, -2).is_far());
        assert!(KickOffset::new(1, 2).is_far());
        assert!(!KickOffset::new(-1, 1).is_far());
        assert!(!KickOffset::ZERO.is_far());
    }
}

/// The seven tetromino piece kinds
///
/// Declaration order is the catalog order used for numeric indices
/// (I=0, O=1, T=2, S=3, Z=4, J=5, L=6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    /// All kinds in catalog order.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use srs_tetris_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("O"), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "o" => Some(PieceKind::O),
            "t" => Some(PieceKind::T),
            "s" => Some(PieceKind::S),
            "z" => Some(PieceKind::Z),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::O => "o",
            PieceKind::T => "t",
            PieceKind::S => "s",
            PieceKind::Z => "z",
            PieceKind::J => "j",
            PieceKind::L => "l",
        }
    }

    /// Numeric index used by external planners.
    pub fn index(&self) -> u8 {
        *self as u8
    }

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }
}

/// Rotation states following the Super Rotation System (SRS)
///
/// - **North**: Spawn orientation (state 0)
/// - **East**: Rotated 90° clockwise (state 1)
/// - **South**: Rotated 180° (state 2)
/// - **West**: Rotated 90° counter-clockwise (state 3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rotation {
    North,
    East,
    South,
    West,
}

impl Rotation {
    /// Rotate clockwise (90°)
    ///
    /// # Examples
    ///
    /// ```
    /// use srs_tetris_types::Rotation;
    ///
    /// assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
    /// assert_eq!(Rotation::West.rotate_cw(), Rotation::North);
    /// ```
    pub fn rotate_cw(&self) -> Self {
        match self {
            Rotation::North => Rotation::East,
            Rotation::East => Rotation::South,
            Rotation::South => Rotation::West,
            Rotation::West => Rotation::North,
        }
    }

    /// Rotate counter-clockwise (-90° or 270°)
    pub fn rotate_ccw(&self) -> Self {
        match self {
            Rotation::North => Rotation::West,
            Rotation::West => Rotation::South,
            Rotation::South => Rotation::East,
            Rotation::East => Rotation::North,
        }
    }

    /// Rotation state index (N=0, E=1, S=2, W=3).
    pub fn index(&self) -> u8 {
        *self as u8
    }

    pub fn from_index(index: u8) -> Self {
        match index % 4 {
            0 => Rotation::North,
            1 => Rotation::East,
            2 => Rotation::South,
            _ => Rotation::West,
        }
    }

    /// Parse rotation from string
    ///
    /// Accepts full names or single letters (case-insensitive):
    /// "north" | "n", "east" | "e", "south" | "s", "west" | "w"
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "north" | "n" => Some(Rotation::North),
            "east" | "e" => Some(Rotation::East),
            "south" | "s" => Some(Rotation::South),
            "west" | "w" => Some(Rotation::West),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Rotation::North => "north",
            Rotation::East => "east",
            Rotation::South => "south",
            Rotation::West => "west",
        }
    }
}

/// Discrete engine actions
///
/// These are produced by the timing policy (human input) and by the
/// planner bridge (auto-play), and consumed by `GameState::apply_action`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GameAction {
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Shift left until blocked (ARR = 0)
    MoveAllTheWayLeft,
    /// Shift right until blocked (ARR = 0)
    MoveAllTheWayRight,
    /// Move piece one cell down with soft drop scoring
    SoftDrop,
    /// Soft drop until landed (SDF = ∞), does not lock
    MoveToBottom,
    /// Drop to the lowest valid position and lock immediately
    HardDrop,
    /// Rotate piece 90° clockwise
    RotateCw,
    /// Rotate piece 90° counter-clockwise
    RotateCcw,
    /// Two clockwise rotations, not atomic
    Rotate180,
    /// Hold current piece (once per piece)
    Hold,
    /// Toggle pause state
    Pause,
    /// Restart the game
    Restart,
}

impl GameAction {
    /// Parse action from its camelCase name
    ///
    /// # Examples
    ///
    /// ```
    /// use srs_tetris_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("moveLeft"), Some(GameAction::MoveLeft));
    /// assert_eq!(GameAction::from_str("hardDrop"), Some(GameAction::HardDrop));
    /// assert_eq!(GameAction::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(GameAction::MoveLeft),
            "moveright" => Some(GameAction::MoveRight),
            "moveallthewayleft" => Some(GameAction::MoveAllTheWayLeft),
            "moveallthewayright" => Some(GameAction::MoveAllTheWayRight),
            "softdrop" => Some(GameAction::SoftDrop),
            "movetobottom" => Some(GameAction::MoveToBottom),
            "harddrop" => Some(GameAction::HardDrop),
            "rotatecw" => Some(GameAction::RotateCw),
            "rotateccw" => Some(GameAction::RotateCcw),
            "rotate180" => Some(GameAction::Rotate180),
            "hold" => Some(GameAction::Hold),
            "pause" => Some(GameAction::Pause),
            "restart" => Some(GameAction::Restart),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveRight => "moveRight",
            GameAction::MoveAllTheWayLeft => "moveAllTheWayLeft",
            GameAction::MoveAllTheWayRight => "moveAllTheWayRight",
            GameAction::SoftDrop => "softDrop",
            GameAction::MoveToBottom => "moveToBottom",
            GameAction::HardDrop => "hardDrop",
            GameAction::RotateCw => "rotateCw",
            GameAction::RotateCcw => "rotateCcw",
            GameAction::Rotate180 => "rotate180",
            GameAction::Hold => "hold",
            GameAction::Pause => "pause",
            GameAction::Restart => "restart",
        }
    }
}

/// Horizontal shift direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    pub fn dx(&self) -> i8 {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
        }
    }
}

/// SRS kick offset as listed in the kick tables.
///
/// `y` is up-positive; board rows grow downward, so it is negated when applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct KickOffset {
    pub x: i8,
    pub y: i8,
}

impl KickOffset {
    pub const ZERO: KickOffset = KickOffset { x: 0, y: 0 };

    pub const fn new(x: i8, y: i8) -> Self {
        Self { x, y }
    }

    /// The SRS "far" test (vertical component of 2), which upgrades a mini T-spin.
    pub fn is_far(&self) -> bool {
        self.y.abs() == 2
    }
}

/// The last successful manipulation of the active piece.
///
/// Rotations remember the exact kick used; T-spin classification needs it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum LastAction {
    #[default]
    None,
    Move,
    Rotate {
        kick: KickOffset,
    },
    HardDrop,
}

impl LastAction {
    pub fn is_rotate(&self) -> bool {
        matches!(self, LastAction::Rotate { .. })
    }
}

/// T-Spin detection result
///
/// - **None**: Not a T-spin
/// - **Mini**: one front corner and both back corners occupied
/// - **Full**: both front corners and at least one back corner occupied,
///   or a mini produced by a far kick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TSpinKind {
    #[default]
    None,
    Mini,
    Full,
}

impl TSpinKind {
    /// Returns `None` for `TSpinKind::None`, `Some("mini")` for Mini,
    /// and `Some("full")` for Full.
    pub fn as_str(&self) -> Option<&'static str> {
        match self {
            TSpinKind::None => None,
            TSpinKind::Mini => Some("mini"),
            TSpinKind::Full => Some("full"),
        }
    }

    pub fn is_tspin(&self) -> bool {
        !matches!(self, TSpinKind::None)
    }
}

/// Display label for a scoring lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClearKind {
    Single,
    Double,
    Triple,
    Tetris,
    TSpin,
    TSpinSingle,
    TSpinDouble,
    TSpinTriple,
    TSpinMini,
    TSpinMiniSingle,
    TSpinMiniDouble,
    PerfectClear,
}

impl ClearKind {
    /// Label a lock result. Perfect clear overrides every other label.
    pub fn classify(lines: u32, tspin: TSpinKind, perfect_clear: bool) -> Option<Self> {
        if perfect_clear && lines > 0 {
            return Some(ClearKind::PerfectClear);
        }
        match (tspin, lines) {
            (TSpinKind::Full, 0) => Some(ClearKind::TSpin),
            (TSpinKind::Full, 1) => Some(ClearKind::TSpinSingle),
            (TSpinKind::Full, 2) => Some(ClearKind::TSpinDouble),
            (TSpinKind::Full, _) => Some(ClearKind::TSpinTriple),
            (TSpinKind::Mini, 0) => Some(ClearKind::TSpinMini),
            (TSpinKind::Mini, 1) => Some(ClearKind::TSpinMiniSingle),
            (TSpinKind::Mini, _) => Some(ClearKind::TSpinMiniDouble),
            (TSpinKind::None, 0) => None,
            (TSpinKind::None, 1) => Some(ClearKind::Single),
            (TSpinKind::None, 2) => Some(ClearKind::Double),
            (TSpinKind::None, 3) => Some(ClearKind::Triple),
            (TSpinKind::None, _) => Some(ClearKind::Tetris),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ClearKind::Single => "Single",
            ClearKind::Double => "Double",
            ClearKind::Triple => "Triple",
            ClearKind::Tetris => "Tetris",
            ClearKind::TSpin => "T-Spin",
            ClearKind::TSpinSingle => "T-Spin Single",
            ClearKind::TSpinDouble => "T-Spin Double",
            ClearKind::TSpinTriple => "T-Spin Triple",
            ClearKind::TSpinMini => "T-Spin Mini",
            ClearKind::TSpinMiniSingle => "T-Spin Mini Single",
            ClearKind::TSpinMiniDouble => "T-Spin Mini Double",
            ClearKind::PerfectClear => "Perfect Clear",
        }
    }
}

/// Terminal conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOverReason {
    /// A spawn or hold swap collided with the stack.
    BlockOut,
    /// A piece locked entirely inside the buffer or above the board.
    LockOut,
}

/// Lifecycle of the active piece.
///
/// `Spawning` and `Locked` are transient and only observable from inside the
/// engine; hosts see `None`, `Falling` or `Landed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PiecePhase {
    #[default]
    None,
    Spawning,
    Falling,
    Landed,
    Locked,
}

/// Event emitted after a piece locks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockEvent {
    pub lines_cleared: u32,
    pub tspin: TSpinKind,
    pub perfect_clear: bool,
    pub clear_kind: Option<ClearKind>,
    /// Points awarded for the clear (after B2B, including combo bonus).
    pub points: u32,
    pub combo: u32,
    pub back_to_back: bool,
    pub back_to_back_count: u32,
}

/// A cell on the game board
///
/// - `None`: Empty cell
/// - `Some(PieceKind)`: Cell filled with the specified piece kind
pub type Cell = Option<PieceKind>;

/// Normal line clear points, indexed by lines cleared.
pub const LINE_SCORES: [u32; 5] = [0, 100, 300, 500, 800];

/// Proper T-spin points, indexed by lines cleared (0-3).
pub const TSPIN_SCORES: [u32; 4] = [400, 800, 1200, 1600];

/// Mini T-spin points, indexed by lines cleared (0-2).
pub const TSPIN_MINI_SCORES: [u32; 3] = [100, 200, 400];

/// Flat bonus for emptying the visible playfield.
pub const PERFECT_CLEAR_BONUS: u32 = 3000;

/// Combo scoring base value (50 points per combo step)
pub const COMBO_BASE: u32 = 50;

/// Back-to-back bonus numerator (3/2 = 1.5x multiplier)
pub const B2B_NUMERATOR: u32 = 3;

/// Back-to-back bonus denominator
pub const B2B_DENOMINATOR: u32 = 2;
