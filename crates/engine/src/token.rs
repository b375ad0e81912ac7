//! Action tokens exchanged with external move-search engines.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::GameAction;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("unknown action token `{0}`")]
    Unknown(String),
}

/// One step of a planner's move sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionToken {
    MoveLeft,
    MoveRight,
    MoveAllTheWayLeft,
    MoveAllTheWayRight,
    /// Clockwise rotation.
    Rotate,
    RotateCcw,
    #[serde(rename = "rotate_180")]
    Rotate180,
    /// One soft drop step.
    MoveDown,
    MoveToBottom,
    HardDrop,
    Hold,
    /// The planner found no legal move; stop auto-play.
    GameOver,
}

impl ActionToken {
    pub const ALL: [ActionToken; 12] = [
        ActionToken::MoveLeft,
        ActionToken::MoveRight,
        ActionToken::MoveAllTheWayLeft,
        ActionToken::MoveAllTheWayRight,
        ActionToken::Rotate,
        ActionToken::RotateCcw,
        ActionToken::Rotate180,
        ActionToken::MoveDown,
        ActionToken::MoveToBottom,
        ActionToken::HardDrop,
        ActionToken::Hold,
        ActionToken::GameOver,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionToken::MoveLeft => "move_left",
            ActionToken::MoveRight => "move_right",
            ActionToken::MoveAllTheWayLeft => "move_all_the_way_left",
            ActionToken::MoveAllTheWayRight => "move_all_the_way_right",
            ActionToken::Rotate => "rotate",
            ActionToken::RotateCcw => "rotate_ccw",
            ActionToken::Rotate180 => "rotate_180",
            ActionToken::MoveDown => "move_down",
            ActionToken::MoveToBottom => "move_to_bottom",
            ActionToken::HardDrop => "hard_drop",
            ActionToken::Hold => "hold",
            ActionToken::GameOver => "game_over",
        }
    }

    /// Engine action for this token. `game_over` has none.
    pub fn to_action(&self) -> Option<GameAction> {
        Some(match self {
            ActionToken::MoveLeft => GameAction::MoveLeft,
            ActionToken::MoveRight => GameAction::MoveRight,
            ActionToken::MoveAllTheWayLeft => GameAction::MoveAllTheWayLeft,
            ActionToken::MoveAllTheWayRight => GameAction::MoveAllTheWayRight,
            ActionToken::Rotate => GameAction::RotateCw,
            ActionToken::RotateCcw => GameAction::RotateCcw,
            ActionToken::Rotate180 => GameAction::Rotate180,
            ActionToken::MoveDown => GameAction::SoftDrop,
            ActionToken::MoveToBottom => GameAction::MoveToBottom,
            ActionToken::HardDrop => GameAction::HardDrop,
            ActionToken::Hold => GameAction::Hold,
            ActionToken::GameOver => return None,
        })
    }
}

impl FromStr for ActionToken {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| TokenError::Unknown(s.to_string()))
    }
}

impl fmt::Display for ActionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse a comma-separated token sequence. Empty entries are skipped.
pub fn parse_sequence(s: &str) -> Result<Vec<ActionToken>, TokenError> {
    s.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::parse)
        .collect()
}

/// Inverse of [`parse_sequence`].
pub fn format_sequence(tokens: &[ActionToken]) -> String {
    tokens
        .iter()
        .map(ActionToken::as_str)
        .collect::<Vec<_>>()
        .join(",")
}
