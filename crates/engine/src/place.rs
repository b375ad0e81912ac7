//! Turn a target placement into a validated token sequence.
//!
//! Planners that think in final placements (column + rotation) use this to produce
//! the tokens the bridge executes. Every step is simulated on a clone first, so a
//! returned sequence is known to reach the target from the current state.

use thiserror::Error;

use crate::core::GameState;
use crate::token::ActionToken;
use crate::types::{Rotation, BOARD_WIDTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlaceError {
    #[error("hold requested when unavailable")]
    HoldUnavailable,
    #[error("could not rotate to target rotation")]
    RotationBlocked,
    #[error("target x would place piece out of bounds")]
    XOutOfBounds,
    #[error("could not move to target x due to collision")]
    XBlocked,
    #[error("game is not playable")]
    NotPlayable,
    #[error("no active piece")]
    NoActive,
}

impl PlaceError {
    pub fn code(self) -> &'static str {
        match self {
            PlaceError::HoldUnavailable => "hold_unavailable",
            PlaceError::RotationBlocked
            | PlaceError::XOutOfBounds
            | PlaceError::XBlocked
            | PlaceError::NotPlayable
            | PlaceError::NoActive => "invalid_place",
        }
    }
}

/// Try one rotation direction on `sim`, pushing tokens as it goes.
fn rotate_steps(sim: &mut GameState, clockwise: bool, steps: u8, tokens: &mut Vec<ActionToken>) -> bool {
    let id = sim.active_id();
    for _ in 0..steps {
        if !sim.rotate(clockwise) || sim.active_id() != id {
            return false;
        }
        tokens.push(if clockwise {
            ActionToken::Rotate
        } else {
            ActionToken::RotateCcw
        });
    }
    true
}

/// Tokens that bring the active (or, with `use_hold`, the held-in) piece to
/// `target_rotation` at pivot column `target_x` and hard drop it.
pub fn placement_tokens(
    state: &GameState,
    target_x: i8,
    target_rotation: Rotation,
    use_hold: bool,
) -> Result<Vec<ActionToken>, PlaceError> {
    if state.paused() || state.is_game_over() || !state.started() {
        return Err(PlaceError::NotPlayable);
    }

    let mut sim = state.clone();
    let mut tokens = Vec::new();

    if use_hold {
        if !sim.hold() {
            return Err(PlaceError::HoldUnavailable);
        }
        tokens.push(ActionToken::Hold);
    }

    let Some(start) = sim.active() else {
        return Err(PlaceError::NoActive);
    };

    // Shorter direction first; for 180 both are two steps.
    let cur = start.rotation.index() as i8;
    let tgt = target_rotation.index() as i8;
    let cw = (tgt - cur).rem_euclid(4) as u8;
    let ccw = (cur - tgt).rem_euclid(4) as u8;
    let mut plans = [(true, cw), (false, ccw)];
    if plans[1].1 < plans[0].1 {
        plans.swap(0, 1);
    }

    let before_rotation = (sim.clone(), tokens.len());
    let mut rotated = false;
    for (clockwise, steps) in plans {
        sim = before_rotation.0.clone();
        tokens.truncate(before_rotation.1);
        if rotate_steps(&mut sim, clockwise, steps, &mut tokens) {
            rotated = true;
            break;
        }
    }
    if !rotated {
        return Err(PlaceError::RotationBlocked);
    }

    let Some(active) = sim.active() else {
        return Err(PlaceError::NoActive);
    };
    if active.rotation != target_rotation {
        return Err(PlaceError::RotationBlocked);
    }

    let shape = active.shape();
    let min_dx = shape.iter().map(|&(dx, _)| dx).min().unwrap_or(0);
    let max_dx = shape.iter().map(|&(dx, _)| dx).max().unwrap_or(0);
    if target_x + min_dx < 0 || target_x + max_dx >= BOARD_WIDTH as i8 {
        return Err(PlaceError::XOutOfBounds);
    }

    let id = sim.active_id();
    let dx = target_x - active.x;
    let (step, token) = if dx > 0 {
        (1, ActionToken::MoveRight)
    } else {
        (-1, ActionToken::MoveLeft)
    };
    for _ in 0..dx.unsigned_abs() {
        if !sim.try_move(step) || sim.active_id() != id {
            return Err(PlaceError::XBlocked);
        }
        tokens.push(token);
    }

    if !sim.hard_drop() {
        return Err(PlaceError::NotPlayable);
    }
    tokens.push(ActionToken::HardDrop);
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Board, EngineConfig};
    use crate::planner::execute_token;
    use crate::types::PieceKind;

    fn started() -> GameState {
        let mut gs = GameState::new(EngineConfig::default(), 1);
        gs.start();
        gs
    }

    #[test]
    fn place_rejected_when_paused() {
        let mut gs = started();
        gs.set_paused(true);
        let a = gs.active().unwrap();
        assert_eq!(
            placement_tokens(&gs, a.x, a.rotation, false),
            Err(PlaceError::NotPlayable)
        );
    }

    #[test]
    fn place_rejected_when_x_out_of_bounds() {
        let gs = started();
        let a = gs.active().unwrap();
        let err = placement_tokens(&gs, -50, a.rotation, false).unwrap_err();
        assert_eq!(err, PlaceError::XOutOfBounds);
        assert_eq!(err.code(), "invalid_place");
    }

    #[test]
    fn place_rejected_when_x_blocked() {
        // A wall in column 1 across the spawn rows.
        let mut board = Board::new();
        for y in 18..40 {
            board.set(1, y, Some(PieceKind::I));
        }
        let mut gs = GameState::from_board(EngineConfig::default(), 1, board);
        gs.start();
        let a = gs.active().unwrap();
        let min_dx = a.shape().iter().map(|&(dx, _)| dx).min().unwrap();
        assert_eq!(
            placement_tokens(&gs, -min_dx, a.rotation, false),
            Err(PlaceError::XBlocked)
        );
    }

    #[test]
    fn tokens_replay_to_the_requested_placement() {
        let gs = started();
        let kind = gs.active().unwrap().kind;
        let target_rotation = if kind == PieceKind::O {
            Rotation::North
        } else {
            Rotation::West
        };
        let tokens = placement_tokens(&gs, 1, target_rotation, false).unwrap();
        assert_eq!(tokens.last(), Some(&ActionToken::HardDrop));

        let mut replay = gs.clone();
        for &t in &tokens {
            assert_ne!(execute_token(&mut replay, t), crate::planner::TokenOutcome::Rejected);
        }
        assert_eq!(replay.piece_id(), gs.piece_id() + 1);

        let shape = crate::core::get_shape(kind, target_rotation);
        let mut xs: Vec<i8> = shape.iter().map(|&(dx, _)| 1 + dx).collect();
        xs.sort();
        let mut filled: Vec<i8> = Vec::new();
        for y in 0..40 {
            for x in 0..BOARD_WIDTH as i8 {
                if replay.board().is_occupied(x, y) {
                    filled.push(x);
                }
            }
        }
        filled.sort();
        assert_eq!(filled, xs);
    }

    #[test]
    fn hold_is_prepended() {
        let gs = started();
        let held_in = gs.next_queue()[0];
        let rotation = Rotation::North;
        let x = crate::core::spawn_position(held_in).0;
        let tokens = placement_tokens(&gs, x, rotation, true).unwrap();
        assert_eq!(tokens, vec![ActionToken::Hold, ActionToken::HardDrop]);

        let mut after_hold = gs.clone();
        after_hold.hold();
        assert_eq!(placement_tokens(&after_hold, x, rotation, true), Err(PlaceError::HoldUnavailable));
    }
}
