//! T-spin classification by diagonal corner occupancy.
//!
//! Evaluated on the board as it stands after the piece locks and before rows clear.

use crate::board::Board;
use crate::game_state::Tetromino;
use crate::types::{LastAction, PieceKind, Rotation, TSpinKind};

/// Diagonal corners of the pivot: top-left, top-right, bottom-left, bottom-right.
const CORNERS: [(i8, i8); 4] = [(-1, -1), (1, -1), (-1, 1), (1, 1)];

const TL: usize = 0;
const TR: usize = 1;
const BL: usize = 2;
const BR: usize = 3;

/// The two corners the T's point faces for each rotation.
fn front_corners(rotation: Rotation) -> [usize; 2] {
    match rotation {
        Rotation::North => [TL, TR],
        Rotation::East => [TR, BR],
        Rotation::South => [BL, BR],
        Rotation::West => [TL, BL],
    }
}

/// Occupancy of the four corners around `(x, y)`; anything off the board counts as filled.
pub fn corner_occupancy(board: &Board, x: i8, y: i8) -> [bool; 4] {
    CORNERS.map(|(dx, dy)| {
        let (cx, cy) = (x + dx, y + dy);
        board.is_out_of_bounds(cx, cy) || board.is_occupied(cx, cy)
    })
}

/// Classify a lock. Requires a T piece whose last successful action was a rotation.
pub fn classify_tspin(board: &Board, piece: &Tetromino, last_action: LastAction) -> TSpinKind {
    if piece.kind != PieceKind::T {
        return TSpinKind::None;
    }
    let LastAction::Rotate { kick } = last_action else {
        return TSpinKind::None;
    };

    let corners = corner_occupancy(board, piece.x, piece.y);
    let total = corners.iter().filter(|&&c| c).count();
    if total < 3 {
        return TSpinKind::None;
    }

    let front = front_corners(piece.rotation);
    let front_filled = front.iter().filter(|&&i| corners[i]).count();
    let back_filled = (0..4)
        .filter(|i| !front.contains(i) && corners[*i])
        .count();

    if front_filled >= 2 {
        TSpinKind::Full
    } else if front_filled == 1 && back_filled == 2 {
        if kick.is_far() {
            TSpinKind::Full
        } else {
            TSpinKind::Mini
        }
    } else {
        TSpinKind::None
    }
}
