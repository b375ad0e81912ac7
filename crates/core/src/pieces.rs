//! Pieces module - Tetromino catalog and SRS rotation system
//!
//! Every kind is defined by its rotation-state grids, a pivot cell inside the grid
//! and a display color. Mino offsets are measured from the pivot, so the active
//! piece position is the pivot's board position.
//!
//! Implements the Super Rotation System (SRS) with wall kick tables.
//! Reference: https://tetris.wiki/SRS

use crate::types::{KickOffset, PieceKind, Rotation, BOARD_WIDTH, BUFFER_HEIGHT};

/// Offset of a single mino relative to the pivot, (dx, dy) with y down.
pub type MinoOffset = (i8, i8);

/// Shape of a piece - 4 mino offsets from the pivot
pub type PieceShape = [MinoOffset; 4];

/// A rotation-state grid, row-major, 1 = filled.
pub type ShapeGrid = &'static [&'static [u8]];

/// Static catalog entry for one piece kind.
#[derive(Debug)]
pub struct PieceDef {
    /// Rotation-state grids in SRS order (0, R, 2, L). O has a single state.
    pub shapes: &'static [ShapeGrid],
    /// Pivot cell within each grid as (row, col).
    pub pivot: (i8, i8),
    /// Display color (0xRRGGBB), cosmetic only.
    pub color: u32,
}

static I_DEF: PieceDef = PieceDef {
    shapes: &[
        &[&[0, 0, 0, 0], &[1, 1, 1, 1], &[0, 0, 0, 0], &[0, 0, 0, 0]],
        &[&[0, 0, 1, 0], &[0, 0, 1, 0], &[0, 0, 1, 0], &[0, 0, 1, 0]],
        &[&[0, 0, 0, 0], &[0, 0, 0, 0], &[1, 1, 1, 1], &[0, 0, 0, 0]],
        &[&[0, 1, 0, 0], &[0, 1, 0, 0], &[0, 1, 0, 0], &[0, 1, 0, 0]],
    ],
    pivot: (1, 1),
    color: 0x00ffff,
};

// Padded to 3x3 so it centers like the other kinds.
static O_DEF: PieceDef = PieceDef {
    shapes: &[&[&[0, 0, 0], &[0, 1, 1], &[0, 1, 1]]],
    pivot: (1, 1),
    color: 0xffff00,
};

static T_DEF: PieceDef = PieceDef {
    shapes: &[
        &[&[0, 1, 0], &[1, 1, 1], &[0, 0, 0]],
        &[&[0, 1, 0], &[0, 1, 1], &[0, 1, 0]],
        &[&[0, 0, 0], &[1, 1, 1], &[0, 1, 0]],
        &[&[0, 1, 0], &[1, 1, 0], &[0, 1, 0]],
    ],
    pivot: (1, 1),
    color: 0x800080,
};

static S_DEF: PieceDef = PieceDef {
    shapes: &[
        &[&[0, 1, 1], &[1, 1, 0], &[0, 0, 0]],
        &[&[0, 1, 0], &[0, 1, 1], &[0, 0, 1]],
        &[&[0, 0, 0], &[0, 1, 1], &[1, 1, 0]],
        &[&[1, 0, 0], &[1, 1, 0], &[0, 1, 0]],
    ],
    pivot: (1, 1),
    color: 0x00ff00,
};

static Z_DEF: PieceDef = PieceDef {
    shapes: &[
        &[&[1, 1, 0], &[0, 1, 1], &[0, 0, 0]],
        &[&[0, 0, 1], &[0, 1, 1], &[0, 1, 0]],
        &[&[0, 0, 0], &[1, 1, 0], &[0, 1, 1]],
        &[&[0, 1, 0], &[1, 1, 0], &[1, 0, 0]],
    ],
    pivot: (1, 1),
    color: 0xff0000,
};

static J_DEF: PieceDef = PieceDef {
    shapes: &[
        &[&[1, 0, 0], &[1, 1, 1], &[0, 0, 0]],
        &[&[0, 1, 1], &[0, 1, 0], &[0, 1, 0]],
        &[&[0, 0, 0], &[1, 1, 1], &[0, 0, 1]],
        &[&[0, 1, 0], &[0, 1, 0], &[1, 1, 0]],
    ],
    pivot: (1, 1),
    color: 0x0000ff,
};

static L_DEF: PieceDef = PieceDef {
    shapes: &[
        &[&[0, 0, 1], &[1, 1, 1], &[0, 0, 0]],
        &[&[0, 1, 0], &[0, 1, 0], &[0, 1, 1]],
        &[&[0, 0, 0], &[1, 1, 1], &[1, 0, 0]],
        &[&[1, 1, 0], &[0, 1, 0], &[0, 1, 0]],
    ],
    pivot: (1, 1),
    color: 0xffa500,
};

/// Catalog lookup.
pub fn definition(kind: PieceKind) -> &'static PieceDef {
    match kind {
        PieceKind::I => &I_DEF,
        PieceKind::O => &O_DEF,
        PieceKind::T => &T_DEF,
        PieceKind::S => &S_DEF,
        PieceKind::Z => &Z_DEF,
        PieceKind::J => &J_DEF,
        PieceKind::L => &L_DEF,
    }
}

/// Number of distinct rotation states (1 for O, 4 otherwise).
pub fn rotation_count(kind: PieceKind) -> usize {
    definition(kind).shapes.len()
}

pub fn color(kind: PieceKind) -> u32 {
    definition(kind).color
}

fn grid(kind: PieceKind, rotation: Rotation) -> ShapeGrid {
    let def = definition(kind);
    def.shapes[rotation.index() as usize % def.shapes.len()]
}

/// Get the shape (pivot-relative mino offsets) for a piece kind and rotation
pub fn get_shape(kind: PieceKind, rotation: Rotation) -> PieceShape {
    let (pr, pc) = definition(kind).pivot;
    let mut out = [(0i8, 0i8); 4];
    let mut n = 0usize;
    for (r, row) in grid(kind, rotation).iter().enumerate() {
        for (c, &filled) in row.iter().enumerate() {
            if filled != 0 && n < out.len() {
                out[n] = (c as i8 - pc, r as i8 - pr);
                n += 1;
            }
        }
    }
    out
}

/// Grid row index of the lowest filled row.
pub fn lowest_row(kind: PieceKind, rotation: Rotation) -> i8 {
    grid(kind, rotation)
        .iter()
        .rposition(|row| row.iter().any(|&c| c != 0))
        .unwrap_or(0) as i8
}

/// Spawn pivot position: centered horizontally, lowest row on the first visible row.
pub fn spawn_position(kind: PieceKind) -> (i8, i8) {
    let (pr, pc) = definition(kind).pivot;
    let x = (BOARD_WIDTH / 2) as i8 - pc;
    let y = BUFFER_HEIGHT as i8 - (lowest_row(kind, Rotation::North) - pr);
    (x, y)
}

/// SRS wall kick data, up-positive (x, y)
/// Order: 0=initial rotation, 1-4=wall kicks
pub type KickTable = [[(i8, i8); 5]; 8];

/// JLSTZ kick table (shared by J, L, S, T, Z)
const JLSTZ_KICKS: KickTable = [
    // 0->1 (N->E, clockwise)
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    // 0->3 (N->W, counter-clockwise)
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    // 1->0 (E->N, counter-clockwise)
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    // 1->2 (E->S, clockwise)
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    // 2->1 (S->E, counter-clockwise)
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    // 2->3 (S->W, clockwise)
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    // 3->2 (W->S, counter-clockwise)
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    // 3->0 (W->N, clockwise)
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
];

/// I piece kick table (different from JLSTZ)
const I_KICKS: KickTable = [
    // 0->1 (N->E)
    [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)],
    // 0->3 (N->W)
    [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)],
    // 1->0 (E->N)
    [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)],
    // 1->2 (E->S)
    [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)],
    // 2->1 (S->E)
    [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)],
    // 2->3 (S->W)
    [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)],
    // 3->2 (W->S)
    [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)],
    // 3->0 (W->N)
    [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)],
];

/// Get the kick table for a piece kind. O has none.
pub fn get_kick_table(kind: PieceKind) -> Option<&'static KickTable> {
    match kind {
        PieceKind::O => None,
        PieceKind::I => Some(&I_KICKS),
        _ => Some(&JLSTZ_KICKS),
    }
}

/// Get the kick index for a rotation transition
fn get_kick_index(from: Rotation, clockwise: bool) -> usize {
    match (from, clockwise) {
        (Rotation::North, true) => 0,  // N->E
        (Rotation::North, false) => 1, // N->W
        (Rotation::East, false) => 2,  // E->N
        (Rotation::East, true) => 3,   // E->S
        (Rotation::South, false) => 4, // S->E
        (Rotation::South, true) => 5,  // S->W
        (Rotation::West, false) => 6,  // W->S
        (Rotation::West, true) => 7,   // W->N
    }
}

/// Kick candidates for the transition out of `from`, in test order.
pub fn kick_offsets(kind: PieceKind, from: Rotation, clockwise: bool) -> [KickOffset; 5] {
    let mut out = [KickOffset::ZERO; 5];
    if let Some(table) = get_kick_table(kind) {
        for (dst, &(x, y)) in out.iter_mut().zip(&table[get_kick_index(from, clockwise)]) {
            *dst = KickOffset::new(x, y);
        }
    }
    out
}

/// A successful SRS rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationResult {
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
    pub kick: KickOffset,
}

/// Try to rotate a piece with wall kicks
///
/// `collides(x, y)` answers whether an absolute cell is blocked. Candidates are tried
/// in table order; the first one that fits wins. O never rotates.
pub fn try_rotate(
    kind: PieceKind,
    rotation: Rotation,
    x: i8,
    y: i8,
    clockwise: bool,
    collides: impl Fn(i8, i8) -> bool,
) -> Option<RotationResult> {
    if rotation_count(kind) < 2 {
        return None;
    }

    let new_rotation = if clockwise {
        rotation.rotate_cw()
    } else {
        rotation.rotate_ccw()
    };
    let new_shape = get_shape(kind, new_rotation);

    for kick in kick_offsets(kind, rotation, clockwise) {
        let new_x = x + kick.x;
        let new_y = y - kick.y;

        let fits = new_shape
            .iter()
            .all(|&(mx, my)| !collides(new_x + mx, new_y + my));

        if fits {
            return Some(RotationResult {
                rotation: new_rotation,
                x: new_x,
                y: new_y,
                kick,
            });
        }
    }

    None
}
