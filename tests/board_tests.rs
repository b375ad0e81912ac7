//! Board tests - grid access, collision and visible-area line clears

use srs_tetris::core::Board;
use srs_tetris::types::{PieceKind, BOARD_HEIGHT, BOARD_WIDTH, BUFFER_HEIGHT, VISIBLE_CELLS};

#[test]
fn test_board_new_empty() {
    let board = Board::new();
    assert_eq!(board.width(), BOARD_WIDTH);
    assert_eq!(board.height(), BOARD_HEIGHT);

    for y in 0..BOARD_HEIGHT as i8 {
        for x in 0..BOARD_WIDTH as i8 {
            assert_eq!(board.get(x, y), Some(None), "cell ({x}, {y})");
            assert!(!board.is_occupied(x, y));
        }
    }
    assert!(board.is_visible_area_empty());
}

#[test]
fn test_board_get_set_out_of_bounds() {
    let mut board = Board::new();
    assert_eq!(board.get(-1, 0), None);
    assert_eq!(board.get(0, BOARD_HEIGHT as i8), None);
    assert!(!board.set(BOARD_WIDTH as i8, 0, Some(PieceKind::T)));
    assert!(!board.set(0, -1, Some(PieceKind::T)));

    assert!(board.set(5, 30, Some(PieceKind::T)));
    assert_eq!(board.get(5, 30), Some(Some(PieceKind::T)));
    assert!(board.set(5, 30, None));
    assert_eq!(board.get(5, 30), Some(None));
}

#[test]
fn test_walls_and_floor_collide_but_sky_does_not() {
    let board = Board::new();
    assert!(board.is_occupied(-1, 30));
    assert!(board.is_occupied(BOARD_WIDTH as i8, 30));
    assert!(board.is_occupied(4, BOARD_HEIGHT as i8));
    assert!(!board.is_occupied(4, -1));
    assert!(board.is_out_of_bounds(4, -1));
}

#[test]
fn test_clear_single_bottom_row() {
    let mut board = Board::from_rows_bottom(&["....#.....", "##########"], PieceKind::I);

    assert_eq!(board.clear_and_collapse(), 1);
    // The lone block above falls into the bottom row.
    assert_eq!(board.get(4, 39), Some(Some(PieceKind::I)));
    assert_eq!(board.get(4, 38), Some(None));
}

#[test]
fn test_clear_non_adjacent_rows() {
    let mut board = Board::from_rows_bottom(
        &[
            "#.........",
            "##########",
            ".#........",
            "##########",
        ],
        PieceKind::L,
    );

    assert_eq!(board.clear_and_collapse(), 2);
    assert_eq!(board.get(0, 38), Some(Some(PieceKind::L)));
    assert_eq!(board.get(1, 39), Some(Some(PieceKind::L)));
    assert!(!board.is_row_full(39));
}

#[test]
fn test_buffer_rows_are_not_cleared() {
    let mut board = Board::new();
    let buffer_row = BUFFER_HEIGHT as i8 - 1;
    for x in 0..BOARD_WIDTH as i8 {
        board.set(x, buffer_row, Some(PieceKind::O));
    }

    assert_eq!(board.clear_and_collapse(), 0);
    assert!(board.is_row_full(buffer_row as usize));
}

#[test]
fn test_perfect_clear_detection() {
    let mut board = Board::from_rows_bottom(&["##########", "##########"], PieceKind::S);
    assert!(!board.is_visible_area_empty());
    assert_eq!(board.clear_and_collapse(), 2);
    assert!(board.is_visible_area_empty());
}

#[test]
fn test_visible_occupancy_layout() {
    let board = Board::from_rows_bottom(&["#........#"], PieceKind::Z);
    let occ = board.visible_occupancy();

    assert_eq!(occ.len(), VISIBLE_CELLS);
    let last_row = &occ[VISIBLE_CELLS - BOARD_WIDTH as usize..];
    assert_eq!(last_row, &[1, 0, 0, 0, 0, 0, 0, 0, 0, 1]);
    assert_eq!(occ.iter().map(|&c| c as u32).sum::<u32>(), 2);
}

#[test]
fn test_visible_grid_uses_kind_codes() {
    let board = Board::from_rows_bottom(&["#........."], PieceKind::T);
    let mut grid = [[0u8; 10]; 20];
    board.write_visible_grid(&mut grid);
    assert_eq!(grid[19][0], PieceKind::T.index() + 1);
    assert_eq!(grid[19][1], 0);
}

#[test]
fn test_clearing_nothing_leaves_board_identical() {
    let mut board = Board::from_rows_bottom(
        &["#.#.#.#.#.", ".#########", "#########."],
        PieceKind::J,
    );
    board.set(3, 5, Some(PieceKind::I));
    let before = board.clone();

    assert_eq!(board.clear_and_collapse(), 0);
    assert_eq!(board, before);
}
