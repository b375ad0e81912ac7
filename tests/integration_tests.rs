//! Integration tests for the gameplay loop: lifecycle, timers, scoring scenarios

use srs_tetris::core::{Board, EngineConfig, GameState};
use srs_tetris::types::{
    ClearKind, GameAction, GameOverReason, PieceKind, PiecePhase, Rotation, TSpinKind,
};

fn started(seed: u32) -> GameState {
    let mut state = GameState::new(EngineConfig::default(), seed);
    state.start();
    state
}

/// Start a game on `board` and replace the first piece with `kind`.
fn started_with(board: Board, kind: PieceKind) -> GameState {
    let mut state = GameState::from_board(EngineConfig::default(), 7, board);
    state.start();
    assert!(state.spawn(kind));
    state
}

#[test]
fn test_game_lifecycle() {
    let mut state = GameState::new(EngineConfig::default(), 12345);
    assert!(!state.started());
    assert!(state.active().is_none());
    assert!(!state.apply_action(GameAction::MoveLeft));

    state.start();
    assert!(state.started());
    assert!(state.active().is_some());
    assert!(!state.is_game_over());
    assert_eq!(state.piece_id(), 1);
    assert_eq!(state.next_queue().len(), 5);
    assert_eq!(state.phase(), PiecePhase::Falling);
}

#[test]
fn test_same_seed_same_game() {
    let script = [
        GameAction::RotateCw,
        GameAction::MoveAllTheWayLeft,
        GameAction::HardDrop,
        GameAction::Hold,
        GameAction::MoveRight,
        GameAction::MoveRight,
        GameAction::HardDrop,
        GameAction::Rotate180,
        GameAction::SoftDrop,
        GameAction::HardDrop,
    ];

    let run = || {
        let mut state = started(99);
        for action in script {
            state.apply_action(action);
            state.tick(16);
        }
        serde_json::to_string(&state.snapshot()).unwrap()
    };
    assert_eq!(run(), run());
}

#[test]
fn test_gravity_moves_one_row_per_interval() {
    let mut state = started(1);
    let y = state.active().unwrap().y;

    assert!(!state.tick(499));
    assert_eq!(state.active().unwrap().y, y);
    assert!(state.tick(1));
    assert_eq!(state.active().unwrap().y, y + 1);

    // A large delta fires gravity once per elapsed interval.
    state.tick(500 * 4);
    assert_eq!(state.active().unwrap().y, y + 5);
}

#[test]
fn test_soft_drop_held_suppresses_gravity() {
    let mut state = started(1);
    let y = state.active().unwrap().y;

    state.set_soft_dropping(true);
    state.tick(2000);
    assert_eq!(state.active().unwrap().y, y);

    state.set_soft_dropping(false);
    state.tick(500);
    assert_eq!(state.active().unwrap().y, y + 1);
}

#[test]
fn test_pause_freezes_play() {
    let mut state = started(5);
    let before = state.active().unwrap();

    assert!(state.apply_action(GameAction::Pause));
    assert!(state.paused());
    assert!(!state.move_left());
    assert!(!state.hard_drop());
    assert!(!state.tick(5000));
    assert_eq!(state.active(), Some(before));

    assert!(state.apply_action(GameAction::Pause));
    assert!(state.move_left());
}

#[test]
fn test_restart_starts_a_new_episode() {
    let mut state = started(3);
    state.hard_drop();
    assert!(state.score() > 0);

    assert!(state.apply_action(GameAction::Restart));
    assert_eq!(state.episode_id(), 1);
    assert_eq!(state.score(), 0);
    assert_eq!(state.lines(), 0);
    assert!(state.started());
    assert!(state.active().is_some());
    assert!(state.board().is_visible_area_empty());
}

#[test]
fn test_hard_drop_scores_two_per_row_and_locks() {
    let mut state = started_with(Board::new(), PieceKind::O);
    let id = state.active_id();

    assert!(state.hard_drop());
    // O spawns with its lowest row on row 20 and falls to row 39.
    assert_eq!(state.score(), 19 * 2);
    assert_eq!(state.active_id(), id + 1);
    assert!(state.board().is_occupied(4, 39));
    assert!(state.board().is_occupied(5, 38));

    let event = state.take_last_event().unwrap();
    assert_eq!(event.lines_cleared, 0);
    assert_eq!(event.clear_kind, None);
    assert!(state.take_last_event().is_none());
}

#[test]
fn test_tspin_after_last_second_rotation() {
    // T-slot at column 4 with an overhang at (3, 37).
    let board = Board::from_rows_bottom(
        &["...#......", "..........", "####.####."],
        PieceKind::J,
    );
    let mut state = started_with(board, PieceKind::T);

    assert!(state.rotate(true));
    assert!(state.move_to_bottom());
    assert_eq!(state.score(), 18);
    assert_eq!(state.phase(), PiecePhase::Landed);

    assert!(state.rotate(true));
    let active = state.active().unwrap();
    assert_eq!(active.rotation, Rotation::South);
    assert_eq!((active.x, active.y), (4, 38));

    // Lock delay expires: the lock fires before the coincident gravity step.
    state.tick(500);
    let event = state.take_last_event().unwrap();
    assert_eq!(event.tspin, TSpinKind::Full);
    assert_eq!(event.lines_cleared, 0);
    assert_eq!(event.clear_kind, Some(ClearKind::TSpin));
    assert_eq!(event.points, 400);
    assert_eq!(event.combo, 1);
    assert_eq!(state.score(), 418);
}

#[test]
fn test_perfect_clear_tetris() {
    let well = ".#########";
    let board = Board::from_rows_bottom(&[well, well, well, well], PieceKind::L);
    let mut state = started_with(board, PieceKind::I);

    assert!(state.rotate(false));
    for _ in 0..4 {
        assert!(state.move_left());
    }
    assert!(!state.move_left());
    assert!(state.hard_drop());

    let event = state.take_last_event().unwrap();
    assert_eq!(event.lines_cleared, 4);
    assert!(event.perfect_clear);
    assert_eq!(event.clear_kind, Some(ClearKind::PerfectClear));
    assert_eq!(event.points, 800 + 3000);
    assert!(event.back_to_back);
    assert_eq!(event.back_to_back_count, 1);
    assert_eq!(state.lines(), 4);
    assert!(state.board().is_visible_area_empty());
}

#[test]
fn test_lock_resets_are_capped() {
    let mut state = started(11);
    assert!(state.move_to_bottom());
    let id = state.active_id();

    for i in 0..15 {
        let moved = if i % 2 == 0 {
            state.move_left()
        } else {
            state.move_right()
        };
        assert!(moved);
        assert_eq!(state.active_id(), id, "locked early at shift {i}");
        assert_eq!(state.lock_delay().reset_count, i + 1);
    }

    // The 16th reset exceeds the limit and locks in place.
    assert!(state.move_left());
    assert_eq!(state.active_id(), id + 1);
}

#[test]
fn test_hold_once_per_piece() {
    let mut state = started(21);
    let first = state.active().unwrap().kind;
    let next = state.next_queue()[0];

    assert!(state.hold());
    assert_eq!(state.hold_piece(), Some(first));
    assert_eq!(state.active().unwrap().kind, next);
    assert!(!state.can_hold());
    assert!(!state.hold());

    assert!(state.hard_drop());
    assert!(state.can_hold());
    assert!(state.hold());
    let swapped = state.active().unwrap();
    assert_eq!(swapped.kind, first);
    assert_eq!(swapped.rotation, Rotation::North);
    assert_eq!(
        (swapped.x, swapped.y),
        srs_tetris::core::spawn_position(first)
    );
}

#[test]
fn test_block_out_on_spawn() {
    let mut board = Board::new();
    for y in 19..=21 {
        for x in 3..=6 {
            board.set(x, y, Some(PieceKind::Z));
        }
    }
    let mut state = GameState::from_board(EngineConfig::default(), 1, board);
    state.start();

    assert!(state.is_game_over());
    assert_eq!(state.game_over_reason(), Some(GameOverReason::BlockOut));
    assert!(state.active().is_none());
    assert!(!state.apply_action(GameAction::HardDrop));
    assert!(!state.apply_action(GameAction::Pause));
}

#[test]
fn test_snapshot_hides_ghost_when_disabled() {
    let config = EngineConfig {
        ghost_piece_enabled: false,
        ..EngineConfig::default()
    };
    let mut state = GameState::new(config, 4);
    state.start();
    assert!(state.snapshot().ghost_y.is_none());

    state.apply_settings(EngineConfig::default());
    let snap = state.snapshot();
    assert_eq!(snap.ghost_y, state.ghost_y());
    assert!(snap.playable());
}
