//! External planner bridge: requests, token replies and paced execution

use srs_tetris::core::{EngineConfig, GameState};
use srs_tetris::engine::{
    parse_sequence, placement_tokens, ActionToken, AutoPlayer, MovePlanner, PlanReply,
    PlanRequest, ScriptedPlanner, TokenOutcome,
};
use srs_tetris::types::{Rotation, TICK_MS, VISIBLE_CELLS};

/// Stacks everything against the left wall and remembers what it was shown.
#[derive(Default)]
struct LeftWallPlanner {
    seen: Vec<PlanRequest>,
}

impl MovePlanner for LeftWallPlanner {
    fn plan(&mut self, request: &PlanRequest) -> PlanReply {
        self.seen.push(request.clone());
        PlanReply::Sequence(vec![ActionToken::MoveAllTheWayLeft, ActionToken::HardDrop])
    }
}

fn started(seed: u32) -> GameState {
    let mut state = GameState::new(EngineConfig::default(), seed);
    state.start();
    state
}

#[test]
fn test_planner_sees_the_board_it_built() {
    let mut state = started(17);
    let mut player = AutoPlayer::new(LeftWallPlanner::default());
    let first_kind = state.active().unwrap().kind;

    for _ in 0..4 {
        player.update(&mut state, 100);
    }

    let seen = &player.planner().seen;
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].current_kind(), Some(first_kind));
    assert!(seen[0].board.iter().all(|&c| c == 0));

    // The first piece now sits against the left wall.
    let board = &seen[1].board;
    assert_eq!(board.iter().map(|&c| c as u32).sum::<u32>(), 4);
    assert!((0..VISIBLE_CELLS).step_by(10).any(|i| board[i] == 1));
}

#[test]
fn test_scripted_run_tops_out() {
    let mut state = started(5);
    let script = parse_sequence("hard_drop").unwrap();
    let mut player = AutoPlayer::new(ScriptedPlanner::repeating(script));

    let mut ticks = 0;
    while !state.is_game_over() {
        player.update(&mut state, TICK_MS);
        state.tick(TICK_MS);
        ticks += 1;
        assert!(ticks < 100_000, "stack never topped out");
    }

    assert!(state.game_over_reason().is_some());
    assert!(player.update(&mut state, 1000).is_none());
    assert!(!state.snapshot().playable());
}

#[test]
fn test_script_exhaustion_stops_auto_play() {
    let mut state = started(5);
    let sequences = vec![
        parse_sequence("move_left,hard_drop").unwrap(),
        parse_sequence("rotate,hard_drop").unwrap(),
    ];
    let mut player = AutoPlayer::with_interval(ScriptedPlanner::new(sequences), 50);

    let mut outcomes = Vec::new();
    while let Some(step) = player.update(&mut state, 50) {
        outcomes.push(step);
    }

    let tokens: Vec<ActionToken> = outcomes.iter().map(|&(t, _)| t).collect();
    assert_eq!(
        tokens,
        vec![
            ActionToken::MoveLeft,
            ActionToken::HardDrop,
            ActionToken::Rotate,
            ActionToken::HardDrop,
            ActionToken::GameOver,
        ]
    );
    assert_eq!(outcomes.last().map(|&(_, o)| o), Some(TokenOutcome::Stop));
    assert!(player.is_stopped());
    assert_eq!(state.piece_id(), 3);
    assert!(!state.is_game_over());
}

#[test]
fn test_placement_tokens_drive_the_auto_player() {
    let mut state = started(23);
    let tokens = placement_tokens(&state, 7, Rotation::North, false).unwrap();
    let mut player = AutoPlayer::new(ScriptedPlanner::new(vec![tokens.clone()]));
    let id = state.active_id();

    for _ in 0..tokens.len() {
        let (_, outcome) = player.update(&mut state, 100).unwrap();
        assert_eq!(outcome, TokenOutcome::Applied);
    }
    assert_eq!(state.active_id(), id + 1);
    assert!(state.board().is_occupied(7, 39));
}
