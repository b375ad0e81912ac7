//! Property tests: random play never leaves the game in an inconsistent state

use proptest::prelude::*;

use srs_tetris::core::{EngineConfig, GameState};
use srs_tetris::types::{GameAction, BOARD_HEIGHT, BUFFER_HEIGHT};

const ACTIONS: [GameAction; 11] = [
    GameAction::MoveLeft,
    GameAction::MoveRight,
    GameAction::MoveAllTheWayLeft,
    GameAction::MoveAllTheWayRight,
    GameAction::SoftDrop,
    GameAction::MoveToBottom,
    GameAction::HardDrop,
    GameAction::RotateCw,
    GameAction::RotateCcw,
    GameAction::Rotate180,
    GameAction::Hold,
];

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn random_play_keeps_invariants(
        seed in any::<u32>(),
        steps in prop::collection::vec((prop::sample::select(ACTIONS.to_vec()), 0u32..600), 1..300),
    ) {
        let mut gs = GameState::new(EngineConfig::default(), seed);
        gs.start();
        let mut score = gs.score();

        for (action, delta) in steps {
            gs.apply_action(action);
            gs.tick(delta);

            if let Some(active) = gs.active() {
                prop_assert!(active.fits(gs.board()));
                prop_assert!(gs.lock_delay().reset_count <= gs.config().max_lock_resets);
            } else {
                prop_assert!(gs.is_game_over());
            }
            for y in BUFFER_HEIGHT as usize..BOARD_HEIGHT as usize {
                prop_assert!(!gs.board().is_row_full(y));
            }
            prop_assert_eq!(gs.next_queue().len(), gs.config().next_queue_size);
            prop_assert!(gs.score() >= score);
            score = gs.score();

            if gs.is_game_over() {
                break;
            }
        }
    }

    #[test]
    fn replays_are_deterministic(
        seed in any::<u32>(),
        steps in prop::collection::vec(prop::sample::select(ACTIONS.to_vec()), 1..100),
    ) {
        let run = |steps: &[GameAction]| {
            let mut gs = GameState::new(EngineConfig::default(), seed);
            gs.start();
            for &action in steps {
                gs.apply_action(action);
                gs.tick(16);
            }
            serde_json::to_string(&gs.snapshot()).unwrap()
        };
        prop_assert_eq!(run(&steps), run(&steps));
    }
}
