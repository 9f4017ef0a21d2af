use proptest::prelude::*;
use coup_engine::{BotWeights, Game, Phase, Seat, WeightedBot, DECK_SIZE};

const MAX_STEPS: usize = 50_000;

fn bot_game(num_players: usize, seed: u64, weights: &BotWeights) -> Game {
    let seats = (0..num_players)
        .map(|seat| Seat::new(format!("bot{seat}"), WeightedBot::new(weights.clone(), seed ^ seat as u64)))
        .collect();
    Game::with_seed(seats, seed).unwrap()
}

fn weights() -> impl Strategy<Value = BotWeights> {
    (0.0..=1.0f64, 0.0..=1.0f64, 0.0..=1.0f64, 0.0..=1.0f64).prop_map(|(challenge_action, challenge_block, block_foreign_aid, bluff_contessa)| {
        BotWeights {
            challenge_action,
            challenge_block,
            block_foreign_aid,
            bluff_contessa,
            ..BotWeights::default()
        }
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn every_step_keeps_the_table_consistent(seed in any::<u64>(), num_players in 2usize..=6, weights in weights()) {
        let mut game = bot_game(num_players, seed, &weights);

        let mut winner = None;
        for _ in 0..MAX_STEPS {
            let phase = game.step().unwrap();
            let state = game.state();

            prop_assert_eq!(state.check_invariants(), Ok(()));
            let cards: usize = state.players().iter().map(|player| player.hand().len()).sum::<usize>() + state.deck().len();
            prop_assert_eq!(cards, DECK_SIZE);
            for player in state.players() {
                prop_assert_eq!(player.is_eliminated(), player.influence() == 0);
            }

            if let Phase::GameOver(w) = phase {
                winner = Some(w);
                break;
            }
        }

        let winner = winner.expect("game did not finish");
        prop_assert_eq!(game.state().living_players(), vec![winner]);
        prop_assert_eq!(game.view().winner, Some(winner));
    }

    #[test]
    fn seeded_games_replay(seed in any::<u64>(), num_players in 2usize..=6) {
        let weights = BotWeights::default();
        let mut first = bot_game(num_players, seed, &weights);
        let mut second = bot_game(num_players, seed, &weights);

        prop_assert_eq!(first.play().unwrap(), second.play().unwrap());
        prop_assert_eq!(first.view(), second.view());
    }
}
