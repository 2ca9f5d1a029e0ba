//! Property tests over random legal games.

use kalah_core::{
    Board, Game, InvariantSet, KalahInvariants, Player, Rules, TieBreak, create_game,
};
use proptest::prelude::*;

/// 1-based positions the player to move may legally play.
fn legal_positions(game: &Game) -> Vec<i32> {
    let player = game.current_player();
    Board::pit_indices(player)
        .filter(|index| game.board().slots()[*index].stones() > 0)
        .map(|index| index as i32 + 1)
        .collect()
}

fn tie_break() -> impl Strategy<Value = TieBreak> {
    prop_oneof![Just(TieBreak::Draw), Just(TieBreak::SecondPlayer)]
}

proptest! {
    #[test]
    fn prop_random_games_conserve_stones(
        stones in 1u32..=6,
        choices in proptest::collection::vec(any::<usize>(), 1..300),
        tie_break in tie_break(),
    ) {
        let rules = Rules::new(tie_break);
        let mut game = create_game("prop".to_string(), stones).unwrap();
        let total = game.board().total_stones();

        for choice in choices {
            if game.is_over() {
                break;
            }
            let legal = legal_positions(&game);
            prop_assert!(!legal.is_empty());

            let mover = game.current_player();
            let opponent_house = game.board().house_stones(mover.opponent());
            let pit = legal[choice % legal.len()];

            game = rules.apply_move(game, pit).unwrap();

            prop_assert_eq!(game.board().total_stones(), total);
            prop_assert!(KalahInvariants::check_all(&game).is_ok());
            if !game.is_over() {
                prop_assert_eq!(game.board().house_stones(mover.opponent()), opponent_house);
            }
        }
    }

    #[test]
    fn prop_finished_games_are_swept(
        stones in 1u32..=3,
        choices in proptest::collection::vec(any::<usize>(), 400),
    ) {
        let rules = Rules::default();
        let mut game = create_game("prop".to_string(), stones).unwrap();

        for choice in choices {
            if game.is_over() {
                break;
            }
            let legal = legal_positions(&game);
            game = rules.apply_move(game, legal[choice % legal.len()]).unwrap();
        }

        if game.is_over() {
            prop_assert_eq!(game.next_player(), None);
            prop_assert_eq!(game.board().pits_total(), 0);
            let p1 = game.board().house_stones(Player::Player1);
            let p2 = game.board().house_stones(Player::Player2);
            prop_assert_eq!(game.winner().is_none(), p1 == p2);
        }
    }
}
