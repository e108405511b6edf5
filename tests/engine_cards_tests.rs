// tests/engine_cards_tests.rs
//
// Разбор карт: ранг + действие -> новая доска + журнал событий.

mod common;

use common::{board_with, card, pawn};
use tock_engine::domain::{Location, Rank, Suit};
use tock_engine::engine::{
    legal_plays, resolve_play, CardAction, EngineError, GameEventKind, SplitStep,
};

fn kinds(events: &tock_engine::engine::EventLog) -> Vec<&'static str> {
    events
        .kinds()
        .map(|k| match k {
            GameEventKind::Move { .. } => "move",
            GameEventKind::Backward { .. } => "backward",
            GameEventKind::SevenMove { .. } => "sevenMove",
            GameEventKind::SevenCapture { .. } => "sevenCapture",
            GameEventKind::Capture { .. } => "capture",
            GameEventKind::Exit { .. } => "exit",
            GameEventKind::Swap { .. } => "swap",
            GameEventKind::Teleport { .. } => "teleport",
            GameEventKind::TeleportCapture { .. } => "teleportCapture",
            GameEventKind::CardDiscarded { .. } => "cardDiscarded",
            GameEventKind::CardDrawn { .. } => "cardDrawn",
            GameEventKind::DeckReshuffled { .. } => "deckReshuffled",
            GameEventKind::TurnPassed { .. } => "turnPassed",
            GameEventKind::GameWon { .. } => "gameWon",
        })
        .collect()
}

fn split(moves: &[((u8, u8), i32)]) -> CardAction {
    CardAction::Split {
        moves: moves
            .iter()
            .map(|&((owner, index), steps)| SplitStep {
                pawn: pawn(owner, index),
                steps,
            })
            .collect(),
    }
}

//
// ---------- A / K: выход ----------
//

#[test]
fn ace_exit_captures_opponent_on_start() {
    let board = board_with(&[(pawn(1, 0), Location::Ring(2))]);
    let action = CardAction::Exit { pawn: pawn(0, 0) };

    let res = resolve_play(&board, 0, card(Rank::Ace, Suit::Spades), &action).unwrap();

    assert_eq!(res.board.location(pawn(0, 0)), Some(Location::Ring(2)));
    assert_eq!(res.board.location(pawn(1, 0)), Some(Location::Base));
    assert_eq!(kinds(&res.events), vec!["exit", "capture"]);

    // Исходная доска не тронута.
    assert_eq!(board.location(pawn(1, 0)), Some(Location::Ring(2)));
}

#[test]
fn king_exits_or_moves_thirteen() {
    let board = board_with(&[(pawn(2, 1), Location::Ring(10))]);
    let king = card(Rank::King, Suit::Hearts);

    let exit = resolve_play(&board, 2, king, &CardAction::Exit { pawn: pawn(2, 0) }).unwrap();
    assert_eq!(exit.board.location(pawn(2, 0)), Some(Location::Ring(56)));

    let mv = resolve_play(&board, 2, king, &CardAction::Move { pawn: pawn(2, 1) }).unwrap();
    assert_eq!(mv.board.location(pawn(2, 1)), Some(Location::Ring(23)));
}

#[test]
fn exit_is_only_for_ace_and_king() {
    let board = board_with(&[]);
    let err = resolve_play(
        &board,
        0,
        card(Rank::Five, Suit::Clubs),
        &CardAction::Exit { pawn: pawn(0, 0) },
    )
    .unwrap_err();

    assert!(matches!(err, EngineError::ActionNotAllowed { rank: Rank::Five, .. }));
}

//
// ---------- ходы вперёд ----------
//

#[test]
fn queen_moves_twelve() {
    let board = board_with(&[(pawn(0, 0), Location::Ring(20))]);
    let res = resolve_play(
        &board,
        0,
        card(Rank::Queen, Suit::Spades),
        &CardAction::Move { pawn: pawn(0, 0) },
    )
    .unwrap();

    assert_eq!(res.board.location(pawn(0, 0)), Some(Location::Ring(32)));
    assert_eq!(kinds(&res.events), vec!["move"]);
}

#[test]
fn landing_on_occupied_cell_is_blocked() {
    let board = board_with(&[
        (pawn(0, 0), Location::Ring(10)),
        (pawn(3, 2), Location::Ring(15)),
    ]);
    let err = resolve_play(
        &board,
        0,
        card(Rank::Five, Suit::Hearts),
        &CardAction::Move { pawn: pawn(0, 0) },
    )
    .unwrap_err();

    assert_eq!(err, EngineError::PathBlocked);
    assert_eq!(board.location(pawn(3, 2)), Some(Location::Ring(15)));
}

#[test]
fn landing_on_own_pawn_is_blocked_too() {
    let board = board_with(&[
        (pawn(0, 0), Location::Ring(10)),
        (pawn(0, 1), Location::Ring(12)),
    ]);
    let err = resolve_play(
        &board,
        0,
        card(Rank::Two, Suit::Hearts),
        &CardAction::Move { pawn: pawn(0, 0) },
    )
    .unwrap_err();

    assert_eq!(err, EngineError::PathBlocked);
}

#[test]
fn passing_over_a_pawn_is_blocked() {
    let board = board_with(&[
        (pawn(0, 0), Location::Ring(10)),
        (pawn(1, 0), Location::Ring(12)),
    ]);
    let err = resolve_play(
        &board,
        0,
        card(Rank::Five, Suit::Hearts),
        &CardAction::Move { pawn: pawn(0, 0) },
    )
    .unwrap_err();

    assert_eq!(err, EngineError::PathBlocked);
}

#[test]
fn cannot_move_opponent_pawn() {
    let board = board_with(&[(pawn(1, 0), Location::Ring(30))]);
    let err = resolve_play(
        &board,
        0,
        card(Rank::Three, Suit::Hearts),
        &CardAction::Move { pawn: pawn(1, 0) },
    )
    .unwrap_err();

    assert_eq!(err, EngineError::InvalidPawn(pawn(1, 0)));
}

#[test]
fn move_into_home_lane_through_card() {
    let board = board_with(&[(pawn(0, 0), Location::Ring(70))]);
    let res = resolve_play(
        &board,
        0,
        card(Rank::Three, Suit::Diamonds),
        &CardAction::Move { pawn: pawn(0, 0) },
    )
    .unwrap();

    assert_eq!(res.board.location(pawn(0, 0)), Some(Location::Home(1)));
}

//
// ---------- 4: назад ----------
//

#[test]
fn four_landing_on_occupied_cell_is_blocked() {
    let board = board_with(&[
        (pawn(0, 0), Location::Ring(3)),
        (pawn(2, 0), Location::Ring(71)),
    ]);
    let err = resolve_play(
        &board,
        0,
        card(Rank::Four, Suit::Spades),
        &CardAction::Move { pawn: pawn(0, 0) },
    )
    .unwrap_err();

    assert_eq!(err, EngineError::PathBlocked);
}

#[test]
fn four_moves_backward_on_clear_ring() {
    let board = board_with(&[(pawn(0, 0), Location::Ring(3))]);
    let res = resolve_play(
        &board,
        0,
        card(Rank::Four, Suit::Spades),
        &CardAction::Move { pawn: pawn(0, 0) },
    )
    .unwrap();

    assert_eq!(res.board.location(pawn(0, 0)), Some(Location::Ring(71)));
    assert_eq!(kinds(&res.events), vec!["backward"]);
}

#[test]
fn four_out_of_home_skips_path_and_captures_on_landing() {
    // Home(1) -> Home(0) -> 71 -> 70 -> 69: пешку на 70 не проверяем, на 69 сбиваем.
    let board = board_with(&[
        (pawn(0, 0), Location::Home(1)),
        (pawn(1, 0), Location::Ring(70)),
        (pawn(3, 1), Location::Ring(69)),
    ]);
    let res = resolve_play(
        &board,
        0,
        card(Rank::Four, Suit::Clubs),
        &CardAction::Move { pawn: pawn(0, 0) },
    )
    .unwrap();

    assert_eq!(res.board.location(pawn(0, 0)), Some(Location::Ring(69)));
    assert_eq!(res.board.location(pawn(1, 0)), Some(Location::Ring(70)));
    assert_eq!(res.board.location(pawn(3, 1)), Some(Location::Base));
    assert_eq!(kinds(&res.events), vec!["backward", "capture"]);
}

#[test]
fn four_backward_path_can_be_blocked() {
    let board = board_with(&[
        (pawn(0, 0), Location::Ring(3)),
        (pawn(1, 0), Location::Ring(1)),
    ]);
    let err = resolve_play(
        &board,
        0,
        card(Rank::Four, Suit::Spades),
        &CardAction::Move { pawn: pawn(0, 0) },
    )
    .unwrap_err();

    assert_eq!(err, EngineError::PathBlocked);
}

//
// ---------- 7: разбиение ----------
//

#[test]
fn seven_split_three_and_four() {
    let board = board_with(&[
        (pawn(0, 0), Location::Ring(10)),
        (pawn(0, 1), Location::Ring(30)),
    ]);
    let res = resolve_play(
        &board,
        0,
        card(Rank::Seven, Suit::Clubs),
        &split(&[((0, 0), 3), ((0, 1), 4)]),
    )
    .unwrap();

    assert_eq!(res.board.location(pawn(0, 0)), Some(Location::Ring(13)));
    assert_eq!(res.board.location(pawn(0, 1)), Some(Location::Ring(34)));
    assert_eq!(kinds(&res.events), vec!["sevenMove", "sevenMove"]);
}

#[test]
fn seven_split_must_sum_to_seven() {
    let board = board_with(&[
        (pawn(0, 0), Location::Ring(10)),
        (pawn(0, 1), Location::Ring(30)),
    ]);
    let seven = card(Rank::Seven, Suit::Clubs);

    assert_eq!(
        resolve_play(&board, 0, seven, &split(&[((0, 0), 3), ((0, 1), 3)])).unwrap_err(),
        EngineError::SplitSum(6)
    );
    assert_eq!(
        resolve_play(&board, 0, seven, &split(&[((0, 0), 0), ((0, 1), 7)])).unwrap_err(),
        EngineError::SplitNonPositive
    );
    assert_eq!(
        resolve_play(&board, 0, seven, &split(&[((0, 0), -1), ((0, 1), 8)])).unwrap_err(),
        EngineError::SplitNonPositive
    );
    assert_eq!(
        resolve_play(&board, 0, seven, &split(&[])).unwrap_err(),
        EngineError::SplitEmpty
    );
}

#[test]
fn seven_captures_everything_it_passes() {
    let board = board_with(&[
        (pawn(0, 0), Location::Ring(10)),
        (pawn(1, 0), Location::Ring(12)),
        (pawn(3, 0), Location::Ring(17)),
    ]);
    let res = resolve_play(&board, 0, card(Rank::Seven, Suit::Hearts), &split(&[((0, 0), 7)])).unwrap();

    assert_eq!(res.board.location(pawn(0, 0)), Some(Location::Ring(17)));
    assert_eq!(res.board.location(pawn(1, 0)), Some(Location::Base));
    assert_eq!(res.board.location(pawn(3, 0)), Some(Location::Base));
    assert_eq!(kinds(&res.events), vec!["sevenCapture", "sevenCapture", "sevenMove"]);

    let captured_at: Vec<(u8, u8)> = res
        .events
        .kinds()
        .filter_map(|k| match k {
            GameEventKind::SevenCapture { at, at_step, .. } => Some((*at, *at_step)),
            _ => None,
        })
        .collect();
    assert_eq!(captured_at, vec![(12, 2), (17, 7)]);
}

#[test]
fn seven_rejects_opponent_pawn_in_split() {
    let board = board_with(&[
        (pawn(0, 0), Location::Ring(10)),
        (pawn(1, 0), Location::Ring(40)),
    ]);
    let err = resolve_play(
        &board,
        0,
        card(Rank::Seven, Suit::Hearts),
        &split(&[((0, 0), 3), ((1, 0), 4)]),
    )
    .unwrap_err();

    assert_eq!(err, EngineError::InvalidPawn(pawn(1, 0)));
}

#[test]
fn seven_failure_in_later_segment_rejects_whole_play() {
    // Второй отрезок перелетает дом: весь розыгрыш отклонён, доска не меняется.
    let board = board_with(&[
        (pawn(0, 0), Location::Ring(10)),
        (pawn(0, 1), Location::Home(2)),
    ]);
    let err = resolve_play(
        &board,
        0,
        card(Rank::Seven, Suit::Hearts),
        &split(&[((0, 0), 5), ((0, 1), 2)]),
    )
    .unwrap_err();

    assert_eq!(err, EngineError::HomeOverflow);
    assert_eq!(board.location(pawn(0, 0)), Some(Location::Ring(10)));
}

#[test]
fn seven_only_accepts_split() {
    let board = board_with(&[(pawn(0, 0), Location::Ring(10))]);
    let err = resolve_play(
        &board,
        0,
        card(Rank::Seven, Suit::Hearts),
        &CardAction::Move { pawn: pawn(0, 0) },
    )
    .unwrap_err();

    assert!(matches!(err, EngineError::ActionNotAllowed { rank: Rank::Seven, .. }));
}

//
// ---------- J: обмен ----------
//

#[test]
fn jack_swaps_two_pawns() {
    let board = board_with(&[
        (pawn(0, 0), Location::Ring(10)),
        (pawn(1, 0), Location::Ring(40)),
    ]);
    let res = resolve_play(
        &board,
        0,
        card(Rank::Jack, Suit::Spades),
        &CardAction::Swap {
            first: pawn(0, 0),
            second: pawn(1, 0),
        },
    )
    .unwrap();

    assert_eq!(res.board.location(pawn(0, 0)), Some(Location::Ring(40)));
    assert_eq!(res.board.location(pawn(1, 0)), Some(Location::Ring(10)));
    assert_eq!(kinds(&res.events), vec!["swap"]);
}

#[test]
fn jack_rejects_same_pawn_and_off_board_pawns() {
    let board = board_with(&[
        (pawn(0, 0), Location::Ring(10)),
        (pawn(1, 1), Location::Finished),
    ]);
    let jack = card(Rank::Jack, Suit::Spades);

    let same = CardAction::Swap {
        first: pawn(0, 0),
        second: pawn(0, 0),
    };
    assert_eq!(resolve_play(&board, 0, jack, &same).unwrap_err(), EngineError::SwapSamePawn);

    let with_base = CardAction::Swap {
        first: pawn(0, 0),
        second: pawn(2, 0),
    };
    assert_eq!(
        resolve_play(&board, 0, jack, &with_base).unwrap_err(),
        EngineError::SwapOffBoard(pawn(2, 0))
    );

    let with_finished = CardAction::Swap {
        first: pawn(0, 0),
        second: pawn(1, 1),
    };
    assert_eq!(
        resolve_play(&board, 0, jack, &with_finished).unwrap_err(),
        EngineError::SwapOffBoard(pawn(1, 1))
    );
}

//
// ---------- подсказка допустимых ходов ----------
//

#[test]
fn legal_plays_with_everything_in_base() {
    let board = board_with(&[]);
    let hand = vec![
        card(Rank::Five, Suit::Spades),
        card(Rank::Ace, Suit::Spades),
        card(Rank::Jack, Suit::Hearts),
    ];

    let plays = legal_plays(&board, 0, &hand);
    assert_eq!(plays.len(), 4, "Four pawns can exit with the ace");
    assert!(plays
        .iter()
        .all(|(c, a)| c.rank == Rank::Ace && matches!(a, CardAction::Exit { .. })));
}

#[test]
fn legal_plays_are_all_accepted_by_resolver() {
    let board = board_with(&[
        (pawn(0, 0), Location::Ring(10)),
        (pawn(0, 1), Location::Ring(70)),
        (pawn(1, 0), Location::Ring(14)),
        (pawn(2, 0), Location::Home(0)),
    ]);
    let hand = vec![
        card(Rank::Seven, Suit::Spades),
        card(Rank::Four, Suit::Spades),
        card(Rank::Jack, Suit::Hearts),
        card(Rank::King, Suit::Hearts),
        card(Rank::Nine, Suit::Clubs),
    ];

    let plays = legal_plays(&board, 0, &hand);
    assert!(!plays.is_empty());
    for (c, action) in &plays {
        assert!(
            resolve_play(&board, 0, *c, action).is_ok(),
            "Suggested play {c} {action:?} must be accepted"
        );
    }

    // Девятка с 10 упирается в пешку на 14, с 70 перелетает дом: ходов ей нет.
    assert!(plays.iter().all(|(c, _)| c.rank != Rank::Nine));
}
