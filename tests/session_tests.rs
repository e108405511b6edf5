// tests/session_tests.rs
//
// Партия целиком: очередь ходов, сброс/добор, перетасовка, победа, блокировка при сбое.

mod common;

use common::{card, give_card, pawn, started_session, NoShuffle};
use tock_engine::api::queries::build_game_state;
use tock_engine::domain::{Location, Rank, Suit};
use tock_engine::engine::{CardAction, EngineError, GameEventKind, GameSession, GameStatus};

//
// ---------- создание и старт ----------
//

#[test]
fn new_session_deals_five_cards_and_waits() {
    let session = GameSession::new(NoShuffle);

    assert_eq!(session.status, GameStatus::Waiting);
    assert_eq!(session.deck.len(), 52 - 4 * 5);
    for slot in 0..4 {
        assert_eq!(session.hand(slot).unwrap().len(), 5);
    }
    assert_eq!(session.card_count(), 52);
    assert!(session.check_invariants().is_ok());
}

#[test]
fn actions_before_start_are_rejected() {
    let mut session = GameSession::new(NoShuffle);
    let first = session.hand(0).unwrap()[0];

    assert_eq!(
        session.pass_turn(0, Some(first)).unwrap_err(),
        EngineError::NotStarted
    );
    assert_eq!(
        session
            .play_card(0, first, &CardAction::Exit { pawn: pawn(0, 0) })
            .unwrap_err(),
        EngineError::NotStarted
    );
}

#[test]
fn start_validates_teams_and_runs_once() {
    let mut session = GameSession::new(NoShuffle);
    assert_eq!(
        session.start([0, 0, 0, 1]).unwrap_err(),
        EngineError::InvalidTeams([0, 0, 0, 1])
    );
    assert_eq!(session.status, GameStatus::Waiting);

    session.start([0, 1, 1, 0]).unwrap();
    assert_eq!(session.status, GameStatus::Started);
    assert_eq!(session.current_player, 0);
    assert_eq!(session.team_of(3), Some(0));
    assert_eq!(session.team_of(2), Some(1));

    assert_eq!(session.start_default().unwrap_err(), EngineError::AlreadyStarted);
}

//
// ---------- очередь и валидация ----------
//

#[test]
fn only_current_player_may_act() {
    let mut session = started_session();
    let card = session.hand(1).unwrap()[0];

    assert_eq!(
        session.pass_turn(1, Some(card)).unwrap_err(),
        EngineError::NotYourTurn { slot: 1, current: 0 }
    );
    assert_eq!(session.pass_turn(7, None).unwrap_err(), EngineError::InvalidSlot(7));
}

#[test]
fn card_must_be_in_hand() {
    let mut session = started_session();
    let ace = card(Rank::Ace, Suit::Spades);
    assert!(!session.players[0].has_card(&ace));

    assert_eq!(
        session
            .play_card(0, ace, &CardAction::Exit { pawn: pawn(0, 0) })
            .unwrap_err(),
        EngineError::CardNotInHand(ace)
    );
    assert_eq!(
        session.pass_turn(0, Some(ace)).unwrap_err(),
        EngineError::CardNotInHand(ace)
    );
}

#[test]
fn rejected_play_changes_nothing() {
    let mut session = started_session();
    let five = card(Rank::Five, Suit::Spades);
    give_card(&mut session, 0, five);

    let board = session.board.clone();
    let hands: Vec<_> = session.players.iter().map(|p| p.hand.clone()).collect();
    let deck = session.deck.clone();

    // Все пешки в базе: пятёрке ходить некем.
    let err = session
        .play_card(0, five, &CardAction::Move { pawn: pawn(0, 0) })
        .unwrap_err();
    assert_eq!(err, EngineError::PawnInBase(pawn(0, 0)));

    assert_eq!(session.board, board);
    assert_eq!(session.deck, deck);
    assert!(session.discard.is_empty());
    assert_eq!(session.current_player, 0);
    assert_eq!(session.turns_played, 0);
    for (player, hand) in session.players.iter().zip(hands) {
        assert_eq!(player.hand, hand);
    }
}

//
// ---------- принятый ход ----------
//

#[test]
fn accepted_play_discards_draws_and_advances() {
    let mut session = started_session();
    let ace = card(Rank::Ace, Suit::Spades);
    give_card(&mut session, 0, ace);
    let deck_before = session.deck.len();

    let outcome = session
        .play_card(0, ace, &CardAction::Exit { pawn: pawn(0, 0) })
        .unwrap();

    assert_eq!(outcome.turn, 1);
    assert_eq!(outcome.slot, 0);
    assert_eq!(outcome.card, Some(ace));
    assert_eq!(outcome.current_player, 1);
    assert_eq!(outcome.winner, None);

    let kinds: Vec<_> = outcome.events.kinds().cloned().collect();
    assert_eq!(
        kinds,
        vec![
            GameEventKind::Exit {
                pawn: pawn(0, 0),
                position: 2
            },
            GameEventKind::CardDiscarded { slot: 0, card: ace },
            GameEventKind::CardDrawn { slot: 0 },
        ]
    );

    assert_eq!(session.board.location(pawn(0, 0)), Some(Location::Ring(2)));
    assert_eq!(session.discard.last(), Some(&ace));
    assert_eq!(session.deck.len(), deck_before - 1);
    assert_eq!(session.hand(0).unwrap().len(), 5);
    assert!(!session.players[0].has_card(&ace));
    assert_eq!(session.card_count(), 52);
}

#[test]
fn event_indices_are_sequential() {
    let mut session = started_session();
    let ace = card(Rank::Ace, Suit::Spades);
    give_card(&mut session, 0, ace);

    let outcome = session
        .play_card(0, ace, &CardAction::Exit { pawn: pawn(0, 0) })
        .unwrap();
    for (i, event) in outcome.events.events.iter().enumerate() {
        assert_eq!(event.index as usize, i);
    }
}

#[test]
fn pass_without_card_only_advances_turn() {
    let mut session = started_session();
    let hand = session.hand(0).unwrap().to_vec();

    let outcome = session.pass_turn(0, None).unwrap();
    let kinds: Vec<_> = outcome.events.kinds().cloned().collect();
    assert_eq!(kinds, vec![GameEventKind::TurnPassed { slot: 0 }]);
    assert_eq!(outcome.current_player, 1);
    assert_eq!(session.hand(0).unwrap(), hand.as_slice());
    assert!(session.discard.is_empty());
}

#[test]
fn pass_with_card_discards_and_draws() {
    let mut session = started_session();
    let card = session.hand(0).unwrap()[2];

    let outcome = session.pass_turn(0, Some(card)).unwrap();
    let kinds: Vec<_> = outcome.events.kinds().cloned().collect();
    assert_eq!(
        kinds,
        vec![
            GameEventKind::CardDiscarded { slot: 0, card },
            GameEventKind::CardDrawn { slot: 0 },
            GameEventKind::TurnPassed { slot: 0 },
        ]
    );
    assert_eq!(session.discard, vec![card]);
    assert_eq!(session.hand(0).unwrap().len(), 5);
    assert_eq!(session.card_count(), 52);
}

#[test]
fn turn_order_wraps_around() {
    let mut session = started_session();
    for slot in [0, 1, 2, 3, 0] {
        assert_eq!(session.current_player, slot);
        session.pass_turn(slot, None).unwrap();
    }
    assert_eq!(session.current_player, 1);
    assert_eq!(session.turns_played, 5);
}

//
// ---------- колода ----------
//

#[test]
fn empty_deck_is_replenished_from_discard() {
    let mut session = started_session();
    let moved: Vec<_> = session.deck.cards.drain(..).collect();
    session.discard.extend(moved);
    assert!(session.deck.is_empty());

    let card = session.hand(0).unwrap()[0];
    let outcome = session.pass_turn(0, Some(card)).unwrap();

    assert!(outcome
        .events
        .kinds()
        .any(|k| *k == GameEventKind::DeckReshuffled { deck_size: 32 }));
    assert!(outcome
        .events
        .kinds()
        .any(|k| *k == GameEventKind::CardDrawn { slot: 0 }));

    // Верхняя карта сброса остаётся, остальное ушло в колоду.
    assert_eq!(session.discard, vec![card]);
    assert_eq!(session.deck.len(), 31);
    assert_eq!(session.hand(0).unwrap().len(), 5);
    assert_eq!(session.card_count(), 52);
}

#[test]
fn cards_are_conserved_over_a_long_game() {
    let mut session = started_session();

    for _ in 0..600 {
        if session.status == GameStatus::Finished {
            break;
        }
        let slot = session.current_player;
        let plays = session.legal_plays(slot);
        match plays.first() {
            Some((card, action)) => {
                session.play_card(slot, *card, action).unwrap();
            }
            None => {
                let card = session.hand(slot).unwrap()[0];
                session.pass_turn(slot, Some(card)).unwrap();
            }
        }

        assert_eq!(session.card_count(), 52);
        assert!(session.check_invariants().is_ok());
        for seat in &session.players {
            assert_eq!(seat.hand.len(), 5);
        }
    }
}

//
// ---------- победа ----------
//

fn almost_won_session() -> GameSession<NoShuffle> {
    let mut session = started_session();
    for index in 0..4 {
        session.board.set_location(pawn(2, index), Location::Finished);
    }
    for index in 1..4 {
        session.board.set_location(pawn(0, index), Location::Finished);
    }
    session.board.set_location(pawn(0, 0), Location::Home(2));
    session
}

#[test]
fn team_wins_when_all_eight_pawns_finish() {
    let mut session = almost_won_session();
    let ace = card(Rank::Ace, Suit::Spades);
    give_card(&mut session, 0, ace);
    assert_eq!(session.check_victory(), None);

    let outcome = session
        .play_card(0, ace, &CardAction::Move { pawn: pawn(0, 0) })
        .unwrap();

    assert_eq!(outcome.winner, Some(0));
    assert_eq!(session.status, GameStatus::Finished);
    assert_eq!(session.winner_team, Some(0));
    assert_eq!(
        outcome.events.kinds().last(),
        Some(&GameEventKind::GameWon { team: 0 })
    );

    // После победы любые действия отклоняются.
    let next = session.current_player;
    assert_eq!(session.pass_turn(next, None).unwrap_err(), EngineError::GameFinished);
    let card = session.hand(0).unwrap()[0];
    assert_eq!(
        session
            .play_card(0, card, &CardAction::Move { pawn: pawn(0, 1) })
            .unwrap_err(),
        EngineError::GameFinished
    );
}

#[test]
fn one_player_finishing_alone_is_not_a_win() {
    let mut session = started_session();
    for index in 0..4 {
        session.board.set_location(pawn(0, index), Location::Finished);
    }
    assert_eq!(session.check_victory(), None);

    session.pass_turn(0, None).unwrap();
    assert_eq!(session.status, GameStatus::Started);
}

#[test]
fn victory_follows_custom_team_assignment() {
    let mut session = GameSession::new(NoShuffle);
    session.start([0, 1, 1, 0]).unwrap();
    for index in 0..4 {
        session.board.set_location(pawn(0, index), Location::Finished);
        session.board.set_location(pawn(3, index), Location::Finished);
    }
    assert_eq!(session.check_victory(), Some(0));
}

//
// ---------- сбой инварианта ----------
//

#[test]
fn invariant_violation_locks_the_session() {
    let mut session = started_session();
    // Порча состояния снаружи: две пешки на одной клетке.
    session.board.set_location(pawn(1, 0), Location::Ring(40));
    session.board.set_location(pawn(2, 0), Location::Ring(40));

    let ace = card(Rank::Ace, Suit::Spades);
    give_card(&mut session, 0, ace);

    let err = session
        .play_card(0, ace, &CardAction::Exit { pawn: pawn(0, 0) })
        .unwrap_err();
    assert!(matches!(err, EngineError::Corrupted(_)));
    assert!(session.fault().is_some());

    // Доска не применилась, дальше всё отклоняется.
    assert_eq!(session.board.location(pawn(0, 0)), Some(Location::Base));
    assert!(matches!(
        session.pass_turn(0, None).unwrap_err(),
        EngineError::Corrupted(_)
    ));

    // Клиенты видят причину блокировки в публичном состоянии.
    let state = build_game_state(&session);
    assert_eq!(state.fault.as_deref(), session.fault());
}

//
// ---------- подсказки ----------
//

#[test]
fn legal_plays_reflect_current_hand() {
    let mut session = started_session();
    // Без перемешивания у места 0 короли: выход доступен.
    assert!(session.can_play_any_card(0));
    assert!(session
        .legal_plays(0)
        .iter()
        .all(|(_, a)| matches!(a, CardAction::Exit { .. })));

    // Рука без A/K и без пешек на доске – ходить нечем.
    let low = [
        card(Rank::Two, Suit::Spades),
        card(Rank::Three, Suit::Spades),
        card(Rank::Five, Suit::Spades),
        card(Rank::Six, Suit::Spades),
        card(Rank::Eight, Suit::Spades),
    ];
    for c in low {
        give_card(&mut session, 1, c);
    }
    assert!(!session.can_play_any_card(1));
    assert!(session.legal_plays(9).is_empty());
}
