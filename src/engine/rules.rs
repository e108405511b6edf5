//! Разбор карты: ранг + действие -> новая доска + события.
//!
//! Всё считается на черновой копии доски. Если где-то отказ, черновик
//! просто выбрасывается, и настоящая доска остаётся нетронутой.

use crate::domain::topology::teleporter_exit;
use crate::domain::{Board, Card, Location, Pawn, PawnId, Slot};
use crate::engine::actions::{CardAction, CardEffect, SplitStep};
use crate::engine::errors::EngineError;
use crate::engine::events::{EventLog, GameEventKind};
use crate::engine::movement::{exit_pawn, step_backward, step_forward};

/// Результат успешного разбора: новая доска и журнал событий доски.
#[derive(Clone, Debug)]
pub struct Resolution {
    pub board: Board,
    pub events: EventLog,
}

/// Разобрать розыгрыш карты игроком `slot`.
pub fn resolve_play(
    board: &Board,
    slot: Slot,
    card: Card,
    action: &CardAction,
) -> Result<Resolution, EngineError> {
    let effect = CardEffect::of(card.rank);
    let not_allowed = || EngineError::ActionNotAllowed {
        rank: card.rank,
        action: action.kind(),
    };
    if !effect.accepts(action) {
        return Err(not_allowed());
    }

    let mut scratch = board.clone();
    let mut events = EventLog::new();

    match (effect, action) {
        (CardEffect::ExitOrForward(_), CardAction::Exit { pawn }) => {
            apply_exit(&mut scratch, &mut events, slot, *pawn)?;
        }
        (CardEffect::Forward(steps) | CardEffect::ExitOrForward(steps), CardAction::Move { pawn }) => {
            apply_forward(&mut scratch, &mut events, slot, *pawn, steps)?;
        }
        (CardEffect::Backward(steps), CardAction::Move { pawn }) => {
            apply_backward(&mut scratch, &mut events, slot, *pawn, steps)?;
        }
        (CardEffect::Split(total), CardAction::Split { moves }) => {
            apply_split(&mut scratch, &mut events, slot, moves, total)?;
        }
        (CardEffect::Swap, CardAction::Swap { first, second }) => {
            apply_swap(&mut scratch, &mut events, *first, *second)?;
        }
        _ => return Err(not_allowed()),
    }

    Ok(Resolution {
        board: scratch,
        events,
    })
}

/// Все действия, которые движок принял бы от `slot` с этой рукой.
///
/// Каждый кандидат прогоняется через `resolve_play`, так что список
/// всегда согласован с правилами.
pub fn legal_plays(board: &Board, slot: Slot, hand: &[Card]) -> Vec<(Card, CardAction)> {
    let mut plays = Vec::new();

    for (i, card) in hand.iter().enumerate() {
        // Одинаковых карт в колоде нет, но на всякий случай не дублируем.
        if hand[..i].contains(card) {
            continue;
        }
        for action in candidate_actions(board, slot, CardEffect::of(card.rank)) {
            let accepted = resolve_play(board, slot, *card, &action)
                .map(|r| r.board.check_invariants().is_ok())
                .unwrap_or(false);
            if accepted {
                plays.push((*card, action));
            }
        }
    }

    plays
}

fn candidate_actions(board: &Board, slot: Slot, effect: CardEffect) -> Vec<CardAction> {
    let own_on_board: Vec<PawnId> = board
        .pawns_of(slot)
        .filter(|p| p.location.is_on_board())
        .map(|p| p.id)
        .collect();

    let mut actions = Vec::new();
    match effect {
        CardEffect::ExitOrForward(_) => {
            actions.extend(
                board
                    .pawns_of(slot)
                    .filter(|p| p.location == Location::Base)
                    .map(|p| CardAction::Exit { pawn: p.id }),
            );
            actions.extend(own_on_board.iter().map(|&pawn| CardAction::Move { pawn }));
        }
        CardEffect::Forward(_) | CardEffect::Backward(_) => {
            actions.extend(own_on_board.iter().map(|&pawn| CardAction::Move { pawn }));
        }
        CardEffect::Split(total) => {
            let mut prefix = Vec::new();
            split_candidates(&own_on_board, total as i32, &mut prefix, &mut actions);
        }
        CardEffect::Swap => {
            let on_board: Vec<PawnId> = board
                .pawns
                .iter()
                .filter(|p| p.location.is_on_board())
                .map(|p| p.id)
                .collect();
            for (i, &first) in on_board.iter().enumerate() {
                for &second in &on_board[i + 1..] {
                    actions.push(CardAction::Swap { first, second });
                }
            }
        }
    }
    actions
}

/// Все упорядоченные разбиения `remaining` по разным пешкам из `pawns`.
fn split_candidates(
    pawns: &[PawnId],
    remaining: i32,
    prefix: &mut Vec<SplitStep>,
    out: &mut Vec<CardAction>,
) {
    if remaining == 0 {
        if !prefix.is_empty() {
            out.push(CardAction::Split {
                moves: prefix.clone(),
            });
        }
        return;
    }
    for &pawn in pawns {
        if prefix.iter().any(|m| m.pawn == pawn) {
            continue;
        }
        for steps in 1..=remaining {
            prefix.push(SplitStep { pawn, steps });
            split_candidates(pawns, remaining - steps, prefix, out);
            prefix.pop();
        }
    }
}

fn own_pawn(board: &Board, slot: Slot, id: PawnId) -> Result<Pawn, EngineError> {
    board
        .pawn(id)
        .filter(|p| p.owner() == slot)
        .cloned()
        .ok_or(EngineError::InvalidPawn(id))
}

fn apply_exit(
    board: &mut Board,
    events: &mut EventLog,
    slot: Slot,
    id: PawnId,
) -> Result<(), EngineError> {
    let pawn = own_pawn(board, slot, id)?;
    let outcome = exit_pawn(board, &pawn, slot)?;

    if let Some(captured) = outcome.captured {
        board.set_location(captured, Location::Base);
    }
    board.set_location(id, Location::Ring(outcome.position));

    events.push(GameEventKind::Exit {
        pawn: id,
        position: outcome.position,
    });
    if let Some(captured) = outcome.captured {
        events.push(GameEventKind::Capture {
            captured,
            by: id,
            at: outcome.position,
        });
    }
    Ok(())
}

fn apply_forward(
    board: &mut Board,
    events: &mut EventLog,
    slot: Slot,
    id: PawnId,
    steps: u8,
) -> Result<(), EngineError> {
    let pawn = own_pawn(board, slot, id)?;
    let outcome = step_forward(board, &pawn, steps, slot)?;
    if outcome.is_blocked(board, id) {
        return Err(EngineError::PathBlocked);
    }

    board.set_location(id, outcome.to);
    events.push(GameEventKind::Move {
        pawn: id,
        from: pawn.location,
        to: outcome.to,
        steps,
    });
    capture_on_landing(board, events, id);
    apply_teleporter(board, events, id);
    Ok(())
}

fn apply_backward(
    board: &mut Board,
    events: &mut EventLog,
    slot: Slot,
    id: PawnId,
    steps: u8,
) -> Result<(), EngineError> {
    let pawn = own_pawn(board, slot, id)?;
    let outcome = step_backward(board, &pawn, steps, slot)?;
    // Выход из дома назад путь не проверяет, только сбивает на клетке приземления.
    if pawn.location.ring_pos().is_some() && outcome.is_blocked(board, id) {
        return Err(EngineError::PathBlocked);
    }

    board.set_location(id, outcome.to);
    events.push(GameEventKind::Backward {
        pawn: id,
        from: pawn.location,
        to: outcome.to,
        steps,
    });
    capture_on_landing(board, events, id);
    apply_teleporter(board, events, id);
    Ok(())
}

/// Семёрка. Каждая клетка кольца на пути (включая конечную) сбивает того, кто на ней стоит.
fn apply_split(
    board: &mut Board,
    events: &mut EventLog,
    slot: Slot,
    moves: &[SplitStep],
    total: u8,
) -> Result<(), EngineError> {
    if moves.is_empty() {
        return Err(EngineError::SplitEmpty);
    }
    if moves.iter().any(|m| m.steps <= 0) {
        return Err(EngineError::SplitNonPositive);
    }
    let sum: i64 = moves.iter().map(|m| m.steps as i64).sum();
    if sum != total as i64 {
        return Err(EngineError::SplitSum(sum.clamp(0, u32::MAX as i64) as u32));
    }

    for step in moves {
        let pawn = own_pawn(board, slot, step.pawn)?;
        // Сумма уже проверена, так что steps <= 7.
        let steps = step.steps as u8;
        let outcome = step_forward(board, &pawn, steps, slot)?;

        let mut captured = Vec::new();
        for (i, &pos) in outcome.ring_path.iter().enumerate() {
            if let Some(victim) = board.capture_at(pos, pawn.id) {
                captured.push(victim);
                events.push(GameEventKind::SevenCapture {
                    captured: victim,
                    by: pawn.id,
                    at: pos,
                    at_step: i as u8 + 1,
                });
            }
        }

        board.set_location(pawn.id, outcome.to);
        events.push(GameEventKind::SevenMove {
            pawn: pawn.id,
            from: pawn.location,
            to: outcome.to,
            steps,
            captured,
        });
        apply_teleporter(board, events, pawn.id);
    }
    Ok(())
}

fn apply_swap(
    board: &mut Board,
    events: &mut EventLog,
    first: PawnId,
    second: PawnId,
) -> Result<(), EngineError> {
    if first == second {
        return Err(EngineError::SwapSamePawn);
    }
    let a = board.location(first).ok_or(EngineError::InvalidPawn(first))?;
    let b = board.location(second).ok_or(EngineError::InvalidPawn(second))?;
    if !a.is_on_board() {
        return Err(EngineError::SwapOffBoard(first));
    }
    if !b.is_on_board() {
        return Err(EngineError::SwapOffBoard(second));
    }

    board.set_location(first, b);
    board.set_location(second, a);

    // Дом адресуется относительно владельца: после обмена слот может оказаться занят.
    for (id, loc) in [(first, b), (second, a)] {
        if let Location::Home(idx) = loc {
            let clash = board
                .pawns_of(id.owner)
                .any(|p| p.id != id && p.location == Location::Home(idx));
            if clash {
                return Err(EngineError::HomeOccupied(idx));
            }
        }
    }

    events.push(GameEventKind::Swap {
        first,
        second,
        first_to: b,
        second_to: a,
    });
    Ok(())
}

fn capture_on_landing(board: &mut Board, events: &mut EventLog, mover: PawnId) {
    let Some(pos) = board.location(mover).and_then(|l| l.ring_pos()) else {
        return;
    };
    if let Some(captured) = board.capture_at(pos, mover) {
        events.push(GameEventKind::Capture {
            captured,
            by: mover,
            at: pos,
        });
    }
}

/// Телепорт: если пешка встала на клетку-вход, переносим её на выход.
fn apply_teleporter(board: &mut Board, events: &mut EventLog, mover: PawnId) {
    let Some(pos) = board.location(mover).and_then(|l| l.ring_pos()) else {
        return;
    };
    let Some(exit) = teleporter_exit(pos) else {
        return;
    };

    let captured = board.capture_at(exit, mover);
    board.set_location(mover, Location::Ring(exit));
    events.push(GameEventKind::Teleport { pawn: mover, to: exit });
    if let Some(captured) = captured {
        events.push(GameEventKind::TeleportCapture {
            captured,
            by: mover,
        });
    }
}
