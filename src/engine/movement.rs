//! Расчёт перемещения одной пешки. Ничего не мутирует: вызывающий код
//! сам применяет результат к (черновой) доске.

use crate::domain::topology::{home_entry, ring_offset, ring_walk, start_offset, HOME_LANE_LEN, RING_SIZE};
use crate::domain::{Board, Location, Pawn, PawnId, RingPos, Slot};
use crate::engine::errors::EngineError;

/// Последний индекс дома: попадание ровно сюда = `Finished`.
const HOME_LAST: u8 = HOME_LANE_LEN - 1;

/// Куда придёт пешка и по каким клеткам кольца она пройдёт.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepOutcome {
    pub to: Location,
    /// Клетки кольца по порядку: старт не включён, последняя клетка кольца на пути включена.
    /// Если пешка свернула в дом, путь заканчивается клеткой входа.
    pub ring_path: Vec<RingPos>,
}

impl StepOutcome {
    fn stay_off_ring(to: Location) -> Self {
        Self {
            to,
            ring_path: Vec::new(),
        }
    }

    /// Занята ли чужой пешкой хоть одна клетка пути, включая клетку приземления.
    pub fn is_blocked(&self, board: &Board, mover: PawnId) -> bool {
        self.ring_path
            .iter()
            .any(|&pos| board.pawn_at_ring(pos).is_some_and(|p| p.id != mover))
    }
}

/// Результат выхода из базы.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExitOutcome {
    pub position: RingPos,
    pub captured: Option<PawnId>,
}

/// Ход вперёд на `steps`.
pub fn step_forward(board: &Board, pawn: &Pawn, steps: u8, slot: Slot) -> Result<StepOutcome, EngineError> {
    match pawn.location {
        Location::Base => Err(EngineError::PawnInBase(pawn.id)),
        Location::Finished => Err(EngineError::PawnFinished(pawn.id)),
        Location::Home(idx) => {
            let to = land_in_home(board, pawn.id, slot, idx as u16 + steps as u16)?;
            Ok(StepOutcome::stay_off_ring(to))
        }
        Location::Ring(pos) => {
            let entry = home_entry(slot);
            // Сколько шагов до клетки входа в дом. Стартовая клетка в путь не входит,
            // так что пешка, стоящая на входе, идёт на новый круг.
            let to_entry = (entry as u16 + RING_SIZE as u16 - pos as u16) % RING_SIZE as u16;

            if to_entry == 0 || to_entry >= steps as u16 {
                return Ok(StepOutcome {
                    to: Location::Ring(ring_offset(pos, steps, true)),
                    ring_path: ring_walk(pos, steps, true).collect(),
                });
            }

            let ring_path: Vec<RingPos> = ring_walk(pos, to_entry as u8, true).collect();
            let remaining = steps as u16 - to_entry;
            let to = land_in_home(board, pawn.id, slot, remaining - 1)?;
            Ok(StepOutcome { to, ring_path })
        }
    }
}

/// Ход назад на `steps` (четвёрка). Из дома можно выйти обратно на кольцо.
pub fn step_backward(board: &Board, pawn: &Pawn, steps: u8, slot: Slot) -> Result<StepOutcome, EngineError> {
    match pawn.location {
        Location::Base => Err(EngineError::PawnInBase(pawn.id)),
        Location::Finished => Err(EngineError::PawnFinished(pawn.id)),
        Location::Home(idx) if idx >= steps => {
            let target = idx - steps;
            ensure_home_free(board, pawn.id, slot, target)?;
            Ok(StepOutcome::stay_off_ring(Location::Home(target)))
        }
        Location::Home(idx) => {
            // Первый шаг назад из Home(0) приходит на клетку входа.
            let entry = home_entry(slot);
            let ring_steps = steps - idx - 1;
            let ring_path: Vec<RingPos> = (0..=ring_steps)
                .map(|k| ring_offset(entry, k, false))
                .collect();
            Ok(StepOutcome {
                to: Location::Ring(ring_offset(entry, ring_steps, false)),
                ring_path,
            })
        }
        Location::Ring(pos) => Ok(StepOutcome {
            to: Location::Ring(ring_offset(pos, steps, false)),
            ring_path: ring_walk(pos, steps, false).collect(),
        }),
    }
}

/// Выход из базы на стартовую клетку игрока.
///
/// Своя пешка на старте – отказ, чужая – сбивается.
pub fn exit_pawn(board: &Board, pawn: &Pawn, slot: Slot) -> Result<ExitOutcome, EngineError> {
    if pawn.location != Location::Base {
        return Err(EngineError::PawnNotInBase(pawn.id));
    }

    let position = start_offset(slot);
    let captured = match board.pawn_at_ring(position) {
        Some(occupant) if occupant.owner() == slot => return Err(EngineError::StartBlocked),
        Some(occupant) => Some(occupant.id),
        None => None,
    };

    Ok(ExitOutcome { position, captured })
}

fn land_in_home(board: &Board, mover: PawnId, slot: Slot, target: u16) -> Result<Location, EngineError> {
    if target > HOME_LAST as u16 {
        return Err(EngineError::HomeOverflow);
    }
    if target == HOME_LAST as u16 {
        return Ok(Location::Finished);
    }
    let target = target as u8;
    ensure_home_free(board, mover, slot, target)?;
    Ok(Location::Home(target))
}

fn ensure_home_free(board: &Board, mover: PawnId, slot: Slot, target: u8) -> Result<(), EngineError> {
    match board.pawn_at_home(slot, target) {
        Some(p) if p.id != mover => Err(EngineError::HomeOccupied(target)),
        _ => Ok(()),
    }
}
