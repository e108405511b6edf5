use serde::{Deserialize, Serialize};

use crate::domain::{Card, Location, PawnId, RingPos, Slot, Team};

/// Тип события хода.
///
/// Набор событий хода полностью описывает переход состояния:
/// его можно проиграть заново, не пересчитывая правила.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GameEventKind {
    /// Обычный ход вперёд.
    Move {
        pawn: PawnId,
        from: Location,
        to: Location,
        steps: u8,
    },

    /// Ход назад (четвёрка).
    Backward {
        pawn: PawnId,
        from: Location,
        to: Location,
        steps: u8,
    },

    /// Отрезок семёрки.
    SevenMove {
        pawn: PawnId,
        from: Location,
        to: Location,
        steps: u8,
        captured: Vec<PawnId>,
    },

    /// Пешка сбита семёркой на проходе.
    SevenCapture {
        captured: PawnId,
        by: PawnId,
        at: RingPos,
        at_step: u8,
    },

    /// Пешка сбита (отправлена в базу).
    Capture {
        captured: PawnId,
        by: PawnId,
        at: RingPos,
    },

    /// Выход из базы на стартовую клетку.
    Exit { pawn: PawnId, position: RingPos },

    /// Обмен местами (валет).
    Swap {
        first: PawnId,
        second: PawnId,
        first_to: Location,
        second_to: Location,
    },

    /// Телепорт (вариант правил, по умолчанию выключен).
    Teleport { pawn: PawnId, to: RingPos },

    TeleportCapture { captured: PawnId, by: PawnId },

    CardDiscarded { slot: Slot, card: Card },

    /// Карта взята из колоды. Сама карта видна только владельцу руки.
    CardDrawn { slot: Slot },

    /// Сброс (кроме верхней карты) перемешан в новую колоду.
    DeckReshuffled { deck_size: usize },

    TurnPassed { slot: Slot },

    GameWon { team: Team },
}

/// Событие с порядковым номером внутри хода.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameEvent {
    pub index: u32,
    pub kind: GameEventKind,
}

/// Упорядоченный журнал событий одного хода.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventLog {
    pub events: Vec<GameEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, kind: GameEventKind) {
        let idx = self.events.len() as u32;
        self.events.push(GameEvent { index: idx, kind });
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn kinds(&self) -> impl Iterator<Item = &GameEventKind> {
        self.events.iter().map(|e| &e.kind)
    }
}
