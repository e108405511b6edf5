use serde::{Deserialize, Serialize};

use crate::domain::{PawnId, Rank};

/// Один отрезок разбиения семёрки.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SplitStep {
    pub pawn: PawnId,
    /// Знаковое число: ноль и минус отклоняются валидацией, а не парсером.
    pub steps: i32,
}

/// Что игрок делает картой. Форма зависит от ранга, проверяется перед разбором.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CardAction {
    /// Вывести пешку из базы (A, K).
    Exit { pawn: PawnId },
    /// Сдвинуть пешку на число шагов карты (для 4 – назад).
    Move { pawn: PawnId },
    /// Семёрка: 7 шагов на несколько своих пешек.
    Split { moves: Vec<SplitStep> },
    /// Валет: обменять местами две пешки.
    Swap { first: PawnId, second: PawnId },
}

impl CardAction {
    pub fn kind(&self) -> &'static str {
        match self {
            CardAction::Exit { .. } => "exit",
            CardAction::Move { .. } => "move",
            CardAction::Split { .. } => "split",
            CardAction::Swap { .. } => "swap",
        }
    }
}

/// Эффект карты по рангу.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardEffect {
    /// Вперёд на N.
    Forward(u8),
    /// Назад на N.
    Backward(u8),
    /// Выход из базы или вперёд на N.
    ExitOrForward(u8),
    /// Разбить N шагов между своими пешками.
    Split(u8),
    Swap,
}

impl CardEffect {
    pub fn of(rank: Rank) -> Self {
        match rank {
            Rank::Ace => CardEffect::ExitOrForward(1),
            Rank::King => CardEffect::ExitOrForward(13),
            Rank::Two => CardEffect::Forward(2),
            Rank::Three => CardEffect::Forward(3),
            Rank::Five => CardEffect::Forward(5),
            Rank::Six => CardEffect::Forward(6),
            Rank::Eight => CardEffect::Forward(8),
            Rank::Nine => CardEffect::Forward(9),
            Rank::Ten => CardEffect::Forward(10),
            Rank::Queen => CardEffect::Forward(12),
            Rank::Four => CardEffect::Backward(4),
            Rank::Seven => CardEffect::Split(7),
            Rank::Jack => CardEffect::Swap,
        }
    }

    /// Подходит ли форма действия под эффект карты.
    pub fn accepts(&self, action: &CardAction) -> bool {
        matches!(
            (self, action),
            (CardEffect::Forward(_), CardAction::Move { .. })
                | (CardEffect::Backward(_), CardAction::Move { .. })
                | (CardEffect::ExitOrForward(_), CardAction::Exit { .. })
                | (CardEffect::ExitOrForward(_), CardAction::Move { .. })
                | (CardEffect::Split(_), CardAction::Split { .. })
                | (CardEffect::Swap, CardAction::Swap { .. })
        )
    }
}
