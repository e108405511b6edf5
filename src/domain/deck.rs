use serde::{Deserialize, Serialize};

use crate::domain::card::{Card, Rank, Suit};

/// Общее число карт в игре.
pub const DECK_SIZE: usize = 52;

/// Колода карт рубашкой вверх. Берём всегда с конца (`pop`).
/// Перемешивание делает engine (через RandomSource), НЕ здесь.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Deck {
    pub cards: Vec<Card>,
}

impl Deck {
    /// Стандартная 52-карточная колода в порядке:
    /// A♠ A♥ A♦ A♣, 2♠ .. 2♣, ..., K♠ .. K♣.
    pub fn standard_52() -> Self {
        let mut cards = Vec::with_capacity(DECK_SIZE);
        for rank in Rank::ALL {
            for suit in Suit::ALL {
                cards.push(Card::new(rank, suit));
            }
        }
        Deck { cards }
    }

    pub fn empty() -> Self {
        Deck { cards: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Взять одну карту сверху колоды.
    pub fn draw_one(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    /// Взять n карт сверху.
    pub fn draw_n(&mut self, n: usize) -> Vec<Card> {
        let mut taken = Vec::with_capacity(n);
        for _ in 0..n {
            if let Some(card) = self.cards.pop() {
                taken.push(card);
            } else {
                break;
            }
        }
        taken
    }
}
