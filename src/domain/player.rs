use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::topology::team_of_slot;
use crate::domain::{Slot, Team};

/// Место за доской: номер, команда, рука.
///
/// Номер места определяет стартовую клетку, вход в дом и порядок хода.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerSeat {
    pub slot: Slot,
    pub team: Team,
    /// Рука. Порядок сохраняется: новая карта добавляется в конец.
    pub hand: Vec<Card>,
}

impl PlayerSeat {
    pub fn new(slot: Slot) -> Self {
        Self {
            slot,
            team: team_of_slot(slot),
            hand: Vec::new(),
        }
    }

    pub fn has_card(&self, card: &Card) -> bool {
        self.hand.contains(card)
    }

    /// Убрать карту из руки. `false`, если карты нет.
    pub fn remove_card(&mut self, card: &Card) -> bool {
        match self.hand.iter().position(|c| c == card) {
            Some(idx) => {
                self.hand.remove(idx);
                true
            }
            None => false,
        }
    }
}
