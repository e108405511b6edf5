use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::{RingPos, Slot};

/// Идентификатор пешки: (игрок-владелец, номер пешки у игрока).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PawnId {
    pub owner: Slot,
    pub index: u8,
}

impl PawnId {
    pub const fn new(owner: Slot, index: u8) -> Self {
        Self { owner, index }
    }
}

impl fmt::Display for PawnId {
    /// Формат `владелец-номер`, например `0-3`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.owner, self.index)
    }
}

impl FromStr for PawnId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (owner, index) = s
            .split_once('-')
            .ok_or_else(|| format!("Invalid pawn id: {s}"))?;
        let owner = owner
            .parse::<Slot>()
            .map_err(|_| format!("Invalid pawn owner: {owner}"))?;
        let index = index
            .parse::<u8>()
            .map_err(|_| format!("Invalid pawn index: {index}"))?;
        Ok(PawnId { owner, index })
    }
}

/// Где находится пешка.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "type", content = "idx", rename_all = "camelCase")]
pub enum Location {
    /// Ещё не в игре (или сбита).
    Base,
    /// Клетка общего кольца.
    Ring(RingPos),
    /// Клетка собственного дома владельца (0..=3).
    Home(u8),
    /// Дошла до конца.
    Finished,
}

impl Location {
    /// На доске = на кольце или в доме.
    pub fn is_on_board(&self) -> bool {
        matches!(self, Location::Ring(_) | Location::Home(_))
    }

    pub fn ring_pos(&self) -> Option<RingPos> {
        match self {
            Location::Ring(pos) => Some(*pos),
            _ => None,
        }
    }
}

/// Пешка. Создаётся один раз на старте сессии, меняется только `location`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pawn {
    pub id: PawnId,
    pub location: Location,
}

impl Pawn {
    pub fn new(owner: Slot, index: u8) -> Self {
        Self {
            id: PawnId::new(owner, index),
            location: Location::Base,
        }
    }

    pub fn owner(&self) -> Slot {
        self.id.owner
    }
}
