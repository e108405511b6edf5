use serde::{Deserialize, Serialize};

use crate::domain::pawn::{Location, Pawn, PawnId};
use crate::domain::topology::{ring_walk, HOME_LANE_LEN, PAWNS_PER_PLAYER, PLAYER_COUNT, RING_SIZE};
use crate::domain::{RingPos, Slot};

/// Набор из 16 пешек и запросы по нему.
///
/// Индекса по клеткам нет: 16 пешек проще перебрать линейно.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Board {
    pub pawns: Vec<Pawn>,
}

impl Board {
    /// Все пешки в базе, порядок: игрок 0 (пешки 0..3), игрок 1, ...
    pub fn new() -> Self {
        let mut pawns = Vec::with_capacity(PLAYER_COUNT * PAWNS_PER_PLAYER as usize);
        for owner in 0..PLAYER_COUNT as Slot {
            for index in 0..PAWNS_PER_PLAYER {
                pawns.push(Pawn::new(owner, index));
            }
        }
        Self { pawns }
    }

    pub fn pawn(&self, id: PawnId) -> Option<&Pawn> {
        self.pawns.iter().find(|p| p.id == id)
    }

    pub fn pawn_mut(&mut self, id: PawnId) -> Option<&mut Pawn> {
        self.pawns.iter_mut().find(|p| p.id == id)
    }

    pub fn location(&self, id: PawnId) -> Option<Location> {
        self.pawn(id).map(|p| p.location)
    }

    /// Переставить пешку. Неизвестный id игнорируется.
    pub fn set_location(&mut self, id: PawnId, location: Location) {
        if let Some(p) = self.pawn_mut(id) {
            p.location = location;
        }
    }

    pub fn pawn_at_ring(&self, position: RingPos) -> Option<&Pawn> {
        self.pawns
            .iter()
            .find(|p| p.location == Location::Ring(position))
    }

    pub fn pawn_at_home(&self, owner: Slot, slot: u8) -> Option<&Pawn> {
        self.pawns
            .iter()
            .find(|p| p.owner() == owner && p.location == Location::Home(slot))
    }

    /// Занята ли хоть одна клетка на пути: старт не считается, конечная клетка считается.
    pub fn is_path_blocked(&self, from: RingPos, steps: u8, forward: bool) -> bool {
        ring_walk(from, steps, forward).any(|pos| self.pawn_at_ring(pos).is_some())
    }

    pub fn pawns_of(&self, owner: Slot) -> impl Iterator<Item = &Pawn> {
        self.pawns.iter().filter(move |p| p.owner() == owner)
    }

    /// Все пешки игрока дошли до конца.
    pub fn all_finished(&self, owner: Slot) -> bool {
        self.pawns_of(owner)
            .all(|p| p.location == Location::Finished)
    }

    /// Сбить пешку с клетки `position` (кроме `except`). Возвращает id сбитой.
    pub fn capture_at(&mut self, position: RingPos, except: PawnId) -> Option<PawnId> {
        let victim = self
            .pawns
            .iter_mut()
            .find(|p| p.id != except && p.location == Location::Ring(position))?;
        victim.location = Location::Base;
        Some(victim.id)
    }

    /// Проверка структурных инвариантов доски.
    ///
    /// Ошибка здесь означает баг движка, а не плохой ввод.
    pub fn check_invariants(&self) -> Result<(), String> {
        for owner in 0..PLAYER_COUNT as Slot {
            let count = self.pawns_of(owner).count();
            if count != PAWNS_PER_PLAYER as usize {
                return Err(format!("player {owner} has {count} pawns"));
            }
        }

        let mut ring = [false; RING_SIZE as usize];
        let mut home = [[false; HOME_LANE_LEN as usize]; PLAYER_COUNT];

        for pawn in &self.pawns {
            match pawn.location {
                Location::Ring(pos) => {
                    let cell = ring
                        .get_mut(pos as usize)
                        .ok_or_else(|| format!("pawn {} outside the ring at {pos}", pawn.id))?;
                    if *cell {
                        return Err(format!("two pawns on ring cell {pos}"));
                    }
                    *cell = true;
                }
                Location::Home(idx) => {
                    let cell = home
                        .get_mut(pawn.owner() as usize)
                        .and_then(|lane| lane.get_mut(idx as usize))
                        .ok_or_else(|| format!("pawn {} outside its home lane", pawn.id))?;
                    if *cell {
                        return Err(format!(
                            "two pawns on home slot {idx} of player {}",
                            pawn.owner()
                        ));
                    }
                    *cell = true;
                }
                Location::Base | Location::Finished => {}
            }
        }

        Ok(())
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
