//! Геометрия доски. Всё фиксировано: 4 игрока, кольцо на 72 клетки.
//!
//! ```text
//!   slot | start | home entry
//!   -----+-------+-----------
//!     0  |   2   |    71
//!     1  |  20   |    18
//!     2  |  56   |    54
//!     3  |  38   |    36
//! ```

use crate::domain::{RingPos, Slot};

/// Число клеток общего кольца.
pub const RING_SIZE: u8 = 72;

/// Число игроков (мест) за доской.
pub const PLAYER_COUNT: usize = 4;

/// Пешек у каждого игрока.
pub const PAWNS_PER_PLAYER: u8 = 4;

/// Длина дорожки дома. Индекс 3 – порог перед `Finished`.
pub const HOME_LANE_LEN: u8 = 4;

/// Размер руки.
pub const HAND_SIZE: usize = 5;

/// Клетка кольца, на которую выходит пешка из базы.
pub const START_OFFSETS: [RingPos; PLAYER_COUNT] = [2, 20, 56, 38];

/// Клетка кольца, с которой пешка сворачивает в свой дом.
pub const HOME_ENTRIES: [RingPos; PLAYER_COUNT] = [71, 18, 54, 36];

/// Пары телепортов (вход, выход). Пока пусто – вариант правил выключен.
pub const TELEPORTER_PAIRS: &[(RingPos, RingPos)] = &[];

pub fn start_offset(slot: Slot) -> RingPos {
    START_OFFSETS[slot as usize % PLAYER_COUNT]
}

pub fn home_entry(slot: Slot) -> RingPos {
    HOME_ENTRIES[slot as usize % PLAYER_COUNT]
}

/// Клетка, на которую `steps` шагов уводят с `from` (вперёд или назад), по модулю кольца.
pub fn ring_offset(from: RingPos, steps: u8, forward: bool) -> RingPos {
    let size = RING_SIZE as u16;
    let steps = steps as u16 % size;
    let pos = if forward {
        (from as u16 + steps) % size
    } else {
        (from as u16 + size - steps) % size
    };
    pos as RingPos
}

/// Клетки, по которым пройдёт пешка: старт не включён, конечная клетка включена.
pub fn ring_walk(from: RingPos, steps: u8, forward: bool) -> impl Iterator<Item = RingPos> {
    (1..=steps).map(move |i| ring_offset(from, i, forward))
}

/// Выход телепорта для клетки (если на ней стоит телепорт).
pub fn teleporter_exit(pos: RingPos) -> Option<RingPos> {
    TELEPORTER_PAIRS
        .iter()
        .find(|(entry, _)| *entry == pos)
        .map(|(_, exit)| *exit)
}

/// Команда места после старта: 0 и 2 против 1 и 3.
pub fn team_of_slot(slot: Slot) -> u8 {
    slot % 2
}
