use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::ParticipantId;

/// Простая генерация ID на основе монотонных счётчиков.
///
/// Один генератор живёт в координаторе и общий для всех комнат.
#[derive(Debug)]
pub struct IdGenerator {
    participant_counter: AtomicU64,
    room_counter: AtomicU64,
}

impl IdGenerator {
    /// Создать генератор с начальным значением 1 для всех сущностей.
    pub fn new() -> Self {
        Self {
            participant_counter: AtomicU64::new(1),
            room_counter: AtomicU64::new(1),
        }
    }

    #[inline]
    pub fn next_participant_id(&self) -> ParticipantId {
        self.participant_counter.fetch_add(1, Ordering::Relaxed)
    }

    /// Порядковый номер комнаты (идёт в вывод seed колоды).
    #[inline]
    pub fn next_room_index(&self) -> u64 {
        self.room_counter.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
