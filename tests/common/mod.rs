//! Общие помощники для интеграционных тестов.

#![allow(dead_code)]

use std::sync::Mutex;

use tock_engine::domain::{Board, Card, ConnectionId, Location, PawnId, Rank, RoomId, Suit};
use tock_engine::engine::{GameSession, RandomSource};
use tock_engine::room::{Notification, Transport};

/// RNG, который ничего не перемешивает: колода и сброс идут как есть.
#[derive(Clone, Debug, Default)]
pub struct NoShuffle;

impl RandomSource for NoShuffle {
    fn shuffle<T>(&mut self, _slice: &mut [T]) {}
}

pub fn card(rank: Rank, suit: Suit) -> Card {
    Card::new(rank, suit)
}

pub fn pawn(owner: u8, index: u8) -> PawnId {
    PawnId::new(owner, index)
}

/// Стартовавшая партия без перемешивания, команды 0,2 против 1,3.
pub fn started_session() -> GameSession<NoShuffle> {
    let mut session = GameSession::new(NoShuffle);
    session.start_default().expect("default start must succeed");
    session
}

/// Положить `card` в руку `slot`: карта меняется местами с первой картой руки
/// (где бы она ни лежала: колода, сброс, чужая рука). Общее число карт не меняется.
pub fn give_card(session: &mut GameSession<NoShuffle>, slot: u8, card: Card) {
    if session.players[slot as usize].has_card(&card) {
        return;
    }
    let returned = session.players[slot as usize].hand.remove(0);

    if let Some(c) = session.deck.cards.iter_mut().find(|c| **c == card) {
        *c = returned;
    } else if let Some(c) = session.discard.iter_mut().find(|c| **c == card) {
        *c = returned;
    } else if let Some(c) = session
        .players
        .iter_mut()
        .flat_map(|p| p.hand.iter_mut())
        .find(|c| **c == card)
    {
        *c = returned;
    }
    session.players[slot as usize].hand.push(card);
}

/// Доска с заданными позициями, остальные пешки в базе.
pub fn board_with(placements: &[(PawnId, Location)]) -> Board {
    let mut board = Board::new();
    for &(id, location) in placements {
        board.set_location(id, location);
    }
    board
}

/// Транспорт, который запоминает всё отправленное.
#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<(ConnectionId, Notification)>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<(ConnectionId, Notification)> {
        self.sent.lock().expect("transport mutex poisoned").clone()
    }

    pub fn sent_to(&self, connection: &str) -> Vec<Notification> {
        self.all()
            .into_iter()
            .filter(|(c, _)| c == connection)
            .map(|(_, n)| n)
            .collect()
    }

    pub fn clear(&self) {
        self.sent.lock().expect("transport mutex poisoned").clear();
    }

    /// Последний отказ, пришедший на соединение.
    pub fn last_rejection(&self, connection: &str) -> Option<String> {
        self.sent_to(connection).into_iter().rev().find_map(|n| match n {
            Notification::Rejected { reason, .. } => Some(reason),
            _ => None,
        })
    }
}

impl Transport for RecordingTransport {
    fn send_to(&self, connection: &ConnectionId, notification: &Notification) {
        self.sent
            .lock()
            .expect("transport mutex poisoned")
            .push((connection.clone(), notification.clone()));
    }

    fn broadcast(&self, _room_id: &RoomId, members: &[ConnectionId], notification: &Notification) {
        for connection in members {
            self.send_to(connection, notification);
        }
    }
}
