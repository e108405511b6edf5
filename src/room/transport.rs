//! Граница с транспортом: что координатор отправляет наружу.

use serde::{Deserialize, Serialize};

use crate::api::dto::{GameStateDto, GameStateReply, RosterDto, StateSummaryDto};
use crate::domain::{Card, ConnectionId, RoomId, Slot, Team};
use crate::engine::EventLog;

/// Что поменялось в составе комнаты.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RosterChange {
    Joined { name: String },
    Reconnected { name: String },
    TeamChanged { name: String, team: Team },
    ReadyChanged { name: String, ready: bool },
    Left { name: String },
    Disconnected { name: String },
}

/// Исходящие уведомления.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum Notification {
    RoomCreated {
        room_id: RoomId,
    },

    RosterChanged {
        change: RosterChange,
        roster: RosterDto,
    },

    GameStarted {
        room_id: RoomId,
        state: GameStateDto,
    },

    /// Приватно: текущая рука адресата.
    CardsDealt {
        room_id: RoomId,
        hand: Vec<Card>,
    },

    MoveApplied {
        room_id: RoomId,
        request_id: Option<String>,
        slot: Slot,
        player_name: String,
        card: Card,
        events: EventLog,
        summary: StateSummaryDto,
    },

    TurnPassed {
        room_id: RoomId,
        slot: Slot,
        player_name: String,
        card: Option<Card>,
        events: EventLog,
        summary: StateSummaryDto,
    },

    GameEnded {
        room_id: RoomId,
        winner_team: Team,
        winner_names: Vec<String>,
    },

    /// Приватно: ответ на requestState.
    GameState {
        room_id: RoomId,
        reply: GameStateReply,
    },

    Chat {
        room_id: RoomId,
        name: String,
        message: String,
    },

    /// Приватно: отказ инициатору.
    Rejected {
        room_id: Option<RoomId>,
        request_id: Option<String>,
        reason: String,
    },
}

/// Транспорт (соединения, фрейминг, рассылка) – внешний коллаборатор.
///
/// Вызывается под замком комнаты, поэтому реализация не должна блокироваться:
/// только положить сообщение в очередь.
pub trait Transport: Send + Sync + 'static {
    fn send_to(&self, connection: &ConnectionId, notification: &Notification);

    /// Разослать всем участникам комнаты.
    fn broadcast(&self, room_id: &RoomId, members: &[ConnectionId], notification: &Notification) {
        let _ = room_id;
        for connection in members {
            self.send_to(connection, notification);
        }
    }
}
