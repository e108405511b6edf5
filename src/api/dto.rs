use serde::{Deserialize, Serialize};

use crate::domain::{Card, Pawn, ParticipantId, RoomId, Slot, Team};
use crate::engine::{CardAction, GameStatus};

/// DTO участника комнаты.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParticipantDto {
    pub participant_id: ParticipantId,
    pub name: String,
    pub slot: Slot,
    pub team: Team,
    pub is_ready: bool,
    pub is_host: bool,
    /// Есть ли сейчас живое соединение.
    pub online: bool,
}

/// Состав комнаты (лобби).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RosterDto {
    pub room_id: RoomId,
    pub status: GameStatus,
    /// Имя хоста, если он есть.
    pub host: Option<String>,
    pub participants: Vec<ParticipantDto>,
}

/// Публичная информация о месте: руку не показываем, только размер.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerPublicDto {
    pub slot: Slot,
    pub team: Team,
    pub hand_size: usize,
}

/// Полное публичное состояние партии.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameStateDto {
    pub status: GameStatus,
    pub current_player: Slot,
    pub winner_team: Option<Team>,
    pub pawns: Vec<Pawn>,
    pub players: Vec<PlayerPublicDto>,
    pub deck_size: usize,
    pub discard_size: usize,
    pub discard_top: Option<Card>,
    pub turns_played: u32,
    /// Причина блокировки партии после нарушенного инварианта.
    pub fault: Option<String>,
}

/// Короткая сводка после хода.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StateSummaryDto {
    pub status: GameStatus,
    pub current_player: Slot,
    pub winner_team: Option<Team>,
    pub pawns: Vec<Pawn>,
}

/// Ответ на requestState: состояние + приватная рука запросившего.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameStateReply {
    pub state: GameStateDto,
    pub roster: RosterDto,
    pub hand: Vec<Card>,
    pub slot: Slot,
    pub name: String,
}

/// Ответ на joinRoom.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct JoinReply {
    pub slot: Slot,
    pub team: Team,
    /// `true`, если это было переподключение по имени.
    pub reconnected: bool,
}

/// Одно допустимое действие (подсказка клиенту / боту).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LegalPlayDto {
    pub card: Card,
    pub action: CardAction,
}
