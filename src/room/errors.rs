use crate::domain::{RoomId, Team};
use crate::engine::EngineError;

use thiserror::Error;

/// Ошибки уровня комнат (над движком одной партии).
///
/// Все они – отказ конкретному вызывающему, состояние комнаты не меняется.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomError {
    #[error("Room {0} already exists")]
    RoomExists(RoomId),

    #[error("Room {0} not found")]
    RoomNotFound(RoomId),

    #[error("Too many rooms")]
    TooManyRooms,

    #[error("You are already in this room")]
    AlreadyJoined,

    #[error("Room is full")]
    RoomFull,

    #[error("Game has already started")]
    NotWaiting,

    #[error("You are not in this room")]
    NotParticipant,

    #[error("Only the host can start the game")]
    NotHost,

    #[error("Four players are needed to start (have {0})")]
    NeedFourPlayers(usize),

    #[error("All players must be ready")]
    NotAllReady,

    #[error("Teams must have two players each")]
    UnbalancedTeams,

    #[error("Team {0} is full")]
    TeamFull(Team),

    #[error("Team {0} does not exist")]
    InvalidTeam(Team),

    #[error("Name {0} is already taken in this room")]
    NameTaken(String),

    #[error("Invalid display name")]
    InvalidName,

    #[error("Invalid chat message")]
    InvalidMessage,

    /// Проброшенная ошибка движка партии.
    #[error(transparent)]
    Engine(#[from] EngineError),
}
