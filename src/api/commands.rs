use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::api::dto::{GameStateReply, JoinReply, LegalPlayDto};
use crate::api::errors::ApiError;
use crate::domain::{Card, ConnectionId, RoomId, Team};
use crate::engine::{CardAction, TurnOutcome};
use crate::room::{Caller, Notification, PlayRequest, RoomCoordinator, Transport};

/// Входящая команда клиента (одно JSON-сообщение).
///
/// `player_name` необязателен и нужен только для переподключения:
/// если соединение неизвестно комнате, участник ищется по имени.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Command {
    CreateRoom {
        room_id: RoomId,
    },

    JoinRoom {
        room_id: RoomId,
        player_name: String,
    },

    ChangeTeam {
        room_id: RoomId,
        team: Team,
        #[serde(default)]
        player_name: Option<String>,
    },

    ToggleReady {
        room_id: RoomId,
        #[serde(default)]
        player_name: Option<String>,
    },

    StartGame {
        room_id: RoomId,
        #[serde(default)]
        player_name: Option<String>,
    },

    PlayCard {
        room_id: RoomId,
        #[serde(default)]
        request_id: Option<String>,
        card: Card,
        action: CardAction,
        #[serde(default)]
        player_name: Option<String>,
    },

    PassTurn {
        room_id: RoomId,
        #[serde(default)]
        card: Option<Card>,
        #[serde(default)]
        player_name: Option<String>,
    },

    RequestState {
        room_id: RoomId,
        #[serde(default)]
        player_name: Option<String>,
    },

    LegalPlays {
        room_id: RoomId,
        #[serde(default)]
        player_name: Option<String>,
    },

    Chat {
        room_id: RoomId,
        message: String,
        #[serde(default)]
        player_name: Option<String>,
    },

    LeaveRoom {
        room_id: RoomId,
    },
}

impl Command {
    pub fn from_json(raw: &str) -> Result<Self, ApiError> {
        serde_json::from_str(raw).map_err(|e| ApiError::BadRequest(e.to_string()))
    }

    pub fn room_id(&self) -> &str {
        match self {
            Command::CreateRoom { room_id }
            | Command::JoinRoom { room_id, .. }
            | Command::ChangeTeam { room_id, .. }
            | Command::ToggleReady { room_id, .. }
            | Command::StartGame { room_id, .. }
            | Command::PlayCard { room_id, .. }
            | Command::PassTurn { room_id, .. }
            | Command::RequestState { room_id, .. }
            | Command::LegalPlays { room_id, .. }
            | Command::Chat { room_id, .. }
            | Command::LeaveRoom { room_id } => room_id,
        }
    }
}

/// Прямой ответ на команду (уведомления уходят через транспорт отдельно).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CommandResponse {
    Ok,
    Joined(JoinReply),
    Ready { ready: bool },
    Turn(TurnOutcome),
    State(GameStateReply),
    LegalPlays { plays: Vec<LegalPlayDto> },
}

fn caller(connection: &ConnectionId, player_name: Option<String>) -> Caller {
    match player_name {
        Some(name) => Caller::named(connection.clone(), name),
        None => Caller::new(connection.clone()),
    }
}

/// Выполнить команду от имени соединения.
pub async fn dispatch<T: Transport>(
    coordinator: &RoomCoordinator<T>,
    connection: &ConnectionId,
    command: Command,
) -> Result<CommandResponse, ApiError> {
    let response = match command {
        Command::CreateRoom { room_id } => {
            coordinator.create_room(&Caller::new(connection.clone()), &room_id).await?;
            CommandResponse::Ok
        }
        Command::JoinRoom { room_id, player_name } => {
            let caller = Caller::named(connection.clone(), player_name.clone());
            let reply = coordinator.join_room(&caller, &room_id, &player_name).await?;
            CommandResponse::Joined(reply)
        }
        Command::ChangeTeam { room_id, team, player_name } => {
            coordinator.change_team(&caller(connection, player_name), &room_id, team).await?;
            CommandResponse::Ok
        }
        Command::ToggleReady { room_id, player_name } => {
            let ready = coordinator.toggle_ready(&caller(connection, player_name), &room_id).await?;
            CommandResponse::Ready { ready }
        }
        Command::StartGame { room_id, player_name } => {
            coordinator.start_game(&caller(connection, player_name), &room_id).await?;
            CommandResponse::Ok
        }
        Command::PlayCard {
            room_id,
            request_id,
            card,
            action,
            player_name,
        } => {
            let request = PlayRequest {
                request_id,
                card,
                action,
            };
            let outcome = coordinator
                .play_card(&caller(connection, player_name), &room_id, request)
                .await?;
            CommandResponse::Turn(outcome)
        }
        Command::PassTurn { room_id, card, player_name } => {
            let outcome = coordinator
                .pass_turn(&caller(connection, player_name), &room_id, card)
                .await?;
            CommandResponse::Turn(outcome)
        }
        Command::RequestState { room_id, player_name } => {
            let reply = coordinator.request_state(&caller(connection, player_name), &room_id).await?;
            CommandResponse::State(reply)
        }
        Command::LegalPlays { room_id, player_name } => {
            let plays = coordinator.legal_plays(&caller(connection, player_name), &room_id).await?;
            CommandResponse::LegalPlays { plays }
        }
        Command::Chat {
            room_id,
            message,
            player_name,
        } => {
            coordinator.chat(&caller(connection, player_name), &room_id, &message).await?;
            CommandResponse::Ok
        }
        Command::LeaveRoom { room_id } => {
            coordinator.leave_room(&Caller::new(connection.clone()), &room_id).await?;
            CommandResponse::Ok
        }
    };
    Ok(response)
}

/// Разобрать JSON и выполнить. Битый JSON – `BadRequest` и отказ инициатору.
pub async fn dispatch_json<T: Transport>(
    coordinator: &RoomCoordinator<T>,
    connection: &ConnectionId,
    raw: &str,
) -> Result<CommandResponse, ApiError> {
    let command = match Command::from_json(raw) {
        Ok(command) => command,
        Err(err) => {
            warn!(connection = %connection, error = %err, "malformed command");
            coordinator.transport().send_to(
                connection,
                &Notification::Rejected {
                    room_id: None,
                    request_id: None,
                    reason: err.to_string(),
                },
            );
            return Err(err);
        }
    };
    dispatch(coordinator, connection, command).await
}
