use crate::domain::{ConnectionId, ParticipantId, Slot, Team};

/// Кто прислал действие: соединение + (необязательно) заявленное имя.
///
/// Имя нужно только для переподключения: если соединение не найдено,
/// участник ищется по имени.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Caller {
    pub connection: ConnectionId,
    pub name: Option<String>,
}

impl Caller {
    pub fn new(connection: impl Into<ConnectionId>) -> Self {
        Self {
            connection: connection.into(),
            name: None,
        }
    }

    pub fn named(connection: impl Into<ConnectionId>, name: impl Into<String>) -> Self {
        Self {
            connection: connection.into(),
            name: Some(name.into()),
        }
    }
}

/// Участник комнаты: привязка соединения к (имя, место, команда, готовность).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Participant {
    pub id: ParticipantId,
    /// `None` – соединение потеряно, место держится до переподключения.
    pub connection: Option<ConnectionId>,
    pub name: String,
    pub slot: Slot,
    pub team: Team,
    pub is_ready: bool,
}

impl Participant {
    pub fn is_connected_as(&self, connection: &str) -> bool {
        self.connection.as_deref() == Some(connection)
    }
}
