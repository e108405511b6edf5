use tracing::info;

use crate::domain::topology::PLAYER_COUNT;
use crate::domain::{ConnectionId, ParticipantId, RoomId, Slot, Team};
use crate::engine::{GameSession, GameStatus};
use crate::infra::DeterministicRng;
use crate::room::errors::RoomError;
use crate::room::participant::{Caller, Participant};

/// Партия внутри комнаты.
pub type RoomSession = GameSession<DeterministicRng>;

/// Как найден участник по входящему действию.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolved {
    pub index: usize,
    /// Соединение, от которого участник был отвязан при переподключении по имени.
    pub rebound_from: Option<Option<ConnectionId>>,
}

/// Одна комната: партия + состав.
///
/// Все методы синхронные и мутируют только под замком комнаты,
/// который держит координатор.
pub struct Room {
    pub id: RoomId,
    pub session: RoomSession,
    /// В порядке входа.
    pub participants: Vec<Participant>,
    pub host: Option<ParticipantId>,
    /// Кто явно создал комнату, пока в неё никто не вошёл.
    creator: Option<ConnectionId>,
    closed: bool,
}

impl Room {
    pub fn new(id: RoomId, rng: DeterministicRng) -> Self {
        Self {
            id,
            session: GameSession::new(rng),
            participants: Vec::new(),
            host: None,
            creator: None,
            closed: false,
        }
    }

    pub fn with_creator(mut self, connection: ConnectionId) -> Self {
        self.creator = Some(connection);
        self
    }

    /// Пустая комната, созданная этим соединением.
    pub fn is_unclaimed_by(&self, connection: &str) -> bool {
        self.participants.is_empty() && self.creator.as_deref() == Some(connection)
    }

    pub fn status(&self) -> GameStatus {
        self.session.status
    }

    /// Комната удалена из реестра (или вот-вот будет).
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn close(&mut self) {
        self.closed = true;
    }

    /// Нет ни одного участника на связи.
    pub fn is_abandoned(&self) -> bool {
        self.participants.iter().all(|p| p.connection.is_none())
    }

    /// Соединения всех участников на связи.
    pub fn connections(&self) -> Vec<ConnectionId> {
        self.participants
            .iter()
            .filter_map(|p| p.connection.clone())
            .collect()
    }

    pub fn position_of_connection(&self, connection: &str) -> Option<usize> {
        self.participants
            .iter()
            .position(|p| p.is_connected_as(connection))
    }

    /// Найти участника по соединению; иначе – по заявленному имени с перепривязкой.
    pub fn resolve(&mut self, caller: &Caller, by_name: bool) -> Result<Resolved, RoomError> {
        if let Some(index) = self.position_of_connection(&caller.connection) {
            return Ok(Resolved {
                index,
                rebound_from: None,
            });
        }

        let name = caller
            .name
            .as_deref()
            .filter(|_| by_name)
            .ok_or(RoomError::NotParticipant)?;
        let index = self
            .participants
            .iter()
            .position(|p| p.name == name)
            .ok_or(RoomError::NotParticipant)?;

        let participant = &mut self.participants[index];
        let previous = participant.connection.replace(caller.connection.clone());
        info!(room = %self.id, name, slot = participant.slot, "participant rebound to a new connection");

        Ok(Resolved {
            index,
            rebound_from: Some(previous),
        })
    }

    /// Новый участник. Команда – меньшая из двух, место – наименьшее свободное.
    pub fn join(
        &mut self,
        id: ParticipantId,
        connection: ConnectionId,
        name: String,
    ) -> Result<&Participant, RoomError> {
        if self.status() != GameStatus::Waiting {
            return Err(RoomError::NotWaiting);
        }
        if self.participants.len() >= PLAYER_COUNT {
            return Err(RoomError::RoomFull);
        }
        if self.position_of_connection(&connection).is_some() {
            return Err(RoomError::AlreadyJoined);
        }

        let is_host = self.participants.is_empty();
        let team = if is_host {
            0
        } else {
            let team0 = self.team_size(0);
            let team1 = self.team_size(1);
            if team0 <= team1 {
                0
            } else {
                1
            }
        };
        let slot = (0..PLAYER_COUNT as Slot)
            .find(|s| self.participants.iter().all(|p| p.slot != *s))
            .ok_or(RoomError::RoomFull)?;

        if is_host {
            self.host = Some(id);
            self.creator = None;
        }
        self.participants.push(Participant {
            id,
            connection: Some(connection),
            name,
            slot,
            team,
            is_ready: false,
        });
        Ok(&self.participants[self.participants.len() - 1])
    }

    /// Смена команды сбрасывает готовность.
    pub fn change_team(&mut self, index: usize, team: Team) -> Result<(), RoomError> {
        if self.status() != GameStatus::Waiting {
            return Err(RoomError::NotWaiting);
        }
        if team > 1 {
            return Err(RoomError::InvalidTeam(team));
        }
        let others = self
            .participants
            .iter()
            .enumerate()
            .filter(|(i, p)| *i != index && p.team == team)
            .count();
        if others >= 2 {
            return Err(RoomError::TeamFull(team));
        }

        let participant = self
            .participants
            .get_mut(index)
            .ok_or(RoomError::NotParticipant)?;
        participant.team = team;
        participant.is_ready = false;
        Ok(())
    }

    pub fn toggle_ready(&mut self, index: usize) -> Result<bool, RoomError> {
        if self.status() != GameStatus::Waiting {
            return Err(RoomError::NotWaiting);
        }
        let participant = self
            .participants
            .get_mut(index)
            .ok_or(RoomError::NotParticipant)?;
        participant.is_ready = !participant.is_ready;
        Ok(participant.is_ready)
    }

    /// Старт партии хостом. Команда 0 получает места 0 и 2, команда 1 – 1 и 3.
    pub fn start(&mut self, index: usize) -> Result<(), RoomError> {
        let requester = self
            .participants
            .get(index)
            .ok_or(RoomError::NotParticipant)?;
        if self.host != Some(requester.id) {
            return Err(RoomError::NotHost);
        }
        if self.status() != GameStatus::Waiting {
            return Err(RoomError::NotWaiting);
        }
        if self.participants.len() != PLAYER_COUNT {
            return Err(RoomError::NeedFourPlayers(self.participants.len()));
        }
        if !self.participants.iter().all(|p| p.is_ready) {
            return Err(RoomError::NotAllReady);
        }
        if self.team_size(0) != 2 || self.team_size(1) != 2 {
            return Err(RoomError::UnbalancedTeams);
        }

        let mut next_slot: [Slot; 2] = [0, 1];
        let mut teams: [Team; PLAYER_COUNT] = [0; PLAYER_COUNT];
        let mut slots = Vec::with_capacity(PLAYER_COUNT);
        for participant in &self.participants {
            let team = participant.team as usize;
            slots.push(next_slot[team]);
            teams[next_slot[team] as usize] = participant.team;
            next_slot[team] += 2;
        }

        self.session.start(teams)?;
        for (participant, slot) in self.participants.iter_mut().zip(slots) {
            participant.slot = slot;
        }
        info!(room = %self.id, "room started");
        Ok(())
    }

    /// Удалить участника. Если ушёл хост – хостом становится самый ранний из оставшихся.
    pub fn remove(&mut self, index: usize) -> Option<Participant> {
        if index >= self.participants.len() {
            return None;
        }
        let removed = self.participants.remove(index);
        if self.host == Some(removed.id) {
            self.host = self.participants.first().map(|p| p.id);
        }
        Some(removed)
    }

    /// Потеря соединения во время партии: место и рука сохраняются.
    pub fn detach(&mut self, index: usize) -> Option<&Participant> {
        let participant = self.participants.get_mut(index)?;
        participant.connection = None;
        Some(participant)
    }

    fn team_size(&self, team: Team) -> usize {
        self.participants.iter().filter(|p| p.team == team).count()
    }
}
