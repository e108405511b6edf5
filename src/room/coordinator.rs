use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::api::dto::{GameStateReply, JoinReply, LegalPlayDto};
use crate::api::queries::{build_game_state, build_legal_plays, build_roster, build_summary};
use crate::config::CoordinatorConfig;
use crate::domain::{Card, RoomId, Team};
use crate::engine::{CardAction, GameStatus, TurnOutcome};
use crate::infra::IdGenerator;
use crate::room::errors::RoomError;
use crate::room::participant::Caller;
use crate::room::room::Room;
use crate::room::transport::{Notification, RosterChange, Transport};

type RoomHandle = Arc<Mutex<Room>>;

/// Розыгрыш карты от клиента.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayRequest {
    /// Идентификатор запроса клиента, возвращается в уведомлениях.
    pub request_id: Option<String>,
    pub card: Card,
    pub action: CardAction,
}

/// Координатор комнат:
/// - хранит комнаты по RoomId;
/// - у каждой комнаты свой мьютекс: мутации одной комнаты строго по очереди,
///   разные комнаты работают параллельно;
/// - привязывает соединения к местам и рассылает результаты через `Transport`.
pub struct RoomCoordinator<T: Transport> {
    config: CoordinatorConfig,
    transport: Arc<T>,
    rooms: RwLock<HashMap<RoomId, RoomHandle>>,
    ids: IdGenerator,
}

impl<T: Transport> RoomCoordinator<T> {
    pub fn new(config: CoordinatorConfig, transport: Arc<T>) -> Self {
        Self {
            config,
            transport,
            rooms: RwLock::new(HashMap::new()),
            ids: IdGenerator::new(),
        }
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    pub async fn room_count(&self) -> usize {
        self.rooms.read().await.len()
    }

    pub async fn has_room(&self, room_id: &str) -> bool {
        self.rooms.read().await.contains_key(room_id)
    }

    /// Статус партии в комнате (для операторов и тестов).
    pub async fn room_status(&self, room_id: &str) -> Option<GameStatus> {
        let handle = self.rooms.read().await.get(room_id).cloned()?;
        let room = handle.lock().await;
        (!room.is_closed()).then(|| room.status())
    }

    /// Явное создание комнаты. Отказ, если комната с таким id уже есть.
    pub async fn create_room(&self, caller: &Caller, room_id: &str) -> Result<(), RoomError> {
        let result = self.try_create_room(caller, room_id).await;
        if result.is_ok() {
            self.transport.send_to(
                &caller.connection,
                &Notification::RoomCreated {
                    room_id: room_id.to_string(),
                },
            );
        }
        self.report(caller, Some(room_id), None, result)
    }

    /// Вход в комнату. Неизвестная комната создаётся автоматически.
    /// Совпадение имени с существующим участником – переподключение.
    pub async fn join_room(
        &self,
        caller: &Caller,
        room_id: &str,
        name: &str,
    ) -> Result<JoinReply, RoomError> {
        let result = self.try_join_room(caller, room_id, name).await;
        self.report(caller, Some(room_id), None, result)
    }

    pub async fn change_team(&self, caller: &Caller, room_id: &str, team: Team) -> Result<(), RoomError> {
        let result = async {
            let handle = self.existing_room(room_id).await?;
            let mut room = handle.lock().await;
            ensure_open(&room)?;
            let index = self.resolve(&mut room, caller)?;
            room.change_team(index, team)?;

            let name = room.participants[index].name.clone();
            self.broadcast_roster(&room, RosterChange::TeamChanged { name, team });
            Ok::<_, RoomError>(())
        }
        .await;
        self.report(caller, Some(room_id), None, result)
    }

    pub async fn toggle_ready(&self, caller: &Caller, room_id: &str) -> Result<bool, RoomError> {
        let result = async {
            let handle = self.existing_room(room_id).await?;
            let mut room = handle.lock().await;
            ensure_open(&room)?;
            let index = self.resolve(&mut room, caller)?;
            let ready = room.toggle_ready(index)?;

            let name = room.participants[index].name.clone();
            self.broadcast_roster(&room, RosterChange::ReadyChanged { name, ready });
            Ok::<_, RoomError>(ready)
        }
        .await;
        self.report(caller, Some(room_id), None, result)
    }

    /// Старт партии (только хост).
    pub async fn start_game(&self, caller: &Caller, room_id: &str) -> Result<(), RoomError> {
        let result = async {
            let handle = self.existing_room(room_id).await?;
            let mut room = handle.lock().await;
            ensure_open(&room)?;
            let index = self.resolve(&mut room, caller)?;
            room.start(index)?;

            let state = build_game_state(&room.session);
            self.transport.broadcast(
                &room.id,
                &room.connections(),
                &Notification::GameStarted {
                    room_id: room.id.clone(),
                    state,
                },
            );
            for participant in &room.participants {
                if let (Some(connection), Some(hand)) =
                    (&participant.connection, room.session.hand(participant.slot))
                {
                    self.transport.send_to(
                        connection,
                        &Notification::CardsDealt {
                            room_id: room.id.clone(),
                            hand: hand.to_vec(),
                        },
                    );
                }
            }
            Ok::<_, RoomError>(())
        }
        .await;
        self.report(caller, Some(room_id), None, result)
    }

    /// Сыграть карту.
    pub async fn play_card(
        &self,
        caller: &Caller,
        room_id: &str,
        request: PlayRequest,
    ) -> Result<TurnOutcome, RoomError> {
        let request_id = request.request_id.clone();
        let result = async {
            let handle = self.existing_room(room_id).await?;
            let mut room = handle.lock().await;
            ensure_open(&room)?;
            let index = self.resolve(&mut room, caller)?;
            let slot = room.participants[index].slot;

            let outcome = room.session.play_card(slot, request.card, &request.action)?;
            debug!(room = room_id, slot, card = %request.card, turn = outcome.turn, "play accepted");

            let player_name = room.participants[index].name.clone();
            let summary = build_summary(&room.session);
            self.transport.broadcast(
                &room.id,
                &room.connections(),
                &Notification::MoveApplied {
                    room_id: room.id.clone(),
                    request_id: request.request_id.clone(),
                    slot,
                    player_name,
                    card: request.card,
                    events: outcome.events.clone(),
                    summary,
                },
            );
            self.after_turn(&room, index, &outcome);
            Ok::<_, RoomError>(outcome)
        }
        .await;
        self.report(caller, Some(room_id), request_id, result)
    }

    /// Пас (с картой в сброс или без).
    pub async fn pass_turn(
        &self,
        caller: &Caller,
        room_id: &str,
        card: Option<Card>,
    ) -> Result<TurnOutcome, RoomError> {
        let result = async {
            let handle = self.existing_room(room_id).await?;
            let mut room = handle.lock().await;
            ensure_open(&room)?;
            let index = self.resolve(&mut room, caller)?;
            let slot = room.participants[index].slot;

            let outcome = room.session.pass_turn(slot, card)?;
            debug!(room = room_id, slot, card = ?card, turn = outcome.turn, "pass accepted");

            let player_name = room.participants[index].name.clone();
            let summary = build_summary(&room.session);
            self.transport.broadcast(
                &room.id,
                &room.connections(),
                &Notification::TurnPassed {
                    room_id: room.id.clone(),
                    slot,
                    player_name,
                    card,
                    events: outcome.events.clone(),
                    summary,
                },
            );
            self.after_turn(&room, index, &outcome);
            Ok::<_, RoomError>(outcome)
        }
        .await;
        self.report(caller, Some(room_id), None, result)
    }

    /// Полное состояние + приватная рука запросившего.
    pub async fn request_state(&self, caller: &Caller, room_id: &str) -> Result<GameStateReply, RoomError> {
        let result = async {
            let handle = self.existing_room(room_id).await?;
            let mut room = handle.lock().await;
            ensure_open(&room)?;
            let index = self.resolve(&mut room, caller)?;

            let reply = state_reply(&room, index);
            self.transport.send_to(
                &caller.connection,
                &Notification::GameState {
                    room_id: room.id.clone(),
                    reply: reply.clone(),
                },
            );
            Ok::<_, RoomError>(reply)
        }
        .await;
        self.report(caller, Some(room_id), None, result)
    }

    /// Что вызывающий может сыграть прямо сейчас.
    pub async fn legal_plays(&self, caller: &Caller, room_id: &str) -> Result<Vec<LegalPlayDto>, RoomError> {
        let result = async {
            let handle = self.existing_room(room_id).await?;
            let mut room = handle.lock().await;
            ensure_open(&room)?;
            let index = self.resolve(&mut room, caller)?;
            let slot = room.participants[index].slot;
            Ok::<_, RoomError>(build_legal_plays(room.session.legal_plays(slot)))
        }
        .await;
        self.report(caller, Some(room_id), None, result)
    }

    pub async fn chat(&self, caller: &Caller, room_id: &str, message: &str) -> Result<(), RoomError> {
        let result = async {
            let message = message.trim();
            if message.is_empty() || message.chars().count() > self.config.max_chat_len {
                return Err(RoomError::InvalidMessage);
            }
            let handle = self.existing_room(room_id).await?;
            let mut room = handle.lock().await;
            ensure_open(&room)?;
            let index = self.resolve(&mut room, caller)?;

            self.transport.broadcast(
                &room.id,
                &room.connections(),
                &Notification::Chat {
                    room_id: room.id.clone(),
                    name: room.participants[index].name.clone(),
                    message: message.to_string(),
                },
            );
            Ok::<_, RoomError>(())
        }
        .await;
        self.report(caller, Some(room_id), None, result)
    }

    /// Выход из комнаты. Последний вышедший уничтожает комнату.
    pub async fn leave_room(&self, caller: &Caller, room_id: &str) -> Result<(), RoomError> {
        let result = async {
            let handle = self.existing_room(room_id).await?;
            let mut room = handle.lock().await;
            ensure_open(&room)?;
            let index = room
                .position_of_connection(&caller.connection)
                .ok_or(RoomError::NotParticipant)?;

            let Some(removed) = room.remove(index) else {
                return Err(RoomError::NotParticipant);
            };
            info!(room = room_id, name = %removed.name, "participant left");

            if room.is_abandoned() {
                room.close();
                drop(room);
                self.forget_room(room_id, &handle).await;
            } else {
                self.broadcast_roster(&room, RosterChange::Left { name: removed.name });
            }
            Ok::<_, RoomError>(())
        }
        .await;
        self.report(caller, Some(room_id), None, result)
    }

    /// Потеря соединения (сигнал транспорта). В лобби участник удаляется,
    /// во время партии – остаётся на своём месте без соединения.
    /// Пустые комнаты, созданные этим соединением, уничтожаются.
    pub async fn disconnect(&self, connection: &str) {
        let handles: Vec<(RoomId, RoomHandle)> = self
            .rooms
            .read()
            .await
            .iter()
            .map(|(id, handle)| (id.clone(), handle.clone()))
            .collect();

        for (room_id, handle) in handles {
            let mut room = handle.lock().await;
            if room.is_closed() {
                continue;
            }
            if room.is_unclaimed_by(connection) {
                // Создатель ушёл, так и не войдя: комнату больше никто не освободит.
                room.close();
                drop(room);
                self.forget_room(&room_id, &handle).await;
                continue;
            }
            let Some(index) = room.position_of_connection(connection) else {
                continue;
            };

            let change = if room.status() == GameStatus::Waiting {
                room.remove(index)
                    .map(|p| RosterChange::Left { name: p.name })
            } else {
                room.detach(index)
                    .map(|p| RosterChange::Disconnected { name: p.name.clone() })
            };
            info!(room = %room_id, connection, "connection lost");

            if room.is_abandoned() {
                room.close();
                drop(room);
                self.forget_room(&room_id, &handle).await;
            } else if let Some(change) = change {
                self.broadcast_roster(&room, change);
            }
        }
    }

    async fn try_create_room(&self, caller: &Caller, room_id: &str) -> Result<(), RoomError> {
        let mut rooms = self.rooms.write().await;
        if rooms.contains_key(room_id) {
            return Err(RoomError::RoomExists(room_id.to_string()));
        }
        if rooms.len() >= self.config.max_rooms {
            return Err(RoomError::TooManyRooms);
        }
        let room = self.room_for(room_id).with_creator(caller.connection.clone());
        rooms.insert(room_id.to_string(), Arc::new(Mutex::new(room)));
        info!(room = room_id, creator = %caller.connection, "room created");
        Ok(())
    }

    async fn try_join_room(&self, caller: &Caller, room_id: &str, name: &str) -> Result<JoinReply, RoomError> {
        let name = name.trim();
        if name.is_empty() || name.chars().count() > self.config.max_name_len {
            return Err(RoomError::InvalidName);
        }

        loop {
            let handle = self.room_or_create(room_id).await?;
            let mut room = handle.lock().await;
            if room.is_closed() {
                // Комнату закрыли между поиском и замком: убираем и пробуем заново.
                drop(room);
                self.forget_room(room_id, &handle).await;
                continue;
            }

            let name_taken = room.participants.iter().any(|p| p.name == name);
            if name_taken && room.position_of_connection(&caller.connection).is_none() {
                if !self.config.reconnect_by_name {
                    return Err(RoomError::NameTaken(name.to_string()));
                }
                let reconnect = Caller::named(caller.connection.clone(), name);
                let index = self.resolve(&mut room, &reconnect)?;
                let participant = &room.participants[index];
                let reply = JoinReply {
                    slot: participant.slot,
                    team: participant.team,
                    reconnected: true,
                };
                let reply_state = state_reply(&room, index);
                self.transport.send_to(
                    &caller.connection,
                    &Notification::GameState {
                        room_id: room.id.clone(),
                        reply: reply_state,
                    },
                );
                return Ok(reply);
            }

            let participant = room.join(self.ids.next_participant_id(), caller.connection.clone(), name.to_string())?;
            let reply = JoinReply {
                slot: participant.slot,
                team: participant.team,
                reconnected: false,
            };
            info!(room = room_id, name, slot = reply.slot, team = reply.team, "participant joined");
            self.broadcast_roster(&room, RosterChange::Joined { name: name.to_string() });
            return Ok(reply);
        }
    }

    fn room_for(&self, room_id: &str) -> Room {
        let rng = self.config.room_rng(room_id, self.ids.next_room_index());
        Room::new(room_id.to_string(), rng)
    }

    async fn existing_room(&self, room_id: &str) -> Result<RoomHandle, RoomError> {
        self.rooms
            .read()
            .await
            .get(room_id)
            .cloned()
            .ok_or_else(|| RoomError::RoomNotFound(room_id.to_string()))
    }

    async fn room_or_create(&self, room_id: &str) -> Result<RoomHandle, RoomError> {
        if let Some(handle) = self.rooms.read().await.get(room_id) {
            return Ok(handle.clone());
        }

        let mut rooms = self.rooms.write().await;
        if let Some(handle) = rooms.get(room_id) {
            return Ok(handle.clone());
        }
        if rooms.len() >= self.config.max_rooms {
            return Err(RoomError::TooManyRooms);
        }
        let handle = Arc::new(Mutex::new(self.room_for(room_id)));
        rooms.insert(room_id.to_string(), handle.clone());
        info!(room = room_id, "room created on join");
        Ok(handle)
    }

    /// Убрать комнату из реестра, если там всё ещё именно она.
    async fn forget_room(&self, room_id: &str, handle: &RoomHandle) {
        let mut rooms = self.rooms.write().await;
        if rooms.get(room_id).is_some_and(|h| Arc::ptr_eq(h, handle)) {
            rooms.remove(room_id);
            info!(room = room_id, "room destroyed");
        }
    }

    fn resolve(&self, room: &mut Room, caller: &Caller) -> Result<usize, RoomError> {
        let resolved = room.resolve(caller, self.config.reconnect_by_name)?;
        if let Some(previous) = resolved.rebound_from {
            let participant = &room.participants[resolved.index];
            warn!(
                room = %room.id,
                name = %participant.name,
                previous = ?previous,
                connection = %caller.connection,
                "reconnected by display name"
            );
            let name = participant.name.clone();
            self.broadcast_roster(room, RosterChange::Reconnected { name });
        }
        Ok(resolved.index)
    }

    fn broadcast_roster(&self, room: &Room, change: RosterChange) {
        self.transport.broadcast(
            &room.id,
            &room.connections(),
            &Notification::RosterChanged {
                change,
                roster: build_roster(room),
            },
        );
    }

    /// Приватная рука ходившему и, если партия закончилась, объявление победителя.
    fn after_turn(&self, room: &Room, index: usize, outcome: &TurnOutcome) {
        let participant = &room.participants[index];
        if let (Some(connection), Some(hand)) = (&participant.connection, room.session.hand(outcome.slot)) {
            self.transport.send_to(
                connection,
                &Notification::CardsDealt {
                    room_id: room.id.clone(),
                    hand: hand.to_vec(),
                },
            );
        }

        if let Some(team) = outcome.winner {
            let winner_names: Vec<String> = room
                .participants
                .iter()
                .filter(|p| p.team == team)
                .map(|p| p.name.clone())
                .collect();
            info!(room = %room.id, team, winners = ?winner_names, "game ended");
            self.transport.broadcast(
                &room.id,
                &room.connections(),
                &Notification::GameEnded {
                    room_id: room.id.clone(),
                    winner_team: team,
                    winner_names,
                },
            );
        }
    }

    /// Отказ уходит только инициатору.
    fn report<V>(
        &self,
        caller: &Caller,
        room_id: Option<&str>,
        request_id: Option<String>,
        result: Result<V, RoomError>,
    ) -> Result<V, RoomError> {
        if let Err(err) = &result {
            warn!(room = ?room_id, connection = %caller.connection, error = %err, "action rejected");
            self.transport.send_to(
                &caller.connection,
                &Notification::Rejected {
                    room_id: room_id.map(str::to_string),
                    request_id,
                    reason: err.to_string(),
                },
            );
        }
        result
    }
}

fn ensure_open(room: &Room) -> Result<(), RoomError> {
    if room.is_closed() {
        return Err(RoomError::RoomNotFound(room.id.clone()));
    }
    Ok(())
}

fn state_reply(room: &Room, index: usize) -> GameStateReply {
    let participant = &room.participants[index];
    GameStateReply {
        state: build_game_state(&room.session),
        roster: build_roster(room),
        hand: room
            .session
            .hand(participant.slot)
            .map(<[Card]>::to_vec)
            .unwrap_or_default(),
        slot: participant.slot,
        name: participant.name.clone(),
    }
}
