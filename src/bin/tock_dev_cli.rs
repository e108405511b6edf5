// src/bin/tock_dev_cli.rs

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::debug;

use tock_engine::config::CoordinatorConfig;
use tock_engine::domain::{ConnectionId, RoomId};
use tock_engine::engine::GameStatus;
use tock_engine::infra::logging;
use tock_engine::room::{Caller, Notification, PlayRequest, RoomCoordinator, Transport};

/// Транспорт, который просто пишет уведомления в лог.
struct LogTransport;

impl Transport for LogTransport {
    fn send_to(&self, connection: &ConnectionId, notification: &Notification) {
        if let Notification::Rejected { reason, .. } = notification {
            println!("[{connection}] rejected: {reason}");
        }
        debug!(connection = %connection, ?notification, "outgoing");
    }
}

const MAX_TURNS: u32 = 5_000;

#[tokio::main]
async fn main() {
    let seed: u64 = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);

    let config = CoordinatorConfig {
        rng_seed: Some(seed),
        ..CoordinatorConfig::default()
    };
    logging::init(&config.log_filter);

    println!("tock_dev_cli: партия из четырёх ботов, seed={seed}");

    let coordinator = RoomCoordinator::new(config, Arc::new(LogTransport));
    let room_id: RoomId = "dev-room".to_string();
    let names = ["north", "east", "south", "west"];
    let callers: Vec<Caller> = names
        .iter()
        .map(|name| Caller::named(format!("conn-{name}"), *name))
        .collect();

    // 1. Лобби: вход, готовность, старт хостом.
    for (caller, name) in callers.iter().zip(names) {
        match coordinator.join_room(caller, &room_id, name).await {
            Ok(reply) => println!("[LOBBY] {name}: slot={} team={}", reply.slot, reply.team),
            Err(err) => {
                println!("[LOBBY] {name} не смог войти: {err}");
                return;
            }
        }
    }
    for caller in &callers {
        if let Err(err) = coordinator.toggle_ready(caller, &room_id).await {
            println!("[LOBBY] ошибка готовности: {err}");
            return;
        }
    }
    if let Err(err) = coordinator.start_game(&callers[0], &room_id).await {
        println!("[LOBBY] не удалось стартовать: {err}");
        return;
    }

    // 2. Игра: текущий игрок играет случайный допустимый ход или пасует.
    let mut rng = StdRng::seed_from_u64(seed);
    let mut turns = 0;
    while turns < MAX_TURNS {
        let (state, roster) = match coordinator.request_state(&callers[0], &room_id).await {
            Ok(reply) => (reply.state, reply.roster),
            Err(err) => {
                println!("[GAME] не удалось получить состояние: {err}");
                return;
            }
        };
        if state.status == GameStatus::Finished {
            break;
        }

        // Места переназначаются на старте, ищем текущего игрока по составу.
        let actor = roster
            .participants
            .iter()
            .find(|p| p.slot == state.current_player)
            .and_then(|p| callers.iter().find(|c| c.name.as_deref() == Some(p.name.as_str())));
        let Some(actor) = actor else {
            println!("[GAME] нет участника на месте {}", state.current_player);
            return;
        };

        let plays = coordinator
            .legal_plays(actor, &room_id)
            .await
            .unwrap_or_default();

        let result = match plays.choose(&mut rng) {
            Some(play) => {
                let request = PlayRequest {
                    request_id: Some(format!("t{turns}")),
                    card: play.card,
                    action: play.action.clone(),
                };
                coordinator.play_card(actor, &room_id, request).await
            }
            None => {
                // Ходов нет: сбрасываем первую карту руки.
                let hand = coordinator
                    .request_state(actor, &room_id)
                    .await
                    .map(|r| r.hand)
                    .unwrap_or_default();
                coordinator.pass_turn(actor, &room_id, hand.first().copied()).await
            }
        };

        match result {
            Ok(outcome) => {
                turns = outcome.turn;
                if let Some(card) = outcome.card {
                    println!(
                        "[TURN {:>4}] slot {} -> {} ({} events)",
                        outcome.turn,
                        outcome.slot,
                        card,
                        outcome.events.len()
                    );
                } else {
                    println!("[TURN {:>4}] slot {} passes", outcome.turn, outcome.slot);
                }
                if let Some(team) = outcome.winner {
                    println!("[GAME] победила команда {team}");
                }
            }
            Err(err) => {
                println!("[GAME] ход отклонён: {err}");
                return;
            }
        }
    }

    if turns >= MAX_TURNS {
        println!("[GAME] лимит ходов {MAX_TURNS} исчерпан");
    }
    println!("[CLI] Завершение работы tock_dev_cli.");
}
