//! Движок настольной игры Ток и координатор комнат.
//!
//! Слои:
//! - `domain` – карты, колода, доска, пешки;
//! - `engine` – правила карт, перемещение, партия (`GameSession`);
//! - `room` – лобби, привязка соединений, реестр комнат (`RoomCoordinator`);
//! - `api` – входящие команды и DTO для клиента;
//! - `infra` – RNG, ID, логирование;
//! - `config` – настройки координатора.

pub mod api;
pub mod config;
pub mod domain;
pub mod engine;
pub mod infra;
pub mod room;

pub use config::CoordinatorConfig;
pub use engine::{GameSession, GameStatus};
pub use room::{Caller, Notification, RoomCoordinator, Transport};
