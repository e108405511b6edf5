//! Комнаты: лобби, привязка соединений к местам, рассылка результатов.
//!
//! `Room` – синхронный агрегат (состав + партия), `RoomCoordinator` –
//! асинхронный реестр комнат, каждая под своим замком.

pub mod coordinator;
pub mod errors;
pub mod participant;
#[allow(clippy::module_inception)]
pub mod room;
pub mod transport;

pub use coordinator::{PlayRequest, RoomCoordinator};
pub use errors::RoomError;
pub use participant::{Caller, Participant};
pub use room::{Resolved, Room, RoomSession};
pub use transport::{Notification, RosterChange, Transport};
