//! Доменная модель Тока: карты, колода, геометрия доски, пешки, места игроков.

pub mod board;
pub mod card;
pub mod deck;
pub mod pawn;
pub mod player;
pub mod topology;

/// Место игрока за доской (0..3).
pub type Slot = u8;
/// Команда (0 или 1).
pub type Team = u8;
/// Клетка общего кольца (0..72).
pub type RingPos = u8;
/// Идентификатор комнаты (задаётся клиентом).
pub type RoomId = String;
/// Идентификатор транспортного соединения.
pub type ConnectionId = String;
/// Стабильный идентификатор участника комнаты (не меняется при переподключении).
pub type ParticipantId = u64;

pub use board::*;
pub use card::*;
pub use deck::*;
pub use pawn::*;
pub use player::*;
