//! Движок Тока: разбор карт, перемещение пешек, партия.
//!
//! Высокоуровневый объект: `GameSession`
//! Основные операции:
//!   - `GameSession::start` – начать партию
//!   - `GameSession::play_card` – сыграть карту
//!   - `GameSession::pass_turn` – пасовать
//!   - `GameSession::legal_plays` – что сейчас можно сыграть

pub mod actions;
pub mod errors;
pub mod events;
pub mod movement;
pub mod rules;
pub mod session;

pub use actions::{CardAction, CardEffect, SplitStep};
pub use errors::EngineError;
pub use events::{EventLog, GameEvent, GameEventKind};
pub use movement::{exit_pawn, step_backward, step_forward, ExitOutcome, StepOutcome};
pub use rules::{legal_plays, resolve_play, Resolution};
pub use session::{GameSession, GameStatus, TurnOutcome};

/// RNG интерфейс для engine.
/// Реализации лежат в infra (обёртки над `rand`).
pub trait RandomSource {
    fn shuffle<T>(&mut self, slice: &mut [T]);
}
