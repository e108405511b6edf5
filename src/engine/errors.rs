use crate::domain::{Card, PawnId, Rank, Slot};

use thiserror::Error;

/// Ошибки движка Тока.
///
/// Всё, кроме `Corrupted`, – отказ в действии: состояние не менялось.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("Game has not started")]
    NotStarted,

    #[error("Game has already started")]
    AlreadyStarted,

    #[error("Game is finished")]
    GameFinished,

    #[error("Not your turn: slot {current} is to play")]
    NotYourTurn { slot: Slot, current: Slot },

    #[error("Slot {0} does not exist")]
    InvalidSlot(Slot),

    #[error("Card {0} is not in your hand")]
    CardNotInHand(Card),

    #[error("Action `{action}` is not allowed for card {rank}")]
    ActionNotAllowed { rank: Rank, action: &'static str },

    #[error("Invalid pawn {0}")]
    InvalidPawn(PawnId),

    #[error("Pawn {0} is in base, use an exit")]
    PawnInBase(PawnId),

    #[error("Pawn {0} has already finished")]
    PawnFinished(PawnId),

    #[error("Pawn {0} is not in base")]
    PawnNotInBase(PawnId),

    #[error("Start cell is blocked by your own pawn")]
    StartBlocked,

    #[error("Path is blocked by another pawn")]
    PathBlocked,

    #[error("Overshoot past the last home cell (exact landing required)")]
    HomeOverflow,

    #[error("Home cell {0} is occupied by your pawn")]
    HomeOccupied(u8),

    #[error("No moves given for the 7")]
    SplitEmpty,

    #[error("Every 7 allocation must be positive")]
    SplitNonPositive,

    #[error("The 7 allocations must sum to 7 (got {0})")]
    SplitSum(u32),

    #[error("Cannot swap a pawn with itself")]
    SwapSamePawn,

    #[error("Cannot swap pawn {0}: it is not on the board")]
    SwapOffBoard(PawnId),

    #[error("Teams must be two slots each, got {0:?}")]
    InvalidTeams([u8; 4]),

    #[error("Game state is corrupted: {0}")]
    Corrupted(String),
}
