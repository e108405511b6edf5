use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::EngineError;
use crate::room::RoomError;

/// Ошибки внешнего API (то, что отдаём клиенту).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Неправильные входные данные (например, битый JSON).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Команда отклонена комнатой или движком.
    #[error("{0}")]
    Rejected(String),
}

impl From<RoomError> for ApiError {
    fn from(err: RoomError) -> Self {
        ApiError::Rejected(err.to_string())
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        ApiError::Rejected(err.to_string())
    }
}
