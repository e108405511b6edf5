//! Конфиг координатора комнат.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::infra::{DeterministicRng, RngSeed};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Настройки координатора. Все поля необязательны в JSON.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CoordinatorConfig {
    /// Базовый seed колод. `None` – колоды из энтропии ОС.
    pub rng_seed: Option<u64>,
    /// Сколько комнат может жить одновременно.
    pub max_rooms: usize,
    /// Переподключение по совпадению имени (без токена).
    pub reconnect_by_name: bool,
    pub max_name_len: usize,
    pub max_chat_len: usize,
    /// Фильтр логов по умолчанию (если нет RUST_LOG).
    pub log_filter: String,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            rng_seed: None,
            max_rooms: 1024,
            reconnect_by_name: true,
            max_name_len: 32,
            max_chat_len: 500,
            log_filter: "info".to_string(),
        }
    }
}

impl CoordinatorConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_rooms == 0 {
            return Err(ConfigError::Invalid("max_rooms must be positive".into()));
        }
        if self.max_name_len == 0 {
            return Err(ConfigError::Invalid("max_name_len must be positive".into()));
        }
        if self.max_chat_len == 0 {
            return Err(ConfigError::Invalid("max_chat_len must be positive".into()));
        }
        Ok(())
    }

    /// RNG для новой комнаты.
    pub fn room_rng(&self, room_id: &str, room_index: u64) -> DeterministicRng {
        match self.rng_seed {
            Some(seed) => RngSeed::from_u64(seed).derive(room_id, room_index).to_rng(),
            None => DeterministicRng::from_entropy(),
        }
    }
}
