//! RngSeed – доменный seed для колод комнат.
//!
//! Позволяет:
//!   - хранить базовый seed (из u64 конфига)
//!   - делать детерминированное hash-reseeding:
//!         new = H(domain || old || room_id || room_index)
//!   - создавать DeterministicRng из seed
//!
//! Один базовый seed из конфига даёт каждой комнате свою, но воспроизводимую колоду.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::infra::rng::DeterministicRng;

/// 32-байтовый seed для RNG.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RngSeed {
    pub bytes: [u8; 32],
}

impl RngSeed {
    /// Создать seed из u64 (для удобства тестов и конфига).
    pub fn from_u64(x: u64) -> Self {
        let mut b = [0u8; 32];
        b[..8].copy_from_slice(&x.to_le_bytes());
        Self { bytes: b }
    }

    /// Доменное хэш-расширение с контекстом комнаты:
    ///   - room_id (строка, задаётся клиентом)
    ///   - room_index (порядковый номер созданной комнаты)
    pub fn derive(&self, room_id: &str, room_index: u64) -> Self {
        let mut hasher = Sha256::new();

        // Доменный префикс
        hasher.update(b"TOCK_ENGINE_DECK_V1");
        hasher.update(self.bytes);
        hasher.update((room_id.len() as u64).to_le_bytes());
        hasher.update(room_id.as_bytes());
        hasher.update(room_index.to_le_bytes());

        let hash = hasher.finalize();

        let mut out = [0u8; 32];
        out.copy_from_slice(&hash[..32]);

        Self { bytes: out }
    }

    pub fn to_rng(&self) -> DeterministicRng {
        DeterministicRng::from_seed(self.bytes)
    }
}
