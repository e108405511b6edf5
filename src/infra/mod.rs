//! Инфраструктурный слой вокруг движка:
//! - генерация ID;
//! - RNG-реализации для движка и seed'ы колод;
//! - инициализация логирования.

pub mod ids;
pub mod logging;
pub mod rng;
pub mod rng_seed;

pub use ids::*;
pub use rng::*;
pub use rng_seed::RngSeed;
