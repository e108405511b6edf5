//! Внешний API движка Тока.
//!
//! Здесь описываются:
//! - команды (commands.rs) – входящие сообщения клиента и их диспетчеризация;
//! - запросы (queries.rs) – только чтение;
//! - DTO (dto.rs) – структуры для фронта;
//! - ошибки (errors.rs) – то, что видит клиент.

pub mod commands;
pub mod dto;
pub mod errors;
pub mod queries;

pub use commands::*;
pub use dto::*;
pub use errors::*;
pub use queries::*;
