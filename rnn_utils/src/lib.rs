#![warn(
    missing_docs, // Предупреждать, если публичные элементы не документированы.
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::unwrap_used, // Предупреждать об использовании .unwrap()
    clippy::expect_used  // Предупреждать об использовании .expect()
)]
#![deny(
    unsafe_code,        // Запретить использование unsafe блоков.
    unused_mut,
    unused_imports,
    unused_attributes
)]

//! `rnn_utils` предоставляет общий тип ошибки, инициализацию логирования
//! и конфигурацию для планировщика рабочей памяти RNN-примитива.
//!
//! # Основные модули:
//!
//! - [`error`]: Определяет общий тип ошибки `UtilsError`.
//! - [`config`]: Предоставляет `PlannerAppConfig` и `LayoutConfig` (размер страницы
//!   для выравнивания регионов рабочей памяти). Загрузка из TOML активируется
//!   фичей `config_toml`.
//! - [`logger`]: (активируется фичей `logger_utils_feature`) Инициализация
//!   системы логирования на базе `tracing`.
//!
//! ```toml
//! # В Cargo.toml вашего проекта
//! # rnn_utils = { path = "path/to/rnn_utils", features = ["logger_utils_feature"] }
//! ```

// --- Модуль для общих ошибок ---
pub mod error;
pub use error::UtilsError; // Реэкспорт для удобства использования.

// --- Конфигурация ---
pub mod config;
pub use config::{LayoutConfig, LoggingConfigSub, PlannerAppConfig, DEFAULT_PAGE_SIZE};

/// Модуль с утилитами для инициализации логирования.
///
/// Активируется фичей `logger_utils_feature`.
#[cfg(feature = "logger_utils_feature")]
pub mod logger;
#[cfg(feature = "logger_utils_feature")]
pub use logger::{init_logger_from_config, init_tracing_logger};
