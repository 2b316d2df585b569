// rnn_pd/src/error.rs

use rnn_utils::UtilsError;

/// Ошибки построения дескриптора RNN-примитива.
///
/// Запросы к построенному примитиву (формы, раскладка рабочей памяти, порты)
/// ошибок не возвращают: описание проверяется при построении дескриптора,
/// выровненная раскладка при построении примитива.
#[derive(thiserror::Error, Debug)]
pub enum RnnPdError {
    /// Некорректное описание оператора: отсутствующие тензоры, несогласованные размерности.
    /// `message` содержит все найденные проблемы, разделенные `"; "`.
    #[error("Невалидное описание RNN: {message}")]
    InvalidConfig {
        /// Описательное сообщение о том, почему описание невалидно.
        message: String,
    },

    /// Конфигурация синтаксически корректна, но не поддерживается
    /// (например, vanilla-ячейка без функции активации).
    #[error("Неподдерживаемая конфигурация: {0}")]
    Unsupported(String),

    /// Ошибка разбора описания оператора из TOML.
    #[error("Не удалось разобрать описание RNN: {0}")]
    Parse(#[from] toml::de::Error),

    /// Ошибка из `rnn_utils` (конфигурация раскладки, ввод-вывод).
    #[error("Ошибка из rnn_utils: {0}")]
    Utils(#[from] UtilsError),
}
