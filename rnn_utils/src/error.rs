use thiserror::Error;

/// Общий тип ошибки для утилит `rnn_utils`.
///
/// Агрегирует ошибки ввода-вывода, разбора конфигурации и неверных
/// параметров, которые могут возникнуть до построения дескриптора RNN.
#[derive(Error, Debug)]
pub enum UtilsError {
    /// Ошибка ввода-вывода (I/O).
    ///
    /// Содержит исходную ошибку `std::io::Error` и опционально путь к файлу/директории,
    /// с которым возникла проблема.
    #[error("Ошибка ввода-вывода: {source}")]
    Io {
        /// Исходная ошибка I/O.
        #[source]
        source: std::io::Error,
        /// Опциональный путь, связанный с ошибкой I/O.
        path: Option<String>,
    },

    /// Ошибка десериализации (TOML).
    #[error("Ошибка десериализации: {0}")]
    Deserialization(String),

    /// Ошибка, связанная с конфигурацией (неверное значение поля, некорректный файл).
    #[error("Ошибка конфигурации: {0}")]
    Config(String),

    /// В утилитарную функцию был передан неверный параметр.
    #[error("Неверный параметр: {0}")]
    InvalidParameter(String),

    /// Общая ошибка утилиты для случаев, не покрытых другими вариантами.
    #[error("Произошла общая ошибка утилиты: {0}")]
    Generic(String),
}

// `#[from]` недоступен: у варианта есть поле `path`.
impl From<std::io::Error> for UtilsError {
    fn from(source: std::io::Error) -> Self {
        Self::Io { source, path: None }
    }
}

/// Конвертация из `toml::de::Error` в `UtilsError::Deserialization`.
#[cfg(feature = "config_toml")]
impl From<toml::de::Error> for UtilsError {
    fn from(err: toml::de::Error) -> Self {
        Self::Deserialization(format!("Ошибка десериализации TOML: {err}"))
    }
}

impl UtilsError {
    /// Вспомогательный конструктор для создания `UtilsError::Io` с указанием пути.
    ///
    /// # Аргументы
    ///
    /// * `source` - Исходная ошибка `std::io::Error`.
    /// * `path` - Путь, с которым связана ошибка.
    pub fn io_with_path(source: std::io::Error, path: impl Into<String>) -> Self {
        Self::Io {
            source,
            path: Some(path.into()),
        }
    }
}
