#[cfg(feature = "config_toml")]
use serde::Deserialize;
#[cfg(feature = "config_toml")]
use std::path::Path;
#[cfg(feature = "config_toml")]
use tracing::{debug, warn};

use crate::error::UtilsError;

/// Размер страницы по умолчанию, к которому выравниваются регионы рабочей памяти.
pub const DEFAULT_PAGE_SIZE: usize = 4096;

/// Конфигурация приложения, использующего планировщик.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config_toml", derive(Deserialize))]
pub struct PlannerAppConfig {
    /// Параметры раскладки рабочей памяти.
    #[cfg_attr(feature = "config_toml", serde(default))]
    pub layout: LayoutConfig,

    /// Конфигурация логирования.
    #[cfg_attr(feature = "config_toml", serde(default))]
    pub logging: LoggingConfigSub,
}

/// Параметры раскладки регионов рабочей памяти (под-конфигурация для `PlannerAppConfig`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "config_toml", derive(Deserialize))]
pub struct LayoutConfig {
    /// Выравнивание смещений регионов. Базовый адрес рабочей памяти
    /// считается уже выровненным аллокатором.
    #[cfg_attr(feature = "config_toml", serde(default = "default_page_size"))]
    pub page_size: usize,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

impl LayoutConfig {
    /// Создает конфигурацию с заданным размером страницы, проверяя его.
    ///
    /// # Errors
    /// `UtilsError::InvalidParameter`, если `page_size` не является
    /// ненулевой степенью двойки.
    pub fn with_page_size(page_size: usize) -> Result<Self, UtilsError> {
        let config = Self { page_size };
        config.validate()?;
        Ok(config)
    }

    /// Проверяет, что размер страницы является ненулевой степенью двойки.
    ///
    /// # Errors
    /// `UtilsError::InvalidParameter` при нарушении условия.
    pub fn validate(&self) -> Result<(), UtilsError> {
        if self.page_size.is_power_of_two() {
            Ok(())
        } else {
            Err(UtilsError::InvalidParameter(format!(
                "page_size ({}) должен быть ненулевой степенью двойки",
                self.page_size
            )))
        }
    }
}

/// Конфигурация логирования (под-конфигурация для `PlannerAppConfig`).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config_toml", derive(Deserialize))]
pub struct LoggingConfigSub {
    /// Уровень логирования ("error", "warn", "info", "debug", "trace").
    #[cfg_attr(feature = "config_toml", serde(default = "default_log_level"))]
    pub level: String,
    /// Директория для файлов логов (опционально).
    #[cfg_attr(feature = "config_toml", serde(default))]
    pub log_dir: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfigSub {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            log_dir: None,
        }
    }
}

impl LoggingConfigSub {
    /// Преобразует строковый уровень в `tracing::Level`.
    ///
    /// # Errors
    /// `UtilsError::Config`, если строка не является известным уровнем.
    pub fn tracing_level(&self) -> Result<tracing::Level, UtilsError> {
        self.level.parse::<tracing::Level>().map_err(|e| {
            UtilsError::Config(format!("Неизвестный уровень логирования '{}': {e}", self.level))
        })
    }
}

#[cfg(feature = "config_toml")]
impl PlannerAppConfig {
    /// Разбирает конфигурацию из строки TOML и проверяет ее.
    ///
    /// # Errors
    /// `UtilsError::Config` при ошибках разбора TOML или недопустимых значениях.
    pub fn from_toml_str(content: &str) -> Result<Self, UtilsError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| UtilsError::Config(format!("Failed to parse config from TOML: {e}")))?;
        config.layout.validate().map_err(|e| UtilsError::Config(e.to_string()))?;
        config.logging.tracing_level()?;
        debug!(page_size = config.layout.page_size, "Конфигурация планировщика разобрана.");
        Ok(config)
    }

    /// Загружает конфигурацию из TOML файла.
    /// Если файл не найден, возвращается конфигурация по умолчанию.
    ///
    /// # Errors
    /// `UtilsError::Io` при ошибках чтения файла или `UtilsError::Config`
    /// при ошибках разбора TOML.
    pub fn load_from_toml(file_path: &Path) -> Result<Self, UtilsError> {
        if !file_path.exists() {
            warn!(
                "Config file not found at {:?}, using default configuration.",
                file_path
            );
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(file_path)
            .map_err(|e| UtilsError::io_with_path(e, file_path.display().to_string()))?;
        Self::from_toml_str(&content)
    }
}
