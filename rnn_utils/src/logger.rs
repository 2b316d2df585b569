//! Модуль для инициализации глобального логгера на основе `tracing`.
//!
//! Функциональность этого модуля активируется фичей `logger_utils_feature`.

use std::{fs, io, path::Path};

use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::{config::LoggingConfigSub, error::UtilsError};

/// Инициализирует глобальный подписчик `tracing`.
///
/// Настраивает вывод в консоль (stderr) и, опционально, в файл с ежедневной ротацией.
/// Фильтрует по `RUST_LOG` и явным уровням для `app_name`.
///
/// # Аргументы
/// * `app_name` - Имя приложения (для фильтров и имени файла лога).
/// * `console_level` - Уровень для консоли.
/// * `file_level` - Уровень для файла.
/// * `log_dir` - Опциональная директория для файлов логов.
///
/// # Ошибки
/// `UtilsError::InvalidParameter`, если из `app_name` не получается директива фильтра;
/// `UtilsError::Generic` при повторной инициализации глобального подписчика.
/// Сбой создания директории логов не является ошибкой: логирование
/// продолжается только в консоль.
#[allow(clippy::module_name_repetitions)]
pub fn init_tracing_logger(
    app_name: &str,
    console_level: Level,
    file_level: Level,
    log_dir: Option<&Path>,
) -> Result<(), UtilsError> {
    let base_env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // EnvFilter не принимает дефисы в именах целей.
    let sanitized_app_name = app_name.replace('-', "_");

    let console_filter = base_env_filter
        .clone()
        .add_directive(level_directive(&sanitized_app_name, console_level)?);

    let console_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(true)
        .with_filter(console_filter);

    let mut layers: Vec<Box<dyn Layer<_> + Send + Sync + 'static>> = Vec::new();
    layers.push(console_layer.boxed());

    let mut file_logging_dir = None;
    if let Some(dir) = log_dir {
        if let Err(e) = fs::create_dir_all(dir) {
            // tracing еще не инициализирован.
            eprintln!(
                "[ПРЕДУПРЕЖДЕНИЕ] Не удалось создать директорию логов {dir:?}: {e}. Логирование в файл будет отключено."
            );
        } else {
            let file_appender =
                tracing_appender::rolling::daily(dir, format!("{app_name}.log"));
            let file_filter =
                base_env_filter.add_directive(level_directive(&sanitized_app_name, file_level)?);
            let file_layer = fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_filter(file_filter);
            layers.push(file_layer.boxed());
            file_logging_dir = Some(dir);
        }
    }

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|e| UtilsError::Generic(format!("Не удалось инициализировать логгер: {e}")))?;

    match file_logging_dir {
        Some(dir) => tracing::info!(
            "Логгер инициализирован. Уровень консоли: {}. Логирование в файл: {:?} (уровень {}).",
            console_level,
            dir,
            file_level
        ),
        None => tracing::info!(
            "Логгер инициализирован. Только вывод в консоль (уровень {}).",
            console_level
        ),
    }
    Ok(())
}

/// Инициализирует логгер по секции `[logging]` конфигурации: уровень
/// `level` для консоли и файла, файл пишется в `log_dir`, если она задана.
///
/// # Errors
/// `UtilsError::Config` для неизвестного уровня; остальные как у
/// [`init_tracing_logger`].
pub fn init_logger_from_config(
    app_name: &str,
    logging: &LoggingConfigSub,
) -> Result<(), UtilsError> {
    let level = logging.tracing_level()?;
    init_tracing_logger(app_name, level, level, logging.log_dir.as_deref().map(Path::new))
}

fn level_directive(
    target: &str,
    level: Level,
) -> Result<tracing_subscriber::filter::Directive, UtilsError> {
    format!("{target}={level}").parse().map_err(|e| {
        UtilsError::InvalidParameter(format!(
            "Неверная директива уровня логирования для '{target}': {e}"
        ))
    })
}
