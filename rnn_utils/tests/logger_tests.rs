#![cfg(feature = "logger_utils_feature")]

use rnn_utils::error::UtilsError;
use rnn_utils::config::LoggingConfigSub;
use rnn_utils::logger::{init_logger_from_config, init_tracing_logger};
use serial_test::serial;
use std::fs;
use std::path::Path;
use tempfile::tempdir;
use tracing::Level;

// Глобальный подписчик можно установить только один раз на процесс,
// поэтому каждый тест допускает ошибку повторной инициализации.
fn init_or_already_set(result: Result<(), UtilsError>) -> bool {
    match result {
        Ok(()) => true,
        Err(UtilsError::Generic(msg)) if msg.contains("Не удалось инициализировать логгер") => {
            println!("[ПРЕДУПРЕЖДЕНИЕ] Логгер уже инициализирован: {}", msg);
            false
        }
        Err(e) => panic!("Неожиданная ошибка при инициализации логгера: {:?}", e),
    }
}

fn log_file_contains(log_dir: &Path, app_name: &str, expected: &str) -> bool {
    std::thread::sleep(std::time::Duration::from_millis(100));
    fs::read_dir(log_dir)
        .unwrap()
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|p| {
            p.file_name()
                .is_some_and(|n| n.to_string_lossy().starts_with(app_name))
        })
        .any(|p| fs::read_to_string(p).is_ok_and(|content| content.contains(expected)))
}

#[test]
#[serial]
fn test_logger_init_with_file() {
    let temp_dir = tempdir().unwrap();
    let app_name = "rnn_planner_file_test";
    let message = "Раскладка рабочей памяти записана в файл.";

    let installed = init_or_already_set(init_tracing_logger(
        app_name,
        Level::INFO,
        Level::DEBUG,
        Some(temp_dir.path()),
    ));
    tracing::info!(target: "rnn_planner_file_test", "{}", message);

    if installed {
        assert!(
            log_file_contains(temp_dir.path(), app_name, message),
            "Сообщение INFO не найдено в лог-файле."
        );
    }
}

#[test]
#[serial]
fn test_logger_directory_failure_does_not_error() {
    let temp_dir = tempdir().unwrap();
    // Файл на месте директории: create_dir_all гарантированно завершится ошибкой.
    let blocker = temp_dir.path().join("not_a_dir");
    fs::write(&blocker, b"x").unwrap();

    init_or_already_set(init_tracing_logger(
        "rnn_planner_bad_dir",
        Level::INFO,
        Level::DEBUG,
        Some(&blocker),
    ));
    tracing::info!("Логгер работает без файлового вывода.");
}

#[test]
#[serial]
fn test_logger_init_console_only() {
    init_or_already_set(init_tracing_logger(
        "rnn-planner-console",
        Level::DEBUG,
        Level::INFO,
        None,
    ));
    tracing::debug!("Тест консольного логгера: DEBUG сообщение.");
}

#[test]
#[serial]
fn test_logger_from_config_uses_log_dir() {
    let temp_dir = tempdir().unwrap();
    let app_name = "rnn_planner_config_test";
    let message = "Логгер настроен из секции [logging].";
    let logging = LoggingConfigSub {
        level: "debug".to_string(),
        log_dir: Some(temp_dir.path().display().to_string()),
    };

    let installed = init_or_already_set(init_logger_from_config(app_name, &logging));
    tracing::debug!(target: "rnn_planner_config_test", "{}", message);

    if installed {
        assert!(
            log_file_contains(temp_dir.path(), app_name, message),
            "Сообщение DEBUG не найдено в лог-файле."
        );
    }
}

#[test]
fn test_logger_from_config_rejects_unknown_level() {
    let logging = LoggingConfigSub {
        level: "loud".to_string(),
        log_dir: None,
    };
    match init_logger_from_config("rnn_planner_bad_level", &logging) {
        Err(UtilsError::Config(msg)) => assert!(msg.contains("loud")),
        other => panic!("Ожидалась ошибка Config, получено {other:?}"),
    }
}
