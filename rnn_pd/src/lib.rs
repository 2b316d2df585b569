// rnn_pd/src/lib.rs

// Включаем строгие правила линтинга для всего крейта.
#![warn(
    missing_docs,      // Предупреждать, если публичные элементы не документированы.
    clippy::all,       // Все стандартные линты Clippy.
    clippy::pedantic,  // Более строгие линты.
    clippy::nursery    // Экспериментальные линты.
)]
#![deny(
    unsafe_code,          // Запретить использование unsafe блоков.
    clippy::unwrap_used,  // Запретить .unwrap(): ошибки пробрасываются через RnnPdError.
    clippy::expect_used   // Запретить .expect().
)]

//! # `rnn_pd`
//!
//! Слой дескриптора RNN-примитива: по описанию оператора (длина
//! последовательности, батч, число слоев и направлений, тип ячейки, режим)
//! проверяет и выводит размерности, вычисляет размер и раскладку рабочей
//! памяти и описывает входы/выходы примитива для слоя диспетчеризации ядер.
//!
//! ## Структура
//!
//! - `types`: виды распространения, типы ячеек, направления, дескриптор формы, слоты.
//! - `descriptor`: неизменяемое описание оператора [`RnnDesc`] и его построитель.
//! - `validation`: проверки согласованности форм при построении.
//! - `shape`: производные размерности (T, MB, L, D, SLC, SIC, G, DIC, DLC, S).
//! - `workspace`: размеры регионов и их выровненные смещения.
//! - `ports`: контракт портов прямого и обратного прохода.
//! - `primitive`: [`RnnPrimitiveDesc`], объединяющий все вышеперечисленное.
//!
//! Сами вычислительные ядра, выделение памяти и выбор устройства находятся
//! вне этого крейта.

pub mod descriptor;
pub mod error;
pub mod ports;
pub mod primitive;
pub mod shape;
pub mod types;
pub mod validation;
pub mod workspace;

pub use descriptor::{RawRnnConfig, RnnDesc, RnnDescBuilder};
pub use error::RnnPdError;
pub use ports::{PdVariant, PortContract, PortFlags};
pub use primitive::RnnPrimitiveDesc;
pub use types::{
    Activation, CellDesc, CellKind, Direction, MemoryDesc, PropKind, SlotKind, MAX_DIMS,
};
pub use validation::RnnDescValidator;
pub use workspace::{
    Region, RegionKind, RegionOffsets, RegionSizes, WorkspaceLayout, WorkspacePlanner,
};

// Конфигурация раскладки живет в rnn_utils; реэкспортируем для удобства.
pub use rnn_utils::{LayoutConfig, DEFAULT_PAGE_SIZE};
