// rnn_pd/src/descriptor.rs

use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

use crate::{
    error::RnnPdError,
    types::{Activation, CellDesc, CellKind, Direction, MemoryDesc, PropKind},
    validation::RnnDescValidator,
};

/// Неизменяемое описание RNN-оператора.
///
/// Создается один раз через [`RnnDescBuilder::build`] или
/// [`RnnDesc::from_raw_config`], которые проверяют согласованность форм.
/// После построения не изменяется, поэтому все производные запросы
/// (формы, раскладка рабочей памяти, порты) можно выполнять из любого потока.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RnnDesc {
    pub(crate) prop_kind: PropKind,
    pub(crate) cell: CellDesc,
    pub(crate) direction: Direction,
    pub(crate) src_layer: MemoryDesc,
    pub(crate) src_iter: MemoryDesc,
    pub(crate) weights_layer: MemoryDesc,
    pub(crate) weights_iter: MemoryDesc,
    pub(crate) bias: MemoryDesc,
    pub(crate) dst_layer: MemoryDesc,
    pub(crate) dst_iter: MemoryDesc,
}

impl RnnDesc {
    /// Дескриптор входа слоя `[T, MB, SLC]`.
    pub const fn src_layer_desc(&self) -> &MemoryDesc {
        &self.src_layer
    }

    /// Дескриптор начального состояния `[L, D, S, MB, SIC]` (может быть нулевым).
    pub const fn src_iter_desc(&self) -> &MemoryDesc {
        &self.src_iter
    }

    /// Дескриптор весов входа `[L, D, SLC, G, DIC]`.
    pub const fn weights_layer_desc(&self) -> &MemoryDesc {
        &self.weights_layer
    }

    /// Дескриптор рекуррентных весов `[L, D, SIC, G, DIC]`.
    pub const fn weights_iter_desc(&self) -> &MemoryDesc {
        &self.weights_iter
    }

    /// Дескриптор смещения `[L, D, G, DIC]` (может быть нулевым).
    pub const fn bias_desc(&self) -> &MemoryDesc {
        &self.bias
    }

    /// Дескриптор выхода слоя `[T, MB, DLC]`.
    pub const fn dst_layer_desc(&self) -> &MemoryDesc {
        &self.dst_layer
    }

    /// Дескриптор конечного состояния `[L, D, S, MB, DIC]` (может быть нулевым).
    pub const fn dst_iter_desc(&self) -> &MemoryDesc {
        &self.dst_iter
    }

    /// Описание ячейки.
    pub const fn cell_desc(&self) -> CellDesc {
        self.cell
    }

    /// Строит и проверяет дескриптор из "сырого" описания.
    ///
    /// # Errors
    /// `RnnPdError::InvalidConfig`, если обязательные поля отсутствуют или формы
    /// не согласованы; `RnnPdError::Unsupported` для неподдерживаемых комбинаций.
    pub fn from_raw_config(raw: &RawRnnConfig) -> Result<Self, RnnPdError> {
        RnnDescValidator::validate_raw_config(raw)?;

        // Наличие полей проверено валидатором.
        let (Some(prop_kind), Some(cell_kind), Some(direction)) =
            (raw.prop_kind, raw.cell_kind, raw.direction)
        else {
            return Err(RnnPdError::InvalidConfig {
                message: "отсутствуют prop_kind, cell_kind или direction".to_string(),
            });
        };

        let mut builder = RnnDescBuilder::new(prop_kind, cell_kind, direction)
            .src_layer(optional_desc(raw.src_layer.as_deref())?)
            .src_iter(optional_desc(raw.src_iter.as_deref())?)
            .weights_layer(optional_desc(raw.weights_layer.as_deref())?)
            .weights_iter(optional_desc(raw.weights_iter.as_deref())?)
            .bias(optional_desc(raw.bias.as_deref())?)
            .dst_layer(optional_desc(raw.dst_layer.as_deref())?)
            .dst_iter(optional_desc(raw.dst_iter.as_deref())?);
        if let Some(activation) = raw.activation {
            builder = builder.activation(activation);
        }
        builder.build()
    }

    /// Разбирает "сырое" описание из строки TOML и строит дескриптор.
    ///
    /// # Errors
    /// `RnnPdError::Parse` при синтаксической ошибке, иначе как [`RnnDesc::from_raw_config`].
    pub fn from_toml_str(content: &str) -> Result<Self, RnnPdError> {
        let raw: RawRnnConfig = toml::from_str(content)?;
        Self::from_raw_config(&raw)
    }

    /// Загружает описание оператора из TOML файла.
    ///
    /// # Errors
    /// `RnnPdError::Utils` при ошибке чтения файла, иначе как [`RnnDesc::from_toml_str`].
    pub fn load_from_toml(file_path: &Path) -> Result<Self, RnnPdError> {
        info!("Загрузка описания RNN из: {:?}", file_path);
        let content = std::fs::read_to_string(file_path).map_err(|e| {
            rnn_utils::UtilsError::io_with_path(e, file_path.display().to_string())
        })?;
        Self::from_toml_str(&content)
    }
}

fn optional_desc(dims: Option<&[usize]>) -> Result<MemoryDesc, RnnPdError> {
    dims.map_or(Ok(MemoryDesc::zero()), MemoryDesc::new)
}

/// Построитель [`RnnDesc`]. Опциональные порты (src_iter, bias, dst_iter)
/// по умолчанию отсутствуют.
#[derive(Debug, Clone)]
pub struct RnnDescBuilder {
    prop_kind: PropKind,
    cell_kind: CellKind,
    activation: Option<Activation>,
    direction: Direction,
    src_layer: MemoryDesc,
    src_iter: MemoryDesc,
    weights_layer: MemoryDesc,
    weights_iter: MemoryDesc,
    bias: MemoryDesc,
    dst_layer: MemoryDesc,
    dst_iter: MemoryDesc,
}

impl RnnDescBuilder {
    /// Начинает построение описания.
    pub const fn new(prop_kind: PropKind, cell_kind: CellKind, direction: Direction) -> Self {
        Self {
            prop_kind,
            cell_kind,
            activation: None,
            direction,
            src_layer: MemoryDesc::zero(),
            src_iter: MemoryDesc::zero(),
            weights_layer: MemoryDesc::zero(),
            weights_iter: MemoryDesc::zero(),
            bias: MemoryDesc::zero(),
            dst_layer: MemoryDesc::zero(),
            dst_iter: MemoryDesc::zero(),
        }
    }

    /// Функция активации vanilla-ячейки.
    #[must_use]
    pub const fn activation(mut self, activation: Activation) -> Self {
        self.activation = Some(activation);
        self
    }

    /// Вход слоя.
    #[must_use]
    pub const fn src_layer(mut self, desc: MemoryDesc) -> Self {
        self.src_layer = desc;
        self
    }

    /// Начальное состояние.
    #[must_use]
    pub const fn src_iter(mut self, desc: MemoryDesc) -> Self {
        self.src_iter = desc;
        self
    }

    /// Веса входа.
    #[must_use]
    pub const fn weights_layer(mut self, desc: MemoryDesc) -> Self {
        self.weights_layer = desc;
        self
    }

    /// Рекуррентные веса.
    #[must_use]
    pub const fn weights_iter(mut self, desc: MemoryDesc) -> Self {
        self.weights_iter = desc;
        self
    }

    /// Смещение.
    #[must_use]
    pub const fn bias(mut self, desc: MemoryDesc) -> Self {
        self.bias = desc;
        self
    }

    /// Выход слоя.
    #[must_use]
    pub const fn dst_layer(mut self, desc: MemoryDesc) -> Self {
        self.dst_layer = desc;
        self
    }

    /// Конечное состояние.
    #[must_use]
    pub const fn dst_iter(mut self, desc: MemoryDesc) -> Self {
        self.dst_iter = desc;
        self
    }

    /// Проверяет описание и возвращает неизменяемый [`RnnDesc`].
    ///
    /// # Errors
    /// `RnnPdError::Unsupported` для vanilla-ячейки без активации,
    /// `RnnPdError::InvalidConfig` со списком всех найденных несогласованностей.
    pub fn build(self) -> Result<RnnDesc, RnnPdError> {
        let desc = RnnDesc {
            prop_kind: self.prop_kind,
            cell: CellDesc {
                cell_kind: self.cell_kind,
                activation: self.activation,
            },
            direction: self.direction,
            src_layer: self.src_layer,
            src_iter: self.src_iter,
            weights_layer: self.weights_layer,
            weights_iter: self.weights_iter,
            bias: self.bias,
            dst_layer: self.dst_layer,
            dst_iter: self.dst_iter,
        };
        RnnDescValidator::validate_desc(&desc)?;
        debug!(
            prop_kind = %desc.prop_kind,
            cell_kind = %desc.cell.cell_kind,
            direction = %desc.direction,
            "Описание RNN построено."
        );
        Ok(desc)
    }
}

/// "Сырое" описание оператора, как оно десериализуется из TOML.
///
/// Все поля опциональны; наличие обязательных проверяет
/// [`RnnDescValidator::validate_raw_config`].
///
/// ```toml
/// prop_kind = "forward_training"
/// cell_kind = "lstm"
/// direction = "unidirectional_left2right"
/// src_layer = [10, 32, 512]
/// weights_layer = [2, 1, 512, 4, 256]
/// weights_iter = [2, 1, 256, 4, 256]
/// dst_layer = [10, 32, 256]
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawRnnConfig {
    /// Вид распространения.
    pub prop_kind: Option<PropKind>,
    /// Тип ячейки.
    pub cell_kind: Option<CellKind>,
    /// Активация vanilla-ячейки.
    pub activation: Option<Activation>,
    /// Направление.
    pub direction: Option<Direction>,
    /// Размерности входа слоя.
    pub src_layer: Option<Vec<usize>>,
    /// Размерности начального состояния.
    pub src_iter: Option<Vec<usize>>,
    /// Размерности весов входа.
    pub weights_layer: Option<Vec<usize>>,
    /// Размерности рекуррентных весов.
    pub weights_iter: Option<Vec<usize>>,
    /// Размерности смещения.
    pub bias: Option<Vec<usize>>,
    /// Размерности выхода слоя.
    pub dst_layer: Option<Vec<usize>>,
    /// Размерности конечного состояния.
    pub dst_iter: Option<Vec<usize>>,
}
