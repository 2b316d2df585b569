// rnn_pd/src/types.rs

use serde::Deserialize;
use std::fmt;

use crate::error::RnnPdError;

/// Максимальное число логических размерностей в дескрипторе тензора RNN.
pub const MAX_DIMS: usize = 5;

/// Вид распространения, для которого строится примитив.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropKind {
    /// Прямой проход без сохранения промежуточных значений.
    ForwardInference,
    /// Прямой проход, сохраняющий в рабочей памяти все, что нужно обратному проходу.
    ForwardTraining,
    /// Обратный проход (градиенты).
    Backward,
}

impl PropKind {
    /// `true` для режимов обучения: `ForwardTraining` и `Backward`.
    pub const fn is_training(self) -> bool {
        matches!(self, Self::ForwardTraining | Self::Backward)
    }
}

impl fmt::Display for PropKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::ForwardInference => write!(f, "forward_inference"),
            Self::ForwardTraining => write!(f, "forward_training"),
            Self::Backward => write!(f, "backward"),
        }
    }
}

/// Тип рекуррентной ячейки.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellKind {
    /// Простая ячейка `h_t = act(W x_t + U h_{t-1} + b)`.
    #[serde(alias = "vanilla_rnn")]
    Vanilla,
    /// LSTM: отдельные скрытое состояние и состояние ячейки.
    #[serde(alias = "vanilla_lstm")]
    Lstm,
    /// GRU.
    #[serde(alias = "vanilla_gru")]
    Gru,
    /// GRU с линейным преобразованием до reset-гейта (LBR).
    /// Требует дополнительной памяти на ячейку и лишнего гейта в смещении.
    #[serde(alias = "lbr_gru")]
    GruLinearBeforeReset,
}

impl CellKind {
    /// Количество состояний на ячейку (S).
    pub const fn states_count(self) -> usize {
        match self {
            Self::Lstm => 2,
            Self::Vanilla | Self::Gru | Self::GruLinearBeforeReset => 1,
        }
    }

    /// Количество гейтов (G) в тензорах весов.
    pub const fn gates_count(self) -> usize {
        match self {
            Self::Vanilla => 1,
            Self::Lstm => 4,
            Self::Gru | Self::GruLinearBeforeReset => 3,
        }
    }

    /// Количество гейтов в тензоре смещения: у LBR-GRU на один больше.
    pub const fn bias_gates_count(self) -> usize {
        match self {
            Self::GruLinearBeforeReset => self.gates_count() + 1,
            _ => self.gates_count(),
        }
    }
}

impl fmt::Display for CellKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Vanilla => write!(f, "vanilla_rnn"),
            Self::Lstm => write!(f, "vanilla_lstm"),
            Self::Gru => write!(f, "vanilla_gru"),
            Self::GruLinearBeforeReset => write!(f, "lbr_gru"),
        }
    }
}

/// Функция активации vanilla-ячейки.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    /// ReLU.
    Relu,
    /// Гиперболический тангенс.
    Tanh,
    /// Логистическая сигмоида.
    Logistic,
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Relu => write!(f, "relu"),
            Self::Tanh => write!(f, "tanh"),
            Self::Logistic => write!(f, "logistic"),
        }
    }
}

/// Направление обработки последовательности.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Слева направо.
    // snake_case дал бы "left2_right".
    #[serde(rename = "unidirectional_left2right")]
    UnidirectionalLeft2Right,
    /// Справа налево.
    #[serde(rename = "unidirectional_right2left")]
    UnidirectionalRight2Left,
    /// Оба направления, выходы конкатенируются по каналам.
    BidirectionalConcat,
    /// Оба направления, выходы суммируются.
    BidirectionalSum,
}

impl Direction {
    /// Количество направлений (D).
    pub const fn directions_count(self) -> usize {
        match self {
            Self::UnidirectionalLeft2Right | Self::UnidirectionalRight2Left => 1,
            Self::BidirectionalConcat | Self::BidirectionalSum => 2,
        }
    }

    /// Ожидаемая ширина выхода слоя (DLC) при заданном DIC.
    pub const fn dst_layer_channels(self, dic: usize) -> usize {
        match self {
            Self::BidirectionalConcat => 2 * dic,
            _ => dic,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::UnidirectionalLeft2Right => write!(f, "unidirectional_left2right"),
            Self::UnidirectionalRight2Left => write!(f, "unidirectional_right2left"),
            Self::BidirectionalConcat => write!(f, "bidirectional_concat"),
            Self::BidirectionalSum => write!(f, "bidirectional_sum"),
        }
    }
}

/// Описание ячейки: тип и, для vanilla-ячейки, функция активации.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellDesc {
    /// Тип ячейки.
    pub cell_kind: CellKind,
    /// Функция активации (обязательна только для `CellKind::Vanilla`).
    pub activation: Option<Activation>,
}

/// Минимальный дескриптор формы тензора: число размерностей и до
/// [`MAX_DIMS`] размерностей, адресуемых по позиции.
///
/// Дескриптор с `ndims == 0` означает отсутствующий (неиспользуемый) порт.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MemoryDesc {
    ndims: usize,
    dims: [usize; MAX_DIMS],
}

impl MemoryDesc {
    /// "Нулевой" дескриптор отсутствующего порта.
    pub const fn zero() -> Self {
        Self {
            ndims: 0,
            dims: [0; MAX_DIMS],
        }
    }

    /// Создает дескриптор из списка размерностей.
    ///
    /// Пустой список дает нулевой дескриптор.
    ///
    /// # Errors
    /// `RnnPdError::InvalidConfig`, если размерностей больше [`MAX_DIMS`].
    pub fn new(dims: &[usize]) -> Result<Self, RnnPdError> {
        if dims.len() > MAX_DIMS {
            return Err(RnnPdError::InvalidConfig {
                message: format!(
                    "дескриптор тензора имеет {} размерностей, максимум {MAX_DIMS}",
                    dims.len()
                ),
            });
        }
        let mut desc = Self::zero();
        desc.ndims = dims.len();
        desc.dims[..dims.len()].copy_from_slice(dims);
        Ok(desc)
    }

    /// Число логических размерностей.
    pub const fn ndims(&self) -> usize {
        self.ndims
    }

    /// Заданные размерности (первые `ndims`).
    pub fn dims(&self) -> &[usize] {
        &self.dims[..self.ndims]
    }

    /// Размерность по позиции; `0` за пределами массива.
    pub fn dim(&self, index: usize) -> usize {
        self.dims.get(index).copied().unwrap_or(0)
    }

    /// `true`, если порт отсутствует.
    pub const fn is_zero(&self) -> bool {
        self.ndims == 0
    }
}

impl fmt::Display for MemoryDesc {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "undef");
        }
        let dims: Vec<String> = self.dims().iter().map(ToString::to_string).collect();
        write!(f, "{}", dims.join("x"))
    }
}

/// Абстрактный слот памяти, к которому привязан вход или выход примитива.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotKind {
    /// Вход слоя.
    SrcLayer,
    /// Начальное рекуррентное состояние.
    SrcIter,
    /// Веса по входу слоя.
    WeightsLayer,
    /// Рекуррентные веса.
    WeightsIter,
    /// Смещение.
    Bias,
    /// Выход слоя.
    DstLayer,
    /// Конечное рекуррентное состояние.
    DstIter,
    /// Градиент по выходу слоя.
    DiffDstLayer,
    /// Градиент по конечному состоянию.
    DiffDstIter,
    /// Градиент по входу слоя.
    DiffSrcLayer,
    /// Градиент по начальному состоянию.
    DiffSrcIter,
    /// Градиент по весам входа.
    DiffWeightsLayer,
    /// Градиент по рекуррентным весам.
    DiffWeightsIter,
    /// Градиент по смещению.
    DiffBias,
    /// Рабочая память, сохраняемая между прямым и обратным проходом.
    Workspace,
}
