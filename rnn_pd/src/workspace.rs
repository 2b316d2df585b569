// rnn_pd/src/workspace.rs

//! Планирование рабочей памяти RNN-примитива.
//!
//! Рабочая память делится на пять непересекающихся регионов в фиксированном
//! порядке: gates, states, diff_states, grid_comp, cell_comp. Смещение
//! каждого региона выровнено на размер страницы относительно базового адреса,
//! который аллокатор уже выровнял. Ядра адресуют подбуферы по этим смещениям,
//! поэтому порядок и выравнивание менять нельзя.
//!
//! Все размеры и смещения выражены в элементах; перевод в байты делает
//! вызывающая сторона.

use rnn_utils::LayoutConfig;
use tracing::{debug, warn};

use crate::{descriptor::RnnDesc, error::RnnPdError, types::PropKind};

/// Регион рабочей памяти.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionKind {
    /// Значения гейтов всех ячеек.
    Gates,
    /// Состояния всех ячеек, включая граничные.
    States,
    /// Градиенты состояний (на одно состояние больше, чем в `States`).
    DiffStates,
    /// Память LBR-GRU для обучения: по одному блоку на ячейку сетки.
    GridComp,
    /// Временная память одной LBR-ячейки.
    CellComp,
}

impl RegionKind {
    /// Все регионы в порядке раскладки.
    pub const ALL: [Self; 5] = [
        Self::Gates,
        Self::States,
        Self::DiffStates,
        Self::GridComp,
        Self::CellComp,
    ];
}

/// Смещения пяти регионов.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegionOffsets {
    /// Смещение gates (всегда 0).
    pub gates: usize,
    /// Смещение states.
    pub states: usize,
    /// Смещение diff_states.
    pub diff_states: usize,
    /// Смещение grid_comp.
    pub grid_comp: usize,
    /// Смещение cell_comp.
    pub cell_comp: usize,
}

impl RegionOffsets {
    /// Смещение заданного региона.
    pub const fn get(&self, kind: RegionKind) -> usize {
        match kind {
            RegionKind::Gates => self.gates,
            RegionKind::States => self.states,
            RegionKind::DiffStates => self.diff_states,
            RegionKind::GridComp => self.grid_comp,
            RegionKind::CellComp => self.cell_comp,
        }
    }
}

/// Размеры пяти регионов.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegionSizes {
    /// `L * D * T * MB * G * DIC`.
    pub gates: usize,
    /// `(L+1) * D * (T+1) * S * MB * WIC`.
    pub states: usize,
    /// `(L+1) * D * (T+1) * (S+1) * MB * WIC`.
    pub diff_states: usize,
    /// `is_lbr * is_training * L * D * T * MB * DIC`.
    pub grid_comp: usize,
    /// `is_lbr * MB * DIC`.
    pub cell_comp: usize,
}

impl RegionSizes {
    /// Размер заданного региона.
    pub const fn get(&self, kind: RegionKind) -> usize {
        match kind {
            RegionKind::Gates => self.gates,
            RegionKind::States => self.states,
            RegionKind::DiffStates => self.diff_states,
            RegionKind::GridComp => self.grid_comp,
            RegionKind::CellComp => self.cell_comp,
        }
    }
}

/// Один регион раскладки.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    /// Какой регион.
    pub kind: RegionKind,
    /// Смещение от начала рабочей памяти.
    pub offset: usize,
    /// Размер.
    pub size: usize,
}

impl Region {
    /// Первый элемент после региона.
    pub const fn end(&self) -> usize {
        self.offset + self.size
    }
}

/// Готовая раскладка рабочей памяти для одного дескриптора.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkspaceLayout {
    prop_kind: PropKind,
    offsets: RegionOffsets,
    sizes: RegionSizes,
}

impl WorkspaceLayout {
    /// Смещения регионов.
    pub const fn offsets(&self) -> RegionOffsets {
        self.offsets
    }

    /// Размеры регионов.
    pub const fn sizes(&self) -> RegionSizes {
        self.sizes
    }

    /// Регион по его виду.
    pub const fn region(&self, kind: RegionKind) -> Region {
        Region {
            kind,
            offset: self.offsets.get(kind),
            size: self.sizes.get(kind),
        }
    }

    /// Все регионы в порядке раскладки.
    pub fn regions(&self) -> [Region; 5] {
        RegionKind::ALL.map(|kind| self.region(kind))
    }

    /// Размер сохраняемой рабочей памяти (нужен при обучении):
    /// конец региона grid_comp.
    ///
    /// cell_comp сюда не входит: это временная память ячейки, которую
    /// последующие проходы не читают.
    pub const fn workspace_size(&self) -> usize {
        self.offsets.grid_comp + self.sizes.grid_comp
    }

    /// Размер временной памяти (scratchpad).
    ///
    /// Для `ForwardInference` scratchpad заменяет всю рабочую память, поэтому
    /// это конец региона cell_comp. В остальных режимах регионы берутся из
    /// сохраняемой рабочей памяти, и нужен только cell_comp.
    pub const fn scratchpad_size(&self) -> usize {
        match self.prop_kind {
            PropKind::ForwardInference => self.offsets.cell_comp + self.sizes.cell_comp,
            PropKind::ForwardTraining | PropKind::Backward => self.sizes.cell_comp,
        }
    }
}

/// Планировщик раскладки: вычисляет размеры регионов и их выровненные смещения.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WorkspacePlanner {
    config: LayoutConfig,
}

impl WorkspacePlanner {
    /// Создает планировщик с заданной конфигурацией раскладки.
    ///
    /// # Errors
    /// `RnnPdError::Utils`, если размер страницы не является степенью двойки.
    pub fn new(config: LayoutConfig) -> Result<Self, RnnPdError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Размер страницы, на который выравниваются смещения.
    pub const fn page_size(&self) -> usize {
        self.config.page_size
    }

    /// Размеры всех регионов для дескриптора.
    pub fn region_sizes(desc: &RnnDesc) -> RegionSizes {
        RegionSizes {
            gates: desc.ws_gates_size(),
            states: desc.ws_states_size(),
            diff_states: desc.ws_diff_states_size(),
            grid_comp: desc.ws_grid_comp_size(),
            cell_comp: desc.ws_cell_comp_size(),
        }
    }

    /// Выровненные смещения регионов для заданных размеров.
    ///
    /// Смещение первого региона равно 0; каждое следующее равно концу
    /// предыдущего, округленному вверх до размера страницы.
    ///
    /// # Errors
    /// `RnnPdError::InvalidConfig`, если конец какого-либо региона после
    /// выравнивания не помещается в `usize`.
    pub fn offsets_for(&self, sizes: &RegionSizes) -> Result<RegionOffsets, RnnPdError> {
        let page = self.config.page_size;
        aligned_offsets(sizes, page).ok_or_else(|| {
            warn!(page_size = page, ?sizes, "Раскладка рабочей памяти переполняет usize.");
            RnnPdError::InvalidConfig {
                message: format!(
                    "раскладка рабочей памяти с page_size={page} не помещается в usize: {sizes:?}"
                ),
            }
        })
    }

    /// Полная раскладка рабочей памяти для дескриптора.
    ///
    /// # Errors
    /// Как [`Self::offsets_for`].
    pub fn plan(&self, desc: &RnnDesc) -> Result<WorkspaceLayout, RnnPdError> {
        let sizes = Self::region_sizes(desc);
        let offsets = self.offsets_for(&sizes)?;
        debug!(
            page_size = self.config.page_size,
            ?sizes,
            ?offsets,
            "Раскладка рабочей памяти RNN вычислена."
        );
        Ok(WorkspaceLayout {
            prop_kind: desc.prop_kind(),
            offsets,
            sizes,
        })
    }
}

fn aligned_offsets(sizes: &RegionSizes, page: usize) -> Option<RegionOffsets> {
    let next = |offset: usize, size: usize| {
        offset
            .checked_add(size)
            .and_then(|end| checked_rnd_up(end, page))
    };
    let gates = 0;
    let states = next(gates, sizes.gates)?;
    let diff_states = next(states, sizes.states)?;
    let grid_comp = next(diff_states, sizes.diff_states)?;
    let cell_comp = next(grid_comp, sizes.grid_comp)?;
    // Конец последнего региона тоже должен быть представим.
    cell_comp.checked_add(sizes.cell_comp)?;
    Some(RegionOffsets {
        gates,
        states,
        diff_states,
        grid_comp,
        cell_comp,
    })
}

/// Округление `value` вверх до кратного `align`.
pub const fn rnd_up(value: usize, align: usize) -> usize {
    value.div_ceil(align) * align
}

/// Как [`rnd_up`], но `None` при переполнении.
pub const fn checked_rnd_up(value: usize, align: usize) -> Option<usize> {
    value.div_ceil(align).checked_mul(align)
}

// Формулы размеров регионов. Нулевая размерность дает нулевой регион.
// Каждая формула записана один раз, в проверяемом виде: валидатор отвергает
// дескрипторы, для которых она переполняется, поэтому публичные методы
// ниже до `usize::MAX` не доходят.
impl RnnDesc {
    pub(crate) fn checked_gates_size(&self) -> Option<usize> {
        checked_product(&[self.l(), self.d(), self.t(), self.mb(), self.g(), self.dic()])
    }

    pub(crate) fn checked_states_size(&self, states: usize) -> Option<usize> {
        checked_product(&[
            self.l().checked_add(1)?,
            self.d(),
            self.t().checked_add(1)?,
            states,
            self.mb(),
            self.wic(),
        ])
    }

    pub(crate) fn checked_grid_comp_size(&self) -> Option<usize> {
        checked_product(&[
            usize::from(self.is_lbr()),
            usize::from(self.is_training()),
            self.l(),
            self.d(),
            self.t(),
            self.mb(),
            self.dic(),
        ])
    }

    pub(crate) fn checked_cell_comp_size(&self) -> Option<usize> {
        checked_product(&[usize::from(self.is_lbr()), self.mb(), self.dic()])
    }

    /// Размеры всех регионов или `None`, если хотя бы один не помещается в `usize`.
    pub(crate) fn checked_region_sizes(&self) -> Option<RegionSizes> {
        Some(RegionSizes {
            gates: self.checked_gates_size()?,
            states: self.checked_states_size(self.s())?,
            diff_states: self.checked_states_size(self.s().checked_add(1)?)?,
            grid_comp: self.checked_grid_comp_size()?,
            cell_comp: self.checked_cell_comp_size()?,
        })
    }

    /// Размер региона gates.
    pub fn ws_gates_size(&self) -> usize {
        self.checked_gates_size().unwrap_or(usize::MAX)
    }

    /// Размер региона states.
    pub fn ws_states_size(&self) -> usize {
        self.checked_states_size(self.s()).unwrap_or(usize::MAX)
    }

    /// Размер региона diff_states.
    pub fn ws_diff_states_size(&self) -> usize {
        self.s()
            .checked_add(1)
            .and_then(|states| self.checked_states_size(states))
            .unwrap_or(usize::MAX)
    }

    /// Размер региона grid_comp; ненулевой только для LBR-GRU при обучении.
    pub fn ws_grid_comp_size(&self) -> usize {
        self.checked_grid_comp_size().unwrap_or(usize::MAX)
    }

    /// Размер региона cell_comp; ненулевой только для LBR-GRU, в любом режиме.
    pub fn ws_cell_comp_size(&self) -> usize {
        self.checked_cell_comp_size().unwrap_or(usize::MAX)
    }

    /// Доля grid_comp, принадлежащая одной ячейке сетки (слой, направление, шаг).
    pub fn ws_per_cell(&self) -> usize {
        checked_product(&[
            usize::from(self.is_lbr()),
            usize::from(self.is_training()),
            self.mb(),
            self.dic(),
        ])
        .unwrap_or(usize::MAX)
    }
}

fn checked_product(factors: &[usize]) -> Option<usize> {
    factors
        .iter()
        .try_fold(1_usize, |acc, &factor| acc.checked_mul(factor))
}
