// rnn_pd/src/primitive.rs

use std::fmt;

use rnn_utils::{LayoutConfig, PlannerAppConfig};
use tracing::{debug, warn};

use crate::{
    descriptor::{RawRnnConfig, RnnDesc},
    error::RnnPdError,
    ports::{PdVariant, PortContract},
    types::SlotKind,
    workspace::{RegionOffsets, WorkspaceLayout, WorkspacePlanner},
};

/// Дескриптор RNN-примитива: описание оператора, вариант (прямой или
/// обратный проход) и планировщик рабочей памяти.
///
/// Варианты делят логику форм и раскладки и отличаются только контрактом
/// портов, который выбирается по [`PdVariant`].
///
/// ```ignore
/// let pd = RnnPrimitiveDesc::new(desc, LayoutConfig::default())?;
/// let ws = pd.get_workspace_size();
/// for i in 0..pd.input_count() {
///     let slot = pd.input_port(i);
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RnnPrimitiveDesc {
    variant: PdVariant,
    desc: RnnDesc,
    layout: WorkspaceLayout,
}

impl RnnPrimitiveDesc {
    /// Создает дескриптор; вариант выбирается по виду распространения.
    ///
    /// # Errors
    /// `RnnPdError::Utils`, если конфигурация раскладки невалидна;
    /// `RnnPdError::InvalidConfig`, если выровненная раскладка не помещается в `usize`.
    pub fn new(desc: RnnDesc, config: LayoutConfig) -> Result<Self, RnnPdError> {
        Self::with_variant(desc, PdVariant::for_prop_kind(desc.prop_kind()), config)
    }

    /// Создает дескриптор заданного варианта.
    ///
    /// # Errors
    /// `RnnPdError::Unsupported`, если вариант не совпадает с видом
    /// распространения описания; `RnnPdError::Utils` для невалидной раскладки;
    /// `RnnPdError::InvalidConfig` при переполнении выровненной раскладки.
    pub fn with_variant(
        desc: RnnDesc,
        variant: PdVariant,
        config: LayoutConfig,
    ) -> Result<Self, RnnPdError> {
        if PdVariant::for_prop_kind(desc.prop_kind()) != variant {
            warn!(
                "Вариант {:?} не совпадает с видом распространения {}.",
                variant,
                desc.prop_kind()
            );
            return Err(RnnPdError::Unsupported(format!(
                "вариант {variant:?} несовместим с prop_kind {}",
                desc.prop_kind()
            )));
        }
        // Раскладка считается один раз, при построении.
        let layout = WorkspacePlanner::new(config)?.plan(&desc)?;
        let pd = Self {
            variant,
            desc,
            layout,
        };
        debug!("Создан дескриптор примитива: {}", pd.info());
        Ok(pd)
    }

    /// Строит дескриптор из "сырого" описания и конфигурации приложения.
    ///
    /// # Errors
    /// Как [`RnnDesc::from_raw_config`] и [`RnnPrimitiveDesc::new`].
    pub fn from_raw_config(
        raw: &RawRnnConfig,
        app_config: &PlannerAppConfig,
    ) -> Result<Self, RnnPdError> {
        let desc = RnnDesc::from_raw_config(raw)?;
        Self::new(desc, app_config.layout)
    }

    /// Вариант примитива.
    pub const fn variant(&self) -> PdVariant {
        self.variant
    }

    /// Описание оператора.
    pub const fn desc(&self) -> &RnnDesc {
        &self.desc
    }

    /// Раскладка рабочей памяти.
    pub const fn layout(&self) -> WorkspaceLayout {
        self.layout
    }

    /// Контракт портов.
    pub const fn ports(&self) -> PortContract {
        PortContract::for_desc(&self.desc)
    }

    /// Смещения пяти регионов рабочей памяти.
    pub const fn compute_region_offsets(&self) -> RegionOffsets {
        self.layout.offsets()
    }

    /// Размер сохраняемой рабочей памяти (в элементах).
    pub const fn get_workspace_size(&self) -> usize {
        self.layout.workspace_size()
    }

    /// Размер временной памяти (в элементах).
    pub const fn get_scratchpad_size(&self) -> usize {
        self.layout.scratchpad_size()
    }

    /// Число входов.
    pub fn input_count(&self) -> usize {
        self.ports().input_count()
    }

    /// Число выходов.
    pub fn output_count(&self) -> usize {
        self.ports().output_count()
    }

    /// Слот входа или `None`.
    pub fn input_port(&self, index: usize) -> Option<SlotKind> {
        self.ports().input_port(index)
    }

    /// Слот выхода или `None`.
    pub fn output_port(&self, index: usize) -> Option<SlotKind> {
        self.ports().output_port(index)
    }

    /// Индекс порта рабочей памяти (см. [`PortContract::workspace_index`]).
    pub fn workspace_index(&self) -> Option<usize> {
        self.ports().workspace_index()
    }

    /// Краткая строка с описанием примитива для логов.
    pub fn info(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for RnnPrimitiveDesc {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let d = &self.desc;
        write!(f, "rnn,{},{}", d.prop_kind(), d.cell_kind())?;
        if let Some(activation) = d.activation_kind() {
            write!(f, ":{activation}")?;
        }
        write!(
            f,
            ",{},l{}t{}mb{}sic{}slc{}dic{}dlc{}",
            d.direction(),
            d.l(),
            d.t(),
            d.mb(),
            d.sic(),
            d.slc(),
            d.dic(),
            d.dlc()
        )
    }
}
