// rnn_pd/src/ports.rs

//! Контракт портов: какие входы и выходы есть у примитива и к каким
//! слотам памяти они привязаны.
//!
//! Таблицы прямого и обратного прохода лежат рядом. Опциональные порты
//! включаются в список, только если выполнен их предикат, поэтому индексы
//! последующих портов сдвигаются. Запрос индекса за пределами числа портов
//! возвращает `None`, чтобы вызывающая сторона могла дешево проверять
//! опциональные порты.

use crate::{
    descriptor::RnnDesc,
    types::{PropKind, SlotKind},
};

/// Вариант дескриптора примитива.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PdVariant {
    /// Прямой проход (инференс или обучение).
    Forward,
    /// Обратный проход.
    Backward,
}

impl PdVariant {
    /// Вариант, соответствующий виду распространения.
    pub const fn for_prop_kind(prop_kind: PropKind) -> Self {
        match prop_kind {
            PropKind::ForwardInference | PropKind::ForwardTraining => Self::Forward,
            PropKind::Backward => Self::Backward,
        }
    }
}

/// Условие присутствия порта.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Presence {
    Always,
    SrcIter,
    Bias,
    DstIter,
    Training,
}

const FWD_INPUTS: [(SlotKind, Presence); 5] = [
    (SlotKind::SrcLayer, Presence::Always),
    (SlotKind::SrcIter, Presence::SrcIter),
    (SlotKind::WeightsLayer, Presence::Always),
    (SlotKind::WeightsIter, Presence::Always),
    (SlotKind::Bias, Presence::Bias),
];

const FWD_OUTPUTS: [(SlotKind, Presence); 3] = [
    (SlotKind::DstLayer, Presence::Always),
    (SlotKind::DstIter, Presence::DstIter),
    (SlotKind::Workspace, Presence::Training),
];

const BWD_INPUTS: [(SlotKind, Presence); 10] = [
    (SlotKind::SrcLayer, Presence::Always),
    (SlotKind::SrcIter, Presence::SrcIter),
    (SlotKind::WeightsLayer, Presence::Always),
    (SlotKind::WeightsIter, Presence::Always),
    (SlotKind::Bias, Presence::Bias),
    (SlotKind::DstLayer, Presence::Always),
    (SlotKind::DstIter, Presence::DstIter),
    (SlotKind::DiffDstLayer, Presence::Always),
    (SlotKind::DiffDstIter, Presence::DstIter),
    (SlotKind::Workspace, Presence::Always),
];

const BWD_OUTPUTS: [(SlotKind, Presence); 5] = [
    (SlotKind::DiffSrcLayer, Presence::Always),
    (SlotKind::DiffSrcIter, Presence::SrcIter),
    (SlotKind::DiffWeightsLayer, Presence::Always),
    (SlotKind::DiffWeightsIter, Presence::Always),
    (SlotKind::DiffBias, Presence::Bias),
];

/// Предикаты, от которых зависит набор портов.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PortFlags {
    /// Есть начальное состояние.
    pub with_src_iter: bool,
    /// Есть смещение.
    pub with_bias: bool,
    /// Есть конечное состояние.
    pub with_dst_iter: bool,
    /// Режим обучения.
    pub is_training: bool,
}

impl PortFlags {
    /// Предикаты дескриптора.
    pub const fn from_desc(desc: &RnnDesc) -> Self {
        Self {
            with_src_iter: desc.with_src_iter(),
            with_bias: desc.with_bias(),
            with_dst_iter: desc.with_dst_iter(),
            is_training: desc.is_training(),
        }
    }

    const fn holds(self, presence: Presence) -> bool {
        match presence {
            Presence::Always => true,
            Presence::SrcIter => self.with_src_iter,
            Presence::Bias => self.with_bias,
            Presence::DstIter => self.with_dst_iter,
            Presence::Training => self.is_training,
        }
    }
}

/// Контракт портов одного варианта примитива.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortContract {
    variant: PdVariant,
    flags: PortFlags,
}

impl PortContract {
    /// Контракт для заданного варианта и предикатов.
    pub const fn new(variant: PdVariant, flags: PortFlags) -> Self {
        Self { variant, flags }
    }

    /// Контракт для дескриптора; вариант выбирается по виду распространения.
    pub const fn for_desc(desc: &RnnDesc) -> Self {
        Self::new(
            PdVariant::for_prop_kind(desc.prop_kind()),
            PortFlags::from_desc(desc),
        )
    }

    /// Вариант примитива.
    pub const fn variant(&self) -> PdVariant {
        self.variant
    }

    /// Активные входы по порядку.
    pub fn inputs(&self) -> impl Iterator<Item = SlotKind> + '_ {
        let table: &'static [(SlotKind, Presence)] = match self.variant {
            PdVariant::Forward => &FWD_INPUTS,
            PdVariant::Backward => &BWD_INPUTS,
        };
        self.active(table)
    }

    /// Активные выходы по порядку.
    pub fn outputs(&self) -> impl Iterator<Item = SlotKind> + '_ {
        let table: &'static [(SlotKind, Presence)] = match self.variant {
            PdVariant::Forward => &FWD_OUTPUTS,
            PdVariant::Backward => &BWD_OUTPUTS,
        };
        self.active(table)
    }

    fn active(
        &self,
        table: &'static [(SlotKind, Presence)],
    ) -> impl Iterator<Item = SlotKind> + '_ {
        table
            .iter()
            .filter(|(_, presence)| self.flags.holds(*presence))
            .map(|(slot, _)| *slot)
    }

    /// Число входов.
    ///
    /// Прямой проход: `3 + with_bias + with_src_iter`.
    /// Обратный: `6 + with_src_iter + with_bias + 2 * with_dst_iter`.
    pub fn input_count(&self) -> usize {
        self.inputs().count()
    }

    /// Число выходов.
    ///
    /// Прямой проход: `1 + with_dst_iter + is_training`.
    /// Обратный: `3 + with_src_iter + with_bias`.
    pub fn output_count(&self) -> usize {
        self.outputs().count()
    }

    /// Слот входа с индексом `index`, или `None` за пределами [`Self::input_count`].
    pub fn input_port(&self, index: usize) -> Option<SlotKind> {
        self.inputs().nth(index)
    }

    /// Слот выхода с индексом `index`, или `None` за пределами [`Self::output_count`].
    pub fn output_port(&self, index: usize) -> Option<SlotKind> {
        self.outputs().nth(index)
    }

    /// Индекс порта рабочей памяти: среди выходов прямого прохода
    /// (`1 + with_dst_iter`, только при обучении) или среди входов
    /// обратного (`5 + with_src_iter + with_bias + 2 * with_dst_iter`).
    pub fn workspace_index(&self) -> Option<usize> {
        match self.variant {
            PdVariant::Forward => self.outputs().position(|s| s == SlotKind::Workspace),
            PdVariant::Backward => self.inputs().position(|s| s == SlotKind::Workspace),
        }
    }
}
