// rnn_pd/src/shape.rs

//! Производные размерности RNN-оператора.
//!
//! Все запросы являются чистыми функциями проверенного [`RnnDesc`] и
//! ничего не проверяют повторно.

use crate::{
    descriptor::RnnDesc,
    types::{Activation, CellKind, Direction, PropKind},
};

impl RnnDesc {
    /// Число шагов по времени (T): `src_layer[0]`.
    pub fn t(&self) -> usize {
        self.src_layer.dim(0)
    }

    /// Размер батча (MB): `src_layer[1]`.
    pub fn mb(&self) -> usize {
        self.src_layer.dim(1)
    }

    /// Число слоев (L): `weights_layer[0]`.
    pub fn l(&self) -> usize {
        self.weights_layer.dim(0)
    }

    /// Число направлений (D): `weights_layer[1]`.
    pub fn d(&self) -> usize {
        self.weights_layer.dim(1)
    }

    /// Каналы входа слоя (SLC): `weights_layer[2]`.
    pub fn slc(&self) -> usize {
        self.weights_layer.dim(2)
    }

    /// Число гейтов (G): `weights_layer[3]`.
    pub fn g(&self) -> usize {
        self.weights_layer.dim(3)
    }

    /// Каналы состояния (DIC): `weights_layer[4]`.
    pub fn dic(&self) -> usize {
        self.weights_layer.dim(4)
    }

    /// Каналы рекуррентного входа (SIC): `weights_iter[2]`.
    pub fn sic(&self) -> usize {
        self.weights_iter.dim(2)
    }

    /// Каналы выхода слоя (DLC): `dst_layer[2]`.
    pub fn dlc(&self) -> usize {
        self.dst_layer.dim(2)
    }

    /// Число состояний на ячейку (S).
    pub const fn s(&self) -> usize {
        self.cell.cell_kind.states_count()
    }

    /// Ширина одного состояния в рабочей памяти: `max(SLC, SIC, DIC)`.
    pub fn wic(&self) -> usize {
        self.slc().max(self.sic()).max(self.dic())
    }

    /// Есть ли смещение.
    pub const fn with_bias(&self) -> bool {
        !self.bias.is_zero()
    }

    /// Есть ли начальное состояние.
    pub const fn with_src_iter(&self) -> bool {
        !self.src_iter.is_zero()
    }

    /// Есть ли конечное состояние.
    pub const fn with_dst_iter(&self) -> bool {
        !self.dst_iter.is_zero()
    }

    /// Режим обучения: `ForwardTraining` или `Backward`.
    pub const fn is_training(&self) -> bool {
        self.prop_kind.is_training()
    }

    /// Ячейка GRU с linear-before-reset.
    ///
    /// Только этот тип ячейки занимает регионы grid_comp и cell_comp.
    pub fn is_lbr(&self) -> bool {
        self.cell.cell_kind == CellKind::GruLinearBeforeReset
    }

    /// Вид распространения.
    pub const fn prop_kind(&self) -> PropKind {
        self.prop_kind
    }

    /// Тип ячейки.
    pub const fn cell_kind(&self) -> CellKind {
        self.cell.cell_kind
    }

    /// Функция активации (только для vanilla-ячейки).
    pub const fn activation_kind(&self) -> Option<Activation> {
        self.cell.activation
    }

    /// Направление.
    pub const fn direction(&self) -> Direction {
        self.direction
    }
}
