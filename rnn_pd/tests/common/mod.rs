//! Общие помощники для интеграционных тестов `rnn_pd`.
#![allow(dead_code)]

use rnn_pd::{
    Activation, CellKind, Direction, MemoryDesc, PropKind, RnnDesc, RnnDescBuilder,
};

/// Логические размеры оператора, из которых собираются канонические дескрипторы.
#[derive(Debug, Clone, Copy)]
pub struct Dims {
    pub t: usize,
    pub mb: usize,
    pub l: usize,
    pub slc: usize,
    pub sic: usize,
    pub dic: usize,
}

/// Размеры из сквозного сценария: T=10, MB=32, L=2, SLC=512, SIC=DIC=256.
pub const E2E: Dims = Dims {
    t: 10,
    mb: 32,
    l: 2,
    slc: 512,
    sic: 256,
    dic: 256,
};

/// Маленькие размеры с невыровненными регионами.
pub const SMALL: Dims = Dims {
    t: 3,
    mb: 2,
    l: 1,
    slc: 7,
    sic: 5,
    dic: 5,
};

pub fn md(dims: &[usize]) -> MemoryDesc {
    MemoryDesc::new(dims).unwrap()
}

/// Построитель с обязательными тензорами; опциональные порты отсутствуют.
pub fn builder(
    prop_kind: PropKind,
    cell_kind: CellKind,
    direction: Direction,
    dims: Dims,
) -> RnnDescBuilder {
    let d = direction.directions_count();
    let g = cell_kind.gates_count();
    let mut b = RnnDescBuilder::new(prop_kind, cell_kind, direction)
        .src_layer(md(&[dims.t, dims.mb, dims.slc]))
        .weights_layer(md(&[dims.l, d, dims.slc, g, dims.dic]))
        .weights_iter(md(&[dims.l, d, dims.sic, g, dims.dic]))
        .dst_layer(md(&[dims.t, dims.mb, direction.dst_layer_channels(dims.dic)]));
    if cell_kind == CellKind::Vanilla {
        b = b.activation(Activation::Tanh);
    }
    b
}

pub fn bias_md(cell_kind: CellKind, direction: Direction, dims: Dims) -> MemoryDesc {
    md(&[
        dims.l,
        direction.directions_count(),
        cell_kind.bias_gates_count(),
        dims.dic,
    ])
}

pub fn src_iter_md(cell_kind: CellKind, direction: Direction, dims: Dims) -> MemoryDesc {
    md(&[
        dims.l,
        direction.directions_count(),
        cell_kind.states_count(),
        dims.mb,
        dims.sic,
    ])
}

pub fn dst_iter_md(cell_kind: CellKind, direction: Direction, dims: Dims) -> MemoryDesc {
    md(&[
        dims.l,
        direction.directions_count(),
        cell_kind.states_count(),
        dims.mb,
        dims.dic,
    ])
}

/// Однонаправленный дескриптор с выбранными опциональными портами.
pub fn desc(
    prop_kind: PropKind,
    cell_kind: CellKind,
    dims: Dims,
    with_bias: bool,
    with_src_iter: bool,
    with_dst_iter: bool,
) -> RnnDesc {
    let dir = Direction::UnidirectionalLeft2Right;
    let mut b = builder(prop_kind, cell_kind, dir, dims);
    if with_bias {
        b = b.bias(bias_md(cell_kind, dir, dims));
    }
    if with_src_iter {
        b = b.src_iter(src_iter_md(cell_kind, dir, dims));
    }
    if with_dst_iter {
        b = b.dst_iter(dst_iter_md(cell_kind, dir, dims));
    }
    b.build().unwrap()
}

pub const ALL_PROP_KINDS: [PropKind; 3] = [
    PropKind::ForwardInference,
    PropKind::ForwardTraining,
    PropKind::Backward,
];

pub const ALL_CELL_KINDS: [CellKind; 4] = [
    CellKind::Vanilla,
    CellKind::Lstm,
    CellKind::Gru,
    CellKind::GruLinearBeforeReset,
];
