mod common;

use common::{desc, SMALL};
use rnn_pd::{CellKind, PdVariant, PortContract, PortFlags, PropKind, SlotKind};

fn flags(with_src_iter: bool, with_bias: bool, with_dst_iter: bool, is_training: bool) -> PortFlags {
    PortFlags {
        with_src_iter,
        with_bias,
        with_dst_iter,
        is_training,
    }
}

#[test]
fn test_forward_input_count_increments_independently() {
    let base = PortContract::new(PdVariant::Forward, flags(false, false, false, false));
    assert_eq!(base.input_count(), 3);
    assert_eq!(
        PortContract::new(PdVariant::Forward, flags(false, true, false, false)).input_count(),
        4
    );
    assert_eq!(
        PortContract::new(PdVariant::Forward, flags(true, false, false, false)).input_count(),
        4
    );
    assert_eq!(
        PortContract::new(PdVariant::Forward, flags(true, true, false, false)).input_count(),
        5
    );
}

#[test]
fn test_forward_inputs_skip_absent_ports() {
    let ports = PortContract::new(PdVariant::Forward, flags(false, true, false, false));
    let inputs: Vec<SlotKind> = ports.inputs().collect();
    assert_eq!(
        inputs,
        vec![SlotKind::SrcLayer, SlotKind::WeightsLayer, SlotKind::WeightsIter, SlotKind::Bias]
    );
    assert_eq!(ports.input_port(3), Some(SlotKind::Bias));
    assert_eq!(ports.input_port(4), None);
}

#[test]
fn test_forward_outputs_and_workspace_index() {
    let inference = PortContract::new(PdVariant::Forward, flags(false, false, true, false));
    assert_eq!(inference.output_count(), 2);
    assert_eq!(inference.workspace_index(), None);
    assert_eq!(inference.output_port(2), None);

    let training = PortContract::new(PdVariant::Forward, flags(false, false, true, true));
    assert_eq!(training.output_count(), 3);
    assert_eq!(training.workspace_index(), Some(2));
    assert_eq!(training.output_port(0), Some(SlotKind::DstLayer));
    assert_eq!(training.output_port(1), Some(SlotKind::DstIter));
    assert_eq!(training.output_port(2), Some(SlotKind::Workspace));

    let training_no_dst_iter = PortContract::new(PdVariant::Forward, flags(false, false, false, true));
    assert_eq!(training_no_dst_iter.workspace_index(), Some(1));
    assert_eq!(training_no_dst_iter.output_port(1), Some(SlotKind::Workspace));
}

#[test]
fn test_backward_counts_match_formulas() {
    for bits in 0..8u8 {
        let (src_iter, bias, dst_iter) = (bits & 1 != 0, bits & 2 != 0, bits & 4 != 0);
        let ports = PortContract::new(PdVariant::Backward, flags(src_iter, bias, dst_iter, true));
        let n = |b: bool| usize::from(b);
        assert_eq!(ports.input_count(), 6 + n(src_iter) + n(bias) + 2 * n(dst_iter));
        assert_eq!(ports.output_count(), 3 + n(src_iter) + n(bias));
        assert_eq!(
            ports.workspace_index(),
            Some(5 + n(src_iter) + n(bias) + 2 * n(dst_iter))
        );
        let last = ports.input_count() - 1;
        assert_eq!(ports.input_port(last), Some(SlotKind::Workspace));
        assert_eq!(ports.input_port(last + 1), None);
    }
}

#[test]
fn test_backward_full_port_tables() {
    let ports = PortContract::new(PdVariant::Backward, flags(true, true, true, true));
    let inputs: Vec<SlotKind> = ports.inputs().collect();
    assert_eq!(
        inputs,
        vec![
            SlotKind::SrcLayer,
            SlotKind::SrcIter,
            SlotKind::WeightsLayer,
            SlotKind::WeightsIter,
            SlotKind::Bias,
            SlotKind::DstLayer,
            SlotKind::DstIter,
            SlotKind::DiffDstLayer,
            SlotKind::DiffDstIter,
            SlotKind::Workspace,
        ]
    );
    assert_eq!(ports.output_count(), 5);
    let outputs: Vec<SlotKind> = ports.outputs().collect();
    assert_eq!(
        outputs,
        vec![
            SlotKind::DiffSrcLayer,
            SlotKind::DiffSrcIter,
            SlotKind::DiffWeightsLayer,
            SlotKind::DiffWeightsIter,
            SlotKind::DiffBias,
        ]
    );
    assert_eq!(ports.output_port(5), None);
}

#[test]
fn test_backward_minimal_ports() {
    let ports = PortContract::new(PdVariant::Backward, flags(false, false, false, true));
    assert_eq!(ports.input_count(), 6);
    assert_eq!(ports.input_port(3), Some(SlotKind::DstLayer));
    assert_eq!(ports.input_port(4), Some(SlotKind::DiffDstLayer));
    assert_eq!(ports.output_count(), 3);
    assert_eq!(ports.output_port(1), Some(SlotKind::DiffWeightsLayer));
}

#[test]
fn test_contract_from_desc() {
    let d = desc(PropKind::Backward, CellKind::Lstm, SMALL, true, true, false);
    let ports = PortContract::for_desc(&d);
    assert_eq!(ports.variant(), PdVariant::Backward);
    assert_eq!(ports.output_count(), 5);
    assert_eq!(ports.input_count(), 8);

    let d = desc(PropKind::ForwardTraining, CellKind::Gru, SMALL, false, false, true);
    let ports = PortContract::for_desc(&d);
    assert_eq!(ports.variant(), PdVariant::Forward);
    assert_eq!(ports.workspace_index(), Some(2));
}
