mod common;

use std::io::Write;

use common::{desc, E2E, SMALL};
use rnn_pd::{
    CellKind, LayoutConfig, PdVariant, PropKind, RawRnnConfig, RnnDesc, RnnPdError,
    RnnPrimitiveDesc, SlotKind,
};
use rnn_utils::PlannerAppConfig;
use tempfile::NamedTempFile;

#[test]
fn test_forward_training_primitive() {
    let d = desc(PropKind::ForwardTraining, CellKind::Lstm, E2E, false, false, true);
    let pd = RnnPrimitiveDesc::new(d, LayoutConfig::default()).unwrap();

    assert_eq!(pd.variant(), PdVariant::Forward);
    assert_eq!(pd.input_count(), 3);
    assert_eq!(pd.output_count(), 3);
    assert_eq!(pd.workspace_index(), Some(2));
    assert_eq!(pd.output_port(2), Some(SlotKind::Workspace));
    assert_eq!(pd.input_port(3), None);

    let offsets = pd.compute_region_offsets();
    assert_eq!(offsets.grid_comp, 3_358_720);
    assert_eq!(pd.get_workspace_size(), 3_358_720);
    assert_eq!(pd.get_scratchpad_size(), 0);
    assert_eq!(pd.desc(), &d);
}

#[test]
fn test_backward_primitive_ports() {
    let d = desc(PropKind::Backward, CellKind::Gru, SMALL, true, true, true);
    let pd = RnnPrimitiveDesc::new(d, LayoutConfig::default()).unwrap();
    assert_eq!(pd.variant(), PdVariant::Backward);
    assert_eq!(pd.input_count(), 10);
    assert_eq!(pd.output_count(), 5);
    assert_eq!(pd.workspace_index(), Some(9));
    assert_eq!(pd.input_port(9), Some(SlotKind::Workspace));
    assert_eq!(pd.output_port(4), Some(SlotKind::DiffBias));
}

#[test]
fn test_variant_must_match_prop_kind() {
    let d = desc(PropKind::ForwardInference, CellKind::Gru, SMALL, false, false, false);
    let result = RnnPrimitiveDesc::with_variant(d, PdVariant::Backward, LayoutConfig::default());
    assert!(matches!(result, Err(RnnPdError::Unsupported(_))));

    let ok = RnnPrimitiveDesc::with_variant(d, PdVariant::Forward, LayoutConfig::default());
    assert!(ok.is_ok());
}

#[test]
fn test_invalid_layout_config_rejected() {
    let d = desc(PropKind::ForwardInference, CellKind::Gru, SMALL, false, false, false);
    let result = RnnPrimitiveDesc::new(d, LayoutConfig { page_size: 1000 });
    assert!(matches!(result, Err(RnnPdError::Utils(_))));
}

#[test]
fn test_inference_scratchpad_spans_all_regions() {
    let d = desc(PropKind::ForwardInference, CellKind::GruLinearBeforeReset, SMALL, false, false, false);
    let pd = RnnPrimitiveDesc::new(d, LayoutConfig { page_size: 64 }).unwrap();
    let layout = pd.layout();
    assert_eq!(pd.get_scratchpad_size(), layout.offsets().cell_comp + 10);
    assert_eq!(pd.get_workspace_size(), layout.offsets().grid_comp);
    assert_eq!(pd.output_count(), 1);
    assert_eq!(pd.workspace_index(), None);
}

#[test]
fn test_info_string() {
    let d = desc(PropKind::ForwardTraining, CellKind::Lstm, E2E, false, false, false);
    let pd = RnnPrimitiveDesc::new(d, LayoutConfig::default()).unwrap();
    assert_eq!(
        pd.info(),
        "rnn,forward_training,vanilla_lstm,unidirectional_left2right,l2t10mb32sic256slc512dic256dlc256"
    );

    let v = desc(PropKind::ForwardInference, CellKind::Vanilla, SMALL, false, false, false);
    let pd = RnnPrimitiveDesc::new(v, LayoutConfig::default()).unwrap();
    assert!(pd.to_string().starts_with("rnn,forward_inference,vanilla_rnn:tanh,"));
}

#[test]
fn test_from_raw_config_with_app_config() {
    let mut desc_file = NamedTempFile::new().unwrap();
    writeln!(
        desc_file,
        r#"
        prop_kind = "backward"
        cell_kind = "gru_linear_before_reset"
        direction = "unidirectional_left2right"
        src_layer = [3, 2, 7]
        src_iter = [1, 1, 1, 2, 5]
        weights_layer = [1, 1, 7, 3, 5]
        weights_iter = [1, 1, 5, 3, 5]
        bias = [1, 1, 4, 5]
        dst_layer = [3, 2, 5]
        "#
    )
    .unwrap();
    let d = RnnDesc::load_from_toml(desc_file.path()).unwrap();

    let app_config = PlannerAppConfig::from_toml_str("[layout]\npage_size = 64\n").unwrap();
    let pd = RnnPrimitiveDesc::new(d, app_config.layout).unwrap();
    assert_eq!(pd.compute_region_offsets().cell_comp, 576);
    assert_eq!(pd.input_count(), 8);
    assert_eq!(pd.output_count(), 5);

    let raw = RawRnnConfig {
        prop_kind: Some(PropKind::Backward),
        ..RawRnnConfig::default()
    };
    assert!(RnnPrimitiveDesc::from_raw_config(&raw, &app_config).is_err());
}

#[test]
fn test_load_missing_descriptor_file() {
    let result = RnnDesc::load_from_toml(std::path::Path::new("/non/existent/rnn.toml"));
    assert!(matches!(result, Err(RnnPdError::Utils(_))));
}

#[test]
fn test_primitive_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RnnPrimitiveDesc>();
    assert_send_sync::<RnnDesc>();
}
