// rnn_pd/src/validation.rs

use tracing::{debug, warn};

use crate::{
    descriptor::{RawRnnConfig, RnnDesc},
    error::RnnPdError,
    types::{CellKind, MemoryDesc},
};

/// Валидация описаний RNN-оператора.
///
/// Отделяет проверки от построения: слой запросов ([`crate::shape`],
/// [`crate::workspace`], [`crate::ports`]) предполагает уже проверенный
/// дескриптор и повторно ничего не проверяет.
pub struct RnnDescValidator;

impl RnnDescValidator {
    /// Проверяет наличие обязательных полей "сырого" описания.
    ///
    /// # Errors
    /// `RnnPdError::InvalidConfig` со списком всех отсутствующих полей.
    pub fn validate_raw_config(raw: &RawRnnConfig) -> Result<(), RnnPdError> {
        debug!("Валидация 'сырого' описания RNN.");
        let mut errors: Vec<String> = Vec::new();

        macro_rules! check_field {
            ($field:expr, $name:expr) => {
                if $field.is_none() {
                    errors.push(format!("Отсутствует обязательное поле: '{}'", $name));
                }
            };
        }

        check_field!(raw.prop_kind, "prop_kind");
        check_field!(raw.cell_kind, "cell_kind");
        check_field!(raw.direction, "direction");
        check_field!(raw.src_layer, "src_layer");
        check_field!(raw.weights_layer, "weights_layer");
        check_field!(raw.weights_iter, "weights_iter");
        check_field!(raw.dst_layer, "dst_layer");

        fail_on_errors(errors, "'сырого' описания")?;
        debug!("'Сырое' описание RNN успешно валидировано.");
        Ok(())
    }

    /// Проверяет согласованность форм всех тензоров дескриптора.
    ///
    /// # Errors
    /// `RnnPdError::Unsupported` для vanilla-ячейки без функции активации;
    /// `RnnPdError::InvalidConfig` со всеми найденными несогласованностями,
    /// в том числе если размер рабочей памяти не помещается в `usize`.
    pub fn validate_desc(desc: &RnnDesc) -> Result<(), RnnPdError> {
        debug!("Валидация описания RNN.");
        let cell_kind = desc.cell.cell_kind;
        if cell_kind == CellKind::Vanilla && desc.cell.activation.is_none() {
            warn!("Vanilla-ячейка без функции активации.");
            return Err(RnnPdError::Unsupported(
                "vanilla-ячейка требует функцию активации".to_string(),
            ));
        }

        let mut errors: Vec<String> = Vec::new();

        let required = [
            ("src_layer", &desc.src_layer, 3),
            ("weights_layer", &desc.weights_layer, 5),
            ("weights_iter", &desc.weights_iter, 5),
            ("dst_layer", &desc.dst_layer, 3),
        ];
        let optional = [
            ("src_iter", &desc.src_iter, 5),
            ("bias", &desc.bias, 4),
            ("dst_iter", &desc.dst_iter, 5),
        ];
        for (name, md, ndims) in required {
            if md.is_zero() {
                errors.push(format!("Отсутствует обязательный тензор '{name}'"));
            } else {
                check_shape(&mut errors, name, md, ndims);
            }
        }
        for (name, md, ndims) in optional {
            if !md.is_zero() {
                check_shape(&mut errors, name, md, ndims);
            }
        }

        // Согласованность между тензорами проверяем, только если сами формы корректны:
        // иначе сообщения о расхождениях будут шумом.
        if errors.is_empty() {
            check_consistency(&mut errors, desc);
        }
        if errors.is_empty() {
            check_workspace_extent(&mut errors, desc);
        }

        fail_on_errors(errors, "описания")?;
        debug!("Описание RNN успешно валидировано.");
        Ok(())
    }
}

fn check_shape(errors: &mut Vec<String>, name: &str, md: &MemoryDesc, ndims: usize) {
    if md.ndims() != ndims {
        errors.push(format!(
            "'{name}' должен иметь {ndims} размерностей, получено {}",
            md.ndims()
        ));
    } else if md.dims().contains(&0) {
        errors.push(format!("'{name}' содержит нулевую размерность: {md}"));
    }
}

fn check_consistency(errors: &mut Vec<String>, desc: &RnnDesc) {
    let (t, mb, slc) = (
        desc.src_layer.dim(0),
        desc.src_layer.dim(1),
        desc.src_layer.dim(2),
    );
    let wl = &desc.weights_layer;
    let (l, d, g, dic) = (wl.dim(0), wl.dim(1), wl.dim(3), wl.dim(4));
    let sic = desc.weights_iter.dim(2);
    let cell_kind = desc.cell.cell_kind;
    let s = cell_kind.states_count();

    let mut check = |what: String, actual: usize, expected: usize| {
        if actual != expected {
            errors.push(format!("{what}: ожидалось {expected}, получено {actual}"));
        }
    };

    check("weights_layer[2] (SLC) против src_layer[2]".into(), wl.dim(2), slc);
    check(
        format!("число направлений weights_layer[1] для {}", desc.direction),
        d,
        desc.direction.directions_count(),
    );
    check(format!("число гейтов weights_layer[3] для {cell_kind}"), g, cell_kind.gates_count());

    let wi = &desc.weights_iter;
    check("weights_iter[0] (L)".into(), wi.dim(0), l);
    check("weights_iter[1] (D)".into(), wi.dim(1), d);
    check("weights_iter[3] (G)".into(), wi.dim(3), g);
    check("weights_iter[4] (DIC)".into(), wi.dim(4), dic);

    let dl = &desc.dst_layer;
    check("dst_layer[0] (T)".into(), dl.dim(0), t);
    check("dst_layer[1] (MB)".into(), dl.dim(1), mb);
    check(
        format!("dst_layer[2] (DLC) для {}", desc.direction),
        dl.dim(2),
        desc.direction.dst_layer_channels(dic),
    );

    if !desc.bias.is_zero() {
        let b = &desc.bias;
        check("bias[0] (L)".into(), b.dim(0), l);
        check("bias[1] (D)".into(), b.dim(1), d);
        check(
            format!("число гейтов bias[2] для {cell_kind}"),
            b.dim(2),
            cell_kind.bias_gates_count(),
        );
        check("bias[3] (DIC)".into(), b.dim(3), dic);
    }

    for (name, md, channels) in [("src_iter", &desc.src_iter, sic), ("dst_iter", &desc.dst_iter, dic)] {
        if md.is_zero() {
            continue;
        }
        check(format!("{name}[0] (L)"), md.dim(0), l);
        check(format!("{name}[1] (D)"), md.dim(1), d);
        check(format!("{name}[2] (S) для {cell_kind}"), md.dim(2), s);
        check(format!("{name}[3] (MB)"), md.dim(3), mb);
        check(format!("{name}[4] (каналы)"), md.dim(4), channels);
    }
}

// Регионы и их сумма без выравнивания должны помещаться в usize;
// выравнивание по странице проверяет планировщик.
fn check_workspace_extent(errors: &mut Vec<String>, desc: &RnnDesc) {
    let total = desc.checked_region_sizes().and_then(|sizes| {
        [sizes.states, sizes.diff_states, sizes.grid_comp, sizes.cell_comp]
            .into_iter()
            .try_fold(sizes.gates, usize::checked_add)
    });
    if total.is_none() {
        errors.push(format!(
            "размер рабочей памяти для {cell} (L={l}, D={d}, T={t}, MB={mb}, WIC={wic}) не помещается в usize",
            cell = desc.cell_kind(),
            l = desc.l(),
            d = desc.d(),
            t = desc.t(),
            mb = desc.mb(),
            wic = desc.wic(),
        ));
    }
}

fn fail_on_errors(errors: Vec<String>, what: &str) -> Result<(), RnnPdError> {
    if errors.is_empty() {
        return Ok(());
    }
    let message = errors.join("; ");
    warn!("Валидация {} RNN не пройдена: {}", what, message);
    Err(RnnPdError::InvalidConfig { message })
}
