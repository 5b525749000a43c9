//! Tone adjustments (`eq`).

use clipsmith_edit_model::Tune;

use crate::chain::fmt_num;

const NEUTRAL_EPS: f64 = 1e-4;

/// Build the `eq` term for a tune block.
///
/// Only non-neutral parameters are emitted; an all-neutral tune yields `None`
/// so no filter stage is spent on it. Exposure is converted to gamma as
/// `2^exposure`.
pub fn tone_filter(tune: &Tune) -> Option<String> {
    let mut params = Vec::with_capacity(4);

    let brightness = finite_or(tune.brightness, 0.0).clamp(-1.0, 1.0);
    if brightness.abs() > NEUTRAL_EPS {
        params.push(format!("brightness={}", fmt_num(brightness)));
    }

    let contrast = finite_or(tune.contrast, 1.0).clamp(0.0, 3.0);
    if (contrast - 1.0).abs() > NEUTRAL_EPS {
        params.push(format!("contrast={}", fmt_num(contrast)));
    }

    let saturation = finite_or(tune.saturation, 1.0).clamp(0.0, 3.0);
    if (saturation - 1.0).abs() > NEUTRAL_EPS {
        params.push(format!("saturation={}", fmt_num(saturation)));
    }

    let gamma = exposure_to_gamma(tune.exposure);
    if (gamma - 1.0).abs() > NEUTRAL_EPS {
        params.push(format!("gamma={}", fmt_num(gamma)));
    }

    if params.is_empty() {
        None
    } else {
        Some(format!("eq={}", params.join(":")))
    }
}

/// Gamma value for an exposure in stops, within `eq`'s accepted range.
pub fn exposure_to_gamma(exposure: f64) -> f64 {
    2f64.powf(finite_or(exposure, 0.0)).clamp(0.1, 10.0)
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}
