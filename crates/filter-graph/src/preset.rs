//! Style presets as native filter terms.

use clipsmith_edit_model::{PresetParams, StyleFilter};

use crate::chain::{fmt_num, FilterChain};

const EPS: f64 = 1e-4;

/// Sepia color matrix, rows are output R, G, B.
const SEPIA: [[f64; 3]; 3] = [
    [0.393, 0.769, 0.189],
    [0.349, 0.686, 0.168],
    [0.272, 0.534, 0.131],
];

/// Chain for a preset or explicit parameters; empty for `original`.
pub fn style_filters(filter: &StyleFilter) -> FilterChain {
    preset_filters(&filter.params())
}

pub fn preset_filters(params: &PresetParams) -> FilterChain {
    let mut chain = FilterChain::new();
    if params.is_neutral() {
        return chain;
    }

    let grayscale = clamp_unit(params.grayscale);
    if grayscale > EPS {
        chain.push(format!("hue=s={}", fmt_num(1.0 - grayscale)));
    }

    let sepia = clamp_unit(params.sepia);
    if sepia > EPS {
        chain.push(sepia_mixer(sepia));
    }

    let mut eq = Vec::new();
    if (params.contrast - 1.0).abs() > EPS && params.contrast.is_finite() {
        eq.push(format!("contrast={}", fmt_num(params.contrast.clamp(0.0, 3.0))));
    }
    if (params.brightness - 1.0).abs() > EPS && params.brightness.is_finite() {
        let additive = (params.brightness - 1.0).clamp(-1.0, 1.0);
        eq.push(format!("brightness={}", fmt_num(additive)));
    }
    if (params.saturate - 1.0).abs() > EPS && params.saturate.is_finite() {
        eq.push(format!("saturation={}", fmt_num(params.saturate.clamp(0.0, 3.0))));
    }
    if !eq.is_empty() {
        chain.push(format!("eq={}", eq.join(":")));
    }

    if params.hue_rotate.abs() > EPS && params.hue_rotate.is_finite() {
        chain.push(format!("hue=h={}", fmt_num(params.hue_rotate)));
    }

    chain
}

/// `colorchannelmixer` blending identity toward the sepia matrix by `amount`.
fn sepia_mixer(amount: f64) -> String {
    const CHANNELS: [char; 3] = ['r', 'g', 'b'];
    let mut coefficients = Vec::with_capacity(9);
    for (row, out) in CHANNELS.iter().enumerate() {
        for (col, inp) in CHANNELS.iter().enumerate() {
            let identity = if row == col { 1.0 } else { 0.0 };
            let value = identity * (1.0 - amount) + SEPIA[row][col] * amount;
            coefficients.push(format!("{out}{inp}={}", fmt_num(value)));
        }
    }
    format!("colorchannelmixer={}", coefficients.join(":"))
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}
