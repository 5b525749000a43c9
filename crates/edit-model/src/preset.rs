//! Named style presets.
//!
//! The editor offers a fixed menu of looks. Each preset maps to one
//! [`PresetParams`] value; the filter-graph crate turns those parameters
//! into native filter terms. Callers may also send explicit parameters.

use serde::{Deserialize, Serialize};

/// A named look from the editor's filter menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StylePreset {
    Grayscale,
    Sepia,
    Vintage,
    Warm,
    Cool,
    Vivid,
    Noir,
    Fade,
    Dramatic,
    /// No look applied. Unrecognized preset names land here too.
    #[serde(other)]
    Original,
}

/// Adjustment amounts behind a preset.
///
/// Units follow the CSS filter functions the presets were designed with:
/// `grayscale`/`sepia` are amounts in `[0, 1]`, `contrast`/`brightness`/
/// `saturate` are multipliers (1.0 = unchanged), `hue_rotate` is degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PresetParams {
    pub grayscale: f64,
    pub sepia: f64,
    pub contrast: f64,
    pub brightness: f64,
    pub saturate: f64,
    pub hue_rotate: f64,
}

impl Default for PresetParams {
    fn default() -> Self {
        Self {
            grayscale: 0.0,
            sepia: 0.0,
            contrast: 1.0,
            brightness: 1.0,
            saturate: 1.0,
            hue_rotate: 0.0,
        }
    }
}

impl PresetParams {
    /// True when applying these parameters would leave the frame unchanged.
    pub fn is_neutral(&self) -> bool {
        const EPS: f64 = 1e-6;
        self.grayscale.abs() < EPS
            && self.sepia.abs() < EPS
            && (self.contrast - 1.0).abs() < EPS
            && (self.brightness - 1.0).abs() < EPS
            && (self.saturate - 1.0).abs() < EPS
            && self.hue_rotate.abs() < EPS
    }
}

impl StylePreset {
    /// Fixed parameters for this preset.
    pub fn params(self) -> PresetParams {
        let base = PresetParams::default();
        match self {
            StylePreset::Original => base,
            StylePreset::Grayscale => PresetParams {
                grayscale: 1.0,
                ..base
            },
            StylePreset::Sepia => PresetParams { sepia: 1.0, ..base },
            StylePreset::Vintage => PresetParams {
                sepia: 0.5,
                contrast: 1.1,
                brightness: 1.05,
                saturate: 0.8,
                ..base
            },
            StylePreset::Warm => PresetParams {
                sepia: 0.3,
                saturate: 1.2,
                hue_rotate: -10.0,
                ..base
            },
            StylePreset::Cool => PresetParams {
                saturate: 1.1,
                brightness: 1.05,
                hue_rotate: 15.0,
                ..base
            },
            StylePreset::Vivid => PresetParams {
                contrast: 1.1,
                saturate: 1.5,
                ..base
            },
            StylePreset::Noir => PresetParams {
                grayscale: 1.0,
                contrast: 1.4,
                brightness: 0.9,
                ..base
            },
            StylePreset::Fade => PresetParams {
                contrast: 0.85,
                brightness: 1.1,
                saturate: 0.7,
                ..base
            },
            StylePreset::Dramatic => PresetParams {
                contrast: 1.5,
                brightness: 0.95,
                saturate: 1.2,
                ..base
            },
        }
    }
}

/// The `filter` field of an edit: a preset name or explicit parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleFilter {
    Preset(StylePreset),
    Custom(PresetParams),
}

impl StyleFilter {
    pub fn params(&self) -> PresetParams {
        match self {
            StyleFilter::Preset(preset) => preset.params(),
            StyleFilter::Custom(params) => *params,
        }
    }
}
