//! The declarative edit request.
//!
//! An [`EditDescription`] is produced by the editor UI and consumed by the
//! single-pass processor. Every field is optional and fields compose: a
//! description with nothing set is a plain re-mux of the source.

use serde::{Deserialize, Serialize};

use crate::overlay::{Sticker, TextOverlay};
use crate::preset::StyleFilter;
use crate::rect::NormalizedRect;

/// Default gain applied to a background music track.
pub const DEFAULT_MUSIC_VOLUME: f64 = 0.5;

/// Full edit request for one clip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditDescription {
    /// Start of the kept range (seconds).
    pub trim_start: Option<f64>,
    /// End of the kept range (seconds).
    pub trim_end: Option<f64>,

    /// Style preset or explicit preset parameters.
    pub filter: Option<StyleFilter>,
    /// Manual tone adjustments.
    pub tune: Option<Tune>,
    /// Blur radius in pixels.
    pub blur: Option<f64>,
    pub crop: Option<CropSpec>,
    pub transform: Option<Transform>,
    /// Opacity in `[0, 1]`, rendered by fading toward black.
    pub opacity: Option<f64>,
    pub mask: Option<Mask>,

    pub stabilization: Option<Stabilization>,
    pub green_screen: Option<KeyEffect>,
    pub cutout: Option<KeyEffect>,

    /// Constant playback speed.
    pub speed: Option<f64>,
    /// Speed keyframes. Takes precedence over `speed` when non-empty.
    pub speed_ramp: Vec<SpeedKeyframe>,

    pub voice_effect: VoiceEffect,
    /// Gain on the clip's own audio (1.0 = unchanged, 0.0 = muted).
    pub volume: Option<f64>,
    /// Background music track to mix in.
    pub music_url: Option<String>,
    /// Gain on the music track.
    pub music_volume: Option<f64>,

    pub texts: Vec<TextOverlay>,
    pub stickers: Vec<Sticker>,
    /// Freehand drawing layer as a `data:image/png;base64,...` URL.
    pub drawing_data_url: Option<String>,

    /// Source frame width in pixels.
    pub video_width: Option<u32>,
    /// Source frame height in pixels.
    pub video_height: Option<u32>,
    /// Height of the preview surface the overlays were positioned on.
    pub display_height: Option<u32>,
}

/// Tone adjustments from the "tune" panel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Tune {
    /// Additive brightness, neutral at 0.
    pub brightness: f64,
    /// Contrast multiplier, neutral at 1.
    pub contrast: f64,
    /// Saturation multiplier, neutral at 1.
    pub saturation: f64,
    /// Exposure in stops; applied as gamma `2^exposure`.
    pub exposure: f64,
}

impl Default for Tune {
    fn default() -> Self {
        Self {
            brightness: 0.0,
            contrast: 1.0,
            saturation: 1.0,
            exposure: 0.0,
        }
    }
}

/// Crop request: a target aspect ratio or an explicit rectangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CropSpec {
    /// Largest centered crop with the given ratio, e.g. `"16:9"`.
    Aspect { aspect: String },
    /// Free-form normalized rectangle.
    Rect(NormalizedRect),
}

impl CropSpec {
    /// Parse the aspect string into `(w, h)`.
    ///
    /// Returns `None` for `"free"`, `"original"` and anything unparseable.
    pub fn aspect_ratio(&self) -> Option<(f64, f64)> {
        let CropSpec::Aspect { aspect } = self else {
            return None;
        };
        let (w, h) = aspect.split_once(':').or_else(|| aspect.split_once('/'))?;
        let w = w.trim().parse::<f64>().ok()?;
        let h = h.trim().parse::<f64>().ok()?;
        (w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0).then_some((w, h))
    }
}

/// Rotation and mirroring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Transform {
    /// Clockwise rotation in degrees.
    pub rotation: i32,
    pub flip_h: bool,
    pub flip_v: bool,
}

impl Transform {
    /// Rotation as clockwise quarter turns in `0..4`, rounding to the
    /// nearest multiple of 90°.
    pub fn quarter_turns(&self) -> u8 {
        let deg = self.rotation.rem_euclid(360) as f64;
        ((deg / 90.0).round() as i64).rem_euclid(4) as u8
    }

    pub fn is_identity(&self) -> bool {
        self.quarter_turns() == 0 && !self.flip_h && !self.flip_v
    }
}

/// Mask shapes with an analytic definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaskShape {
    Circle,
    Rectangle,
    Diamond,
    /// Anything the UI offers that has no analytic form (hearts, stars, ...).
    #[serde(other)]
    Unsupported,
}

/// Shape mask applied to the frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mask {
    pub shape: MaskShape,
    /// Edge softness in pixels.
    #[serde(default)]
    pub feather: f64,
    /// Keep the outside of the shape instead of the inside.
    #[serde(default)]
    pub invert: bool,
}

/// Motion stabilization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Stabilization {
    pub enabled: bool,
    /// Motion search range in pixels.
    pub search_range: u32,
}

impl Default for Stabilization {
    fn default() -> Self {
        Self {
            enabled: false,
            search_range: 16,
        }
    }
}

/// Color keying (green screen / background cutout).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KeyEffect {
    pub enabled: bool,
    /// Key color as hex; green screen defaults to pure green,
    /// cutout to white when unset.
    pub color: Option<String>,
    /// Match tolerance in `[0.01, 1]`.
    pub similarity: f64,
    /// Edge blend in `[0, 1]`.
    pub blend: f64,
}

impl Default for KeyEffect {
    fn default() -> Self {
        Self {
            enabled: false,
            color: None,
            similarity: 0.15,
            blend: 0.1,
        }
    }
}

/// One speed ramp keyframe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedKeyframe {
    /// Source time in seconds.
    pub time: f64,
    /// Playback speed from this point.
    pub speed: f64,
}

/// Voice changer presets for the clip's own audio.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoiceEffect {
    Robot,
    Chipmunk,
    Deep,
    Echo,
    Radio,
    Telephone,
    Reverb,
    /// Unchanged voice; unknown effect names also land here.
    #[default]
    #[serde(other)]
    None,
}

/// Problems that make an edit impossible to compile.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EditValidationError {
    #[error("trimEnd ({end}) must be greater than trimStart ({start})")]
    EmptyTrimRange { start: f64, end: f64 },

    #[error("{field} must be a finite, non-negative number")]
    InvalidNumber { field: &'static str },

    #[error("speed must be greater than zero (got {0})")]
    NonPositiveSpeed(f64),
}

impl EditDescription {
    /// Source dimensions, when the caller supplied both.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        match (self.video_width, self.video_height) {
            (Some(w), Some(h)) if w > 0 && h > 0 => Some((w, h)),
            _ => None,
        }
    }

    /// Trim start clamped to be non-negative.
    pub fn start_secs(&self) -> f64 {
        self.trim_start.unwrap_or(0.0).max(0.0)
    }

    /// Kept duration when `trim_end` is set.
    pub fn trimmed_duration(&self) -> Option<f64> {
        self.trim_end.map(|end| (end - self.start_secs()).max(0.0))
    }

    /// Whether the output is a sub-range of the source.
    pub fn has_trim(&self) -> bool {
        self.start_secs() > 0.0 || self.trim_end.is_some()
    }

    /// Gain on the clip's own audio.
    pub fn original_volume(&self) -> f64 {
        self.volume.unwrap_or(1.0).max(0.0)
    }

    /// Gain on the music track.
    pub fn music_gain(&self) -> f64 {
        self.music_volume.unwrap_or(DEFAULT_MUSIC_VOLUME).max(0.0)
    }

    /// Whether any text, sticker or drawing layer is requested.
    pub fn has_overlay_content(&self) -> bool {
        !self.texts.is_empty()
            || !self.stickers.is_empty()
            || self
                .drawing_data_url
                .as_deref()
                .is_some_and(|url| !url.trim().is_empty())
    }

    /// Check the numeric fields for values that cannot be compiled.
    pub fn validate(&self) -> Result<(), EditValidationError> {
        let non_negative = |field: &'static str, value: Option<f64>| match value {
            Some(v) if !v.is_finite() || v < 0.0 => {
                Err(EditValidationError::InvalidNumber { field })
            }
            _ => Ok(()),
        };

        non_negative("trimStart", self.trim_start)?;
        non_negative("trimEnd", self.trim_end)?;
        non_negative("blur", self.blur)?;
        non_negative("volume", self.volume)?;
        non_negative("musicVolume", self.music_volume)?;

        if let Some(end) = self.trim_end {
            let start = self.start_secs();
            if end <= start {
                return Err(EditValidationError::EmptyTrimRange { start, end });
            }
        }

        if let Some(speed) = self.speed {
            if !speed.is_finite() || speed <= 0.0 {
                return Err(EditValidationError::NonPositiveSpeed(speed));
            }
        }
        for keyframe in &self.speed_ramp {
            if !keyframe.speed.is_finite() || keyframe.speed <= 0.0 {
                return Err(EditValidationError::NonPositiveSpeed(keyframe.speed));
            }
        }

        Ok(())
    }
}
