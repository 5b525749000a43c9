//! Stabilization and color keying.

use clipsmith_edit_model::color::{parse_hex_color, to_ffmpeg_color};
use clipsmith_edit_model::{KeyEffect, Stabilization};

use crate::chain::fmt_num;

/// Upper bound of `deshake`'s motion search range.
pub const MAX_SEARCH_RANGE: u32 = 64;

const GREEN: [u8; 4] = [0, 255, 0, 255];
const WHITE: [u8; 4] = [255, 255, 255, 255];

/// Flattens the keyed alpha onto black and returns to a plain format.
const FLATTEN: &str = "premultiply=inplace=1,format=yuv420p";

pub fn stabilization_filter(stabilization: &Stabilization) -> Option<String> {
    if !stabilization.enabled {
        return None;
    }
    let range = stabilization.search_range.clamp(1, MAX_SEARCH_RANGE);
    Some(format!("deshake=rx={range}:ry={range}"))
}

/// `chromakey` for green-screen removal (YUV distance).
pub fn green_screen_filter(effect: &KeyEffect) -> Option<String> {
    if !effect.enabled {
        return None;
    }
    let (color, similarity, blend) = key_params(effect, GREEN);
    Some(format!(
        "format=yuva420p,chromakey=color={color}:similarity={similarity}:blend={blend},{FLATTEN}"
    ))
}

/// `colorkey` for background cutout (RGB distance).
pub fn cutout_filter(effect: &KeyEffect) -> Option<String> {
    if !effect.enabled {
        return None;
    }
    let (color, similarity, blend) = key_params(effect, WHITE);
    Some(format!(
        "format=rgba,colorkey=color={color}:similarity={similarity}:blend={blend},{FLATTEN}"
    ))
}

fn key_params(effect: &KeyEffect, default_color: [u8; 4]) -> (String, String, String) {
    let rgba = match effect.color.as_deref() {
        None => default_color,
        Some(raw) => parse_hex_color(raw).unwrap_or_else(|| {
            tracing::warn!(color = raw, "Unparseable key color, using default");
            default_color
        }),
    };
    let similarity = finite_or(effect.similarity, 0.15).clamp(0.01, 1.0);
    let blend = finite_or(effect.blend, 0.1).clamp(0.0, 1.0);
    (to_ffmpeg_color(rgba), fmt_num(similarity), fmt_num(blend))
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enabled() -> KeyEffect {
        KeyEffect {
            enabled: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_disabled_effects_emit_nothing() {
        assert_eq!(stabilization_filter(&Stabilization::default()), None);
        assert_eq!(green_screen_filter(&KeyEffect::default()), None);
        assert_eq!(cutout_filter(&KeyEffect::default()), None);
    }

    #[test]
    fn test_deshake_range_is_clamped() {
        let stab = Stabilization {
            enabled: true,
            search_range: 200,
        };
        assert_eq!(
            stabilization_filter(&stab).as_deref(),
            Some("deshake=rx=64:ry=64")
        );
    }

    #[test]
    fn test_green_screen_defaults() {
        assert_eq!(
            green_screen_filter(&enabled()).as_deref(),
            Some(
                "format=yuva420p,chromakey=color=0x00FF00:similarity=0.15:blend=0.1,\
                 premultiply=inplace=1,format=yuv420p"
            )
        );
    }

    #[test]
    fn test_cutout_uses_custom_color() {
        let effect = KeyEffect {
            color: Some("#0000ff".to_string()),
            similarity: 0.0,
            ..enabled()
        };
        let filter = cutout_filter(&effect).unwrap();
        assert!(filter.starts_with("format=rgba,colorkey=color=0x0000FF:similarity=0.01:"));
    }

    #[test]
    fn test_bad_color_falls_back() {
        let effect = KeyEffect {
            color: Some("chartreuse".to_string()),
            ..enabled()
        };
        assert!(cutout_filter(&effect).unwrap().contains("color=0xFFFFFF"));
    }
}
