//! Normalized rectangles used for free-form crops.
//!
//! All coordinates are normalized to `[0.0, 1.0]` range.

use serde::{Deserialize, Serialize};

/// A rectangle within the source frame.
///
/// Coordinates are normalized: `(0.0, 0.0)` is top-left,
/// `(1.0, 1.0)` is bottom-right of the full frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRect {
    /// Left edge (normalized).
    pub x: f64,
    /// Top edge (normalized).
    pub y: f64,
    /// Width (normalized).
    pub width: f64,
    /// Height (normalized).
    pub height: f64,
}

impl NormalizedRect {
    /// The whole frame.
    pub const FULL: NormalizedRect = NormalizedRect {
        x: 0.0,
        y: 0.0,
        width: 1.0,
        height: 1.0,
    };

    /// Create a new rectangle, clamping values to the frame.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        let x = x.clamp(0.0, 1.0);
        let y = y.clamp(0.0, 1.0);
        Self {
            x,
            y,
            width: width.clamp(0.0, 1.0 - x),
            height: height.clamp(0.0, 1.0 - y),
        }
    }

    /// Same rectangle with every edge pulled back inside the frame.
    /// Non-finite components collapse to the full frame.
    pub fn clamped(&self) -> Self {
        if ![self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite())
        {
            return Self::FULL;
        }
        Self::new(self.x, self.y, self.width, self.height)
    }
}

impl Default for NormalizedRect {
    fn default() -> Self {
        Self::FULL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_full_frame() {
        assert_eq!(NormalizedRect::default(), NormalizedRect::FULL);
        assert_eq!(NormalizedRect::FULL.clamped(), NormalizedRect::FULL);
    }

    #[test]
    fn test_new_clamps_to_frame() {
        let rect = NormalizedRect::new(0.8, -0.2, 0.5, 2.0);
        assert!((rect.x - 0.8).abs() < 1e-9);
        assert_eq!(rect.y, 0.0);
        assert!(rect.x + rect.width <= 1.0);
        assert!(rect.y + rect.height <= 1.0);
        assert!((rect.width - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_clamped_rejects_nan() {
        let rect = NormalizedRect {
            x: f64::NAN,
            y: 0.0,
            width: 0.5,
            height: 0.5,
        };
        assert_eq!(rect.clamped(), NormalizedRect::FULL);
    }

    #[test]
    fn test_json_field_names() {
        let rect: NormalizedRect =
            serde_json::from_str(r#"{"x":0.1,"y":0.2,"width":0.5,"height":0.25}"#).unwrap();
        assert_eq!(rect, NormalizedRect::new(0.1, 0.2, 0.5, 0.25));
    }

    proptest::proptest! {
        #[test]
        fn prop_new_stays_inside_frame(
            x in -2.0f64..3.0,
            y in -2.0f64..3.0,
            w in -2.0f64..3.0,
            h in -2.0f64..3.0,
        ) {
            let rect = NormalizedRect::new(x, y, w, h);
            proptest::prop_assert!(rect.x >= 0.0 && rect.y >= 0.0);
            proptest::prop_assert!(rect.width >= 0.0 && rect.height >= 0.0);
            proptest::prop_assert!(rect.x + rect.width <= 1.0 + 1e-12);
            proptest::prop_assert!(rect.y + rect.height <= 1.0 + 1e-12);
        }
    }
}
