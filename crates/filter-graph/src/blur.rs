//! Gaussian blur.

use crate::chain::fmt_num;

/// Largest blur radius the encoder handles at an acceptable speed.
pub const MAX_BLUR_RADIUS: f64 = 50.0;

/// `gblur` term for a radius in pixels, clamped to [`MAX_BLUR_RADIUS`].
pub fn blur_filter(radius: f64) -> Option<String> {
    if !radius.is_finite() || radius <= 0.0 {
        return None;
    }
    let sigma = radius.min(MAX_BLUR_RADIUS);
    Some(format!("gblur=sigma={}", fmt_num(sigma)))
}
