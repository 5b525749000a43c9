//! Opacity, rendered by scaling every channel toward black.

use crate::chain::fmt_num;

pub fn opacity_filter(opacity: f64) -> Option<String> {
    if !opacity.is_finite() {
        return None;
    }
    let o = opacity.clamp(0.0, 1.0);
    if o >= 1.0 {
        return None;
    }
    let o = fmt_num(o);
    Some(format!("colorchannelmixer=rr={o}:gg={o}:bb={o}"))
}
