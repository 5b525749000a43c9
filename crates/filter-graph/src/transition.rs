//! Clip transitions.

/// `xfade` primitive used when a name is not in the table.
pub const FALLBACK_TRANSITION: &str = "fade";

/// Map an editor transition name to an `xfade` transition.
pub fn xfade_transition(name: &str) -> &'static str {
    match name.trim().to_ascii_lowercase().as_str() {
        "crossfade" | "fade" => "fade",
        "slide-left" => "slideleft",
        "slide-right" => "slideright",
        "slide-up" => "slideup",
        "slide-down" => "slidedown",
        "zoom-in" => "zoomin",
        "zoom-out" => "circleopen",
        "dissolve" => "dissolve",
        "wipe" | "wipe-left" => "wipeleft",
        "wipe-right" => "wiperight",
        "spin" => "radial",
        "glitch" => "pixelize",
        "flash" => "fadewhite",
        "fade-black" => "fadeblack",
        other => {
            tracing::debug!(name = other, fallback = FALLBACK_TRANSITION, "Unknown transition");
            FALLBACK_TRANSITION
        }
    }
}

/// Where the second clip starts blending in: `max(0, clip1 - duration)`.
pub fn transition_offset(clip1_duration: f64, duration: f64) -> f64 {
    let clip1 = if clip1_duration.is_finite() {
        clip1_duration.max(0.0)
    } else {
        0.0
    };
    let duration = if duration.is_finite() {
        duration.max(0.0)
    } else {
        0.0
    };
    (clip1 - duration).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_table() {
        assert_eq!(xfade_transition("crossfade"), "fade");
        assert_eq!(xfade_transition("slide-left"), "slideleft");
        assert_eq!(xfade_transition("zoom-out"), "circleopen");
        assert_eq!(xfade_transition("Spin"), "radial");
        assert_eq!(xfade_transition("flash"), "fadewhite");
    }

    #[test]
    fn test_unknown_name_falls_back() {
        assert_eq!(xfade_transition("page-curl"), "fade");
    }

    #[test]
    fn test_offset() {
        assert_eq!(transition_offset(10.0, 1.0), 9.0);
        assert_eq!(transition_offset(0.5, 1.0), 0.0);
        assert_eq!(transition_offset(f64::NAN, 1.0), 0.0);
    }
}
