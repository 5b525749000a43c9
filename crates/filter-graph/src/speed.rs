//! Playback speed.
//!
//! Video is retimed with `setpts`. Audio uses `atempo`, which only accepts
//! factors in `[0.5, 2.0]` per stage, so larger changes are chained.

use clipsmith_edit_model::SpeedKeyframe;

use crate::chain::fmt_num;

pub const MIN_TEMPO_STAGE: f64 = 0.5;
pub const MAX_TEMPO_STAGE: f64 = 2.0;

/// Video and audio terms for one constant speed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeedFilters {
    /// `setpts=<1/speed>*PTS`
    pub video: String,
    /// Comma-joined `atempo` stages.
    pub audio: String,
}

/// Decompose a speed factor into `atempo` stages whose product is `speed`.
///
/// Returns an empty list for non-positive or non-finite input.
pub fn tempo_stages(speed: f64) -> Vec<f64> {
    if !speed.is_finite() || speed <= 0.0 {
        return Vec::new();
    }
    let mut stages = Vec::new();
    let mut remainder = speed;
    while remainder > MAX_TEMPO_STAGE {
        stages.push(MAX_TEMPO_STAGE);
        remainder /= MAX_TEMPO_STAGE;
    }
    while remainder < MIN_TEMPO_STAGE {
        stages.push(MIN_TEMPO_STAGE);
        remainder /= MIN_TEMPO_STAGE;
    }
    stages.push(remainder);
    stages
}

pub fn speed_filters(speed: f64) -> Option<SpeedFilters> {
    if !speed.is_finite() || speed <= 0.0 {
        return None;
    }
    let audio = tempo_stages(speed)
        .into_iter()
        .map(|stage| format!("atempo={}", fmt_tempo(stage)))
        .collect::<Vec<_>>()
        .join(",");
    Some(SpeedFilters {
        video: format!("setpts={}*PTS", fmt_num(1.0 / speed)),
        audio,
    })
}

/// One constant speed standing in for a ramp.
///
/// Each keyframe's speed holds until the next keyframe, so the average is
/// weighted by how long each speed is in effect. Keyframes without a usable
/// time span fall back to a plain mean. Returns `None` for an empty ramp.
pub fn average_ramp_speed(ramp: &[SpeedKeyframe]) -> Option<f64> {
    let usable: Vec<SpeedKeyframe> = ramp
        .iter()
        .copied()
        .filter(|k| k.speed.is_finite() && k.speed > 0.0 && k.time.is_finite())
        .collect();
    if usable.is_empty() {
        return None;
    }

    let mut sorted = usable.clone();
    sorted.sort_by(|a, b| a.time.total_cmp(&b.time));

    let mut weighted = 0.0;
    let mut span = 0.0;
    for pair in sorted.windows(2) {
        let dt = pair[1].time - pair[0].time;
        if dt > 0.0 {
            weighted += pair[0].speed * dt;
            span += dt;
        }
    }

    let average = if span > 0.0 {
        weighted / span
    } else {
        usable.iter().map(|k| k.speed).sum::<f64>() / usable.len() as f64
    };
    tracing::debug!(
        keyframes = usable.len(),
        average,
        "Speed ramp approximated by a constant speed"
    );
    Some(average)
}

/// Tempo stages print with up to 6 decimals so the chain keeps its precision.
fn fmt_tempo(stage: f64) -> String {
    let s = format!("{stage:.6}");
    let s = s.trim_end_matches('0');
    let s = s.strip_suffix('.').unwrap_or(s);
    if s.contains('.') {
        s.to_string()
    } else {
        format!("{s}.0")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kf(time: f64, speed: f64) -> SpeedKeyframe {
        SpeedKeyframe { time, speed }
    }

    #[test]
    fn test_stages_for_large_speedup() {
        assert_eq!(tempo_stages(8.0), vec![2.0, 2.0, 2.0]);
        assert_eq!(tempo_stages(3.0), vec![2.0, 1.5]);
    }

    #[test]
    fn test_stages_for_slowdown() {
        assert_eq!(tempo_stages(0.25), vec![0.5, 0.5]);
        assert_eq!(tempo_stages(0.2).len(), 3);
        assert_eq!(tempo_stages(0.75), vec![0.75]);
    }

    #[test]
    fn test_invalid_speed_has_no_filters() {
        assert!(tempo_stages(0.0).is_empty());
        assert_eq!(speed_filters(-2.0), None);
        assert_eq!(speed_filters(f64::NAN), None);
    }

    #[test]
    fn test_speed_filters_text() {
        let filters = speed_filters(4.0).unwrap();
        assert_eq!(filters.video, "setpts=0.25*PTS");
        assert_eq!(filters.audio, "atempo=2.0,atempo=2.0");

        let filters = speed_filters(0.5).unwrap();
        assert_eq!(filters.video, "setpts=2*PTS");
        assert_eq!(filters.audio, "atempo=0.5");
    }

    #[test]
    fn test_ramp_average_is_time_weighted() {
        // 1x for 3s, then 2x for 1s.
        let ramp = [kf(0.0, 1.0), kf(3.0, 2.0), kf(4.0, 2.0)];
        let avg = average_ramp_speed(&ramp).unwrap();
        assert!((avg - 1.25).abs() < 1e-9);
    }

    #[test]
    fn test_ramp_without_span_uses_mean() {
        let avg = average_ramp_speed(&[kf(1.0, 1.0), kf(1.0, 3.0)]).unwrap();
        assert!((avg - 2.0).abs() < 1e-9);
        assert_eq!(average_ramp_speed(&[]), None);
        assert_eq!(average_ramp_speed(&[kf(0.0, 0.0)]), None);
    }

    #[test]
    fn test_single_keyframe_is_its_speed() {
        assert_eq!(average_ramp_speed(&[kf(0.0, 1.5)]), Some(1.5));
    }
}
