//! Multi-clip operations: per-clip speed edits and freeze frames.

use serde::{Deserialize, Serialize};

/// Speeds closer to 1.0 than this are treated as unchanged.
pub const SPEED_EPSILON: f64 = 0.01;

/// One segment of a per-clip retiming request.
///
/// Clips are cut and concatenated in the order the caller supplies them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipEdit {
    /// Segment start in source seconds.
    pub start_time: f64,
    /// Segment end in source seconds (exclusive).
    pub end_time: f64,
    /// Playback speed for this segment.
    #[serde(default = "unit_speed")]
    pub speed: f64,
}

fn unit_speed() -> f64 {
    1.0
}

impl ClipEdit {
    pub fn new(start_time: f64, end_time: f64, speed: f64) -> Self {
        Self {
            start_time,
            end_time,
            speed,
        }
    }

    /// Source duration covered by this clip.
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    /// Whether the clip needs speed filters.
    pub fn is_retimed(&self) -> bool {
        (self.speed - 1.0).abs() > SPEED_EPSILON
    }

    /// Check `start < end`, finite bounds and a positive speed.
    pub fn is_valid(&self) -> bool {
        self.start_time.is_finite()
            && self.end_time.is_finite()
            && self.start_time >= 0.0
            && self.start_time < self.end_time
            && self.speed.is_finite()
            && self.speed > 0.0
    }
}

/// Hold the frame at `time` for `duration` seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FreezeFrame {
    /// Source time in seconds.
    pub time: f64,
    /// Hold length in seconds.
    pub duration: f64,
}

impl FreezeFrame {
    pub fn new(time: f64, duration: f64) -> Self {
        Self { time, duration }
    }
}

/// Freeze points in ascending time order.
///
/// The sort is stable, so points sharing a time keep their relative order.
/// Overlapping points are kept as-is.
pub fn sorted_freeze_frames(frames: &[FreezeFrame]) -> Vec<FreezeFrame> {
    let mut sorted = frames.to_vec();
    sorted.sort_by(|a, b| a.time.total_cmp(&b.time));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_edit_defaults_speed() {
        let clip: ClipEdit = serde_json::from_str(r#"{"startTime":1,"endTime":3}"#).unwrap();
        assert_eq!(clip.speed, 1.0);
        assert!(!clip.is_retimed());
        assert!((clip.duration() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_clip_validity() {
        assert!(ClipEdit::new(0.0, 1.0, 2.0).is_valid());
        assert!(!ClipEdit::new(2.0, 1.0, 1.0).is_valid());
        assert!(!ClipEdit::new(1.0, 1.0, 1.0).is_valid());
        assert!(!ClipEdit::new(0.0, 1.0, 0.0).is_valid());
    }

    #[test]
    fn test_small_speed_deviation_is_not_retimed() {
        assert!(!ClipEdit::new(0.0, 1.0, 1.005).is_retimed());
        assert!(ClipEdit::new(0.0, 1.0, 1.5).is_retimed());
    }

    #[test]
    fn test_freeze_frames_sorted_stably() {
        let frames = [
            FreezeFrame::new(4.0, 1.0),
            FreezeFrame::new(1.0, 2.0),
            FreezeFrame::new(4.0, 3.0),
        ];
        let sorted = sorted_freeze_frames(&frames);
        assert_eq!(sorted[0].time, 1.0);
        assert_eq!(sorted[1].duration, 1.0);
        assert_eq!(sorted[2].duration, 3.0);
    }
}
