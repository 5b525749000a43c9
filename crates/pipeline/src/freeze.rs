//! Freeze-frame insertion.
//!
//! The source is cut at every freeze point and a still of that instant,
//! held for the requested duration, is spliced in between the cuts.

use clipsmith_common::error::{ClipsmithError, ClipsmithResult};
use clipsmith_edit_model::{sorted_freeze_frames, FreezeFrame};

use crate::progress::ProgressReporter;
use crate::segment::{encode_cut, hold_args, join_segments, SegmentCut};
use crate::workspace::Scratch;

/// Segments shorter than this are dropped.
const MIN_SEGMENT_SECS: f64 = 1e-3;

/// One encode of a freeze-frame plan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FreezeStep {
    /// Source range `[start, end)`; `end: None` runs to the end.
    Segment { start: f64, end: Option<f64> },
    /// Still of the frame at `at`, held for `duration` seconds.
    Hold { at: f64, duration: f64 },
}

/// Plan the encodes for a set of freeze points.
///
/// Points are taken in ascending time order; points sharing a time produce
/// consecutive holds. `source_duration`, when known, drops an empty tail.
pub fn plan_freeze_steps(points: &[FreezeFrame], source_duration: Option<f64>) -> Vec<FreezeStep> {
    let mut steps = Vec::with_capacity(points.len() * 2 + 1);
    let mut cursor = 0.0f64;

    for point in sorted_freeze_frames(points) {
        let at = point.time.max(0.0);
        if at - cursor > MIN_SEGMENT_SECS {
            steps.push(FreezeStep::Segment {
                start: cursor,
                end: Some(at),
            });
        }
        steps.push(FreezeStep::Hold {
            at,
            duration: point.duration,
        });
        cursor = cursor.max(at);
    }

    let tail_is_empty = source_duration.is_some_and(|total| total - cursor <= MIN_SEGMENT_SECS);
    if !tail_is_empty {
        steps.push(FreezeStep::Segment {
            start: cursor,
            end: None,
        });
    }
    steps
}

fn validate(points: &[FreezeFrame]) -> ClipsmithResult<()> {
    if points.is_empty() {
        return Err(ClipsmithError::invalid_edit("no freeze frames given"));
    }
    for point in points {
        if !point.time.is_finite() || point.time < 0.0 {
            return Err(ClipsmithError::invalid_edit(format!(
                "freeze time must be non-negative (got {})",
                point.time
            )));
        }
        if !point.duration.is_finite() || point.duration <= 0.0 {
            return Err(ClipsmithError::invalid_edit(format!(
                "freeze duration must be positive (got {})",
                point.duration
            )));
        }
    }
    Ok(())
}

/// Insert every freeze frame into `input` and return the joined MP4.
///
/// Per-step encodes share the progress range up to 80%; the join takes the
/// rest.
pub async fn insert_freeze_frames(
    scratch: &mut Scratch<'_>,
    input: &[u8],
    points: &[FreezeFrame],
    progress: &ProgressReporter<'_>,
) -> ClipsmithResult<Vec<u8>> {
    validate(points)?;

    progress.processing(10.0, "Preparing media");
    let source = scratch.stage("input", "mp4", input).await?;
    progress.processing(20.0, "Source staged");

    let steps = plan_freeze_steps(points, None);
    tracing::info!(points = points.len(), steps = steps.len(), "Inserting freeze frames");

    const STEPS_START: f64 = 20.0;
    const STEPS_END: f64 = 80.0;
    let per_step = (STEPS_END - STEPS_START) / steps.len() as f64;

    let mut segments = Vec::with_capacity(steps.len());
    for (i, step) in steps.iter().enumerate() {
        let lo = STEPS_START + per_step * i as f64;
        let sink = progress.span(lo, lo + per_step, "Encoding segments");
        let name = match *step {
            FreezeStep::Segment { start, end } => {
                let cut = SegmentCut::range(start, end);
                encode_cut(scratch, &source, &cut, &format!("seg{i}"), &*sink).await?
            }
            FreezeStep::Hold { at, duration } => {
                let output = scratch.name(&format!("hold{i}"), "mp4");
                scratch
                    .engine()
                    .exec(&hold_args(&source, at, duration, &output), &*sink)
                    .await?;
                output
            }
        };
        segments.push(name);
    }

    let joined = {
        let sink = progress.span(STEPS_END, 95.0, "Joining segments");
        join_segments(scratch, &segments, &*sink).await?
    };
    scratch.read(&joined).await
}
