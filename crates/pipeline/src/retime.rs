//! Per-clip speed edits.

use clipsmith_common::error::{ClipsmithError, ClipsmithResult};
use clipsmith_edit_model::ClipEdit;
use clipsmith_filter_graph::speed_filters;

use crate::progress::ProgressReporter;
use crate::segment::{encode_cut, join_segments, SegmentCut};
use crate::workspace::Scratch;

/// The normalized cut for one clip, retimed when its speed differs from 1.
pub fn clip_cut(clip: &ClipEdit) -> SegmentCut {
    let mut cut = SegmentCut::range(clip.start_time, Some(clip.end_time));
    if clip.is_retimed() {
        if let Some(filters) = speed_filters(clip.speed) {
            cut.video.push(filters.video);
            cut.audio.push(filters.audio);
        }
    }
    cut
}

fn validate(clips: &[ClipEdit]) -> ClipsmithResult<()> {
    if clips.is_empty() {
        return Err(ClipsmithError::invalid_edit("no clips given"));
    }
    if let Some((i, clip)) = clips.iter().enumerate().find(|(_, c)| !c.is_valid()) {
        return Err(ClipsmithError::invalid_edit(format!(
            "clip {i} is invalid (start {}, end {}, speed {})",
            clip.start_time, clip.end_time, clip.speed
        )));
    }
    Ok(())
}

/// Cut each clip from `input`, retime it and join the results in the order
/// given.
pub async fn process_clip_speeds(
    scratch: &mut Scratch<'_>,
    input: &[u8],
    clips: &[ClipEdit],
    progress: &ProgressReporter<'_>,
) -> ClipsmithResult<Vec<u8>> {
    validate(clips)?;

    progress.processing(10.0, "Preparing media");
    let source = scratch.stage("input", "mp4", input).await?;
    progress.processing(20.0, "Source staged");

    let retimed = clips.iter().filter(|c| c.is_retimed()).count();
    tracing::info!(clips = clips.len(), retimed, "Processing clip speeds");

    let per_clip = 60.0 / clips.len() as f64;
    let mut segments = Vec::with_capacity(clips.len());
    for (i, clip) in clips.iter().enumerate() {
        let lo = 20.0 + per_clip * i as f64;
        let sink = progress.span(lo, lo + per_clip, "Encoding clips");
        let name = encode_cut(scratch, &source, &clip_cut(clip), &format!("clip{i}"), &*sink).await?;
        segments.push(name);
    }

    let joined = {
        let sink = progress.span(80.0, 95.0, "Joining clips");
        join_segments(scratch, &segments, &*sink).await?
    };
    scratch.read(&joined).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_speed_clip_is_plain_cut() {
        let cut = clip_cut(&ClipEdit::new(1.0, 4.0, 1.0));
        assert!(cut.video.is_empty());
        assert!(cut.audio.is_empty());
        assert_eq!(cut.end, Some(4.0));
    }

    #[test]
    fn test_fast_clip_gets_speed_filters() {
        let cut = clip_cut(&ClipEdit::new(0.0, 4.0, 2.0));
        assert_eq!(cut.video.build().as_deref(), Some("setpts=0.5*PTS"));
        assert_eq!(cut.audio.build().as_deref(), Some("atempo=2.0"));
    }

    #[test]
    fn test_validate_rejects_bad_clips() {
        assert!(validate(&[]).is_err());
        assert!(validate(&[ClipEdit::new(3.0, 1.0, 1.0)]).is_err());
        assert!(validate(&[ClipEdit::new(0.0, 1.0, 0.0)]).is_err());
        assert!(validate(&[ClipEdit::new(0.0, 1.0, 1.5)]).is_ok());
    }
}
