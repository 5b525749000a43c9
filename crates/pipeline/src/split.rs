//! Splitting a clip in two.

use clipsmith_common::error::{ClipsmithError, ClipsmithResult};

use crate::progress::ProgressReporter;
use crate::segment::{encode_cut, SegmentCut};
use crate::workspace::Scratch;

/// Cut `input` into `[0, split_time)` and `[split_time, end)`.
///
/// Both halves are re-encoded independently so each starts on a keyframe.
pub async fn split_video(
    scratch: &mut Scratch<'_>,
    input: &[u8],
    split_time: f64,
    progress: &ProgressReporter<'_>,
) -> ClipsmithResult<(Vec<u8>, Vec<u8>)> {
    if !split_time.is_finite() || split_time <= 0.0 {
        return Err(ClipsmithError::invalid_edit(format!(
            "split time must be positive (got {split_time})"
        )));
    }

    progress.processing(10.0, "Preparing media");
    let source = scratch.stage("input", "mp4", input).await?;
    progress.processing(20.0, "Source staged");

    let head = {
        let sink = progress.span(20.0, 55.0, "Encoding first part");
        encode_cut(
            scratch,
            &source,
            &SegmentCut::range(0.0, Some(split_time)),
            "head",
            &*sink,
        )
        .await?
    };
    let tail = {
        let sink = progress.span(55.0, 90.0, "Encoding second part");
        encode_cut(
            scratch,
            &source,
            &SegmentCut::range(split_time, None),
            "tail",
            &*sink,
        )
        .await?
    };

    progress.encoding(95.0, "Finalizing");
    let first = scratch.read(&head).await?;
    let second = scratch.read(&tail).await?;
    Ok((first, second))
}
