//! Normalized segment encodes and the stream-copy join.
//!
//! Multi-stage operations cut the source into segments that all share one
//! profile (30 fps, yuv420p, 44.1 kHz stereo AAC) so the concat demuxer can
//! join them without another re-encode.

use clipsmith_common::error::{ClipsmithError, ClipsmithResult};
use clipsmith_filter_graph::FilterChain;

use crate::command::{
    concat_args, concat_list, normalize_audio_chain, normalize_video_chain, push,
    segment_profile_args, SEGMENT_SAMPLE_RATE,
};
use crate::engine::ExecProgress;
use crate::workspace::Scratch;

/// A `[start, end)` cut of the staged source, optionally retimed.
#[derive(Debug, Clone, Default)]
pub struct SegmentCut {
    pub start: f64,
    /// `None` runs to the end of the source.
    pub end: Option<f64>,
    /// Extra video terms applied before normalization.
    pub video: FilterChain,
    /// Extra audio terms applied before normalization.
    pub audio: FilterChain,
}

impl SegmentCut {
    pub fn range(start: f64, end: Option<f64>) -> Self {
        Self {
            start,
            end,
            ..Default::default()
        }
    }

    /// Arguments encoding this cut of `input` into `output`.
    pub fn args(&self, input: &str, output: &str) -> Vec<String> {
        let mut args = Vec::new();
        if self.start > 0.0 {
            push(&mut args, ["-ss", format!("{:.3}", self.start).as_str()]);
        }
        if let Some(end) = self.end {
            let length = (end - self.start).max(0.0);
            push(&mut args, ["-t", format!("{length:.3}").as_str()]);
        }
        push(&mut args, ["-i", input]);

        let mut video = self.video.clone();
        video.extend(normalize_video_chain());
        let mut audio = self.audio.clone();
        audio.extend(normalize_audio_chain());
        push(
            &mut args,
            ["-vf", video.build_or("null").as_str(), "-af", audio.build_or("anull").as_str()],
        );
        args.extend(segment_profile_args());
        args.push(output.to_string());
        args
    }
}

/// Encode one cut into a fresh working file and return its name.
pub async fn encode_cut(
    scratch: &mut Scratch<'_>,
    input: &str,
    cut: &SegmentCut,
    role: &str,
    progress: ExecProgress<'_>,
) -> ClipsmithResult<String> {
    let output = scratch.name(role, "mp4");
    let args = cut.args(input, &output);
    tracing::debug!(
        role,
        start = cut.start,
        end = ?cut.end,
        "Encoding segment"
    );
    scratch.engine().exec(&args, progress).await?;
    Ok(output)
}

/// Arguments turning the frame at `at` into a `duration`-second still with a
/// silent audio track.
pub fn hold_args(input: &str, at: f64, duration: f64, output: &str) -> Vec<String> {
    let length = format!("{duration:.3}");
    let mut video = FilterChain::new();
    video.push("trim=end_frame=1");
    video.push("setpts=PTS-STARTPTS");
    video.push(format!("tpad=stop_mode=clone:stop_duration={length}"));
    video.extend(normalize_video_chain());
    let silence = format!("anullsrc=channel_layout=stereo:sample_rate={SEGMENT_SAMPLE_RATE}");
    let graph = format!("[0:v]{}[vout]", video.build_or("null"));

    let mut args = Vec::new();
    if at > 0.0 {
        push(&mut args, ["-ss", format!("{at:.3}").as_str()]);
    }
    push(
        &mut args,
        [
            "-i",
            input,
            "-f",
            "lavfi",
            "-t",
            length.as_str(),
            "-i",
            silence.as_str(),
            "-filter_complex",
            graph.as_str(),
            "-map",
            "[vout]",
            "-map",
            "1:a",
            "-t",
            length.as_str(),
        ],
    );
    args.extend(segment_profile_args());
    args.push(output.to_string());
    args
}

/// Write the concat list for `segments` and join them into one file.
pub async fn join_segments(
    scratch: &mut Scratch<'_>,
    segments: &[String],
    progress: ExecProgress<'_>,
) -> ClipsmithResult<String> {
    if segments.is_empty() {
        return Err(ClipsmithError::invalid_edit("nothing to join"));
    }
    let list = scratch
        .stage("list", "txt", concat_list(segments).as_bytes())
        .await?;
    let output = scratch.name("joined", "mp4");
    tracing::debug!(segments = segments.len(), "Joining segments");
    scratch
        .engine()
        .exec(&concat_args(&list, &output), progress)
        .await?;
    Ok(output)
}
