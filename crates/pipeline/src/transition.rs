//! Joining two clips with a transition.

use clipsmith_common::error::{ClipsmithError, ClipsmithResult};
use clipsmith_filter_graph::{fmt_num, transition_offset, xfade_transition};

use crate::command::{normalize_audio_chain, normalize_video_chain, push, CODEC_ARGS};
use crate::progress::ProgressReporter;
use crate::workspace::Scratch;

/// Requested transition between two clips.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionSpec {
    /// Editor transition name, e.g. `"slide-left"`.
    pub name: String,
    /// Overlap in seconds.
    pub duration: f64,
    /// Length of the first clip in seconds.
    pub clip1_duration: f64,
}

impl TransitionSpec {
    pub fn offset(&self) -> f64 {
        transition_offset(self.clip1_duration, self.duration)
    }

    fn validate(&self) -> ClipsmithResult<()> {
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return Err(ClipsmithError::invalid_edit(format!(
                "transition duration must be positive (got {})",
                self.duration
            )));
        }
        if !self.clip1_duration.is_finite() || self.clip1_duration <= 0.0 {
            return Err(ClipsmithError::invalid_edit(format!(
                "first clip duration must be positive (got {})",
                self.clip1_duration
            )));
        }
        Ok(())
    }
}

/// Arguments blending `clip_a` into `clip_b` with `xfade` and `acrossfade`.
pub fn transition_args(spec: &TransitionSpec, clip_a: &str, clip_b: &str, output: &str) -> Vec<String> {
    let video = normalize_video_chain().build_or("null");
    let audio = normalize_audio_chain().build_or("anull");
    let duration = fmt_num(spec.duration);
    let graph = [
        format!("[0:v]{video}[v0]"),
        format!("[1:v]{video}[v1]"),
        format!(
            "[v0][v1]xfade=transition={}:duration={duration}:offset={}[vout]",
            xfade_transition(&spec.name),
            fmt_num(spec.offset())
        ),
        format!("[0:a]{audio}[a0]"),
        format!("[1:a]{audio}[a1]"),
        format!("[a0][a1]acrossfade=d={duration}[aout]"),
    ]
    .join(";");

    let mut args = Vec::new();
    push(
        &mut args,
        [
            "-i",
            clip_a,
            "-i",
            clip_b,
            "-filter_complex",
            graph.as_str(),
            "-map",
            "[vout]",
            "-map",
            "[aout]",
        ],
    );
    push(&mut args, CODEC_ARGS.iter().copied());
    args.push(output.to_string());
    args
}

pub async fn apply_transition(
    scratch: &mut Scratch<'_>,
    clip_a: &[u8],
    clip_b: &[u8],
    spec: &TransitionSpec,
    progress: &ProgressReporter<'_>,
) -> ClipsmithResult<Vec<u8>> {
    spec.validate()?;

    progress.processing(10.0, "Preparing media");
    let first = scratch.stage("clip-a", "mp4", clip_a).await?;
    let second = scratch.stage("clip-b", "mp4", clip_b).await?;
    progress.processing(20.0, "Clips staged");

    let output = scratch.name("output", "mp4");
    let args = transition_args(spec, &first, &second, &output);
    tracing::info!(
        transition = xfade_transition(&spec.name),
        duration = spec.duration,
        offset = spec.offset(),
        "Encoding transition"
    );
    {
        let sink = progress.span(20.0, 95.0, "Encoding transition");
        scratch.engine().exec(&args, &*sink).await?;
    }

    scratch.read(&output).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_graph() {
        let spec = TransitionSpec {
            name: "slide-left".to_string(),
            duration: 1.0,
            clip1_duration: 10.0,
        };
        let args = transition_args(&spec, "a.mp4", "b.mp4", "out.mp4");
        let graph = &args[5];
        assert!(graph.starts_with("[0:v]fps=30,format=yuv420p,setsar=1[v0];"));
        assert!(graph.contains("[v0][v1]xfade=transition=slideleft:duration=1:offset=9[vout]"));
        assert!(graph.ends_with("[a0][a1]acrossfade=d=1[aout]"));
        assert_eq!(args.last().map(String::as_str), Some("out.mp4"));
    }

    #[test]
    fn test_short_first_clip_starts_at_zero() {
        let spec = TransitionSpec {
            name: "unknown".to_string(),
            duration: 2.0,
            clip1_duration: 1.5,
        };
        assert_eq!(spec.offset(), 0.0);
        let args = transition_args(&spec, "a.mp4", "b.mp4", "out.mp4");
        assert!(args[5].contains("xfade=transition=fade:duration=2:offset=0[vout]"));
    }

    #[test]
    fn test_rejects_non_positive_duration() {
        let spec = TransitionSpec {
            name: "fade".to_string(),
            duration: 0.0,
            clip1_duration: 3.0,
        };
        assert!(spec.validate().is_err());
    }
}
