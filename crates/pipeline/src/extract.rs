//! Still frames and audio tracks pulled out of a clip.

use clipsmith_common::error::{ClipsmithError, ClipsmithResult};

use crate::command::push;
use crate::progress::ProgressReporter;
use crate::workspace::Scratch;

/// JPEG quality scale for `-q:v` (2 best, 31 worst).
const THUMBNAIL_QUALITY: &str = "3";
/// LAME VBR quality for `-q:a` (0 best, 9 worst).
const MP3_QUALITY: &str = "2";

/// Arguments grabbing one frame at `time`, scaled to `width` when given.
pub fn thumbnail_args(input: &str, time: f64, width: Option<u32>, output: &str) -> Vec<String> {
    let mut args = Vec::new();
    if time > 0.0 {
        push(&mut args, ["-ss", format!("{time:.3}").as_str()]);
    }
    push(&mut args, ["-i", input, "-frames:v", "1"]);
    if let Some(width) = width.filter(|w| *w > 0) {
        push(&mut args, ["-vf", format!("scale={width}:-2").as_str()]);
    }
    push(&mut args, ["-q:v", THUMBNAIL_QUALITY, output]);
    args
}

pub fn audio_args(input: &str, output: &str) -> Vec<String> {
    let mut args = Vec::new();
    push(
        &mut args,
        ["-i", input, "-vn", "-c:a", "libmp3lame", "-q:a", MP3_QUALITY, output],
    );
    args
}

/// Encode the frame at `time` as a JPEG.
pub async fn generate_thumbnail(
    scratch: &mut Scratch<'_>,
    input: &[u8],
    time: f64,
    width: Option<u32>,
) -> ClipsmithResult<Vec<u8>> {
    if !time.is_finite() || time < 0.0 {
        return Err(ClipsmithError::invalid_edit(format!(
            "thumbnail time must be non-negative (got {time})"
        )));
    }
    let source = scratch.stage("input", "mp4", input).await?;
    let output = scratch.name("thumb", "jpg");
    tracing::debug!(time, width = ?width, "Generating thumbnail");
    scratch
        .engine()
        .exec(&thumbnail_args(&source, time, width, &output), &|_: f64| {})
        .await?;
    scratch.read(&output).await
}

/// Extract the audio track as MP3.
pub async fn extract_audio(
    scratch: &mut Scratch<'_>,
    input: &[u8],
    progress: &ProgressReporter<'_>,
) -> ClipsmithResult<Vec<u8>> {
    progress.processing(10.0, "Preparing media");
    let source = scratch.stage("input", "mp4", input).await?;
    progress.processing(20.0, "Source staged");

    let output = scratch.name("audio", "mp3");
    {
        let sink = progress.span(20.0, 95.0, "Extracting audio");
        scratch
            .engine()
            .exec(&audio_args(&source, &output), &*sink)
            .await?;
    }
    scratch.read(&output).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thumbnail_args() {
        let args = thumbnail_args("in.mp4", 1.5, Some(320), "t.jpg").join(" ");
        assert_eq!(args, "-ss 1.500 -i in.mp4 -frames:v 1 -vf scale=320:-2 -q:v 3 t.jpg");
    }

    #[test]
    fn test_thumbnail_at_start_without_scale() {
        let args = thumbnail_args("in.mp4", 0.0, None, "t.jpg").join(" ");
        assert_eq!(args, "-i in.mp4 -frames:v 1 -q:v 3 t.jpg");
    }

    #[test]
    fn test_audio_args() {
        assert_eq!(
            audio_args("in.mp4", "a.mp3").join(" "),
            "-i in.mp4 -vn -c:a libmp3lame -q:a 2 a.mp3"
        );
    }
}
