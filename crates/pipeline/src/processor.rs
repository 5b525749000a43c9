//! Single-pass edit processing.
//!
//! Stages the source, the optional overlay raster and the optional music
//! track, assembles one encode and runs it. A requested overlay or music
//! track that cannot be staged fails the edit. A mix of music with the
//! original audio gets one retry with the original muted, which covers
//! sources that have no audio stream to mix.

use clipsmith_common::error::{ClipsmithError, ClipsmithResult};
use clipsmith_edit_model::EditDescription;

use crate::command::{assemble, StagedInputs};
use crate::context::PipelineContext;
use crate::overlay::OverlayRenderer;
use crate::progress::ProgressReporter;
use crate::workspace::Scratch;

/// Percent at which the encode starts.
const ENCODE_START: f64 = 30.0;
/// Percent at which the encode is considered done.
const ENCODE_END: f64 = 95.0;

/// Apply `edit` to `input` and return the encoded MP4.
pub async fn process_video(
    ctx: &PipelineContext<'_>,
    scratch: &mut Scratch<'_>,
    input: &[u8],
    edit: &EditDescription,
    progress: &ProgressReporter<'_>,
) -> ClipsmithResult<Vec<u8>> {
    edit.validate()
        .map_err(|e| ClipsmithError::invalid_edit(e.to_string()))?;

    progress.processing(10.0, "Preparing media");
    let video = scratch.stage("input", "mp4", input).await?;
    progress.processing(20.0, "Source staged");

    let overlay = stage_overlay(ctx, scratch, edit).await?;
    progress.processing(25.0, "Overlays ready");

    let music = stage_music(ctx, scratch, edit).await?;
    progress.processing(ENCODE_START, "Audio ready");

    if !edit.speed_ramp.is_empty() {
        tracing::info!(
            keyframes = edit.speed_ramp.len(),
            "Speed ramp rendered at its average speed"
        );
    }

    let output = scratch.name("output", "mp4");
    let inputs = StagedInputs {
        video: &video,
        overlay: overlay.as_deref(),
        music: music.as_deref(),
        output: &output,
    };

    let command = assemble(edit, &inputs);
    tracing::info!(
        path = command.path.as_str(),
        overlay = overlay.is_some(),
        music = music.is_some(),
        "Encoding edit"
    );

    let sink = progress.span(ENCODE_START, ENCODE_END, "Encoding");
    let first = ctx.engine.exec(&command.args, &*sink).await;

    if let Err(err) = first {
        let mixes_original = music.is_some() && edit.original_volume() > 0.0;
        if !(mixes_original && err.is_encode()) {
            return Err(err);
        }
        tracing::warn!(error = %err, "Mixed encode failed, retrying with original audio muted");
        let muted = EditDescription {
            volume: Some(0.0),
            ..edit.clone()
        };
        let retry = assemble(&muted, &inputs);
        ctx.engine.exec(&retry.args, &*sink).await?;
    }

    progress.encoding(ENCODE_END, "Finalizing");
    scratch.read(&output).await
}

/// Render and stage the overlay raster when the edit has overlay content.
///
/// Returns `Ok(None)` when there is nothing to draw or the frame size is
/// unknown. A render failure is an error.
async fn stage_overlay(
    ctx: &PipelineContext<'_>,
    scratch: &mut Scratch<'_>,
    edit: &EditDescription,
) -> ClipsmithResult<Option<String>> {
    if !edit.has_overlay_content() {
        return Ok(None);
    }
    let Some((width, height)) = edit.dimensions() else {
        tracing::warn!("Overlay content without source dimensions, skipping overlays");
        return Ok(None);
    };

    let renderer = OverlayRenderer::new(width, height, edit.display_height, ctx.font);
    let png = renderer.render_png(edit).map_err(|e| match e {
        ClipsmithError::Overlay { .. } => e,
        other => ClipsmithError::overlay(other.to_string()),
    })?;
    let name = scratch.stage("overlay", "png", &png).await?;
    Ok(Some(name))
}

/// Fetch and stage the music track when one is requested.
///
/// A track that cannot be fetched, or comes back empty, fails the edit.
async fn stage_music(
    ctx: &PipelineContext<'_>,
    scratch: &mut Scratch<'_>,
    edit: &EditDescription,
) -> ClipsmithResult<Option<String>> {
    let Some(url) = edit.music_url.as_deref().map(str::trim).filter(|u| !u.is_empty()) else {
        return Ok(None);
    };
    let bytes = ctx
        .fetcher
        .fetch(url)
        .await
        .map_err(|e| ClipsmithError::staging(format!("music track: {e}")))?;
    if bytes.is_empty() {
        return Err(ClipsmithError::staging(format!("music track {url} is empty")));
    }
    let name = scratch.stage("music", audio_extension(url), &bytes).await?;
    Ok(Some(name))
}

/// File extension for a music URL, `mp3` when the URL has no usable one.
fn audio_extension(url: &str) -> &str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    match path.rsplit_once('.') {
        Some((_, ext))
            if (1..=4).contains(&ext.len()) && ext.chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            ext
        }
        _ => "mp3",
    }
}
