//! Thumbnails and audio extraction.

use std::path::PathBuf;

use clipsmith_common::config::AppConfig;
use clipsmith_edit_model::MediaSource;

use super::{editor, progress_printer, write_output};

pub async fn thumbnail(
    config: &AppConfig,
    input: String,
    time: f64,
    width: Option<u32>,
    output: PathBuf,
) -> anyhow::Result<()> {
    let editor = editor(config)?;
    let bytes = editor
        .generate_thumbnail(MediaSource::parse(&input), time, width)
        .await
        .ok_or_else(|| anyhow::anyhow!("Thumbnail failed (run with --verbose for details)"))?;

    write_output(&output, &bytes)
}

pub async fn audio(config: &AppConfig, input: String, output: PathBuf) -> anyhow::Result<()> {
    println!("Extracting audio from {input}");

    let editor = editor(config)?;
    let bytes = editor
        .extract_audio(MediaSource::parse(&input), Some(progress_printer()))
        .await
        .ok_or_else(|| anyhow::anyhow!("Audio extraction failed (run with --verbose for details)"))?;

    write_output(&output, &bytes)
}
