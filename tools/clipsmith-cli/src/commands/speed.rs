//! Retime and rejoin clips.

use std::path::PathBuf;

use clipsmith_common::config::AppConfig;
use clipsmith_edit_model::{ClipEdit, MediaSource};

use super::{editor, progress_printer, read_json, write_output};

pub async fn run(
    config: &AppConfig,
    input: String,
    clips: PathBuf,
    output: PathBuf,
) -> anyhow::Result<()> {
    let clip_edits: Vec<ClipEdit> = read_json(&clips)?;

    println!("Retiming {} clip(s) from {input}", clip_edits.len());
    for (i, clip) in clip_edits.iter().enumerate() {
        println!(
            "  [{i}] {:.3}s - {:.3}s at {}x",
            clip.start_time, clip.end_time, clip.speed
        );
    }

    let editor = editor(config)?;
    let bytes = editor
        .process_clip_speeds(MediaSource::parse(&input), &clip_edits, Some(progress_printer()))
        .await
        .ok_or_else(|| anyhow::anyhow!("Retiming failed (run with --verbose for details)"))?;

    write_output(&output, &bytes)
}
