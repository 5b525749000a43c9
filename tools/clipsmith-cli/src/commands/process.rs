//! Apply an edit description.

use std::path::PathBuf;

use clipsmith_common::config::AppConfig;
use clipsmith_edit_model::{EditDescription, MediaSource};

use super::{editor, progress_printer, read_json, write_output};

pub async fn run(
    config: &AppConfig,
    input: String,
    edit: PathBuf,
    output: PathBuf,
) -> anyhow::Result<()> {
    let description: EditDescription = read_json(&edit)?;
    description
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid edit in {}: {e}", edit.display()))?;

    println!("Processing: {input}");
    println!("  Edit: {}", edit.display());

    let editor = editor(config)?;
    let bytes = editor
        .process_video(MediaSource::parse(&input), &description, Some(progress_printer()))
        .await
        .ok_or_else(|| anyhow::anyhow!("Processing failed (run with --verbose for details)"))?;

    write_output(&output, &bytes)
}
