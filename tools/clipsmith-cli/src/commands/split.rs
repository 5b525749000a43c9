//! Split a clip in two.

use std::path::PathBuf;

use clipsmith_common::config::AppConfig;
use clipsmith_edit_model::MediaSource;

use super::{editor, progress_printer, write_output};

pub async fn run(
    config: &AppConfig,
    input: String,
    at: f64,
    first: PathBuf,
    second: PathBuf,
) -> anyhow::Result<()> {
    println!("Splitting {input} at {at:.3}s");

    let editor = editor(config)?;
    let (head, tail) = editor
        .split_video(MediaSource::parse(&input), at, Some(progress_printer()))
        .await
        .ok_or_else(|| anyhow::anyhow!("Split failed (run with --verbose for details)"))?;

    write_output(&first, &head)?;
    write_output(&second, &tail)
}
