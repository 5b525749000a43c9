//! Join two clips with a transition.

use std::path::PathBuf;

use clipsmith_common::config::AppConfig;
use clipsmith_edit_model::MediaSource;

use super::{editor, progress_printer, write_output};

pub async fn run(
    config: &AppConfig,
    clip_a: String,
    clip_b: String,
    name: String,
    duration: f64,
    clip1_duration: f64,
    output: PathBuf,
) -> anyhow::Result<()> {
    println!("Joining {clip_a} -> {clip_b}");
    println!("  Transition: {name} ({duration:.2}s)");

    let editor = editor(config)?;
    let bytes = editor
        .apply_transition(
            MediaSource::parse(&clip_a),
            MediaSource::parse(&clip_b),
            &name,
            duration,
            clip1_duration,
            Some(progress_printer()),
        )
        .await
        .ok_or_else(|| anyhow::anyhow!("Transition failed (run with --verbose for details)"))?;

    write_output(&output, &bytes)
}
