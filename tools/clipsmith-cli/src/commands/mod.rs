//! Subcommand implementations.

use std::path::Path;

use anyhow::Context;
use serde::de::DeserializeOwned;

use clipsmith_common::config::AppConfig;
use clipsmith_edit_model::{ProcessingProgress, ProcessingStage};
use clipsmith_pipeline::{ProgressCallback, VideoEditor};

pub mod check;
pub mod extract;
pub mod freeze;
pub mod process;
pub mod speed;
pub mod split;
pub mod transition;

pub(crate) fn editor(config: &AppConfig) -> anyhow::Result<VideoEditor> {
    VideoEditor::from_config(config).map_err(|e| anyhow::anyhow!("Failed to set up editor: {e}"))
}

/// Progress printer for interactive runs.
pub(crate) fn progress_printer() -> ProgressCallback {
    Box::new(|p: ProcessingProgress| match p.stage {
        ProcessingStage::Complete => println!("\r  Progress: 100.0% done{}", " ".repeat(24)),
        ProcessingStage::Error => println!("\n  Failed: {}", p.message),
        _ => {
            use std::io::Write;
            print!("\r  Progress: {:5.1}% {:<30}", p.percent, p.message);
            std::io::stdout().flush().ok();
        }
    })
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

pub(crate) fn write_output(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))?;
    println!("  Wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}
