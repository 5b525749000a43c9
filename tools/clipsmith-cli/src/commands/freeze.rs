//! Insert freeze frames.

use std::path::PathBuf;

use anyhow::Context;

use clipsmith_common::config::AppConfig;
use clipsmith_edit_model::{FreezeFrame, MediaSource};

use super::{editor, progress_printer, write_output};

pub async fn run(
    config: &AppConfig,
    input: String,
    points: Vec<String>,
    output: PathBuf,
) -> anyhow::Result<()> {
    let frames = points
        .iter()
        .map(|raw| parse_point(raw))
        .collect::<anyhow::Result<Vec<_>>>()?;

    println!("Inserting {} freeze frame(s) into {input}", frames.len());

    let editor = editor(config)?;
    let bytes = editor
        .insert_freeze_frames(MediaSource::parse(&input), &frames, Some(progress_printer()))
        .await
        .ok_or_else(|| anyhow::anyhow!("Freeze-frame insertion failed (run with --verbose for details)"))?;

    write_output(&output, &bytes)
}

/// Parse `TIME:DURATION`.
fn parse_point(raw: &str) -> anyhow::Result<FreezeFrame> {
    let (time, duration) = raw
        .split_once(':')
        .ok_or_else(|| anyhow::anyhow!("Freeze point must be TIME:DURATION, got {raw:?}"))?;
    let time: f64 = time
        .trim()
        .parse()
        .with_context(|| format!("Bad freeze time in {raw:?}"))?;
    let duration: f64 = duration
        .trim()
        .parse()
        .with_context(|| format!("Bad freeze duration in {raw:?}"))?;
    Ok(FreezeFrame::new(time, duration))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_point() {
        assert_eq!(parse_point("2.5:1").unwrap(), FreezeFrame::new(2.5, 1.0));
        assert!(parse_point("2.5").is_err());
        assert!(parse_point("a:1").is_err());
    }
}
