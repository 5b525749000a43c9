//! Check the encoder setup.

use clipsmith_common::config::{config_file_path, AppConfig};
use clipsmith_pipeline::load_font;

use super::editor;

pub async fn run(config: &AppConfig) -> anyhow::Result<()> {
    println!("Clipsmith System Check");
    println!("{}", "=".repeat(50));

    println!("     Config: {}", config_file_path().display());
    println!("     ffmpeg: {}", config.engine.ffmpeg_path.display());
    println!("     Work dir: {}", config.engine_work_root().display());

    let editor = editor(config)?;
    let engine_ok = match editor.engine_handle().ensure_ready().await {
        Ok(()) => {
            println!("[OK] Encoder loaded");
            true
        }
        Err(e) => {
            println!("[FAIL] Encoder: {e}");
            false
        }
    };

    match &config.overlay.font_path {
        Some(path) => match load_font(path) {
            Ok(_) => println!("[OK] Overlay font: {}", path.display()),
            Err(e) => println!("[WARN] Overlay font: {e}"),
        },
        None => println!("[WARN] No overlay font configured; text and emoji overlays will fail"),
    }

    println!();
    if engine_ok {
        println!("Encoder is ready.");
        Ok(())
    } else {
        Err(anyhow::anyhow!("Encoder is not usable. Check engine.ffmpeg_path in the config."))
    }
}
