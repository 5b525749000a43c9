//! Process-backed encoding engine.
//!
//! The working filesystem is a private directory under the configured work
//! root; every encode runs the ffmpeg binary with that directory as its
//! current directory so file names in the arguments resolve inside it.
//! A directory the engine created itself is removed when the engine drops.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;

use clipsmith_common::config::AppConfig;
use clipsmith_common::error::{ClipsmithError, ClipsmithResult};

use crate::engine::{EncodingEngine, ExecProgress};

/// Lines of stderr kept for error messages.
const STDERR_TAIL_LINES: usize = 12;

/// ffmpeg running as a child process per encode.
#[derive(Debug)]
pub struct FfmpegEngine {
    binary: PathBuf,
    work_dir: PathBuf,
    owns_work_dir: bool,
}

impl FfmpegEngine {
    /// Engine using `binary`, with a fresh working directory under `work_root`.
    pub fn new(binary: impl Into<PathBuf>, work_root: &Path) -> Self {
        let id = uuid::Uuid::new_v4().simple().to_string();
        Self {
            binary: binary.into(),
            work_dir: work_root.join(format!("engine-{}", &id[..8])),
            owns_work_dir: true,
        }
    }

    /// Engine using an explicit working directory, which is left in place.
    pub fn with_work_dir(binary: impl Into<PathBuf>, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            work_dir: work_dir.into(),
            owns_work_dir: false,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.engine.ffmpeg_path.clone(), &config.engine_work_root())
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    fn resolve(&self, name: &str) -> ClipsmithResult<PathBuf> {
        let valid = !name.is_empty()
            && !name.contains('/')
            && !name.contains('\\')
            && name != "."
            && name != "..";
        if !valid {
            return Err(ClipsmithError::engine(format!(
                "invalid working file name {name:?}"
            )));
        }
        Ok(self.work_dir.join(name))
    }
}

impl Drop for FfmpegEngine {
    fn drop(&mut self) {
        if !self.owns_work_dir {
            return;
        }
        match std::fs::remove_dir_all(&self.work_dir) {
            Ok(()) => tracing::debug!(work_dir = %self.work_dir.display(), "Removed work dir"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                work_dir = %self.work_dir.display(),
                error = %e,
                "Failed to remove work dir"
            ),
        }
    }
}

#[async_trait::async_trait]
impl EncodingEngine for FfmpegEngine {
    async fn load(&self) -> ClipsmithResult<()> {
        let output = Command::new(&self.binary)
            .arg("-version")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                ClipsmithError::load(format!(
                    "failed to start {}: {e}",
                    self.binary.display()
                ))
            })?;
        if !output.status.success() {
            return Err(ClipsmithError::load(format!(
                "{} -version exited with {}",
                self.binary.display(),
                output.status
            )));
        }

        let version = String::from_utf8_lossy(&output.stdout);
        tracing::info!(
            version = version.lines().next().unwrap_or("unknown"),
            work_dir = %self.work_dir.display(),
            "ffmpeg available"
        );

        tokio::fs::create_dir_all(&self.work_dir).await?;
        Ok(())
    }

    async fn write_file(&self, name: &str, data: &[u8]) -> ClipsmithResult<()> {
        let path = self.resolve(name)?;
        tokio::fs::write(&path, data).await?;
        tracing::debug!(name, bytes = data.len(), "Wrote working file");
        Ok(())
    }

    async fn read_file(&self, name: &str) -> ClipsmithResult<Vec<u8>> {
        let path = self.resolve(name)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ClipsmithError::FileNotFound { path })
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn delete_file(&self, name: &str) -> ClipsmithResult<()> {
        let path = self.resolve(name)?;
        tokio::fs::remove_file(&path).await?;
        Ok(())
    }

    async fn exec(&self, args: &[String], progress: ExecProgress<'_>) -> ClipsmithResult<()> {
        tracing::debug!(args = ?args, "Running ffmpeg");

        let mut child = Command::new(&self.binary)
            .current_dir(&self.work_dir)
            .args(["-y", "-hide_banner", "-nostats", "-progress", "pipe:1"])
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ClipsmithError::engine(format!("Failed to start ffmpeg: {e}")))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| ClipsmithError::engine("Failed to capture ffmpeg stdout"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| ClipsmithError::engine("Failed to capture ffmpeg stderr"))?;

        // Input duration as f64 bits, filled in from stderr once known.
        let probed_duration = Arc::new(AtomicU64::new(0));
        let stderr_task = {
            let probed_duration = Arc::clone(&probed_duration);
            tokio::spawn(async move {
                let mut lines = BufReader::new(stderr).lines();
                let mut tail = VecDeque::with_capacity(STDERR_TAIL_LINES);
                while let Ok(Some(line)) = lines.next_line().await {
                    if probed_duration.load(Ordering::Relaxed) == 0 {
                        if let Some(secs) = parse_duration_line(&line) {
                            probed_duration.store(secs.to_bits(), Ordering::Relaxed);
                        }
                    }
                    if tail.len() == STDERR_TAIL_LINES {
                        tail.pop_front();
                    }
                    tail.push_back(line);
                }
                Vec::from(tail).join("\n")
            })
        };

        let requested_duration = requested_duration(args);
        let mut state = ProgressState::default();
        let mut lines = BufReader::new(stdout).lines();
        while let Some(line) = lines
            .next_line()
            .await
            .map_err(|e| ClipsmithError::engine(format!("Failed reading ffmpeg progress: {e}")))?
        {
            let Some((key, value)) = line.trim().split_once('=') else {
                continue;
            };
            state.update(key, value);
            if key == "progress" {
                let expected = requested_duration.unwrap_or_else(|| {
                    f64::from_bits(probed_duration.load(Ordering::Relaxed))
                });
                progress(state.fraction(expected));
            }
        }

        let status = child
            .wait()
            .await
            .map_err(|e| ClipsmithError::engine(format!("Failed to wait on ffmpeg: {e}")))?;
        let stderr_tail = stderr_task
            .await
            .unwrap_or_else(|_| "<failed to join stderr reader>".to_string());

        if !status.success() {
            return Err(ClipsmithError::encode(format!(
                "ffmpeg exited with {status}: {}",
                stderr_tail.trim()
            )));
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "ffmpeg"
    }
}

#[derive(Debug, Default)]
struct ProgressState {
    out_time_secs: f64,
    complete: bool,
}

impl ProgressState {
    fn update(&mut self, key: &str, value: &str) {
        match key {
            // Despite the name, ffmpeg reports out_time_ms in microseconds.
            "out_time_ms" | "out_time_us" => {
                if let Ok(us) = value.parse::<f64>() {
                    self.out_time_secs = us / 1_000_000.0;
                }
            }
            "progress" => {
                self.complete = value == "end";
            }
            _ => {}
        }
    }

    fn fraction(&self, expected_secs: f64) -> f64 {
        if self.complete {
            1.0
        } else if expected_secs > 0.0 {
            (self.out_time_secs / expected_secs).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Output duration requested with `-t` (last occurrence wins).
fn requested_duration(args: &[String]) -> Option<f64> {
    args.windows(2)
        .filter(|pair| pair[0] == "-t")
        .filter_map(|pair| pair[1].parse::<f64>().ok())
        .filter(|secs| *secs > 0.0)
        .last()
}

/// Parse `  Duration: 00:01:02.50, start: ...` into seconds.
fn parse_duration_line(line: &str) -> Option<f64> {
    let rest = line.trim_start().strip_prefix("Duration:")?;
    let stamp = rest.trim_start().split(',').next()?.trim();
    parse_timestamp(stamp).filter(|secs| *secs > 0.0)
}

/// Parse `HH:MM:SS.frac`.
fn parse_timestamp(stamp: &str) -> Option<f64> {
    let mut parts = stamp.split(':');
    let hours = parts.next()?.parse::<f64>().ok()?;
    let minutes = parts.next()?.parse::<f64>().ok()?;
    let seconds = parts.next()?.parse::<f64>().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(hours * 3600.0 + minutes * 60.0 + seconds)
}
