//! The operation surface.
//!
//! [`VideoEditor`] owns the engine handle and runs each operation as one job:
//! load the engine if needed, wait for exclusive use of it, bring the input
//! into memory, run the pipeline in a fresh [`Scratch`], clean up, and report
//! the outcome. Operations return `None` on failure; the reason is carried by
//! the final `error` progress event and the logs.

use std::sync::{Arc, Mutex};

use rusttype::Font;

use clipsmith_common::config::AppConfig;
use clipsmith_common::error::{ClipsmithError, ClipsmithResult};
use clipsmith_edit_model::{ClipEdit, EditDescription, FreezeFrame, MediaSource};

use crate::context::PipelineContext;
use crate::engine::{EncodingEngine, EngineHandle, JobGuard};
use crate::fetch::{resolve_source, AssetFetcher, HttpFetcher};
use crate::ffmpeg::FfmpegEngine;
use crate::overlay::load_font;
use crate::progress::{ProgressCallback, ProgressReporter};
use crate::transition::TransitionSpec;
use crate::workspace::{CleanupOutcome, Scratch};
use crate::{extract, freeze, processor, retime, split, transition};

/// Longest message carried by an `error` progress event.
const MAX_ERROR_MESSAGE: usize = 160;

/// Client-side video editor bound to one encoding engine.
pub struct VideoEditor {
    handle: EngineHandle,
    fetcher: Arc<dyn AssetFetcher>,
    font: Option<Font<'static>>,
    last_cleanup: Mutex<Option<CleanupOutcome>>,
}

impl VideoEditor {
    pub fn new(engine: Arc<dyn EncodingEngine>, fetcher: Arc<dyn AssetFetcher>) -> Self {
        Self {
            handle: EngineHandle::new(engine),
            fetcher,
            font: None,
            last_cleanup: Mutex::new(None),
        }
    }

    /// Use `font` for text overlays and emoji stickers.
    pub fn with_font(mut self, font: Font<'static>) -> Self {
        self.font = Some(font);
        self
    }

    /// Editor backed by the configured ffmpeg binary and an HTTP fetcher.
    ///
    /// A configured font that cannot be loaded is logged and left out.
    pub fn from_config(config: &AppConfig) -> ClipsmithResult<Self> {
        let engine = FfmpegEngine::from_config(config);
        tracing::debug!(work_dir = %engine.work_dir().display(), "Using ffmpeg engine");
        let mut editor = Self::new(Arc::new(engine), Arc::new(HttpFetcher::new()?));
        if let Some(path) = &config.overlay.font_path {
            match load_font(path) {
                Ok(font) => editor = editor.with_font(font),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Overlay font unavailable")
                }
            }
        }
        Ok(editor)
    }

    pub fn engine_handle(&self) -> &EngineHandle {
        &self.handle
    }

    /// Cleanup result of the most recent operation that got as far as
    /// creating working files.
    pub fn last_cleanup(&self) -> Option<CleanupOutcome> {
        self.last_cleanup
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Apply a declarative edit in a single encode.
    pub async fn process_video(
        &self,
        input: MediaSource,
        edit: &EditDescription,
        progress: Option<ProgressCallback>,
    ) -> Option<Vec<u8>> {
        let reporter = ProgressReporter::new(progress.as_deref());
        let result: ClipsmithResult<Vec<u8>> = async {
            let (_job, bytes) = self.prepare(&input, &reporter).await?;
            let ctx = PipelineContext::new(self.handle.engine(), self.fetcher.as_ref())
                .with_font(self.font.as_ref());
            let mut scratch = Scratch::new(self.handle.engine());
            let result =
                processor::process_video(&ctx, &mut scratch, &bytes, edit, &reporter).await;
            self.release(scratch).await;
            result
        }
        .await;
        settle("process_video", &reporter, result)
    }

    /// Split a clip at `split_time` seconds.
    pub async fn split_video(
        &self,
        input: MediaSource,
        split_time: f64,
        progress: Option<ProgressCallback>,
    ) -> Option<(Vec<u8>, Vec<u8>)> {
        let reporter = ProgressReporter::new(progress.as_deref());
        let result: ClipsmithResult<(Vec<u8>, Vec<u8>)> = async {
            let (_job, bytes) = self.prepare(&input, &reporter).await?;
            let mut scratch = Scratch::new(self.handle.engine());
            let result = split::split_video(&mut scratch, &bytes, split_time, &reporter).await;
            self.release(scratch).await;
            result
        }
        .await;
        settle("split_video", &reporter, result)
    }

    /// Join two clips with a named transition of `duration` seconds.
    pub async fn apply_transition(
        &self,
        clip_a: MediaSource,
        clip_b: MediaSource,
        name: &str,
        duration: f64,
        clip1_duration: f64,
        progress: Option<ProgressCallback>,
    ) -> Option<Vec<u8>> {
        let reporter = ProgressReporter::new(progress.as_deref());
        let spec = TransitionSpec {
            name: name.to_string(),
            duration,
            clip1_duration,
        };
        let result: ClipsmithResult<Vec<u8>> = async {
            let (_job, first) = self.prepare(&clip_a, &reporter).await?;
            let second = self.resolve(&clip_b).await?;
            let mut scratch = Scratch::new(self.handle.engine());
            let result =
                transition::apply_transition(&mut scratch, &first, &second, &spec, &reporter)
                    .await;
            self.release(scratch).await;
            result
        }
        .await;
        settle("apply_transition", &reporter, result)
    }

    /// Hold the frame at each freeze point for its duration.
    pub async fn insert_freeze_frames(
        &self,
        input: MediaSource,
        freeze_frames: &[FreezeFrame],
        progress: Option<ProgressCallback>,
    ) -> Option<Vec<u8>> {
        let reporter = ProgressReporter::new(progress.as_deref());
        let result: ClipsmithResult<Vec<u8>> = async {
            let (_job, bytes) = self.prepare(&input, &reporter).await?;
            let mut scratch = Scratch::new(self.handle.engine());
            let result =
                freeze::insert_freeze_frames(&mut scratch, &bytes, freeze_frames, &reporter).await;
            self.release(scratch).await;
            result
        }
        .await;
        settle("insert_freeze_frames", &reporter, result)
    }

    /// Cut, retime and rejoin clips in the order given.
    pub async fn process_clip_speeds(
        &self,
        input: MediaSource,
        clip_edits: &[ClipEdit],
        progress: Option<ProgressCallback>,
    ) -> Option<Vec<u8>> {
        let reporter = ProgressReporter::new(progress.as_deref());
        let result: ClipsmithResult<Vec<u8>> = async {
            let (_job, bytes) = self.prepare(&input, &reporter).await?;
            let mut scratch = Scratch::new(self.handle.engine());
            let result =
                retime::process_clip_speeds(&mut scratch, &bytes, clip_edits, &reporter).await;
            self.release(scratch).await;
            result
        }
        .await;
        settle("process_clip_speeds", &reporter, result)
    }

    /// JPEG of the frame at `time`, scaled to `width` pixels wide if given.
    pub async fn generate_thumbnail(
        &self,
        input: MediaSource,
        time: f64,
        width: Option<u32>,
    ) -> Option<Vec<u8>> {
        let reporter = ProgressReporter::silent();
        let result: ClipsmithResult<Vec<u8>> = async {
            let (_job, bytes) = self.prepare(&input, &reporter).await?;
            let mut scratch = Scratch::new(self.handle.engine());
            let result = extract::generate_thumbnail(&mut scratch, &bytes, time, width).await;
            self.release(scratch).await;
            result
        }
        .await;
        settle("generate_thumbnail", &reporter, result)
    }

    /// The audio track as MP3.
    pub async fn extract_audio(
        &self,
        input: MediaSource,
        progress: Option<ProgressCallback>,
    ) -> Option<Vec<u8>> {
        let reporter = ProgressReporter::new(progress.as_deref());
        let result: ClipsmithResult<Vec<u8>> = async {
            let (_job, bytes) = self.prepare(&input, &reporter).await?;
            let mut scratch = Scratch::new(self.handle.engine());
            let result = extract::extract_audio(&mut scratch, &bytes, &reporter).await;
            self.release(scratch).await;
            result
        }
        .await;
        settle("extract_audio", &reporter, result)
    }

    /// Load the engine, take the job lock and bring `input` into memory.
    async fn prepare(
        &self,
        input: &MediaSource,
        reporter: &ProgressReporter<'_>,
    ) -> ClipsmithResult<(JobGuard<'_>, Vec<u8>)> {
        reporter.loading(0.0, "Loading engine");
        let job = self.handle.begin_job().await?;
        reporter.loading(5.0, "Engine ready");
        let bytes = self.resolve(input).await?;
        Ok((job, bytes))
    }

    async fn resolve(&self, input: &MediaSource) -> ClipsmithResult<Vec<u8>> {
        resolve_source(input, self.fetcher.as_ref())
            .await
            .map_err(|e| match e {
                ClipsmithError::FileNotFound { .. } => e,
                other => ClipsmithError::staging(format!("{}: {other}", input.describe())),
            })
    }

    async fn release(&self, scratch: Scratch<'_>) {
        let outcome = scratch.cleanup().await;
        if !outcome.is_clean() {
            tracing::warn!(failed = outcome.failed.len(), "Working files left behind");
        }
        *self.last_cleanup.lock().unwrap_or_else(|e| e.into_inner()) = Some(outcome);
    }
}

impl std::fmt::Debug for VideoEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoEditor")
            .field("handle", &self.handle)
            .field("font", &self.font.is_some())
            .finish()
    }
}

/// Report the outcome of one operation and convert it for the caller.
fn settle<T>(
    operation: &'static str,
    reporter: &ProgressReporter<'_>,
    result: ClipsmithResult<T>,
) -> Option<T> {
    match result {
        Ok(value) => {
            tracing::info!(operation, "Operation complete");
            reporter.complete("Done");
            Some(value)
        }
        Err(e) => {
            tracing::error!(operation, error = %e, "Operation failed");
            reporter.fail(short_message(&e));
            None
        }
    }
}

/// First line of the error, capped at [`MAX_ERROR_MESSAGE`] characters.
fn short_message(err: &ClipsmithError) -> String {
    let text = err.to_string();
    let line = text.lines().next().unwrap_or_default();
    match line.char_indices().nth(MAX_ERROR_MESSAGE) {
        Some((cut, _)) => format!("{}...", &line[..cut]),
        None => line.to_string(),
    }
}
