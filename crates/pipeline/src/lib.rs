//! Clipsmith Pipeline
//!
//! Turns edit descriptions into encoder invocations and runs them:
//! - **Engine:** [`EncodingEngine`] contract, the ffmpeg backend and the
//!   lazily loaded, job-serializing [`EngineHandle`]
//! - **Assembly:** argument lists for passthrough, simple and graph encodes
//! - **Overlays:** text, sticker and drawing layers rasterized to one PNG
//! - **Pipelines:** single-pass edits plus split, transition, freeze-frame
//!   and per-clip speed jobs built from normalized segments
//! - **Surface:** [`VideoEditor`], one method per operation

pub mod command;
pub mod context;
pub mod editor;
pub mod engine;
pub mod extract;
pub mod fetch;
pub mod ffmpeg;
pub mod freeze;
pub mod overlay;
pub mod processor;
pub mod progress;
pub mod retime;
pub mod segment;
pub mod split;
pub mod transition;
pub mod workspace;

pub use command::{assemble, AssembledCommand, CommandPath, StagedInputs};
pub use context::PipelineContext;
pub use editor::VideoEditor;
pub use engine::{EncodingEngine, EngineHandle, EngineState, ExecProgress, JobGuard};
pub use fetch::{resolve_source, AssetFetcher, HttpFetcher};
pub use ffmpeg::FfmpegEngine;
pub use freeze::{plan_freeze_steps, FreezeStep};
pub use overlay::{load_font, OverlayRenderer};
pub use progress::{ProgressCallback, ProgressReporter};
pub use transition::TransitionSpec;
pub use workspace::{CleanupOutcome, Scratch};
