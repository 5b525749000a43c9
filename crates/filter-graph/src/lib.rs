//! Clipsmith Filter Graph: the edit compiler's leaf builders
//!
//! Each module maps one concern of an [`EditDescription`] to ffmpeg filter
//! syntax:
//! - **Color:** tone (`eq`), style presets, opacity
//! - **Geometry:** crop, rotation/flip, shape masks
//! - **Effects:** blur, stabilization, chroma/color keying
//! - **Time:** speed (`setpts` + chained `atempo`)
//! - **Audio:** voice effects
//! - **Transitions:** friendly names to `xfade` primitives
//!
//! [`compile`] runs them all over one edit in application order.
//!
//! This crate is pure computation: no I/O, no engine access.
//! Builders never fail: a setting that cannot be expressed yields `None`.
//!
//! [`EditDescription`]: clipsmith_edit_model::EditDescription

pub mod blur;
pub mod chain;
pub mod compile;
pub mod crop;
pub mod keying;
pub mod mask;
pub mod opacity;
pub mod preset;
pub mod speed;
pub mod tone;
pub mod transform;
pub mod transition;
pub mod voice;

pub use chain::{fmt_num, FilterChain};
pub use compile::{audio_filters, effective_speed, video_filters, VideoFilters};
pub use crop::{compute_crop, CropRegion};
pub use speed::{average_ramp_speed, speed_filters, tempo_stages, SpeedFilters};
pub use transition::{transition_offset, xfade_transition};
