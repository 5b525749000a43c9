//! Clipsmith Edit Model
//!
//! Defines the data contracts between the editing UI and the export pipeline:
//! - **Edit:** The declarative [`EditDescription`] and its effect blocks
//! - **Overlays:** Text and sticker layers rasterized before encoding
//! - **Clips:** Per-clip speed edits and freeze-frame points
//! - **Progress:** Stage/percent events reported back to callers
//! - **Sources:** Where input media comes from (bytes, files, URLs)
//!
//! JSON field names are camelCase so descriptions produced by the web UI
//! deserialize without a mapping layer.

pub mod clip;
pub mod color;
pub mod edit;
pub mod overlay;
pub mod preset;
pub mod progress;
pub mod rect;
pub mod source;

pub use clip::*;
pub use edit::*;
pub use overlay::*;
pub use preset::*;
pub use progress::*;
pub use rect::*;
pub use source::*;
