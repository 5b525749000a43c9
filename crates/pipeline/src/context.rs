//! Collaborators shared by every pipeline.

use rusttype::Font;

use crate::engine::EncodingEngine;
use crate::fetch::AssetFetcher;

/// What a pipeline call may use besides its own working files.
#[derive(Clone, Copy)]
pub struct PipelineContext<'a> {
    pub engine: &'a dyn EncodingEngine,
    pub fetcher: &'a dyn AssetFetcher,
    /// Font for text and emoji overlays.
    pub font: Option<&'a Font<'static>>,
}

impl<'a> PipelineContext<'a> {
    pub fn new(engine: &'a dyn EncodingEngine, fetcher: &'a dyn AssetFetcher) -> Self {
        Self {
            engine,
            fetcher,
            font: None,
        }
    }

    pub fn with_font(mut self, font: Option<&'a Font<'static>>) -> Self {
        self.font = font;
        self
    }
}
