//! Whole-edit compilation.
//!
//! Runs every builder over an [`EditDescription`] in a fixed order and
//! collects the video and audio filters. Volume and music mixing are left to
//! the command assembler, which knows how many inputs were staged.

use clipsmith_edit_model::{EditDescription, SPEED_EPSILON};

use crate::blur::blur_filter;
use crate::chain::FilterChain;
use crate::crop::crop_filter;
use crate::keying::{cutout_filter, green_screen_filter, stabilization_filter};
use crate::mask::{mask_filter, masked_graph, MaskFilter, ShapeMask};
use crate::opacity::opacity_filter;
use crate::preset::style_filters;
use crate::speed::{average_ramp_speed, speed_filters};
use crate::tone::tone_filter;
use crate::transform::transform_filter;
use crate::voice::voice_filter;

/// Compiled video filters.
///
/// A shape mask splits the stream, so the terms before and after it are
/// kept apart until [`VideoFilters::build`] stitches them together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VideoFilters {
    pub before_mask: FilterChain,
    pub mask: Option<ShapeMask>,
    pub after_mask: FilterChain,
}

impl VideoFilters {
    pub fn is_empty(&self) -> bool {
        self.before_mask.is_empty() && self.mask.is_none() && self.after_mask.is_empty()
    }

    /// Single-input, single-output graph text, or `None` when empty.
    pub fn build(&self) -> Option<String> {
        match &self.mask {
            Some(mask) => Some(masked_graph(&self.before_mask, mask, &self.after_mask)),
            None => self.before_mask.build(),
        }
    }

    fn current(&mut self) -> &mut FilterChain {
        if self.mask.is_some() {
            &mut self.after_mask
        } else {
            &mut self.before_mask
        }
    }
}

/// The constant speed an edit asks for, or `None` when playback is unchanged.
///
/// A non-empty ramp wins over `speed` and is averaged.
pub fn effective_speed(edit: &EditDescription) -> Option<f64> {
    let speed = if edit.speed_ramp.is_empty() {
        edit.speed?
    } else {
        average_ramp_speed(&edit.speed_ramp)?
    };
    (speed.is_finite() && speed > 0.0 && (speed - 1.0).abs() > SPEED_EPSILON).then_some(speed)
}

/// Video filters in application order: style, tone, blur, crop, transform,
/// opacity, mask, stabilization, keying, speed.
pub fn video_filters(edit: &EditDescription) -> VideoFilters {
    let mut filters = VideoFilters::default();

    if let Some(style) = &edit.filter {
        filters.current().extend(style_filters(style));
    }
    if let Some(tune) = &edit.tune {
        filters.current().push_opt(tone_filter(tune));
    }
    if let Some(radius) = edit.blur {
        filters.current().push_opt(blur_filter(radius));
    }
    if let Some(crop) = &edit.crop {
        match edit.dimensions() {
            Some((width, height)) => filters.current().push_opt(crop_filter(crop, width, height)),
            None => tracing::warn!("Crop requested without source dimensions, skipping"),
        }
    }
    if let Some(transform) = &edit.transform {
        filters.current().push_opt(transform_filter(transform));
    }
    if let Some(opacity) = edit.opacity {
        filters.current().push_opt(opacity_filter(opacity));
    }
    if let Some(mask) = &edit.mask {
        match mask_filter(mask) {
            MaskFilter::Shape(shape) => filters.mask = Some(shape),
            MaskFilter::Term(term) => filters.current().push(term),
        }
    }
    if let Some(stabilization) = &edit.stabilization {
        filters.current().push_opt(stabilization_filter(stabilization));
    }
    if let Some(effect) = &edit.green_screen {
        filters.current().push_opt(green_screen_filter(effect));
    }
    if let Some(effect) = &edit.cutout {
        filters.current().push_opt(cutout_filter(effect));
    }
    if let Some(speed) = effective_speed(edit).and_then(speed_filters) {
        filters.current().push(speed.video);
    }

    filters
}

/// Audio filters on the clip's own track: voice effect, then tempo.
pub fn audio_filters(edit: &EditDescription) -> FilterChain {
    let mut chain = FilterChain::new();
    chain.push_opt(voice_filter(edit.voice_effect));
    if let Some(speed) = effective_speed(edit).and_then(speed_filters) {
        chain.push(speed.audio);
    }
    chain
}
