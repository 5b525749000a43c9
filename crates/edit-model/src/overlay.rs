//! Overlay layers drawn on top of the video.
//!
//! Positions are normalized centre points (`0.0..=1.0` across the frame);
//! sizes are in preview (display) pixels and get rescaled to the source
//! resolution at render time.

use serde::{Deserialize, Serialize};

use crate::color::parse_hex_color;

/// A caption or title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextOverlay {
    pub text: String,
    /// Horizontal centre (normalized).
    pub x: f64,
    /// Vertical centre (normalized).
    pub y: f64,
    /// Font size in display pixels.
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    /// Text color as hex.
    #[serde(default = "default_text_color")]
    pub color: String,
    /// Optional backdrop behind the text.
    #[serde(default)]
    pub background_color: Option<String>,
}

/// An emoji or image sticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sticker {
    /// Emoji or short text drawn with the overlay font.
    #[serde(default)]
    pub emoji: Option<String>,
    /// Raster sticker as a data URL. Wins over `emoji` when both are set.
    #[serde(default)]
    pub image_data_url: Option<String>,
    /// Horizontal centre (normalized).
    pub x: f64,
    /// Vertical centre (normalized).
    pub y: f64,
    /// Edge length in display pixels.
    #[serde(default = "default_sticker_size")]
    pub size: f64,
}

fn default_font_size() -> f64 {
    32.0
}

fn default_text_color() -> String {
    "#ffffff".to_string()
}

fn default_sticker_size() -> f64 {
    64.0
}

impl TextOverlay {
    /// Text color, white when unparseable.
    pub fn rgba(&self) -> [u8; 4] {
        parse_hex_color(&self.color).unwrap_or([255, 255, 255, 255])
    }

    pub fn background_rgba(&self) -> Option<[u8; 4]> {
        self.background_color.as_deref().and_then(parse_hex_color)
    }
}
