//! Overlay rasterization.
//!
//! Drawing, texts and stickers are flattened, in that order, onto one
//! transparent canvas the size of the source frame and handed to the encode
//! as a PNG input. Texts and emoji stickers need a font; without one the
//! render fails rather than dropping layers.

use std::io::Cursor;
use std::path::Path;

use base64::Engine as _;
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, Pixel, Rgba, RgbaImage};
use rusttype::{point, Font, PositionedGlyph, Scale};

use clipsmith_common::error::{ClipsmithError, ClipsmithResult};
use clipsmith_edit_model::{EditDescription, Sticker, TextOverlay};

/// Padding around text backgrounds, as a fraction of the font size.
const TEXT_PADDING: f32 = 0.25;

/// Renders overlay layers for one frame size.
pub struct OverlayRenderer<'f> {
    width: u32,
    height: u32,
    /// Display-to-source pixel ratio.
    scale: f32,
    font: Option<&'f Font<'static>>,
}

impl<'f> OverlayRenderer<'f> {
    /// Renderer for a `width x height` frame whose overlays were laid out on
    /// a preview `display_height` pixels tall.
    pub fn new(
        width: u32,
        height: u32,
        display_height: Option<u32>,
        font: Option<&'f Font<'static>>,
    ) -> Self {
        let scale = match display_height {
            Some(display) if display > 0 => height as f32 / display as f32,
            _ => 1.0,
        };
        Self {
            width,
            height,
            scale,
            font,
        }
    }

    /// Rasterize every overlay layer of `edit` into PNG bytes.
    pub fn render_png(&self, edit: &EditDescription) -> ClipsmithResult<Vec<u8>> {
        let canvas = self.render(edit)?;
        encode_png(canvas)
    }

    pub fn render(&self, edit: &EditDescription) -> ClipsmithResult<RgbaImage> {
        let mut canvas = RgbaImage::new(self.width, self.height);

        if let Some(url) = edit.drawing_data_url.as_deref().filter(|u| !u.trim().is_empty()) {
            let drawing = decode_data_url(url)?;
            let drawing = imageops::resize(
                &drawing.to_rgba8(),
                self.width,
                self.height,
                FilterType::Triangle,
            );
            imageops::overlay(&mut canvas, &drawing, 0, 0);
        }

        for text in &edit.texts {
            self.draw_text(&mut canvas, text)?;
        }

        for sticker in &edit.stickers {
            self.draw_sticker(&mut canvas, sticker)?;
        }

        Ok(canvas)
    }

    fn draw_text(&self, canvas: &mut RgbaImage, text: &TextOverlay) -> ClipsmithResult<()> {
        let font = self.require_font()?;
        let size = (text.font_size.max(1.0) as f32) * self.scale;
        let (cx, cy) = self.centre(text.x, text.y);

        if let Some(bg) = text.background_rgba() {
            let (w, h) = measure(font, &text.text, size);
            let pad = size * TEXT_PADDING;
            fill_rect(
                canvas,
                cx - w / 2.0 - pad,
                cy - h / 2.0 - pad,
                w + 2.0 * pad,
                h + 2.0 * pad,
                Rgba(bg),
            );
        }
        draw_centered(canvas, font, &text.text, size, cx, cy, Rgba(text.rgba()));
        Ok(())
    }

    fn draw_sticker(&self, canvas: &mut RgbaImage, sticker: &Sticker) -> ClipsmithResult<()> {
        let edge = ((sticker.size.max(1.0) as f32) * self.scale).round().max(1.0) as u32;
        let (cx, cy) = self.centre(sticker.x, sticker.y);

        if let Some(url) = sticker.image_data_url.as_deref() {
            let image = decode_data_url(url)?;
            let image = imageops::resize(&image.to_rgba8(), edge, edge, FilterType::Triangle);
            let x = (cx - edge as f32 / 2.0).round() as i64;
            let y = (cy - edge as f32 / 2.0).round() as i64;
            imageops::overlay(canvas, &image, x, y);
        } else if let Some(emoji) = sticker.emoji.as_deref() {
            let font = self.require_font()?;
            draw_centered(
                canvas,
                font,
                emoji,
                edge as f32,
                cx,
                cy,
                Rgba([255, 255, 255, 255]),
            );
        }
        Ok(())
    }

    fn require_font(&self) -> ClipsmithResult<&'f Font<'static>> {
        self.font.ok_or_else(|| {
            ClipsmithError::overlay("no font configured for text and emoji overlays")
        })
    }

    fn centre(&self, x: f64, y: f64) -> (f32, f32) {
        (
            (x.clamp(0.0, 1.0) as f32) * self.width as f32,
            (y.clamp(0.0, 1.0) as f32) * self.height as f32,
        )
    }
}

/// Load a TrueType/OpenType font from disk.
pub fn load_font(path: &Path) -> ClipsmithResult<Font<'static>> {
    let bytes = std::fs::read(path).map_err(|e| {
        ClipsmithError::overlay(format!("reading font {}: {e}", path.display()))
    })?;
    Font::try_from_vec(bytes)
        .ok_or_else(|| ClipsmithError::overlay(format!("{} is not a usable font", path.display())))
}

/// Decode a `data:<mime>;base64,<payload>` image.
pub fn decode_data_url(url: &str) -> ClipsmithResult<DynamicImage> {
    let payload = url
        .trim()
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(";base64,"))
        .map(|(_, payload)| payload)
        .ok_or_else(|| ClipsmithError::overlay("expected a base64 data URL"))?;
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| ClipsmithError::overlay(format!("bad base64 payload: {e}")))?;
    Ok(image::load_from_memory(&bytes)?)
}

pub fn encode_png(canvas: RgbaImage) -> ClipsmithResult<Vec<u8>> {
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(canvas).write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

fn layout(font: &Font<'static>, text: &str, size: f32) -> Vec<PositionedGlyph<'static>> {
    let scale = Scale::uniform(size);
    let ascent = font.v_metrics(scale).ascent;
    font.layout(text, scale, point(0.0, ascent)).collect()
}

/// Rendered width and line height of `text`.
fn measure(font: &Font<'static>, text: &str, size: f32) -> (f32, f32) {
    let scale = Scale::uniform(size);
    let v = font.v_metrics(scale);
    let width = layout(font, text, size)
        .last()
        .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
        .unwrap_or(0.0);
    (width, v.ascent - v.descent)
}

fn draw_centered(
    canvas: &mut RgbaImage,
    font: &Font<'static>,
    text: &str,
    size: f32,
    cx: f32,
    cy: f32,
    color: Rgba<u8>,
) {
    let (w, h) = measure(font, text, size);
    let left = (cx - w / 2.0).round() as i64;
    let top = (cy - h / 2.0).round() as i64;

    for glyph in layout(font, text, size) {
        let Some(bb) = glyph.pixel_bounding_box() else {
            continue;
        };
        glyph.draw(|gx, gy, coverage| {
            let x = left + bb.min.x as i64 + gx as i64;
            let y = top + bb.min.y as i64 + gy as i64;
            blend_at(canvas, x, y, color, coverage);
        });
    }
}

fn fill_rect(canvas: &mut RgbaImage, x: f32, y: f32, w: f32, h: f32, color: Rgba<u8>) {
    let x0 = x.floor().max(0.0) as u32;
    let y0 = y.floor().max(0.0) as u32;
    let x1 = ((x + w).ceil().max(0.0) as u32).min(canvas.width());
    let y1 = ((y + h).ceil().max(0.0) as u32).min(canvas.height());
    for py in y0..y1 {
        for px in x0..x1 {
            canvas.get_pixel_mut(px, py).blend(&color);
        }
    }
}

fn blend_at(canvas: &mut RgbaImage, x: i64, y: i64, color: Rgba<u8>, coverage: f32) {
    if x < 0 || y < 0 || x >= canvas.width() as i64 || y >= canvas.height() as i64 {
        return;
    }
    let alpha = (color[3] as f32 * coverage.clamp(0.0, 1.0)).round() as u8;
    if alpha == 0 {
        return;
    }
    let src = Rgba([color[0], color[1], color[2], alpha]);
    canvas.get_pixel_mut(x as u32, y as u32).blend(&src);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red_dot_data_url() -> String {
        let mut dot = RgbaImage::new(2, 2);
        for p in dot.pixels_mut() {
            *p = Rgba([255, 0, 0, 255]);
        }
        let png = encode_png(dot).unwrap();
        format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(png)
        )
    }

    #[test]
    fn test_decode_data_url() {
        let image = decode_data_url(&red_dot_data_url()).unwrap();
        assert_eq!((image.width(), image.height()), (2, 2));
        assert!(decode_data_url("https://example.com/a.png").is_err());
        assert!(decode_data_url("data:image/png;base64,!!!").is_err());
    }

    #[test]
    fn test_drawing_fills_canvas() {
        let edit = EditDescription {
            drawing_data_url: Some(red_dot_data_url()),
            ..Default::default()
        };
        let canvas = OverlayRenderer::new(8, 6, None, None).render(&edit).unwrap();
        assert_eq!(canvas.dimensions(), (8, 6));
        assert_eq!(*canvas.get_pixel(4, 3), Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_image_sticker_is_centred_and_scaled() {
        let edit = EditDescription {
            stickers: vec![Sticker {
                emoji: None,
                image_data_url: Some(red_dot_data_url()),
                x: 0.5,
                y: 0.5,
                size: 10.0,
            }],
            ..Default::default()
        };
        // Preview was half the source height, so the sticker doubles to 20px.
        let canvas = OverlayRenderer::new(100, 100, Some(50), None)
            .render(&edit)
            .unwrap();
        assert_eq!(canvas.get_pixel(50, 50)[3], 255);
        assert_eq!(canvas.get_pixel(41, 50)[3], 255);
        assert_eq!(canvas.get_pixel(38, 50)[3], 0);
        assert_eq!(canvas.get_pixel(0, 0)[3], 0);
    }

    #[test]
    fn test_text_without_font_fails() {
        let edit = EditDescription {
            texts: vec![TextOverlay {
                text: "hello".into(),
                x: 0.5,
                y: 0.5,
                font_size: 32.0,
                color: "#ffffff".into(),
                background_color: None,
            }],
            ..Default::default()
        };
        let err = OverlayRenderer::new(16, 16, None, None)
            .render(&edit)
            .unwrap_err();
        assert!(matches!(err, ClipsmithError::Overlay { .. }));
    }

    #[test]
    fn test_emoji_sticker_without_font_fails() {
        let edit = EditDescription {
            stickers: vec![Sticker {
                emoji: Some("*".into()),
                image_data_url: None,
                x: 0.5,
                y: 0.5,
                size: 10.0,
            }],
            ..Default::default()
        };
        assert!(OverlayRenderer::new(16, 16, None, None).render(&edit).is_err());
    }

    #[test]
    fn test_png_output_decodes() {
        let png = OverlayRenderer::new(4, 4, None, None)
            .render_png(&EditDescription::default())
            .unwrap();
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!(decoded.width(), 4);
    }

    #[test]
    fn test_fill_rect_clips_to_canvas() {
        let mut canvas = RgbaImage::new(4, 4);
        fill_rect(&mut canvas, -2.0, -2.0, 4.0, 4.0, Rgba([0, 0, 0, 255]));
        assert_eq!(canvas.get_pixel(1, 1)[3], 255);
        assert_eq!(canvas.get_pixel(2, 2)[3], 0);
    }
}
