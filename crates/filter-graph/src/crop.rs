//! Crop geometry.
//!
//! Both crop modes resolve to a pixel rectangle whose width and height are
//! even, as required by 4:2:0 chroma subsampling.

use clipsmith_edit_model::{CropSpec, NormalizedRect};

/// A crop rectangle in source pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRegion {
    pub width: u32,
    pub height: u32,
    pub x: u32,
    pub y: u32,
}

impl CropRegion {
    /// `crop=w:h:x:y`
    pub fn to_filter(&self) -> String {
        format!("crop={}:{}:{}:{}", self.width, self.height, self.x, self.y)
    }

    /// Whether the region is the whole `width x height` frame.
    pub fn covers(&self, width: u32, height: u32) -> bool {
        self.x == 0 && self.y == 0 && self.width == width && self.height == height
    }
}

/// Resolve a crop request against the source dimensions.
///
/// Returns `None` when the request means "no crop" (`free`, `original`,
/// unparseable ratios) or the frame is too small to crop.
pub fn compute_crop(spec: &CropSpec, width: u32, height: u32) -> Option<CropRegion> {
    if width < 2 || height < 2 {
        return None;
    }
    match spec {
        CropSpec::Aspect { .. } => {
            let (rw, rh) = spec.aspect_ratio()?;
            Some(aspect_region(rw / rh, width, height))
        }
        CropSpec::Rect(rect) => Some(rect_region(rect, width, height)),
    }
}

/// `crop` term for a request, or `None` when nothing would be removed.
pub fn crop_filter(spec: &CropSpec, width: u32, height: u32) -> Option<String> {
    let region = compute_crop(spec, width, height)?;
    if region.covers(width, height) {
        return None;
    }
    Some(region.to_filter())
}

fn aspect_region(target: f64, width: u32, height: u32) -> CropRegion {
    let (w, h) = (f64::from(width), f64::from(height));
    let video_aspect = w / h;

    let (cw, ch) = if target > video_aspect {
        (width, (w / target).round() as u32)
    } else {
        ((h * target).round() as u32, height)
    };
    let cw = even_floor(cw.min(width));
    let ch = even_floor(ch.min(height));

    CropRegion {
        width: cw,
        height: ch,
        x: (width - cw) / 2,
        y: (height - ch) / 2,
    }
}

fn rect_region(rect: &NormalizedRect, width: u32, height: u32) -> CropRegion {
    let rect = rect.clamped();
    let (w, h) = (f64::from(width), f64::from(height));

    let cw = even_floor(((rect.width * w).round() as u32).min(width));
    let ch = even_floor(((rect.height * h).round() as u32).min(height));
    let x = ((rect.x * w).round() as u32).min(width - cw);
    let y = ((rect.y * h).round() as u32).min(height - ch);

    CropRegion {
        width: cw,
        height: ch,
        x,
        y,
    }
}

/// Round down to an even value, never below 2.
fn even_floor(value: u32) -> u32 {
    (value - value % 2).max(2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aspect(s: &str) -> CropSpec {
        CropSpec::Aspect {
            aspect: s.to_string(),
        }
    }

    #[test]
    fn test_square_crop_on_landscape() {
        let region = compute_crop(&aspect("1:1"), 1920, 1080).unwrap();
        assert_eq!(
            region,
            CropRegion {
                width: 1080,
                height: 1080,
                x: 420,
                y: 0
            }
        );
        assert_eq!(
            crop_filter(&aspect("1:1"), 1920, 1080).as_deref(),
            Some("crop=1080:1080:420:0")
        );
    }

    #[test]
    fn test_square_crop_on_portrait() {
        let region = compute_crop(&aspect("1:1"), 1080, 1920).unwrap();
        assert_eq!(region.width, 1080);
        assert_eq!(region.height, 1080);
        assert_eq!((region.x, region.y), (0, 420));
    }

    #[test]
    fn test_matching_aspect_is_no_op() {
        assert_eq!(crop_filter(&aspect("16:9"), 1920, 1080), None);
        assert_eq!(crop_filter(&aspect("free"), 1920, 1080), None);
        assert_eq!(crop_filter(&aspect("original"), 1920, 1080), None);
    }

    #[test]
    fn test_odd_dimensions_round_down() {
        let region = compute_crop(&aspect("4:5"), 1281, 721).unwrap();
        assert_eq!(region.width % 2, 0);
        assert_eq!(region.height % 2, 0);
        assert!(region.width <= 1281 && region.height <= 721);
    }

    #[test]
    fn test_free_rect_scales_to_pixels() {
        let spec = CropSpec::Rect(NormalizedRect::new(0.25, 0.25, 0.5, 0.5));
        assert_eq!(
            crop_filter(&spec, 1920, 1080).as_deref(),
            Some("crop=960:540:480:270")
        );
    }

    #[test]
    fn test_free_rect_stays_inside_frame() {
        let spec = CropSpec::Rect(NormalizedRect {
            x: 0.9,
            y: 0.9,
            width: 0.5,
            height: 0.5,
        });
        let region = compute_crop(&spec, 1000, 1000).unwrap();
        assert!(region.x + region.width <= 1000);
        assert!(region.y + region.height <= 1000);
    }

    #[test]
    fn test_tiny_frame_is_not_cropped() {
        assert_eq!(compute_crop(&aspect("1:1"), 1, 1), None);
    }
}
