//! Shape masks.
//!
//! Analytic shapes are drawn into a grayscale plane with `geq`, optionally
//! inverted and feathered, then merged back as alpha and flattened onto
//! black. Because the source has to be split for that, a shape mask is not
//! a single chain term: [`masked_graph`] stitches it between the filters
//! that run before and after it.

use clipsmith_edit_model::{Mask, MaskShape};

use crate::chain::{fmt_num, FilterChain};

/// Fallback for shapes without an analytic form.
pub const VIGNETTE_FILTER: &str = "vignette=PI/4";

/// Largest feather radius passed to `gblur`.
pub const MAX_FEATHER: f64 = 100.0;

/// Circle and diamond radius, as a fraction of the shorter frame side.
const RADIUS_FRACTION: f64 = 0.4;
/// Rectangle half-extent, as a fraction of each axis.
const HALF_EXTENT_FRACTION: f64 = 0.35;

/// What a mask request compiles to.
#[derive(Debug, Clone, PartialEq)]
pub enum MaskFilter {
    Shape(ShapeMask),
    /// A plain chain term (vignette fallback).
    Term(String),
}

/// An analytic shape mask.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeMask {
    /// Per-pixel inclusion test over `X`, `Y`, `W`, `H`.
    pub inside_expr: String,
    pub invert: bool,
    pub feather: f64,
}

impl ShapeMask {
    /// Chain turning a copy of the frame into the alpha plane.
    pub fn alpha_chain(&self) -> String {
        let (inside, outside) = if self.invert { (0, 255) } else { (255, 0) };
        let mut chain = FilterChain::new();
        chain.push("format=gray");
        chain.push(format!(
            "geq=lum='if({},{inside},{outside})'",
            self.inside_expr
        ));
        if self.feather > 0.0 {
            chain.push(format!("gblur=sigma={}", fmt_num(self.feather)));
        }
        chain.build_or("null")
    }
}

/// Inclusion expression for an analytic shape, centred in the frame.
pub fn shape_expr(shape: MaskShape) -> Option<String> {
    let r = fmt_num(RADIUS_FRACTION);
    let e = fmt_num(HALF_EXTENT_FRACTION);
    match shape {
        MaskShape::Circle => Some(format!("lte(hypot(X-W/2,Y-H/2),{r}*min(W,H))")),
        MaskShape::Diamond => Some(format!("lte(abs(X-W/2)+abs(Y-H/2),{r}*min(W,H))")),
        MaskShape::Rectangle => Some(format!(
            "lte(abs(X-W/2),{e}*W)*lte(abs(Y-H/2),{e}*H)"
        )),
        MaskShape::Unsupported => None,
    }
}

pub fn mask_filter(mask: &Mask) -> MaskFilter {
    match shape_expr(mask.shape) {
        Some(inside_expr) => MaskFilter::Shape(ShapeMask {
            inside_expr,
            invert: mask.invert,
            feather: if mask.feather.is_finite() {
                mask.feather.clamp(0.0, MAX_FEATHER)
            } else {
                0.0
            },
        }),
        None => MaskFilter::Term(VIGNETTE_FILTER.to_string()),
    }
}

/// Single-input, single-output graph running `before`, the mask, then
/// `after`.
///
/// The first chain carries no input label and the last no output label, so
/// the result works both as a `-vf` argument and, with labels attached by
/// the caller, inside `-filter_complex`.
pub fn masked_graph(before: &FilterChain, mask: &ShapeMask, after: &FilterChain) -> String {
    let mut head = before.clone();
    head.push("split=2[mskbase][msksrc]");

    let mut tail = FilterChain::new();
    tail.push("[mskbase][mskalpha]alphamerge");
    tail.push("premultiply=inplace=1");
    tail.push("format=yuv420p");
    tail.extend(after.clone());

    format!(
        "{};[msksrc]{}[mskalpha];{}",
        head.build_or("null"),
        mask.alpha_chain(),
        tail.build_or("null")
    )
}
