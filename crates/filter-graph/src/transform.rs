//! Rotation and mirroring.

use clipsmith_edit_model::Transform;

/// Filter terms for a transform, rotation first, then flips.
pub fn transform_filters(transform: &Transform) -> Vec<&'static str> {
    let mut terms = match transform.quarter_turns() {
        1 => vec!["transpose=1"],
        2 => vec!["transpose=1", "transpose=1"],
        3 => vec!["transpose=2"],
        _ => Vec::new(),
    };
    if transform.flip_h {
        terms.push("hflip");
    }
    if transform.flip_v {
        terms.push("vflip");
    }
    terms
}

/// The transform as one comma-joined chain segment.
pub fn transform_filter(transform: &Transform) -> Option<String> {
    let terms = transform_filters(transform);
    (!terms.is_empty()).then(|| terms.join(","))
}
