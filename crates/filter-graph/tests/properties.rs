use clipsmith_edit_model::{CropSpec, EditDescription, NormalizedRect, Tune};
use clipsmith_filter_graph::{
    compute_crop, tempo_stages, transition_offset, video_filters, CropRegion,
};
use proptest::prelude::*;

const ASPECTS: &[&str] = &["16:9", "9:16", "1:1", "4:5", "4:3", "21:9", "2.35:1"];

fn assert_region_fits(region: CropRegion, width: u32, height: u32) {
    assert_eq!(region.width % 2, 0, "odd width {region:?}");
    assert_eq!(region.height % 2, 0, "odd height {region:?}");
    assert!(region.x + region.width <= width, "{region:?} exceeds {width}");
    assert!(region.y + region.height <= height, "{region:?} exceeds {height}");
}

#[test]
fn square_crop_on_full_hd_matches_reference() {
    let spec = CropSpec::Aspect {
        aspect: "1:1".to_string(),
    };
    let region = compute_crop(&spec, 1920, 1080).expect("1:1 is a ratio");
    assert_eq!(region.to_filter(), "crop=1080:1080:420:0");
}

#[test]
fn neutral_tune_compiles_to_empty_chain() {
    let edit = EditDescription {
        tune: Some(Tune {
            brightness: 0.0,
            contrast: 1.0,
            saturation: 1.0,
            exposure: 0.0,
        }),
        ..Default::default()
    };
    let filters = video_filters(&edit);
    assert!(filters.is_empty());
    assert_eq!(filters.build(), None);
}

proptest! {
    #[test]
    fn aspect_crop_is_even_and_inside_frame(
        width in 2u32..8000,
        height in 2u32..8000,
        aspect in prop::sample::select(ASPECTS),
    ) {
        let spec = CropSpec::Aspect { aspect: aspect.to_string() };
        let region = compute_crop(&spec, width, height).expect("ratio parses");
        assert_region_fits(region, width, height);
    }

    #[test]
    fn free_crop_is_even_and_inside_frame(
        width in 2u32..8000,
        height in 2u32..8000,
        x in -0.5f64..1.5,
        y in -0.5f64..1.5,
        w in 0.0f64..1.5,
        h in 0.0f64..1.5,
    ) {
        let spec = CropSpec::Rect(NormalizedRect { x, y, width: w, height: h });
        let region = compute_crop(&spec, width, height).expect("rect always resolves");
        assert_region_fits(region, width, height);
    }

    #[test]
    fn tempo_stages_multiply_back_to_speed(speed in 0.01f64..100.0) {
        let stages = tempo_stages(speed);
        prop_assert!(!stages.is_empty());
        for stage in &stages {
            prop_assert!((0.5..=2.0).contains(stage), "stage {stage} out of range");
        }
        let product: f64 = stages.iter().product();
        prop_assert!((product - speed).abs() < 1e-3, "{product} != {speed}");
    }

    #[test]
    fn transition_offset_never_exceeds_first_clip(
        clip1 in 0.0f64..600.0,
        duration in 0.0f64..30.0,
    ) {
        let offset = transition_offset(clip1, duration);
        prop_assert!(offset >= 0.0);
        prop_assert!(offset <= clip1);
    }
}
