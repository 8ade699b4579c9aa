use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use soilsight::texture::{encode, SampleRounding, TextureParams, TexturePlan};
use soilsight::{ImageView, SoilSightError};

fn random_gray(width: usize, height: usize, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..width * height).map(|_| rng.random_range(0..=255u8)).collect()
}

#[test]
fn default_plan_starts_below_center() {
    let plan = TexturePlan::new(&TextureParams::default()).unwrap();
    assert_eq!(
        plan.offsets(),
        &[(1, 0), (1, 1), (0, 1), (-1, 1), (-1, 0), (-1, -1), (0, -1), (1, -1)]
    );
    assert_eq!(plan.max_code(), 255);
}

#[test]
fn truncation_collapses_diagonals_onto_center() {
    let params = TextureParams {
        rounding: SampleRounding::TowardZero,
        ..TextureParams::default()
    };
    let plan = TexturePlan::new(&params).unwrap();
    assert_eq!(plan.offsets()[0], (1, 0));
    assert_eq!(plan.offsets()[1], (0, 0));
    assert_eq!(plan.offsets()[3], (0, 0));
}

#[test]
fn invalid_params_are_rejected() {
    for params in [
        TextureParams {
            radius: 0,
            ..TextureParams::default()
        },
        TextureParams {
            samples: 0,
            ..TextureParams::default()
        },
        TextureParams {
            samples: 33,
            ..TextureParams::default()
        },
    ] {
        assert!(matches!(
            TexturePlan::new(&params),
            Err(SoilSightError::InvalidParameter { .. })
        ));
    }
}

#[test]
fn uniform_image_sets_every_interior_bit() {
    let data = vec![90u8; 16];
    let view = ImageView::from_slice(&data, 4, 4).unwrap();
    let codes = encode(view, &TextureParams::default()).unwrap();
    for y in 0..4 {
        for x in 0..4 {
            let interior = (1..3).contains(&x) && (1..3).contains(&y);
            let expected = if interior { 255 } else { 0 };
            assert_eq!(codes.get(x, y), Some(expected), "({x}, {y})");
        }
    }
    let (mean, _) = codes.mean_std().unwrap();
    assert!((mean - 63.75).abs() < 1e-12);
}

#[test]
fn single_brighter_neighbor_sets_its_bit() {
    // Center 100, the pixel one row below is 200, all others darker.
    let mut data = vec![50u8; 9];
    data[4] = 100;
    data[7] = 200;
    let view = ImageView::from_slice(&data, 3, 3).unwrap();
    let codes = encode(view, &TextureParams::default()).unwrap();
    assert_eq!(codes.get(1, 1), Some(0b0000_0001));
}

#[test]
fn bright_center_yields_zero_code() {
    let mut data = vec![10u8; 9];
    data[4] = 255;
    let view = ImageView::from_slice(&data, 3, 3).unwrap();
    let codes = encode(view, &TextureParams::default()).unwrap();
    assert!(codes.data().iter().all(|&c| c == 0));
}

#[test]
fn image_smaller_than_ring_is_all_border() {
    let data = random_gray(4, 4, 3);
    let view = ImageView::from_slice(&data, 4, 4).unwrap();
    let params = TextureParams {
        radius: 2,
        ..TextureParams::default()
    };
    let codes = encode(view, &params).unwrap();
    assert_eq!((codes.width(), codes.height()), (4, 4));
    assert!(codes.data().iter().all(|&c| c == 0));
}

#[test]
fn codes_stay_within_sample_width() {
    let (width, height) = (37, 23);
    for (seed, samples) in [(1u64, 4usize), (2, 8), (3, 12), (4, 16)] {
        let data = random_gray(width, height, seed);
        let view = ImageView::from_slice(&data, width, height).unwrap();
        let params = TextureParams {
            radius: 2,
            samples,
            rounding: SampleRounding::Nearest,
        };
        let plan = TexturePlan::new(&params).unwrap();
        let codes = encode(view, &params).unwrap();
        assert_eq!(codes.data().len(), width * height);
        assert!(codes.data().iter().all(|&c| c <= plan.max_code()));
        for x in 0..width {
            assert_eq!(codes.get(x, 0), Some(0));
            assert_eq!(codes.get(x, height - 1), Some(0));
        }
    }
}

#[test]
fn strided_view_matches_packed_view() {
    let (width, height, stride) = (10, 8, 13);
    let packed = random_gray(width, height, 42);
    let mut padded = vec![0u8; stride * height];
    for y in 0..height {
        padded[y * stride..y * stride + width].copy_from_slice(&packed[y * width..(y + 1) * width]);
    }
    let a = encode(
        ImageView::from_slice(&packed, width, height).unwrap(),
        &TextureParams::default(),
    )
    .unwrap();
    let b = encode(
        ImageView::new(&padded, width, height, stride).unwrap(),
        &TextureParams::default(),
    )
    .unwrap();
    assert_eq!(a, b);
}
