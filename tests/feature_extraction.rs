use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use soilsight::{
    extract_features, DerivedStrategy, EdgeParams, ExtractConfig, FeatureExtractor,
    FeatureVector, PixelBuffer, SoilSightError, FEATURE_LEN,
};

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn step_edge(width: usize, height: usize) -> PixelBuffer {
    PixelBuffer::from_fn(width, height, |x, _| {
        if x < width / 2 {
            [0, 0, 0]
        } else {
            [255, 255, 255]
        }
    })
    .unwrap()
}

#[test]
fn uniform_image_statistics() {
    let buffer = PixelBuffer::filled(8, 8, [100, 150, 200]).unwrap();
    let fv = extract_features(&buffer, DerivedStrategy::Moisture).unwrap();

    assert_eq!(fv.mean_rgb(), [100.0, 150.0, 200.0]);
    assert_eq!(fv.std_rgb(), [0.0, 0.0, 0.0]);

    // 6x6 interior cells code 255, the 28 border cells code 0.
    let p = 36.0 / 64.0;
    assert!(close(fv.texture_mean(), 255.0 * p));
    assert!(close(fv.texture_std(), 255.0 * (p * (1.0 - p)).sqrt()));

    // Brightness is max(r, g, b) = 200.
    assert!(close(fv.moisture().unwrap(), (1.0 - 200.0 / 255.0) * 100.0));
    assert!(fv.edge_density().is_none());
}

#[test]
fn moisture_spans_black_to_white() {
    let black = PixelBuffer::filled(5, 5, [0, 0, 0]).unwrap();
    let white = PixelBuffer::filled(5, 5, [255, 255, 255]).unwrap();
    let wet = extract_features(&black, DerivedStrategy::Moisture).unwrap();
    let dry = extract_features(&white, DerivedStrategy::Moisture).unwrap();
    assert!(close(wet.derived(), 100.0));
    assert!(close(dry.derived(), 0.0));
}

#[test]
fn one_pixel_image_has_zero_texture() {
    let buffer = PixelBuffer::filled(1, 1, [12, 34, 56]).unwrap();
    let fv = extract_features(&buffer, DerivedStrategy::Moisture).unwrap();
    assert_eq!(fv.texture_mean(), 0.0);
    assert_eq!(fv.texture_std(), 0.0);
}

#[test]
fn zero_area_is_rejected() {
    let buffer = PixelBuffer::new(Vec::new(), 0, 5).unwrap();
    let err = extract_features(&buffer, DerivedStrategy::Moisture)
        .err()
        .unwrap();
    assert_eq!(
        err,
        SoilSightError::InvalidImage {
            width: 0,
            height: 5,
        }
    );
}

#[test]
fn uniform_image_has_no_edges() {
    let buffer = PixelBuffer::filled(16, 16, [80, 60, 40]).unwrap();
    let fv = extract_features(&buffer, DerivedStrategy::EdgeDensity).unwrap();
    assert_eq!(fv.edge_density(), Some(0.0));
    assert!(fv.moisture().is_none());
}

#[test]
fn step_edge_is_one_pixel_wide() {
    let buffer = step_edge(16, 16);
    let fv = extract_features(&buffer, DerivedStrategy::EdgeDensity).unwrap();
    assert!(close(fv.derived(), 16.0 / 256.0));

    let gray = soilsight::image::to_gray(&buffer).unwrap();
    let map = soilsight::detect_edges(gray.view(), &EdgeParams::default()).unwrap();
    for y in 0..16 {
        for x in 0..16 {
            assert_eq!(map.is_edge(x, y), x == 7, "({x}, {y})");
        }
    }
}

#[test]
fn high_threshold_above_gradient_removes_edges() {
    let buffer = step_edge(16, 16);
    let extractor = FeatureExtractor::new(ExtractConfig {
        edge: EdgeParams {
            low: 1500.0,
            high: 2000.0,
        },
        ..ExtractConfig::default()
    })
    .unwrap();
    let fv = extractor
        .extract(&buffer, DerivedStrategy::EdgeDensity)
        .unwrap();
    assert_eq!(fv.derived(), 0.0);
}

#[test]
fn inverted_edge_thresholds_are_rejected() {
    let cfg = ExtractConfig {
        edge: EdgeParams {
            low: 200.0,
            high: 100.0,
        },
        ..ExtractConfig::default()
    };
    assert!(matches!(
        FeatureExtractor::new(cfg),
        Err(SoilSightError::InvalidParameter { .. })
    ));
}

#[test]
fn random_images_give_finite_bounded_vectors() {
    let mut rng = StdRng::seed_from_u64(7);
    let extractor = FeatureExtractor::new(ExtractConfig::default()).unwrap();
    for _ in 0..8 {
        let width = rng.random_range(1..40usize);
        let height = rng.random_range(1..40usize);
        let data: Vec<u8> = (0..width * height * 3).map(|_| rng.random()).collect();
        let buffer = PixelBuffer::new(data, width, height).unwrap();

        for strategy in [DerivedStrategy::Moisture, DerivedStrategy::EdgeDensity] {
            let fv = extractor.extract(&buffer, strategy).unwrap();
            let values = fv.as_array();
            assert_eq!(values.len(), FEATURE_LEN);
            assert!(values.iter().all(|v| v.is_finite()));
            assert!(fv.mean_rgb().iter().all(|&m| (0.0..=255.0).contains(&m)));
            assert!(fv.texture_mean() >= 0.0 && fv.texture_mean() <= 255.0);
            match strategy {
                DerivedStrategy::Moisture => assert!((0.0..=100.0).contains(&fv.derived())),
                DerivedStrategy::EdgeDensity => assert!((0.0..=1.0).contains(&fv.derived())),
            }
        }
    }
}

#[test]
fn extraction_is_deterministic() {
    let buffer = PixelBuffer::from_fn(24, 18, |x, y| {
        [(x * 7 + y) as u8, ((x ^ y) * 9) as u8, (y * 13) as u8]
    })
    .unwrap();
    let a = extract_features(&buffer, DerivedStrategy::Moisture).unwrap();
    let b = extract_features(&buffer, DerivedStrategy::Moisture).unwrap();
    assert_eq!(a, b);
}

#[test]
fn vector_round_trips_through_positional_layout() {
    let values = [1.0, 2.0, 3.0, 0.5, 0.25, 0.125, 40.0, 12.0, 55.0];
    let fv = FeatureVector::from_array(values, DerivedStrategy::Moisture).unwrap();
    assert_eq!(fv.as_array(), values);
    assert_eq!(fv.moisture(), Some(55.0));

    let mut bad = values;
    bad[6] = f64::NAN;
    assert!(matches!(
        FeatureVector::from_array(bad, DerivedStrategy::Moisture),
        Err(SoilSightError::FeatureExtraction { .. })
    ));
}
