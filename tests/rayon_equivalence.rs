#![cfg(feature = "rayon")]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use soilsight::texture::rayon::encode_par;
use soilsight::texture::{encode, SampleRounding, TextureParams};
use soilsight::{
    Analyzer, CropCatalog, DerivedStrategy, ExtractConfig, FeatureExtractor, ImageView,
    PixelBuffer, RuleBasedSoil, SoilPredictor,
};

fn random_buffer(width: usize, height: usize, seed: u64) -> PixelBuffer {
    let mut rng = StdRng::seed_from_u64(seed);
    let data = (0..width * height * 3).map(|_| rng.random()).collect();
    PixelBuffer::new(data, width, height).unwrap()
}

#[test]
fn parallel_encoding_matches_sequential() {
    let mut rng = StdRng::seed_from_u64(11);
    let (width, height) = (97, 61);
    let data: Vec<u8> = (0..width * height).map(|_| rng.random()).collect();
    let view = ImageView::from_slice(&data, width, height).unwrap();

    for params in [
        TextureParams::default(),
        TextureParams {
            radius: 3,
            samples: 16,
            rounding: SampleRounding::TowardZero,
        },
    ] {
        let seq = encode(view, &params).unwrap();
        let par = encode_par(view, &params).unwrap();
        assert_eq!(seq, par);
    }
}

#[test]
fn parallel_extraction_matches_sequential() {
    let sequential = FeatureExtractor::new(ExtractConfig::default()).unwrap();
    let parallel = FeatureExtractor::new(ExtractConfig {
        parallel: true,
        ..ExtractConfig::default()
    })
    .unwrap();

    for seed in 0..4 {
        let buffer = random_buffer(45, 33, seed);
        for strategy in [DerivedStrategy::Moisture, DerivedStrategy::EdgeDensity] {
            assert_eq!(
                sequential.extract(&buffer, strategy).unwrap(),
                parallel.extract(&buffer, strategy).unwrap()
            );
        }
    }
}

#[test]
fn parallel_batch_matches_sequential() {
    let buffers: Vec<PixelBuffer> = (0..6).map(|seed| random_buffer(20, 16, seed)).collect();
    let predictor = SoilPredictor::RuleBased(RuleBasedSoil::default());

    let sequential = Analyzer::new(CropCatalog::builtin(), predictor.clone()).unwrap();
    let parallel = Analyzer::new(CropCatalog::builtin(), predictor)
        .unwrap()
        .with_extract_config(ExtractConfig {
            parallel: true,
            ..ExtractConfig::default()
        })
        .unwrap();

    let a = sequential.analyze_batch(&buffers);
    let b = parallel.analyze_batch(&buffers);
    assert_eq!(a, b);
}
