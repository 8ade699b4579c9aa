use soilsight::{
    DerivedStrategy, FeatureVector, LinearPestModel, LinearSoilModel, PestCatalog, PestDetector,
    PredictorKind, RuleBasedSoil, Severity, SoilPredictor, SoilSightError, SoilType,
};

const ZEROS: &str = "[0, 0, 0, 0, 0, 0, 0, 0, 0]";
const ONES: &str = "[1, 1, 1, 1, 1, 1, 1, 1, 1]";
// Weight only on the derived slot.
const DERIVED: &str = "[0, 0, 0, 0, 0, 0, 0, 0, 1]";

fn soil_model_json(labels: &str, ph_bias: f64) -> String {
    format!(
        r#"{{
            "scaler": {{ "mean": {ZEROS}, "scale": {ONES} }},
            "soil_classifier": {{
                "labels": {labels},
                "weights": [{ZEROS}, {DERIVED}],
                "bias": [0, 0]
            }},
            "ph_regressor": {{ "weights": {ZEROS}, "bias": {ph_bias} }}
        }}"#
    )
}

fn pest_model_json(labels: &str) -> String {
    format!(
        r#"{{
            "scaler": {{ "mean": {ZEROS}, "scale": {ONES} }},
            "pest_classifier": {{
                "labels": {labels},
                "weights": [{ZEROS}, {DERIVED}],
                "bias": [0, 0]
            }}
        }}"#
    )
}

fn moisture_vector(moisture: f64) -> FeatureVector {
    let values = [110.0, 80.0, 55.0, 12.0, 10.0, 9.0, 70.0, 40.0, moisture];
    FeatureVector::from_array(values, DerivedStrategy::Moisture).unwrap()
}

fn edge_vector(density: f64) -> FeatureVector {
    let values = [60.0, 120.0, 40.0, 20.0, 25.0, 18.0, 90.0, 60.0, density];
    FeatureVector::from_array(values, DerivedStrategy::EdgeDensity).unwrap()
}

#[test]
fn rule_based_reports_configured_values() {
    let predictor = SoilPredictor::RuleBased(RuleBasedSoil::default());
    let analysis = predictor.predict(&moisture_vector(42.0)).unwrap();
    assert_eq!(analysis.ph, 7.0);
    assert_eq!(analysis.moisture, 42.0);
    assert_eq!(analysis.soil_type, None);
    assert_eq!(analysis.confidence, None);
    assert_eq!(analysis.source, PredictorKind::RuleBased);
}

#[test]
fn rule_based_rejects_invalid_ph() {
    let predictor = SoilPredictor::RuleBased(RuleBasedSoil {
        ph: f64::NAN,
        soil_type: None,
    });
    assert!(matches!(
        predictor.predict(&moisture_vector(42.0)),
        Err(SoilSightError::InvalidParameter { name: "ph", .. })
    ));
}

#[test]
fn soil_predictors_require_moisture_vectors() {
    let predictor = SoilPredictor::RuleBased(RuleBasedSoil::default());
    assert!(matches!(
        predictor.predict(&edge_vector(0.1)),
        Err(SoilSightError::StrategyMismatch { .. })
    ));
}

#[test]
fn trained_model_classifies_and_regresses() {
    let model =
        LinearSoilModel::from_json_str(&soil_model_json(r#"["Clay Loam", "Sandy Loam"]"#, 6.5))
            .unwrap();
    assert_eq!(model.soil_types(), &[SoilType::ClayLoam, SoilType::SandyLoam]);
    let predictor = SoilPredictor::TrainedModel(model);

    let wet = predictor.predict(&moisture_vector(60.0)).unwrap();
    assert_eq!(wet.soil_type, Some(SoilType::SandyLoam));
    assert!(wet.confidence.unwrap() > 0.99);
    assert_eq!(wet.ph, 6.5);
    assert_eq!(wet.source, PredictorKind::TrainedModel);

    // Equal logits resolve to the first label.
    let dry = predictor.predict(&moisture_vector(0.0)).unwrap();
    assert_eq!(dry.soil_type, Some(SoilType::ClayLoam));
    assert!((dry.confidence.unwrap() - 0.5).abs() < 1e-12);
}

#[test]
fn predicted_ph_is_clamped() {
    let model =
        LinearSoilModel::from_json_str(&soil_model_json(r#"["Clay", "Silt Loam"]"#, 20.0))
            .unwrap();
    let analysis = SoilPredictor::TrainedModel(model)
        .predict(&moisture_vector(10.0))
        .unwrap();
    assert_eq!(analysis.ph, 14.0);
}

#[test]
fn malformed_soil_models_are_rejected() {
    let short = soil_model_json(r#"["Clay", "Silt Loam"]"#, 7.0).replacen(ONES, "[1, 1, 1]", 1);
    assert!(matches!(
        LinearSoilModel::from_json_str(&short),
        Err(SoilSightError::InvalidModel { .. })
    ));

    let zero_scale =
        soil_model_json(r#"["Clay", "Silt Loam"]"#, 7.0).replacen(ONES, ZEROS, 1);
    assert!(matches!(
        LinearSoilModel::from_json_str(&zero_scale),
        Err(SoilSightError::InvalidModel { .. })
    ));

    let one_label = soil_model_json(r#"["Clay"]"#, 7.0);
    assert!(matches!(
        LinearSoilModel::from_json_str(&one_label),
        Err(SoilSightError::InvalidModel { .. })
    ));

    let unknown = soil_model_json(r#"["Clay", "Loess"]"#, 7.0);
    assert!(matches!(
        LinearSoilModel::from_json_str(&unknown),
        Err(SoilSightError::UnknownSoilType { .. })
    ));

    assert!(matches!(
        LinearSoilModel::from_json_str("{}"),
        Err(SoilSightError::InvalidModel { .. })
    ));
}

#[test]
fn rule_based_pest_detector_reports_nothing() {
    let detection = PestDetector::RuleBased.detect(&edge_vector(0.3)).unwrap();
    assert!(detection.is_none());
}

#[test]
fn pest_detectors_require_edge_vectors() {
    assert!(matches!(
        PestDetector::RuleBased.detect(&moisture_vector(40.0)),
        Err(SoilSightError::StrategyMismatch { .. })
    ));
}

#[test]
fn trained_pest_model_resolves_catalog_profiles() {
    let json = pest_model_json(r#"["aphids", "Mites"]"#);
    let model = LinearPestModel::from_json_str(&json, PestCatalog::builtin()).unwrap();
    let detector = PestDetector::TrainedModel(model);

    let dense = detector.detect(&edge_vector(30.0)).unwrap().unwrap();
    assert_eq!(dense.pest.id, "mites");
    assert_eq!(dense.pest.severity, Severity::High);
    assert!(dense.pest.treatment_advice.starts_with("Use miticides"));
    assert_eq!(dense.confidence_pct(), 100.0);

    let sparse = detector.detect(&edge_vector(0.0)).unwrap().unwrap();
    assert_eq!(sparse.pest.id, "aphids");
    assert_eq!(sparse.confidence_pct(), 50.0);
}

#[test]
fn pest_labels_must_exist_in_catalog() {
    let json = pest_model_json(r#"["aphids", "locusts"]"#);
    assert!(matches!(
        LinearPestModel::from_json_str(&json, PestCatalog::builtin()),
        Err(SoilSightError::InvalidModel { .. })
    ));
}
