use clap::Parser;
use soilsight::image::io::load_pixel_buffer;
use soilsight::{
    Analyzer, CropCatalog, DerivedStrategy, EdgeParams, ExtractConfig, FeatureExtractor,
    FeatureVector, LinearPestModel, LinearSoilModel, PestCatalog, PestDetection, PestDetector,
    RankConfig, RuleBasedSoil, SampleRounding, SoilPredictor, TextureParams,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "SoilSight CLI (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ModeConfig {
    Soil,
    Pest,
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum RoundingConfig {
    Nearest,
    TowardZero,
}

impl From<RoundingConfig> for SampleRounding {
    fn from(value: RoundingConfig) -> Self {
        match value {
            RoundingConfig::Nearest => SampleRounding::Nearest,
            RoundingConfig::TowardZero => SampleRounding::TowardZero,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct TextureConfigJson {
    radius: usize,
    samples: usize,
    rounding: RoundingConfig,
}

impl Default for TextureConfigJson {
    fn default() -> Self {
        let cfg = TextureParams::default();
        Self {
            radius: cfg.radius,
            samples: cfg.samples,
            rounding: RoundingConfig::Nearest,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct EdgeConfigJson {
    low: f64,
    high: f64,
}

impl Default for EdgeConfigJson {
    fn default() -> Self {
        let cfg = EdgeParams::default();
        Self {
            low: cfg.low,
            high: cfg.high,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct Config {
    image_path: String,
    mode: ModeConfig,
    catalog_path: Option<String>,
    soil_model_path: Option<String>,
    pest_model_path: Option<String>,
    soil_type: Option<String>,
    ph: f64,
    threshold: f64,
    top_k: usize,
    texture: TextureConfigJson,
    edge: EdgeConfigJson,
    parallel: bool,
    output_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        let rules = RuleBasedSoil::default();
        let rank = RankConfig::default();
        Self {
            image_path: String::new(),
            mode: ModeConfig::Soil,
            catalog_path: None,
            soil_model_path: None,
            pest_model_path: None,
            soil_type: None,
            ph: rules.ph,
            threshold: rank.threshold,
            top_k: rank.top_k,
            texture: TextureConfigJson::default(),
            edge: EdgeConfigJson::default(),
            parallel: false,
            output_path: None,
        }
    }
}

impl Config {
    fn extract_config(&self) -> ExtractConfig {
        ExtractConfig {
            texture: TextureParams {
                radius: self.texture.radius,
                samples: self.texture.samples,
                rounding: self.texture.rounding.into(),
            },
            edge: EdgeParams {
                low: self.edge.low,
                high: self.edge.high,
            },
            parallel: self.parallel,
        }
    }
}

#[derive(Debug, Serialize)]
struct PestOutput {
    features: FeatureVector,
    detection: Option<PestDetection>,
    confidence_pct: Option<f64>,
}

fn run_soil(config: &Config) -> Result<String, Box<dyn std::error::Error>> {
    let catalog = match &config.catalog_path {
        Some(path) => CropCatalog::from_path(path)?,
        None => CropCatalog::builtin(),
    };
    let predictor = match &config.soil_model_path {
        Some(path) => SoilPredictor::TrainedModel(LinearSoilModel::from_path(path)?),
        None => SoilPredictor::RuleBased(RuleBasedSoil {
            ph: config.ph,
            soil_type: None,
        }),
    };
    let analyzer = Analyzer::new(catalog, predictor)?
        .with_extract_config(config.extract_config())?
        .with_rank_config(RankConfig {
            threshold: config.threshold,
            top_k: config.top_k,
        })?;

    let buffer = load_pixel_buffer(&config.image_path)?;
    let report = analyzer.analyze(&buffer, config.soil_type.as_deref())?;
    Ok(serde_json::to_string_pretty(&report)?)
}

fn run_pest(config: &Config) -> Result<String, Box<dyn std::error::Error>> {
    let detector = match &config.pest_model_path {
        Some(path) => {
            PestDetector::TrainedModel(LinearPestModel::from_path(path, PestCatalog::builtin())?)
        }
        None => PestDetector::RuleBased,
    };
    let extractor = FeatureExtractor::new(config.extract_config())?;

    let buffer = load_pixel_buffer(&config.image_path)?;
    let features = extractor.extract(&buffer, DerivedStrategy::EdgeDensity)?;
    let detection = detector.detect(&features)?;
    let output = PestOutput {
        features,
        confidence_pct: detection.as_ref().map(PestDetection::confidence_pct),
        detection,
    };
    Ok(serde_json::to_string_pretty(&output)?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("soilsight=info".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.image_path.is_empty() {
        return Err("image_path must be set in the config".into());
    }
    if config.top_k == 0 {
        return Err("top_k must be at least 1".into());
    }

    let json = match config.mode {
        ModeConfig::Soil => run_soil(&config)?,
        ModeConfig::Pest => run_pest(&config)?,
    };

    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
