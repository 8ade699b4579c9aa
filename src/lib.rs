//! SoilSight turns soil photographs into feature vectors and ranks crops by
//! how well they suit the measured conditions.
//!
//! The core is deterministic and CPU-only: an LBP-style texture encoder, a
//! nine-slot feature extractor, a weighted suitability scorer and a
//! thresholded ranker. Optional features add row-parallel encoding via
//! `rayon`, image decoding via `image-io`, and spans via `tracing`.

pub mod catalog;
pub mod edge;
pub mod features;
pub mod image;
pub mod pest;
pub mod pipeline;
pub mod predict;
pub mod rank;
pub mod score;
pub mod texture;
mod trace;
pub mod util;

pub use catalog::{CropCatalog, CropMetadata, CropProfile, CropProfileRecord, SoilType};
pub use edge::{detect_edges, edge_density, EdgeMap, EdgeParams};
pub use features::{
    extract_features, DerivedStrategy, ExtractConfig, FeatureExtractor, FeatureVector, FEATURE_LEN,
};
pub use image::{GrayImage, ImageView, PixelBuffer};
pub use pest::{LinearPestModel, PestCatalog, PestDetection, PestDetector, PestProfile, Severity};
pub use pipeline::{Analyzer, SoilReport};
pub use predict::{LinearSoilModel, PredictorKind, RuleBasedSoil, SoilAnalysis, SoilPredictor};
pub use rank::{rank, recommend, RankConfig, ScoredCrop};
pub use score::{score, score_breakdown, ScoreBreakdown, SoilConditions, Tier};
pub use texture::{encode, SampleRounding, TextureCodes, TextureParams, TexturePlan};
pub use util::{SoilSightError, SoilSightResult};
