//! Error types for soilsight.

use thiserror::Error;

/// Result alias for soilsight operations.
pub type SoilSightResult<T> = std::result::Result<T, SoilSightError>;

/// Errors that can occur while extracting features or scoring crops.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum SoilSightError {
    /// The pixel buffer has zero area.
    #[error("invalid image: {width}x{height} has zero area")]
    InvalidImage { width: usize, height: usize },
    /// The backing buffer is shorter than the declared dimensions require.
    #[error("buffer too small: needed {needed}, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// The backing buffer length does not match the declared dimensions.
    #[error("buffer size mismatch: expected {expected}, got {got}")]
    BufferSizeMismatch { expected: usize, got: usize },
    /// The stride is smaller than the row width.
    #[error("invalid stride: width {width}, stride {stride}")]
    InvalidStride { width: usize, stride: usize },
    /// Internal numeric failure while building a feature vector.
    #[error("feature extraction failed: {reason}")]
    FeatureExtraction { reason: &'static str },
    /// A tuning parameter is outside its admissible range.
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter {
        name: &'static str,
        reason: &'static str,
    },
    /// The feature vector carries the other derived-scalar variant.
    #[error("feature vector strategy mismatch: expected {expected}, got {got}")]
    StrategyMismatch {
        expected: &'static str,
        got: &'static str,
    },
    /// A crop profile failed validation at load time.
    #[error("invalid crop profile '{crop}': {reason}")]
    InvalidProfile { crop: String, reason: &'static str },
    /// A soil-type label in reference data is not a known soil type.
    #[error("unknown soil type '{label}'")]
    UnknownSoilType { label: String },
    /// The same identifier appears twice in a catalog.
    #[error("duplicate catalog entry '{id}'")]
    DuplicateEntry { id: String },
    /// Reference data could not be read or parsed.
    #[error("catalog format error: {reason}")]
    CatalogFormat { reason: String },
    /// A trained model file is malformed or inconsistent.
    #[error("invalid model: {reason}")]
    InvalidModel { reason: String },
    /// Image loading failed.
    #[error("image i/o error: {reason}")]
    ImageIo { reason: String },
}
