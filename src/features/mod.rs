//! Fixed-length feature vectors extracted from pixel buffers.
//!
//! A vector holds nine scalars in a fixed order:
//! `[mean_r, mean_g, mean_b, std_r, std_g, std_b, texture_mean, texture_std,
//! derived]`. The derived slot is either a moisture estimate in `[0, 100]`
//! (darker soil reads as wetter) or an edge density in `[0, 1]`, depending on
//! the [`DerivedStrategy`] the caller asked for. All standard deviations are
//! population statistics.

use crate::edge::{edge_density, EdgeParams};
use crate::image::convert::value_channel;
use crate::image::{to_gray, PixelBuffer};
use crate::texture::{encode_with_plan, TextureParams, TexturePlan};
use crate::trace::{trace_event, trace_span};
use crate::util::math::Moments;
use crate::util::{SoilSightError, SoilSightResult};
use serde::{Deserialize, Serialize};

/// Number of scalars in a [`FeatureVector`].
pub const FEATURE_LEN: usize = 9;

/// Which quantity populates the ninth feature slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DerivedStrategy {
    /// `(1 - mean(max(r, g, b)) / 255) * 100`, soil analysis path.
    Moisture,
    /// Fraction of edge pixels, pest analysis path.
    EdgeDensity,
}

impl DerivedStrategy {
    /// Returns the snake_case name of the strategy.
    pub fn as_str(self) -> &'static str {
        match self {
            DerivedStrategy::Moisture => "moisture",
            DerivedStrategy::EdgeDensity => "edge_density",
        }
    }
}

/// Immutable nine-slot feature vector.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct FeatureVector {
    mean_rgb: [f64; 3],
    std_rgb: [f64; 3],
    texture_mean: f64,
    texture_std: f64,
    derived: f64,
    strategy: DerivedStrategy,
}

impl FeatureVector {
    /// Rebuilds a vector from its positional layout, e.g. after persistence.
    pub fn from_array(
        values: [f64; FEATURE_LEN],
        strategy: DerivedStrategy,
    ) -> SoilSightResult<Self> {
        if values.iter().any(|v| !v.is_finite()) {
            return Err(SoilSightError::FeatureExtraction {
                reason: "feature values must be finite",
            });
        }
        Ok(Self {
            mean_rgb: [values[0], values[1], values[2]],
            std_rgb: [values[3], values[4], values[5]],
            texture_mean: values[6],
            texture_std: values[7],
            derived: values[8],
            strategy,
        })
    }

    /// Returns the nine values in positional order.
    pub fn as_array(&self) -> [f64; FEATURE_LEN] {
        [
            self.mean_rgb[0],
            self.mean_rgb[1],
            self.mean_rgb[2],
            self.std_rgb[0],
            self.std_rgb[1],
            self.std_rgb[2],
            self.texture_mean,
            self.texture_std,
            self.derived,
        ]
    }

    /// Per-channel means `[r, g, b]`.
    pub fn mean_rgb(&self) -> [f64; 3] {
        self.mean_rgb
    }

    /// Per-channel population standard deviations `[r, g, b]`.
    pub fn std_rgb(&self) -> [f64; 3] {
        self.std_rgb
    }

    pub fn texture_mean(&self) -> f64 {
        self.texture_mean
    }

    pub fn texture_std(&self) -> f64 {
        self.texture_std
    }

    /// Raw value of the ninth slot.
    pub fn derived(&self) -> f64 {
        self.derived
    }

    /// Strategy that produced the ninth slot.
    pub fn strategy(&self) -> DerivedStrategy {
        self.strategy
    }

    /// Moisture percentage if this is a moisture-strategy vector.
    pub fn moisture(&self) -> Option<f64> {
        (self.strategy == DerivedStrategy::Moisture).then_some(self.derived)
    }

    /// Edge density if this is an edge-density-strategy vector.
    pub fn edge_density(&self) -> Option<f64> {
        (self.strategy == DerivedStrategy::EdgeDensity).then_some(self.derived)
    }

    /// Returns the derived value, or `StrategyMismatch` for the other variant.
    pub(crate) fn require(&self, strategy: DerivedStrategy) -> SoilSightResult<f64> {
        if self.strategy != strategy {
            return Err(SoilSightError::StrategyMismatch {
                expected: strategy.as_str(),
                got: self.strategy.as_str(),
            });
        }
        Ok(self.derived)
    }
}

/// Configuration for feature extraction.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExtractConfig {
    /// Texture encoder sampling.
    pub texture: TextureParams,
    /// Edge detector thresholds (edge-density strategy only).
    pub edge: EdgeParams,
    /// Encode texture rows in parallel when the `rayon` feature is enabled.
    pub parallel: bool,
}

/// Reusable extractor holding a validated configuration.
#[derive(Clone, Debug)]
pub struct FeatureExtractor {
    cfg: ExtractConfig,
    plan: TexturePlan,
}

impl FeatureExtractor {
    /// Validates `cfg` and precomputes the texture sampling plan.
    pub fn new(cfg: ExtractConfig) -> SoilSightResult<Self> {
        let plan = TexturePlan::new(&cfg.texture)?;
        cfg.edge.validate()?;
        Ok(Self { cfg, plan })
    }

    /// Returns the extractor configuration.
    pub fn config(&self) -> &ExtractConfig {
        &self.cfg
    }

    /// Extracts a feature vector from `buffer`.
    ///
    /// Fails with `InvalidImage` for zero-area buffers and with
    /// `FeatureExtraction` if any statistic is not finite. No partial vector
    /// is ever returned.
    pub fn extract(
        &self,
        buffer: &PixelBuffer,
        strategy: DerivedStrategy,
    ) -> SoilSightResult<FeatureVector> {
        let width = buffer.width();
        let height = buffer.height();
        if buffer.is_empty() {
            return Err(SoilSightError::InvalidImage { width, height });
        }
        let _span = trace_span!(
            "extract_features",
            width = width,
            height = height,
            strategy = strategy.as_str()
        )
        .entered();

        let mut channels = [Moments::default(); 3];
        let mut value = Moments::default();
        for px in buffer.pixels() {
            for (acc, &sample) in channels.iter_mut().zip(px.iter()) {
                acc.push(f64::from(sample));
            }
            value.push(f64::from(value_channel(px)));
        }

        let mut mean_rgb = [0.0; 3];
        let mut std_rgb = [0.0; 3];
        for (c, acc) in channels.iter().enumerate() {
            let (mean, std) = acc.mean_std().ok_or(SoilSightError::FeatureExtraction {
                reason: "color statistics are not finite",
            })?;
            mean_rgb[c] = mean;
            std_rgb[c] = std;
        }

        let gray = to_gray(buffer)?;
        let codes = self.encode(&gray);
        let (texture_mean, texture_std) =
            codes.mean_std().ok_or(SoilSightError::FeatureExtraction {
                reason: "texture statistics are not finite",
            })?;

        let derived = match strategy {
            DerivedStrategy::Moisture => {
                let (avg_value, _) = value.mean_std().ok_or(SoilSightError::FeatureExtraction {
                    reason: "brightness statistics are not finite",
                })?;
                (1.0 - avg_value / 255.0) * 100.0
            }
            DerivedStrategy::EdgeDensity => edge_density(gray.view(), &self.cfg.edge)?,
        };

        let vector = FeatureVector {
            mean_rgb,
            std_rgb,
            texture_mean,
            texture_std,
            derived,
            strategy,
        };
        if vector.as_array().iter().any(|v| !v.is_finite()) {
            return Err(SoilSightError::FeatureExtraction {
                reason: "feature vector contains non-finite values",
            });
        }

        trace_event!(
            "features_extracted",
            texture_mean = texture_mean,
            texture_std = texture_std,
            derived = derived
        );
        Ok(vector)
    }

    #[cfg(feature = "rayon")]
    fn encode(&self, gray: &crate::image::GrayImage) -> crate::texture::TextureCodes {
        if self.cfg.parallel {
            crate::texture::rayon::encode_with_plan_par(gray.view(), &self.plan)
        } else {
            encode_with_plan(gray.view(), &self.plan)
        }
    }

    #[cfg(not(feature = "rayon"))]
    fn encode(&self, gray: &crate::image::GrayImage) -> crate::texture::TextureCodes {
        encode_with_plan(gray.view(), &self.plan)
    }
}

/// Extracts features with the default configuration.
pub fn extract_features(
    buffer: &PixelBuffer,
    strategy: DerivedStrategy,
) -> SoilSightResult<FeatureVector> {
    FeatureExtractor::new(ExtractConfig::default())?.extract(buffer, strategy)
}
