//! End-to-end soil analysis: extract, predict, rank.

use crate::catalog::{CropCatalog, SoilType};
use crate::features::{DerivedStrategy, ExtractConfig, FeatureExtractor, FeatureVector};
use crate::image::PixelBuffer;
use crate::predict::{SoilAnalysis, SoilPredictor};
use crate::rank::{rank, RankConfig, ScoredCrop};
use crate::trace::{trace_event, trace_span};
use crate::util::SoilSightResult;
use serde::Serialize;
use std::sync::Arc;

/// Result of analyzing one soil image.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SoilReport {
    pub features: FeatureVector,
    pub analysis: SoilAnalysis,
    pub recommendations: Vec<ScoredCrop>,
}

/// Reusable soil analysis pipeline.
///
/// The catalog is shared behind an [`Arc`]; an analyzer is `Send + Sync` and
/// can serve concurrent requests.
#[derive(Clone, Debug)]
pub struct Analyzer {
    catalog: Arc<CropCatalog>,
    extractor: FeatureExtractor,
    predictor: SoilPredictor,
    rank_cfg: RankConfig,
}

impl Analyzer {
    /// Creates an analyzer with default extraction and ranking settings.
    pub fn new(
        catalog: impl Into<Arc<CropCatalog>>,
        predictor: SoilPredictor,
    ) -> SoilSightResult<Self> {
        Ok(Self {
            catalog: catalog.into(),
            extractor: FeatureExtractor::new(ExtractConfig::default())?,
            predictor,
            rank_cfg: RankConfig::default(),
        })
    }

    /// Replaces the extraction settings.
    pub fn with_extract_config(mut self, cfg: ExtractConfig) -> SoilSightResult<Self> {
        self.extractor = FeatureExtractor::new(cfg)?;
        Ok(self)
    }

    /// Replaces the ranking settings.
    pub fn with_rank_config(mut self, cfg: RankConfig) -> SoilSightResult<Self> {
        cfg.validate()?;
        self.rank_cfg = cfg;
        Ok(self)
    }

    pub fn catalog(&self) -> &CropCatalog {
        &self.catalog
    }

    pub fn predictor(&self) -> &SoilPredictor {
        &self.predictor
    }

    pub fn rank_config(&self) -> &RankConfig {
        &self.rank_cfg
    }

    /// Analyzes one buffer.
    ///
    /// `soil_override`, when given, replaces the predicted soil type. An
    /// unrecognized override label is kept as unknown and scores as a
    /// mismatch.
    pub fn analyze(
        &self,
        buffer: &PixelBuffer,
        soil_override: Option<&str>,
    ) -> SoilSightResult<SoilReport> {
        let _span = trace_span!(
            "analyze",
            width = buffer.width(),
            height = buffer.height()
        )
        .entered();

        let features = self.extractor.extract(buffer, DerivedStrategy::Moisture)?;
        let mut analysis = self.predictor.predict(&features)?;
        if let Some(label) = soil_override {
            analysis.soil_type = SoilType::from_label(label);
        }
        let recommendations = rank(&analysis.conditions(), &self.catalog, &self.rank_cfg);

        trace_event!("analyzed", recommendations = recommendations.len());
        Ok(SoilReport {
            features,
            analysis,
            recommendations,
        })
    }

    /// Analyzes many buffers; results keep input order.
    pub fn analyze_batch(&self, buffers: &[PixelBuffer]) -> Vec<SoilSightResult<SoilReport>> {
        #[cfg(feature = "rayon")]
        {
            if self.extractor.config().parallel {
                use rayon::prelude::*;
                return buffers
                    .par_iter()
                    .map(|buffer| self.analyze(buffer, None))
                    .collect();
            }
        }
        buffers
            .iter()
            .map(|buffer| self.analyze(buffer, None))
            .collect()
    }
}
