//! Crop reference data validated at load time.
//!
//! A [`CropCatalog`] is an ordered, immutable list of [`CropProfile`]s. Order
//! matters: ranking breaks score ties by catalog position. Catalogs are
//! loaded once (from JSON or the built-in table), validated into closed types,
//! and then only read, so one instance can be shared across threads.

mod builtin;
mod soil;

pub use soil::SoilType;

use crate::trace::{trace_event, trace_span};
use crate::util::{SoilSightError, SoilSightResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Valid pH scale.
pub const PH_RANGE: (f64, f64) = (0.0, 14.0);
/// Valid moisture percentage range.
pub const MOISTURE_RANGE: (f64, f64) = (0.0, 100.0);

/// Descriptive crop data carried through ranking untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CropMetadata {
    pub season: String,
    pub expected_yield: String,
    pub planting_time: String,
    pub water_requirement: String,
    pub market_price: f64,
    pub price_unit: String,
    pub benefits: Vec<String>,
}

/// Unvalidated crop entry as it appears in catalog files.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CropProfileRecord {
    pub id: String,
    pub min_ph: f64,
    pub max_ph: f64,
    pub min_moisture: f64,
    pub max_moisture: f64,
    pub soil_types: Vec<String>,
    #[serde(default)]
    pub metadata: CropMetadata,
}

/// Validated growing conditions for one crop.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CropProfile {
    id: String,
    min_ph: f64,
    max_ph: f64,
    min_moisture: f64,
    max_moisture: f64,
    soil_types: Vec<SoilType>,
    metadata: CropMetadata,
}

impl CropProfile {
    /// Crop identifier, also the localization key downstream.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Admissible pH interval `(min, max)`, inclusive.
    pub fn ph_range(&self) -> (f64, f64) {
        (self.min_ph, self.max_ph)
    }

    /// Admissible moisture interval `(min, max)` in percent, inclusive.
    pub fn moisture_range(&self) -> (f64, f64) {
        (self.min_moisture, self.max_moisture)
    }

    /// Admissible soil types, sorted and deduplicated.
    pub fn soil_types(&self) -> &[SoilType] {
        &self.soil_types
    }

    /// Returns `true` if `soil` is admissible for this crop.
    pub fn accepts(&self, soil: SoilType) -> bool {
        self.soil_types.contains(&soil)
    }

    pub fn metadata(&self) -> &CropMetadata {
        &self.metadata
    }
}

fn check_range(
    id: &str,
    min: f64,
    max: f64,
    bounds: (f64, f64),
    what: &'static str,
) -> SoilSightResult<()> {
    let invalid = |reason: &'static str| SoilSightError::InvalidProfile {
        crop: id.to_string(),
        reason,
    };
    if !min.is_finite() || !max.is_finite() {
        return Err(invalid(what));
    }
    if min > max {
        return Err(invalid("range minimum exceeds maximum"));
    }
    if min < bounds.0 || max > bounds.1 {
        return Err(invalid(what));
    }
    Ok(())
}

impl TryFrom<CropProfileRecord> for CropProfile {
    type Error = SoilSightError;

    fn try_from(record: CropProfileRecord) -> SoilSightResult<Self> {
        let id = record.id.trim().to_string();
        if id.is_empty() {
            return Err(SoilSightError::InvalidProfile {
                crop: record.id,
                reason: "empty crop id",
            });
        }
        check_range(
            &id,
            record.min_ph,
            record.max_ph,
            PH_RANGE,
            "pH bounds must be finite and within 0..=14",
        )?;
        check_range(
            &id,
            record.min_moisture,
            record.max_moisture,
            MOISTURE_RANGE,
            "moisture bounds must be finite and within 0..=100",
        )?;

        let mut soil_types = record
            .soil_types
            .iter()
            .map(|label| label.parse::<SoilType>())
            .collect::<SoilSightResult<Vec<_>>>()?;
        soil_types.sort();
        soil_types.dedup();
        if soil_types.is_empty() {
            return Err(SoilSightError::InvalidProfile {
                crop: id,
                reason: "no admissible soil types",
            });
        }

        let price = record.metadata.market_price;
        if !price.is_finite() || price < 0.0 {
            return Err(SoilSightError::InvalidProfile {
                crop: id,
                reason: "market price must be finite and non-negative",
            });
        }

        Ok(Self {
            id,
            min_ph: record.min_ph,
            max_ph: record.max_ph,
            min_moisture: record.min_moisture,
            max_moisture: record.max_moisture,
            soil_types,
            metadata: record.metadata,
        })
    }
}

impl From<&CropProfile> for CropProfileRecord {
    fn from(profile: &CropProfile) -> Self {
        Self {
            id: profile.id.clone(),
            min_ph: profile.min_ph,
            max_ph: profile.max_ph,
            min_moisture: profile.min_moisture,
            max_moisture: profile.max_moisture,
            soil_types: profile
                .soil_types
                .iter()
                .map(|s| s.label().to_string())
                .collect(),
            metadata: profile.metadata.clone(),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    crops: Vec<CropProfileRecord>,
}

/// Ordered, read-only set of crop profiles.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CropCatalog {
    profiles: Vec<CropProfile>,
}

impl CropCatalog {
    /// Builds a catalog, rejecting duplicate ids. Input order is preserved.
    pub fn new(profiles: Vec<CropProfile>) -> SoilSightResult<Self> {
        let mut seen = HashSet::with_capacity(profiles.len());
        for profile in &profiles {
            if !seen.insert(profile.id.to_ascii_lowercase()) {
                return Err(SoilSightError::DuplicateEntry {
                    id: profile.id.clone(),
                });
            }
        }
        Ok(Self { profiles })
    }

    /// Validates raw records into a catalog; the first bad entry aborts the load.
    pub fn from_records(records: Vec<CropProfileRecord>) -> SoilSightResult<Self> {
        let profiles = records
            .into_iter()
            .map(CropProfile::try_from)
            .collect::<SoilSightResult<Vec<_>>>()?;
        Self::new(profiles)
    }

    /// Parses a catalog document of the form `{"crops": [...]}`.
    pub fn from_json_str(text: &str) -> SoilSightResult<Self> {
        let _span = trace_span!("load_catalog").entered();
        let file: CatalogFile =
            serde_json::from_str(text).map_err(|err| SoilSightError::CatalogFormat {
                reason: err.to_string(),
            })?;
        let catalog = Self::from_records(file.crops)?;
        trace_event!("catalog_loaded", crops = catalog.len());
        Ok(catalog)
    }

    /// Reads and parses a catalog file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> SoilSightResult<Self> {
        let text =
            std::fs::read_to_string(path).map_err(|err| SoilSightError::CatalogFormat {
                reason: err.to_string(),
            })?;
        Self::from_json_str(&text)
    }

    /// The built-in eight-crop reference catalog.
    pub fn builtin() -> Self {
        Self {
            profiles: builtin::crop_profiles(),
        }
    }

    /// Serializes the catalog in the format accepted by [`from_json_str`](Self::from_json_str).
    pub fn to_json_string(&self) -> SoilSightResult<String> {
        let file = CatalogFile {
            crops: self.profiles.iter().map(Into::into).collect(),
        };
        serde_json::to_string_pretty(&file).map_err(|err| SoilSightError::CatalogFormat {
            reason: err.to_string(),
        })
    }

    /// Returns the number of profiles.
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Returns `true` if the catalog holds no profiles.
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Returns profiles in catalog order.
    pub fn profiles(&self) -> &[CropProfile] {
        &self.profiles
    }

    /// Iterates over profiles in catalog order.
    pub fn iter(&self) -> std::slice::Iter<'_, CropProfile> {
        self.profiles.iter()
    }

    /// Looks up a profile by id, ignoring ASCII case.
    pub fn get(&self, id: &str) -> Option<&CropProfile> {
        self.profiles
            .iter()
            .find(|profile| profile.id.eq_ignore_ascii_case(id))
    }
}

impl<'a> IntoIterator for &'a CropCatalog {
    type Item = &'a CropProfile;
    type IntoIter = std::slice::Iter<'a, CropProfile>;

    fn into_iter(self) -> Self::IntoIter {
        self.profiles.iter()
    }
}
