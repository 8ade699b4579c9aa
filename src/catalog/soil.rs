//! Closed set of soil-type labels.

use crate::util::SoilSightError;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Soil texture classes understood by the catalog and scorer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SoilType {
    ClayLoam,
    SandyLoam,
    SiltLoam,
    Clay,
    SandyClay,
}

impl SoilType {
    /// Every soil type, in canonical order.
    pub const ALL: [SoilType; 5] = [
        SoilType::ClayLoam,
        SoilType::SandyLoam,
        SoilType::SiltLoam,
        SoilType::Clay,
        SoilType::SandyClay,
    ];

    /// Canonical display label, e.g. `"Clay Loam"`.
    pub fn label(self) -> &'static str {
        match self {
            SoilType::ClayLoam => "Clay Loam",
            SoilType::SandyLoam => "Sandy Loam",
            SoilType::SiltLoam => "Silt Loam",
            SoilType::Clay => "Clay",
            SoilType::SandyClay => "Sandy Clay",
        }
    }

    /// Parses a label ignoring ASCII case and surrounding whitespace.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|soil| soil.label().eq_ignore_ascii_case(label))
    }
}

impl fmt::Display for SoilType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SoilType {
    type Err = SoilSightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| SoilSightError::UnknownSoilType {
            label: s.to_string(),
        })
    }
}

impl Serialize for SoilType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::SoilType;

    #[test]
    fn labels_round_trip_case_insensitively() {
        for soil in SoilType::ALL {
            assert_eq!(SoilType::from_label(soil.label()), Some(soil));
            let shouted = soil.label().to_uppercase();
            assert_eq!(SoilType::from_label(&format!("  {shouted} ")), Some(soil));
        }
    }

    #[test]
    fn unknown_labels_do_not_parse() {
        assert!(SoilType::from_label("Black Soil").is_none());
        assert!("".parse::<SoilType>().is_err());
    }
}
