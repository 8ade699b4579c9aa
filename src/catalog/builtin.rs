//! Built-in crop reference table.
//!
//! Entries are listed in regional-relevance order, which doubles as the
//! ranking tie-break order.

use super::{CropMetadata, CropProfile, SoilType};
use super::soil::SoilType::{Clay, ClayLoam, SandyLoam, SiltLoam};

struct Row {
    id: &'static str,
    ph: (f64, f64),
    moisture: (f64, f64),
    soils: &'static [SoilType],
    season: &'static str,
    water: &'static str,
    expected_yield: &'static str,
    planting_time: &'static str,
    price: f64,
    price_unit: &'static str,
    benefits: &'static [&'static str],
}

const ROWS: [Row; 8] = [
    Row {
        id: "Wheat",
        ph: (6.0, 8.0),
        moisture: (30.0, 80.0),
        soils: &[ClayLoam, SiltLoam],
        season: "Rabi",
        water: "medium",
        expected_yield: "45-50 quintals/hectare",
        planting_time: "October-November",
        price: 2200.0,
        price_unit: "per_quintal",
        benefits: &[
            "High nutritional value",
            "Good market demand",
            "Suitable for your soil type",
            "Drought resistant varieties available",
        ],
    },
    Row {
        id: "Rice",
        ph: (5.5, 7.5),
        moisture: (60.0, 90.0),
        soils: &[ClayLoam, Clay],
        season: "Kharif",
        water: "high",
        expected_yield: "35-40 quintals/hectare",
        planting_time: "June-July",
        price: 1800.0,
        price_unit: "per_quintal",
        benefits: &[
            "Staple food crop",
            "High water retention soil suitable",
            "Good market price",
            "Multiple varieties available",
        ],
    },
    Row {
        id: "Mustard",
        ph: (6.5, 8.5),
        moisture: (20.0, 70.0),
        soils: &[ClayLoam, SandyLoam],
        season: "Rabi",
        water: "low",
        expected_yield: "15-20 quintals/hectare",
        planting_time: "October-November",
        price: 4500.0,
        price_unit: "per_quintal",
        benefits: &[
            "Oilseed crop with high value",
            "Low water requirement",
            "Good for crop rotation",
            "High market demand",
        ],
    },
    Row {
        id: "Sugarcane",
        ph: (6.0, 8.0),
        moisture: (50.0, 90.0),
        soils: &[ClayLoam, Clay],
        season: "Kharif",
        water: "high",
        expected_yield: "80-100 tons/hectare",
        planting_time: "February-March",
        price: 3200.0,
        price_unit: "per_ton",
        benefits: &[
            "High value cash crop",
            "Good for industrial use",
            "Long-term crop",
            "High yield potential",
        ],
    },
    Row {
        id: "Cotton",
        ph: (6.5, 8.5),
        moisture: (40.0, 80.0),
        soils: &[SandyLoam, ClayLoam],
        season: "Kharif",
        water: "medium",
        expected_yield: "15-20 quintals/hectare",
        planting_time: "May-June",
        price: 6500.0,
        price_unit: "per_quintal",
        benefits: &[
            "Fiber crop with high value",
            "Good for textile industry",
            "Drought resistant varieties",
            "Export potential",
        ],
    },
    Row {
        id: "Maize",
        ph: (6.0, 8.0),
        moisture: (40.0, 80.0),
        soils: &[SandyLoam, SiltLoam],
        season: "Kharif",
        water: "medium",
        expected_yield: "40-50 quintals/hectare",
        planting_time: "June-July",
        price: 2000.0,
        price_unit: "per_quintal",
        benefits: &[
            "High yield potential",
            "Good for animal feed",
            "Multiple uses",
            "Short duration crop",
        ],
    },
    Row {
        id: "Potato",
        ph: (5.5, 7.5),
        moisture: (50.0, 90.0),
        soils: &[SandyLoam, SiltLoam],
        season: "Rabi",
        water: "high",
        expected_yield: "25-30 tons/hectare",
        planting_time: "October-November",
        price: 1500.0,
        price_unit: "per_ton",
        benefits: &[
            "High nutritional value",
            "Good market demand",
            "Short duration crop",
            "Multiple varieties available",
        ],
    },
    Row {
        id: "Tomato",
        ph: (6.0, 7.5),
        moisture: (50.0, 80.0),
        soils: &[SandyLoam, SiltLoam],
        season: "Kharif",
        water: "medium",
        expected_yield: "30-40 tons/hectare",
        planting_time: "March-April",
        price: 3000.0,
        price_unit: "per_ton",
        benefits: &[
            "High value vegetable",
            "Good market demand",
            "Short duration crop",
            "Multiple varieties available",
        ],
    },
];

pub(super) fn crop_profiles() -> Vec<CropProfile> {
    ROWS.iter()
        .map(|row| {
            let mut soil_types = row.soils.to_vec();
            soil_types.sort();
            CropProfile {
                id: row.id.to_string(),
                min_ph: row.ph.0,
                max_ph: row.ph.1,
                min_moisture: row.moisture.0,
                max_moisture: row.moisture.1,
                soil_types,
                metadata: CropMetadata {
                    season: row.season.to_string(),
                    expected_yield: row.expected_yield.to_string(),
                    planting_time: row.planting_time.to_string(),
                    water_requirement: row.water.to_string(),
                    market_price: row.price,
                    price_unit: row.price_unit.to_string(),
                    benefits: row.benefits.iter().map(|b| b.to_string()).collect(),
                },
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::crop_profiles;
    use crate::catalog::{CropCatalog, CropProfileRecord};

    #[test]
    fn builtin_profiles_pass_load_validation() {
        let records: Vec<CropProfileRecord> = crop_profiles().iter().map(Into::into).collect();
        let reloaded = CropCatalog::from_records(records).unwrap();
        assert_eq!(reloaded, CropCatalog::builtin());
    }

    #[test]
    fn builtin_order_is_stable() {
        let ids: Vec<String> = crop_profiles().iter().map(|p| p.id().to_string()).collect();
        assert_eq!(
            ids,
            ["Wheat", "Rice", "Mustard", "Sugarcane", "Cotton", "Maize", "Potato", "Tomato"]
        );
    }
}
