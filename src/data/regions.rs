//! Static reference tables: recognized regions, regional crop suggestions,
//! and fertilizer nutrient mixes.
//!
//! Everything here is fixed data. The planning core consults it (region
//! whitelist during load, state/UT split for listings) but never derives it.

use std::collections::BTreeSet;

use crate::domain::{NutrientMix, RegionKind, RegionListing};

/// Recognized administrative regions: 28 states followed by 8 union territories.
pub const KNOWN_REGIONS: [(&str, RegionKind); 36] = [
    ("andhra pradesh", RegionKind::State),
    ("arunachal pradesh", RegionKind::State),
    ("assam", RegionKind::State),
    ("bihar", RegionKind::State),
    ("chhattisgarh", RegionKind::State),
    ("goa", RegionKind::State),
    ("gujarat", RegionKind::State),
    ("haryana", RegionKind::State),
    ("himachal pradesh", RegionKind::State),
    ("jharkhand", RegionKind::State),
    ("karnataka", RegionKind::State),
    ("kerala", RegionKind::State),
    ("madhya pradesh", RegionKind::State),
    ("maharashtra", RegionKind::State),
    ("manipur", RegionKind::State),
    ("meghalaya", RegionKind::State),
    ("mizoram", RegionKind::State),
    ("nagaland", RegionKind::State),
    ("odisha", RegionKind::State),
    ("punjab", RegionKind::State),
    ("rajasthan", RegionKind::State),
    ("sikkim", RegionKind::State),
    ("tamil nadu", RegionKind::State),
    ("telangana", RegionKind::State),
    ("tripura", RegionKind::State),
    ("uttar pradesh", RegionKind::State),
    ("uttarakhand", RegionKind::State),
    ("west bengal", RegionKind::State),
    ("andaman and nicobar islands", RegionKind::UnionTerritory),
    ("chandigarh", RegionKind::UnionTerritory),
    ("dadra and nagar haveli and daman and diu", RegionKind::UnionTerritory),
    ("delhi", RegionKind::UnionTerritory),
    ("jammu and kashmir", RegionKind::UnionTerritory),
    ("ladakh", RegionKind::UnionTerritory),
    ("lakshadweep", RegionKind::UnionTerritory),
    ("puducherry", RegionKind::UnionTerritory),
];

/// Administrative level of a normalized region name.
pub fn region_kind(name: &str) -> Option<RegionKind> {
    KNOWN_REGIONS
        .iter()
        .find(|(known, _)| *known == name)
        .map(|(_, kind)| *kind)
}

pub fn is_known_region(name: &str) -> bool {
    region_kind(name).is_some()
}

/// Split region names into states and union territories (sorted, de-duplicated).
///
/// Names outside the whitelist are ignored.
pub fn partition_regions<'a, I>(regions: I) -> RegionListing
where
    I: IntoIterator<Item = &'a str>,
{
    let mut states = BTreeSet::new();
    let mut union_territories = BTreeSet::new();

    for name in regions {
        match region_kind(name) {
            Some(RegionKind::State) => {
                states.insert(name.to_string());
            }
            Some(RegionKind::UnionTerritory) => {
                union_territories.insert(name.to_string());
            }
            None => {}
        }
    }

    RegionListing {
        states: states.into_iter().collect(),
        union_territories: union_territories.into_iter().collect(),
    }
}

const REGION_CROPS: [(&str, &[&str]); 36] = [
    ("andhra pradesh", &["rice", "cotton", "sugarcane", "chili", "turmeric"]),
    ("arunachal pradesh", &["rice", "maize", "millet", "pulses"]),
    ("assam", &["rice", "tea", "jute", "mustard", "pulses"]),
    ("bihar", &["rice", "wheat", "maize", "pulses", "sugarcane"]),
    ("chhattisgarh", &["rice", "wheat", "maize", "pulses", "sugarcane"]),
    ("goa", &["rice", "cashew", "coconut", "spices"]),
    ("gujarat", &["cotton", "groundnut", "wheat", "rice", "sugarcane"]),
    ("haryana", &["wheat", "rice", "sugarcane", "cotton", "mustard"]),
    ("himachal pradesh", &["wheat", "maize", "rice", "barley", "apple"]),
    ("jharkhand", &["rice", "wheat", "maize", "pulses", "sugarcane"]),
    ("karnataka", &["rice", "sugarcane", "ragi", "cotton", "coffee"]),
    ("kerala", &["rice", "coconut", "spices", "tea", "coffee"]),
    ("madhya pradesh", &["wheat", "rice", "soybean", "cotton", "sugarcane"]),
    ("maharashtra", &["cotton", "sugarcane", "rice", "wheat", "pulses"]),
    ("manipur", &["rice", "maize", "pulses", "oilseeds"]),
    ("meghalaya", &["rice", "maize", "wheat", "pulses"]),
    ("mizoram", &["rice", "maize", "sugarcane", "cotton"]),
    ("nagaland", &["rice", "maize", "millet", "pulses"]),
    ("odisha", &["rice", "wheat", "pulses", "sugarcane", "cotton"]),
    ("punjab", &["wheat", "rice", "maize", "cotton", "sugarcane"]),
    ("rajasthan", &["wheat", "bajra", "mustard", "cotton", "pulses"]),
    ("sikkim", &["rice", "maize", "wheat", "barley", "cardamom"]),
    ("tamil nadu", &["rice", "cotton", "sugarcane", "groundnut", "pulses"]),
    ("telangana", &["rice", "cotton", "maize", "sugarcane", "turmeric"]),
    ("tripura", &["rice", "wheat", "maize", "pulses"]),
    ("uttar pradesh", &["wheat", "rice", "sugarcane", "pulses", "potato"]),
    ("uttarakhand", &["rice", "wheat", "sugarcane", "pulses"]),
    ("west bengal", &["rice", "wheat", "jute", "tea", "potato"]),
    ("andaman and nicobar islands", &["rice", "coconut", "arecanut", "spices"]),
    ("chandigarh", &["wheat", "rice", "maize", "sugarcane"]),
    ("dadra and nagar haveli and daman and diu", &["rice", "wheat", "sugarcane"]),
    ("delhi", &["wheat", "rice", "bajra", "mustard"]),
    ("jammu and kashmir", &["rice", "wheat", "maize", "barley", "mustard"]),
    ("ladakh", &["wheat", "barley", "peas", "mustard"]),
    ("lakshadweep", &["coconut", "banana", "sweet potato"]),
    ("puducherry", &["rice", "sugarcane", "cotton", "groundnut"]),
];

/// Crops commonly grown in a region (empty for unknown regions).
pub fn suggested_crops(region: &str) -> &'static [&'static str] {
    REGION_CROPS
        .iter()
        .find(|(name, _)| *name == region)
        .map(|(_, crops)| *crops)
        .unwrap_or(&[])
}

const fn npk(nitrogen: u8, phosphorus: u8, potassium: u8) -> NutrientMix {
    NutrientMix {
        nitrogen,
        phosphorus,
        potassium,
    }
}

const FERTILIZER: [(&str, NutrientMix); 29] = [
    ("rice", npk(50, 30, 20)),
    ("wheat", npk(40, 35, 25)),
    ("sugarcane", npk(60, 25, 15)),
    ("ragi", npk(30, 40, 30)),
    ("maize", npk(55, 25, 20)),
    ("cotton", npk(45, 30, 25)),
    ("millet", npk(35, 30, 35)),
    ("pulses", npk(25, 45, 30)),
    ("tea", npk(70, 20, 10)),
    ("coffee", npk(65, 15, 20)),
    ("coconut", npk(40, 30, 30)),
    ("groundnut", npk(35, 40, 25)),
    ("mustard", npk(45, 35, 20)),
    ("jute", npk(50, 25, 25)),
    ("chili", npk(55, 30, 15)),
    ("turmeric", npk(60, 40, 20)),
    ("soybean", npk(30, 50, 20)),
    ("bajra", npk(40, 30, 30)),
    ("barley", npk(35, 40, 25)),
    ("apple", npk(45, 25, 30)),
    ("spices", npk(50, 35, 15)),
    ("potato", npk(55, 45, 20)),
    ("oilseeds", npk(40, 35, 25)),
    ("cashew", npk(35, 25, 40)),
    ("arecanut", npk(45, 30, 25)),
    ("banana", npk(65, 20, 15)),
    ("sweet potato", npk(40, 35, 25)),
    ("cardamom", npk(55, 30, 15)),
    ("peas", npk(30, 45, 25)),
];

/// Recommended N/P/K split for a normalized crop name.
pub fn fertilizer_profile(crop: &str) -> Option<NutrientMix> {
    FERTILIZER
        .iter()
        .find(|(name, _)| *name == crop)
        .map(|(_, mix)| *mix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitelist_has_28_states_and_8_union_territories() {
        let states = KNOWN_REGIONS.iter().filter(|(_, k)| *k == RegionKind::State).count();
        let uts = KNOWN_REGIONS
            .iter()
            .filter(|(_, k)| *k == RegionKind::UnionTerritory)
            .count();
        assert_eq!(states, 28);
        assert_eq!(uts, 8);
    }

    #[test]
    fn partition_sorts_and_ignores_unknown() {
        let listing = partition_regions(["punjab", "delhi", "atlantis", "goa", "punjab", "ladakh"]);
        assert_eq!(listing.states, vec!["goa", "punjab"]);
        assert_eq!(listing.union_territories, vec!["delhi", "ladakh"]);
    }

    #[test]
    fn every_region_has_suggestions() {
        for (name, _) in KNOWN_REGIONS {
            assert!(!suggested_crops(name).is_empty(), "no suggestions for {name}");
        }
        assert!(suggested_crops("atlantis").is_empty());
    }

    #[test]
    fn fertilizer_profile_lookup() {
        let rice = fertilizer_profile("rice").unwrap();
        assert_eq!((rice.nitrogen, rice.phosphorus, rice.potassium), (50, 30, 20));
        assert!(fertilizer_profile("kale").is_none());
    }
}
