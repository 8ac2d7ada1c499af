use std::collections::BTreeMap;

use foundation::math::GeoPoint;
use serde::{Deserialize, Serialize};

const BUNDLED_REGIONS_JSON: &str = include_str!("../data/regions.json");

/// A deployment site on the globe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    /// Unique short handle, e.g. `eu-west-1`.
    #[serde(rename = "region")]
    pub code: String,
    pub display_name: String,
    pub country: String,
    pub lat: f64,
    pub lng: f64,
    /// Only the count and identity of zones matter; order does not.
    pub availability_zones: Vec<String>,
}

impl Region {
    pub fn geo_point(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lng)
    }

    pub fn az_count(&self) -> usize {
        self.availability_zones.len()
    }
}

/// Named group of regions, used when describing the catalog to the oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeoCluster {
    pub name: &'static str,
    pub codes: &'static [&'static str],
}

pub const GEO_CLUSTERS: &[GeoCluster] = &[
    GeoCluster {
        name: "North America",
        codes: &["us-east-1", "us-east-2", "us-west-1", "us-west-2", "ca-central-1"],
    },
    GeoCluster {
        name: "Europe",
        codes: &[
            "eu-west-1",
            "eu-west-2",
            "eu-west-3",
            "eu-central-1",
            "eu-north-1",
            "eu-south-1",
        ],
    },
    GeoCluster {
        name: "Asia Pacific",
        codes: &[
            "ap-south-1",
            "ap-northeast-1",
            "ap-northeast-2",
            "ap-northeast-3",
            "ap-southeast-1",
            "ap-southeast-2",
            "ap-east-1",
        ],
    },
    GeoCluster {
        name: "Other",
        codes: &["sa-east-1", "me-south-1", "af-south-1"],
    },
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    Corrupt(String),
    DuplicateCode(String),
    Empty,
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::Corrupt(msg) => write!(f, "region catalog corrupt: {msg}"),
            CatalogError::DuplicateCode(code) => {
                write!(f, "region catalog lists `{code}` more than once")
            }
            CatalogError::Empty => write!(f, "region catalog is empty"),
        }
    }
}

impl std::error::Error for CatalogError {}

/// Immutable reference set of regions, loaded once at start-up.
///
/// Iteration yields regions in the order they were loaded.
#[derive(Debug, Clone)]
pub struct RegionCatalog {
    regions: Vec<Region>,
    by_code: BTreeMap<String, usize>,
}

impl RegionCatalog {
    /// The dataset shipped with the crate.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_json(BUNDLED_REGIONS_JSON)
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let regions: Vec<Region> =
            serde_json::from_str(json).map_err(|e| CatalogError::Corrupt(e.to_string()))?;
        Self::from_regions(regions)
    }

    pub fn from_regions(regions: Vec<Region>) -> Result<Self, CatalogError> {
        if regions.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut by_code = BTreeMap::new();
        for (idx, region) in regions.iter().enumerate() {
            if by_code.insert(region.code.clone(), idx).is_some() {
                return Err(CatalogError::DuplicateCode(region.code.clone()));
            }
        }

        Ok(Self { regions, by_code })
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Region> + '_ {
        self.regions.iter()
    }

    pub fn get(&self, code: &str) -> Option<&Region> {
        self.by_code.get(code).map(|&idx| &self.regions[idx])
    }

    pub fn contains(&self, code: &str) -> bool {
        self.by_code.contains_key(code)
    }

    /// First region whose code equals `name`, or whose display name or country contains it.
    ///
    /// Matching is case-insensitive.
    pub fn find_by_name(&self, name: &str) -> Option<&Region> {
        let needle = name.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        self.regions.iter().find(|r| {
            r.code.to_lowercase() == needle
                || r.display_name.to_lowercase().contains(&needle)
                || r.country.to_lowercase().contains(&needle)
        })
    }

    pub fn find_by_country(&self, country: &str) -> Vec<&Region> {
        let needle = country.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.regions
            .iter()
            .filter(|r| r.country.to_lowercase().contains(&needle))
            .collect()
    }

    /// Regions whose code appears in `codes`, in catalog order. Unknown codes are skipped.
    pub fn by_codes<S: AsRef<str>>(&self, codes: &[S]) -> Vec<&Region> {
        self.regions
            .iter()
            .filter(|r| codes.iter().any(|c| c.as_ref() == r.code))
            .collect()
    }
}
