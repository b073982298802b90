//! Read-only feature database
//!
//! Features are loaded once at startup and never mutated, so the store is
//! shared between calls behind an `Arc` without any locking. Lookups keep load
//! order: when two features share a location the first one loaded wins.

use crate::common::{geo, Bounds, Error, Result};
use crate::proto::{Feature, Point, Rectangle};
use serde::Deserialize;
use std::path::Path;

/// Feature database bundled with the crate.
const EMBEDDED_DB: &str = include_str!("../../data/route_guide_db.json");

/// On-disk record: `{"location": {"latitude": .., "longitude": ..}, "name": ".."}`
#[derive(Debug, Deserialize)]
struct FeatureRecord {
    location: LocationRecord,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct LocationRecord {
    latitude: i32,
    longitude: i32,
}

/// FeatureStore owns every known feature for the lifetime of the process.
#[derive(Debug, Clone, Default)]
pub struct FeatureStore {
    features: Vec<Feature>,
}

impl FeatureStore {
    /// Take ownership of `features`, keeping their order.
    pub fn load(features: Vec<Feature>) -> Self {
        Self { features }
    }

    /// Parse the JSON database format.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let records: Vec<FeatureRecord> = serde_json::from_str(json)?;

        let features = records
            .into_iter()
            .enumerate()
            .map(|(i, record)| {
                let location = Point {
                    latitude: record.location.latitude,
                    longitude: record.location.longitude,
                };
                geo::validate_point(&location).map_err(|e| {
                    Error::InvalidConfig(format!("feature #{} ({:?}): {}", i, record.name, e))
                })?;
                Ok(Feature {
                    name: record.name,
                    location: Some(location),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::load(features))
    }

    /// Read the JSON database from `path`.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// The database shipped in `data/route_guide_db.json`.
    pub fn embedded() -> Result<Self> {
        Self::from_json_str(EMBEDDED_DB)
    }

    /// Load from `path`, falling back to the embedded database.
    pub fn open(path: Option<&Path>) -> Result<Self> {
        let store = match path {
            Some(path) => {
                tracing::info!("Loading features from {}", path.display());
                Self::from_json_file(path)?
            }
            None => {
                tracing::info!("Loading embedded feature database");
                Self::embedded()?
            }
        };
        tracing::info!("Loaded {} features", store.len());
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// The feature at exactly `point`.
    ///
    /// Absence is not an error: an unnamed feature located at `point` is
    /// returned instead.
    pub fn get_feature(&self, point: &Point) -> Feature {
        self.features
            .iter()
            .find(|f| f.location.as_ref() == Some(point))
            .cloned()
            .unwrap_or_else(|| Feature {
                name: String::new(),
                location: Some(*point),
            })
    }

    /// Named features inside `rect`, in load order.
    pub fn list_features<'a>(&'a self, rect: &Rectangle) -> impl Iterator<Item = &'a Feature> + 'a {
        self.list_in_bounds(Bounds::from(rect))
    }

    /// Named features inside `bounds`, in load order.
    pub fn list_in_bounds(&self, bounds: Bounds) -> impl Iterator<Item = &Feature> + '_ {
        self.features.iter().filter(move |f| {
            !f.name.is_empty() && f.location.as_ref().is_some_and(|loc| bounds.contains(loc))
        })
    }
}
