#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Normalized map features and the `GeoJSON` form they are submitted in.
//!
//! Every dispatch record that can be placed on the map becomes a
//! [`MapFeature`]: a point with an identity, a callsign, and free-text
//! remarks. A run gathers its features into one [`MapFeatureCollection`],
//! which is serialized as a `GeoJSON` `FeatureCollection` for the sink.

use geojson::{Geometry, JsonObject, feature::Id};
use serde::{Deserialize, Serialize};

/// Entity type attached to every feature (a ground point entity).
pub const POINT_ENTITY_TYPE: &str = "a-f-G";

/// How the position was obtained (machine generated).
pub const MACHINE_GENERATED_HOW: &str = "m-g";

/// A single point entity ready for map rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapFeature {
    /// Stringified identity of the source record.
    pub id: String,
    /// Entity type, always [`POINT_ENTITY_TYPE`] for dispatch data.
    pub kind: String,
    /// Position provenance, always [`MACHINE_GENERATED_HOW`].
    pub how: String,
    /// Display label.
    pub callsign: String,
    /// Free-text remarks (unit status, etc.). May be empty.
    pub remarks: String,
    /// Longitude (WGS84).
    pub longitude: f64,
    /// Latitude (WGS84).
    pub latitude: f64,
}

impl MapFeature {
    /// Creates a machine-generated point entity.
    #[must_use]
    pub fn point(
        id: impl Into<String>,
        callsign: impl Into<String>,
        remarks: impl Into<String>,
        longitude: f64,
        latitude: f64,
    ) -> Self {
        Self {
            id: id.into(),
            kind: POINT_ENTITY_TYPE.to_string(),
            how: MACHINE_GENERATED_HOW.to_string(),
            callsign: callsign.into(),
            remarks: remarks.into(),
            longitude,
            latitude,
        }
    }

    /// Point coordinates in `GeoJSON` order: `[longitude, latitude]`.
    #[must_use]
    pub const fn coordinates(&self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }

    /// Converts this feature into its `GeoJSON` representation.
    #[must_use]
    pub fn to_geojson(&self) -> geojson::Feature {
        let mut properties = JsonObject::new();
        properties.insert("type".to_string(), self.kind.clone().into());
        properties.insert("how".to_string(), self.how.clone().into());
        properties.insert("callsign".to_string(), self.callsign.clone().into());
        properties.insert("remarks".to_string(), self.remarks.clone().into());

        geojson::Feature {
            bbox: None,
            geometry: Some(Geometry::new(geojson::Value::Point(
                self.coordinates().to_vec(),
            ))),
            id: Some(Id::String(self.id.clone())),
            properties: Some(properties),
            foreign_members: None,
        }
    }
}

/// The ordered batch of features produced by one run.
///
/// Order is agency order, then record order within each agency's response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapFeatureCollection {
    pub features: Vec<MapFeature>,
}

impl MapFeatureCollection {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            features: Vec::new(),
        }
    }

    pub fn push(&mut self, feature: MapFeature) {
        self.features.push(feature);
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.features.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Converts the collection into a `GeoJSON` `FeatureCollection`.
    #[must_use]
    pub fn to_geojson(&self) -> geojson::FeatureCollection {
        geojson::FeatureCollection {
            bbox: None,
            features: self.features.iter().map(MapFeature::to_geojson).collect(),
            foreign_members: None,
        }
    }

    /// Serializes the collection as compact `GeoJSON`.
    ///
    /// # Errors
    ///
    /// Returns a [`serde_json::Error`] if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.to_geojson())
    }

    /// Serializes the collection as indented `GeoJSON`.
    ///
    /// # Errors
    ///
    /// Returns a [`serde_json::Error`] if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.to_geojson())
    }
}

impl Extend<MapFeature> for MapFeatureCollection {
    fn extend<T: IntoIterator<Item = MapFeature>>(&mut self, iter: T) {
        self.features.extend(iter);
    }
}

impl FromIterator<MapFeature> for MapFeatureCollection {
    fn from_iter<T: IntoIterator<Item = MapFeature>>(iter: T) -> Self {
        Self {
            features: iter.into_iter().collect(),
        }
    }
}
