use crate::util::coord::Coordinate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;

/// Name of a feature collection, e.g. `"stations"` or `"rivers"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureName(String);

impl FeatureName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FeatureName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FeatureName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for FeatureName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl Borrow<str> for FeatureName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A decoded point feature: a WGS84 position plus free-form tags.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FeaturePoint {
    pub lat: f64,
    pub lon: f64,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub tags: Map<String, Value>,
}

impl FeaturePoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon,
            tags: Map::new(),
        }
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    pub fn tag(&self, key: &str) -> Option<&Value> {
        self.tags.get(key)
    }

    /// Tag value as text; strings are returned as-is, other scalars are
    /// rendered with their JSON representation.
    pub fn tag_str(&self, key: &str) -> Option<String> {
        match self.tags.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

impl Coordinate for FeaturePoint {
    fn lat(&self) -> f64 {
        self.lat
    }
    fn lon(&self) -> f64 {
        self.lon
    }
}

/// Named feature collections handed to the classifier.
///
/// An empty collection is valid and means nothing of that kind is near any
/// cell; a collection that was never inserted is reported as missing.
#[derive(Debug, Clone, Default)]
pub struct FeatureSets {
    sets: HashMap<FeatureName, Vec<FeaturePoint>>,
}

impl FeatureSets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<FeatureName>, points: Vec<FeaturePoint>) {
        self.sets.insert(name.into(), points);
    }

    pub fn with(mut self, name: impl Into<FeatureName>, points: Vec<FeaturePoint>) -> Self {
        self.insert(name, points);
        self
    }

    pub fn get(&self, name: &str) -> Option<&[FeaturePoint]> {
        self.sets.get(name).map(Vec::as_slice)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sets.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &FeatureName> {
        self.sets.keys()
    }
}

impl FromIterator<(FeatureName, Vec<FeaturePoint>)> for FeatureSets {
    fn from_iter<I: IntoIterator<Item = (FeatureName, Vec<FeaturePoint>)>>(iter: I) -> Self {
        Self {
            sets: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_feature_point_tags() {
        let station = FeaturePoint::new(51.5, -0.12)
            .with_tag("name", "Charing Cross")
            .with_tag("platforms", 6);

        assert_eq!(station.tag_str("name").as_deref(), Some("Charing Cross"));
        assert_eq!(station.tag_str("platforms").as_deref(), Some("6"));
        assert!(station.tag("missing").is_none());
        assert_eq!(station.lat(), 51.5);
        assert_eq!(station.lon(), -0.12);
    }

    #[test]
    fn test_feature_point_deserializes_without_tags() -> Result<(), serde_json::Error> {
        let point: FeaturePoint = serde_json::from_value(json!({ "lat": 1.0, "lon": 2.0 }))?;
        assert_eq!(point, FeaturePoint::new(1.0, 2.0));
        Ok(())
    }

    #[test]
    fn test_empty_set_is_present() {
        let sets = FeatureSets::new()
            .with("stations", vec![FeaturePoint::new(0.0, 0.0)])
            .with("rivers", Vec::new());

        assert_eq!(sets.len(), 2);
        assert_eq!(sets.get("rivers").map(|p| p.len()), Some(0));
        assert!(sets.get("parks").is_none());
        assert!(sets.contains("stations"));
    }

    #[test]
    fn test_feature_name_display() {
        let name = FeatureName::from("pedestrian_areas");
        assert_eq!(name.to_string(), "pedestrian_areas");
        assert_eq!(name.as_str(), "pedestrian_areas");
    }
}
