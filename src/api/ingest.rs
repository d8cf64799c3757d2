use crate::api::features::FeaturePoint;
use crate::util::coord::is_valid_lat_lon;
use crate::util::error::ProxigridError;
use geo::Centroid;
use geo_types::Geometry;
use geojson::GeoJson;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// A tag predicate applied to raw records before classification.
///
/// Without a `value` the rule tests for the presence of `key`; with one it
/// tests for that exact value (non-string tags compare by their JSON text).
///
/// In TOML: `{ exclude = { key = "usage", value = "tourism" } }` or
/// `{ require = { key = "leisure" } }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagRule {
    /// Keep only records carrying the tag.
    Require { key: String, value: Option<String> },
    /// Drop records carrying the tag.
    Exclude { key: String, value: Option<String> },
}

impl TagRule {
    pub fn require(key: impl Into<String>, value: Option<&str>) -> Self {
        TagRule::Require {
            key: key.into(),
            value: value.map(str::to_string),
        }
    }

    pub fn exclude(key: impl Into<String>, value: Option<&str>) -> Self {
        TagRule::Exclude {
            key: key.into(),
            value: value.map(str::to_string),
        }
    }

    /// Whether the record passes this rule.
    pub fn accepts(&self, point: &FeaturePoint) -> bool {
        match self {
            TagRule::Require { key, value } => has_tag(point, key, value.as_deref()),
            TagRule::Exclude { key, value } => !has_tag(point, key, value.as_deref()),
        }
    }
}

fn has_tag(point: &FeaturePoint, key: &str, value: Option<&str>) -> bool {
    match (point.tag_str(key), value) {
        (None, _) => false,
        (Some(_), None) => true,
        (Some(actual), Some(expected)) => actual == expected,
    }
}

/// Keeps the records accepted by every rule.
pub fn apply_rules(points: Vec<FeaturePoint>, rules: &[TagRule]) -> Vec<FeaturePoint> {
    filter_features(points, |p| rules.iter().all(|rule| rule.accepts(p)))
}

/// Keeps the records for which `predicate` returns true.
pub fn filter_features<F>(points: Vec<FeaturePoint>, predicate: F) -> Vec<FeaturePoint>
where
    F: Fn(&FeaturePoint) -> bool,
{
    let before = points.len();
    let kept: Vec<FeaturePoint> = points.into_iter().filter(|p| predicate(p)).collect();
    log::debug!("Ingestion filter kept {} of {} records", kept.len(), before);
    kept
}

fn checked_point(
    lat: f64,
    lon: f64,
    tags: Map<String, Value>,
    context: impl FnOnce() -> String,
) -> Result<FeaturePoint, ProxigridError> {
    if !is_valid_lat_lon(lat, lon) {
        return Err(ProxigridError::MalformedRecord(format!(
            "{}: coordinates ({}, {}) are not a valid latitude/longitude",
            context(),
            lat,
            lon
        )));
    }
    Ok(FeaturePoint { lat, lon, tags })
}

/// Reduces a geometry to one representative point.
///
/// Points map directly; every other geometry uses its centroid.
fn representative_point(geom: &Geometry<f64>) -> Option<(f64, f64)> {
    match geom {
        Geometry::Point(pt) => Some((pt.y(), pt.x())),
        other => other.centroid().map(|c| (c.y(), c.x())),
    }
}

fn feature_to_point(
    geometry: Option<geojson::Geometry>,
    properties: Option<Map<String, Value>>,
    index: usize,
) -> Result<FeaturePoint, ProxigridError> {
    let geometry = geometry.ok_or_else(|| {
        ProxigridError::MalformedRecord(format!("feature {} has no geometry", index))
    })?;
    let geom = Geometry::<f64>::try_from(geometry)
        .map_err(|e| ProxigridError::GeometryParseError(e.to_string()))?;
    let (lat, lon) = representative_point(&geom).ok_or_else(|| {
        ProxigridError::MalformedRecord(format!("feature {} has an empty geometry", index))
    })?;

    checked_point(lat, lon, properties.unwrap_or_default(), || {
        format!("feature {}", index)
    })
}

/// Decodes GeoJSON into feature points.
///
/// Accepts a `FeatureCollection`, a single `Feature` or a bare geometry.
/// Feature properties become tags.
///
/// # Example
/// ```
/// use proxigrid::points_from_geojson;
///
/// # fn main() -> Result<(), proxigrid::ProxigridError> {
/// let json = r#"{"type":"FeatureCollection","features":[
///     {"type":"Feature","geometry":{"type":"Point","coordinates":[-0.1246,51.5074]},
///      "properties":{"name":"Charing Cross"}}]}"#;
/// let stations = points_from_geojson(json)?;
/// assert_eq!(stations[0].lat, 51.5074);
/// # Ok(())
/// # }
/// ```
pub fn points_from_geojson(s: &str) -> Result<Vec<FeaturePoint>, ProxigridError> {
    let geojson: GeoJson = s
        .parse()
        .map_err(|e: geojson::Error| ProxigridError::GeometryParseError(e.to_string()))?;

    match geojson {
        GeoJson::FeatureCollection(fc) => fc
            .features
            .into_iter()
            .enumerate()
            .map(|(i, feat)| feature_to_point(feat.geometry, feat.properties, i))
            .collect(),
        GeoJson::Feature(feat) => Ok(vec![feature_to_point(
            feat.geometry,
            feat.properties,
            0,
        )?]),
        GeoJson::Geometry(geom) => Ok(vec![feature_to_point(Some(geom), None, 0)?]),
    }
}

pub fn points_from_geojson_file(path: impl AsRef<Path>) -> Result<Vec<FeaturePoint>, ProxigridError> {
    let contents = std::fs::read_to_string(path.as_ref())?;
    points_from_geojson(&contents)
}

/// Reads feature points from CSV with latitude and longitude columns.
///
/// Every other column becomes a string tag. Rows whose coordinates do not
/// parse as valid degrees are rejected with
/// [`ProxigridError::MalformedRecord`].
pub fn points_from_csv<R: Read>(
    reader: R,
    lat_column: &str,
    lon_column: &str,
) -> Result<Vec<FeaturePoint>, ProxigridError> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers = reader
        .headers()
        .map_err(|e| ProxigridError::CsvError(e.to_string()))?
        .clone();

    let lat_idx = headers.iter().position(|h| h == lat_column).ok_or_else(|| {
        ProxigridError::CsvError(format!("Latitude column '{}' not found", lat_column))
    })?;
    let lon_idx = headers.iter().position(|h| h == lon_column).ok_or_else(|| {
        ProxigridError::CsvError(format!("Longitude column '{}' not found", lon_column))
    })?;

    let mut points = Vec::new();
    for (line, result) in reader.records().enumerate() {
        let record = result.map_err(|e| ProxigridError::CsvError(e.to_string()))?;
        let row_no = line + 2;

        let parse = |idx: usize, label: &str| -> Result<f64, ProxigridError> {
            let raw = record.get(idx).unwrap_or("").trim();
            raw.parse::<f64>().map_err(|_| {
                ProxigridError::MalformedRecord(format!(
                    "row {}: invalid {} '{}'",
                    row_no, label, raw
                ))
            })
        };
        let lat = parse(lat_idx, "latitude")?;
        let lon = parse(lon_idx, "longitude")?;

        let mut tags = Map::new();
        for (i, (header, field)) in headers.iter().zip(record.iter()).enumerate() {
            if i != lat_idx && i != lon_idx && !field.is_empty() {
                tags.insert(header.to_string(), Value::String(field.to_string()));
            }
        }

        points.push(checked_point(lat, lon, tags, || format!("row {}", row_no))?);
    }

    Ok(points)
}

pub fn points_from_csv_file(
    path: impl AsRef<Path>,
    lat_column: &str,
    lon_column: &str,
) -> Result<Vec<FeaturePoint>, ProxigridError> {
    let file = File::open(path.as_ref()).map_err(|e| ProxigridError::IoError(e.to_string()))?;
    points_from_csv(file, lat_column, lon_column)
}

/// File format of a feature source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFormat {
    #[serde(rename = "geojson")]
    GeoJson,
    Csv,
}

impl SourceFormat {
    /// Guesses the format from a file extension; anything but `.csv` is
    /// treated as GeoJSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => SourceFormat::Csv,
            _ => SourceFormat::GeoJson,
        }
    }
}

fn default_lat_column() -> String {
    "lat".to_string()
}

fn default_lon_column() -> String {
    "lon".to_string()
}

/// Where one feature collection comes from and how it is filtered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSource {
    pub path: PathBuf,
    /// Proximity tolerance for this feature, in degrees.
    pub tolerance: f64,
    #[serde(default)]
    pub format: Option<SourceFormat>,
    #[serde(default = "default_lat_column")]
    pub lat_column: String,
    #[serde(default = "default_lon_column")]
    pub lon_column: String,
    #[serde(default)]
    pub filters: Vec<TagRule>,
}

impl FeatureSource {
    pub fn new(path: impl Into<PathBuf>, tolerance: f64) -> Self {
        Self {
            path: path.into(),
            tolerance,
            format: None,
            lat_column: default_lat_column(),
            lon_column: default_lon_column(),
            filters: Vec::new(),
        }
    }

    pub fn filter(mut self, rule: TagRule) -> Self {
        self.filters.push(rule);
        self
    }

    pub fn format(&self) -> SourceFormat {
        self.format
            .unwrap_or_else(|| SourceFormat::from_path(&self.path))
    }

    /// Reads the source, resolving a relative path against `base_dir`, and
    /// applies the configured filters.
    pub fn load(&self, base_dir: &Path) -> Result<Vec<FeaturePoint>, ProxigridError> {
        let path = if self.path.is_relative() {
            base_dir.join(&self.path)
        } else {
            self.path.clone()
        };

        let points = match self.format() {
            SourceFormat::GeoJson => points_from_geojson_file(&path)?,
            SourceFormat::Csv => points_from_csv_file(&path, &self.lat_column, &self.lon_column)?,
        };
        log::info!("Read {} records from {}", points.len(), path.display());

        Ok(apply_rules(points, &self.filters))
    }
}
