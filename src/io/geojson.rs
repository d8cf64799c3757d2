use crate::api::classify::{ClassifiedCell, ClassifiedGrid};
use crate::api::palette::Palette;
use crate::util::error::ProxigridError;
use geojson::{Feature, FeatureCollection, JsonObject, JsonValue};
use std::path::Path;

fn cell_feature(classified: &ClassifiedCell, palette: Option<&Palette>) -> Feature {
    let cell = &classified.cell;
    let mut properties = JsonObject::new();
    properties.insert("row".to_string(), JsonValue::from(cell.row));
    properties.insert("col".to_string(), JsonValue::from(cell.col));
    properties.insert(
        "category".to_string(),
        JsonValue::from(classified.category.as_str()),
    );
    if let Some(palette) = palette {
        properties.insert(
            "color".to_string(),
            JsonValue::from(palette.color(classified.category)),
        );
    }

    Feature {
        bbox: None,
        geometry: Some(geojson::Geometry::from(&cell.to_polygon())),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Conversion of classified cells into a GeoJSON overlay.
pub trait ClassifiedToGeoJson {
    /// One polygon feature per cell with `row`, `col`, `category` and, when
    /// a palette is given, `color` properties.
    fn to_feature_collection(&self, palette: Option<&Palette>) -> FeatureCollection;

    fn to_geojson_file(
        &self,
        path: impl AsRef<Path>,
        palette: Option<&Palette>,
    ) -> Result<(), ProxigridError> {
        let collection = self.to_feature_collection(palette);
        std::fs::write(path, collection.to_string())
            .map_err(|e| ProxigridError::IoError(e.to_string()))
    }
}

impl ClassifiedToGeoJson for [ClassifiedCell] {
    fn to_feature_collection(&self, palette: Option<&Palette>) -> FeatureCollection {
        FeatureCollection {
            bbox: None,
            features: self.iter().map(|c| cell_feature(c, palette)).collect(),
            foreign_members: None,
        }
    }
}

impl ClassifiedToGeoJson for ClassifiedGrid {
    fn to_feature_collection(&self, palette: Option<&Palette>) -> FeatureCollection {
        let mut collection = self.cells().to_feature_collection(palette);
        let bounds = self.grid().bounds();
        collection.bbox = Some(vec![bounds.west, bounds.south, bounds.east, bounds.north]);
        collection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::bounds::BoundingBox;
    use crate::api::classify::classify;
    use crate::api::config::ClassifierConfig;
    use crate::api::features::{FeaturePoint, FeatureSets};
    use crate::api::policy::{Category, CategoryPolicy};
    use geojson::GeoJson;
    use tempfile::tempdir;

    fn sample() -> Result<ClassifiedGrid, ProxigridError> {
        let config = ClassifierConfig::builder()
            .bounds(BoundingBox::new(0.0, 0.0, 1.0, 1.0))
            .cell_size(0.5)
            .tolerance("stations", 0.1)
            .tolerance("rivers", 0.1)
            .policy(CategoryPolicy::two("stations", "rivers"))
            .build()?;
        let features = FeatureSets::new()
            .with("stations", vec![FeaturePoint::new(0.25, 0.25), FeaturePoint::new(0.75, 0.75)])
            .with("rivers", vec![FeaturePoint::new(0.3, 0.3)]);
        classify(&config, &features)
    }

    #[test]
    fn test_feature_collection() -> Result<(), ProxigridError> {
        let grid = sample()?;
        let palette = Palette::default();
        let collection = grid.to_feature_collection(Some(&palette));

        assert_eq!(collection.features.len(), 4);
        assert_eq!(collection.bbox, Some(vec![0.0, 0.0, 1.0, 1.0]));

        let first = &collection.features[0];
        assert_eq!(
            first.property("category").and_then(|v| v.as_str()),
            Some(Category::Combined.as_str())
        );
        assert_eq!(
            first.property("color").and_then(|v| v.as_str()),
            Some(palette.color(Category::Combined))
        );
        let last = &collection.features[3];
        assert_eq!(
            last.property("category").and_then(|v| v.as_str()),
            Some("partial")
        );
        Ok(())
    }

    #[test]
    fn test_without_palette_has_no_colour() -> Result<(), ProxigridError> {
        let grid = sample()?;
        let collection = grid.to_feature_collection(None);
        assert!(collection.features.iter().all(|f| !f.contains_property("color")));
        Ok(())
    }

    #[test]
    fn test_geojson_file_round_trips_through_parser() -> Result<(), ProxigridError> {
        let grid = sample()?;
        let dir = tempdir()?;
        let path = dir.path().join("grid.geojson");
        grid.to_geojson_file(&path, None)?;

        let text = std::fs::read_to_string(&path)?;
        let parsed: GeoJson = text
            .parse()
            .map_err(|e: geojson::Error| ProxigridError::GeometryParseError(e.to_string()))?;
        match parsed {
            GeoJson::FeatureCollection(fc) => assert_eq!(fc.features.len(), 4),
            _ => panic!("Expected FeatureCollection"),
        }
        Ok(())
    }
}
