use crate::api::classify::{ClassifiedCell, ClassifiedGrid};
use crate::util::error::ProxigridError;
use arrow_array::{Float64Array, RecordBatch, StringArray, UInt64Array};
use arrow_schema::{DataType, Field, Schema};
use geoarrow_array::IntoArrow;
use geoarrow_array::array::{PointArray, PolygonArray};
use geoarrow_array::builder::{PointBuilder, PolygonBuilder};
use geoarrow_schema::{Crs, Dimension, Metadata, PointType, PolygonType};
use rayon::prelude::*;
use std::sync::Arc;

fn wgs84_metadata() -> Arc<Metadata> {
    let crs = Crs::from_authority_code("EPSG:4326".to_string());
    Arc::new(Metadata::new(crs, None))
}

/// Trait for converting classified cells to Arrow arrays.
///
/// Implemented for `[ClassifiedCell]` and [`ClassifiedGrid`].
pub trait ClassifiedToArrow {
    /// Converts cell centres to an Arrow PointArray.
    fn to_arrow_points(&self) -> PointArray;
    /// Converts cells to an Arrow PolygonArray of squares.
    fn to_arrow_polygons(&self) -> PolygonArray;
    /// Converts cells to a RecordBatch with row, col, south, west, size,
    /// category and geometry.
    fn to_record_batch(&self) -> Result<RecordBatch, ProxigridError>;
}

impl ClassifiedToArrow for [ClassifiedCell] {
    fn to_arrow_points(&self) -> PointArray {
        let point = PointType::new(Dimension::XY, wgs84_metadata());
        let mut builder = PointBuilder::with_capacity(point, self.len());

        for classified in self {
            builder.push_point(Some(&classified.cell.center()));
        }
        builder.finish()
    }

    fn to_arrow_polygons(&self) -> PolygonArray {
        let poly = PolygonType::new(Dimension::XY, wgs84_metadata());
        let polygons: Vec<_> = self
            .par_iter()
            .map(|c: &ClassifiedCell| c.cell.to_polygon())
            .collect();
        PolygonBuilder::from_polygons(&polygons, poly).finish()
    }

    fn to_record_batch(&self) -> Result<RecordBatch, ProxigridError> {
        let polygon_array = self.to_arrow_polygons();
        let rows: UInt64Array = self.iter().map(|c| Some(c.cell.row as u64)).collect();
        let cols: UInt64Array = self.iter().map(|c| Some(c.cell.col as u64)).collect();
        let souths: Float64Array = self.iter().map(|c| Some(c.cell.south)).collect();
        let wests: Float64Array = self.iter().map(|c| Some(c.cell.west)).collect();
        let sizes: Float64Array = self.iter().map(|c| Some(c.cell.size)).collect();
        let categories: StringArray = self.iter().map(|c| Some(c.category.as_str())).collect();

        let geometry_field = polygon_array.extension_type().to_field("geometry", false);
        let schema = Schema::new(vec![
            Field::new("row", DataType::UInt64, false),
            Field::new("col", DataType::UInt64, false),
            Field::new("south", DataType::Float64, false),
            Field::new("west", DataType::Float64, false),
            Field::new("size", DataType::Float64, false),
            Field::new("category", DataType::Utf8, false),
            geometry_field,
        ]);

        RecordBatch::try_new(
            Arc::new(schema),
            vec![
                Arc::new(rows),
                Arc::new(cols),
                Arc::new(souths),
                Arc::new(wests),
                Arc::new(sizes),
                Arc::new(categories),
                Arc::new(polygon_array.into_arrow()),
            ],
        )
        .map_err(|e| ProxigridError::IoError(e.to_string()))
    }
}

impl ClassifiedToArrow for ClassifiedGrid {
    fn to_arrow_points(&self) -> PointArray {
        self.cells().to_arrow_points()
    }

    fn to_arrow_polygons(&self) -> PolygonArray {
        self.cells().to_arrow_polygons()
    }

    fn to_record_batch(&self) -> Result<RecordBatch, ProxigridError> {
        self.cells().to_record_batch()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::bounds::BoundingBox;
    use crate::api::classify::classify;
    use crate::api::config::ClassifierConfig;
    use crate::api::features::{FeaturePoint, FeatureSets};
    use crate::api::policy::CategoryPolicy;
    use geoarrow_array::GeoArrowArray;

    fn sample() -> Result<ClassifiedGrid, ProxigridError> {
        let config = ClassifierConfig::builder()
            .bounds(BoundingBox::new(51.0, -0.5, 51.5, 0.0))
            .cell_size(0.125)
            .tolerance("stations", 0.05)
            .policy(CategoryPolicy::single("stations"))
            .build()?;
        let features = FeatureSets::new().with("stations", vec![FeaturePoint::new(51.2, -0.2)]);
        classify(&config, &features)
    }

    #[test]
    fn test_record_batch() -> Result<(), ProxigridError> {
        let grid = sample()?;
        let batch = grid.to_record_batch()?;

        assert_eq!(batch.num_rows(), grid.len());
        assert_eq!(batch.num_columns(), 7);
        assert_eq!(batch.schema().field(5).name(), "category");
        Ok(())
    }

    #[test]
    fn test_points_and_polygons() -> Result<(), ProxigridError> {
        let grid = sample()?;
        assert_eq!(grid.to_arrow_points().len(), 16);
        assert_eq!(grid.to_arrow_polygons().len(), 16);
        Ok(())
    }
}
