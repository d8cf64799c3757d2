//! # proxigrid
//!
//! Partitions a latitude/longitude box into square cells and labels each cell
//! by which feature collections (stations, rivers, pedestrian ways, ...) lie
//! within a tolerance of it.
//!
//! There are currently three main entry points.
//!
//! ### 1. `Grid` - Partitioning a Region
//!
//! ```
//! use proxigrid::{BoundingBox, Grid};
//!
//! # fn main() -> Result<(), proxigrid::ProxigridError> {
//! let grid = Grid::builder()
//!     .bounds(BoundingBox::new(51.0, -0.5, 51.5, 0.0))
//!     .cell_size(0.125)
//!     .build()?;
//!
//! assert_eq!(grid.dimensions(), (4, 4));
//! for cell in &grid {
//!     let _square = cell.to_polygon();
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ### 2. `classify` - Labelling Cells
//!
//! ```
//! use proxigrid::{
//!     BoundingBox, Category, CategoryPolicy, ClassifierConfig, FeaturePoint, FeatureSets,
//!     classify,
//! };
//!
//! # fn main() -> Result<(), proxigrid::ProxigridError> {
//! let config = ClassifierConfig::builder()
//!     .bounds(BoundingBox::new(0.0, 0.0, 1.0, 1.0))
//!     .cell_size(0.5)
//!     .tolerance("stations", 0.1)
//!     .tolerance("rivers", 0.1)
//!     .policy(CategoryPolicy::two("stations", "rivers"))
//!     .build()?;
//!
//! let features = FeatureSets::new()
//!     .with("stations", vec![FeaturePoint::new(0.25, 0.25), FeaturePoint::new(0.75, 0.75)])
//!     .with("rivers", vec![FeaturePoint::new(0.3, 0.3)]);
//!
//! let classified = classify(&config, &features)?;
//! assert_eq!(classified.get(0, 0), Some(Category::Combined));
//! assert_eq!(classified.get(1, 1), Some(Category::Partial));
//! # Ok(())
//! # }
//! ```
//!
//! ### 3. `RunConfig` - Files In, Overlay Out
//!
//! Load GeoJSON or CSV feature files described in a TOML run file and write
//! the classified grid as CSV, GeoJSON or GeoParquet:
//!
//! ```no_run
//! use proxigrid::{ClassifiedToGeoJson, RunConfig, classify_parallel};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), proxigrid::ProxigridError> {
//! let run = RunConfig::load("london.toml")?;
//! let features = run.load_features(Path::new("."))?;
//! let classified = classify_parallel(&run.classifier_config()?, &features)?;
//! classified.to_geojson_file("overlay.geojson", Some(&run.palette()))?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod core;
pub mod io;
pub mod util;

pub use api::{
    BoundingBox, Category, CategoryPolicy, Cell, ClassifiedCell, ClassifiedGrid, ClassifiedRow,
    ClassifiedRows, Classifier, ClassifierConfig, ClassifierConfigBuilder, FeatureName,
    FeaturePoint, FeatureSets, FeatureSource, Grid, GridBuilder, Palette, Partition, RunConfig,
    SourceFormat, TagRule, apply_rules, classify, classify_cell, classify_parallel,
    filter_features, is_near, partition, points_from_csv, points_from_csv_file,
    points_from_geojson, points_from_geojson_file,
};
pub use core::{
    BAND_CELLS_ABOVE, BAND_CELLS_BELOW, DEFAULT_CELL_SIZE, DEFAULT_CENTRE, DEFAULT_EXTENT_OFFSETS,
    GRID_STROKE_COLOR, band_filter, band_range, create_square, in_window,
};
pub use io::{
    ClassifiedToArrow, ClassifiedToCsv, ClassifiedToGeoJson, ClassifiedToGeoParquet,
    CsvExportConfig, GeometryFormat, write_geoparquet,
};
pub use util::{Coordinate, ProxigridError, is_valid_lat_lon};

pub use geo_types;
pub use geoarrow_array;
pub use geoarrow_schema;
