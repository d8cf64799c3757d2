pub mod bounds;
pub mod cell;
pub mod classify;
pub mod config;
pub mod features;
pub mod grid;
pub mod ingest;
pub mod palette;
pub mod policy;

pub use bounds::BoundingBox;
pub use cell::Cell;
pub use classify::{
    ClassifiedCell, ClassifiedGrid, ClassifiedRow, ClassifiedRows, Classifier, classify,
    classify_cell, classify_parallel, is_near,
};
pub use config::{ClassifierConfig, ClassifierConfigBuilder, RunConfig};
pub use features::{FeatureName, FeaturePoint, FeatureSets};
pub use grid::{Grid, GridBuilder, Partition, partition};
pub use ingest::{
    FeatureSource, SourceFormat, TagRule, apply_rules, filter_features, points_from_csv,
    points_from_csv_file, points_from_geojson, points_from_geojson_file,
};
pub use palette::Palette;
pub use policy::{Category, CategoryPolicy};
