pub mod arrow;
pub mod csv;
pub mod geojson;
pub mod parquet;

pub use arrow::ClassifiedToArrow;
pub use csv::{ClassifiedToCsv, CsvExportConfig, GeometryFormat};
pub use geojson::ClassifiedToGeoJson;
pub use parquet::{ClassifiedToGeoParquet, write_geoparquet};
