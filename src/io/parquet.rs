use crate::api::classify::{ClassifiedCell, ClassifiedGrid};
use crate::io::arrow::ClassifiedToArrow;
use crate::util::error::ProxigridError;
use arrow_array::RecordBatch;
use geoparquet::writer::{
    GeoParquetRecordBatchEncoder, GeoParquetWriterEncoding, GeoParquetWriterOptionsBuilder,
};
use parquet::arrow::ArrowWriter;
use parquet::file::metadata::KeyValue;
use std::fs::File;
use std::path::Path;

/// Key prefix for the grid description stored in the file footer.
pub const METADATA_PREFIX: &str = "proxigrid:";

fn io_err(e: impl std::fmt::Display) -> ProxigridError {
    ProxigridError::IoError(e.to_string())
}

/// Writes `batches` to one GeoParquet file with WKB geometry.
///
/// All batches must share the first batch's schema. `extra` key/value pairs
/// are stored in the footer next to the `geo` metadata.
pub fn write_geoparquet<'b>(
    batches: impl IntoIterator<Item = &'b RecordBatch>,
    extra: Vec<KeyValue>,
    path: impl AsRef<Path>,
) -> Result<(), ProxigridError> {
    let mut batches = batches.into_iter().peekable();
    let schema = batches
        .peek()
        .map(|b| b.schema())
        .ok_or_else(|| ProxigridError::IoError("no record batches to write".to_string()))?;

    let options = GeoParquetWriterOptionsBuilder::default()
        .set_encoding(GeoParquetWriterEncoding::WKB)
        .build();
    let mut encoder = GeoParquetRecordBatchEncoder::try_new(&schema, &options).map_err(io_err)?;

    let file = File::create(path).map_err(io_err)?;
    let mut writer = ArrowWriter::try_new(file, encoder.target_schema(), None).map_err(io_err)?;

    for batch in batches {
        let encoded = encoder.encode_record_batch(batch).map_err(io_err)?;
        writer.write(&encoded).map_err(io_err)?;
    }

    writer.append_key_value_metadata(encoder.into_keyvalue().map_err(io_err)?);
    for kv in extra {
        writer.append_key_value_metadata(kv);
    }
    writer.finish().map_err(io_err)?;

    Ok(())
}

fn grid_metadata(grid: &ClassifiedGrid) -> Result<Vec<KeyValue>, ProxigridError> {
    let layout = grid.grid();
    let bounds = serde_json::to_string(layout.bounds()).map_err(io_err)?;
    let counts = serde_json::to_string(&grid.counts()).map_err(io_err)?;

    Ok(vec![
        KeyValue::new(format!("{}bounds", METADATA_PREFIX), bounds),
        KeyValue::new(
            format!("{}cell_size", METADATA_PREFIX),
            layout.cell_size().to_string(),
        ),
        KeyValue::new(
            format!("{}dimensions", METADATA_PREFIX),
            format!("{}x{}", layout.rows(), layout.cols()),
        ),
        KeyValue::new(format!("{}counts", METADATA_PREFIX), counts),
    ])
}

pub trait ClassifiedToGeoParquet: ClassifiedToArrow {
    fn to_geoparquet(&self, path: impl AsRef<Path>) -> Result<(), ProxigridError>;
}

impl ClassifiedToGeoParquet for [ClassifiedCell] {
    fn to_geoparquet(&self, path: impl AsRef<Path>) -> Result<(), ProxigridError> {
        let batch = self.to_record_batch()?;
        write_geoparquet([&batch], Vec::new(), path)
    }
}

impl ClassifiedToGeoParquet for ClassifiedGrid {
    /// Writes the cells together with the grid bounds, cell size, dimensions
    /// and per-category counts as footer metadata.
    fn to_geoparquet(&self, path: impl AsRef<Path>) -> Result<(), ProxigridError> {
        let batch = self.to_record_batch()?;
        write_geoparquet([&batch], grid_metadata(self)?, path)
    }
}
