use crate::api::classify::ClassifiedGrid;
use crate::api::palette::Palette;
use crate::util::error::ProxigridError;
use std::fs::File;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryFormat {
    /// Well-Known Text format (e.g., "POLYGON((...))")
    Wkt,
    /// GeoJSON format
    GeoJson,
}

/// Options for writing a classified grid as CSV.
#[derive(Debug, Clone, Default)]
pub struct CsvExportConfig {
    /// Adds a `color` column looked up from this palette
    pub palette: Option<Palette>,
    /// Adds a `geometry` column with the cell square
    pub cell_geometry: Option<GeometryFormat>,
}

impl CsvExportConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn palette(mut self, palette: Palette) -> Self {
        self.palette = Some(palette);
        self
    }

    pub fn with_cell_geometry(mut self, format: GeometryFormat) -> Self {
        self.cell_geometry = Some(format);
        self
    }
}

pub trait ClassifiedToCsv {
    fn write_csv<W: Write>(&self, writer: W, config: &CsvExportConfig) -> Result<(), ProxigridError>;

    fn to_csv(&self, path: impl AsRef<Path>, config: &CsvExportConfig) -> Result<(), ProxigridError> {
        let file = File::create(path).map_err(|e| ProxigridError::IoError(e.to_string()))?;
        self.write_csv(file, config)
    }
}

fn polygon_to_wkt(polygon: &geo_types::Polygon<f64>) -> String {
    use wkt::ToWkt;
    polygon.wkt_string()
}

fn polygon_to_geojson(polygon: &geo_types::Polygon<f64>) -> String {
    let geom = geojson::Geometry::from(polygon);
    geom.to_string()
}

impl ClassifiedToCsv for ClassifiedGrid {
    /// One row per cell in row-major order:
    /// `row,col,south,west,north,east,category[,color][,geometry]`.
    fn write_csv<W: Write>(&self, writer: W, config: &CsvExportConfig) -> Result<(), ProxigridError> {
        let mut writer = csv::Writer::from_writer(writer);

        let mut header_row = vec!["row", "col", "south", "west", "north", "east", "category"];
        if config.palette.is_some() {
            header_row.push("color");
        }
        if config.cell_geometry.is_some() {
            header_row.push("geometry");
        }
        writer
            .write_record(&header_row)
            .map_err(|e| ProxigridError::CsvError(e.to_string()))?;

        for classified in self.iter() {
            let cell = &classified.cell;
            let mut row: Vec<String> = vec![
                cell.row.to_string(),
                cell.col.to_string(),
                cell.south.to_string(),
                cell.west.to_string(),
                cell.north().to_string(),
                cell.east().to_string(),
                classified.category.to_string(),
            ];

            if let Some(palette) = &config.palette {
                row.push(palette.color(classified.category).to_string());
            }

            if let Some(format) = config.cell_geometry {
                let polygon = cell.to_polygon();
                let geom_str = match format {
                    GeometryFormat::Wkt => polygon_to_wkt(&polygon),
                    GeometryFormat::GeoJson => polygon_to_geojson(&polygon),
                };
                row.push(geom_str);
            }

            writer
                .write_record(&row)
                .map_err(|e| ProxigridError::CsvError(e.to_string()))?;
        }

        writer
            .flush()
            .map_err(|e| ProxigridError::CsvError(e.to_string()))?;

        Ok(())
    }
}
