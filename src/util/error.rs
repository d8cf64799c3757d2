use thiserror::Error;

/// Error type for proxigrid operations.
#[derive(Debug, Error, PartialEq)]
pub enum ProxigridError {
    /// Cell size, bounding box or tolerance values that cannot produce a grid.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// A feature collection required by the category policy was not supplied.
    #[error("Missing feature data: no collection named '{0}'")]
    MissingFeatureData(String),
    /// A feature record without usable numeric coordinates.
    #[error("Malformed feature record: {0}")]
    MalformedRecord(String),
    /// Failed to parse geometry from string (GeoJSON or WKT).
    #[error("Geometry parse error: {0}")]
    GeometryParseError(String),
    /// CSV parsing, reading or writing error.
    #[error("CSV error: {0}")]
    CsvError(String),
    /// File I/O or serialization error.
    #[error("IO error: {0}")]
    IoError(String),
    /// A configuration file that could not be read or decoded.
    #[error("Config error: {0}")]
    ConfigError(String),
}

impl From<std::io::Error> for ProxigridError {
    fn from(e: std::io::Error) -> Self {
        ProxigridError::IoError(e.to_string())
    }
}
