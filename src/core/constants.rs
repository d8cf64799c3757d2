/// Default cell edge in degrees (roughly 500 m of latitude)
pub const DEFAULT_CELL_SIZE: f64 = 0.005;

/// Default map centre `(lat, lon)`: Trafalgar Square, London
pub const DEFAULT_CENTRE: (f64, f64) = (51.508, -0.128);

/// Default bounding box offsets from the centre `[south, west, north, east]`
pub const DEFAULT_EXTENT_OFFSETS: [f64; 4] = [-0.4, -1.1, 0.4, 0.6];

/// Band prefilter margin below a row, in cells beyond the tolerance
pub const BAND_CELLS_BELOW: f64 = 2.0;

/// Band prefilter margin above a row, in cells beyond the tolerance
pub const BAND_CELLS_ABOVE: f64 = 3.0;

/// Grid overlay stroke colour used by the default palette
pub const GRID_STROKE_COLOR: &str = "#ff66cc";
