use crate::core::geometry::{create_rect, create_square};
use crate::util::coord::Coordinate;
use geo_types::{Point, Polygon, Rect};
use serde::{Deserialize, Serialize};

/// A single square cell of a classification grid.
///
/// A cell is identified by its south-west corner and covers
/// `[south, south + size) x [west, west + size)` in degrees. Cells are
/// produced on demand by the grid and never stored beyond a run.
///
/// # Example
///
/// ```
/// use proxigrid::Cell;
///
/// let cell = Cell::new(0, 1, 51.5, -0.25, 0.25);
/// assert_eq!(cell.north(), 51.75);
/// let polygon = cell.to_polygon();
/// assert_eq!(polygon.exterior().coords().count(), 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Row index, counted northwards from the grid's southern edge
    pub row: usize,
    /// Column index, counted eastwards from the grid's western edge
    pub col: usize,
    /// Latitude of the southern edge
    pub south: f64,
    /// Longitude of the western edge
    pub west: f64,
    /// Edge length in degrees
    pub size: f64,
}

impl Cell {
    pub fn new(row: usize, col: usize, south: f64, west: f64, size: f64) -> Self {
        Self {
            row,
            col,
            south,
            west,
            size,
        }
    }

    pub fn north(&self) -> f64 {
        self.south + self.size
    }

    pub fn east(&self) -> f64 {
        self.west + self.size
    }

    /// South-west corner as a `geo_types::Point` (`x = lon`, `y = lat`).
    pub fn corner(&self) -> Point<f64> {
        Point::new(self.west, self.south)
    }

    pub fn center(&self) -> Point<f64> {
        Point::new(self.west + self.size / 2.0, self.south + self.size / 2.0)
    }

    /// Whether a coordinate falls inside the cell's half-open extent.
    pub fn contains<C: Coordinate>(&self, coord: &C) -> bool {
        let lat = coord.lat();
        let lon = coord.lon();
        lat >= self.south && lat < self.north() && lon >= self.west && lon < self.east()
    }

    pub fn to_rect(&self) -> Rect<f64> {
        create_rect(self.south, self.west, self.size)
    }

    /// Converts this cell to a closed square polygon, suitable for GeoJSON
    /// export or drawing on a map.
    pub fn to_polygon(&self) -> Polygon<f64> {
        create_square(self.south, self.west, self.size)
    }
}
