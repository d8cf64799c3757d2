use crate::api::bounds::BoundingBox;
use crate::api::cell::Cell;
use crate::core::constants::DEFAULT_CELL_SIZE;
use crate::core::grid::{grid_dimensions, point_to_row_col, row_col_to_corner, row_latitude};
use crate::util::coord::Coordinate;
use crate::util::error::ProxigridError;
use geo_types::{Polygon, Rect};
use std::iter::FusedIterator;

/// A regular grid of square cells over a bounding box.
///
/// The grid stores only its bounds, cell size and dimensions; cells are
/// generated lazily in row-major order (south to north, west to east).
/// The last row and column may extend past the bounding box.
///
/// # Example
///
/// ```
/// use proxigrid::Grid;
///
/// # fn main() -> Result<(), proxigrid::ProxigridError> {
/// let grid = Grid::builder()
///     .extent(0.0, 0.0, 0.01, 0.01)
///     .cell_size(0.005)
///     .build()?;
///
/// assert_eq!(grid.dimensions(), (2, 2));
/// assert_eq!(grid.iter().count(), 4);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    bounds: BoundingBox,
    cell_size: f64,
    rows: usize,
    cols: usize,
}

impl Grid {
    pub fn builder() -> GridBuilder {
        GridBuilder::new()
    }

    /// Validates the inputs and computes the grid dimensions.
    ///
    /// Fails with [`ProxigridError::InvalidConfiguration`] for an inverted or
    /// non-finite box, or a cell size that is not a positive number.
    pub fn new(bounds: BoundingBox, cell_size: f64) -> Result<Self, ProxigridError> {
        bounds.validate()?;
        let (rows, cols) = grid_dimensions(
            bounds.south,
            bounds.west,
            bounds.north,
            bounds.east,
            cell_size,
        )?;

        log::info!("Grid size {} x {}", rows, cols);

        Ok(Self {
            bounds,
            cell_size,
            rows,
            cols,
        })
    }

    pub fn from_rect(rect: &Rect<f64>, cell_size: f64) -> Result<Self, ProxigridError> {
        Self::new(BoundingBox::from_rect(rect), cell_size)
    }

    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns `(rows, cols)`.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Southern latitude shared by every cell of `row`.
    pub fn row_latitude(&self, row: usize) -> f64 {
        row_latitude(row, self.bounds.south, self.cell_size)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<Cell> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        let (south, west) =
            row_col_to_corner(row, col, self.bounds.south, self.bounds.west, self.cell_size);
        Some(Cell::new(row, col, south, west, self.cell_size))
    }

    /// Returns the cell containing a coordinate, if it lies on the grid.
    pub fn cell_at<C: Coordinate>(&self, coord: &C) -> Option<Cell> {
        let (row, col) = point_to_row_col(
            coord,
            self.bounds.south,
            self.bounds.west,
            self.cell_size,
            self.rows,
            self.cols,
        )?;
        self.cell(row, col)
    }

    /// Cells of a single row, west to east.
    pub fn row(&self, row: usize) -> impl ExactSizeIterator<Item = Cell> {
        let grid = *self;
        let cols = if row < grid.rows { grid.cols } else { 0 };
        (0..cols).map(move |col| {
            let (south, west) =
                row_col_to_corner(row, col, grid.bounds.south, grid.bounds.west, grid.cell_size);
            Cell::new(row, col, south, west, grid.cell_size)
        })
    }

    /// Lazy row-major iterator over every cell. Each call starts afresh.
    pub fn iter(&self) -> Partition {
        Partition {
            grid: *self,
            next: 0,
        }
    }

    pub fn to_polygons(&self) -> Vec<Polygon<f64>> {
        self.iter().map(|cell| cell.to_polygon()).collect()
    }

    pub fn filter<F>(&self, predicate: F) -> Vec<Cell>
    where
        F: Fn(&Cell) -> bool,
    {
        self.iter().filter(|cell| predicate(cell)).collect()
    }
}

impl<'a> IntoIterator for &'a Grid {
    type Item = Cell;
    type IntoIter = Partition;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Partitions a bounding box into cells, row-major.
///
/// Shorthand for `Grid::new(bounds, cell_size)?.iter()`.
pub fn partition(bounds: BoundingBox, cell_size: f64) -> Result<Partition, ProxigridError> {
    Ok(Grid::new(bounds, cell_size)?.iter())
}

/// Row-major cell iterator produced by [`Grid::iter`] and [`partition`].
///
/// Cloning copies the current position; call [`Grid::iter`] to start over.
#[derive(Debug, Clone)]
pub struct Partition {
    grid: Grid,
    next: usize,
}

impl Partition {
    pub fn grid(&self) -> &Grid {
        &self.grid
    }
}

impl Iterator for Partition {
    type Item = Cell;

    fn next(&mut self) -> Option<Cell> {
        if self.grid.cols == 0 || self.next >= self.grid.len() {
            return None;
        }
        let row = self.next / self.grid.cols;
        let col = self.next % self.grid.cols;
        self.next += 1;
        self.grid.cell(row, col)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.grid.len().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Partition {}

impl FusedIterator for Partition {}

#[derive(Debug, Default)]
pub struct GridBuilder {
    bounds: Option<BoundingBox>,
    cell_size: Option<f64>,
}

impl GridBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bounds(mut self, bounds: BoundingBox) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn extent(mut self, south: f64, west: f64, north: f64, east: f64) -> Self {
        self.bounds = Some(BoundingBox::new(south, west, north, east));
        self
    }

    pub fn rect(mut self, rect: &Rect<f64>) -> Self {
        self.bounds = Some(BoundingBox::from_rect(rect));
        self
    }

    pub fn cell_size(mut self, cell_size: f64) -> Self {
        self.cell_size = Some(cell_size);
        self
    }

    /// Builds the grid. Unset values fall back to the London box and a
    /// 0.005 degree cell.
    pub fn build(self) -> Result<Grid, ProxigridError> {
        Grid::new(
            self.bounds.unwrap_or_default(),
            self.cell_size.unwrap_or(DEFAULT_CELL_SIZE),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::{coord, point};

    fn expected_count(bounds: &BoundingBox, size: f64) -> usize {
        let rows = ((bounds.north - bounds.south) / size).ceil() as usize;
        let cols = ((bounds.east - bounds.west) / size).ceil() as usize;
        rows * cols
    }

    #[test]
    fn test_row_major_order() -> Result<(), ProxigridError> {
        let grid = Grid::new(BoundingBox::new(0.0, 0.0, 1.0, 1.5), 0.5)?;
        let cells: Vec<(usize, usize, f64, f64)> =
            grid.iter().map(|c| (c.row, c.col, c.south, c.west)).collect();

        assert_eq!(
            cells,
            vec![
                (0, 0, 0.0, 0.0),
                (0, 1, 0.0, 0.5),
                (0, 2, 0.0, 1.0),
                (1, 0, 0.5, 0.0),
                (1, 1, 0.5, 0.5),
                (1, 2, 0.5, 1.0),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_cell_count_matches_ceil() -> Result<(), ProxigridError> {
        let cases = [
            (BoundingBox::new(0.0, 0.0, 0.01, 0.01), 0.005),
            (BoundingBox::new(0.0, 0.0, 1.0, 1.0), 0.3),
            (BoundingBox::new(-2.0, -3.0, 2.5, 1.0), 0.75),
            (BoundingBox::new(10.0, 20.0, 10.5, 21.0), 0.125),
        ];
        for (bounds, size) in cases {
            let grid = Grid::new(bounds, size)?;
            assert_eq!(grid.len(), expected_count(&bounds, size));
            assert_eq!(grid.iter().count(), grid.len());
        }
        Ok(())
    }

    #[test]
    fn test_cells_start_inside_bounds() -> Result<(), ProxigridError> {
        let bounds = BoundingBox::new(0.0, 0.0, 1.0, 1.0);
        let grid = Grid::new(bounds, 0.3)?;

        for cell in grid.iter() {
            assert!(cell.south >= bounds.south && cell.south < bounds.north);
            assert!(cell.west >= bounds.west && cell.west < bounds.east);
        }

        // the last row and column overhang the box
        let last = grid.cell(grid.rows() - 1, grid.cols() - 1).unwrap();
        assert!(last.north() > bounds.north);
        assert!(last.east() > bounds.east);
        Ok(())
    }

    #[test]
    fn test_partition_is_restartable() -> Result<(), ProxigridError> {
        let grid = Grid::new(BoundingBox::new(0.0, 0.0, 1.0, 1.0), 0.25)?;
        let first: Vec<Cell> = grid.iter().collect();
        let second: Vec<Cell> = grid.iter().collect();
        assert_eq!(first, second);

        let mut partial = grid.iter();
        partial.next();
        assert_eq!(partial.len(), 15);
        Ok(())
    }

    #[test]
    fn test_partition_rejects_bad_input() {
        let bounds = BoundingBox::new(0.0, 0.0, 1.0, 1.0);
        assert!(matches!(
            partition(bounds, 0.0),
            Err(ProxigridError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            partition(bounds, -0.1),
            Err(ProxigridError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            partition(BoundingBox::new(1.0, 0.0, 1.0, 1.0), 0.1),
            Err(ProxigridError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_cell_at() -> Result<(), ProxigridError> {
        let grid = Grid::new(BoundingBox::new(0.0, 0.0, 1.0, 1.0), 0.25)?;
        let pt = point! { x: 0.6, y: 0.3 };
        let cell = grid.cell_at(&pt).unwrap();
        assert_eq!((cell.row, cell.col), (1, 2));
        assert!(cell.contains(&pt));
        assert!(grid.cell_at(&(2.0, 0.5)).is_none());
        Ok(())
    }

    #[test]
    fn test_cell_at_every_corner() -> Result<(), ProxigridError> {
        let grid = Grid::new(BoundingBox::new(0.0, 0.0, 5.0, 5.0), 0.1)?;
        for cell in &grid {
            let corner = (cell.south, cell.west);
            let found = grid.cell_at(&corner);
            assert_eq!(found, Some(cell), "corner {:?}", corner);
            assert!(cell.contains(&corner));
        }
        Ok(())
    }

    #[test]
    fn test_tiny_cell_size_is_rejected() {
        assert!(matches!(
            Grid::new(BoundingBox::new(0.0, 0.0, 1.0, 1.0), 1e-300),
            Err(ProxigridError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            Grid::new(BoundingBox::default(), 1e-10),
            Err(ProxigridError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_row_cells() -> Result<(), ProxigridError> {
        let grid = Grid::new(BoundingBox::new(0.0, 0.0, 1.0, 1.0), 0.5)?;
        let row: Vec<Cell> = grid.row(1).collect();
        assert_eq!(row.len(), 2);
        assert!(row.iter().all(|c| c.row == 1 && c.south == 0.5));
        assert_eq!(grid.row(5).len(), 0);
        Ok(())
    }

    #[test]
    fn test_builder() -> Result<(), ProxigridError> {
        let rect = Rect::new(coord! { x: 0.0, y: 0.0 }, coord! { x: 1.0, y: 1.0 });
        let grid = Grid::builder().rect(&rect).cell_size(0.5).build()?;
        assert_eq!(grid.dimensions(), (2, 2));

        let london = Grid::builder().build()?;
        assert_eq!(london.bounds(), &BoundingBox::default());
        assert_eq!(london.cell_size(), DEFAULT_CELL_SIZE);
        assert!(!london.is_empty());
        Ok(())
    }

    #[test]
    fn test_filter_and_polygons() -> Result<(), ProxigridError> {
        let grid = Grid::new(BoundingBox::new(0.0, 0.0, 1.0, 1.0), 0.25)?;
        let eastern = grid.filter(|cell| cell.west >= 0.5);
        assert_eq!(eastern.len(), 8);
        assert_eq!(grid.to_polygons().len(), grid.len());
        Ok(())
    }
}
