use crate::core::geometry::step_count;
use crate::util::coord::Coordinate;
use crate::util::error::ProxigridError;

/// Rejects cell sizes that would produce an empty or endless grid.
pub fn validate_cell_size(cell_size: f64) -> Result<(), ProxigridError> {
    if !cell_size.is_finite() || cell_size <= 0.0 {
        return Err(ProxigridError::InvalidConfiguration(format!(
            "cell size must be a positive number of degrees, got {}",
            cell_size
        )));
    }
    Ok(())
}

/// Returns `(rows, cols)` for a grid anchored at `(south, west)`.
///
/// A row or column is counted when its start is strictly below the bound, so
/// the last one on each axis may run past `north` / `east`. Fails when the
/// cell count would not fit in a `usize`.
pub fn grid_dimensions(
    south: f64,
    west: f64,
    north: f64,
    east: f64,
    cell_size: f64,
) -> Result<(usize, usize), ProxigridError> {
    validate_cell_size(cell_size)?;
    let too_large = || {
        ProxigridError::InvalidConfiguration(format!(
            "cell size {} is too small for the region",
            cell_size
        ))
    };
    let rows = step_count(south, north, cell_size).ok_or_else(too_large)?;
    let cols = step_count(west, east, cell_size).ok_or_else(too_large)?;
    rows.checked_mul(cols).ok_or_else(too_large)?;
    Ok((rows, cols))
}

/// Converts grid row/column indices to the cell's south-west corner `(lat, lon)`.
#[inline]
pub fn row_col_to_corner(row: usize, col: usize, south: f64, west: f64, cell_size: f64) -> (f64, f64) {
    (south + row as f64 * cell_size, west + col as f64 * cell_size)
}

/// Southern latitude of a grid row.
#[inline]
pub fn row_latitude(row: usize, south: f64, cell_size: f64) -> f64 {
    south + row as f64 * cell_size
}

/// Converts a coordinate to the `(row, col)` of the cell containing it.
///
/// Returns `None` for coordinates south or west of the grid origin or
/// outside `rows x cols`.
pub fn point_to_row_col<C: Coordinate>(
    coord: &C,
    south: f64,
    west: f64,
    cell_size: f64,
    rows: usize,
    cols: usize,
) -> Option<(usize, usize)> {
    let lat = coord.lat();
    let lon = coord.lon();
    if lat < south || lon < west || !lat.is_finite() || !lon.is_finite() {
        return None;
    }

    let row = settle_index(lat, south, cell_size, rows)?;
    let col = settle_index(lon, west, cell_size, cols)?;
    Some((row, col))
}

/// Index `i < count` with `start + i * step <= value < start + (i + 1) * step`,
/// settled against the generated cell starts rather than the raw quotient.
fn settle_index(value: f64, start: f64, step: f64, count: usize) -> Option<usize> {
    if count == 0 {
        return None;
    }
    let quotient = ((value - start) / step).floor();
    if quotient > count as f64 {
        return None;
    }
    let mut i = (quotient as usize).min(count - 1);
    while i > 0 && start + i as f64 * step > value {
        i -= 1;
    }
    while i + 1 < count && start + (i + 1) as f64 * step <= value {
        i += 1;
    }
    if start + (i + 1) as f64 * step <= value {
        return None;
    }
    Some(i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::point;

    #[test]
    fn test_grid_dimensions_exact_multiple() -> Result<(), ProxigridError> {
        let (rows, cols) = grid_dimensions(0.0, 0.0, 0.01, 0.01, 0.005)?;
        assert_eq!((rows, cols), (2, 2));
        Ok(())
    }

    #[test]
    fn test_grid_dimensions_partial_cells() -> Result<(), ProxigridError> {
        let (rows, cols) = grid_dimensions(0.0, 0.0, 0.012, 0.021, 0.005)?;
        assert_eq!((rows, cols), (3, 5));
        Ok(())
    }

    #[test]
    fn test_invalid_cell_size() {
        for size in [0.0, -0.5, f64::NAN, f64::INFINITY] {
            let result = grid_dimensions(0.0, 0.0, 1.0, 1.0, size);
            assert!(matches!(
                result,
                Err(ProxigridError::InvalidConfiguration(_))
            ));
        }
    }

    #[test]
    fn test_point_to_row_col_and_back() {
        let pt = point! { x: 0.0072, y: 0.0031 };
        let (row, col) = point_to_row_col(&pt, 0.0, 0.0, 0.005, 2, 2).unwrap();
        assert_eq!((row, col), (0, 1));

        let (lat, lon) = row_col_to_corner(row, col, 0.0, 0.0, 0.005);
        assert_eq!(lat, 0.0);
        assert_eq!(lon, 0.005);
    }

    #[test]
    fn test_cell_size_too_small_for_region() {
        for size in [1e-300, 1e-10] {
            let result = grid_dimensions(51.108, -1.228, 51.908, 0.472, size);
            assert!(matches!(
                result,
                Err(ProxigridError::InvalidConfiguration(_))
            ));
        }
    }

    #[test]
    fn test_corners_resolve_to_their_own_cell() {
        let (rows, cols) = (50, 50);
        for row in 0..rows {
            for col in 0..cols {
                let corner = row_col_to_corner(row, col, 0.0, 0.0, 0.1);
                assert_eq!(
                    point_to_row_col(&corner, 0.0, 0.0, 0.1, rows, cols),
                    Some((row, col)),
                    "corner {:?}",
                    corner
                );
            }
        }
    }

    #[test]
    fn test_point_outside_grid() {
        assert!(point_to_row_col(&(-0.001, 0.001), 0.0, 0.0, 0.005, 2, 2).is_none());
        assert!(point_to_row_col(&(0.011, 0.001), 0.0, 0.0, 0.005, 2, 2).is_none());
    }
}
