use crate::core::constants::{BAND_CELLS_ABOVE, BAND_CELLS_BELOW};
use crate::core::geometry::band_range;
use crate::util::coord::Coordinate;

/// Narrows `points` to those whose latitude lies in the band around a grid row.
///
/// The band is
/// `[southern_latitude - (tolerance + 2 * cell_size), southern_latitude + (tolerance + 3 * cell_size))`,
/// a superset of every point the per-cell window test can accept for any
/// cell in the row. Input order is preserved.
pub fn band_filter<P: Coordinate>(
    points: &[P],
    southern_latitude: f64,
    tolerance: f64,
    cell_size: f64,
) -> Vec<&P> {
    let (low, high) = band_range(
        southern_latitude,
        tolerance,
        cell_size,
        BAND_CELLS_BELOW,
        BAND_CELLS_ABOVE,
    );
    points
        .iter()
        .filter(|p| {
            let lat = p.lat();
            lat >= low && lat < high
        })
        .collect()
}
