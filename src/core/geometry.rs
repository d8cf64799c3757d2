use geo_types::{Coord, LineString, Polygon, Rect};

/// Rectangular proximity window test in degree space.
///
/// Accepts a point when it lies in
/// `[south - tolerance, south + tolerance + size) x [west - tolerance, west + tolerance + size)`.
/// This is deliberately not a geodesic distance.
#[inline]
pub fn in_window(lat: f64, lon: f64, south: f64, west: f64, tolerance: f64, size: f64) -> bool {
    lat >= south - tolerance
        && lat < south + tolerance + size
        && lon >= west - tolerance
        && lon < west + tolerance + size
}

/// Half-open latitude range `[low, high)` covering every point that can be
/// near some cell in the row starting at `south`.
#[inline]
pub fn band_range(south: f64, tolerance: f64, size: f64, below: f64, above: f64) -> (f64, f64) {
    (
        south - (tolerance + below * size),
        south + (tolerance + above * size),
    )
}

/// Axis-aligned square with its south-west corner at `(south, west)`.
pub fn create_square(south: f64, west: f64, size: f64) -> Polygon<f64> {
    let north = south + size;
    let east = west + size;
    let coords = vec![
        Coord { x: west, y: south },
        Coord { x: east, y: south },
        Coord { x: east, y: north },
        Coord { x: west, y: north },
        Coord { x: west, y: south },
    ];

    Polygon::new(LineString::from(coords), vec![])
}

pub fn create_rect(south: f64, west: f64, size: f64) -> Rect<f64> {
    Rect::new(
        Coord { x: west, y: south },
        Coord {
            x: west + size,
            y: south + size,
        },
    )
}

/// Number of steps of `step` from `start` whose value stays strictly below `end`.
///
/// Positions are computed as `start + i * step` rather than by repeated
/// addition, so the count and the generated positions always agree.
/// Returns `None` when the count does not fit in a `usize`.
pub fn step_count(start: f64, end: f64, step: f64) -> Option<usize> {
    if end <= start {
        return Some(0);
    }
    let ratio = ((end - start) / step).ceil();
    if !ratio.is_finite() || ratio >= usize::MAX as f64 {
        return None;
    }
    let mut n = ratio as usize;
    while n > 0 && start + (n - 1) as f64 * step >= end {
        n -= 1;
    }
    while start + n as f64 * step < end {
        n = n.checked_add(1)?;
    }
    Some(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_window_edges() {
        // lower bounds inclusive, upper bounds exclusive
        assert!(in_window(0.0, 0.0, 0.0, 0.0, 0.0, 1.0));
        assert!(!in_window(1.0, 0.5, 0.0, 0.0, 0.0, 1.0));
        assert!(!in_window(0.5, 1.0, 0.0, 0.0, 0.0, 1.0));
        assert!(in_window(-0.5, -0.5, 0.0, 0.0, 0.5, 1.0));
        assert!(!in_window(-0.6, 0.0, 0.0, 0.0, 0.5, 1.0));
    }

    #[test]
    fn test_band_range_multipliers() {
        let (low, high) = band_range(10.0, 1.0, 0.5, 2.0, 3.0);
        assert_eq!(low, 10.0 - 2.0);
        assert_eq!(high, 10.0 + 2.5);
    }

    #[test]
    fn test_create_square() {
        let square = create_square(0.0, 0.0, 1.0);
        let exterior = square.exterior();
        assert_eq!(exterior.coords().count(), 5); // 4 corners + 1 to close
        assert_eq!(exterior.0[0], exterior.0[4]);
    }

    #[test]
    fn test_create_rect() {
        let rect = create_rect(51.0, -0.5, 0.25);
        assert_eq!(rect.min(), Coord { x: -0.5, y: 51.0 });
        assert_eq!(rect.max(), Coord { x: -0.25, y: 51.25 });
    }

    #[test]
    fn test_step_count() {
        assert_eq!(step_count(0.0, 0.01, 0.005), Some(2));
        assert_eq!(step_count(0.0, 0.011, 0.005), Some(3));
        assert_eq!(step_count(0.0, 1.0, 0.3), Some(4));
        assert_eq!(step_count(1.0, 1.0, 0.5), Some(0));
        assert_eq!(step_count(2.0, 1.0, 0.5), Some(0));
    }

    #[test]
    fn test_step_count_too_many_steps() {
        assert_eq!(step_count(0.0, 1.0, 1e-300), None);
        assert_eq!(step_count(0.0, 1e300, 1e-300), None);
    }
}
