use crate::core::geometry::in_window;
use crate::util::coord::Coordinate;

/// True iff at least one point falls inside the tolerance window of the
/// cell whose south-west corner is `(south, west)`.
///
/// An empty slice is never near.
pub fn is_near<P: Coordinate>(
    points: &[P],
    south: f64,
    west: f64,
    tolerance: f64,
    cell_size: f64,
) -> bool {
    points
        .iter()
        .any(|p| in_window(p.lat(), p.lon(), south, west, tolerance, cell_size))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_never_near() {
        let points: Vec<(f64, f64)> = Vec::new();
        assert!(!is_near(&points, 0.0, 0.0, 1.0, 1.0));
    }

    #[test]
    fn test_single_point_inside_and_outside() {
        let points = vec![(0.0025, 0.0025)];
        assert!(is_near(&points, 0.0, 0.0, 0.005, 0.005));
        assert!(is_near(&points, 0.005, 0.005, 0.005, 0.005));
        // 0.0025 >= 0.02 - 0.005 fails
        assert!(!is_near(&points, 0.02, 0.0, 0.005, 0.005));
    }

    #[test]
    fn test_window_is_rectangular() {
        // the corner of the window counts even though it is further away
        // than the tolerance along the diagonal
        let points = vec![(-0.0049, -0.0049)];
        assert!(is_near(&points, 0.0, 0.0, 0.005, 0.005));
    }

    #[test]
    fn test_any_point_suffices() {
        let points = vec![(5.0, 5.0), (9.0, 9.0), (0.1, 0.1)];
        assert!(is_near(&points, 0.0, 0.0, 0.0, 0.5));
    }

    #[test]
    fn test_works_on_borrowed_views() {
        let owned = vec![(0.1, 0.1), (3.0, 3.0)];
        let view: Vec<&(f64, f64)> = owned.iter().filter(|p| p.0 < 1.0).collect();
        assert!(is_near(&view, 0.0, 0.0, 0.0, 0.5));
    }
}
