use crate::core::constants::{DEFAULT_CENTRE, DEFAULT_EXTENT_OFFSETS};
use crate::util::error::ProxigridError;
use geo_types::{Coord, Rect};
use serde::{Deserialize, Serialize};

/// A WGS84 bounding box in degrees.
///
/// Valid boxes satisfy `south < north` and `west < east`; the partitioner
/// checks this with [`BoundingBox::validate`] before producing any cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl BoundingBox {
    pub fn new(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self {
            south,
            west,
            north,
            east,
        }
    }

    /// Box around a `(lat, lon)` centre, with signed offsets
    /// `[south, west, north, east]` added to the centre.
    ///
    /// # Example
    /// ```
    /// use proxigrid::BoundingBox;
    ///
    /// let bounds = BoundingBox::around((51.508, -0.128), [-0.4, -1.1, 0.4, 0.6]);
    /// assert!((bounds.north - 51.908).abs() < 1e-9);
    /// ```
    pub fn around(centre: (f64, f64), offsets: [f64; 4]) -> Self {
        let (lat, lon) = centre;
        Self::new(
            lat + offsets[0],
            lon + offsets[1],
            lat + offsets[2],
            lon + offsets[3],
        )
    }

    pub fn from_rect(rect: &Rect<f64>) -> Self {
        Self::new(rect.min().y, rect.min().x, rect.max().y, rect.max().x)
    }

    pub fn to_rect(&self) -> Rect<f64> {
        Rect::new(
            Coord {
                x: self.west,
                y: self.south,
            },
            Coord {
                x: self.east,
                y: self.north,
            },
        )
    }

    pub fn height(&self) -> f64 {
        self.north - self.south
    }

    pub fn width(&self) -> f64 {
        self.east - self.west
    }

    pub fn validate(&self) -> Result<(), ProxigridError> {
        let edges = [self.south, self.west, self.north, self.east];
        if edges.iter().any(|v| !v.is_finite()) {
            return Err(ProxigridError::InvalidConfiguration(format!(
                "bounding box edges must be finite: {:?}",
                self
            )));
        }
        if self.south >= self.north {
            return Err(ProxigridError::InvalidConfiguration(format!(
                "south ({}) must be below north ({})",
                self.south, self.north
            )));
        }
        if self.west >= self.east {
            return Err(ProxigridError::InvalidConfiguration(format!(
                "west ({}) must be below east ({})",
                self.west, self.east
            )));
        }
        Ok(())
    }
}

impl Default for BoundingBox {
    /// The central London box around Trafalgar Square.
    fn default() -> Self {
        Self::around(DEFAULT_CENTRE, DEFAULT_EXTENT_OFFSETS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::coord;

    #[test]
    fn test_default_is_london() -> Result<(), ProxigridError> {
        let bounds = BoundingBox::default();
        bounds.validate()?;
        assert!((bounds.south - 51.108).abs() < 1e-9);
        assert!((bounds.west - -1.228).abs() < 1e-9);
        assert!((bounds.north - 51.908).abs() < 1e-9);
        assert!((bounds.east - 0.472).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn test_rect_conversion() {
        let rect = Rect::new(coord! { x: -1.0, y: 50.0 }, coord! { x: 1.0, y: 52.0 });
        let bounds = BoundingBox::from_rect(&rect);
        assert_eq!(bounds, BoundingBox::new(50.0, -1.0, 52.0, 1.0));
        assert_eq!(bounds.to_rect(), rect);
        assert_eq!(bounds.height(), 2.0);
        assert_eq!(bounds.width(), 2.0);
    }

    #[test]
    fn test_inverted_boxes_rejected() {
        let flipped_lat = BoundingBox::new(1.0, 0.0, 0.0, 1.0);
        let flipped_lon = BoundingBox::new(0.0, 1.0, 1.0, 1.0);
        let nan = BoundingBox::new(f64::NAN, 0.0, 1.0, 1.0);

        for bounds in [flipped_lat, flipped_lon, nan] {
            assert!(matches!(
                bounds.validate(),
                Err(ProxigridError::InvalidConfiguration(_))
            ));
        }
    }
}
