pub mod coord;
pub mod error;

pub use coord::{Coordinate, is_valid_lat_lon};
pub use error::ProxigridError;
