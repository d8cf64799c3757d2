pub mod band;
pub mod constants;
pub mod geometry;
pub mod grid;
pub mod proximity;

pub use band::band_filter;
pub use constants::{
    BAND_CELLS_ABOVE, BAND_CELLS_BELOW, DEFAULT_CELL_SIZE, DEFAULT_CENTRE, DEFAULT_EXTENT_OFFSETS,
    GRID_STROKE_COLOR,
};
pub use geometry::{band_range, create_rect, create_square, in_window, step_count};
pub use grid::{grid_dimensions, point_to_row_col, row_col_to_corner, row_latitude, validate_cell_size};
pub use proximity::is_near;
