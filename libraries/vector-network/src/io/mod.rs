//! Conversions between vector networks and the outside world: parametric shapes and SVG path data.

mod path_data;
mod shapes;

pub use shapes::StarPolygon;
