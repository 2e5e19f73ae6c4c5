//! Vector-network: an editable graph of cubic Bezier segments
//!
//! A [`VectorNetwork`] generalizes a path: any number of segments may meet at a vertex, and regions are discovered from
//! the graph instead of being declared. [`VectorNetworkEditor`] owns a network and applies the structural edits, tangent
//! mirroring, subdivision and planarization. Faces come from [`VectorNetwork::loops`].

pub mod bezier;
pub mod consts;
mod error;
pub mod io;
pub mod network;
pub mod utils;

pub use error::VectorNetworkError;
pub use io::StarPolygon;
pub use network::*;
