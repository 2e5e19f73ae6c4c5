use crate::error::VectorNetworkError;
use crate::network::{VectorNetwork, VectorNetworkEditor, VertexIndex};
use glam::DVec2;
use kurbo::{BezPath, PathEl, Point};

fn to_dvec2(point: Point) -> DVec2 {
	DVec2::new(point.x, point.y)
}

fn to_point(vector: DVec2) -> Point {
	Point::new(vector.x, vector.y)
}

impl VectorNetwork {
	/// Build a network from SVG path data.
	///
	/// Moves, lines (including horizontal and vertical), cubics (including smooth cubics) and closes are supported;
	/// elliptical arcs arrive as one or more cubics. Every endpoint goes through [`VectorNetworkEditor::add_vertex`], so
	/// points that repeat exactly share one vertex. Quadratic commands are rejected before anything is parsed.
	pub fn from_svg_path_data(d: &str) -> Result<Self, VectorNetworkError> {
		if let Some(command) = d.chars().find(|c| matches!(c, 'Q' | 'q' | 'T' | 't')) {
			return Err(VectorNetworkError::UnsupportedPathCommand(command));
		}
		let path = BezPath::from_svg(d).map_err(|error| VectorNetworkError::PathParse(error.to_string()))?;

		let mut editor = VectorNetworkEditor::default();
		let mut current: Option<VertexIndex> = None;
		let mut subpath_start: Option<VertexIndex> = None;

		for element in path.elements() {
			match *element {
				PathEl::MoveTo(point) => {
					let index = editor.add_vertex(to_dvec2(point), None, DVec2::ZERO, DVec2::ZERO)?;
					current = Some(index);
					subpath_start = Some(index);
				}
				PathEl::LineTo(point) => {
					current = Some(editor.add_vertex(to_dvec2(point), current, DVec2::ZERO, DVec2::ZERO)?);
				}
				PathEl::CurveTo(handle_start, handle_end, point) => {
					let end = to_dvec2(point);
					let start = match current {
						Some(index) => editor.vertex(index)?,
						None => end,
					};
					current = Some(editor.add_vertex(end, current, to_dvec2(handle_start) - start, to_dvec2(handle_end) - end)?);
				}
				PathEl::QuadTo(..) => return Err(VectorNetworkError::UnsupportedPathCommand('Q')),
				PathEl::ClosePath => {
					if let (Some(from), Some(start)) = (current, subpath_start) {
						if from != start {
							editor.add_segment(from, start, DVec2::ZERO, DVec2::ZERO)?;
						}
					}
					current = subpath_start;
				}
			}
		}

		log::debug!("Imported path data into {} vertices and {} segments", editor.vertices().len(), editor.segments().len());
		Ok(editor.into_value())
	}

	/// The network as a path, one subpath per run of segments that chain end to start.
	///
	/// A run that arrives back at the vertex it started from is closed. Straight segments become lines and everything
	/// else becomes a cubic.
	///
	/// # Panics
	/// If a segment references a vertex that does not exist; see [`VectorNetwork::validate`].
	pub fn to_bez_path(&self) -> BezPath {
		let mut path = BezPath::new();
		let mut subpath_start: Option<VertexIndex> = None;
		let mut previous_end: Option<VertexIndex> = None;

		for segment in &self.segments {
			let start = self.vertices[segment.a];
			let end = self.vertices[segment.b];

			if previous_end != Some(segment.a) {
				path.move_to(to_point(start));
				subpath_start = Some(segment.a);
			}

			if segment.is_straight() {
				path.line_to(to_point(end));
			} else {
				path.curve_to(to_point(start + segment.ta), to_point(end + segment.tb), to_point(end));
			}
			previous_end = Some(segment.b);

			if subpath_start == Some(segment.b) {
				path.close_path();
				subpath_start = None;
				previous_end = None;
			}
		}

		path
	}

	/// SVG path data for [`VectorNetwork::to_bez_path`]. A network without segments gives an empty string.
	pub fn to_svg_path_data(&self) -> String {
		if self.segments.is_empty() {
			return String::new();
		}
		self.to_bez_path().to_svg()
	}
}
