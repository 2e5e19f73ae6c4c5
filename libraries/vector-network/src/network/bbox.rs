use super::VectorNetwork;
use glam::DVec2;

/// An axis-aligned rectangle given by its top-left corner and size.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
	pub x: f64,
	pub y: f64,
	pub width: f64,
	pub height: f64,
}

impl Rect {
	pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
		Self { x, y, width, height }
	}

	pub fn from_corners([min, max]: [DVec2; 2]) -> Self {
		Self::new(min.x, min.y, max.x - min.x, max.y - min.y)
	}

	/// The smallest rectangle containing all `points`, or `None` if there are none.
	pub fn from_points(points: impl IntoIterator<Item = DVec2>) -> Option<Self> {
		let corners = points.into_iter().fold(None, |corners: Option<[DVec2; 2]>, point| match corners {
			Some([min, max]) => Some([min.min(point), max.max(point)]),
			None => Some([point, point]),
		});
		corners.map(Self::from_corners)
	}

	pub fn min(&self) -> DVec2 {
		DVec2::new(self.x, self.y)
	}

	pub fn max(&self) -> DVec2 {
		DVec2::new(self.x + self.width, self.y + self.height)
	}

	pub fn center(&self) -> DVec2 {
		DVec2::new(self.x + self.width / 2., self.y + self.height / 2.)
	}

	pub fn union(&self, other: &Rect) -> Rect {
		Self::from_corners([self.min().min(other.min()), self.max().max(other.max())])
	}
}

impl VectorNetwork {
	/// The exact bounding box: the union of every segment's analytic cubic bounds.
	///
	/// Without segments this is the box around the vertices; an empty network yields a zero rectangle at the origin.
	pub fn bbox(&self) -> Rect {
		if self.segments.is_empty() {
			return Rect::from_points(self.vertices.iter().copied()).unwrap_or_default();
		}

		self.beziers().map(|bezier| Rect::from_corners(bezier.bounding_box())).reduce(|a, b| a.union(&b)).unwrap_or_default()
	}

	/// A fast, conservative bounding box over vertices and absolute tangent control points.
	pub fn bbox_approx(&self) -> Rect {
		let control_points = self.control_points_absolute().into_iter().flatten();
		Rect::from_points(self.vertices.iter().copied().chain(control_points)).unwrap_or_default()
	}
}
