//! Cubic Bezier math in absolute coordinates.
//!
//! Vector network segments store tangents relative to their endpoints. Everything geometric (evaluation, subdivision,
//! extrema, intersection) happens on the absolute [`Bezier`] form built from a segment and converted back afterwards.

mod intersection;
mod solvers;

pub use intersection::*;

use glam::DVec2;

/// A cubic Bezier curve with absolute control points.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bezier {
	pub start: DVec2,
	pub handle_start: DVec2,
	pub handle_end: DVec2,
	pub end: DVec2,
}

impl Bezier {
	/// Create a cubic Bezier from its four absolute control points.
	pub fn from_cubic_dvec2(start: DVec2, handle_start: DVec2, handle_end: DVec2, end: DVec2) -> Self {
		Self { start, handle_start, handle_end, end }
	}

	/// Create a cubic Bezier from two endpoints and the tangents relative to each of them.
	pub fn from_relative(a: DVec2, b: DVec2, ta: DVec2, tb: DVec2) -> Self {
		Self::from_cubic_dvec2(a, a + ta, b + tb, b)
	}

	/// The handles expressed relative to their endpoints, as `(ta, tb)`.
	pub fn relative_tangents(&self) -> (DVec2, DVec2) {
		(self.handle_start - self.start, self.handle_end - self.end)
	}

	/// Whether both handles sit exactly on their endpoints.
	pub fn has_zero_tangents(&self) -> bool {
		self.handle_start == self.start && self.handle_end == self.end
	}

	/// Evaluate the curve at parametric `t` using the Bernstein form.
	pub fn evaluate(&self, t: f64) -> DVec2 {
		let t_squared = t * t;
		let one_minus_t = 1. - t;
		let squared_one_minus_t = one_minus_t * one_minus_t;
		squared_one_minus_t * one_minus_t * self.start + 3. * squared_one_minus_t * t * self.handle_start + 3. * one_minus_t * t_squared * self.handle_end + t_squared * t * self.end
	}

	/// First derivative at parametric `t`.
	pub fn derivative(&self, t: f64) -> DVec2 {
		let one_minus_t = 1. - t;
		3. * one_minus_t * one_minus_t * (self.handle_start - self.start) + 6. * one_minus_t * t * (self.handle_end - self.handle_start) + 3. * t * t * (self.end - self.handle_end)
	}

	/// Split the curve at `t` with de Casteljau's algorithm. The two halves trace exactly the original curve.
	pub fn split(&self, t: f64) -> [Bezier; 2] {
		let p01 = self.start.lerp(self.handle_start, t);
		let p12 = self.handle_start.lerp(self.handle_end, t);
		let p23 = self.handle_end.lerp(self.end, t);
		let p012 = p01.lerp(p12, t);
		let p123 = p12.lerp(p23, t);
		let split_point = p012.lerp(p123, t);

		[Bezier::from_cubic_dvec2(self.start, p01, p012, split_point), Bezier::from_cubic_dvec2(split_point, p123, p23, self.end)]
	}

	/// The portion of the curve between `t1` and `t2`.
	pub fn trim(&self, t1: f64, t2: f64) -> Bezier {
		let (t1, t2) = if t1 <= t2 { (t1, t2) } else { (t2, t1) };
		let [_, tail] = self.split(t1);
		if t1 >= 1. {
			return tail;
		}
		let [trimmed, _] = tail.split((t2 - t1) / (1. - t1));
		trimmed
	}

	/// Distance between the two endpoints.
	pub fn chord_length(&self) -> f64 {
		self.start.distance(self.end)
	}

	/// Return the min and max corners of the box enclosing the curve and both handles.
	pub fn bounding_box_of_anchors_and_handles(&self) -> [DVec2; 2] {
		[
			self.start.min(self.end).min(self.handle_start).min(self.handle_end),
			self.start.max(self.end).max(self.handle_start).max(self.handle_end),
		]
	}

	pub fn to_kurbo(&self) -> kurbo::CubicBez {
		let point = |p: DVec2| kurbo::Point::new(p.x, p.y);
		kurbo::CubicBez::new(point(self.start), point(self.handle_start), point(self.handle_end), point(self.end))
	}

	/// Signed area swept between the curve and the origin. Summed around a closed loop this is the enclosed area,
	/// positive for counter-clockwise loops in a y-up frame.
	pub fn signed_area(&self) -> f64 {
		use kurbo::ParamCurveArea;
		self.to_kurbo().signed_area()
	}
}
