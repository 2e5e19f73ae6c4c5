//! The vector network data model.
//!
//! A [`VectorNetwork`] is an arena of vertices and directed cubic segments. Segments reference vertices purely by
//! index, so every structural deletion renumbers the indices that follow it within the same call.

mod bbox;
mod editor;
mod loops;
mod mirroring;
mod optimize;
mod planarize;
#[cfg(feature = "serde")]
mod serde_impl;
mod split;

pub use bbox::Rect;
pub use editor::{VectorNetworkEditor, VertexEnd};
pub use mirroring::{FrozenSegment, StrictTangentMirroringMode, TangentMirroringMode, infer_mirroring_mode};
pub use optimize::{OptimizationConfig, Selection};
pub use planarize::PlanarizeConfig;
pub use split::SplitSegmentConfig;

use crate::bezier::Bezier;
use crate::error::VectorNetworkError;
use glam::DVec2;

pub type VertexIndex = usize;
pub type SegmentIndex = usize;
/// An ordered cycle of segment indices bounding a region.
pub type Loop = Vec<SegmentIndex>;

/// Which of a segment's two tangents an operation addresses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(rename_all = "lowercase"))]
pub enum Control {
	/// The outgoing tangent, relative to vertex `a`.
	Ta,
	/// The incoming tangent, relative to vertex `b`.
	Tb,
}

impl Control {
	pub fn opposite(self) -> Self {
		match self {
			Control::Ta => Control::Tb,
			Control::Tb => Control::Ta,
		}
	}
}

/// A directed cubic curve from vertex `a` to vertex `b`.
///
/// The control points are `vertices[a] + ta` and `vertices[b] + tb`. Two zero tangents draw a straight line.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Segment {
	pub a: VertexIndex,
	pub b: VertexIndex,
	#[cfg_attr(feature = "serde", serde(default))]
	pub ta: DVec2,
	#[cfg_attr(feature = "serde", serde(default))]
	pub tb: DVec2,
}

impl Segment {
	pub fn new(a: VertexIndex, b: VertexIndex, ta: DVec2, tb: DVec2) -> Self {
		Self { a, b, ta, tb }
	}

	pub fn straight(a: VertexIndex, b: VertexIndex) -> Self {
		Self::new(a, b, DVec2::ZERO, DVec2::ZERO)
	}

	pub fn is_straight(&self) -> bool {
		self.ta == DVec2::ZERO && self.tb == DVec2::ZERO
	}

	pub fn touches(&self, vertex: VertexIndex) -> bool {
		self.a == vertex || self.b == vertex
	}

	/// The vertex a tangent is anchored to.
	pub fn vertex(&self, control: Control) -> VertexIndex {
		match control {
			Control::Ta => self.a,
			Control::Tb => self.b,
		}
	}

	pub fn tangent(&self, control: Control) -> DVec2 {
		match control {
			Control::Ta => self.ta,
			Control::Tb => self.tb,
		}
	}

	pub fn tangent_mut(&mut self, control: Control) -> &mut DVec2 {
		match control {
			Control::Ta => &mut self.ta,
			Control::Tb => &mut self.tb,
		}
	}

	/// The control whose tangent is anchored at `vertex`, preferring `ta` for self-loops.
	pub fn control_at(&self, vertex: VertexIndex) -> Option<Control> {
		if self.a == vertex {
			Some(Control::Ta)
		} else if self.b == vertex {
			Some(Control::Tb)
		} else {
			None
		}
	}

	/// The endpoint across the segment from `vertex`.
	pub fn other(&self, vertex: VertexIndex) -> VertexIndex {
		if self.a == vertex { self.b } else { self.a }
	}
}

/// A parametric position on one segment.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointOnSegment {
	pub segment: SegmentIndex,
	pub t: f64,
}

/// A [`PointOnSegment`] together with the absolute point it resolves to.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EvaluatedPointOnSegment {
	pub segment: SegmentIndex,
	pub t: f64,
	pub point: DVec2,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VectorNetwork {
	#[cfg_attr(feature = "serde", serde(with = "serde_impl::vertices"))]
	pub vertices: Vec<DVec2>,
	pub segments: Vec<Segment>,
}

impl VectorNetwork {
	pub fn new(vertices: Vec<DVec2>, segments: Vec<Segment>) -> Self {
		Self { vertices, segments }
	}

	/// An open chain of straight segments through `points`.
	pub fn polyline(points: &[DVec2]) -> Self {
		let segments = (1..points.len()).map(|i| Segment::straight(i - 1, i)).collect();
		Self::new(points.to_vec(), segments)
	}

	/// A closed chain of straight segments through `points`, with the last point connected back to the first.
	pub fn polygon(points: &[DVec2]) -> Self {
		let mut network = Self::polyline(points);
		if points.len() > 1 {
			network.segments.push(Segment::straight(points.len() - 1, 0));
		}
		network
	}

	pub fn is_empty(&self) -> bool {
		self.vertices.is_empty() && self.segments.is_empty()
	}

	/// Check that every segment references existing vertices.
	pub fn validate(&self) -> Result<(), VectorNetworkError> {
		let len = self.vertices.len();
		for segment in &self.segments {
			for index in [segment.a, segment.b] {
				if index >= len {
					return Err(VectorNetworkError::InvalidVertexIndex { index, len });
				}
			}
		}
		Ok(())
	}

	/// The absolute cubic Bezier traced by `segment`. Its endpoints must be valid vertex indices.
	pub fn bezier(&self, segment: &Segment) -> Bezier {
		Bezier::from_relative(self.vertices[segment.a], self.vertices[segment.b], segment.ta, segment.tb)
	}

	/// Iterate over the absolute curves of all segments, in segment order.
	pub fn beziers(&self) -> impl Iterator<Item = Bezier> + '_ {
		self.segments.iter().map(|segment| self.bezier(segment))
	}

	/// Absolute positions of every tangent control point, as `[ta, tb]` per segment.
	pub fn control_points_absolute(&self) -> Vec<[DVec2; 2]> {
		self.beziers().map(|bezier| [bezier.handle_start, bezier.handle_end]).collect()
	}

	/// The first vertex at exactly `point`.
	pub fn find_vertex(&self, point: DVec2) -> Option<VertexIndex> {
		self.vertices.iter().position(|&vertex| vertex == point)
	}

	pub fn translate(&mut self, delta: DVec2) {
		for vertex in &mut self.vertices {
			*vertex += delta;
		}
	}

	/// Scale vertices and tangents componentwise about the origin.
	pub fn scale(&mut self, factor: DVec2) {
		for vertex in &mut self.vertices {
			*vertex *= factor;
		}
		for segment in &mut self.segments {
			segment.ta *= factor;
			segment.tb *= factor;
		}
	}

	pub fn translated(&self, delta: DVec2) -> Self {
		let mut network = self.clone();
		network.translate(delta);
		network
	}

	pub fn scaled(&self, factor: DVec2) -> Self {
		let mut network = self.clone();
		network.scale(factor);
		network
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_polyline_and_polygon() {
		let points = [DVec2::new(0., 0.), DVec2::new(10., 0.), DVec2::new(10., 10.)];

		let polyline = VectorNetwork::polyline(&points);
		assert_eq!(polyline.segments, vec![Segment::straight(0, 1), Segment::straight(1, 2)]);

		let polygon = VectorNetwork::polygon(&points);
		assert_eq!(polygon.segments.len(), 3);
		assert_eq!(polygon.segments[2], Segment::straight(2, 0));

		assert!(VectorNetwork::polygon(&[]).is_empty());
	}

	#[test]
	fn test_validate() {
		let mut network = VectorNetwork::polyline(&[DVec2::ZERO, DVec2::ONE]);
		assert_eq!(network.validate(), Ok(()));

		network.segments.push(Segment::straight(1, 5));
		assert_eq!(network.validate(), Err(VectorNetworkError::InvalidVertexIndex { index: 5, len: 2 }));
	}

	#[test]
	fn test_scale_affects_tangents() {
		let mut network = VectorNetwork::new(vec![DVec2::new(1., 1.), DVec2::new(2., 3.)], vec![Segment::new(0, 1, DVec2::new(1., 1.), DVec2::new(-1., 2.))]);
		network.scale(DVec2::new(2., -1.));
		assert_eq!(network.vertices, vec![DVec2::new(2., -1.), DVec2::new(4., -3.)]);
		assert_eq!(network.segments[0].ta, DVec2::new(2., -1.));
		assert_eq!(network.segments[0].tb, DVec2::new(-2., -2.));

		let moved = network.translated(DVec2::new(1., 1.));
		assert_eq!(moved.vertices[0], DVec2::new(3., 0.));
		assert_eq!(moved.segments, network.segments);
	}
}
