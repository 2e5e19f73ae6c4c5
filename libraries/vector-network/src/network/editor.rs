use super::{Control, EvaluatedPointOnSegment, PointOnSegment, Segment, SegmentIndex, VectorNetwork, VertexIndex};
use crate::bezier::Bezier;
use crate::error::VectorNetworkError;
use glam::DVec2;

/// Which endpoint of a segment a vertex query matches against.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VertexEnd {
	A,
	B,
	#[default]
	Any,
}

/// Mutable access to a [`VectorNetwork`] through index-checked editing operations.
///
/// Every operation that takes an index validates it first and leaves the network untouched on error.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VectorNetworkEditor {
	pub(super) network: VectorNetwork,
}

impl From<VectorNetwork> for VectorNetworkEditor {
	fn from(network: VectorNetwork) -> Self {
		Self::new(network)
	}
}

impl VectorNetworkEditor {
	pub fn new(network: VectorNetwork) -> Self {
		Self { network }
	}

	/// The live network being edited.
	pub fn value(&self) -> &VectorNetwork {
		&self.network
	}

	pub fn value_mut(&mut self) -> &mut VectorNetwork {
		&mut self.network
	}

	pub fn into_value(self) -> VectorNetwork {
		self.network
	}

	pub fn vertices(&self) -> &[DVec2] {
		&self.network.vertices
	}

	pub fn segments(&self) -> &[Segment] {
		&self.network.segments
	}

	pub(super) fn check_vertex(&self, index: VertexIndex) -> Result<(), VectorNetworkError> {
		let len = self.network.vertices.len();
		if index < len { Ok(()) } else { Err(VectorNetworkError::InvalidVertexIndex { index, len }) }
	}

	pub fn vertex(&self, index: VertexIndex) -> Result<DVec2, VectorNetworkError> {
		self.check_vertex(index)?;
		Ok(self.network.vertices[index])
	}

	pub fn segment(&self, index: SegmentIndex) -> Result<&Segment, VectorNetworkError> {
		let len = self.network.segments.len();
		self.network.segments.get(index).ok_or(VectorNetworkError::InvalidSegmentIndex { index, len })
	}

	pub(super) fn segment_mut(&mut self, index: SegmentIndex) -> Result<&mut Segment, VectorNetworkError> {
		let len = self.network.segments.len();
		self.network.segments.get_mut(index).ok_or(VectorNetworkError::InvalidSegmentIndex { index, len })
	}

	/// The absolute cubic Bezier traced by a segment.
	pub fn segment_bezier(&self, index: SegmentIndex) -> Result<Bezier, VectorNetworkError> {
		let segment = self.segment(index)?;
		Ok(self.network.bezier(segment))
	}

	/// Resolve a parametric position to its absolute point. `t` is clamped to `[0, 1]`.
	pub fn evaluate(&self, point: PointOnSegment) -> Result<EvaluatedPointOnSegment, VectorNetworkError> {
		let t = point.t.clamp(0., 1.);
		let bezier = self.segment_bezier(point.segment)?;
		Ok(EvaluatedPointOnSegment {
			segment: point.segment,
			t,
			point: bezier.evaluate(t),
		})
	}

	pub fn find_vertex(&self, point: DVec2) -> Option<VertexIndex> {
		self.network.find_vertex(point)
	}

	/// Indices of the segments touching `vertex` at the requested end.
	pub fn find_segments(&self, vertex: VertexIndex, end: VertexEnd) -> Vec<SegmentIndex> {
		let matches = |segment: &Segment| match end {
			VertexEnd::A => segment.a == vertex,
			VertexEnd::B => segment.b == vertex,
			VertexEnd::Any => segment.touches(vertex),
		};
		self.network.segments.iter().enumerate().filter(|(_, segment)| matches(segment)).map(|(index, _)| index).collect()
	}

	/// Vertices sharing a segment with `vertex`, sorted and without duplicates.
	pub fn neighboring_vertices(&self, vertex: VertexIndex) -> Vec<VertexIndex> {
		let mut neighbors = Vec::new();
		for segment in &self.network.segments {
			if segment.a == vertex {
				neighbors.push(segment.b);
			}
			if segment.b == vertex {
				neighbors.push(segment.a);
			}
		}
		neighbors.sort_unstable();
		neighbors.dedup();
		neighbors
	}

	/// Straight-line distance between the endpoints of a segment.
	pub fn segment_length(&self, index: SegmentIndex) -> Result<f64, VectorNetworkError> {
		Ok(self.segment_bezier(index)?.chord_length())
	}

	/// Whether exactly two segments meet at `vertex`.
	pub fn is_exact_corner(&self, vertex: VertexIndex) -> bool {
		self.find_segments(vertex, VertexEnd::Any).len() == 2
	}

	/// The vertex a segment's tangent is anchored to.
	pub fn tangent_vertex(&self, segment: SegmentIndex, control: Control) -> Result<VertexIndex, VectorNetworkError> {
		Ok(self.segment(segment)?.vertex(control))
	}

	/// Absolute vertex positions offset by `offset`.
	pub fn vertices_absolute(&self, offset: DVec2) -> Vec<DVec2> {
		self.network.vertices.iter().map(|&vertex| vertex + offset).collect()
	}

	/// The tangent a new segment leaving `origin` should start with to continue the open path smoothly.
	///
	/// Only an open end (exactly one incident segment) has a direction to continue; anything else yields zero.
	pub fn next_mirrored_tangent(&self, origin: VertexIndex) -> DVec2 {
		match self.find_segments(origin, VertexEnd::Any).as_slice() {
			&[only] => -self.network.segments[only].tb,
			_ => DVec2::ZERO,
		}
	}

	/// Add a vertex at `point`, reusing any vertex already at exactly that position, and optionally connect it from `origin`.
	pub fn add_vertex(&mut self, point: DVec2, origin: Option<VertexIndex>, ta: DVec2, tb: DVec2) -> Result<VertexIndex, VectorNetworkError> {
		if let Some(origin) = origin {
			self.check_vertex(origin)?;
		}

		let index = match self.network.find_vertex(point) {
			Some(existing) => existing,
			None => {
				self.network.vertices.push(point);
				self.network.vertices.len() - 1
			}
		};

		if let Some(origin) = origin {
			self.add_segment(origin, index, ta, tb)?;
		}
		Ok(index)
	}

	pub fn add_segment(&mut self, a: VertexIndex, b: VertexIndex, ta: DVec2, tb: DVec2) -> Result<SegmentIndex, VectorNetworkError> {
		self.check_vertex(a)?;
		self.check_vertex(b)?;
		self.network.segments.push(Segment::new(a, b, ta, tb));
		Ok(self.network.segments.len() - 1)
	}

	/// Remove a vertex together with every segment touching it, shifting higher vertex indices down by one.
	pub fn delete_vertex(&mut self, index: VertexIndex) -> Result<(), VectorNetworkError> {
		self.check_vertex(index)?;

		self.network.vertices.remove(index);
		self.network.segments.retain(|segment| !segment.touches(index));
		shift_vertex_indices(&mut self.network.segments, index);
		Ok(())
	}

	/// Remove a vertex only if no segment references it. Returns whether it was removed.
	pub fn remove_unused_vertex(&mut self, index: VertexIndex) -> Result<bool, VectorNetworkError> {
		self.check_vertex(index)?;

		if self.network.segments.iter().any(|segment| segment.touches(index)) {
			return Ok(false);
		}

		self.network.vertices.remove(index);
		shift_vertex_indices(&mut self.network.segments, index);
		Ok(true)
	}

	pub fn move_vertex(&mut self, index: VertexIndex, point: DVec2) -> Result<(), VectorNetworkError> {
		self.check_vertex(index)?;
		self.network.vertices[index] = point;
		Ok(())
	}

	pub fn translate_vertex(&mut self, index: VertexIndex, delta: DVec2) -> Result<(), VectorNetworkError> {
		self.check_vertex(index)?;
		self.network.vertices[index] += delta;
		Ok(())
	}

	/// Move both endpoints of a segment by `delta`.
	pub fn translate_segment(&mut self, index: SegmentIndex, delta: DVec2) -> Result<(), VectorNetworkError> {
		let Segment { a, b, .. } = *self.segment(index)?;
		self.translate_vertex(a, delta)?;
		if b != a {
			self.translate_vertex(b, delta)?;
		}
		Ok(())
	}

	pub fn translate(&mut self, delta: DVec2) {
		self.network.translate(delta);
	}

	pub fn scale(&mut self, factor: DVec2) {
		self.network.scale(factor);
	}

	/// Remove a segment, shifting higher segment indices down by one. Vertices are kept.
	pub fn delete_segment(&mut self, index: SegmentIndex) -> Result<Segment, VectorNetworkError> {
		self.segment(index)?;
		Ok(self.network.segments.remove(index))
	}

	/// Reset one tangent of a segment to zero.
	pub fn delete_tangent(&mut self, index: SegmentIndex, control: Control) -> Result<(), VectorNetworkError> {
		*self.segment_mut(index)?.tangent_mut(control) = DVec2::ZERO;
		Ok(())
	}

	/// Append `point` and rebuild the network as one polyline through all vertices in order.
	pub fn extend_polyline(&mut self, point: DVec2) -> VertexIndex {
		let mut points = std::mem::take(&mut self.network.vertices);
		points.push(point);
		self.network = VectorNetwork::polyline(&points);
		self.network.vertices.len() - 1
	}

	/// Replace the network with a single straight line from the first vertex to `point`.
	pub fn extend_line(&mut self, point: DVec2) -> VertexIndex {
		self.network = match self.network.vertices.first() {
			Some(&start) => VectorNetwork::polyline(&[start, point]),
			None => VectorNetwork::new(vec![point], Vec::new()),
		};
		self.network.vertices.len() - 1
	}
}

/// Decrement every segment endpoint above a just-removed vertex index.
fn shift_vertex_indices(segments: &mut [Segment], removed: VertexIndex) {
	for segment in segments {
		if segment.a > removed {
			segment.a -= 1;
		}
		if segment.b > removed {
			segment.b -= 1;
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	fn chain() -> VectorNetworkEditor {
		// A - B - C - D
		VectorNetworkEditor::new(VectorNetwork::polyline(&[DVec2::new(0., 0.), DVec2::new(10., 0.), DVec2::new(20., 0.), DVec2::new(30., 0.)]))
	}

	#[test]
	fn test_add_vertex_reuses_exact_position() {
		let mut editor = chain();
		let index = editor.add_vertex(DVec2::new(10., 0.), None, DVec2::ZERO, DVec2::ZERO).unwrap();
		assert_eq!(index, 1);
		assert_eq!(editor.vertices().len(), 4);

		let index = editor.add_vertex(DVec2::new(40., 0.), Some(3), DVec2::new(1., 0.), DVec2::ZERO).unwrap();
		assert_eq!(index, 4);
		assert_eq!(editor.segments().last(), Some(&Segment::new(3, 4, DVec2::new(1., 0.), DVec2::ZERO)));
	}

	#[test]
	fn test_add_vertex_invalid_origin_leaves_network() {
		let mut editor = chain();
		let before = editor.clone();
		assert_eq!(editor.add_vertex(DVec2::new(99., 0.), Some(9), DVec2::ZERO, DVec2::ZERO), Err(VectorNetworkError::InvalidVertexIndex { index: 9, len: 4 }));
		assert_eq!(editor, before);
	}

	#[test]
	fn test_delete_vertex_renumbers() {
		let mut editor = chain();
		editor.delete_vertex(1).unwrap();
		assert_eq!(editor.vertices(), &[DVec2::new(0., 0.), DVec2::new(20., 0.), DVec2::new(30., 0.)]);
		assert_eq!(editor.segments(), &[Segment::straight(1, 2)]);

		assert_eq!(editor.delete_vertex(3), Err(VectorNetworkError::InvalidVertexIndex { index: 3, len: 3 }));
	}

	#[test]
	fn test_remove_unused_vertex() {
		let mut editor = chain();
		assert_eq!(editor.remove_unused_vertex(1), Ok(false));
		assert_eq!(editor.vertices().len(), 4);

		editor.value_mut().vertices.insert(0, DVec2::new(-10., 0.));
		for segment in &mut editor.value_mut().segments {
			segment.a += 1;
			segment.b += 1;
		}
		assert_eq!(editor.remove_unused_vertex(0), Ok(true));
		assert_eq!(editor.value(), chain().value());
	}

	#[test]
	fn test_move_and_translate() {
		let mut editor = chain();
		editor.move_vertex(0, DVec2::new(-5., 5.)).unwrap();
		editor.translate_vertex(3, DVec2::new(0., 1.)).unwrap();
		editor.translate_segment(1, DVec2::new(1., 1.)).unwrap();
		assert_eq!(editor.vertices(), &[DVec2::new(-5., 5.), DVec2::new(11., 1.), DVec2::new(21., 1.), DVec2::new(30., 1.)]);
		assert_eq!(editor.translate_segment(3, DVec2::ONE), Err(VectorNetworkError::InvalidSegmentIndex { index: 3, len: 3 }));
	}

	#[test]
	fn test_delete_segment_and_tangent() {
		let mut editor = chain();
		editor.value_mut().segments[2].ta = DVec2::new(3., 3.);
		editor.delete_tangent(2, Control::Ta).unwrap();
		assert!(editor.segments()[2].is_straight());

		let removed = editor.delete_segment(1).unwrap();
		assert_eq!(removed, Segment::straight(1, 2));
		assert_eq!(editor.segments(), &[Segment::straight(0, 1), Segment::straight(2, 3)]);
		assert_eq!(editor.vertices().len(), 4);
	}

	#[test]
	fn test_queries() {
		let mut editor = chain();
		editor.add_segment(3, 1, DVec2::ZERO, DVec2::ZERO).unwrap();

		assert_eq!(editor.find_segments(1, VertexEnd::Any), vec![0, 1, 3]);
		assert_eq!(editor.find_segments(1, VertexEnd::A), vec![1]);
		assert_eq!(editor.find_segments(1, VertexEnd::B), vec![0, 3]);
		assert_eq!(editor.neighboring_vertices(1), vec![0, 2, 3]);
		assert!(editor.is_exact_corner(2));
		assert!(!editor.is_exact_corner(1));
		assert_eq!(editor.segment_length(0), Ok(10.));
		assert_eq!(editor.tangent_vertex(1, Control::Tb), Ok(2));
		assert_eq!(editor.vertices_absolute(DVec2::new(1., 1.))[3], DVec2::new(31., 1.));
	}

	#[test]
	fn test_next_mirrored_tangent() {
		let mut editor = chain();
		editor.value_mut().segments[2].tb = DVec2::new(-4., 2.);
		assert_eq!(editor.next_mirrored_tangent(3), DVec2::new(4., -2.));
		assert_eq!(editor.next_mirrored_tangent(1), DVec2::ZERO);
	}

	#[test]
	fn test_evaluate() {
		let editor = chain();
		let evaluated = editor.evaluate(PointOnSegment { segment: 1, t: 2. }).unwrap();
		assert_eq!(evaluated.t, 1.);
		assert_eq!(evaluated.point, DVec2::new(20., 0.));
	}

	#[test]
	fn test_extend() {
		let mut editor = VectorNetworkEditor::default();
		assert_eq!(editor.extend_line(DVec2::new(1., 1.)), 0);
		assert_eq!(editor.extend_line(DVec2::new(5., 5.)), 1);
		assert_eq!(editor.segments(), &[Segment::straight(0, 1)]);

		assert_eq!(editor.extend_polyline(DVec2::new(9., 0.)), 2);
		assert_eq!(editor.segments(), &[Segment::straight(0, 1), Segment::straight(1, 2)]);
	}
}
