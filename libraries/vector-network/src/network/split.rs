use super::editor::VectorNetworkEditor;
use super::{PointOnSegment, Segment, SegmentIndex, VertexIndex};
use crate::error::VectorNetworkError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct SplitSegmentConfig {
	/// Keep both halves straight when splitting a segment that has two zero tangents.
	pub preserve_zero: bool,
}

impl VectorNetworkEditor {
	/// Split a segment at `point.t` (clamped to `[0, 1]`), returning the index of the inserted vertex.
	///
	/// The segment is replaced in place by its two halves, so every later segment index shifts up by one. The halves come
	/// from de Casteljau subdivision and trace the original curve exactly, unless `preserve_zero` is set and the segment
	/// is straight, in which case both halves keep zero tangents.
	pub fn split_segment(&mut self, segment_index: SegmentIndex, point: PointOnSegment, config: SplitSegmentConfig) -> Result<VertexIndex, VectorNetworkError> {
		let segment = *self.segment(segment_index)?;
		if point.segment != segment_index {
			return Err(VectorNetworkError::SegmentMismatch {
				expected: segment_index,
				found: point.segment,
			});
		}

		let t = point.t.clamp(0., 1.);
		let bezier = self.network.bezier(&segment);
		let vertex = self.network.vertices.len();

		let halves = if config.preserve_zero && segment.is_straight() {
			self.network.vertices.push(bezier.evaluate(t));
			[Segment::straight(segment.a, vertex), Segment::straight(vertex, segment.b)]
		} else {
			let [first, second] = bezier.split(t);
			self.network.vertices.push(first.end);
			let (first_ta, first_tb) = first.relative_tangents();
			let (second_ta, second_tb) = second.relative_tangents();
			[Segment::new(segment.a, vertex, first_ta, first_tb), Segment::new(vertex, segment.b, second_ta, second_tb)]
		};

		self.network.segments.splice(segment_index..=segment_index, halves);
		Ok(vertex)
	}

	/// Split a segment at its parametric midpoint.
	pub fn insert_middle_vertex(&mut self, segment_index: SegmentIndex, config: SplitSegmentConfig) -> Result<VertexIndex, VectorNetworkError> {
		self.split_segment(segment_index, PointOnSegment { segment: segment_index, t: 0.5 }, config)
	}
}
