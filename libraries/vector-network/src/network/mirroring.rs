use super::editor::{VectorNetworkEditor, VertexEnd};
use super::{Control, SegmentIndex, VertexIndex};
use crate::bezier::Bezier;
use crate::consts::{KAPPA, MIRRORING_ANGLE_EPSILON};
use crate::error::VectorNetworkError;
use glam::DVec2;

/// How editing one tangent at a shared vertex affects the opposite tangent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(rename_all = "lowercase"))]
pub enum StrictTangentMirroringMode {
	/// The opposite tangent is left alone.
	#[default]
	None,
	/// The opposite tangent is rotated to the inverted angle but keeps its length.
	Angle,
	/// The opposite tangent becomes the exact negation.
	All,
}

/// A [`StrictTangentMirroringMode`], or `Auto` to infer one from the tangents as they are before the edit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(rename_all = "lowercase"))]
pub enum TangentMirroringMode {
	None,
	Angle,
	All,
	#[default]
	Auto,
}

impl From<StrictTangentMirroringMode> for TangentMirroringMode {
	fn from(mode: StrictTangentMirroringMode) -> Self {
		match mode {
			StrictTangentMirroringMode::None => Self::None,
			StrictTangentMirroringMode::Angle => Self::Angle,
			StrictTangentMirroringMode::All => Self::All,
		}
	}
}

/// Infer how two tangents meeting at a vertex are currently mirrored.
///
/// Opposing and parallel tangents (within a normalized cross product of [`MIRRORING_ANGLE_EPSILON`]) are mirrored in
/// angle, and additionally in length when their lengths agree to machine precision. A zero tangent mirrors nothing.
pub fn infer_mirroring_mode(ta: DVec2, tb: DVec2) -> StrictTangentMirroringMode {
	if ta == DVec2::ZERO || tb == DVec2::ZERO {
		return StrictTangentMirroringMode::None;
	}

	let la = ta.length();
	let lb = tb.length();
	let cross = ta.perp_dot(tb) / (la * lb);
	if cross.abs() > MIRRORING_ANGLE_EPSILON || ta.dot(tb) >= 0. {
		return StrictTangentMirroringMode::None;
	}

	if (la - lb).abs() < f64::EPSILON { StrictTangentMirroringMode::All } else { StrictTangentMirroringMode::Angle }
}

/// A segment's endpoints and tangents captured when a bend gesture starts.
///
/// Every step of the gesture solves against this state rather than the already-bent segment, so repeated drags do not
/// accumulate error.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrozenSegment {
	pub a: DVec2,
	pub b: DVec2,
	pub ta: DVec2,
	pub tb: DVec2,
}

impl FrozenSegment {
	pub fn capture(editor: &VectorNetworkEditor, segment: SegmentIndex) -> Result<Self, VectorNetworkError> {
		let bezier = editor.segment_bezier(segment)?;
		let (ta, tb) = bezier.relative_tangents();
		Ok(Self { a: bezier.start, b: bezier.end, ta, tb })
	}

	fn bezier(&self) -> Bezier {
		Bezier::from_relative(self.a, self.b, self.ta, self.tb)
	}
}

/// One segment incident to a corner vertex, seen from that vertex.
struct CornerArm {
	segment: SegmentIndex,
	control: Control,
	direction: DVec2,
	length: f64,
}

impl VectorNetworkEditor {
	/// The two segments of a corner vertex, or `None` if the vertex is not touched by exactly two segments.
	fn corner_arms(&self, vertex: VertexIndex) -> Option<[CornerArm; 2]> {
		let segments = self.find_segments(vertex, VertexEnd::Any);
		let &[first, second] = segments.as_slice() else { return None };

		let origin = self.network.vertices[vertex];
		let arm = |index: SegmentIndex| {
			let segment = &self.network.segments[index];
			let offset = self.network.vertices[segment.other(vertex)] - origin;
			CornerArm {
				segment: index,
				control: segment.control_at(vertex).unwrap_or(Control::Ta),
				direction: offset.normalize_or_zero(),
				length: offset.length(),
			}
		};
		Some([arm(first), arm(second)])
	}

	/// Give a two-segment corner the tangent `tangent` on one side and `-tangent` on the other. A zero tangent clears both.
	pub fn set_corner_tangents(&mut self, vertex: VertexIndex, tangent: DVec2) -> Result<(), VectorNetworkError> {
		self.check_vertex(vertex)?;
		let Some([first, second]) = self.corner_arms(vertex) else {
			log::debug!("Vertex {vertex} is not a two-segment corner, leaving its tangents unchanged");
			return Ok(());
		};

		*self.network.segments[first.segment].tangent_mut(first.control) = tangent;
		*self.network.segments[second.segment].tangent_mut(second.control) = -tangent;
		Ok(())
	}

	/// Round a sharp two-segment corner into a smooth one with mirrored tangents.
	///
	/// The tangents lie perpendicular to the bisector of the two edge directions, each scaled by `KAPPA` times half its
	/// own segment's length, so bending every corner of a square produces a circle. With `reference` set, the segment
	/// owning that control at the corner provides the length for both sides.
	pub fn bend_corner(&mut self, vertex: VertexIndex, reference: Option<Control>) -> Result<(), VectorNetworkError> {
		self.check_vertex(vertex)?;
		let Some([first, second]) = self.corner_arms(vertex) else {
			log::debug!("Vertex {vertex} is not a two-segment corner, nothing to bend");
			return Ok(());
		};

		let bisector = first.direction + second.direction;
		if bisector.abs_diff_eq(DVec2::ZERO, 1e-12) {
			log::debug!("Corner at vertex {vertex} is straight, nothing to bend");
			return Ok(());
		}
		let base = bisector.perp();

		let reference_length = reference.and_then(|control| [&first, &second].into_iter().find(|arm| arm.control == control)).unwrap_or(&first).length;
		let scale = |arm: &CornerArm| (if reference.is_some() { reference_length } else { arm.length }) / 2. * KAPPA;
		let (scale_first, scale_second) = (scale(&first), scale(&second));

		let sign = if bisector.perp_dot(first.direction) < 0. { -1. } else { 1. };
		*self.network.segments[first.segment].tangent_mut(first.control) = sign * base * scale_first;
		*self.network.segments[second.segment].tangent_mut(second.control) = -sign * base * scale_second;
		Ok(())
	}

	/// Reshape a segment so its curve passes through `target` at parameter `t`, solving against the `frozen` state.
	///
	/// If the segment's start vertex has moved since `frozen` was captured, `target` is shifted back by the same amount
	/// so the solve stays in the frozen frame.
	pub fn bend_segment(&mut self, segment: SegmentIndex, t: f64, target: DVec2, frozen: &FrozenSegment) -> Result<(), VectorNetworkError> {
		let start = self.network.vertices[self.segment(segment)?.a];
		let adjusted_target = target - (start - frozen.a);

		let (ta, tb) = frozen.bezier().solve_tangents_for_point(t.clamp(0., 1.), adjusted_target);
		let segment = self.segment_mut(segment)?;
		segment.ta = ta;
		segment.tb = tb;
		Ok(())
	}

	/// Set one tangent, mirroring it onto the opposite tangent at the same vertex when exactly one other segment meets there.
	pub fn update_tangent(&mut self, segment: SegmentIndex, control: Control, value: DVec2, mode: TangentMirroringMode) -> Result<(), VectorNetworkError> {
		let current = *self.segment(segment)?;
		let vertex = current.vertex(control);

		let connected = self.find_segments(vertex, VertexEnd::Any).into_iter().filter(|&index| index != segment).collect::<Vec<_>>();
		let connection = match connected.as_slice() {
			&[other] => self.network.segments[other].control_at(vertex).map(|other_control| (other, other_control)),
			_ => None,
		};

		let mode = match (mode, connection) {
			(_, None) => StrictTangentMirroringMode::None,
			(TangentMirroringMode::Auto, Some((other, other_control))) => infer_mirroring_mode(current.tangent(control), self.network.segments[other].tangent(other_control)),
			(TangentMirroringMode::None, _) => StrictTangentMirroringMode::None,
			(TangentMirroringMode::Angle, _) => StrictTangentMirroringMode::Angle,
			(TangentMirroringMode::All, _) => StrictTangentMirroringMode::All,
		};

		*self.network.segments[segment].tangent_mut(control) = value;

		let Some((other, other_control)) = connection else { return Ok(()) };
		let opposite = self.network.segments[other].tangent_mut(other_control);
		match mode {
			StrictTangentMirroringMode::None => {}
			StrictTangentMirroringMode::All => *opposite = -value,
			StrictTangentMirroringMode::Angle => {
				let angle = value.y.atan2(value.x) + std::f64::consts::PI;
				*opposite = DVec2::from_angle(angle) * opposite.length();
			}
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::network::{Segment, VectorNetwork};

	fn square() -> VectorNetworkEditor {
		VectorNetworkEditor::new(VectorNetwork::polygon(&[DVec2::new(0., 0.), DVec2::new(100., 0.), DVec2::new(100., 100.), DVec2::new(0., 100.)]))
	}

	fn assert_close(actual: DVec2, expected: DVec2) {
		assert!(actual.abs_diff_eq(expected, 1e-5), "{actual} != {expected}");
	}

	#[test]
	fn test_infer_mirroring_mode() {
		assert_eq!(infer_mirroring_mode(DVec2::new(10., 0.), DVec2::new(-10., 0.)), StrictTangentMirroringMode::All);
		assert_eq!(infer_mirroring_mode(DVec2::new(10., 0.), DVec2::new(-5., 0.)), StrictTangentMirroringMode::Angle);
		assert_eq!(infer_mirroring_mode(DVec2::new(10., 0.), DVec2::new(10., 0.)), StrictTangentMirroringMode::None);
		assert_eq!(infer_mirroring_mode(DVec2::new(10., 0.), DVec2::new(-10., 5.)), StrictTangentMirroringMode::None);
		assert_eq!(infer_mirroring_mode(DVec2::ZERO, DVec2::new(-10., 0.)), StrictTangentMirroringMode::None);
		assert_eq!(infer_mirroring_mode(DVec2::new(10., 0.), DVec2::new(-10., 0.005)), StrictTangentMirroringMode::Angle);
	}

	#[test]
	fn test_bend_corner_square() {
		let mut editor = square();
		editor.bend_corner(0, None).unwrap();

		let ta = editor.segments()[0].ta;
		let tb = editor.segments()[3].tb;
		assert_eq!(infer_mirroring_mode(ta, tb), StrictTangentMirroringMode::All);

		let r = KAPPA * editor.segment_length(0).unwrap() / 2.;
		assert_close(ta, DVec2::new(r, -r));
		assert_close(tb, DVec2::new(-r, r));
		// Perpendicular to the bisector (1, 1)
		assert!(ta.dot(DVec2::ONE).abs() < 1e-9);
	}

	#[test]
	fn test_bend_corner_reference_length() {
		let mut editor = VectorNetworkEditor::new(VectorNetwork::new(
			vec![DVec2::new(0., 0.), DVec2::new(100., 0.), DVec2::new(0., 200.)],
			vec![Segment::straight(0, 1), Segment::straight(2, 0)],
		));
		editor.bend_corner(0, Some(Control::Tb)).unwrap();

		let r = KAPPA * editor.segment_length(1).unwrap() / 2.;
		let ta = editor.segments()[0].ta;
		assert_close(ta, DVec2::new(r, -r));
		assert_eq!(infer_mirroring_mode(ta, editor.segments()[1].tb), StrictTangentMirroringMode::All);
	}

	#[test]
	fn test_bend_corner_degenerate() {
		let mut straight = VectorNetworkEditor::new(VectorNetwork::polyline(&[DVec2::new(-10., 0.), DVec2::ZERO, DVec2::new(10., 0.)]));
		let before = straight.clone();
		straight.bend_corner(1, None).unwrap();
		assert_eq!(straight, before);

		// An open end has nothing to bend
		straight.bend_corner(0, None).unwrap();
		assert_eq!(straight, before);

		assert_eq!(straight.bend_corner(7, None), Err(VectorNetworkError::InvalidVertexIndex { index: 7, len: 3 }));
	}

	#[test]
	fn test_set_corner_tangents() {
		let mut editor = square();
		editor.set_corner_tangents(0, DVec2::new(5., 7.)).unwrap();
		assert_eq!(editor.segments()[0].ta, DVec2::new(5., 7.));
		assert_eq!(editor.segments()[3].tb, DVec2::new(-5., -7.));

		editor.set_corner_tangents(0, DVec2::ZERO).unwrap();
		assert_eq!(editor.segments()[0].ta, DVec2::ZERO);
		assert_eq!(editor.segments()[3].tb, DVec2::ZERO);
	}

	#[test]
	fn test_update_tangent_modes() {
		// Mirrored in angle and length: `auto` keeps them mirrored
		let mut editor = square();
		editor.set_corner_tangents(1, DVec2::new(0., -10.)).unwrap();
		editor.update_tangent(1, Control::Ta, DVec2::new(3., 4.), TangentMirroringMode::Auto).unwrap();
		assert_eq!(editor.segments()[0].tb, DVec2::new(-3., -4.));

		// Mirrored in angle only: the opposite tangent keeps its length
		let mut editor = square();
		editor.value_mut().segments[0].tb = DVec2::new(0., 20.);
		editor.value_mut().segments[1].ta = DVec2::new(0., -10.);
		editor.update_tangent(1, Control::Ta, DVec2::new(3., 4.), TangentMirroringMode::Auto).unwrap();
		assert_close(editor.segments()[0].tb, DVec2::new(-12., -16.));

		// Unrelated tangents are left alone
		let mut editor = square();
		editor.value_mut().segments[0].tb = DVec2::new(5., 0.);
		editor.value_mut().segments[1].ta = DVec2::new(0., -10.);
		editor.update_tangent(1, Control::Ta, DVec2::new(3., 4.), TangentMirroringMode::Auto).unwrap();
		assert_eq!(editor.segments()[0].tb, DVec2::new(5., 0.));

		// Explicit modes override inference
		let mut editor = square();
		editor.update_tangent(1, Control::Ta, DVec2::new(3., 4.), TangentMirroringMode::All).unwrap();
		assert_eq!(editor.segments()[0].tb, DVec2::new(-3., -4.));
	}

	#[test]
	fn test_update_tangent_without_neighbor() {
		let mut editor = VectorNetworkEditor::new(VectorNetwork::polyline(&[DVec2::ZERO, DVec2::new(10., 0.), DVec2::new(20., 0.)]));
		editor.update_tangent(0, Control::Ta, DVec2::new(2., 2.), TangentMirroringMode::All).unwrap();
		assert_eq!(editor.segments()[0].ta, DVec2::new(2., 2.));
		assert!(editor.segments()[1].is_straight());

		assert_eq!(editor.update_tangent(5, Control::Ta, DVec2::ONE, TangentMirroringMode::Auto), Err(VectorNetworkError::InvalidSegmentIndex { index: 5, len: 2 }));
	}

	#[test]
	fn test_bend_segment_passes_through_target() {
		let mut editor = VectorNetworkEditor::new(VectorNetwork::polyline(&[DVec2::ZERO, DVec2::new(100., 0.)]));
		let frozen = FrozenSegment::capture(&editor, 0).unwrap();

		// Repeated drags solve against the frozen state
		for target in [DVec2::new(40., 10.), DVec2::new(45., 30.), DVec2::new(30., -20.)] {
			editor.bend_segment(0, 0.4, target, &frozen).unwrap();
			assert_close(editor.segment_bezier(0).unwrap().evaluate(0.4), target);
		}

		// Dragging back onto the original line restores zero tangents
		let on_line = frozen.bezier().evaluate(0.4);
		editor.bend_segment(0, 0.4, on_line, &frozen).unwrap();
		assert_eq!(editor.segments()[0].ta, DVec2::ZERO);
		assert_eq!(editor.segments()[0].tb, DVec2::ZERO);
	}

	#[test]
	fn test_bend_segment_follows_moved_vertex() {
		let mut editor = VectorNetworkEditor::new(VectorNetwork::polyline(&[DVec2::ZERO, DVec2::new(100., 0.)]));
		let frozen = FrozenSegment::capture(&editor, 0).unwrap();
		editor.translate(DVec2::new(10., 10.));

		editor.bend_segment(0, 0.5, DVec2::new(60., 40.), &frozen).unwrap();
		assert_close(editor.segment_bezier(0).unwrap().evaluate(0.5), DVec2::new(60., 40.));
	}

	#[test]
	fn test_bend_segment_back_onto_the_line() {
		let mut editor = VectorNetworkEditor::new(VectorNetwork::polyline(&[DVec2::ZERO, DVec2::new(100., 0.)]));
		let frozen = FrozenSegment::capture(&editor, 0).unwrap();

		editor.bend_segment(0, 0.25, DVec2::new(25., 20.), &frozen).unwrap();
		assert_ne!(editor.segments()[0].ta, DVec2::ZERO);

		editor.bend_segment(0, 0.25, DVec2::new(25., 0.), &frozen).unwrap();
		assert_eq!(editor.segments()[0], Segment::straight(0, 1));

		editor.bend_segment(0, 0.5, DVec2::new(50.05, 0.05), &frozen).unwrap();
		assert_eq!(editor.segments()[0], Segment::straight(0, 1));
	}
}
