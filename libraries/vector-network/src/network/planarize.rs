use super::editor::VectorNetworkEditor;
use super::optimize::OptimizationConfig;
use super::{Segment, SegmentIndex, VectorNetwork, VertexIndex};
use crate::bezier::{Bezier, EPS, IntersectionKind};
use crate::consts::{PLANARIZE_MERGE_TOLERANCE, PLANARIZE_PARAM_EPSILON, PLANARIZE_VERTEX_EPSILON};
use crate::utils::{do_rectangles_overlap, dvec2_compare};
use glam::DVec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct PlanarizeConfig {
	/// Keep the pieces of straight segments straight.
	pub preserve_zero: bool,
}

impl Default for PlanarizeConfig {
	fn default() -> Self {
		Self { preserve_zero: true }
	}
}

fn is_interior(t: f64) -> bool {
	t > PLANARIZE_PARAM_EPSILON && t < 1. - PLANARIZE_PARAM_EPSILON
}

/// Index of a vertex within [`PLANARIZE_VERTEX_EPSILON`] of `point`, appending one if there is none.
fn find_or_insert_vertex(vertices: &mut Vec<DVec2>, point: DVec2) -> VertexIndex {
	match vertices.iter().position(|&vertex| dvec2_compare(vertex, point, PLANARIZE_VERTEX_EPSILON).all()) {
		Some(index) => index,
		None => {
			vertices.push(point);
			vertices.len() - 1
		}
	}
}

/// Parameters at which each segment has to be cut, sorted and without near duplicates.
fn split_params(beziers: &[Bezier]) -> Vec<Vec<f64>> {
	let mut params = vec![Vec::new(); beziers.len()];

	for (index, bezier) in beziers.iter().enumerate() {
		if let Some(self_intersection) = bezier.self_intersection(EPS.point) {
			params[index].extend(self_intersection.into_iter().filter(|&t| is_interior(t)));
		}
	}

	for (i, a) in beziers.iter().enumerate() {
		let a_bounds = a.bounding_box_of_anchors_and_handles();
		for (j, b) in beziers.iter().enumerate().skip(i + 1) {
			if !do_rectangles_overlap(a_bounds, b.bounding_box_of_anchors_and_handles()) {
				continue;
			}

			for intersection in a.intersections(b, &EPS) {
				if intersection.kind == IntersectionKind::Endpoint {
					continue;
				}
				if is_interior(intersection.a_t) {
					params[i].push(intersection.a_t);
				}
				if is_interior(intersection.b_t) {
					params[j].push(intersection.b_t);
				}
			}
		}
	}

	for segment_params in &mut params {
		segment_params.sort_by(f64::total_cmp);
		segment_params.dedup_by(|later, earlier| (*later - *earlier).abs() <= PLANARIZE_PARAM_EPSILON);
	}
	params
}

/// Cut one segment at the sorted parameters, adding (or reusing) a vertex at every cut.
fn split_at_params(vertices: &mut Vec<DVec2>, segment: &Segment, bezier: &Bezier, params: &[f64], preserve_zero: bool) -> Vec<Segment> {
	if preserve_zero && segment.is_straight() {
		let mut start = segment.a;
		let mut pieces: Vec<Segment> = params
			.iter()
			.map(|&t| {
				let vertex = find_or_insert_vertex(vertices, bezier.evaluate(t));
				let piece = Segment::straight(start, vertex);
				start = vertex;
				piece
			})
			.collect();
		pieces.push(Segment::straight(start, segment.b));
		return pieces;
	}

	let mut pieces = Vec::with_capacity(params.len() + 1);
	let mut remaining = *bezier;
	let mut start = segment.a;
	let mut previous_t = 0.;
	for &t in params {
		// Re-base onto the part of the curve that has not been cut off yet
		let local_t = (t - previous_t) / (1. - previous_t);
		let [piece, rest] = remaining.split(local_t);
		let vertex = find_or_insert_vertex(vertices, piece.end);
		let (ta, tb) = piece.relative_tangents();
		pieces.push(Segment::new(start, vertex, ta, tb));

		remaining = rest;
		start = vertex;
		previous_t = t;
	}
	let (ta, tb) = remaining.relative_tangents();
	pieces.push(Segment::new(start, segment.b, ta, tb));
	pieces
}

impl VectorNetwork {
	/// Split curves wherever they cross themselves or each other, so that segments only meet at shared vertices.
	///
	/// Pieces of a split segment take its place in segment order. The result is optimized with a vertex tolerance of
	/// [`PLANARIZE_MERGE_TOLERANCE`] to absorb rounding from the subdivision. Every pair of segments is tested, so the
	/// cost grows quadratically with the segment count.
	///
	/// # Panics
	/// If a segment references a vertex that does not exist; see [`VectorNetwork::validate`].
	pub fn planarize(&self, config: &PlanarizeConfig) -> VectorNetwork {
		let beziers: Vec<Bezier> = self.beziers().collect();
		let params = split_params(&beziers);

		let mut vertices = self.vertices.clone();
		let mut segments = Vec::with_capacity(self.segments.len());
		let mut split_count = 0;
		for (index, segment) in self.segments.iter().enumerate() {
			if params[index].is_empty() {
				segments.push(*segment);
				continue;
			}

			split_count += params[index].len();
			segments.extend(split_at_params(&mut vertices, segment, &beziers[index], &params[index], config.preserve_zero));
		}

		log::debug!("Planarized {} segments with {split_count} cuts", self.segments.len());

		let merge = OptimizationConfig {
			vertex_tolerance: PLANARIZE_MERGE_TOLERANCE,
			remove_unused_vertices: true,
		};
		VectorNetwork { vertices, segments }.optimize(&merge)
	}

	/// Segments whose curves still cross another segment or themselves away from their endpoints.
	pub fn crossing_segments(&self) -> Vec<SegmentIndex> {
		let beziers: Vec<Bezier> = self.beziers().collect();
		split_params(&beziers).iter().enumerate().filter(|(_, params)| !params.is_empty()).map(|(index, _)| index).collect()
	}
}

impl VectorNetworkEditor {
	/// Planarize the edited network in place, returning the result.
	pub fn planarize(&mut self, config: &PlanarizeConfig) -> &VectorNetwork {
		self.network = self.network.planarize(config);
		&self.network
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	fn network(vertices: &[[f64; 2]], segments: &[(VertexIndex, VertexIndex, [f64; 2], [f64; 2])]) -> VectorNetwork {
		VectorNetwork::new(
			vertices.iter().map(|&vertex| DVec2::from(vertex)).collect(),
			segments.iter().map(|&(a, b, ta, tb)| Segment::new(a, b, ta.into(), tb.into())).collect(),
		)
	}

	fn crossing_diagonals() -> VectorNetwork {
		network(&[[0., 0.], [100., 100.], [0., 100.], [100., 0.]], &[(0, 1, [0., 0.], [0., 0.]), (2, 3, [0., 0.], [0., 0.])])
	}

	fn self_looping_curve() -> VectorNetwork {
		network(&[[0., 0.], [100., 0.]], &[(0, 1, [200., 200.], [-100., 200.])])
	}

	fn has_vertex_near(network: &VectorNetwork, point: DVec2, tolerance: f64) -> bool {
		network.vertices.iter().any(|vertex| vertex.abs_diff_eq(point, tolerance))
	}

	#[test]
	fn test_crossing_diagonals() {
		let planarized = crossing_diagonals().planarize(&PlanarizeConfig::default());
		assert_eq!(planarized.vertices.len(), 5);
		assert_eq!(planarized.segments.len(), 4);
		assert!(has_vertex_near(&planarized, DVec2::new(50., 50.), 1e-3));
		assert!(planarized.segments.iter().all(Segment::is_straight));
		assert!(planarized.crossing_segments().is_empty());
	}

	#[test]
	fn test_exact_subdivision_of_straight_segments() {
		let planarized = crossing_diagonals().planarize(&PlanarizeConfig { preserve_zero: false });
		assert_eq!(planarized.vertices.len(), 5);
		assert_eq!(planarized.segments.len(), 4);
		assert!(planarized.segments.iter().any(|segment| !segment.is_straight()));
	}

	#[test]
	fn test_no_intersections() {
		let parallel = network(&[[0., 0.], [100., 0.], [0., 50.], [100., 50.]], &[(0, 1, [0., 0.], [0., 0.]), (2, 3, [0., 0.], [0., 0.])]);
		assert_eq!(parallel.planarize(&PlanarizeConfig::default()), parallel);

		let single = VectorNetwork::polyline(&[DVec2::ZERO, DVec2::new(100., 0.)]);
		assert_eq!(single.planarize(&PlanarizeConfig::default()), single);

		assert_eq!(VectorNetwork::default().planarize(&PlanarizeConfig::default()), VectorNetwork::default());

		let arch = network(&[[0., 0.], [100., 0.]], &[(0, 1, [50., 25.], [-50., 25.])]);
		assert_eq!(arch.planarize(&PlanarizeConfig::default()), arch);
	}

	#[test]
	fn test_shared_endpoints_are_not_split() {
		let square = VectorNetwork::polygon(&[DVec2::new(0., 0.), DVec2::new(10., 0.), DVec2::new(10., 10.), DVec2::new(0., 10.)]);
		assert_eq!(square.planarize(&PlanarizeConfig::default()), square);
	}

	#[test]
	fn test_t_junction_reuses_vertex() {
		let junction = network(&[[0., 0.], [100., 0.], [50., 0.], [50., 50.]], &[(0, 1, [0., 0.], [0., 0.]), (2, 3, [0., 0.], [0., 0.])]);
		let planarized = junction.planarize(&PlanarizeConfig::default());

		assert_eq!(planarized.vertices, junction.vertices);
		assert_eq!(planarized.segments, vec![Segment::straight(0, 2), Segment::straight(2, 1), Segment::straight(2, 3)]);
	}

	#[test]
	fn test_self_intersection() {
		let planarized = self_looping_curve().planarize(&PlanarizeConfig::default());
		assert_eq!(planarized.vertices.len(), 3);
		assert_eq!(planarized.segments.len(), 3);
		assert!(has_vertex_near(&planarized, DVec2::new(71.4, 85.7), 1.));

		// The middle piece is the loop itself
		let middle = planarized.segments[1];
		assert_eq!(middle.a, middle.b);
		assert_eq!((planarized.segments[0].a, planarized.segments[2].b), (0, 1));

		let other = network(&[[0., 0.], [50., 0.]], &[(0, 1, [100., 150.], [-50., 150.])]).planarize(&PlanarizeConfig::default());
		assert_eq!(other.vertices.len(), 3);
		assert_eq!(other.segments.len(), 3);
	}

	#[test]
	fn test_self_and_pairwise_intersections() {
		let mut input = self_looping_curve();
		input.vertices.extend([DVec2::new(50., 50.), DVec2::new(50., -50.)]);
		input.segments.push(Segment::straight(2, 3));

		let planarized = input.planarize(&PlanarizeConfig::default());
		assert!(planarized.vertices.len() > input.vertices.len());
		assert!(planarized.segments.len() > input.segments.len());
	}

	#[test]
	fn test_curved_crossing() {
		let curved = network(&[[0., 0.], [100., 100.], [0., 100.], [100., 0.]], &[(0, 1, [25., 25.], [-25., -25.]), (2, 3, [25., -25.], [-25., 25.])]);
		let planarized = curved.planarize(&PlanarizeConfig::default());
		assert!(planarized.vertices.len() > curved.vertices.len());
		assert!(planarized.segments.len() > curved.segments.len());
		assert!(has_vertex_near(&planarized, DVec2::new(50., 50.), 1e-3));
	}

	#[test]
	fn test_planarize_in_place() {
		let mut editor = VectorNetworkEditor::new(crossing_diagonals());
		let result = editor.planarize(&PlanarizeConfig::default()).clone();
		assert_eq!(&result, editor.value());
		assert_eq!(editor.vertices().len(), 5);
		assert_eq!(editor.segments().len(), 4);
	}
}
