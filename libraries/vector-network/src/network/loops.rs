use super::editor::VectorNetworkEditor;
use super::{Loop, Segment, SegmentIndex, VectorNetwork, VertexIndex};
use crate::error::VectorNetworkError;
use glam::DVec2;
use kurbo::{BezPath, Point, Shape};
use std::cmp::Ordering;

/// Faces with less area than this are degenerate walks rather than regions.
const MIN_FACE_AREA: f64 = 1e-9;

/// Parameter sampled to find the departure direction of a curve whose tangent at the vertex is zero.
const DEPARTURE_PARAM: f64 = 1e-3;

/// Two half-edges per segment: `2s` runs `a -> b` and `2s + 1` runs `b -> a`, so the twin of `h` is `h ^ 1`.
type HalfEdge = usize;

struct DisjointSet {
	parents: Vec<usize>,
}

impl DisjointSet {
	fn new(len: usize) -> Self {
		Self { parents: (0..len).collect() }
	}

	fn find(&mut self, mut element: usize) -> usize {
		while self.parents[element] != element {
			self.parents[element] = self.parents[self.parents[element]];
			element = self.parents[element];
		}
		element
	}

	fn union(&mut self, a: usize, b: usize) {
		let (root_a, root_b) = (self.find(a), self.find(b));
		if root_a != root_b {
			self.parents[root_b] = root_a;
		}
	}
}

struct Face {
	segments: Loop,
	area: f64,
	component: usize,
}

struct HalfEdgeGraph<'a> {
	network: &'a VectorNetwork,
	/// Outgoing half-edges per vertex, in clockwise order on screen.
	outgoing: Vec<Vec<HalfEdge>>,
	/// Position of each half-edge within its origin's rotation.
	rotation_index: Vec<usize>,
}

impl<'a> HalfEdgeGraph<'a> {
	fn new(network: &'a VectorNetwork, active: &[bool]) -> Self {
		let mut outgoing = vec![Vec::new(); network.vertices.len()];
		for (index, segment) in network.segments.iter().enumerate().filter(|&(index, _)| active[index]) {
			outgoing[segment.a].push(2 * index);
			outgoing[segment.b].push(2 * index + 1);
		}

		let mut rotation_index = vec![0; 2 * network.segments.len()];
		for (vertex, half_edges) in outgoing.iter_mut().enumerate() {
			let origin = network.vertices[vertex];
			let ray = |half_edge: HalfEdge| network.vertices[destination(network, half_edge)] - origin;
			// Clockwise on screen (y pointing down) is ascending angle, with the longer ray first on ties
			half_edges.sort_by(|&first, &second| {
				let (first_ray, second_ray) = (ray(first), ray(second));
				first_ray
					.y
					.atan2(first_ray.x)
					.total_cmp(&second_ray.y.atan2(second_ray.x))
					.then(second_ray.length_squared().total_cmp(&first_ray.length_squared()))
					// Curves sharing a chord are ordered by the side they leave the vertex towards
					.then_with(|| departure_angle(network, first, first_ray).total_cmp(&departure_angle(network, second, second_ray)))
					.then_with(|| {
						// Coincident edges have to wind in opposite orders at their two ends
						let by_segment = (first / 2).cmp(&(second / 2));
						if vertex < destination(network, first) { by_segment } else { by_segment.reverse() }
					})
					.then(first.cmp(&second))
			});
			for (position, &half_edge) in half_edges.iter().enumerate() {
				rotation_index[half_edge] = position;
			}
		}

		Self { network, outgoing, rotation_index }
	}

	/// The half-edge preceding the twin of `half_edge` in the rotation around its destination.
	fn next(&self, half_edge: HalfEdge) -> HalfEdge {
		let rotation = &self.outgoing[destination(self.network, half_edge)];
		let twin_position = self.rotation_index[half_edge ^ 1];
		rotation[(twin_position + rotation.len() - 1) % rotation.len()]
	}

	fn signed_area(&self, half_edge: HalfEdge) -> f64 {
		let area = self.network.bezier(&self.network.segments[half_edge / 2]).signed_area();
		if half_edge % 2 == 0 { area } else { -area }
	}
}

fn origin(network: &VectorNetwork, half_edge: HalfEdge) -> VertexIndex {
	let segment = &network.segments[half_edge / 2];
	if half_edge % 2 == 0 { segment.a } else { segment.b }
}

fn destination(network: &VectorNetwork, half_edge: HalfEdge) -> VertexIndex {
	origin(network, half_edge ^ 1)
}

/// Signed angle from the straight `ray` to the direction the curve of `half_edge` actually leaves its origin in.
fn departure_angle(network: &VectorNetwork, half_edge: HalfEdge, ray: DVec2) -> f64 {
	let bezier = network.bezier(&network.segments[half_edge / 2]);
	let (tangent, start, nearby) = if half_edge % 2 == 0 {
		(bezier.handle_start - bezier.start, bezier.start, bezier.evaluate(DEPARTURE_PARAM))
	} else {
		(bezier.handle_end - bezier.end, bezier.end, bezier.evaluate(1. - DEPARTURE_PARAM))
	};
	let direction = if tangent == DVec2::ZERO { nearby - start } else { tangent };
	ray.perp_dot(direction).atan2(ray.dot(direction))
}

/// Drop immediate back-tracking over one segment, including across the wrap-around of the cycle.
fn collapse_backtracking(cycle: impl IntoIterator<Item = SegmentIndex>) -> Loop {
	let mut collapsed: Loop = Vec::new();
	for segment in cycle {
		if collapsed.last() == Some(&segment) {
			collapsed.pop();
		} else {
			collapsed.push(segment);
		}
	}
	while collapsed.len() > 1 && collapsed.first() == collapsed.last() {
		collapsed.pop();
		collapsed.remove(0);
	}
	collapsed
}

/// Segments that can bound a face: valid, not self-loops, and not part of a dangling chain.
fn face_candidates(network: &VectorNetwork) -> Vec<bool> {
	let vertex_count = network.vertices.len();
	let mut active: Vec<bool> = network.segments.iter().map(|segment| segment.a < vertex_count && segment.b < vertex_count && segment.a != segment.b).collect();

	let mut incident = vec![Vec::new(); vertex_count];
	let mut degree = vec![0_usize; vertex_count];
	for (index, segment) in network.segments.iter().enumerate().filter(|&(index, _)| active[index]) {
		for vertex in [segment.a, segment.b] {
			incident[vertex].push(index);
			degree[vertex] += 1;
		}
	}

	let mut dangling: Vec<VertexIndex> = (0..vertex_count).filter(|&vertex| degree[vertex] == 1).collect();
	while let Some(vertex) = dangling.pop() {
		if degree[vertex] != 1 {
			continue;
		}
		let Some(&index) = incident[vertex].iter().find(|&&index| active[index]) else { continue };

		active[index] = false;
		let segment = &network.segments[index];
		for end in [segment.a, segment.b] {
			degree[end] -= 1;
			if degree[end] == 1 {
				dangling.push(end);
			}
		}
	}

	active
}

impl VectorNetwork {
	/// Enumerate the bounded faces of a planar network as cycles of segment indices.
	///
	/// Every segment contributes two half-edges. Walking from each unvisited half-edge to the one preceding its twin in
	/// the clockwise (y pointing down) rotation at its destination traces every face exactly once, keeping the face on
	/// the left of each half-edge in a y-up frame. The rotation orders edges by the straight ray to their far endpoint,
	/// not by tangent direction, so curved and zero-tangent segments sort alike. Curves sharing a chord fall back to the
	/// direction they actually leave the vertex in.
	///
	/// Dangling chains are pruned first, the face with the largest absolute area in each connected component is dropped
	/// as the unbounded outer face, and the remaining faces are oriented counter-clockwise (positive area). A segment
	/// whose ends share one vertex encloses a face on its own and is reported as a single-segment loop.
	///
	/// Crossing segments produce meaningless faces; run [`VectorNetwork::planarize`] first.
	pub fn loops(&self) -> Vec<Loop> {
		let active = face_candidates(self);
		let graph = HalfEdgeGraph::new(self, &active);

		let mut components = DisjointSet::new(self.vertices.len());
		for segment in self.segments.iter().zip(&active).filter(|&(_, &is_active)| is_active).map(|(segment, _)| segment) {
			components.union(segment.a, segment.b);
		}

		let mut visited = vec![false; 2 * self.segments.len()];
		let mut faces: Vec<Face> = Vec::new();
		for start in 0..2 * self.segments.len() {
			if visited[start] || !active[start / 2] {
				continue;
			}

			let mut cycle = Vec::new();
			let mut area = 0.;
			let mut half_edge = start;
			while !visited[half_edge] {
				visited[half_edge] = true;
				cycle.push(half_edge / 2);
				area += graph.signed_area(half_edge);
				half_edge = graph.next(half_edge);
			}

			let segments = collapse_backtracking(cycle);
			if segments.is_empty() {
				continue;
			}
			let component = components.find(origin(self, start));
			faces.push(Face { segments, area, component });
		}

		// The outer face encloses every inner face of its component, and runs clockwise
		let mut outer_faces: Vec<(usize, usize)> = Vec::new();
		for (index, face) in faces.iter().enumerate() {
			let outer_key = |face: &Face| (face.area.abs(), face.area < 0.);
			match outer_faces.iter_mut().find(|(component, _)| *component == face.component) {
				Some((_, outer)) => {
					let current = outer_key(&faces[*outer]);
					let candidate = outer_key(face);
					if candidate.0.total_cmp(&current.0).then(candidate.1.cmp(&current.1)) == Ordering::Greater {
						*outer = index;
					}
				}
				None => outer_faces.push((face.component, index)),
			}
		}

		let mut loops: Vec<Loop> = faces
			.into_iter()
			.enumerate()
			.filter(|(index, face)| !outer_faces.iter().any(|(_, outer)| outer == index) && face.area.abs() > MIN_FACE_AREA)
			.map(|(_, mut face)| {
				if face.area < 0. {
					face.segments.reverse();
				}
				face.segments
			})
			.collect();

		let self_loops = self
			.segments
			.iter()
			.enumerate()
			.filter(|(_, segment)| segment.a == segment.b && segment.a < self.vertices.len())
			.filter(|(_, segment)| self.bezier(segment).signed_area().abs() > MIN_FACE_AREA)
			.map(|(index, _)| vec![index]);
		loops.extend(self_loops);

		log::debug!("Found {} loops among {} segments", loops.len(), self.segments.len());
		loops
	}

	/// Whether the segments, in the given order and direction, chain `b` to `a` and close back onto the first.
	pub fn is_loop_closed(&self, segments: &[SegmentIndex]) -> bool {
		if segments.is_empty() {
			return false;
		}

		let resolve = |index: &SegmentIndex| self.segments.get(*index);
		let Some(resolved) = segments.iter().map(resolve).collect::<Option<Vec<&Segment>>>() else { return false };
		resolved.iter().zip(resolved.iter().cycle().skip(1)).all(|(current, next)| current.b == next.a)
	}

	/// The outline of a loop as a closed path, following each segment forwards or backwards as the chain requires.
	pub fn loop_path(&self, segments: &[SegmentIndex]) -> Result<BezPath, VectorNetworkError> {
		let resolved = segments
			.iter()
			.map(|&index| {
				let segment = self.segments.get(index).ok_or(VectorNetworkError::InvalidSegmentIndex { index, len: self.segments.len() })?;
				for vertex in [segment.a, segment.b] {
					if vertex >= self.vertices.len() {
						return Err(VectorNetworkError::InvalidVertexIndex { index: vertex, len: self.vertices.len() });
					}
				}
				Ok(*segment)
			})
			.collect::<Result<Vec<Segment>, _>>()?;

		let mut path = BezPath::new();
		let Some(first) = resolved.first() else { return Ok(path) };

		// Start at the end of the first segment that the second one does not continue from
		let mut current = match resolved.get(1) {
			Some(second) if !second.touches(first.b) && second.touches(first.a) => first.b,
			_ => first.a,
		};
		let point = |vertex: VertexIndex| to_point(self.vertices[vertex]);
		path.move_to(point(current));

		for segment in &resolved {
			let (from, to, handle_from, handle_to) = if segment.a == current || segment.b != current {
				(segment.a, segment.b, segment.ta, segment.tb)
			} else {
				(segment.b, segment.a, segment.tb, segment.ta)
			};
			if from != current {
				path.move_to(point(from));
			}

			if segment.is_straight() {
				path.line_to(point(to));
			} else {
				path.curve_to(to_point(self.vertices[from] + handle_from), to_point(self.vertices[to] + handle_to), point(to));
			}
			current = to;
		}

		path.close_path();
		Ok(path)
	}

	/// [`VectorNetwork::loop_path`] as SVG path data. An empty loop gives an empty string.
	pub fn loop_path_data(&self, segments: &[SegmentIndex]) -> Result<String, VectorNetworkError> {
		if segments.is_empty() {
			return Ok(String::new());
		}
		self.loop_path(segments).map(|path| path.to_svg())
	}

	/// Whether `point` lies inside any face, by the nonzero winding rule.
	pub fn is_point_in_region(&self, point: DVec2) -> bool {
		let point = to_point(point);
		self.loops()
			.iter()
			.filter_map(|face| self.loop_path(face).ok())
			.any(|path| path.contains(point))
	}
}

fn to_point(vector: DVec2) -> Point {
	Point::new(vector.x, vector.y)
}

impl VectorNetworkEditor {
	pub fn get_loops(&self) -> Vec<Loop> {
		self.network.loops()
	}

	pub fn is_loop_closed(&self, segments: &[SegmentIndex]) -> bool {
		self.network.is_loop_closed(segments)
	}
}
