use super::Bezier;
use crate::consts::MAX_INTERSECTION_PAIRS;
use crate::utils::{LineSegment, do_rectangles_overlap, line_segment_intersection};
use glam::DVec2;

#[derive(Clone, Copy, Debug)]
pub struct Epsilons {
	/// Points closer than this are the same point.
	pub point: f64,
	/// Subcurves whose bounding box is smaller than this are treated as straight chords.
	pub linear: f64,
	/// Parameters closer than this to 0 or 1 count as curve endpoints.
	pub param: f64,
}

pub const EPS: Epsilons = Epsilons { point: 1e-6, linear: 1e-4, param: 1e-6 };

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntersectionKind {
	/// The curves cross each other.
	Crossing,
	/// The curves touch with parallel derivatives.
	Tangent,
	/// Both parameters are curve endpoints, so the curves already meet at a shared vertex.
	Endpoint,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BezierIntersection {
	pub a_t: f64,
	pub b_t: f64,
	pub point: DVec2,
	pub kind: IntersectionKind,
	/// Distance between the two curves evaluated at `a_t` and `b_t`.
	pub residual: f64,
}

#[derive(Clone, Copy)]
struct IntersectionSegment {
	bezier: Bezier,
	start_param: f64,
	end_param: f64,
	bounding_box: [DVec2; 2],
}

impl IntersectionSegment {
	fn new(bezier: Bezier, start_param: f64, end_param: f64) -> Self {
		let bounding_box = bezier.bounding_box();
		Self { bezier, start_param, end_param, bounding_box }
	}

	fn subdivide(&self) -> [Self; 2] {
		let [first, second] = self.bezier.split(0.5);
		let mid_param = (self.start_param + self.end_param) / 2.;
		[Self::new(first, self.start_param, mid_param), Self::new(second, mid_param, self.end_param)]
	}

	fn max_extent(&self) -> f64 {
		let [min, max] = self.bounding_box;
		(max - min).max_element()
	}

	fn chord(&self) -> LineSegment {
		[self.bezier.start, self.bezier.end]
	}

	fn param_at(&self, local: f64) -> f64 {
		self.start_param + (self.end_param - self.start_param) * local.clamp(0., 1.)
	}
}

/// Inverse of the `3t^2 - 2t^3` easing a zero-tangent cubic applies along its chord.
fn straight_cubic_param(linear: f64) -> f64 {
	0.5 - ((1. - 2. * linear.clamp(0., 1.)).asin() / 3.).sin()
}

impl Bezier {
	fn approximately_equal(&self, other: &Bezier, point_epsilon: f64) -> bool {
		let forward = [self.start, self.handle_start, self.handle_end, self.end];
		let compare = |points: [DVec2; 4]| forward.iter().zip(points).all(|(a, b)| a.abs_diff_eq(b, point_epsilon));
		compare([other.start, other.handle_start, other.handle_end, other.end]) || compare([other.end, other.handle_end, other.handle_start, other.start])
	}

	/// Unit direction of travel at `t`, falling back to the control polygon where the derivative vanishes.
	fn direction(&self, t: f64) -> DVec2 {
		let derivative = self.derivative(t);
		if derivative.length_squared() > f64::EPSILON {
			return derivative.normalize();
		}
		let hull = if t < 0.5 { self.handle_end - self.start } else { self.end - self.handle_start };
		if hull.length_squared() > f64::EPSILON { hull.normalize() } else { (self.end - self.start).normalize_or_zero() }
	}

	/// Find the intersections between this curve and `other`.
	///
	/// Straight (zero-tangent) pairs are solved directly. Everything else is found by recursively halving both curves
	/// and discarding subcurve pairs whose bounding boxes are disjoint, until the surviving subcurves are small enough to
	/// intersect as straight chords. Coincident curves report no intersections.
	pub fn intersections(&self, other: &Bezier, eps: &Epsilons) -> Vec<BezierIntersection> {
		if self.approximately_equal(other, eps.point) {
			return Vec::new();
		}

		let params = if self.has_zero_tangents() && other.has_zero_tangents() {
			line_segment_intersection([self.start, self.end], [other.start, other.end], eps.param)
				.map(|(s, t)| (straight_cubic_param(s), straight_cubic_param(t)))
				.into_iter()
				.collect()
		} else {
			self.subdivision_intersection_params(other, eps)
		};

		let mut intersections: Vec<BezierIntersection> = Vec::new();
		for (a_t, b_t) in params {
			let point_a = self.evaluate(a_t);
			let point_b = other.evaluate(b_t);
			if intersections.iter().any(|existing| existing.point.distance(point_a) <= eps.linear) {
				continue;
			}

			let is_endpoint = |t: f64| t <= eps.param || t >= 1. - eps.param;
			let kind = if is_endpoint(a_t) && is_endpoint(b_t) {
				IntersectionKind::Endpoint
			} else if self.direction(a_t).perp_dot(other.direction(b_t)).abs() < eps.point {
				IntersectionKind::Tangent
			} else {
				IntersectionKind::Crossing
			};

			log::trace!("Intersection at a_t = {a_t}, b_t = {b_t} ({kind:?})");
			intersections.push(BezierIntersection {
				a_t,
				b_t,
				point: (point_a + point_b) / 2.,
				kind,
				residual: point_a.distance(point_b),
			});
		}
		intersections
	}

	fn subdivision_intersection_params(&self, other: &Bezier, eps: &Epsilons) -> Vec<(f64, f64)> {
		let mut pairs = vec![(IntersectionSegment::new(*self, 0., 1.), IntersectionSegment::new(*other, 0., 1.))];
		let mut params = Vec::new();

		while !pairs.is_empty() {
			let mut next_pairs = Vec::new();

			for (seg0, seg1) in pairs {
				if !do_rectangles_overlap(seg0.bounding_box, seg1.bounding_box) {
					continue;
				}

				let is_linear0 = seg0.max_extent() <= eps.linear;
				let is_linear1 = seg1.max_extent() <= eps.linear;

				match (is_linear0, is_linear1) {
					(true, true) => {
						if let Some((s, t)) = line_segment_intersection(seg0.chord(), seg1.chord(), eps.param) {
							params.push((seg0.param_at(s), seg1.param_at(t)));
						}
					}
					(true, false) => next_pairs.extend(seg1.subdivide().map(|seg1| (seg0, seg1))),
					(false, true) => next_pairs.extend(seg0.subdivide().map(|seg0| (seg0, seg1))),
					(false, false) => {
						for seg0 in seg0.subdivide() {
							next_pairs.extend(seg1.subdivide().map(|seg1| (seg0, seg1)));
						}
					}
				}
			}

			if next_pairs.len() > MAX_INTERSECTION_PAIRS {
				log::warn!("Curve intersection gave up after exceeding {MAX_INTERSECTION_PAIRS} candidate pairs; the curves likely overlap");
				break;
			}
			pairs = next_pairs;
		}

		params
	}
}
