use super::Bezier;
use crate::consts::STRAIGHT_SNAP_TOLERANCE;
use crate::utils;
use glam::DVec2;

impl Bezier {
	/// Roots of the derivative for the `x` and `y` components, unfiltered.
	fn unrestricted_local_extrema(&self) -> [[Option<f64>; 3]; 2] {
		let d0 = self.handle_start - self.start;
		let d1 = self.handle_end - self.handle_start;
		let d2 = self.end - self.handle_end;
		let a = d0 - 2. * d1 + d2;
		let b = 2. * (d1 - d0);
		let c = d0;
		let discriminant = b * b - 4. * a * c;
		let two_times_a = 2. * a;
		[
			utils::solve_quadratic(discriminant.x, two_times_a.x, b.x, c.x),
			utils::solve_quadratic(discriminant.y, two_times_a.y, b.y, c.y),
		]
	}

	/// Returns two lists of `t`-values representing the local extrema of the `x` and `y` parametric curves respectively,
	/// restricted to the open interval `(0, 1)`.
	pub fn local_extrema(&self) -> [impl Iterator<Item = f64>; 2] {
		self.unrestricted_local_extrema().map(|t_values| t_values.into_iter().flatten().filter(|&t| t > 0. && t < 1.))
	}

	/// Return the min and max corners of the exact bounding box of the curve.
	pub fn bounding_box(&self) -> [DVec2; 2] {
		let mut endpoints_min = self.start.min(self.end);
		let mut endpoints_max = self.start.max(self.end);

		// A segment without tangents cannot bulge past its endpoints
		if self.has_zero_tangents() {
			return [endpoints_min, endpoints_max];
		}

		for t_values in self.local_extrema() {
			for t in t_values {
				let point = self.evaluate(t);
				endpoints_min = endpoints_min.min(point);
				endpoints_max = endpoints_max.max(point);
			}
		}

		[endpoints_min, endpoints_max]
	}

	/// Find the single self-intersection of the curve, if it has a loop.
	///
	/// Writing the curve as `a t^3 + b t^2 + c t + d`, two distinct parameters `s` and `t` land on the same point when
	/// `a (u^2 - v) + b u + c = 0` for `u = s + t` and `v = s t`. Crossing that equation with `a` and with `b` yields `u`
	/// and `v` directly, and `s`, `t` are the roots of `x^2 - u x + v`. Both must lie strictly inside `(eps, 1 - eps)`.
	pub fn self_intersection(&self, eps: f64) -> Option<[f64; 2]> {
		let a = -self.start + 3. * self.handle_start - 3. * self.handle_end + self.end;
		let b = 3. * self.start - 6. * self.handle_start + 3. * self.handle_end;
		let c = -3. * self.start + 3. * self.handle_start;

		let a_cross_b = a.perp_dot(b);
		if a_cross_b.abs() < parallel_epsilon(a, b) {
			return None;
		}

		let u = -a.perp_dot(c) / a_cross_b;
		let discriminant = 4. * b.perp_dot(c) / a_cross_b - 3. * u * u;
		if discriminant <= 0. {
			return None;
		}

		let root = discriminant.sqrt();
		let t1 = (u - root) / 2.;
		let t2 = (u + root) / 2.;
		let range = eps..=1. - eps;
		(range.contains(&t1) && range.contains(&t2)).then_some([t1, t2])
	}

	/// Solve for relative tangents that make the curve pass through `target` at parameter `t`.
	///
	/// The offset between `target` and the current point at `t` is distributed equally onto both handles, scaled by the
	/// inverse of the summed handle Bernstein weights `3(1-t)^2 t + 3(1-t) t^2 = 3t(1-t)`. At `t = 0` or `t = 1` the
	/// handles have no influence and the current tangents are returned unchanged.
	///
	/// A straight curve stays straight when `target` lies within [`STRAIGHT_SNAP_TOLERANCE`] of the linear interpolation
	/// `start + t (end - start)` of its endpoints.
	pub fn solve_tangents_for_point(&self, t: f64, target: DVec2) -> (DVec2, DVec2) {
		if self.has_zero_tangents() && target.distance(self.start.lerp(self.end, t)) <= STRAIGHT_SNAP_TOLERANCE {
			return (DVec2::ZERO, DVec2::ZERO);
		}

		let (ta, tb) = self.relative_tangents();
		let weight = 3. * t * (1. - t);
		if weight.abs() < f64::EPSILON {
			return (ta, tb);
		}

		let offset = (target - self.evaluate(t)) / weight;
		(ta + offset, tb + offset)
	}
}

/// Scale-aware threshold below which the curve's cubic and quadratic coefficients are treated as parallel.
fn parallel_epsilon(a: DVec2, b: DVec2) -> f64 {
	f64::EPSILON * 64. * (a.length() * b.length()).max(1.)
}
