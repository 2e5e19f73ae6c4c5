use crate::consts::{COLLINEAR_EPSILON, STRICT_MAX_ABSOLUTE_DIFFERENCE};
use glam::{BVec2, DVec2};

pub type LineSegment = [DVec2; 2];

/// Find the root of the linear equation `ax + b = 0`.
pub fn solve_linear(a: f64, b: f64) -> [Option<f64>; 3] {
	if a.abs() > STRICT_MAX_ABSOLUTE_DIFFERENCE { [Some(-b / a), None, None] } else { [None; 3] }
}

/// Find the roots of the quadratic equation `ax^2 + bx + c = 0`, with the discriminant and `2a` precomputed by the caller.
pub fn solve_quadratic(discriminant: f64, two_times_a: f64, b: f64, c: f64) -> [Option<f64>; 3] {
	let mut roots = [None; 3];
	if two_times_a.abs() <= STRICT_MAX_ABSOLUTE_DIFFERENCE {
		roots = solve_linear(b, c);
	} else if discriminant.abs() <= STRICT_MAX_ABSOLUTE_DIFFERENCE {
		roots[0] = Some(-b / two_times_a);
	} else if discriminant > 0. {
		let root_discriminant = discriminant.sqrt();
		roots[0] = Some((-b + root_discriminant) / two_times_a);
		roots[1] = Some((-b - root_discriminant) / two_times_a);
	}
	roots
}

/// Parameters `(s, t)` at which two line segments cross, allowing `eps` of slack past either end.
pub fn line_segment_intersection([p1, p2]: LineSegment, [p3, p4]: LineSegment, eps: f64) -> Option<(f64, f64)> {
	let a = p2 - p1;
	let b = p3 - p4;
	let c = p3 - p1;

	let denom = a.perp_dot(b);
	if denom.abs() < COLLINEAR_EPSILON {
		return None;
	}

	let s = c.perp_dot(b) / denom;
	let t = a.perp_dot(c) / denom;

	if (-eps..=1. + eps).contains(&s) && (-eps..=1. + eps).contains(&t) { Some((s, t)) } else { None }
}

/// Whether two axis-aligned rectangles given as `[min, max]` corners overlap or touch.
pub fn do_rectangles_overlap(rectangle1: [DVec2; 2], rectangle2: [DVec2; 2]) -> bool {
	let [bottom_left1, top_right1] = rectangle1;
	let [bottom_left2, top_right2] = rectangle2;

	top_right1.x >= bottom_left2.x && top_right2.x >= bottom_left1.x && top_right2.y >= bottom_left1.y && top_right1.y >= bottom_left2.y
}

/// Per-axis comparison of two points; both axes within `max_abs_diff` means the points coincide under that tolerance.
pub fn dvec2_compare(a: DVec2, b: DVec2, max_abs_diff: f64) -> BVec2 {
	BVec2::new((a.x - b.x).abs() <= max_abs_diff, (a.y - b.y).abs() <= max_abs_diff)
}
