use crate::consts::{DEFAULT_STAR_INNER_RADIUS, KAPPA, POLYGON_RADIUS_RATIO};
use crate::network::{Rect, Segment, VectorNetwork};
use glam::DVec2;
use std::f64::consts::{FRAC_PI_2, TAU};

/// Parameters of a regular star inscribed in a rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StarPolygon {
	pub rect: Rect,
	/// Number of outer tips.
	pub points: usize,
	/// Radius of the inner vertices as a fraction of the outer radius.
	pub inner_radius: f64,
}

impl StarPolygon {
	pub fn new(rect: Rect, points: usize) -> Self {
		Self {
			rect,
			points,
			inner_radius: DEFAULT_STAR_INNER_RADIUS,
		}
	}
}

/// Points spaced evenly by angle around the center of `rect`, starting straight up, with radii cycling through `radii`.
fn radial_points(rect: &Rect, count: usize, radii: &[f64]) -> Vec<DVec2> {
	let center = rect.center();
	let outer = DVec2::new(rect.width, rect.height) / 2. * POLYGON_RADIUS_RATIO;
	let step = TAU / count as f64;

	(0..count)
		.map(|i| {
			let angle = i as f64 * step - FRAC_PI_2;
			center + outer * radii[i % radii.len()] * DVec2::from_angle(angle)
		})
		.collect()
}

impl VectorNetwork {
	/// The four corners of `rect`, clockwise on screen from the top left.
	pub fn from_rect(rect: Rect) -> Self {
		let Rect { x, y, width, height } = rect;
		Self::polygon(&[DVec2::new(x, y), DVec2::new(x + width, y), DVec2::new(x + width, y + height), DVec2::new(x, y + height)])
	}

	/// The ellipse inscribed in `rect`, as four quarter arcs through its top, right, bottom and left extremes.
	pub fn from_ellipse(rect: Rect) -> Self {
		let center = rect.center();
		let radius = DVec2::new(rect.width, rect.height) / 2.;
		let handle = radius * KAPPA;

		let vertices = vec![
			center - DVec2::new(0., radius.y),
			center + DVec2::new(radius.x, 0.),
			center + DVec2::new(0., radius.y),
			center - DVec2::new(radius.x, 0.),
		];
		let segments = vec![
			Segment::new(0, 1, DVec2::new(handle.x, 0.), DVec2::new(0., -handle.y)),
			Segment::new(1, 2, DVec2::new(0., handle.y), DVec2::new(handle.x, 0.)),
			Segment::new(2, 3, DVec2::new(-handle.x, 0.), DVec2::new(0., handle.y)),
			Segment::new(3, 0, DVec2::new(0., -handle.y), DVec2::new(-handle.x, 0.)),
		];
		Self::new(vertices, segments)
	}

	/// A regular polygon with `points` corners, inscribed at [`POLYGON_RADIUS_RATIO`] of the half extents of `rect`.
	///
	/// The polygon is centered on the center of `rect`, including its `x` and `y` offset. Data that placed polygons at
	/// `(width / 2, height / 2)` regardless of position needs `rect.x` and `rect.y` set to zero to land in the same place.
	pub fn from_regular_polygon(rect: Rect, points: usize) -> Self {
		if points == 0 {
			return Self::default();
		}
		Self::polygon(&radial_points(&rect, points, &[1.]))
	}

	/// A star alternating between outer tips and inner vertices, starting with a tip straight up.
	///
	/// Like [`VectorNetwork::from_regular_polygon`], the star is centered on the center of `rect` including its offset.
	pub fn from_regular_star_polygon(star: StarPolygon) -> Self {
		if star.points == 0 {
			return Self::default();
		}
		Self::polygon(&radial_points(&star.rect, star.points * 2, &[1., star.inner_radius]))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	fn assert_near(actual: DVec2, expected: DVec2) {
		assert!(actual.abs_diff_eq(expected, 1e-9), "{actual} != {expected}");
	}

	#[test]
	fn test_rect() {
		let network = VectorNetwork::from_rect(Rect::new(10., 20., 30., 40.));
		assert_eq!(network.vertices, vec![DVec2::new(10., 20.), DVec2::new(40., 20.), DVec2::new(40., 60.), DVec2::new(10., 60.)]);
		assert_eq!(network.segments, vec![Segment::straight(0, 1), Segment::straight(1, 2), Segment::straight(2, 3), Segment::straight(3, 0)]);
		assert_eq!(network.bbox(), Rect::new(10., 20., 30., 40.));
	}

	#[test]
	fn test_ellipse() {
		let network = VectorNetwork::from_ellipse(Rect::new(0., 0., 200., 100.));
		assert_eq!(network.vertices, vec![DVec2::new(100., 0.), DVec2::new(200., 50.), DVec2::new(100., 100.), DVec2::new(0., 50.)]);
		assert_eq!(network.segments[0].ta, DVec2::new(100. * KAPPA, 0.));
		assert_eq!(network.segments[0].tb, DVec2::new(0., -50. * KAPPA));

		let bbox = network.bbox();
		assert!((bbox.width - 200.).abs() < 1e-9 && (bbox.height - 100.).abs() < 1e-9);
		assert!(network.bbox_approx().width >= bbox.width);
	}

	#[test]
	fn test_regular_polygon() {
		let triangle = VectorNetwork::from_regular_polygon(Rect::new(0., 0., 100., 100.), 3);
		assert_eq!(triangle.vertices.len(), 3);
		assert_eq!(triangle.segments.len(), 3);
		assert_near(triangle.vertices[0], DVec2::new(50., 5.));

		let square = VectorNetwork::from_regular_polygon(Rect::new(100., 100., 100., 100.), 4);
		assert_near(square.vertices[0], DVec2::new(150., 105.));
		assert_near(square.vertices[1], DVec2::new(195., 150.));

		assert!(VectorNetwork::from_regular_polygon(Rect::new(0., 0., 100., 100.), 0).is_empty());
	}

	#[test]
	fn test_regular_star() {
		let star = VectorNetwork::from_regular_star_polygon(StarPolygon::new(Rect::new(0., 0., 100., 100.), 5));
		assert_eq!(star.vertices.len(), 10);
		assert_eq!(star.segments.len(), 10);
		assert_near(star.vertices[0], DVec2::new(50., 5.));
		for (i, vertex) in star.vertices.iter().enumerate() {
			let expected = if i % 2 == 0 { 45. } else { 22.5 };
			assert!((vertex.distance(DVec2::splat(50.)) - expected).abs() < 1e-9);
		}
	}

	#[test]
	fn test_regular_star_follows_rect_offset() {
		let origin = VectorNetwork::from_regular_star_polygon(StarPolygon::new(Rect::new(0., 0., 100., 100.), 5));
		let offset = VectorNetwork::from_regular_star_polygon(StarPolygon::new(Rect::new(30., -20., 100., 100.), 5));
		for (moved, original) in offset.vertices.iter().zip(&origin.vertices) {
			assert_near(*moved, *original + DVec2::new(30., -20.));
		}
		assert_eq!(offset.segments, origin.segments);
	}
}
