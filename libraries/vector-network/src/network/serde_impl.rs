/// Vertices serialize as `[x, y]` and deserialize from either `[x, y]` or `{ "p": [x, y] }`.
pub mod vertices {
	use glam::DVec2;
	use serde::{Deserialize, Deserializer, Serializer};

	#[derive(Deserialize)]
	#[serde(untagged)]
	enum VertexRepr {
		Point([f64; 2]),
		Wrapped { p: [f64; 2] },
	}

	pub fn serialize<S: Serializer>(vertices: &[DVec2], serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_seq(vertices.iter().map(|vertex| [vertex.x, vertex.y]))
	}

	pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<DVec2>, D::Error> {
		let vertices = Vec::<VertexRepr>::deserialize(deserializer)?;
		Ok(vertices
			.into_iter()
			.map(|vertex| match vertex {
				VertexRepr::Point(p) | VertexRepr::Wrapped { p } => DVec2::from_array(p),
			})
			.collect())
	}
}
