use super::editor::VectorNetworkEditor;
use super::{Segment, SegmentIndex, VectorNetwork, VertexIndex};
use glam::DVec2;
use rustc_hash::{FxHashMap, FxHashSet};

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct OptimizationConfig {
	/// Vertices closer than this on both axes are merged into the first of them.
	pub vertex_tolerance: f64,
	/// Drop vertices that no segment references after deduplication.
	pub remove_unused_vertices: bool,
}

impl Default for OptimizationConfig {
	fn default() -> Self {
		Self {
			vertex_tolerance: 0.,
			remove_unused_vertices: true,
		}
	}
}

impl OptimizationConfig {
	/// Merge exact duplicates only, keeping every vertex that survives.
	pub const KEEP_UNUSED: Self = Self {
		vertex_tolerance: 0.,
		remove_unused_vertices: false,
	};
}

/// Indices of the elements to take out of a network.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct Selection {
	pub vertices: Vec<VertexIndex>,
	pub segments: Vec<SegmentIndex>,
}

/// Identity of a segment for deduplication. Orientation matters, and `-0.0` equals `0.0`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
struct SegmentKey {
	a: VertexIndex,
	b: VertexIndex,
	tangents: [u64; 4],
}

impl SegmentKey {
	fn new(segment: &Segment) -> Self {
		let bits = |value: f64| (value + 0.).to_bits();
		Self {
			a: segment.a,
			b: segment.b,
			tangents: [bits(segment.ta.x), bits(segment.ta.y), bits(segment.tb.x), bits(segment.tb.y)],
		}
	}
}

impl VectorNetwork {
	/// Merge near-duplicate vertices, drop duplicate segments and optionally drop unused vertices.
	///
	/// Each vertex is merged into the first earlier kept vertex within `vertex_tolerance` on both axes, so the result
	/// depends on vertex order when clusters are wider than the tolerance. Segments are remapped onto the kept vertices
	/// and then deduplicated by endpoints and exact tangents.
	///
	/// # Panics
	/// If a segment references a vertex that does not exist; see [`VectorNetwork::validate`].
	pub fn optimize(&self, config: &OptimizationConfig) -> VectorNetwork {
		let tolerance = config.vertex_tolerance;
		let mut vertices: Vec<DVec2> = Vec::with_capacity(self.vertices.len());
		let index_map: Vec<VertexIndex> = self
			.vertices
			.iter()
			.map(|&point| {
				let existing = vertices.iter().position(|kept| (kept.x - point.x).abs() <= tolerance && (kept.y - point.y).abs() <= tolerance);
				existing.unwrap_or_else(|| {
					vertices.push(point);
					vertices.len() - 1
				})
			})
			.collect();

		let mut seen = FxHashSet::default();
		let mut segments: Vec<Segment> = self
			.segments
			.iter()
			.map(|segment| Segment {
				a: index_map[segment.a],
				b: index_map[segment.b],
				..*segment
			})
			.filter(|segment| seen.insert(SegmentKey::new(segment)))
			.collect();

		let merged = self.vertices.len() - vertices.len();
		let deduplicated = self.segments.len() - segments.len();

		if config.remove_unused_vertices {
			let mut used = vec![false; vertices.len()];
			for segment in &segments {
				used[segment.a] = true;
				used[segment.b] = true;
			}

			let mut renumbered = vec![0; vertices.len()];
			let mut kept = 0;
			for (index, &is_used) in used.iter().enumerate() {
				renumbered[index] = kept;
				if is_used {
					vertices[kept] = vertices[index];
					kept += 1;
				}
			}
			vertices.truncate(kept);

			for segment in &mut segments {
				segment.a = renumbered[segment.a];
				segment.b = renumbered[segment.b];
			}
		}

		log::debug!(
			"Optimized network: merged {merged} vertices, dropped {deduplicated} segments, {} vertices and {} segments remain",
			vertices.len(),
			segments.len()
		);

		VectorNetwork { vertices, segments }
	}

	/// Optimize with zero tolerance, removing exact duplicates and unused vertices.
	///
	/// # Panics
	/// If a segment references a vertex that does not exist; see [`VectorNetwork::validate`].
	pub fn clean(&self) -> VectorNetwork {
		self.optimize(&OptimizationConfig::default())
	}

	/// Concatenate two networks, offsetting the indices of `b`.
	///
	/// The result is optimized with `config`; pass `None` for the raw concatenation.
	///
	/// # Panics
	/// When optimizing, if a segment of either network references a vertex that does not exist; see
	/// [`VectorNetwork::validate`].
	pub fn union(a: &VectorNetwork, b: &VectorNetwork, config: Option<&OptimizationConfig>) -> VectorNetwork {
		let offset = a.vertices.len();
		let vertices = a.vertices.iter().chain(&b.vertices).copied().collect();
		let segments = a
			.segments
			.iter()
			.copied()
			.chain(b.segments.iter().map(|segment| Segment {
				a: segment.a + offset,
				b: segment.b + offset,
				..*segment
			}))
			.collect();

		let result = VectorNetwork { vertices, segments };
		match config {
			Some(config) => result.optimize(config),
			None => result,
		}
	}

	/// [`VectorNetwork::union`] with the default optimization.
	pub fn union_default(a: &VectorNetwork, b: &VectorNetwork) -> VectorNetwork {
		Self::union(a, b, Some(&OptimizationConfig::default()))
	}
}

impl VectorNetworkEditor {
	/// Optimize the edited network in place, returning the result.
	pub fn optimize(&mut self, config: &OptimizationConfig) -> &VectorNetwork {
		self.network = self.network.optimize(config);
		&self.network
	}

	/// A packed copy of the selected vertices and segments.
	///
	/// Endpoints of selected segments are always included. Explicitly selected vertices survive unless `config` removes
	/// unused vertices, which is why the usual config here is [`OptimizationConfig::KEEP_UNUSED`]. Out of range indices
	/// are skipped.
	pub fn copy(&self, selection: &Selection, config: &OptimizationConfig) -> VectorNetwork {
		let segments: Vec<Segment> = selection
			.segments
			.iter()
			.filter_map(|&index| self.network.segments.get(index))
			.filter(|segment| segment.a < self.network.vertices.len() && segment.b < self.network.vertices.len())
			.copied()
			.collect();

		let mut vertex_indices: Vec<VertexIndex> = selection
			.vertices
			.iter()
			.copied()
			.filter(|&index| index < self.network.vertices.len())
			.chain(segments.iter().flat_map(|segment| [segment.a, segment.b]))
			.collect();
		vertex_indices.sort_unstable();
		vertex_indices.dedup();

		let index_map: FxHashMap<VertexIndex, VertexIndex> = vertex_indices.iter().enumerate().map(|(packed, &original)| (original, packed)).collect();
		let vertices = vertex_indices.iter().map(|&index| self.network.vertices[index]).collect();
		let segments = segments
			.into_iter()
			.map(|segment| Segment {
				a: index_map[&segment.a],
				b: index_map[&segment.b],
				..segment
			})
			.collect();

		VectorNetwork { vertices, segments }.optimize(config)
	}
}
