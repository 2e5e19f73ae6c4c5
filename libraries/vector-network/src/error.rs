use thiserror::Error;

/// Failures surfaced by vector network operations.
///
/// Degenerate geometry (a corner with nothing to bend, a tangent with no mirrored counterpart) is never an error;
/// those calls leave the network untouched.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum VectorNetworkError {
	#[error("Invalid vertex index: {index} (network has {len} vertices)")]
	InvalidVertexIndex { index: usize, len: usize },

	#[error("Invalid segment index: {index} (network has {len} segments)")]
	InvalidSegmentIndex { index: usize, len: usize },

	#[error("PointOnSegment segment index ({found}) does not match segment index ({expected})")]
	SegmentMismatch { expected: usize, found: usize },

	#[error("Unsupported path command `{0}`: quadratic curves cannot be represented in a vector network")]
	UnsupportedPathCommand(char),

	#[error("Failed to parse path data: {0}")]
	PathParse(String),
}
