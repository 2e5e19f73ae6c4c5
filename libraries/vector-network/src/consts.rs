// Curve approximation
/// Handle length ratio that makes a cubic Bezier approximate a quarter circle: `4/3 * (sqrt(2) - 1)`.
pub const KAPPA: f64 = 0.552_284_749_830_793_6;

// Tangent mirroring
/// Maximum normalized cross product for two tangents to be considered parallel.
pub const MIRRORING_ANGLE_EPSILON: f64 = 1e-3;
/// A bend target this close to a straight segment's line keeps the segment straight.
pub const STRAIGHT_SNAP_TOLERANCE: f64 = 0.1;

// Planarization
/// Intersection parameters closer than this to 0 or 1 are treated as hits on an existing vertex.
pub const PLANARIZE_PARAM_EPSILON: f64 = 1e-6;
/// Newly inserted intersection vertices snap to existing vertices within this distance on both axes.
pub const PLANARIZE_VERTEX_EPSILON: f64 = 1e-6;
/// Vertex merge tolerance applied by the optimization pass that follows planarization.
pub const PLANARIZE_MERGE_TOLERANCE: f64 = 0.5;
/// Upper bound on the number of candidate subcurve pairs kept alive per subdivision round.
pub const MAX_INTERSECTION_PAIRS: usize = 4096;

// Shapes
/// Regular polygons and stars are inscribed in this fraction of their bounding ellipse.
pub const POLYGON_RADIUS_RATIO: f64 = 0.9;
pub const DEFAULT_STAR_INNER_RADIUS: f64 = 0.5;

// Numerical solvers
pub const MAX_ABSOLUTE_DIFFERENCE: f64 = 1e-3;
pub const STRICT_MAX_ABSOLUTE_DIFFERENCE: f64 = 1e-6;
/// Cross products below this magnitude mark two line directions as parallel.
pub const COLLINEAR_EPSILON: f64 = f64::EPSILON * 64.;
