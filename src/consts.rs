// Floating point comparisons
pub const FEQ_EPSILON: f64 = 1e-6;

// Slack allowed when checking that a point lies inside a triangle, as a
// fraction of the triangle's area.
pub const CONTAINMENT_SLACK: f64 = 1e-6;

// Hits closer than this to a ray's origin are ignored (prevents "acne" on
// shadow, reflection and refraction rays).
pub const COLLISION_THRESHOLD: f64 = 1e-4;

// Lights attenuated below this factor by shadows are skipped.
pub const SHADOW_THRESHOLD: f64 = 1e-3;

// Maximum recursion depth for reflection and refraction
pub const MAX_RECURSION_DEPTH: usize = 5;

// Refraction index of the medium the eye sits in
pub const INITIAL_REFRACTION_INDEX: f64 = 1.0;

// Distance from the eye to the viewing plane
pub const VIEW_DISTANCE: f64 = 1.0;

// Runtime parameters
pub const OUT_EXTENSION: &str = "ppm";
