/// Default semantic-pointer dimensionality (reduced from 32 for capacity)
pub const DEFAULT_DIMENSIONS: usize = 16;

/// Default integration step in seconds
pub const DEFAULT_DT: f64 = 0.001;

/// Constant utility of the "no response" option in action selection
pub const BASELINE_UTILITY: f64 = 0.5;

/// Similarity a response channel must reach to count as a finger press
pub const RESPONSE_THRESHOLD: f64 = 0.5;

/// Maximum pairwise similarity accepted when populating a vocabulary
pub const MAX_SIMILARITY: f64 = 0.1;

/// Candidate draws per key before the least-similar candidate is accepted
pub const MAX_POPULATE_ATTEMPTS: usize = 100;

/// Norm clamp applied to every channel state
pub const RADIUS: f64 = 1.0;

/// Synapse on memoryless channels (seconds)
pub const FAST_SYNAPSE: f64 = 0.005;

/// Synapse on recurrent feedback channels (seconds)
pub const FEEDBACK_SYNAPSE: f64 = 0.1;

/// Gain applied to combined evidence so action selection can trigger
pub const EVIDENCE_GAIN: f64 = 2.0;

/// Number of randomly drawn trials per run
pub const DEFAULT_TRIALS: usize = 10;

/// Numerical epsilon for near-zero comparisons
pub const EPSILON: f64 = 1e-10;
