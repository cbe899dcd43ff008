pub const DEFAULT_SIZE_THRESHOLD: f64 = 0.1;
pub const DEFAULT_GAIN_RATIO_PRUNE_THRESHOLD: f64 = 1.0;
/// Gains and split information below this magnitude are treated as zero.
pub const GAIN_EPSILON: f64 = 1e-12;
