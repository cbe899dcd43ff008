//! Grow Configuration
//!
//! The thresholds and switches that control tree induction.
use crate::constants::{DEFAULT_GAIN_RATIO_PRUNE_THRESHOLD, DEFAULT_SIZE_THRESHOLD};
use crate::errors::TreeError;
use serde::{Deserialize, Serialize};

/// Configuration threaded through every recursive call of the grower.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct GrowConfig {
    /// Subsets smaller than this fraction of the root dataset become leaves.
    #[serde(default = "default_size_threshold")]
    pub size_threshold: f64,
    /// A split is only accepted when the winner's raw gain reaches this
    /// multiple of the mean raw gain over all candidates.
    #[serde(default = "default_gain_ratio_prune_threshold")]
    pub gain_ratio_prune_threshold: f64,
    /// Exclude numeric attributes from the split candidates instead of failing.
    #[serde(default)]
    pub skip_numeric_attributes: bool,
    /// Grow sibling branches on the rayon thread pool.
    #[serde(default)]
    pub parallel: bool,
}

fn default_size_threshold() -> f64 {
    DEFAULT_SIZE_THRESHOLD
}
fn default_gain_ratio_prune_threshold() -> f64 {
    DEFAULT_GAIN_RATIO_PRUNE_THRESHOLD
}

impl Default for GrowConfig {
    fn default() -> Self {
        GrowConfig {
            size_threshold: DEFAULT_SIZE_THRESHOLD,
            gain_ratio_prune_threshold: DEFAULT_GAIN_RATIO_PRUNE_THRESHOLD,
            skip_numeric_attributes: false,
            parallel: false,
        }
    }
}

impl GrowConfig {
    // Set methods for parameters

    /// Set the size threshold.
    /// * `size_threshold` - Fraction of the root dataset size, in `[0, 1]`, below which
    ///   subsets are turned into leaves.
    pub fn set_size_threshold(mut self, size_threshold: f64) -> Self {
        self.size_threshold = size_threshold;
        self
    }

    /// Set the gain pruning threshold.
    /// * `gain_ratio_prune_threshold` - Required ratio of the best raw gain to the mean raw gain.
    pub fn set_gain_ratio_prune_threshold(mut self, gain_ratio_prune_threshold: f64) -> Self {
        self.gain_ratio_prune_threshold = gain_ratio_prune_threshold;
        self
    }

    pub fn set_skip_numeric_attributes(mut self, skip_numeric_attributes: bool) -> Self {
        self.skip_numeric_attributes = skip_numeric_attributes;
        self
    }

    pub fn set_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Check the thresholds are usable.
    pub fn validate(&self) -> Result<(), TreeError> {
        if !self.size_threshold.is_finite() || !(0.0..=1.0).contains(&self.size_threshold) {
            return Err(TreeError::InvalidParameter(
                "size_threshold".to_string(),
                "a value in [0, 1]".to_string(),
                self.size_threshold.to_string(),
            ));
        }
        if !self.gain_ratio_prune_threshold.is_finite() || self.gain_ratio_prune_threshold < 0.0 {
            return Err(TreeError::InvalidParameter(
                "gain_ratio_prune_threshold".to_string(),
                "a finite non-negative value".to_string(),
                self.gain_ratio_prune_threshold.to_string(),
            ));
        }
        Ok(())
    }
}
