//! Environment configuration
//!
//! This module defines the configuration parameters for navigation
//! environments and provides validation and builder pattern methods.
//! Configs deserialize from the experiment description (JSON) with every
//! field optional; documented defaults cover the rest.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::env::difficulty::DeltaPolicy;

/// Configuration for a navigation environment
///
/// Default values reproduce the easiest task: a 2-D space with no obstacles
/// and a step size of 0.1.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Dimensionality N of the unit hypercube
    pub size: usize,

    /// Number of obstacles placed in newly set up instances
    pub obstacle_count_initial: usize,

    /// Obstacle count growth per difficulty increase: `"<number>"` adds,
    /// `"<number>x"` multiplies
    pub obstacle_count_delta: String,

    /// Cap on the obstacle count; required once obstacles are enabled
    pub obstacle_count_max: Option<usize>,

    /// Trials evaluated per environment instance; a single trial pads the
    /// step budget with `2 * size` exploratory steps
    pub trial_count: usize,

    /// Number of regular fitness environment instances, used to spread 2-D
    /// goals evenly around a circle
    pub environment_count: usize,

    /// Largest distance the agent can move along each step
    pub max_step_size: f64,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            size: 2,
            obstacle_count_initial: 0,
            obstacle_count_delta: "1".to_string(),
            obstacle_count_max: None,
            trial_count: 1,
            environment_count: 1,
            max_step_size: 0.1,
        }
    }
}

impl NavigationConfig {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration parameters
    ///
    /// A misconfigured experiment should fail here, before any environment
    /// is set up, rather than deep inside placement or difficulty scaling.
    pub fn validate(&self) -> Result<()> {
        if self.size == 0 {
            return Err(anyhow!("size must be positive"));
        }
        if !(self.max_step_size > 0.0 && self.max_step_size <= 1.0) {
            return Err(anyhow!("max_step_size must be in (0, 1]"));
        }
        if self.trial_count == 0 {
            return Err(anyhow!("trial_count must be positive"));
        }
        if self.environment_count == 0 {
            return Err(anyhow!("environment_count must be positive"));
        }
        DeltaPolicy::parse(&self.obstacle_count_delta)?;
        if self.obstacle_count_initial > 0 && self.obstacle_count_max.is_none() {
            return Err(anyhow!(
                "obstacle_count_max is required when obstacles are enabled"
            ));
        }
        if let Some(max) = self.obstacle_count_max {
            if max < self.obstacle_count_initial {
                return Err(anyhow!(
                    "obstacle_count_max must be at least obstacle_count_initial"
                ));
            }
        }
        Ok(())
    }

    /// Set dimensionality
    pub fn size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    /// Set the initial obstacle count
    pub fn obstacle_count_initial(mut self, count: usize) -> Self {
        self.obstacle_count_initial = count;
        self
    }

    /// Set the obstacle count delta string
    pub fn obstacle_count_delta(mut self, delta: impl Into<String>) -> Self {
        self.obstacle_count_delta = delta.into();
        self
    }

    /// Set the obstacle count maximum
    pub fn obstacle_count_max(mut self, max: usize) -> Self {
        self.obstacle_count_max = Some(max);
        self
    }

    /// Set the trial count
    pub fn trial_count(mut self, trials: usize) -> Self {
        self.trial_count = trials;
        self
    }

    /// Set the number of fitness environment instances
    pub fn environment_count(mut self, count: usize) -> Self {
        self.environment_count = count;
        self
    }

    /// Set the maximum step size
    pub fn max_step_size(mut self, step: f64) -> Self {
        self.max_step_size = step;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(NavigationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_obstacles_require_maximum() {
        let config = NavigationConfig::new().obstacle_count_initial(2);
        assert!(config.validate().is_err());

        let config = NavigationConfig::new()
            .obstacle_count_initial(2)
            .obstacle_count_max(5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_malformed_delta_rejected() {
        let config = NavigationConfig::new().obstacle_count_delta("fast");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_step_size_bounds() {
        assert!(NavigationConfig::new().max_step_size(0.0).validate().is_err());
        assert!(NavigationConfig::new().max_step_size(1.5).validate().is_err());
        assert!(NavigationConfig::new().max_step_size(0.25).validate().is_ok());
    }

    #[test]
    fn test_max_below_initial_rejected() {
        let config = NavigationConfig::new()
            .obstacle_count_initial(5)
            .obstacle_count_max(3);
        assert!(config.validate().is_err());
    }
}
