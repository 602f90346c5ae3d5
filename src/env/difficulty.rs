//! Obstacle-count difficulty scaling
//!
//! Between generations the driving loop may ask an environment to get harder.
//! Difficulty here is the number of obstacles; the growth policy is a small
//! string grammar from the experiment configuration: `"2"` adds two obstacles
//! per increase, `"1.5x"` multiplies the count by 1.5. The count is always
//! capped at a configured maximum. Increases apply to environment instances
//! set up afterwards; already placed obstacle sets are untouched.

use anyhow::{anyhow, Result};

/// How the obstacle count grows on each difficulty increase
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeltaPolicy {
    /// Add a fixed amount (applied only when the amount is >= 1)
    Add(f64),
    /// Multiply by a factor (applied only when the factor is > 1)
    Scale(f64),
}

impl DeltaPolicy {
    /// Parse the delta grammar: `"<number>"` is additive, `"<number>x"` is a
    /// multiplicative factor
    pub fn parse(delta: &str) -> Result<Self> {
        let delta = delta.trim().to_ascii_lowercase();
        let (raw, is_factor) = match delta.strip_suffix('x') {
            Some(raw) => (raw, true),
            None => (delta.as_str(), false),
        };
        let value: f64 = raw
            .trim()
            .parse()
            .map_err(|_| anyhow!("invalid obstacle count delta '{}'", delta))?;
        if is_factor {
            Ok(DeltaPolicy::Scale(value))
        } else {
            Ok(DeltaPolicy::Add(value))
        }
    }
}

/// Obstacle count schedule: current count, growth policy, and cap
#[derive(Debug, Clone)]
pub struct ObstacleSchedule {
    count: usize,
    delta: DeltaPolicy,
    max: usize,
}

impl ObstacleSchedule {
    /// Create a schedule from the configured delta string
    ///
    /// `max` of `None` pins the schedule at the initial count.
    pub fn new(initial: usize, delta: &str, max: Option<usize>) -> Result<Self> {
        Ok(Self {
            count: initial,
            delta: DeltaPolicy::parse(delta)?,
            max: max.unwrap_or(initial),
        })
    }

    /// Current obstacle count
    pub fn count(&self) -> usize {
        self.count
    }

    /// True iff applying the delta policy would raise the count
    pub fn can_increase(&self) -> bool {
        self.next_count() > self.count
    }

    /// Apply the delta policy and commit the new count
    pub fn increase(&mut self) {
        self.count = self.next_count();
    }

    /// Count the delta policy would produce, clamped to the maximum
    fn next_count(&self) -> usize {
        if self.count >= self.max {
            return self.count;
        }
        let next = match self.delta {
            DeltaPolicy::Add(delta) if delta >= 1.0 => self.count + delta.round() as usize,
            DeltaPolicy::Scale(factor) if factor > 1.0 => {
                (self.count as f64 * factor).round() as usize
            }
            // A delta below 1 (or a non-growing factor) never changes the count.
            _ => self.count,
        };
        next.min(self.max)
    }
}
