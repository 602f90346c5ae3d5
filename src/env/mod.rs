//! Environment traits and implementations
//!
//! This module defines the core environment interface and provides the
//! continuous-state navigation environment used as a reinforcement-learning
//! fitness task. Environments are driven externally one step at a time: the
//! evolutionary loop sets an instance up, feeds it motion vectors produced by
//! an agent controller, and aggregates the performance scalars it returns.

use anyhow::Result;

/// Core capability set for fitness-evaluation environments
///
/// Implemented as a trait rather than a base class so alternative
/// environment variants can be added without inheritance. Setup and stepping
/// are fallible: setup surfaces configuration errors, stepping surfaces
/// input-contract violations from the upstream agent controller. Internal
/// search and placement failures never escape through this interface.
pub trait Environment {
    /// Set up a fresh instance
    ///
    /// `instance_id >= 0` selects regular randomized start/goal placement
    /// for fitness evaluation; `instance_id < 0` selects a deterministic
    /// canonical goal layout for novelty evaluation.
    fn setup(&mut self, instance_id: i64) -> Result<()>;

    /// Reset the live position to the instance's start state
    fn reset(&mut self);

    /// Agent-observable output for the current position
    ///
    /// The raw position vector concatenated with the reward scalar; the
    /// agent perceives ground-truth state, not a transformed encoding.
    fn observation(&self) -> Vec<f64>;

    /// Apply one motion vector and return the resulting step outcome
    fn step(&mut self, motion: &[f64]) -> Result<StepResult>;

    /// Episode length this instance recommends, in steps
    fn required_steps(&self) -> usize;

    /// Override the recommended episode length
    fn set_required_steps(&mut self, steps: usize);

    /// True iff the difficulty policy would make future instances harder
    fn can_increase_difficulty(&self) -> bool;

    /// Commit a difficulty increase, affecting subsequently set up instances
    fn increase_difficulty(&mut self);

    /// Get the observation space dimensions
    fn observation_space(&self) -> SpaceInfo;

    /// Get the action space dimensions
    fn action_space(&self) -> SpaceInfo;

    /// Render a visualization of the instance into a square pixel buffer
    ///
    /// A pure side channel for diagnostics; environments without a
    /// renderable configuration return an empty buffer.
    fn render(&self, image_size: usize) -> Vec<u8>;
}

/// Result of an environment step
#[derive(Debug, Clone)]
pub struct StepResult {
    /// Next observation: position concatenated with the reward scalar
    pub observation: Vec<f64>,

    /// Dense shaping reward for the (possibly rejected) move
    pub reward: f64,

    /// Task-success scalar fed to external fitness aggregation
    ///
    /// Deliberately on a different scale than `reward`: full credit only
    /// when the goal is effectively reached, a small proximity credit
    /// otherwise.
    pub performance: f64,
}

/// Space information for observations and actions
#[derive(Debug, Clone)]
pub struct SpaceInfo {
    /// Shape of the space
    pub shape: Vec<usize>,

    /// Data type
    pub space_type: SpaceType,
}

/// Space data types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpaceType {
    /// Continuous space with per-element bounds
    Box,

    /// Discrete space with n options
    Discrete(usize),
}

pub mod difficulty;
pub mod navigation;
pub mod obstacle;
pub mod pathfind;
