//! # Hypernav
//!
//! Continuous-state navigation environments for reinforcement learning
//! fitness evaluation.
//!
//! An agent moves a point through an N-dimensional unit hypercube toward a
//! goal state, optionally obstructed by randomly placed thin hyper-rectangle
//! obstacles. Obstacle placement is validated with a grid-based bidirectional
//! path search that also sizes each episode's step budget, and a difficulty
//! schedule grows the obstacle count as training progresses.
//!
//! ## Quick Start
//!
//! ```rust
//! use hypernav::prelude::*;
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let config = NavigationConfig::new();
//! let mut env = NavigationEnv::new(config, StdRng::seed_from_u64(0)).unwrap();
//! env.setup(0).unwrap();
//! let result = env.step(&[1.0, 0.0]).unwrap();
//! assert_eq!(result.observation.len(), 3);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Environment configuration
pub mod config;

/// Environment traits and implementations
pub mod env;

/// Utility functions and helpers
pub mod utils;

/// Prelude module for convenient imports
///
/// This module re-exports commonly used types and traits for convenience.
pub mod prelude {
    pub use crate::config::NavigationConfig;
    pub use crate::env::navigation::NavigationEnv;
    pub use crate::env::obstacle::Obstacle;
    pub use crate::env::{Environment, SpaceInfo, SpaceType, StepResult};
}

/// Current version of hypernav
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
