//! Drive a navigation environment with a noisy goal-seeking agent
//!
//! Sets up a 2-D instance with obstacles, then steps it with a hand-written
//! policy: head for the goal, with some random jitter so rejected moves near
//! obstacles get a chance to slip around them. Prints per-episode reward and
//! performance.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example random_walk
//! ```

use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use hypernav::config::NavigationConfig;
use hypernav::env::navigation::NavigationEnv;
use hypernav::env::Environment;

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt().with_env_filter("info").init();

    let config = NavigationConfig::new()
        .obstacle_count_initial(2)
        .obstacle_count_max(5)
        .environment_count(4);

    let mut env = NavigationEnv::new(config, StdRng::seed_from_u64(0))?;
    let mut rng = StdRng::seed_from_u64(1);

    for id in 0..4 {
        env.setup(id)?;
        tracing::info!("instance {}: {} steps budgeted", id, env.required_steps());
        tracing::info!("  goal: {:?}", env.goal_state());

        let mut best_performance = 0.0_f64;
        let mut last_reward = 0.0;
        for _ in 0..env.required_steps() {
            let motion: Vec<f64> = env
                .goal_state()
                .iter()
                .zip(env.state())
                .map(|(g, s)| (g - s) * 10.0 + rng.gen_range(-0.3..0.3))
                .collect();
            let result = env.step(&motion)?;
            best_performance = best_performance.max(result.performance);
            last_reward = result.reward;
        }
        tracing::info!(
            "  final reward {:.3}, best performance {:.3}",
            last_reward,
            best_performance
        );
    }

    Ok(())
}
