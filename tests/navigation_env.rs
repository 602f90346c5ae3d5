//! Integration tests for the navigation environment public API
//!
//! These drive the crate the way the evolutionary loop would: build a config,
//! construct an environment with a seeded random source, set up instances,
//! and step them with motion vectors.

use rand::rngs::StdRng;
use rand::SeedableRng;

use hypernav::config::NavigationConfig;
use hypernav::env::navigation::NavigationEnv;
use hypernav::env::pathfind::shortest_path;
use hypernav::env::Environment;

fn seeded_env(config: NavigationConfig, seed: u64) -> NavigationEnv {
    NavigationEnv::new(config, StdRng::seed_from_u64(seed)).expect("valid config")
}

#[test]
fn test_no_obstacle_estimate_is_euclidean_all_dimensions() {
    for size in 1..=4 {
        let start = vec![0.5; size];
        let mut goal = vec![0.5; size];
        goal[0] = 0.9;
        let path = shortest_path(&start, &goal, &[], 0.1).unwrap();
        assert!((path - 0.4).abs() < 1e-12, "size {}: got {}", size, path);
    }
}

#[test]
fn test_accepted_placements_satisfy_invariants() {
    let config = NavigationConfig::new()
        .obstacle_count_initial(2)
        .obstacle_count_max(5);
    let mut env = seeded_env(config, 1);
    env.setup(0).expect("setup");

    let obstacles = env.obstacles();
    assert_eq!(obstacles.len(), 2);
    assert!(
        obstacles.iter().all(|slot| slot.is_some()),
        "every slot is filled after setup"
    );

    for obst in obstacles.iter().flatten() {
        assert!(
            !obst.collision(env.start_state()),
            "obstacle contains the start state: {}",
            obst
        );
        assert!(
            !obst.collision(env.goal_state()),
            "obstacle contains the goal state: {}",
            obst
        );
        // Thin-slab shape: exactly one squeezed axis.
        let squeezed = obst
            .extents()
            .iter()
            .filter(|e| (**e - 0.1 * 1.01).abs() < 1e-9)
            .count();
        assert_eq!(squeezed, 1, "obstacle is a slab: {}", obst);
    }

    // Monotonic difficulty: the accepted configuration is strictly harder
    // than the unobstructed baseline in the same grid metric.
    let empty = vec![None; obstacles.len()];
    let baseline = shortest_path(env.start_state(), env.goal_state(), &empty, 0.1).unwrap();
    let placed = shortest_path(env.start_state(), env.goal_state(), obstacles, 0.1)
        .expect("accepted configuration is reachable");
    assert!(
        placed > baseline,
        "placed path {} must exceed baseline {}",
        placed,
        baseline
    );

    assert!(env.required_steps() >= 1);
}

#[test]
fn test_path_estimate_idempotent() {
    let config = NavigationConfig::new()
        .obstacle_count_initial(1)
        .obstacle_count_max(3);
    let mut env = seeded_env(config, 5);
    env.setup(2).expect("setup");

    let a = shortest_path(env.start_state(), env.goal_state(), env.obstacles(), 0.1);
    let b = shortest_path(env.start_state(), env.goal_state(), env.obstacles(), 0.1);
    assert_eq!(a, b, "identical configuration gives identical estimate");
}

#[test]
fn test_greedy_agent_reaches_unobstructed_goal() {
    let mut env = seeded_env(NavigationConfig::new(), 3);
    env.setup(0).expect("setup");

    let mut best = 0.0_f64;
    for _ in 0..env.required_steps() {
        // Over-long motions are clamped to unit norm, so this is a full
        // step straight toward the goal.
        let motion: Vec<f64> = env
            .goal_state()
            .iter()
            .zip(env.state())
            .map(|(g, s)| (g - s) * 10.0)
            .collect();
        let result = env.step(&motion).expect("step");
        best = best.max(result.performance);
    }
    assert_eq!(
        best, 1.0,
        "a greedy agent must reach the goal within the step budget"
    );
}

#[test]
fn test_difficulty_progression_through_environment() {
    let config = NavigationConfig::new()
        .obstacle_count_initial(3)
        .obstacle_count_delta("2")
        .obstacle_count_max(10);
    let mut env = seeded_env(config, 0);
    assert_eq!(env.obstacle_count(), 3);
    assert!(env.can_increase_difficulty());
    env.increase_difficulty();
    assert_eq!(env.obstacle_count(), 5);

    let config = NavigationConfig::new()
        .obstacle_count_initial(3)
        .obstacle_count_delta("2x")
        .obstacle_count_max(10);
    let mut env = seeded_env(config, 0);
    env.increase_difficulty();
    assert_eq!(env.obstacle_count(), 6);

    let config = NavigationConfig::new()
        .obstacle_count_initial(3)
        .obstacle_count_delta("2x")
        .obstacle_count_max(5);
    let mut env = seeded_env(config, 0);
    env.increase_difficulty();
    assert_eq!(env.obstacle_count(), 5, "capped at the maximum");
    assert!(
        !env.can_increase_difficulty(),
        "no further increase at the maximum"
    );
}

#[test]
fn test_novelty_goals_are_seed_independent() {
    let mut a = seeded_env(NavigationConfig::new(), 7);
    let mut b = seeded_env(NavigationConfig::new(), 99);
    a.setup(-3).expect("setup");
    b.setup(-3).expect("setup");
    assert_eq!(
        a.goal_state(),
        b.goal_state(),
        "novelty goals come from a canonical grid, not the random source"
    );
}

#[test]
fn test_observation_and_action_spaces() {
    let env = seeded_env(NavigationConfig::new().size(4), 0);
    assert_eq!(env.observation_space().shape, vec![5]);
    assert_eq!(env.action_space().shape, vec![4]);
}

#[test]
fn test_render_only_in_two_dimensions() {
    let config = NavigationConfig::new()
        .obstacle_count_initial(1)
        .obstacle_count_max(2);
    let mut env = seeded_env(config, 11);
    env.setup(0).expect("setup");
    let canvas = env.render(48);
    assert_eq!(canvas.len(), 48 * 48);
    assert!(
        canvas.iter().any(|p| *p != 0),
        "a placed obstacle leaves pixels on the canvas"
    );

    let config = NavigationConfig::new()
        .size(3)
        .obstacle_count_initial(1)
        .obstacle_count_max(2);
    let mut env = seeded_env(config, 11);
    env.setup(0).expect("setup");
    assert!(env.render(48).is_empty());
}

#[test]
fn test_config_deserializes_with_defaults() {
    let config: NavigationConfig = serde_json::from_str(
        r#"{"size": 3, "obstacle_count_initial": 1, "obstacle_count_max": 4}"#,
    )
    .expect("parse config");
    assert_eq!(config.size, 3);
    assert_eq!(config.obstacle_count_initial, 1);
    assert_eq!(config.obstacle_count_max, Some(4));
    assert_eq!(config.obstacle_count_delta, "1");
    assert_eq!(config.max_step_size, 0.1);
    assert!(config.validate().is_ok());
}

#[test]
fn test_reset_restores_start_state() {
    let mut env = seeded_env(NavigationConfig::new(), 2);
    env.setup(0).expect("setup");
    env.step(&[1.0, 0.0]).expect("step");
    assert_ne!(env.state(), env.start_state());
    env.reset();
    assert_eq!(env.state(), env.start_state());
}
