//! Continuous-state navigation environment
//!
//! The agent moves a point through the `[0,1]^N` unit hypercube toward a goal
//! state. Its output is interpreted as a motion vector applied additively to
//! the current position, and the reward signal is a function of the distance
//! from the current position to the goal. Instances can optionally contain
//! thin hyper-rectangular obstacles placed at random; the agent cannot
//! perceive the obstacles directly, it only experiences rejected moves.
//!
//! Obstacle placement is validated with the path estimator: every accepted
//! obstacle must lengthen the estimated shortest path without making the goal
//! unreachable. The same estimate sizes the episode step budget, so harder
//! instances grant proportionally more steps.

use std::f64::consts::PI;
use std::fmt;

use anyhow::{bail, Result};
use rand::rngs::StdRng;
use rand::Rng;

use crate::config::NavigationConfig;
use crate::env::difficulty::ObstacleSchedule;
use crate::env::obstacle::Obstacle;
use crate::env::pathfind::{shortest_path, GridIndexer};
use crate::env::{Environment, SpaceInfo, SpaceType, StepResult};
use crate::utils::vecmath::{all_finite, clamp_to_unit_norm, euclidean_distance, l1_distance};

/// Grid subdivisions per axis for the canonical novelty goal layout
const NOVELTY_GRANULARITY: usize = 3;

/// Failed poses for one obstacle slot before the whole sequence restarts
const MAX_SLOT_ATTEMPTS: u32 = 1000;

/// Gray level used for obstacles in rendered images
const OBSTACLE_SHADE: u8 = 128;

/// Navigation task environment over an N-dimensional unit hypercube
///
/// Each instance owns its start state, goal state, obstacle list, and live
/// position. Instances are independent; the pseudo-random source is an
/// explicit constructor dependency so callers control seeding and sharing.
#[derive(Debug)]
pub struct NavigationEnv {
    config: NavigationConfig,
    schedule: ObstacleSchedule,

    /// Instance id; negative ids mark novelty-search instances
    id: i64,

    start_state: Vec<f64>,
    goal_state: Vec<f64>,
    /// Live position, reseeded from `start_state` on reset
    state: Vec<f64>,

    /// Obstacle slots; `None` only while placement is in progress
    obstacles: Vec<Option<Obstacle>>,
    required_steps: usize,

    rng: StdRng,
}

/// Retry state for one obstacle placement pass
///
/// The trial size is shared across slots within a pass and only resets when
/// the whole pass restarts, so later obstacles in a crowded space keep the
/// shrinkage earlier slots already paid for.
#[derive(Debug)]
struct PlacementPass {
    slot: usize,
    trial_size: f64,
    attempts: u32,
}

impl PlacementPass {
    fn new() -> Self {
        Self { slot: 0, trial_size: 1.0, attempts: 0 }
    }
}

impl NavigationEnv {
    /// Create an environment from a validated configuration and a caller
    /// supplied random source
    pub fn new(config: NavigationConfig, rng: StdRng) -> Result<Self> {
        config.validate()?;
        let schedule = ObstacleSchedule::new(
            config.obstacle_count_initial,
            &config.obstacle_count_delta,
            config.obstacle_count_max,
        )?;
        let size = config.size;
        Ok(Self {
            config,
            schedule,
            id: 0,
            start_state: vec![0.5; size],
            goal_state: vec![0.0; size],
            state: vec![0.5; size],
            obstacles: Vec::new(),
            required_steps: 1,
            rng,
        })
    }

    /// Dimensionality N of the state space
    pub fn size(&self) -> usize {
        self.config.size
    }

    /// Instance id set by the last call to `setup`
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Fixed start state of the current instance
    pub fn start_state(&self) -> &[f64] {
        &self.start_state
    }

    /// Fixed goal state of the current instance
    pub fn goal_state(&self) -> &[f64] {
        &self.goal_state
    }

    /// Live position of the agent
    pub fn state(&self) -> &[f64] {
        &self.state
    }

    /// Obstacles placed for the current instance
    pub fn obstacles(&self) -> &[Option<Obstacle>] {
        &self.obstacles
    }

    /// Obstacle count future instances will be set up with
    pub fn obstacle_count(&self) -> usize {
        self.schedule.count()
    }

    /// Dense shaping reward for a position: `1 - L1(state, goal) / N`
    ///
    /// Bounded and directional, so it shapes a gradient toward the goal even
    /// far away from it.
    pub fn reward(&self, state: &[f64]) -> f64 {
        1.0 - l1_distance(state, &self.goal_state) / self.config.size as f64
    }

    /// Task-success scalar for a position
    ///
    /// Full credit once the goal is within a single step, otherwise a small
    /// proximity credit.
    pub fn performance(&self, state: &[f64]) -> f64 {
        let d = l1_distance(state, &self.goal_state) / self.config.size as f64;
        if d < self.config.max_step_size {
            1.0
        } else {
            (1.0 - d) * 0.1
        }
    }

    /// Estimated shortest path for the current obstacle configuration
    fn estimate_path(&self) -> Option<f64> {
        shortest_path(
            &self.start_state,
            &self.goal_state,
            &self.obstacles,
            self.config.max_step_size,
        )
    }

    /// Place a fitness-evaluation goal for a non-negative instance id
    fn place_fitness_goal(&mut self, instance_id: i64) {
        if self.config.size == 2 {
            // Spread goals evenly around a circle just inside the unit
            // square, one angle per instance.
            let arc = 2.0 * PI / self.config.environment_count as f64;
            let angle = arc * (instance_id % self.config.environment_count as i64) as f64;
            self.goal_state[0] = 0.5 + angle.cos() / 2.01;
            self.goal_state[1] = 0.5 + angle.sin() / 2.01;
        } else {
            // Random goal at a minimum distance from the start state.
            loop {
                for g in self.goal_state.iter_mut() {
                    *g = self.rng.gen::<f64>();
                }
                let d = euclidean_distance(&self.goal_state, &self.start_state);
                if (0.4..=0.5).contains(&d) {
                    break;
                }
            }
        }
    }

    /// Place a canonical-grid goal for a negative (novelty) instance id
    ///
    /// Novelty instances iterate a fixed 3-per-axis grid of goal locations so
    /// behavioral diversity is assessed against the same layouts every time.
    fn place_novelty_goal(&mut self, instance_id: i64) -> Result<()> {
        let grid = GridIndexer::new(self.config.size, NOVELTY_GRANULARITY);
        let cell_index = (-instance_id - 1) as usize;
        if cell_index >= grid.point_count() {
            bail!(
                "novelty instance id {} is outside the canonical goal grid of {} cells",
                instance_id,
                grid.point_count()
            );
        }
        let spacing = 1.0 / (NOVELTY_GRANULARITY - 1) as f64;
        let cell = grid.coords(cell_index);
        for (g, c) in self.goal_state.iter_mut().zip(&cell) {
            *g = *c as f64 * spacing;
        }
        // Pull distant corner goals toward the centre so the distance from
        // the start state is exactly 0.5.
        let d = euclidean_distance(&self.goal_state, &self.start_state);
        if d > 0.5 {
            for g in self.goal_state.iter_mut() {
                *g = (*g - 0.5) * (0.5 / d) + 0.5;
            }
        }
        Ok(())
    }

    /// Place the scheduled number of obstacles and return the final path
    /// estimate
    ///
    /// Placement passes restart from the first slot whenever a slot exhausts
    /// its attempt budget; restarts are unbounded, an external watchdog is
    /// expected to bound pathological configurations.
    fn place_obstacles(&mut self) -> f64 {
        let count = self.schedule.count();
        self.obstacles = vec![None; count];
        if count == 0 {
            // The estimator's no-obstacle shortcut, inlined.
            return euclidean_distance(&self.start_state, &self.goal_state);
        }
        // Baseline over the empty slot list uses the same grid metric the
        // acceptance test below compares against.
        let baseline = match self.estimate_path() {
            Some(path) => path,
            None => unreachable!("unobstructed space is always connected"),
        };
        loop {
            if let Some(path) = self.placement_pass(baseline) {
                return path;
            }
            self.obstacles = vec![None; count];
        }
    }

    /// One attempt to fill every obstacle slot
    ///
    /// Returns the final path estimate on success, or `None` when some slot
    /// failed `MAX_SLOT_ATTEMPTS` times and all placements must be abandoned.
    fn placement_pass(&mut self, baseline: f64) -> Option<f64> {
        let mut pass = PlacementPass::new();
        let mut path = baseline;
        while pass.slot < self.obstacles.len() {
            let candidate = Obstacle::random(
                self.config.size,
                pass.trial_size,
                self.config.max_step_size,
                &mut self.rng,
            );
            let mut valid =
                !candidate.collision(&self.start_state) && !candidate.collision(&self.goal_state);
            if valid {
                self.obstacles[pass.slot] = Some(candidate);
                match self.estimate_path() {
                    // An obstacle must lengthen the path without blocking
                    // the goal completely.
                    Some(p) if p > baseline => path = p,
                    _ => {
                        self.obstacles[pass.slot] = None;
                        valid = false;
                    }
                }
            }
            if valid {
                pass.slot += 1;
                pass.attempts = 0;
            } else {
                // Keep shrinking until a pose fits.
                pass.trial_size *= 0.95;
                pass.attempts += 1;
                if pass.attempts == MAX_SLOT_ATTEMPTS {
                    tracing::warn!(
                        slot = pass.slot,
                        "no valid pose for obstacle, restarting placements"
                    );
                    return None;
                }
            }
        }
        Some(path)
    }
}

impl Environment for NavigationEnv {
    fn setup(&mut self, instance_id: i64) -> Result<()> {
        self.id = instance_id;
        let size = self.config.size;

        // Start in the middle: with a fixed start state the agent cannot
        // identify the environment instance from its initial observation.
        self.start_state = vec![0.5; size];
        self.goal_state = vec![0.0; size];
        if instance_id >= 0 {
            self.place_fitness_goal(instance_id);
        } else {
            self.place_novelty_goal(instance_id)?;
        }

        let path = self.place_obstacles();
        self.required_steps = ((path * 1.1) / self.config.max_step_size).round() as usize + 1;
        if self.config.trial_count == 1 {
            // A single trial means the agent has to probe directions to find
            // the right one; allow two extra steps per axis for that.
            self.required_steps += 2 * size;
        }

        self.reset();
        Ok(())
    }

    fn reset(&mut self) {
        self.state = self.start_state.clone();
    }

    fn observation(&self) -> Vec<f64> {
        let mut output = self.state.clone();
        output.push(self.reward(&self.state));
        output
    }

    fn step(&mut self, motion: &[f64]) -> Result<StepResult> {
        // Non-finite input signals a defective upstream controller; abort
        // the step rather than letting NaN spread through the state.
        if motion.len() != self.config.size {
            bail!(
                "motion vector has dimension {}, expected {}",
                motion.len(),
                self.config.size
            );
        }
        if !all_finite(motion) {
            bail!("motion vector contains non-finite values: {:?}", motion);
        }
        if !all_finite(&self.state) {
            bail!("environment state contains non-finite values: {:?}", self.state);
        }

        let motion = clamp_to_unit_norm(motion);
        let candidate: Vec<f64> = self
            .state
            .iter()
            .zip(&motion)
            .map(|(s, m)| (s + m * self.config.max_step_size).clamp(0.0, 1.0))
            .collect();

        // A collision with any obstacle rejects the whole move.
        let blocked = self
            .obstacles
            .iter()
            .flatten()
            .any(|obst| obst.collision(&candidate));
        if !blocked {
            self.state = candidate;
        }

        Ok(StepResult {
            observation: self.observation(),
            reward: self.reward(&self.state),
            performance: self.performance(&self.state),
        })
    }

    fn required_steps(&self) -> usize {
        self.required_steps
    }

    fn set_required_steps(&mut self, steps: usize) {
        self.required_steps = steps;
    }

    fn can_increase_difficulty(&self) -> bool {
        self.schedule.can_increase()
    }

    fn increase_difficulty(&mut self) {
        self.schedule.increase();
    }

    fn observation_space(&self) -> SpaceInfo {
        SpaceInfo {
            shape: vec![self.config.size + 1], // position plus reward
            space_type: SpaceType::Box,
        }
    }

    fn action_space(&self) -> SpaceInfo {
        SpaceInfo {
            shape: vec![self.config.size], // one motion component per axis
            space_type: SpaceType::Box,
        }
    }

    fn render(&self, image_size: usize) -> Vec<u8> {
        if self.config.size != 2 || self.obstacles.is_empty() || image_size == 0 {
            return Vec::new();
        }
        let mut canvas = vec![0u8; image_size * image_size];
        let scale = (image_size - 1) as f64;
        for obst in self.obstacles.iter().flatten() {
            let extents = obst.extents();
            let x0 = (obst.corner1[0] * scale).round() as i64;
            let y0 = (obst.corner1[1] * scale).round() as i64;
            let width = (extents[0] * scale).round() as i64;
            let height = (extents[1] * scale).round() as i64;
            // Obstacles may overhang the unit square; clip at the canvas.
            for y in y0.max(0)..(y0 + height).min(image_size as i64) {
                for x in x0.max(0)..(x0 + width).min(image_size as i64) {
                    canvas[y as usize * image_size + x as usize] = OBSTACLE_SHADE;
                }
            }
        }
        canvas
    }
}

impl fmt::Display for NavigationEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "NavigationEnv {} ({}-d): start {:?}, goal {:?}, {} steps",
            self.id, self.config.size, self.start_state, self.goal_state, self.required_steps
        )?;
        writeln!(f, "Obstacle locations and extents:")?;
        for obst in self.obstacles.iter().flatten() {
            writeln!(f, "  {}", obst)?;
        }
        Ok(())
    }
}
