//! Approximate shortest-path estimation through obstructed space
//!
//! The estimator discretizes the unit hypercube into a uniform grid and runs
//! a bidirectional breadth-first search: one frontier grows from the cell
//! nearest the start state, one from the cell nearest the goal state, and the
//! two expand alternately until they meet. The result is the exact shortest
//! taxicab distance between the two seed cells under grid adjacency, which is
//! an upper bound on the true Euclidean shortest path. That bound is used
//! consistently for two jobs: validating obstacle placements (did this
//! obstacle actually lengthen the path, and is the goal still reachable?) and
//! sizing the episode step budget.
//!
//! The grid is materialized densely: `granularity^N` cells. This is only
//! tractable for small dimensionality (roughly N <= 5 at the default step
//! size); larger spaces would need a sparse or sampling-based estimator.

use crate::env::obstacle::Obstacle;
use crate::utils::vecmath::euclidean_distance;

/// Row-major indexer for a uniform grid with `granularity` cells per axis
///
/// Maps between per-dimension coordinate indices and a flat scalar index,
/// with dimension 0 most significant.
#[derive(Debug, Clone)]
pub struct GridIndexer {
    granularity: usize,
    /// Flat-index stride per dimension: `granularity^(size - d - 1)`
    offsets: Vec<usize>,
    point_count: usize,
}

impl GridIndexer {
    /// Create an indexer for a `size`-dimensional grid
    pub fn new(size: usize, granularity: usize) -> Self {
        let offsets = (0..size)
            .map(|d| granularity.pow((size - d - 1) as u32))
            .collect();
        Self {
            granularity,
            offsets,
            point_count: granularity.pow(size as u32),
        }
    }

    /// Total number of grid cells (`granularity^size`)
    pub fn point_count(&self) -> usize {
        self.point_count
    }

    /// Flatten per-dimension indices into a scalar index
    pub fn flatten(&self, indices: &[usize]) -> usize {
        indices
            .iter()
            .zip(&self.offsets)
            .map(|(i, o)| i * o)
            .sum()
    }

    /// Recover per-dimension indices from a scalar index
    pub fn coords(&self, index: usize) -> Vec<usize> {
        self.offsets.iter().map(|o| (index / o) % self.granularity).collect()
    }
}

/// A discretized grid cell on a search frontier
#[derive(Debug, Clone)]
struct GridPoint {
    /// One coordinate index per dimension
    indices: Vec<usize>,
    /// Flattened scalar index into the dense cell arrays
    index: usize,
}

/// Estimate the shortest path length from `start` to `goal`
///
/// With no obstacle slots at all the direct Euclidean distance is returned
/// (an exact lower bound, no search needed). Otherwise the grid search runs
/// over every placed obstacle; slots still `None` mid-placement occlude
/// nothing. Returns `None` when no grid path connects the two states, which
/// placement treats as a rejection signal.
///
/// The returned estimate is deterministic for a given obstacle configuration
/// and never decreases when obstacles are added or enlarged.
pub fn shortest_path(
    start: &[f64],
    goal: &[f64],
    obstacles: &[Option<Obstacle>],
    max_step_size: f64,
) -> Option<f64> {
    let size = start.len();
    if obstacles.is_empty() {
        return Some(euclidean_distance(start, goal));
    }

    // Grid spacing approximates the agent's per-step motion capability.
    let granularity = (1.0 / max_step_size).ceil() as usize + 1;
    let spacing = 1.0 / (granularity - 1) as f64;
    let grid = GridIndexer::new(size, granularity);
    let point_count = grid.point_count();

    // Mark every cell whose representative grid point lies inside an obstacle.
    let mut occluded = vec![false; point_count];
    let mut counts = vec![0usize; size];
    let mut point = vec![0.0; size];
    for cell in occluded.iter_mut() {
        for (p, c) in point.iter_mut().zip(&counts) {
            *p = *c as f64 * spacing;
        }
        *cell = obstacles
            .iter()
            .flatten()
            .any(|obst| obst.collision(&point));
        // Odometer advance, last dimension fastest.
        for d in (0..size).rev() {
            counts[d] += 1;
            if counts[d] < granularity {
                break;
            }
            counts[d] = 0;
        }
    }

    let seed = |state: &[f64]| {
        let indices: Vec<usize> = state
            .iter()
            .map(|s| ((s * granularity as f64).floor() as usize).min(granularity - 1))
            .collect();
        let index = grid.flatten(&indices);
        GridPoint { indices, index }
    };

    // Two covered bitsets and two frontiers, rooted at the cells nearest the
    // start and goal states.
    let mut start_covered = vec![false; point_count];
    let mut goal_covered = vec![false; point_count];
    let root = seed(start);
    start_covered[root.index] = true;
    let mut start_front = vec![root];
    let root = seed(goal);
    goal_covered[root.index] = true;
    let mut goal_front = vec![root];

    let mut start_next: Vec<GridPoint> = Vec::new();
    let mut goal_next: Vec<GridPoint> = Vec::new();
    let mut length = 1usize;

    loop {
        // Expand the start frontier by one grid step; meeting a cell already
        // covered by the goal frontier completes the path.
        for p in &start_front {
            for d in 0..size {
                for offset in [-1i64, 1] {
                    let new_coord = p.indices[d] as i64 + offset;
                    if new_coord < 0 || new_coord >= granularity as i64 {
                        continue;
                    }
                    let neighbour = (p.index as i64 + offset * grid.offsets[d] as i64) as usize;
                    if occluded[neighbour] {
                        continue;
                    }
                    if goal_covered[neighbour] {
                        return Some(length as f64 * spacing);
                    }
                    if !start_covered[neighbour] {
                        start_covered[neighbour] = true;
                        let mut indices = p.indices.clone();
                        indices[d] = new_coord as usize;
                        start_next.push(GridPoint { indices, index: neighbour });
                    }
                }
            }
        }
        length += 1;

        // Expand the goal frontier, checking against start coverage.
        for p in &goal_front {
            for d in 0..size {
                for offset in [-1i64, 1] {
                    let new_coord = p.indices[d] as i64 + offset;
                    if new_coord < 0 || new_coord >= granularity as i64 {
                        continue;
                    }
                    let neighbour = (p.index as i64 + offset * grid.offsets[d] as i64) as usize;
                    if occluded[neighbour] {
                        continue;
                    }
                    if start_covered[neighbour] {
                        return Some(length as f64 * spacing);
                    }
                    if !goal_covered[neighbour] {
                        goal_covered[neighbour] = true;
                        let mut indices = p.indices.clone();
                        indices[d] = new_coord as usize;
                        goal_next.push(GridPoint { indices, index: neighbour });
                    }
                }
            }
        }
        length += 1;

        std::mem::swap(&mut start_front, &mut start_next);
        start_next.clear();
        std::mem::swap(&mut goal_front, &mut goal_next);
        goal_next.clear();

        // A frontier that cannot grow is fully enclosed by obstacles and/or
        // the space boundary: the states are disconnected.
        if start_front.is_empty() || goal_front.is_empty() {
            return None;
        }
    }
}
