//! Axis-aligned hyper-rectangular obstacles
//!
//! An obstacle is a thin slab: full `obst_size` edge length along every axis
//! except one randomly chosen axis, which is squeezed to just over one step
//! width. That makes it a wall the agent cannot tunnel through in a single
//! step, rather than a solid block.

use std::fmt;

use rand::Rng;

/// An axis-aligned hyper-rectangle blocking agent movement
///
/// Defined by two opposite corners with `corner1[d] <= corner2[d]` in every
/// dimension. Corners may extend slightly outside the `[0,1]^N` unit cube.
/// Immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    /// Lower corner, one coordinate per dimension
    pub corner1: Vec<f64>,
    /// Upper corner, `corner1 + extents`
    pub corner2: Vec<f64>,
}

impl Obstacle {
    /// Create an obstacle at a uniformly random position
    ///
    /// Edge length is `obst_size` in all dimensions except one randomly
    /// chosen axis, which is forced to `max_step_size * 1.01` so the slab is
    /// wider than a single agent step. The lower corner is placed so the
    /// obstacle can span the full `[0,1]` range in some position:
    /// each coordinate is uniform in `[-obst_size/2, 1 - obst_size/2]`.
    pub fn random<R: Rng>(size: usize, obst_size: f64, max_step_size: f64, rng: &mut R) -> Self {
        let mut dims = vec![obst_size; size];
        // Squeeze one axis so the obstacle is a line/plane.
        dims[rng.gen_range(0..size)] = max_step_size * 1.01;

        let mut corner1 = vec![0.0; size];
        for c in corner1.iter_mut() {
            let start = -obst_size / 2.0;
            let end = 1.0 - obst_size / 2.0;
            *c = rng.gen_range(start..end);
        }
        let corner2 = corner1.iter().zip(&dims).map(|(c, d)| c + d).collect();

        Self { corner1, corner2 }
    }

    /// True iff `point` lies inside the obstacle, inclusive on both bounds
    pub fn collision(&self, point: &[f64]) -> bool {
        point
            .iter()
            .zip(self.corner1.iter().zip(&self.corner2))
            .all(|(p, (c1, c2))| *p >= *c1 && *p <= *c2)
    }

    /// Edge lengths of the obstacle per dimension (`corner2 - corner1`)
    pub fn extents(&self) -> Vec<f64> {
        self.corner2
            .iter()
            .zip(&self.corner1)
            .map(|(c2, c1)| c2 - c1)
            .collect()
    }
}

impl fmt::Display for Obstacle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} -> {:?} ({:?})",
            self.corner1,
            self.corner2,
            self.extents()
        )
    }
}
