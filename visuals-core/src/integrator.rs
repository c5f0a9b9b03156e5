//! Fixed-step Lorenz integration for a set of independent trajectories.

use crate::types::TrajectoryId;
use glam::Vec3;
use rand::Rng;

/// Constants of the Lorenz system plus the integration step.
///
/// The defaults are the classic chaotic regime.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LorenzParams {
    /// Coupling between `x` and `y` (the σ of the textbook equations).
    pub ro: f32,
    /// Rayleigh term (the ρ of the textbook equations).
    pub sigma: f32,
    pub beta: f32,
    pub dt: f32,
}

impl Default for LorenzParams {
    fn default() -> Self {
        Self {
            ro: 10.0,
            sigma: 28.0,
            beta: 8.0 / 3.0,
            dt: 0.01,
        }
    }
}

/// Advances one state by a single explicit Euler step.
///
/// ```text
/// dx = ro * (y - x) * dt
/// dy = (x * (sigma - z) - y) * dt
/// dz = (x * y - beta * z) * dt
/// ```
///
/// No stability check is made; a diverging state simply produces
/// non-finite coordinates.
#[inline]
pub fn lorenz_step(state: Vec3, params: &LorenzParams) -> Vec3 {
    let Vec3 { x, y, z } = state;
    let dx = params.ro * (y - x) * params.dt;
    let dy = (x * (params.sigma - z) - y) * params.dt;
    let dz = (x * y - params.beta * z) * params.dt;
    Vec3::new(x + dx, y + dy, z + dz)
}

/// The current state of every trajectory.
#[derive(Debug, Clone)]
pub struct TrajectorySet {
    pub states: Vec<Vec3>,
}

impl TrajectorySet {
    /// Seeds `count` trajectories near, but not at, the origin:
    /// `x ∈ [1, 2)`, `y ∈ [2, 3)`, `z ∈ [2, 3)`.
    pub fn seeded(count: usize, rng: &mut impl Rng) -> Self {
        let states = (0..count).map(|_| initial_state(rng)).collect();
        Self { states }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Replaces every state with a fresh point in `[0, 1)³`.
    pub fn reseed(&mut self, rng: &mut impl Rng) {
        for s in &mut self.states {
            *s = Vec3::new(
                rng.random::<f32>(),
                rng.random::<f32>(),
                rng.random::<f32>(),
            );
        }
    }

    /// Grows or shrinks the set; new trajectories get a fresh initial seed.
    pub fn resize(&mut self, count: usize, rng: &mut impl Rng) {
        if count < self.states.len() {
            self.states.truncate(count);
        } else {
            while self.states.len() < count {
                self.states.push(initial_state(rng));
            }
        }
    }

    /// Advances one trajectory and returns its new state.
    #[inline]
    pub fn step(&mut self, id: TrajectoryId, params: &LorenzParams) -> Vec3 {
        let next = lorenz_step(self.states[id], params);
        self.states[id] = next;
        next
    }
}

fn initial_state(rng: &mut impl Rng) -> Vec3 {
    Vec3::new(
        rng.random::<f32>() + 1.0,
        rng.random::<f32>() + 2.0,
        rng.random::<f32>() + 2.0,
    )
}
