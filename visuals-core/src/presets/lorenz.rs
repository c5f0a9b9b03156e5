//! Lorenz-attractor particle trails.
//!
//! Each frame runs three steps in order:
//! 1. [`TrajectorySet::step`] advances every trajectory by one Euler step.
//! 2. [`TrailBuffer::append`] records the new point and evicts old ones.
//! 3. The camera is placed (orbit or pointer) and every trail with at least
//!    two points is stroked as a polyline.

use crate::{
    camera::{CameraPose, OrbitCamera, pointer_pose},
    config::{LorenzConfig, LorenzPatch},
    integrator::{LorenzParams, TrajectorySet},
    surface::{CanvasMode, Surface},
    trail::TrailBuffer,
    types::TrajectoryId,
};
use glam::{Vec2, Vec3};
use rand::{SeedableRng, rngs::StdRng};

/// Trail length forced when a single trajectory is simulated.
pub const SINGLE_TRAJECTORY_PATH_LENGTH: usize = 5000;

/// Read-only view of a [`LorenzSystem`] returned by [`LorenzSystem::state`].
#[derive(Clone, Debug, PartialEq)]
pub struct LorenzSnapshot {
    pub config: LorenzConfig,
    pub point_count: usize,
    /// Newest trail point per trajectory; `None` before the first frame.
    pub current_position: Vec<Option<Vec3>>,
}

#[derive(Debug)]
pub struct LorenzSystem {
    cfg: LorenzConfig,
    params: LorenzParams,
    trajectories: TrajectorySet,
    trails: Vec<TrailBuffer>,
    orbit: OrbitCamera,
    rng: StdRng,
}

impl LorenzSystem {
    /// Creates a preset with `patch` merged over the defaults and a
    /// randomly seeded generator.
    pub fn new(patch: &LorenzPatch) -> Self {
        Self::with_rng(patch, StdRng::from_rng(&mut rand::rng()))
    }

    /// Same as [`LorenzSystem::new`] with a reproducible seed.
    pub fn with_seed(patch: &LorenzPatch, seed: u64) -> Self {
        Self::with_rng(patch, StdRng::seed_from_u64(seed))
    }

    fn with_rng(patch: &LorenzPatch, mut rng: StdRng) -> Self {
        let cfg = LorenzConfig::from_patch(patch);
        let trajectories = TrajectorySet::seeded(cfg.point_count, &mut rng);
        let trails = vec![TrailBuffer::new(); cfg.point_count];

        Self {
            cfg,
            params: LorenzParams::default(),
            trajectories,
            trails,
            orbit: OrbitCamera::default(),
            rng,
        }
    }

    pub fn config(&self) -> &LorenzConfig {
        &self.cfg
    }

    pub fn trail(&self, id: TrajectoryId) -> Option<&TrailBuffer> {
        self.trails.get(id)
    }

    pub fn setup(&mut self, surface: &mut impl Surface) {
        surface.create_canvas(self.cfg.width, self.cfg.height, CanvasMode::Perspective);
        if self.cfg.point_count == 1 {
            self.cfg.path_length = SINGLE_TRAJECTORY_PATH_LENGTH;
        }
        tracing::debug!(
            point_count = self.cfg.point_count,
            path_length = self.cfg.path_length,
            "lorenz setup"
        );
    }

    /// Advances the simulation by one frame and renders it.
    pub fn draw(&mut self, surface: &mut impl Surface) {
        surface.background(self.cfg.background_color);

        self.step_trajectories();

        let pose = self.camera_pose(&*surface);
        surface.camera(pose.eye, pose.center, pose.up);

        surface.scale(self.cfg.scale);
        surface.no_fill();

        for trail in &mut self.trails {
            // A single point has nothing to connect.
            if trail.len() < 2 {
                continue;
            }
            surface.stroke_weight(1.0);
            surface.stroke(self.cfg.line_color);
            surface.no_fill();
            surface.polyline(trail.make_contiguous());
        }
    }

    /// Shallow-merges `patch` into the live configuration.
    ///
    /// Existing trails are not reallocated; a lower `path_length` trims
    /// them on their next append. A different `point_count` grows or
    /// shrinks the trajectory set, seeding any new trajectories.
    pub fn update_config(&mut self, patch: &LorenzPatch) {
        self.cfg.apply(patch);
        if self.cfg.point_count != self.trajectories.len() {
            self.trajectories.resize(self.cfg.point_count, &mut self.rng);
            self.trails.resize(self.cfg.point_count, TrailBuffer::new());
        }
        tracing::debug!(?patch, "lorenz config updated");
    }

    pub fn state(&self) -> LorenzSnapshot {
        LorenzSnapshot {
            config: self.cfg.clone(),
            point_count: self.trails.len(),
            current_position: self.trails.iter().map(TrailBuffer::last).collect(),
        }
    }

    /// Reseeds every trajectory and empties every trail.
    pub fn reset(&mut self) {
        self.trajectories.reseed(&mut self.rng);
        for trail in &mut self.trails {
            trail.clear();
        }
        tracing::debug!(point_count = self.trails.len(), "lorenz reset");
    }

    fn step_trajectories(&mut self) {
        for (id, trail) in self.trails.iter_mut().enumerate() {
            let next = self.trajectories.step(id, &self.params);
            trail.append(next, self.cfg.path_length);
        }
    }

    fn camera_pose(&mut self, surface: &impl Surface) -> CameraPose {
        if self.cfg.auto_rotate {
            self.orbit
                .advance(self.cfg.rotation_sensitivity, surface.height())
        } else {
            pointer_pose(
                surface.pointer(),
                Vec2::new(surface.width(), surface.height()),
                self.cfg.rotation_sensitivity,
            )
        }
    }
}
