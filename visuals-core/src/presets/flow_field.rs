//! Particles drifting along a Perlin-noise flow field.

use crate::{
    config::{FlowFieldConfig, FlowFieldPatch},
    surface::{CanvasMode, Surface},
};
use glam::{Vec2, Vec3};
use std::f32::consts::TAU;

/// Alpha of the background rectangle painted each frame; lower values
/// leave longer streaks.
const FADE_ALPHA: u8 = 10;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    /// `x`, `y` position and `z` diameter.
    pub loc: Vec3,
    pub dir: Vec2,
    pub speed: f32,
}

impl Particle {
    /// Turns the particle along the field and moves it one step.
    pub fn advance(&mut self, angle: f32) {
        self.dir = Vec2::new(angle.cos(), angle.sin());
        let vel = self.dir * self.speed;
        self.loc.x += vel.x;
        self.loc.y += vel.y;
    }

    /// Wraps the particle to the opposite edge of a `width × height` canvas.
    ///
    /// Only the first matching edge is corrected in a single call, in the
    /// order left, right, bottom, top.
    pub fn wrap_edges(&mut self, width: f32, height: f32) {
        if self.loc.x <= 0.0 {
            self.loc.x = width;
        } else if self.loc.x >= width {
            self.loc.x = 0.0;
        } else if self.loc.y >= height {
            self.loc.y = 0.0;
        } else if self.loc.y <= 0.0 {
            self.loc.y = height;
        }
    }
}

#[derive(Debug)]
pub struct FlowField {
    cfg: FlowFieldConfig,
    particles: Vec<Particle>,
}

impl FlowField {
    pub fn new(patch: &FlowFieldPatch) -> Self {
        let cfg = FlowFieldConfig::from_patch(patch);
        Self {
            particles: Vec::with_capacity(cfg.particle_count),
            cfg,
        }
    }

    pub fn config(&self) -> &FlowFieldConfig {
        &self.cfg
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Creates the canvas and scatters the particles.
    ///
    /// Particles are spawned up to 20% past the right edge; the first
    /// frame wraps them back in.
    pub fn setup(&mut self, surface: &mut impl Surface) {
        surface.create_canvas(self.cfg.width, self.cfg.height, CanvasMode::Flat);
        surface.no_stroke();

        self.particles.clear();
        for _ in 0..self.cfg.particle_count {
            let loc = Vec3::new(
                surface.random(0.0, self.cfg.width * 1.2),
                surface.random(0.0, self.cfg.height),
                2.0,
            );
            let speed = surface.random(0.5, 2.0);
            self.particles.push(Particle {
                loc,
                dir: Vec2::X,
                speed,
            });
        }
        tracing::debug!(particles = self.particles.len(), "flow field setup");
    }

    pub fn draw(&mut self, surface: &mut impl Surface) {
        surface.fill(self.cfg.background_color.with_alpha(FADE_ALPHA));
        surface.no_stroke();
        surface.rect(Vec2::ZERO, Vec2::new(self.cfg.width, self.cfg.height));

        let t = surface.frame_count() as f32 / self.cfg.noise_scale;
        let (width, height) = (surface.width(), surface.height());

        for particle in &mut self.particles {
            let n = surface.noise(
                particle.loc.x / self.cfg.noise_scale,
                particle.loc.y / self.cfg.noise_scale,
                t,
            );
            particle.advance(n * TAU * self.cfg.noise_strength);
            particle.wrap_edges(width, height);

            surface.fill(self.cfg.line_color);
            let d = particle.loc.z * self.cfg.scale;
            surface.ellipse(Vec2::new(particle.loc.x, particle.loc.y), d, d);
        }
    }
}
