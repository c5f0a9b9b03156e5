//! Double pendulum with a fading trail of the lower bob.

use crate::{
    config::{PendulumConfig, PendulumPatch},
    surface::{CanvasMode, Surface},
};
use glam::Vec2;
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::f32::consts::FRAC_PI_2;

/// Host time after which the pendulum restarts from rest.
pub const RESET_INTERVAL_MS: f64 = 15_000.0;
const BOB_DIAMETER: f32 = 20.0;
const TRAIL_ALPHA: u8 = 50;

/// Angles, angular velocities and accelerations of both arms.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PendulumState {
    pub a1: f32,
    pub a2: f32,
    pub a1_v: f32,
    pub a2_v: f32,
    pub a1_a: f32,
    pub a2_a: f32,
}

/// Arm lengths, bob masses and gravity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PendulumBody {
    pub l1: f32,
    pub l2: f32,
    pub m1: f32,
    pub m2: f32,
    pub g: f32,
}

impl PendulumBody {
    pub fn from_config(cfg: &PendulumConfig) -> Self {
        Self {
            l1: cfg.height / 4.0,
            l2: cfg.height / 4.0,
            m1: cfg.scale,
            m2: cfg.scale,
            g: cfg.gravity_force,
        }
    }

    /// Angular accelerations of both arms for the given state.
    pub fn accelerations(&self, s: &PendulumState) -> (f32, f32) {
        let Self { l1, l2, m1, m2, g } = *self;
        let (a1, a2, v1, v2) = (s.a1, s.a2, s.a1_v, s.a2_v);
        let den = 2.0 * m1 + m2 - m2 * (2.0 * a1 - 2.0 * a2).cos();

        let a1_a = (-g * (2.0 * m1 + m2) * a1.sin()
            - m2 * g * (a1 - 2.0 * a2).sin()
            - 2.0 * (a1 - a2).sin() * m2 * v2 * v2 * l2
            + v1 * v1 * l1 * (a1 - a2).cos())
            / (l1 * den);

        let a2_num = v1 * v1 * l1 * (m1 + m2)
            + g * (m1 + m2) * a1.cos()
            + v2 * v2 * l2 * m2 * (a1 - a2).cos();
        let a2_a = (2.0 * (a1 - a2).sin() * a2_num)
            / (l2 * (m1 + m2 - m2 * (2.0 * a1 - 2.0 * a2).cos()));

        (a1_a, a2_a)
    }

    /// Bob positions relative to the pivot (y grows downwards).
    pub fn bob_positions(&self, s: &PendulumState) -> (Vec2, Vec2) {
        let p1 = Vec2::new(self.l1 * s.a1.sin(), self.l1 * s.a1.cos());
        let p2 = p1 + Vec2::new(self.l2 * s.a2.sin(), self.l2 * s.a2.cos());
        (p1, p2)
    }
}

#[derive(Debug)]
pub struct DoublePendulum {
    cfg: PendulumConfig,
    body: PendulumBody,
    state: PendulumState,
    prev_bob: Option<Vec2>,
    start_ms: f64,
    rng: StdRng,
}

impl DoublePendulum {
    pub fn new(patch: &PendulumPatch) -> Self {
        Self::with_rng(patch, StdRng::from_rng(&mut rand::rng()))
    }

    pub fn with_seed(patch: &PendulumPatch, seed: u64) -> Self {
        Self::with_rng(patch, StdRng::seed_from_u64(seed))
    }

    fn with_rng(patch: &PendulumPatch, rng: StdRng) -> Self {
        let cfg = PendulumConfig::from_patch(patch);
        Self {
            body: PendulumBody::from_config(&cfg),
            cfg,
            state: PendulumState::default(),
            prev_bob: None,
            start_ms: 0.0,
            rng,
        }
    }

    pub fn config(&self) -> &PendulumConfig {
        &self.cfg
    }

    pub fn state(&self) -> &PendulumState {
        &self.state
    }

    pub fn setup(&mut self, surface: &mut impl Surface) {
        surface.create_canvas(self.cfg.width, self.cfg.height, CanvasMode::Flat);
        surface.layer_clear(self.cfg.background_color);
        self.state = PendulumState {
            a1: FRAC_PI_2,
            a2: FRAC_PI_2,
            ..Default::default()
        };
        self.start_ms = surface.millis();
        surface.frame_rate(60.0);
    }

    pub fn draw(&mut self, surface: &mut impl Surface) {
        let elapsed = surface.millis() - self.start_ms;

        surface.present_layer();

        let (a1_a, a2_a) = self.body.accelerations(&self.state);
        self.state.a1_a = a1_a;
        self.state.a2_a = a2_a;

        let (p1, p2) = self.body.bob_positions(&self.state);
        let pivot = Vec2::new(surface.width() / 2.0, surface.height() / 4.0);

        surface.translate(pivot);
        surface.fill(self.cfg.line_color);
        surface.stroke(self.cfg.line_color);
        surface.ellipse(p1, BOB_DIAMETER, BOB_DIAMETER);
        surface.line(Vec2::ZERO, p1);
        surface.ellipse(p2, BOB_DIAMETER, BOB_DIAMETER);
        surface.line(p1, p2);

        if surface.frame_count() > 1
            && let Some(prev) = self.prev_bob
        {
            surface.layer_line(
                prev + pivot,
                p2 + pivot,
                self.cfg.line_color.with_alpha(TRAIL_ALPHA),
            );
        }
        self.prev_bob = Some(p2);

        self.state.a1_v += self.state.a1_a;
        self.state.a2_v += self.state.a2_a;
        self.state.a1 += self.state.a1_v;
        self.state.a2 += self.state.a2_v;

        if elapsed > RESET_INTERVAL_MS {
            self.restart(surface);
        }
    }

    fn restart(&mut self, surface: &mut impl Surface) {
        self.state = PendulumState {
            a1: FRAC_PI_2 + self.rng.random::<f32>() * 0.1,
            a2: FRAC_PI_2,
            ..Default::default()
        };
        self.prev_bob = None;
        surface.layer_clear(self.cfg.background_color);
        self.start_ms = surface.millis();
        tracing::debug!(a1 = self.state.a1, "pendulum restarted");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawCommand, HeadlessSurface};

    fn body() -> PendulumBody {
        PendulumBody::from_config(&PendulumConfig::default())
    }

    #[test]
    fn body_follows_config() {
        let b = body();
        assert_eq!(b.l1, 150.0);
        assert_eq!(b.l2, 150.0);
        assert_eq!(b.m1, 8.0);
        assert_eq!(b.g, 1.0);
    }

    #[test]
    fn hanging_at_rest_has_no_acceleration() {
        let (a1, a2) = body().accelerations(&PendulumState::default());
        assert!(a1.abs() < 1e-6 && a2.abs() < 1e-6);
    }

    #[test]
    fn horizontal_start_falls_back_toward_rest() {
        let s = PendulumState {
            a1: FRAC_PI_2,
            a2: FRAC_PI_2,
            ..Default::default()
        };
        let (a1, _) = body().accelerations(&s);
        assert!(a1 < 0.0, "upper arm should swing back, got {a1}");
    }

    #[test]
    fn gravity_force_scales_acceleration() {
        let heavy = PendulumBody::from_config(&PendulumConfig::from_patch(&PendulumPatch {
            gravity_force: Some(2.0),
            ..Default::default()
        }));
        assert_eq!(heavy.g, 2.0);

        let s = PendulumState {
            a1: FRAC_PI_2,
            a2: FRAC_PI_2,
            ..Default::default()
        };
        let (base, _) = body().accelerations(&s);
        let (doubled, _) = heavy.accelerations(&s);
        assert!((doubled - 2.0 * base).abs() < 1e-6, "{doubled} vs {base}");

        // The running preset integrates with the patched gravity too.
        let mut p = DoublePendulum::with_seed(
            &PendulumPatch {
                gravity_force: Some(2.0),
                ..Default::default()
            },
            1,
        );
        let mut surface = HeadlessSurface::new(1);
        p.setup(&mut surface);
        surface.begin_frame(16.0);
        p.draw(&mut surface);
        assert!((p.state().a1_a - doubled).abs() < 1e-6);
    }

    #[test]
    fn bob_positions_stack_arms() {
        let b = body();
        let s = PendulumState {
            a1: FRAC_PI_2,
            a2: 0.0,
            ..Default::default()
        };
        let (p1, p2) = b.bob_positions(&s);
        assert!((p1 - Vec2::new(150.0, 0.0)).length() < 1e-3);
        assert!((p2 - Vec2::new(150.0, 150.0)).length() < 1e-3);
    }

    #[test]
    fn setup_starts_horizontal_at_sixty_fps() {
        let mut p = DoublePendulum::with_seed(&PendulumPatch::default(), 1);
        let mut surface = HeadlessSurface::new(1);
        p.setup(&mut surface);

        assert_eq!(p.state().a1, FRAC_PI_2);
        assert_eq!(p.state().a2, FRAC_PI_2);
        assert_eq!(surface.target_fps, Some(60.0));
        assert!(
            surface
                .commands
                .contains(&DrawCommand::LayerClear(PendulumConfig::default().background_color))
        );
    }

    #[test]
    fn trail_starts_on_second_frame() {
        let mut p = DoublePendulum::with_seed(&PendulumPatch::default(), 1);
        let mut surface = HeadlessSurface::new(1);
        p.setup(&mut surface);

        surface.begin_frame(16.0);
        p.draw(&mut surface);
        let first_has_trail = surface
            .commands
            .iter()
            .any(|c| matches!(c, DrawCommand::LayerLine { .. }));
        assert!(!first_has_trail);

        surface.begin_frame(16.0);
        p.draw(&mut surface);
        let trail: Vec<_> = surface
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::LayerLine { color, .. } => Some(*color),
                _ => None,
            })
            .collect();
        assert_eq!(trail, vec![crate::types::Color::Rgba([0, 0, 0, 50])]);
    }

    #[test]
    fn draw_integrates_state() {
        let mut p = DoublePendulum::with_seed(&PendulumPatch::default(), 1);
        let mut surface = HeadlessSurface::new(1);
        p.setup(&mut surface);
        surface.begin_frame(16.0);
        p.draw(&mut surface);

        let s = *p.state();
        assert_eq!(s.a1_v, s.a1_a);
        assert_eq!(s.a1, FRAC_PI_2 + s.a1_v);
        assert_eq!(s.a2, FRAC_PI_2 + s.a2_v);
    }

    #[test]
    fn restarts_after_interval() {
        let mut p = DoublePendulum::with_seed(&PendulumPatch::default(), 3);
        let mut surface = HeadlessSurface::new(3);
        p.setup(&mut surface);

        for _ in 0..20 {
            surface.begin_frame(100.0);
            p.draw(&mut surface);
        }
        assert!(p.state().a1_v != 0.0);

        surface.begin_frame(RESET_INTERVAL_MS);
        p.draw(&mut surface);

        let s = *p.state();
        assert!((FRAC_PI_2..FRAC_PI_2 + 0.1).contains(&s.a1));
        assert_eq!(s.a2, FRAC_PI_2);
        assert_eq!(s.a1_v, 0.0);
        assert_eq!(s.a2_v, 0.0);
        assert!(p.prev_bob.is_none());
        assert!(surface.commands.iter().any(|c| matches!(c, DrawCommand::LayerClear(_))));

        // The frame after a restart draws no trail segment.
        surface.begin_frame(16.0);
        p.draw(&mut surface);
        assert!(!surface.commands.iter().any(|c| matches!(c, DrawCommand::LayerLine { .. })));
    }
}
