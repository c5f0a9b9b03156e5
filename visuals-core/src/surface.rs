//! The drawing capability presets render against.
//!
//! [`Surface`] models an immediate-mode creative-coding host: it holds the
//! current fill/stroke state and transform, issues primitives, and also
//! supplies the per-frame inputs a sketch reads (time, frame counter,
//! pointer, noise, randomness). The trait keeps the presets free of any
//! concrete renderer so their physics can run against [`HeadlessSurface`].

use crate::types::Color;
use glam::{Vec2, Vec3};
use noise::{NoiseFn, Perlin};
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Projection used by a canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CanvasMode {
    /// Pixel coordinates, origin at the top-left corner.
    Flat,
    /// Perspective 3D, origin at the canvas center, driven by [`Surface::camera`].
    Perspective,
}

pub trait Surface {
    fn create_canvas(&mut self, width: f32, height: f32, mode: CanvasMode);
    fn width(&self) -> f32;
    fn height(&self) -> f32;
    /// Requests a target frame rate from the host.
    fn frame_rate(&mut self, fps: f32);

    fn background(&mut self, color: Color);
    fn fill(&mut self, color: Color);
    fn no_fill(&mut self);
    fn stroke(&mut self, color: Color);
    fn stroke_weight(&mut self, weight: f32);
    fn no_stroke(&mut self);

    fn line(&mut self, from: Vec2, to: Vec2);
    fn ellipse(&mut self, center: Vec2, width: f32, height: f32);
    fn rect(&mut self, min: Vec2, size: Vec2);
    /// Connected open polyline through `points`, using the current stroke.
    fn polyline(&mut self, points: &[Vec3]);

    fn translate(&mut self, offset: Vec2);
    fn scale(&mut self, factor: f32);
    fn camera(&mut self, eye: Vec3, center: Vec3, up: Vec3);

    /// Smooth noise in `[0, 1]`.
    fn noise(&self, x: f32, y: f32, z: f32) -> f32;
    /// Uniform random number in `[low, high)`.
    fn random(&mut self, low: f32, high: f32) -> f32;
    /// Milliseconds since the host started.
    fn millis(&self) -> f64;
    /// Number of frames drawn so far, counting the current one.
    fn frame_count(&self) -> u64;
    fn pointer(&self) -> Vec2;

    /// Wipes the persistent trail layer to `color`.
    fn layer_clear(&mut self, color: Color);
    /// Draws a segment onto the persistent trail layer (canvas pixel coordinates).
    fn layer_line(&mut self, from: Vec2, to: Vec2, color: Color);
    /// Composites the persistent trail layer onto the canvas at the origin.
    fn present_layer(&mut self);
}

/// Perlin noise remapped into `[0, 1]`.
#[derive(Clone, Debug)]
pub struct PerlinField {
    perlin: Perlin,
}

impl PerlinField {
    pub fn new(seed: u32) -> Self {
        Self {
            perlin: Perlin::new(seed),
        }
    }

    pub fn sample(&self, x: f32, y: f32, z: f32) -> f32 {
        let v = self.perlin.get([x as f64, y as f64, z as f64]);
        ((v as f32 + 1.0) * 0.5).clamp(0.0, 1.0)
    }
}

/// One primitive recorded by [`HeadlessSurface`].
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Canvas { width: f32, height: f32, mode: CanvasMode },
    Background(Color),
    Line { from: Vec2, to: Vec2, stroke: Option<Color> },
    Ellipse { center: Vec2, width: f32, height: f32, fill: Option<Color> },
    Rect { min: Vec2, size: Vec2, fill: Option<Color> },
    Polyline { points: Vec<Vec3>, stroke: Option<Color>, weight: f32 },
    Translate(Vec2),
    Scale(f32),
    Camera { eye: Vec3, center: Vec3, up: Vec3 },
    LayerClear(Color),
    LayerLine { from: Vec2, to: Vec2, color: Color },
    PresentLayer,
}

/// A [`Surface`] that renders nothing and records every primitive.
///
/// Time, frame counter and pointer are set by the caller, which makes the
/// presets fully scriptable in tests and in offline tooling.
#[derive(Debug)]
pub struct HeadlessSurface {
    pub commands: Vec<DrawCommand>,
    pub pointer: Vec2,
    pub millis: f64,
    pub frame_count: u64,
    pub target_fps: Option<f32>,
    width: f32,
    height: f32,
    fill: Option<Color>,
    stroke: Option<Color>,
    weight: f32,
    noise: PerlinField,
    rng: StdRng,
}

impl HeadlessSurface {
    pub fn new(seed: u64) -> Self {
        Self {
            commands: Vec::new(),
            pointer: Vec2::ZERO,
            millis: 0.0,
            frame_count: 0,
            target_fps: None,
            width: 100.0,
            height: 100.0,
            fill: Some(Color::WHITE),
            stroke: Some(Color::BLACK),
            weight: 1.0,
            noise: PerlinField::new(seed as u32),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Starts a new frame: bumps the frame counter, advances the clock by
    /// `dt_ms` and drops the commands recorded for the previous frame.
    pub fn begin_frame(&mut self, dt_ms: f64) {
        self.frame_count += 1;
        self.millis += dt_ms;
        self.commands.clear();
    }

    pub fn polylines(&self) -> impl Iterator<Item = &[Vec3]> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Polyline { points, .. } => Some(points.as_slice()),
            _ => None,
        })
    }

    pub fn last_camera(&self) -> Option<(Vec3, Vec3, Vec3)> {
        self.commands.iter().rev().find_map(|c| match *c {
            DrawCommand::Camera { eye, center, up } => Some((eye, center, up)),
            _ => None,
        })
    }
}

impl Surface for HeadlessSurface {
    fn create_canvas(&mut self, width: f32, height: f32, mode: CanvasMode) {
        self.width = width;
        self.height = height;
        self.commands.push(DrawCommand::Canvas { width, height, mode });
    }

    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn frame_rate(&mut self, fps: f32) {
        self.target_fps = Some(fps);
    }

    fn background(&mut self, color: Color) {
        self.commands.push(DrawCommand::Background(color));
    }

    fn fill(&mut self, color: Color) {
        self.fill = Some(color);
    }

    fn no_fill(&mut self) {
        self.fill = None;
    }

    fn stroke(&mut self, color: Color) {
        self.stroke = Some(color);
    }

    fn stroke_weight(&mut self, weight: f32) {
        self.weight = weight;
    }

    fn no_stroke(&mut self) {
        self.stroke = None;
    }

    fn line(&mut self, from: Vec2, to: Vec2) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            stroke: self.stroke,
        });
    }

    fn ellipse(&mut self, center: Vec2, width: f32, height: f32) {
        self.commands.push(DrawCommand::Ellipse {
            center,
            width,
            height,
            fill: self.fill,
        });
    }

    fn rect(&mut self, min: Vec2, size: Vec2) {
        self.commands.push(DrawCommand::Rect {
            min,
            size,
            fill: self.fill,
        });
    }

    fn polyline(&mut self, points: &[Vec3]) {
        self.commands.push(DrawCommand::Polyline {
            points: points.to_vec(),
            stroke: self.stroke,
            weight: self.weight,
        });
    }

    fn translate(&mut self, offset: Vec2) {
        self.commands.push(DrawCommand::Translate(offset));
    }

    fn scale(&mut self, factor: f32) {
        self.commands.push(DrawCommand::Scale(factor));
    }

    fn camera(&mut self, eye: Vec3, center: Vec3, up: Vec3) {
        self.commands.push(DrawCommand::Camera { eye, center, up });
    }

    fn noise(&self, x: f32, y: f32, z: f32) -> f32 {
        self.noise.sample(x, y, z)
    }

    fn random(&mut self, low: f32, high: f32) -> f32 {
        if high <= low {
            return low;
        }
        self.rng.random_range(low..high)
    }

    fn millis(&self) -> f64 {
        self.millis
    }

    fn frame_count(&self) -> u64 {
        self.frame_count
    }

    fn pointer(&self) -> Vec2 {
        self.pointer
    }

    fn layer_clear(&mut self, color: Color) {
        self.commands.push(DrawCommand::LayerClear(color));
    }

    fn layer_line(&mut self, from: Vec2, to: Vec2, color: Color) {
        self.commands.push(DrawCommand::LayerLine { from, to, color });
    }

    fn present_layer(&mut self) {
        self.commands.push(DrawCommand::PresentLayer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perlin_field_stays_in_unit_range() {
        let field = PerlinField::new(7);
        for i in 0..200 {
            let t = i as f32 * 0.173;
            let v = field.sample(t, t * 0.5, t * 0.25);
            assert!((0.0..=1.0).contains(&v), "noise out of range: {v}");
        }
    }

    #[test]
    fn perlin_field_is_deterministic_per_seed() {
        let a = PerlinField::new(3);
        let b = PerlinField::new(3);
        assert_eq!(a.sample(0.3, 1.7, 2.2), b.sample(0.3, 1.7, 2.2));
    }

    #[test]
    fn headless_records_current_paint_state() {
        let mut s = HeadlessSurface::new(1);
        s.no_fill();
        s.stroke(Color::Gray(9));
        s.stroke_weight(2.0);
        s.polyline(&[Vec3::ZERO, Vec3::ONE]);
        s.fill(Color::WHITE);
        s.ellipse(Vec2::ZERO, 4.0, 4.0);

        assert_eq!(
            s.commands[0],
            DrawCommand::Polyline {
                points: vec![Vec3::ZERO, Vec3::ONE],
                stroke: Some(Color::Gray(9)),
                weight: 2.0,
            }
        );
        assert_eq!(
            s.commands[1],
            DrawCommand::Ellipse {
                center: Vec2::ZERO,
                width: 4.0,
                height: 4.0,
                fill: Some(Color::WHITE),
            }
        );
    }

    #[test]
    fn begin_frame_advances_clock_and_clears_commands() {
        let mut s = HeadlessSurface::new(1);
        s.background(Color::BLACK);
        s.begin_frame(16.0);
        s.begin_frame(16.0);

        assert_eq!(s.frame_count(), 2);
        assert_eq!(s.millis(), 32.0);
        assert!(s.commands.is_empty());
    }

    #[test]
    fn random_respects_bounds() {
        let mut s = HeadlessSurface::new(42);
        for _ in 0..100 {
            let v = s.random(0.5, 2.0);
            assert!((0.5..2.0).contains(&v));
        }
        assert_eq!(s.random(3.0, 3.0), 3.0);
    }
}
