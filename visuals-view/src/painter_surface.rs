//! [`Surface`] implementation on top of an [`egui::Painter`].
//!
//! A [`PainterSurface`] lives for a single frame. Everything that has to
//! outlive the frame (canvas size, noise, randomness, the trail layer, the
//! requested frame rate) is kept in [`HostState`], owned by the viewer.

use glam::{Mat4, Vec2, Vec3};
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::f32::consts::PI;
use visuals_core::{
    camera::default_eye_depth,
    surface::{CanvasMode, PerlinField, Surface},
    types::Color,
};

/// Converts a preset [`Color`] into an unmultiplied [`egui::Color32`].
pub fn color32(c: Color) -> egui::Color32 {
    let [r, g, b, a] = c.to_rgba();
    egui::Color32::from_rgba_unmultiplied(r, g, b, a)
}

/// Offscreen trail layer, stored as the segments drawn since the last clear.
///
/// ### Fields
/// - `background` - Fill color from the last `layer_clear`, or `None` if the
///   layer was never cleared.
/// - `segments` - `(from, to, color)` segments in canvas pixels, oldest first.
#[derive(Debug, Default)]
pub struct TrailLayer {
    pub background: Option<Color>,
    pub segments: Vec<(Vec2, Vec2, Color)>,
}

/// Host-side state that persists across frames.
///
/// A preset only sees this through a [`PainterSurface`], which is rebuilt
/// every frame; anything a preset sets up once in `setup` lives here.
///
/// ### Fields
/// - `canvas` - Canvas size in pixels, as last requested by `create_canvas`.
/// - `mode` - Whether drawing is flat 2D or goes through a perspective camera.
/// - `target_fps` - Frame rate requested by the preset, if any.
/// - `layer` - Persistent trail layer (used by the double pendulum).
/// - `noise` - Perlin field sampled by `Surface::noise`.
/// - `rng` - Source for `Surface::random`.
#[derive(Debug)]
pub struct HostState {
    pub canvas: Vec2,
    pub mode: CanvasMode,
    pub target_fps: Option<f32>,
    pub layer: TrailLayer,
    noise: PerlinField,
    rng: StdRng,
}

impl HostState {
    /// Creates host state with an 800×600 flat canvas and fresh random seeds
    /// for noise and `random`.
    ///
    /// ### Returns
    /// A new [`HostState`] with no frame-rate request and an empty trail layer.
    pub fn new() -> Self {
        let mut seed_rng = rand::rng();
        Self {
            canvas: Vec2::new(800.0, 600.0),
            mode: CanvasMode::Flat,
            target_fps: None,
            layer: TrailLayer::default(),
            noise: PerlinField::new(seed_rng.random()),
            rng: StdRng::from_rng(&mut seed_rng),
        }
    }

    /// Drops everything a previous preset left behind.
    ///
    /// Canvas size, mode, frame-rate request and trail layer go back to their
    /// initial values. The noise field and random source are kept.
    pub fn reset(&mut self) {
        self.canvas = Vec2::new(800.0, 600.0);
        self.mode = CanvasMode::Flat;
        self.target_fps = None;
        self.layer = TrailLayer::default();
    }
}

impl Default for HostState {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-frame inputs read by the presets.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameInputs {
    /// Host time in milliseconds.
    pub millis: f64,
    /// Frames drawn since the preset's setup; 1 on the first `draw`.
    pub frame_count: u64,
    /// Pointer position in canvas pixels.
    pub pointer: Vec2,
}

/// Maps preset coordinates to screen positions.
///
/// ### Fields
/// - `canvas_rect` - Screen rectangle the canvas occupies.
/// - `mode` - Flat canvases map pixels directly; perspective canvases go
///   through `view_proj`.
/// - `view_proj` - Projection times view matrix of the current camera.
/// - `model` - Accumulated `translate` / `scale` transform.
#[derive(Clone, Copy, Debug)]
pub struct Projection {
    pub canvas_rect: egui::Rect,
    pub mode: CanvasMode,
    pub view_proj: Mat4,
    pub model: Mat4,
}

impl Projection {
    /// Creates a projection for a canvas placed at `canvas_rect`.
    ///
    /// The default camera sits on the +z axis at [`default_eye_depth`] and
    /// looks at the origin, so the `z = 0` plane maps one pixel per unit
    /// around the canvas center.
    ///
    /// ### Parameters
    /// - `canvas_rect` - Screen rectangle of the canvas.
    /// - `mode` - Flat or perspective drawing.
    ///
    /// ### Returns
    /// A projection with an identity model transform.
    pub fn new(canvas_rect: egui::Rect, mode: CanvasMode) -> Self {
        let size = Vec2::new(canvas_rect.width(), canvas_rect.height());
        let depth = default_eye_depth(size.y);
        let view_proj = perspective(size, depth)
            * Mat4::look_at_rh(Vec3::new(0.0, 0.0, depth), Vec3::ZERO, Vec3::Y);

        Self {
            canvas_rect,
            mode,
            view_proj,
            model: Mat4::IDENTITY,
        }
    }

    /// Replaces the view with a camera at `eye` looking at `center`.
    ///
    /// The perspective part (60° vertical field of view, canvas aspect) is
    /// rebuilt from the canvas size. Only used in perspective mode.
    ///
    /// ### Parameters
    /// - `eye` - Camera position in preset coordinates.
    /// - `center` - Point the camera looks at.
    /// - `up` - Up direction of the camera.
    pub fn set_camera(&mut self, eye: Vec3, center: Vec3, up: Vec3) {
        let size = Vec2::new(self.canvas_rect.width(), self.canvas_rect.height());
        self.view_proj =
            perspective(size, default_eye_depth(size.y)) * Mat4::look_at_rh(eye, center, up);
    }

    /// Screen position of `p`, or `None` when it sits behind the camera.
    pub fn to_screen(&self, p: Vec3) -> Option<egui::Pos2> {
        match self.mode {
            CanvasMode::Flat => {
                let q = self.model.transform_point3(p);
                Some(self.canvas_rect.min + egui::vec2(q.x, q.y))
            }
            CanvasMode::Perspective => {
                let clip = self.view_proj * self.model * p.extend(1.0);
                if clip.w <= f32::EPSILON {
                    return None;
                }
                let ndc = clip.truncate() / clip.w;
                let c = self.canvas_rect.center();
                // y grows downwards, like the canvas.
                Some(egui::pos2(
                    c.x + ndc.x * self.canvas_rect.width() * 0.5,
                    c.y + ndc.y * self.canvas_rect.height() * 0.5,
                ))
            }
        }
    }

    /// Projects `points` and splits them wherever a point lands behind the
    /// camera, so no segment is drawn across the gap.
    ///
    /// ### Parameters
    /// - `points` - Polyline vertices in preset coordinates.
    ///
    /// ### Returns
    /// The visible runs in order. Runs shorter than two points are dropped.
    pub fn screen_runs(&self, points: &[Vec3]) -> Vec<Vec<egui::Pos2>> {
        let mut runs = Vec::new();
        let mut current = Vec::new();
        for &p in points {
            match self.to_screen(p) {
                Some(q) => current.push(q),
                None => {
                    if current.len() >= 2 {
                        runs.push(std::mem::take(&mut current));
                    } else {
                        current.clear();
                    }
                }
            }
        }
        if current.len() >= 2 {
            runs.push(current);
        }
        runs
    }

    /// Uniform scale currently applied by the model transform.
    fn model_scale(&self) -> f32 {
        self.model.x_axis.truncate().length()
    }
}

fn perspective(size: Vec2, depth: f32) -> Mat4 {
    Mat4::perspective_rh_gl(PI / 3.0, size.x / size.y, depth / 10.0, depth * 10.0)
}

/// A [`Surface`] that draws straight into an [`egui::Painter`] for one frame.
///
/// Fill, stroke and transforms start from their defaults every frame, the
/// same way they reset between draw calls of a canvas library.
pub struct PainterSurface<'a> {
    painter: &'a egui::Painter,
    host: &'a mut HostState,
    inputs: FrameInputs,
    projection: Projection,
    fill: Option<Color>,
    stroke: Option<Color>,
    weight: f32,
}

impl<'a> PainterSurface<'a> {
    /// Creates the surface for one `setup` or `draw` call.
    ///
    /// ### Parameters
    /// - `painter` - Painter, already clipped to the canvas.
    /// - `canvas_rect` - Screen rectangle of the canvas. Should match
    ///   `host.canvas`, centered in the panel.
    /// - `host` - State that outlives the frame.
    /// - `inputs` - Time, frame counter and pointer for this frame.
    ///
    /// ### Returns
    /// A surface with white fill, black stroke of weight 1 and no transform.
    pub fn new(
        painter: &'a egui::Painter,
        canvas_rect: egui::Rect,
        host: &'a mut HostState,
        inputs: FrameInputs,
    ) -> Self {
        let projection = Projection::new(canvas_rect, host.mode);
        Self {
            painter,
            host,
            inputs,
            projection,
            fill: Some(Color::WHITE),
            stroke: Some(Color::BLACK),
            weight: 1.0,
        }
    }

    /// Canvas pixel to screen position, ignoring the model transform.
    fn canvas_point(&self, p: Vec2) -> egui::Pos2 {
        self.projection.canvas_rect.min + egui::vec2(p.x, p.y)
    }
}

impl Surface for PainterSurface<'_> {
    fn create_canvas(&mut self, width: f32, height: f32, mode: CanvasMode) {
        self.host.canvas = Vec2::new(width, height);
        self.host.mode = mode;
        let rect = egui::Rect::from_center_size(
            self.projection.canvas_rect.center(),
            egui::vec2(width, height),
        );
        self.projection = Projection::new(rect, mode);
        tracing::debug!(width, height, ?mode, "canvas created");
    }

    fn width(&self) -> f32 {
        self.host.canvas.x
    }

    fn height(&self) -> f32 {
        self.host.canvas.y
    }

    fn frame_rate(&mut self, fps: f32) {
        self.host.target_fps = Some(fps);
    }

    fn background(&mut self, color: Color) {
        self.painter
            .rect_filled(self.projection.canvas_rect, 0.0, color32(color));
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
        let Some(color) = self.stroke else {
            return;
        };
        if let (Some(a), Some(b)) = (
            self.projection.to_screen(from.extend(0.0)),
            self.projection.to_screen(to.extend(0.0)),
        ) {
            self.painter
                .line_segment([a, b], egui::Stroke::new(self.weight, color32(color)));
        }
    }

    fn ellipse(&mut self, center: Vec2, width: f32, height: f32) {
        let Some(color) = self.fill else {
            return;
        };
        if let Some(c) = self.projection.to_screen(center.extend(0.0)) {
            let r = (width + height) * 0.25 * self.projection.model_scale();
            self.painter.circle_filled(c, r, color32(color));
        }
    }

    fn rect(&mut self, min: Vec2, size: Vec2) {
        let Some(color) = self.fill else {
            return;
        };
        if let (Some(a), Some(b)) = (
            self.projection.to_screen(min.extend(0.0)),
            self.projection.to_screen((min + size).extend(0.0)),
        ) {
            self.painter
                .rect_filled(egui::Rect::from_two_pos(a, b), 0.0, color32(color));
        }
    }

    fn polyline(&mut self, points: &[Vec3]) {
        let Some(color) = self.stroke else {
            return;
        };
        let stroke = egui::Stroke::new(self.weight, color32(color));
        for run in self.projection.screen_runs(points) {
            self.painter.add(egui::Shape::line(run, stroke));
        }
    }

    fn translate(&mut self, offset: Vec2) {
        self.projection.model *= Mat4::from_translation(offset.extend(0.0));
    }

    fn scale(&mut self, factor: f32) {
        self.projection.model *= Mat4::from_scale(Vec3::splat(factor));
    }

    fn camera(&mut self, eye: Vec3, center: Vec3, up: Vec3) {
        self.projection.set_camera(eye, center, up);
    }

    fn noise(&self, x: f32, y: f32, z: f32) -> f32 {
        self.host.noise.sample(x, y, z)
    }

    fn random(&mut self, low: f32, high: f32) -> f32 {
        if high <= low {
            return low;
        }
        self.host.rng.random_range(low..high)
    }

    fn millis(&self) -> f64 {
        self.inputs.millis
    }

    fn frame_count(&self) -> u64 {
        self.inputs.frame_count
    }

    fn pointer(&self) -> Vec2 {
        self.inputs.pointer
    }

    fn layer_clear(&mut self, color: Color) {
        self.host.layer.background = Some(color);
        self.host.layer.segments.clear();
    }

    fn layer_line(&mut self, from: Vec2, to: Vec2, color: Color) {
        self.host.layer.segments.push((from, to, color));
    }

    fn present_layer(&mut self) {
        if let Some(bg) = self.host.layer.background {
            self.painter
                .rect_filled(self.projection.canvas_rect, 0.0, color32(bg));
        }
        for &(from, to, color) in &self.host.layer.segments {
            let stroke = egui::Stroke::new(1.0, color32(color));
            self.painter
                .line_segment([self.canvas_point(from), self.canvas_point(to)], stroke);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> egui::Rect {
        egui::Rect::from_min_size(egui::pos2(10.0, 20.0), egui::vec2(800.0, 600.0))
    }

    #[test]
    fn flat_projection_applies_translate_then_scale() {
        let mut proj = Projection::new(canvas(), CanvasMode::Flat);
        proj.model *= Mat4::from_translation(Vec3::new(400.0, 150.0, 0.0));
        proj.model *= Mat4::from_scale(Vec3::splat(2.0));

        let p = proj.to_screen(Vec3::new(5.0, -5.0, 0.0)).unwrap();
        assert!((p.x - 420.0).abs() < 1e-3, "x = {}", p.x);
        assert!((p.y - 160.0).abs() < 1e-3, "y = {}", p.y);
        assert!((proj.model_scale() - 2.0).abs() < 1e-5);
    }

    #[test]
    fn perspective_origin_lands_on_canvas_center() {
        let mut proj = Projection::new(canvas(), CanvasMode::Perspective);
        proj.set_camera(Vec3::new(300.0, -200.0, 520.0), Vec3::ZERO, Vec3::Y);

        let p = proj.to_screen(Vec3::ZERO).unwrap();
        let c = canvas().center();
        assert!((p.x - c.x).abs() < 1e-2 && (p.y - c.y).abs() < 1e-2);
    }

    #[test]
    fn default_camera_maps_plane_at_origin_one_to_one() {
        let proj = Projection::new(canvas(), CanvasMode::Perspective);
        let p = proj.to_screen(Vec3::new(100.0, 50.0, 0.0)).unwrap();
        let c = canvas().center();

        assert!((p.x - (c.x + 100.0)).abs() < 0.05, "x = {}", p.x);
        assert!((p.y - (c.y + 50.0)).abs() < 0.05, "y = {}", p.y);
    }

    #[test]
    fn points_behind_camera_are_dropped() {
        let proj = Projection::new(canvas(), CanvasMode::Perspective);
        let depth = default_eye_depth(600.0);
        assert!(proj.to_screen(Vec3::new(0.0, 0.0, depth * 2.0)).is_none());
    }

    #[test]
    fn polyline_runs_split_around_points_behind_camera() {
        let proj = Projection::new(canvas(), CanvasMode::Perspective);
        let behind = Vec3::new(0.0, 0.0, default_eye_depth(600.0) * 2.0);
        let points = [
            Vec3::new(-20.0, 0.0, 0.0),
            Vec3::new(-10.0, 0.0, 0.0),
            behind,
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(20.0, 0.0, 0.0),
            Vec3::new(30.0, 0.0, 0.0),
        ];

        let runs = proj.screen_runs(&points);

        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].len(), 2);
        assert_eq!(runs[1].len(), 3);
        // The gap stays open: the first run ends left of center, the second
        // starts right of it.
        let c = canvas().center();
        assert!(runs[0][1].x < c.x && runs[1][0].x > c.x);
    }

    #[test]
    fn polyline_runs_drop_isolated_points() {
        let proj = Projection::new(canvas(), CanvasMode::Perspective);
        let behind = Vec3::new(0.0, 0.0, default_eye_depth(600.0) * 2.0);
        let points = [Vec3::new(5.0, 5.0, 0.0), behind, Vec3::new(6.0, 6.0, 0.0), behind];

        assert!(proj.screen_runs(&points).is_empty());
    }

    #[test]
    fn flat_polyline_is_a_single_run() {
        let proj = Projection::new(canvas(), CanvasMode::Flat);
        let points = [Vec3::ZERO, Vec3::X, Vec3::Y];
        let runs = proj.screen_runs(&points);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].len(), 3);
    }

    #[test]
    fn color32_keeps_alpha() {
        let c = color32(Color::Rgba([10, 20, 30, 40]));
        assert_eq!(c, egui::Color32::from_rgba_unmultiplied(10, 20, 30, 40));
    }
}
