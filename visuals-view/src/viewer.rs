//! Interactive preset viewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns the active preset and the
//! host-side surface state, and implements [`eframe::App`] to drive the
//! preset once per frame and expose its configuration through egui panels.

use crate::painter_surface::{FrameInputs, HostState, PainterSurface};
use eframe::App;
use glam::Vec2;
use std::time::Duration;
use visuals_core::{
    config::{LorenzConfig, LorenzPatch, SceneFile},
    presets::{flow_field::FlowField, lorenz::LorenzSystem, pendulum::DoublePendulum},
    surface::Surface,
};

/// Which preset the viewer runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum PresetKind {
    Lorenz,
    Pendulum,
    FlowField,
}

impl PresetKind {
    /// Every preset, in the order shown in the top panel.
    const ALL: [PresetKind; 3] = [PresetKind::Lorenz, PresetKind::Pendulum, PresetKind::FlowField];

    /// Human-readable name for the preset selector.
    fn label(self) -> &'static str {
        match self {
            PresetKind::Lorenz => "Lorenz",
            PresetKind::Pendulum => "Double pendulum",
            PresetKind::FlowField => "Flow field",
        }
    }
}

/// The running preset. Dispatch is a plain `match`; presets share no trait.
enum ActivePreset {
    Lorenz(LorenzSystem),
    Pendulum(DoublePendulum),
    FlowField(FlowField),
}

impl ActivePreset {
    /// Builds a preset of `kind` from its patch in `scene`.
    ///
    /// ### Parameters
    /// - `kind` - Which preset to build.
    /// - `scene` - Patches loaded from the scene file (or defaults).
    ///
    /// ### Returns
    /// The preset, not yet set up.
    fn build(kind: PresetKind, scene: &SceneFile) -> Self {
        match kind {
            PresetKind::Lorenz => ActivePreset::Lorenz(LorenzSystem::new(&scene.lorenz)),
            PresetKind::Pendulum => ActivePreset::Pendulum(DoublePendulum::new(&scene.pendulum)),
            PresetKind::FlowField => ActivePreset::FlowField(FlowField::new(&scene.flow_field)),
        }
    }

    fn setup(&mut self, surface: &mut impl Surface) {
        match self {
            ActivePreset::Lorenz(p) => p.setup(surface),
            ActivePreset::Pendulum(p) => p.setup(surface),
            ActivePreset::FlowField(p) => p.setup(surface),
        }
    }

    fn draw(&mut self, surface: &mut impl Surface) {
        match self {
            ActivePreset::Lorenz(p) => p.draw(surface),
            ActivePreset::Pendulum(p) => p.draw(surface),
            ActivePreset::FlowField(p) => p.draw(surface),
        }
    }
}

/// Main application state for the viewer.
///
/// ### Fields
/// - `scene` - Patches loaded at startup; reapplied whenever a preset is rebuilt.
/// - `kind` / `preset` - The running preset.
/// - `host` - Surface state that survives between frames.
/// - `needs_setup` - `true` until the preset's `setup` has run on a surface.
/// - `frame_count` - Frames drawn since the last setup.
/// - `lorenz_edit` - Values shown in the Lorenz config panel.
pub struct Viewer {
    scene: SceneFile,
    kind: PresetKind,
    preset: ActivePreset,
    host: HostState,
    needs_setup: bool,
    frame_count: u64,
    lorenz_edit: LorenzConfig,
}

impl Viewer {
    /// Creates a new viewer running `kind`.
    ///
    /// The preset is built right away but its `setup` only runs on the first
    /// frame, once there is a painter to draw on.
    ///
    /// ### Parameters
    /// - `kind` - Preset to start with.
    /// - `scene` - Patches for every preset; kept so restarts and preset
    ///   switches start from the same configuration.
    ///
    /// ### Returns
    /// A new [`Viewer`] waiting for its first frame.
    pub fn new(kind: PresetKind, scene: SceneFile) -> Self {
        let preset = ActivePreset::build(kind, &scene);
        let lorenz_edit = LorenzConfig::from_patch(&scene.lorenz);
        Self {
            scene,
            kind,
            preset,
            host: HostState::new(),
            needs_setup: true,
            frame_count: 0,
            lorenz_edit,
        }
    }

    /// Rebuilds the current preset from the scene patches.
    ///
    /// Clears host state and the frame counter; `setup` runs again on the
    /// next frame.
    fn rebuild(&mut self) {
        self.preset = ActivePreset::build(self.kind, &self.scene);
        self.lorenz_edit = LorenzConfig::from_patch(&self.scene.lorenz);
        self.host.reset();
        self.needs_setup = true;
        self.frame_count = 0;
        tracing::info!(preset = ?self.kind, "preset started");
    }

    /// Switches to `kind`, rebuilding only when it differs from the current
    /// preset.
    ///
    /// ### Parameters
    /// - `kind` - Preset selected in the top panel.
    fn switch_to(&mut self, kind: PresetKind) {
        if kind != self.kind {
            self.kind = kind;
            self.rebuild();
        }
    }

    /// Marks the preset as set up, to be called right after its `setup`.
    ///
    /// `setup` may change the Lorenz configuration (a single trajectory gets
    /// the long trail), so the panel values are refreshed from the running
    /// preset. Otherwise the next panel edit would push the pre-setup values
    /// back.
    fn finish_setup(&mut self) {
        self.needs_setup = false;
        if let ActivePreset::Lorenz(sys) = &self.preset {
            self.lorenz_edit = sys.config().clone();
        }
    }

    /// Pushes the Lorenz panel values into the running preset.
    ///
    /// Does nothing while another preset is running.
    fn apply_lorenz_edit(&mut self) {
        let ActivePreset::Lorenz(sys) = &mut self.preset else {
            return;
        };
        let e = &self.lorenz_edit;
        sys.update_config(&LorenzPatch {
            point_count: Some(e.point_count),
            path_length: Some(e.path_length),
            rotation_sensitivity: Some(e.rotation_sensitivity),
            auto_rotate: Some(e.auto_rotate),
            scale: Some(e.scale),
            ..Default::default()
        });
    }

    /// Helper to draw a labeled `usize` [`egui::DragValue`].
    ///
    /// ### Parameters
    /// - `ui` - Target UI.
    /// - `label` - Text shown before the value.
    /// - `value` - Value edited in place.
    /// - `range` - Allowed range.
    /// - `speed` - Drag speed.
    ///
    /// ### Returns
    /// `true` if the value changed this frame.
    fn labeled_drag_usize(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut usize,
        range: std::ops::RangeInclusive<usize>,
        speed: f64,
    ) -> bool {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed))
                .changed()
        })
        .inner
    }

    /// Helper to draw a labeled `f32` [`egui::DragValue`].
    ///
    /// Same parameters and return value as [`Self::labeled_drag_usize`].
    fn labeled_drag_f32(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut f32,
        range: std::ops::RangeInclusive<f32>,
        speed: f64,
    ) -> bool {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed))
                .changed()
        })
        .inner
    }

    /// Builds the top panel (preset selector, restart).
    ///
    /// ### Parameters
    /// - `ctx` - egui context for this frame.
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let mut selected = self.kind;
                for kind in PresetKind::ALL {
                    ui.selectable_value(&mut selected, kind, kind.label());
                }
                self.switch_to(selected);

                ui.separator();
                if ui.button("Restart").clicked() {
                    self.rebuild();
                }
            });
        });
    }

    /// Builds the bottom status bar.
    ///
    /// Shows the frame counter, the requested frame rate, the canvas size and,
    /// for the Lorenz preset, the trajectory count.
    ///
    /// ### Parameters
    /// - `ctx` - egui context for this frame.
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("frame = {}", self.frame_count));
                if let Some(fps) = self.host.target_fps {
                    ui.label(format!("fps target = {fps:.0}"));
                }
                ui.label(format!(
                    "canvas = {:.0}×{:.0}",
                    self.host.canvas.x, self.host.canvas.y
                ));
                if let ActivePreset::Lorenz(sys) = &self.preset {
                    ui.separator();
                    ui.label(format!("trajectories = {}", sys.state().point_count));
                }
            });
        });
    }

    /// Builds the right-hand Lorenz configuration panel.
    ///
    /// Only shown while the Lorenz preset runs. Any edit is pushed to the
    /// preset immediately through [`Self::apply_lorenz_edit`].
    ///
    /// ### Parameters
    /// - `ctx` - egui context for this frame.
    fn ui_config_panel(&mut self, ctx: &egui::Context) {
        if !matches!(self.preset, ActivePreset::Lorenz(_)) {
            return;
        }

        egui::SidePanel::right("config_panel")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.heading("Lorenz");

                let mut changed = false;
                let e = &mut self.lorenz_edit;

                ui.separator();
                ui.label("Trajectories");
                changed |=
                    Self::labeled_drag_usize(ui, "point_count:", &mut e.point_count, 1..=500, 1.0);
                changed |=
                    Self::labeled_drag_usize(ui, "path_length:", &mut e.path_length, 0..=5000, 1.0);

                ui.separator();
                ui.label("Camera");
                changed |= ui.checkbox(&mut e.auto_rotate, "auto_rotate").changed();
                changed |= Self::labeled_drag_f32(
                    ui,
                    "sensitivity:",
                    &mut e.rotation_sensitivity,
                    0.0..=4000.0,
                    5.0,
                );
                changed |= Self::labeled_drag_f32(ui, "scale:", &mut e.scale, 0.1..=40.0, 0.1);

                if changed {
                    self.apply_lorenz_edit();
                }

                ui.separator();
                if ui.button("Reset trajectories").clicked()
                    && let ActivePreset::Lorenz(sys) = &mut self.preset
                {
                    sys.reset();
                }
            });
    }

    /// Builds the central panel where the preset draws.
    ///
    /// Runs `setup` on the first frame after a (re)build, then one `draw`.
    /// The canvas is centered in the panel; the pointer is reported in
    /// canvas pixels and defaults to the canvas center when outside.
    ///
    /// ### Parameters
    /// - `ctx` - egui context for this frame.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(egui::Color32::from_gray(24)))
            .show(ctx, |ui| {
                let rect = ui.available_rect_before_wrap();

                if self.needs_setup {
                    let canvas_rect = self.canvas_rect(rect);
                    let painter = ui.painter_at(rect.intersect(canvas_rect));
                    let inputs = self.frame_inputs(ctx, self.pointer(ctx, canvas_rect));
                    let mut surface =
                        PainterSurface::new(&painter, canvas_rect, &mut self.host, inputs);
                    self.preset.setup(&mut surface);
                    self.finish_setup();
                }

                // `setup` may have resized the canvas.
                let canvas_rect = self.canvas_rect(rect);
                let painter = ui.painter_at(rect.intersect(canvas_rect));

                self.frame_count += 1;
                let inputs = self.frame_inputs(ctx, self.pointer(ctx, canvas_rect));
                let mut surface =
                    PainterSurface::new(&painter, canvas_rect, &mut self.host, inputs);
                self.preset.draw(&mut surface);
            });

        match self.host.target_fps {
            Some(fps) if fps > 0.0 => ctx.request_repaint_after(Duration::from_secs_f32(1.0 / fps)),
            _ => ctx.request_repaint(),
        }
    }

    /// Screen rectangle of the canvas, centered in `panel`.
    ///
    /// ### Parameters
    /// - `panel` - Area available in the central panel.
    ///
    /// ### Returns
    /// A rectangle of size `host.canvas`. It may extend past `panel`.
    fn canvas_rect(&self, panel: egui::Rect) -> egui::Rect {
        egui::Rect::from_center_size(
            panel.center(),
            egui::vec2(self.host.canvas.x, self.host.canvas.y),
        )
    }

    /// Pointer position relative to the canvas' top-left corner.
    ///
    /// ### Parameters
    /// - `ctx` - egui context for this frame.
    /// - `canvas_rect` - Screen rectangle of the canvas.
    ///
    /// ### Returns
    /// Canvas pixels, or the canvas center when the pointer is not hovering.
    fn pointer(&self, ctx: &egui::Context, canvas_rect: egui::Rect) -> Vec2 {
        ctx.input(|i| i.pointer.hover_pos())
            .map(|p| Vec2::new(p.x - canvas_rect.min.x, p.y - canvas_rect.min.y))
            .unwrap_or(self.host.canvas * 0.5)
    }

    /// Collects the per-frame inputs handed to the preset.
    ///
    /// ### Parameters
    /// - `ctx` - egui context for this frame; supplies host time.
    /// - `pointer` - Pointer position in canvas pixels.
    ///
    /// ### Returns
    /// [`FrameInputs`] with time in milliseconds and the current frame count.
    fn frame_inputs(&self, ctx: &egui::Context, pointer: Vec2) -> FrameInputs {
        FrameInputs {
            millis: ctx.input(|i| i.time) * 1000.0,
            frame_count: self.frame_count,
            pointer,
        }
    }
}

impl App for Viewer {
    /// Called by eframe each frame: lays out the panels and draws the preset.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_config_panel(ctx);
        self.ui_central_panel(ctx);
    }
}
