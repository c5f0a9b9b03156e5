//! Preset configuration records and the patches that update them.
//!
//! Every preset owns a fully-populated config (`LorenzConfig`,
//! `PendulumConfig`, `FlowFieldConfig`) built by applying an optional patch
//! over fixed defaults. Patches enumerate the recognized keys explicitly and
//! reject anything else when deserialized.
//!
//! A scene file groups one patch per preset:
//!
//! ```toml
//! [lorenz]
//! point_count = 12
//! path_length = 80
//! auto_rotate = true
//!
//! [pendulum]
//! gravity_force = 0.8
//!
//! [flow_field]
//! particle_count = 400
//! line_color = [255, 200, 120]
//! ```

use crate::types::Color;
use serde::Deserialize;
use thiserror::Error;

/// Errors produced while loading a scene file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read scene file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid scene file: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Clone, Debug, PartialEq)]
pub struct LorenzConfig {
    pub point_count: usize,
    /// Maximum trail length per trajectory; `0` disables eviction.
    pub path_length: usize,
    pub rotation_sensitivity: f32,
    pub auto_rotate: bool,
    pub width: f32,
    pub height: f32,
    pub scale: f32,
    pub background_color: Color,
    pub line_color: Color,
}

impl Default for LorenzConfig {
    fn default() -> Self {
        Self {
            point_count: 1,
            path_length: 30,
            rotation_sensitivity: 800.0,
            auto_rotate: false,
            width: 800.0,
            height: 600.0,
            scale: 4.0,
            background_color: Color::BLACK,
            line_color: Color::WHITE,
        }
    }
}

/// Partial update for [`LorenzConfig`]. `None` leaves a field untouched.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LorenzPatch {
    pub point_count: Option<usize>,
    pub path_length: Option<usize>,
    pub rotation_sensitivity: Option<f32>,
    pub auto_rotate: Option<bool>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub scale: Option<f32>,
    pub background_color: Option<Color>,
    pub line_color: Option<Color>,
}

impl LorenzConfig {
    /// Builds a config by applying `patch` over the defaults.
    pub fn from_patch(patch: &LorenzPatch) -> Self {
        let mut cfg = Self::default();
        cfg.apply(patch);
        cfg
    }

    /// Shallow-merges every `Some` field of `patch` into `self`.
    pub fn apply(&mut self, patch: &LorenzPatch) {
        if let Some(v) = patch.point_count {
            self.point_count = v;
        }
        if let Some(v) = patch.path_length {
            self.path_length = v;
        }
        if let Some(v) = patch.rotation_sensitivity {
            self.rotation_sensitivity = v;
        }
        if let Some(v) = patch.auto_rotate {
            self.auto_rotate = v;
        }
        if let Some(v) = patch.width {
            self.width = v;
        }
        if let Some(v) = patch.height {
            self.height = v;
        }
        if let Some(v) = patch.scale {
            self.scale = v;
        }
        if let Some(v) = patch.background_color {
            self.background_color = v;
        }
        if let Some(v) = patch.line_color {
            self.line_color = v;
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PendulumConfig {
    pub width: f32,
    pub height: f32,
    /// Mass of each bob.
    pub scale: f32,
    pub gravity_force: f32,
    pub background_color: Color,
    pub line_color: Color,
}

impl Default for PendulumConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            scale: 8.0,
            gravity_force: 1.0,
            background_color: Color::WHITE,
            line_color: Color::BLACK,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PendulumPatch {
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub scale: Option<f32>,
    pub gravity_force: Option<f32>,
    pub background_color: Option<Color>,
    pub line_color: Option<Color>,
}

impl PendulumConfig {
    pub fn from_patch(patch: &PendulumPatch) -> Self {
        let mut cfg = Self::default();
        if let Some(v) = patch.width {
            cfg.width = v;
        }
        if let Some(v) = patch.height {
            cfg.height = v;
        }
        if let Some(v) = patch.scale {
            cfg.scale = v;
        }
        if let Some(v) = patch.gravity_force {
            cfg.gravity_force = v;
        }
        if let Some(v) = patch.background_color {
            cfg.background_color = v;
        }
        if let Some(v) = patch.line_color {
            cfg.line_color = v;
        }
        cfg
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FlowFieldConfig {
    pub particle_count: usize,
    /// Divisor applied to positions and frame count before sampling noise.
    pub noise_scale: f32,
    pub noise_strength: f32,
    pub width: f32,
    pub height: f32,
    /// Multiplier on the particle diameter.
    pub scale: f32,
    pub background_color: Color,
    pub line_color: Color,
}

impl Default for FlowFieldConfig {
    fn default() -> Self {
        Self {
            particle_count: 100,
            noise_scale: 500.0,
            noise_strength: 1.0,
            width: 800.0,
            height: 600.0,
            scale: 1.0,
            background_color: Color::BLACK,
            line_color: Color::WHITE,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlowFieldPatch {
    pub particle_count: Option<usize>,
    pub noise_scale: Option<f32>,
    pub noise_strength: Option<f32>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub scale: Option<f32>,
    pub background_color: Option<Color>,
    pub line_color: Option<Color>,
}

impl FlowFieldConfig {
    pub fn from_patch(patch: &FlowFieldPatch) -> Self {
        let mut cfg = Self::default();
        if let Some(v) = patch.particle_count {
            cfg.particle_count = v;
        }
        if let Some(v) = patch.noise_scale {
            cfg.noise_scale = v;
        }
        if let Some(v) = patch.noise_strength {
            cfg.noise_strength = v;
        }
        if let Some(v) = patch.width {
            cfg.width = v;
        }
        if let Some(v) = patch.height {
            cfg.height = v;
        }
        if let Some(v) = patch.scale {
            cfg.scale = v;
        }
        if let Some(v) = patch.background_color {
            cfg.background_color = v;
        }
        if let Some(v) = patch.line_color {
            cfg.line_color = v;
        }
        cfg
    }
}

/// Per-preset overrides loaded from a TOML scene file.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneFile {
    #[serde(default)]
    pub lorenz: LorenzPatch,
    #[serde(default)]
    pub pendulum: PendulumPatch,
    #[serde(default)]
    pub flow_field: FlowFieldPatch,
}

impl SceneFile {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let scene = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded scene file");
        Ok(scene)
    }
}
