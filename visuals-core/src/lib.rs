//! Canvas animation presets and the numerical pieces behind them.
//!
//! Main components:
//! - [`integrator`] — Lorenz system and fixed-step Euler integration.
//! - [`trail`] — bounded per-trajectory point history.
//! - [`camera`] — orbit and pointer-driven camera placement.
//! - [`surface`] — the drawing capability presets render against, plus a
//!   recording headless implementation.
//! - [`presets`] — the Lorenz, double pendulum and flow field animations.
//! - [`config`] — per-preset configuration, patches and scene files.
//! - [`types`] — shared type aliases and colors.

pub mod camera;
pub mod config;
pub mod integrator;
pub mod presets;
pub mod surface;
pub mod trail;
pub mod types;
