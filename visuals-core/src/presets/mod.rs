//! The three animation presets.
//!
//! Each preset is an independent struct that is built from an optional
//! patch, then driven by the host through `setup` (once) and `draw` (once
//! per frame), borrowing the [`crate::surface::Surface`] for the duration
//! of each call.

pub mod flow_field;
pub mod lorenz;
pub mod pendulum;
