//! Animated Lorenz-attractor visual.
//!
//! Call [`Visual::frame`] once per repaint with the surface your renderer
//! provides. The first call creates the canvas; every call advances the
//! animation by one frame.

use visuals_core::config::LorenzPatch;
use visuals_core::presets::lorenz::LorenzSystem;
use visuals_core::surface::Surface;

pub struct Visual {
    system: LorenzSystem,
    ready: bool,
}

impl Visual {
    pub fn new() -> Self {
        let patch = LorenzPatch {
            point_count: Some(12),
            path_length: Some(120),
            auto_rotate: Some(true),
            ..Default::default()
        };
        Self {
            system: LorenzSystem::new(&patch),
            ready: false,
        }
    }

    pub fn frame(&mut self, surface: &mut impl Surface) {
        if !self.ready {
            self.system.setup(surface);
            self.ready = true;
        }
        self.system.draw(surface);
    }

    pub fn reset(&mut self) {
        self.system.reset();
    }
}

impl Default for Visual {
    fn default() -> Self {
        Self::new()
    }
}
