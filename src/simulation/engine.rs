//! High-level runtime engine settings
//!
//! Population limits and the startup spawn schedule used when building and
//! running a `Simulator`

use crate::configuration::config::EngineConfig;

#[derive(Debug, Clone)]
pub struct Engine {
    pub max_particles: usize,                // soft cap, also the startup population
    pub small_viewport_width: f64,           // below this width the soft cap shrinks
    pub small_viewport_max_particles: usize, // soft cap on small viewports
    pub spawn_interval: f64,                 // seconds between startup spawns
    pub initial_spawn_count: usize,          // particles still to come from the startup schedule
}

impl Engine {
    pub fn from_config(cfg: &EngineConfig) -> Self {
        Self {
            max_particles: cfg.max_particles,
            small_viewport_width: cfg.small_viewport_width,
            small_viewport_max_particles: cfg.small_viewport_max_particles,
            spawn_interval: cfg.spawn_interval.max(0.0),
            initial_spawn_count: cfg.max_particles,
        }
    }

    /// User-initiated spawns may go up to twice the soft cap
    pub fn hard_cap(&self) -> usize {
        self.max_particles.saturating_mul(2)
    }

    /// Shrink the population limits for narrow viewports
    pub fn fit_to_viewport(&mut self, width: f64) {
        if width < self.small_viewport_width {
            self.max_particles = self.max_particles.min(self.small_viewport_max_particles);
            self.initial_spawn_count = self.initial_spawn_count.min(self.max_particles);
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}
