//! Configuration types for loading particle field scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! scenario. A scenario consists of:
//!
//! - [`EngineConfig`]     – population limits, startup schedule, seed, viewport
//! - [`ParametersConfig`] – tuned physics constants
//! - [`ParticleConfig`]   – optional explicit initial particles
//! - [`ScenarioConfig`]   – top-level wrapper used to load a scenario from YAML
//!
//! Every field has a default, so an empty document is a valid scenario.
//!
//! # YAML format
//!
//! ```yaml
//! engine:
//!   max_particles: 15               # soft cap and startup population
//!   small_viewport_width: 768.0     # narrower viewports use the small cap
//!   small_viewport_max_particles: 8
//!   spawn_interval: 0.3             # seconds between startup spawns
//!   attraction_mode: false          # false -> pointer repels
//!   seed: 42                        # omit for a random run
//!   viewport: [ 1280.0, 720.0 ]
//!
//! parameters:
//!   interaction_radius: 150.0
//!   max_force: 0.5
//!   restitution: 0.8
//!   damping: 0.995
//!   gravity: 0.005
//!
//! particles:                        # non-empty -> replaces the startup schedule
//!   - size: medium                  # small | medium | large | extra-large
//!     x: [ 100.0, 100.0 ]
//!     v: [ 2.0, 0.0 ]
//! ```

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::simulation::params::Parameters;
use crate::simulation::states::SizeClass;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read scenario: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed scenario: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid value for `{field}`: {value}")]
    Invalid { field: &'static str, value: f64 },
}

/// Population and runtime options
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct EngineConfig {
    pub max_particles: usize,                // soft cap; user spawns may reach twice this
    pub small_viewport_width: f64,           // viewport width below which the small cap applies
    pub small_viewport_max_particles: usize, // soft cap on small viewports
    pub spawn_interval: f64,                 // seconds between staggered startup spawns
    pub attraction_mode: bool,               // initial pointer mode, `false` - repulsion
    pub seed: Option<u64>,                   // deterministic seed, `None` - seeded from entropy
    pub viewport: [f64; 2],                  // initial viewport (width, height) in pixels
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_particles: 15,
            small_viewport_width: 768.0,
            small_viewport_max_particles: 8,
            spawn_interval: 0.3,
            attraction_mode: false,
            seed: None,
            viewport: [1280.0, 720.0],
        }
    }
}

/// Tuned physics constants, see [`Parameters`] for their meaning
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ParametersConfig {
    pub interaction_radius: f64,
    pub max_force: f64,
    pub restitution: f64,
    pub damping: f64,
    pub gravity: f64,
    pub settle_threshold: f64,
    pub settle_jitter: f64,
    pub fling_scale: f64,
    pub impulse_radius: f64,
    pub impulse_strength: f64,
    pub spawn_spread: f64,
    pub initial_speed: f64,
}

impl Default for ParametersConfig {
    fn default() -> Self {
        let p = Parameters::default();
        Self {
            interaction_radius: p.interaction_radius,
            max_force: p.max_force,
            restitution: p.restitution,
            damping: p.damping,
            gravity: p.gravity,
            settle_threshold: p.settle_threshold,
            settle_jitter: p.settle_jitter,
            fling_scale: p.fling_scale,
            impulse_radius: p.impulse_radius,
            impulse_strength: p.impulse_strength,
            spawn_spread: p.spawn_spread,
            initial_speed: p.initial_speed,
        }
    }
}

/// Initial state for one explicitly placed particle
#[derive(Deserialize, Debug, Clone)]
pub struct ParticleConfig {
    pub size: SizeClass,
    pub x: [f64; 2],         // top-left position in pixels
    pub v: Option<[f64; 2]>, // pixels per tick, random when omitted
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct ScenarioConfig {
    pub engine: EngineConfig,
    pub parameters: ParametersConfig,
    pub particles: Vec<ParticleConfig>,
}

impl ScenarioConfig {
    /// Parse and validate a scenario document
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ConfigError> {
        let cfg: ScenarioConfig = serde_yaml::from_reader(reader)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Self::from_reader(s.as_bytes())
    }

    /// Reject values the simulator cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let e = &self.engine;
        let p = &self.parameters;

        let non_negative = [
            ("engine.small_viewport_width", e.small_viewport_width),
            ("engine.spawn_interval", e.spawn_interval),
            ("engine.viewport[0]", e.viewport[0]),
            ("engine.viewport[1]", e.viewport[1]),
            ("parameters.interaction_radius", p.interaction_radius),
            ("parameters.max_force", p.max_force),
            ("parameters.restitution", p.restitution),
            ("parameters.damping", p.damping),
            ("parameters.gravity", p.gravity),
            ("parameters.settle_threshold", p.settle_threshold),
            ("parameters.settle_jitter", p.settle_jitter),
            ("parameters.fling_scale", p.fling_scale),
            ("parameters.impulse_radius", p.impulse_radius),
            ("parameters.impulse_strength", p.impulse_strength),
            ("parameters.spawn_spread", p.spawn_spread),
            ("parameters.initial_speed", p.initial_speed),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid { field, value });
            }
        }

        for particle in &self.particles {
            let mut values = particle.x.iter().chain(particle.v.iter().flatten());
            if let Some(&value) = values.find(|c| !c.is_finite()) {
                return Err(ConfigError::Invalid { field: "particles", value });
            }
        }
        Ok(())
    }
}
