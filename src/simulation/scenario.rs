//! Build fully-initialized simulators from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces a `Scenario`
//! containing:
//! - the `Simulator` with engine settings, parameters and the pointer force
//! - the `SharedInput` handle the front end writes pointer/viewport updates to
//!
//! The scenario is inserted into Bevy as a `Resource` and consumed by the
//! input, physics and rendering systems. Headless runs use it directly.

use bevy::prelude::Resource;

use crate::configuration::config::{ParametersConfig, ScenarioConfig};
use crate::simulation::engine::Engine;
use crate::simulation::forces::InteractionMode;
use crate::simulation::input::SharedInput;
use crate::simulation::params::Parameters;
use crate::simulation::simulator::Simulator;
use crate::simulation::states::NVec2;

/// Bevy resource representing a fully-initialized particle field
#[derive(Resource)]
pub struct Scenario {
    pub simulator: Simulator,
    pub input: SharedInput,
}

impl Scenario {
    pub fn build_scenario(cfg: ScenarioConfig) -> Self {
        let e_cfg = &cfg.engine;
        let viewport = NVec2::new(e_cfg.viewport[0], e_cfg.viewport[1]);
        let input = SharedInput::new(viewport);

        // Engine (runtime) from EngineConfig
        let mut engine = Engine::from_config(e_cfg);

        // Explicit particles replace the staggered startup schedule
        if !cfg.particles.is_empty() {
            engine.initial_spawn_count = 0;
        }

        let parameters = parameters_from_config(&cfg.parameters);

        let initial_mode = if e_cfg.attraction_mode {
            InteractionMode::Attraction
        } else {
            InteractionMode::Repulsion
        };
        let mut simulator = Simulator::new(engine, parameters, input.clone(), input.clone(), e_cfg.seed)
            .with_interaction_mode(initial_mode);

        for pc in &cfg.particles {
            let v = pc.v.map(|v| NVec2::new(v[0], v[1]));
            simulator.spawn(Some(pc.size), Some(NVec2::new(pc.x[0], pc.x[1])), v);
        }

        Self { simulator, input }
    }
}

// Parameters (runtime) from ParametersConfig
fn parameters_from_config(p_cfg: &ParametersConfig) -> Parameters {
    Parameters {
        interaction_radius: p_cfg.interaction_radius,
        max_force: p_cfg.max_force,
        restitution: p_cfg.restitution,
        damping: p_cfg.damping,
        gravity: p_cfg.gravity,
        settle_threshold: p_cfg.settle_threshold,
        settle_jitter: p_cfg.settle_jitter,
        fling_scale: p_cfg.fling_scale,
        impulse_radius: p_cfg.impulse_radius,
        impulse_strength: p_cfg.impulse_strength,
        spawn_spread: p_cfg.spawn_spread,
        initial_speed: p_cfg.initial_speed,
    }
}
