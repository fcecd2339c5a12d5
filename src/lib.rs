pub mod simulation;
pub mod configuration;
pub mod visualization;
pub mod benchmark;
pub mod logger;

pub use simulation::states::{Particle, ParticleId, SizeClass, DragState, Field, NVec2};
pub use simulation::params::Parameters;
pub use simulation::engine::Engine;
pub use simulation::forces::{Acceleration, ForceSet, ForceContext, InteractionMode, PointerInteraction};
pub use simulation::input::{PointerSource, ViewportSource, SharedInput, FixedViewport, NoPointer};
pub use simulation::simulator::{Simulator, FieldStats};
pub use simulation::scenario::Scenario;

pub use configuration::config::{ScenarioConfig, EngineConfig, ParametersConfig, ParticleConfig, ConfigError};

pub use visualization::{pfield_vis2d::run_2d, headless::run_headless};

pub use benchmark::benchmark::bench_tick;
