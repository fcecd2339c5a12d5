pub mod states;
pub mod params;
pub mod engine;
pub mod input;
pub mod forces;
pub mod integrator;
pub mod collisions;
pub mod effects;
pub mod simulator;
pub mod scenario;
