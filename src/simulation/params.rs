//! Tuned physical parameters for the particle field
//!
//! All values are per tick (one display frame) unless noted. They were tuned
//! for visual feel, not derived from a physical model:
//! - pointer interaction radius and peak force,
//! - boundary restitution, velocity damping and downward bias,
//! - anti-settling threshold and jitter,
//! - fling scale for drag release,
//! - default click impulse radius and strength,
//! - spread of velocities for particles spawned by the user

#[derive(Debug, Clone)]
pub struct Parameters {
    pub interaction_radius: f64, // pointer influence radius (px)
    pub max_force: f64,          // velocity added at zero distance from the pointer
    pub restitution: f64,        // energy kept on a boundary bounce
    pub damping: f64,            // per-tick velocity multiplier
    pub gravity: f64,            // per-tick downward velocity bias
    pub settle_threshold: f64,   // below this on both axes a particle counts as settled
    pub settle_jitter: f64,      // width of the random kick given to settled particles
    pub fling_scale: f64,        // pointer delta to fling velocity
    pub impulse_radius: f64,     // default click impulse radius (px)
    pub impulse_strength: f64,   // default click impulse strength
    pub spawn_spread: f64,       // width of the velocity range for user spawns
    pub initial_speed: f64,      // width of the velocity range for startup spawns
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            interaction_radius: 150.0,
            max_force: 0.5,
            restitution: 0.8,
            damping: 0.995,
            gravity: 0.005,
            settle_threshold: 0.1,
            settle_jitter: 0.2,
            fling_scale: 0.5,
            impulse_radius: 200.0,
            impulse_strength: 3.0,
            spawn_spread: 8.0,
            initial_speed: 2.0,
        }
    }
}
