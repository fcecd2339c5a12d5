//! The particle field simulator
//!
//! Owns the particle set, the force terms and the cosmetic effects, and
//! exposes the operations front ends drive from their event loop:
//! spawning, one `tick` per frame, drag/fling, click impulses, mode toggles,
//! pause/resume and viewport resizes.
//!
//! Pointer position and viewport size are read through the injected
//! providers, once per operation; the simulator keeps no window state.

use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::simulation::collisions::resolve_collisions;
use crate::simulation::effects::{Effect, Effects, POINTER_TRAIL_CHANCE};
use crate::simulation::engine::Engine;
use crate::simulation::forces::{proximity, radial_impulse, ForceContext, ForceSet, InteractionMode, PointerInteraction};
use crate::simulation::input::{PointerSource, ViewportSource};
use crate::simulation::integrator::euler_step;
use crate::simulation::params::Parameters;
use crate::simulation::states::{DragState, Field, NVec2, Particle, ParticleId, SizeClass};

/// Aggregate numbers over the live set
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldStats {
    pub count: usize,
    pub dragging: usize,
    pub kinetic_energy: f64,
    pub momentum: NVec2,
}

pub struct Simulator {
    engine: Engine,
    parameters: Parameters,
    field: Field,
    forces: ForceSet,
    effects: Effects,
    pointer: Box<dyn PointerSource + Send + Sync>,
    viewport: Box<dyn ViewportSource + Send + Sync>,
    rng: ChaCha8Rng,
    mode: InteractionMode,
    running: bool,
    spawn_clock: f64,      // seconds since the startup schedule began
    next_spawn_due: f64,   // clock value of the next startup spawn
    last_pointer: Option<NVec2>,
    next_id: u32,
}

impl Simulator {
    /// Build a simulator with an empty field. The startup schedule spawns
    /// `engine.initial_spawn_count` particles over the first ticks.
    pub fn new<P, V>(mut engine: Engine, parameters: Parameters, pointer: P, viewport: V, seed: Option<u64>) -> Self
    where
        P: PointerSource + Send + Sync + 'static,
        V: ViewportSource + Send + Sync + 'static,
    {
        engine.fit_to_viewport(viewport.viewport().x);

        let forces = ForceSet::new().with(PointerInteraction {
            radius: parameters.interaction_radius,
            max_force: parameters.max_force,
        });

        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        info!(
            "simulator: max {} particles (hard cap {}), {} scheduled at startup",
            engine.max_particles,
            engine.hard_cap(),
            engine.initial_spawn_count
        );

        Self {
            engine,
            parameters,
            field: Field::default(),
            forces,
            effects: Effects::default(),
            pointer: Box::new(pointer),
            viewport: Box::new(viewport),
            rng,
            mode: InteractionMode::Repulsion,
            running: true,
            spawn_clock: 0.0,
            next_spawn_due: 0.0,
            last_pointer: None,
            next_id: 0,
        }
    }

    /// Start in `mode` without raising the mode banner
    pub fn with_interaction_mode(mut self, mode: InteractionMode) -> Self {
        self.mode = mode;
        self
    }

    // ---------------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------------

    pub fn particles(&self) -> &[Particle] {
        &self.field.particles
    }

    pub fn particle(&self, id: ParticleId) -> Option<&Particle> {
        self.field.get(id)
    }

    pub fn len(&self) -> usize {
        self.field.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.field.particles.is_empty()
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn effects(&self) -> &[Effect] {
        self.effects.live()
    }

    pub fn time(&self) -> f64 {
        self.field.t
    }

    /// Startup spawns that have not happened yet
    pub fn pending_spawns(&self) -> usize {
        self.engine.initial_spawn_count
    }

    pub fn viewport(&self) -> NVec2 {
        self.viewport.viewport()
    }

    pub fn stats(&self) -> FieldStats {
        let mut stats = FieldStats {
            count: self.field.particles.len(),
            dragging: 0,
            kinetic_energy: 0.0,
            momentum: NVec2::zeros(),
        };
        for p in &self.field.particles {
            if p.is_dragging() {
                stats.dragging += 1;
            }
            stats.kinetic_energy += 0.5 * p.mass() * p.v.norm_squared();
            stats.momentum += p.mass() * p.v;
        }
        stats
    }

    // ---------------------------------------------------------------------
    // Population
    // ---------------------------------------------------------------------

    /// Create a particle. Missing size is drawn from the spawn weights,
    /// missing position is uniform over the viewport, missing velocity is
    /// uniform in `[-initial_speed/2, initial_speed/2)` per axis.
    /// Returns `None` (and changes nothing) once the hard cap is reached.
    pub fn spawn(&mut self, size: Option<SizeClass>, position: Option<NVec2>, velocity: Option<NVec2>) -> Option<ParticleId> {
        if self.field.particles.len() >= self.engine.hard_cap() {
            debug!("spawn rejected: {} particles at hard cap", self.field.particles.len());
            return None;
        }

        let size = size.unwrap_or_else(|| SizeClass::from_unit(self.rng.gen::<f64>()));

        let x = match position.filter(is_finite) {
            Some(x) => x,
            None => {
                let bounds = self.viewport.viewport();
                let d = size.diameter();
                NVec2::new(
                    self.rng.gen::<f64>() * (bounds.x - d).max(0.0),
                    self.rng.gen::<f64>() * (bounds.y - d).max(0.0),
                )
            }
        };

        let v = match velocity.filter(is_finite) {
            Some(v) => v,
            None => self.random_velocity(self.parameters.initial_speed),
        };

        let id = ParticleId(self.next_id);
        self.next_id += 1;
        self.field.particles.push(Particle::new(id, size, x, v));
        debug!("spawned {:?} {:?} at ({:.1}, {:.1})", id, size, x.x, x.y);
        Some(id)
    }

    /// Double-click in empty space: spawn a particle centred on `at` with a
    /// random outward velocity. Clicks that land on a particle are ignored.
    pub fn double_click(&mut self, at: NVec2) -> Option<ParticleId> {
        if !is_finite(&at) || self.particle_at(at).is_some() {
            return None;
        }
        let size = SizeClass::from_unit(self.rng.gen::<f64>());
        let v = self.random_velocity(self.parameters.spawn_spread);
        let id = self.spawn(Some(size), Some(at - NVec2::repeat(size.radius())), Some(v))?;
        self.effects.ripple(at);
        Some(id)
    }

    /// Remove every particle and effect and stop ticking
    pub fn teardown(&mut self) {
        self.pause();
        self.field.particles.clear();
        self.effects.clear();
        self.engine.initial_spawn_count = 0;
        info!("simulator torn down");
    }

    // ---------------------------------------------------------------------
    // Frame step
    // ---------------------------------------------------------------------

    /// Advance the field by one frame. `dt` is wall-clock seconds since the
    /// previous frame; it drives the startup schedule and effect expiry,
    /// while physics constants are applied once per call.
    ///
    /// A negative or non-finite `dt` skips the frame entirely. `dt == 0`
    /// still steps physics, but effects only expire with positive `dt`;
    /// their count is bounded by `effects::MAX_LIVE_EFFECTS` either way.
    pub fn tick(&mut self, dt: f64) {
        if !self.running || !dt.is_finite() || dt < 0.0 {
            return;
        }

        self.effects.advance(dt);
        self.run_spawn_schedule(dt);

        let pointer = self.pointer.pointer();
        let bounds = self.viewport.viewport();
        self.track_pointer(pointer);

        let ctx = ForceContext {
            pointer,
            mode: self.mode,
        };

        let mut dv = vec![NVec2::zeros(); self.field.particles.len()];
        self.forces.accumulate(&ctx, &self.field, &mut dv);
        self.update_glow(pointer);

        euler_step(&mut self.field, &dv, &self.parameters, bounds, &mut self.rng);

        for at in resolve_collisions(&mut self.field) {
            self.effects.ripple(at);
        }

        // Collision separation may push a particle past an edge
        for p in self.field.particles.iter_mut().filter(|p| !p.is_dragging()) {
            p.clamp_into(bounds);
        }

        self.field.t += dt;
    }

    fn run_spawn_schedule(&mut self, dt: f64) {
        if self.engine.initial_spawn_count == 0 {
            return;
        }
        self.spawn_clock += dt;
        while self.engine.initial_spawn_count > 0 && self.spawn_clock >= self.next_spawn_due {
            self.engine.initial_spawn_count -= 1;
            self.next_spawn_due += self.engine.spawn_interval;
            self.spawn(None, None, None);
        }
    }

    fn track_pointer(&mut self, pointer: Option<NVec2>) {
        if let Some(at) = pointer {
            if self.last_pointer != Some(at) && self.rng.gen_bool(POINTER_TRAIL_CHANCE) {
                self.effects.pointer_trail(at);
            }
        }
        self.last_pointer = pointer;
    }

    fn update_glow(&mut self, pointer: Option<NVec2>) {
        let radius = self.parameters.interaction_radius;
        for p in self.field.particles.iter_mut() {
            p.glow = match pointer {
                Some(at) if !p.is_dragging() => proximity((at - p.center()).norm(), radius).unwrap_or(0.0),
                _ => 0.0,
            };
        }
    }

    // ---------------------------------------------------------------------
    // Pointer interaction
    // ---------------------------------------------------------------------

    /// Top-most particle whose disc contains `at`. Smaller particles draw
    /// above larger ones; among equal sizes the latest spawned wins.
    pub fn particle_at(&self, at: NVec2) -> Option<ParticleId> {
        self.field
            .particles
            .iter()
            .rev()
            .filter(|p| (p.center() - at).norm() <= p.radius())
            .min_by(|a, b| a.diameter().total_cmp(&b.diameter()))
            .map(|p| p.id)
    }

    /// Free → Dragging. Stops the particle and remembers where it was grabbed.
    pub fn begin_drag(&mut self, id: ParticleId, pointer: NVec2) -> bool {
        if !is_finite(&pointer) {
            return false;
        }
        let Some(p) = self.field.get_mut(id) else {
            return false;
        };
        if p.is_dragging() {
            return false;
        }
        p.drag = DragState::Dragging {
            offset: pointer - p.x,
            fling: NVec2::zeros(),
        };
        p.v = NVec2::zeros();
        p.last_x = p.x;
        p.glow = 0.0;
        true
    }

    /// Move a dragged particle with the pointer and record the fling velocity
    pub fn update_drag(&mut self, id: ParticleId, pointer: NVec2) {
        if !is_finite(&pointer) {
            return;
        }
        let bounds = self.viewport.viewport();
        let fling_scale = self.parameters.fling_scale;
        let Some(p) = self.field.get_mut(id) else {
            return;
        };
        let DragState::Dragging { offset, .. } = p.drag else {
            return;
        };

        let mut target = pointer - offset;
        let max = p.max_position(bounds);
        target.x = target.x.clamp(0.0, max.x);
        target.y = target.y.clamp(0.0, max.y);

        // Delta spans the last two updates, halved
        let fling = (target - p.last_x) * fling_scale;
        p.drag = DragState::Dragging { offset, fling };
        p.last_x = p.x;
        p.x = target;

        let (at, diameter) = (p.center(), p.diameter());
        self.effects.trail(at, diameter);
    }

    /// Dragging → Free, handing the recorded pointer velocity to the particle
    pub fn end_drag(&mut self, id: ParticleId) {
        let Some(p) = self.field.get_mut(id) else {
            return;
        };
        let DragState::Dragging { fling, .. } = p.drag else {
            return;
        };
        p.drag = DragState::Free;
        p.v = fling;
        let at = p.center();
        self.effects.ripple(at);
    }

    /// Push particles near `center` outward, see [`radial_impulse`]
    pub fn apply_impulse(&mut self, center: NVec2, radius: f64, strength: f64) -> usize {
        if !is_finite(&center) {
            return 0;
        }
        radial_impulse(&mut self.field, center, radius, strength)
    }

    /// Single click in empty space: repulsion pulse with the default radius
    /// and strength. Clicks that land on a particle are ignored.
    pub fn click(&mut self, at: NVec2) -> usize {
        if !is_finite(&at) || self.particle_at(at).is_some() {
            return 0;
        }
        self.effects.ripple(at);
        self.apply_impulse(at, self.parameters.impulse_radius, self.parameters.impulse_strength)
    }

    pub fn toggle_interaction_mode(&mut self) -> InteractionMode {
        self.set_interaction_mode(self.mode.toggled());
        self.mode
    }

    pub fn set_interaction_mode(&mut self, mode: InteractionMode) {
        if mode != self.mode {
            self.mode = mode;
            self.effects.mode_indicator(mode);
            info!("{}", mode.label());
        }
    }

    // ---------------------------------------------------------------------
    // Clock and viewport
    // ---------------------------------------------------------------------

    pub fn pause(&mut self) {
        if self.running {
            self.running = false;
            info!("simulation paused at t = {:.2}s", self.field.t);
        }
    }

    pub fn resume(&mut self) {
        if !self.running {
            self.running = true;
            info!("simulation resumed at t = {:.2}s", self.field.t);
        }
    }

    /// Re-read the viewport and pull every particle back inside it
    pub fn resize(&mut self) {
        let bounds = self.viewport.viewport();
        for p in self.field.particles.iter_mut() {
            p.clamp_into(bounds);
        }
        info!("viewport resized to {:.0}x{:.0}", bounds.x, bounds.y);
    }

    fn random_velocity(&mut self, spread: f64) -> NVec2 {
        let half = 0.5 * spread.abs();
        if half == 0.0 {
            return NVec2::zeros();
        }
        NVec2::new(self.rng.gen_range(-half..half), self.rng.gen_range(-half..half))
    }
}

fn is_finite(v: &NVec2) -> bool {
    v.iter().all(|c| c.is_finite())
}
