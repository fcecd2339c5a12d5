//! Velocity contributors for the particle field
//!
//! Forces here act directly on velocity (pixels/tick per tick). The pointer
//! interaction term runs every tick through `ForceSet`; the radial impulse is
//! a one-shot kick used by clicks.

use crate::simulation::states::{Field, NVec2};

/// Whether pointer proximity pulls particles in or pushes them away
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionMode {
    Attraction,
    Repulsion,
}

impl InteractionMode {
    pub fn toggled(self) -> Self {
        match self {
            InteractionMode::Attraction => InteractionMode::Repulsion,
            InteractionMode::Repulsion => InteractionMode::Attraction,
        }
    }

    /// +1 toward the pointer, -1 away from it
    pub fn sign(self) -> f64 {
        match self {
            InteractionMode::Attraction => 1.0,
            InteractionMode::Repulsion => -1.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            InteractionMode::Attraction => "Attraction Mode",
            InteractionMode::Repulsion => "Repulsion Mode",
        }
    }
}

/// Per-tick inputs shared by every force term
#[derive(Debug, Clone, Copy)]
pub struct ForceContext {
    pub pointer: Option<NVec2>,
    pub mode: InteractionMode,
}

/// Collection of velocity terms. Contributions are summed into one velocity
/// delta per particle; dragged particles always receive zero.
pub struct ForceSet {
    terms: Vec<Box<dyn Acceleration + Send + Sync>>,
}

impl ForceSet {
    /// Create an empty force set
    pub fn new() -> Self {
        Self { terms: Vec::new() }
    }

    /// Add a term
    pub fn with<T>(mut self, term: T) -> Self
    where
        T: Acceleration + Send + Sync + 'static,
    {
        self.terms.push(Box::new(term));
        self
    }

    /// Compute velocity deltas for every particle in `field`
    /// - `out[i]` is the sum over all terms, zero for dragged particles
    pub fn accumulate(&self, ctx: &ForceContext, field: &Field, out: &mut [NVec2]) {
        for a in out.iter_mut() {
            *a = NVec2::zeros();
        }
        for term in &self.terms {
            term.acceleration(ctx, field, out);
        }
        for (p, a) in field.particles.iter().zip(out.iter_mut()) {
            if p.is_dragging() {
                *a = NVec2::zeros();
            }
        }
    }
}

impl Default for ForceSet {
    fn default() -> Self {
        Self::new()
    }
}

/// A velocity source; implementations add into `out[i]`
pub trait Acceleration {
    fn acceleration(&self, ctx: &ForceContext, field: &Field, out: &mut [NVec2]);
}

/// Falloff of pointer influence: `(radius - d) / radius` for `0 < d < radius`,
/// `None` otherwise (including the zero-distance case)
pub fn proximity(d: f64, radius: f64) -> Option<f64> {
    if radius > 0.0 && d > 0.0 && d < radius {
        Some((radius - d) / radius)
    } else {
        None
    }
}

/// Pointer attraction/repulsion with linear falloff
pub struct PointerInteraction {
    pub radius: f64,
    pub max_force: f64,
}

impl Acceleration for PointerInteraction {
    fn acceleration(&self, ctx: &ForceContext, field: &Field, out: &mut [NVec2]) {
        let Some(pointer) = ctx.pointer else {
            return;
        };
        let sign = ctx.mode.sign();

        for (p, a) in field.particles.iter().zip(out.iter_mut()) {
            // r points from the particle to the pointer
            let r = pointer - p.center();
            let d = r.norm();
            if let Some(falloff) = proximity(d, self.radius) {
                *a += (sign * self.max_force * falloff / d) * r;
            }
        }
    }
}

/// Kick every free particle within `radius` of `center` outward by
/// `strength * (radius - d) / radius`. Negative inputs are clamped to zero.
/// Returns how many particles were pushed.
pub fn radial_impulse(field: &mut Field, center: NVec2, radius: f64, strength: f64) -> usize {
    let radius = radius.max(0.0);
    let strength = strength.max(0.0);
    let mut pushed = 0;

    for p in field.particles.iter_mut().filter(|p| !p.is_dragging()) {
        let r = p.center() - center;
        let d = r.norm();
        if let Some(falloff) = proximity(d, radius) {
            p.v += (strength * falloff / d) * r;
            pushed += 1;
        }
    }
    pushed
}
