//! Short-lived cosmetic effects (ripples, trails, mode banner)
//!
//! Effects are fire-and-forget: the simulator emits them, they age with the
//! frame clock and drop out once their lifetime is over. Nothing in the
//! physics reads them.

use crate::simulation::forces::InteractionMode;
use crate::simulation::states::NVec2;

pub const RIPPLE_LIFETIME: f64 = 0.6;
pub const RIPPLE_RADIUS: f64 = 50.0;
pub const TRAIL_LIFETIME: f64 = 0.5;
pub const TRAIL_SCALE: f64 = 0.7;
pub const POINTER_TRAIL_LIFETIME: f64 = 0.3;
pub const POINTER_TRAIL_CHANCE: f64 = 0.1;
pub const INDICATOR_LIFETIME: f64 = 2.0;
/// Upper bound on simultaneously live effects. Past it the oldest trail or
/// ripple is dropped, so a stalled clock cannot grow the list without bound.
pub const MAX_LIVE_EFFECTS: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EffectKind {
    Ripple,
    Trail { diameter: f64 },
    PointerTrail,
    ModeIndicator(InteractionMode),
}

#[derive(Debug, Clone, Copy)]
pub struct Effect {
    pub kind: EffectKind,
    pub at: NVec2, // centre in screen pixels
    pub age: f64,
    pub lifetime: f64,
}

impl Effect {
    /// Fraction of the lifetime already spent, in [0, 1]
    pub fn progress(&self) -> f64 {
        if self.lifetime <= 0.0 {
            1.0
        } else {
            (self.age / self.lifetime).clamp(0.0, 1.0)
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Effects {
    live: Vec<Effect>,
}

impl Effects {
    pub fn ripple(&mut self, at: NVec2) {
        self.push(EffectKind::Ripple, at, RIPPLE_LIFETIME);
    }

    pub fn trail(&mut self, at: NVec2, particle_diameter: f64) {
        let kind = EffectKind::Trail {
            diameter: particle_diameter * TRAIL_SCALE,
        };
        self.push(kind, at, TRAIL_LIFETIME);
    }

    pub fn pointer_trail(&mut self, at: NVec2) {
        self.push(EffectKind::PointerTrail, at, POINTER_TRAIL_LIFETIME);
    }

    pub fn mode_indicator(&mut self, mode: InteractionMode) {
        // Only one banner at a time
        self.live.retain(|e| !matches!(e.kind, EffectKind::ModeIndicator(_)));
        self.push(EffectKind::ModeIndicator(mode), NVec2::zeros(), INDICATOR_LIFETIME);
    }

    /// Age every effect by `dt` seconds and drop the expired ones.
    /// Expiry needs `dt > 0`; a zero `dt` only leaves the cap in force.
    pub fn advance(&mut self, dt: f64) {
        for e in self.live.iter_mut() {
            e.age += dt;
        }
        self.live.retain(|e| e.age < e.lifetime);
    }

    pub fn clear(&mut self) {
        self.live.clear();
    }

    pub fn live(&self) -> &[Effect] {
        &self.live
    }

    fn push(&mut self, kind: EffectKind, at: NVec2, lifetime: f64) {
        if self.live.len() >= MAX_LIVE_EFFECTS {
            // The mode banner is kept over trails and ripples
            let oldest = self
                .live
                .iter()
                .position(|e| !matches!(e.kind, EffectKind::ModeIndicator(_)))
                .unwrap_or(0);
            self.live.remove(oldest);
        }
        self.live.push(Effect {
            kind,
            at,
            age: 0.0,
            lifetime,
        });
    }
}
