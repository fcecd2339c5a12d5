//! Core state types for the particle field.
//!
//! Defines the per-particle state (`Particle`), its size class lookup
//! (`SizeClass`) and the field holding the live set (`Field`).
//!
//! Positions are screen-space pixels: x grows to the right, y grows downward,
//! and `Particle::x` is the top-left corner of the particle's bounding box.

use nalgebra::Vector2;
use serde::Deserialize;

pub type NVec2 = Vector2<f64>;

/// Size class of a particle, fixed at creation
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum SizeClass {
    Small,
    Medium,
    Large,
    ExtraLarge,
}

/// Derived constants for one size class
#[derive(Debug, Clone, Copy)]
pub struct SizeSpec {
    pub diameter: f64, // pixels
    pub mass: f64,
    pub weight: f64, // spawn probability when no size is requested
}

// Diameter and mass share the same lookup value
const SIZE_TABLE: [SizeSpec; 4] = [
    SizeSpec { diameter: 8.0, mass: 8.0, weight: 0.4 },
    SizeSpec { diameter: 15.0, mass: 15.0, weight: 0.3 },
    SizeSpec { diameter: 25.0, mass: 25.0, weight: 0.2 },
    SizeSpec { diameter: 35.0, mass: 35.0, weight: 0.1 },
];

impl SizeClass {
    pub const ALL: [SizeClass; 4] = [
        SizeClass::Small,
        SizeClass::Medium,
        SizeClass::Large,
        SizeClass::ExtraLarge,
    ];

    pub fn spec(self) -> &'static SizeSpec {
        &SIZE_TABLE[self as usize]
    }

    pub fn diameter(self) -> f64 {
        self.spec().diameter
    }

    pub fn radius(self) -> f64 {
        0.5 * self.spec().diameter
    }

    pub fn mass(self) -> f64 {
        self.spec().mass
    }

    /// Pick a size class from a uniform sample `u` in [0, 1) using the
    /// cumulative spawn weights. Anything past the last bucket falls back to
    /// the smallest class.
    pub fn from_unit(u: f64) -> SizeClass {
        let mut cumulative = 0.0;
        for size in SizeClass::ALL {
            cumulative += size.spec().weight;
            if u <= cumulative {
                return size;
            }
        }
        SizeClass::Small
    }
}

/// Stable handle to a particle, never reused within one simulator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticleId(pub u32);

/// Free ⇄ Dragging
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragState {
    Free,
    Dragging {
        offset: NVec2, // pointer minus position at grab time
        fling: NVec2,  // last recorded pointer velocity, handed over on release
    },
}

#[derive(Debug, Clone)]
pub struct Particle {
    pub id: ParticleId,
    pub x: NVec2,      // position (top-left corner)
    pub v: NVec2,      // velocity, pixels per tick
    pub last_x: NVec2, // position before the latest drag update
    pub size: SizeClass,
    pub drag: DragState,
    pub glow: f64, // pointer proximity in [0, 1], for renderers
}

impl Particle {
    pub fn new(id: ParticleId, size: SizeClass, x: NVec2, v: NVec2) -> Self {
        Self {
            id,
            x,
            v,
            last_x: x,
            size,
            drag: DragState::Free,
            glow: 0.0,
        }
    }

    pub fn mass(&self) -> f64 {
        self.size.mass()
    }

    pub fn diameter(&self) -> f64 {
        self.size.diameter()
    }

    pub fn radius(&self) -> f64 {
        self.size.radius()
    }

    pub fn center(&self) -> NVec2 {
        self.x + NVec2::repeat(self.radius())
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }

    /// Largest allowed top-left position for a viewport of size `bounds`
    pub fn max_position(&self, bounds: NVec2) -> NVec2 {
        let d = self.diameter();
        NVec2::new((bounds.x - d).max(0.0), (bounds.y - d).max(0.0))
    }

    /// Clamp the position into `[0, bounds - diameter]` without touching velocity
    pub fn clamp_into(&mut self, bounds: NVec2) {
        let max = self.max_position(bounds);
        self.x.x = self.x.x.clamp(0.0, max.x);
        self.x.y = self.x.y.clamp(0.0, max.y);
    }
}

/// The live particle set plus the accumulated clock time `t` (seconds)
#[derive(Debug, Clone, Default)]
pub struct Field {
    pub particles: Vec<Particle>,
    pub t: f64,
}

impl Field {
    pub fn get(&self, id: ParticleId) -> Option<&Particle> {
        self.particles.iter().find(|p| p.id == id)
    }

    pub fn get_mut(&mut self, id: ParticleId) -> Option<&mut Particle> {
        self.particles.iter_mut().find(|p| p.id == id)
    }
}
