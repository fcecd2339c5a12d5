//! Pairwise particle collisions
//!
//! Direct O(N^2) sweep over unordered pairs. Each touching, approaching pair
//! gets a mass-weighted elastic impulse along the contact normal and is pushed
//! apart by its overlap.

use crate::simulation::states::{Field, NVec2, Particle};

/// Resolve every colliding pair in `field`
/// Returns the contact midpoints of the pairs that were resolved
pub fn resolve_collisions(field: &mut Field) -> Vec<NVec2> {
    let n = field.particles.len();
    let mut contacts = Vec::new();

    // Loop over each unordered pair (i, j) with i < j
    for i in 0..n {
        for j in (i + 1)..n {
            let (left, right) = field.particles.split_at_mut(j);
            let (pi, pj) = (&mut left[i], &mut right[0]);

            if pi.is_dragging() || pj.is_dragging() {
                continue;
            }

            if resolve_pair(pi, pj) {
                contacts.push(0.5 * (pi.center() + pj.center()));
            }
        }
    }
    contacts
}

/// Collide two particles if their discs overlap.
/// Returns `true` when an impulse was applied.
pub fn resolve_pair(p1: &mut Particle, p2: &mut Particle) -> bool {
    // r points from p2 to p1
    let r = p1.center() - p2.center();
    let distance = r.norm();
    let min_distance = p1.radius() + p2.radius();

    // Coincident centres have no normal
    if distance >= min_distance || distance == 0.0 {
        return false;
    }

    let n = r / distance;

    // Relative velocity along the normal; positive means already separating
    let speed = (p1.v - p2.v).dot(&n);
    if speed > 0.0 {
        return false;
    }

    let (m1, m2) = (p1.mass(), p2.mass());
    let impulse = 2.0 * speed / (m1 + m2);

    // Equal and opposite momentum change: m1 dv1 = -m2 dv2
    p1.v -= impulse * m2 * n;
    p2.v += impulse * m1 * n;

    // Push apart, half the overlap each
    let separation = 0.5 * (min_distance - distance) * n;
    p1.x += separation;
    p2.x -= separation;

    true
}
