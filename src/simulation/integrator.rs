//! Fixed-step integrator for the particle field
//!
//! One call advances every free particle by one display frame: apply the
//! force deltas, drift, bounce off the viewport edges, damp, bias downward
//! and jitter settled particles so nothing comes to rest for good.

use rand::Rng;

use super::params::Parameters;
use super::states::{Field, NVec2};

/// Advance all free particles by one tick
/// `dv[i]` is the velocity delta from the force set for particle `i`,
/// `bounds` the current viewport size
pub fn euler_step<R: Rng>(field: &mut Field, dv: &[NVec2], params: &Parameters, bounds: NVec2, rng: &mut R) {
    for (p, a) in field.particles.iter_mut().zip(dv.iter()) {
        if p.is_dragging() {
            continue;
        }

        // Kick: v += pointer force
        p.v += *a;

        // Drift: x += v
        p.x += p.v;

        // Bounce on each axis independently
        let max = p.max_position(bounds);
        reflect_axis(&mut p.x.x, &mut p.v.x, max.x, params.restitution);
        reflect_axis(&mut p.x.y, &mut p.v.y, max.y, params.restitution);

        p.v *= params.damping;
        p.v.y += params.gravity;

        if p.v.x.abs() < params.settle_threshold && p.v.y.abs() < params.settle_threshold {
            let half = 0.5 * params.settle_jitter;
            if half > 0.0 {
                p.v.x += rng.gen_range(-half..half);
                p.v.y += rng.gen_range(-half..half);
            }
        }
    }
}

/// Clamp `x` into `[0, max]`; if it had left that range, reverse and damp `v`
fn reflect_axis(x: &mut f64, v: &mut f64, max: f64, restitution: f64) {
    if *x < 0.0 || *x > max {
        *v *= -restitution;
        *x = x.clamp(0.0, max);
    }
}
