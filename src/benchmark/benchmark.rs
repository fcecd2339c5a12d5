use std::time::Instant;

use crate::simulation::engine::Engine;
use crate::simulation::input::{FixedViewport, NoPointer};
use crate::simulation::params::Parameters;
use crate::simulation::simulator::Simulator;
use crate::simulation::states::{NVec2, SizeClass};

const TICKS: usize = 200;

/// Time `Simulator::tick` for growing particle counts.
/// The pair pass is a direct O(N^2) sweep, so the cost per tick should
/// roughly quadruple with each doubling of N.
pub fn bench_tick() {
    // Different field sizes to test
    let ns = [25, 50, 100, 200, 400, 800, 1600];

    for n in ns {
        let engine = Engine {
            max_particles: n,
            small_viewport_width: 0.0,
            small_viewport_max_particles: n,
            spawn_interval: 0.0,
            initial_spawn_count: 0,
        };
        let viewport = NVec2::new(1920.0, 1080.0);
        let mut sim = Simulator::new(engine, Parameters::default(), NoPointer, FixedViewport(viewport), Some(42));

        for i in 0..n {
            let i_f = i as f64;
            // deterministic positions, no rand needed
            let x = NVec2::new(
                (0.5 + 0.45 * (i_f * 0.37).sin()) * viewport.x,
                (0.5 + 0.45 * (i_f * 0.13).cos()) * viewport.y,
            );
            let v = NVec2::new((i_f * 0.07).sin() * 2.0, (i_f * 0.11).cos() * 2.0);
            sim.spawn(Some(SizeClass::ALL[i % 4]), Some(x), Some(v));
        }

        // Warm up
        sim.tick(1.0 / 60.0);

        let t0 = Instant::now();
        for _ in 0..TICKS {
            sim.tick(1.0 / 60.0);
        }
        let per_tick = t0.elapsed().as_secs_f64() / TICKS as f64;

        println!("N = {n:5}, tick = {:10.3} us", per_tick * 1e6);
    }
}
