//! Windowless runner: steps the simulator at a fixed 60 Hz clock and logs
//! field statistics once per simulated second

use log::info;

use crate::simulation::scenario::Scenario;

const FRAME_DT: f64 = 1.0 / 60.0;

pub fn run_headless(mut scenario: Scenario, frames: usize) {
    info!("run_headless: {} frames", frames);

    for frame in 1..=frames {
        scenario.simulator.tick(FRAME_DT);

        if frame % 60 == 0 || frame == frames {
            let stats = scenario.simulator.stats();
            info!(
                "t = {:6.2}s  particles = {:3}  KE = {:10.3}  p = ({:8.3}, {:8.3})",
                scenario.simulator.time(),
                stats.count,
                stats.kinetic_energy,
                stats.momentum.x,
                stats.momentum.y
            );
        }
    }
}
