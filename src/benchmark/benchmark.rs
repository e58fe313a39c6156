use std::time::Instant;

use crate::error::SimResult;
use crate::simulation::params::{AU, DAY_SEC};
use crate::simulation::scheduler::{ParallelStepScheduler, RunConfig};
use crate::simulation::states::{Body, OrbitalElements};
use crate::simulation::system::System;

/// Helper to build a star with `n - 1` planets on staggered orbits
fn make_system(n: usize) -> SimResult<System> {
    let mut sys = System::new();
    let sun = sys.add_body(Body::new("sun", 1.9885e30, 696_342_000.0))?;

    for k in 1..n {
        let k_f = k as f64;
        // deterministic elements, no rand needed
        let elements = OrbitalElements::new(0.3 * AU + 0.05 * AU * k_f, 0.01 + (k_f * 0.37).sin().abs() * 0.2, (k_f * 0.13).cos() * 5.0)
            .with_argument_of_periapsis(k_f * 37.0 % 360.0)
            .with_longitude_of_ascending_node(k_f * 71.0 % 360.0)
            .with_eccentric_anomaly(k_f * 0.7);
        let planet = sys.add_body(Body::new(format!("planet-{k}"), 1.0e24, 6.0e6))?;
        sys.add_satellite(sun, planet, elements)?;
    }
    sys.center_on_barycenter();
    Ok(sys)
}

/// Time sequential and threaded stepping for a few system sizes
pub fn bench_step() -> SimResult<()> {
    let ns = [2, 4, 8, 16, 32, 64];
    let steps = 200; // steps per measurement

    for n in ns {
        let template = make_system(n)?;

        // Sequential
        let mut seq = template.clone();
        let seq_total = seq.run(DAY_SEC, steps);
        let seq_per_step = seq_total.as_secs_f64() / steps as f64;

        // Threaded
        let mut par = template.clone();
        let report = ParallelStepScheduler::new(RunConfig::new(DAY_SEC, steps)).run(&mut par)?;
        let par_per_step = report.elapsed.as_secs_f64() / steps as f64;

        println!("N = {:3}, sequential step = {:10.3e} s,   threaded step = {:10.3e} s", n, seq_per_step, par_per_step);
    }
    Ok(())
}

/// CSV of per-step milliseconds against body count
/// Paste output directly into a spreadsheet to graph
pub fn bench_step_curve() -> SimResult<()> {
    println!("N,sequential_ms,threaded_ms");

    for n in (2..=64).step_by(2) {
        let steps = if n <= 16 { 500 } else { 100 };
        let template = make_system(n)?;

        let mut seq = template.clone();
        let t0 = Instant::now();
        for _ in 0..steps {
            seq.step(DAY_SEC);
        }
        let ms_seq = t0.elapsed().as_secs_f64() * 1000.0 / steps as f64;

        let mut par = template.clone();
        let report = ParallelStepScheduler::new(RunConfig::new(DAY_SEC, steps)).run(&mut par)?;
        let ms_par = report.elapsed.as_secs_f64() * 1000.0 / steps as f64;

        println!("{},{:.6},{:.6}", n, ms_seq, ms_par);
    }
    Ok(())
}
