use orbsim::{ScenarioConfig, Scenario, ExecutionMode, VectorOps};
use orbsim::{bench_step, bench_step_curve};
use orbsim::{AU, YEAR_SEC};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(about = "Step a star and its satellites forward under Newtonian gravity")]
struct Args {
    /// Scenario file; bare names are looked up in `scenarios/`
    #[arg(short, default_value = "solar_system.yaml")]
    file_name: String,

    /// Override the number of steps
    #[arg(long)]
    steps: Option<u64>,

    /// Override the step size in seconds
    #[arg(long)]
    dt: Option<f64>,

    /// Use one worker thread per body
    #[arg(long)]
    threaded: bool,

    /// Run the sequential vs threaded timing table and exit
    #[arg(long)]
    bench: bool,

    /// With --bench: print a CSV curve instead of the table
    #[arg(long)]
    curve: bool,
}

// resolve here to keep main clean
fn scenario_path(file_name: &str) -> PathBuf {
    let direct = PathBuf::from(file_name);
    if direct.exists() {
        return direct;
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    if args.bench {
        if args.curve {
            bench_step_curve()?;
        } else {
            bench_step()?;
        }
        return Ok(());
    }

    let path = scenario_path(&args.file_name);
    let cfg = ScenarioConfig::from_path(&path)
        .with_context(|| format!("failed to load scenario {}", path.display()))?;

    let mut scenario = Scenario::build_scenario(cfg).context("failed to build scenario")?;
    if let Some(steps) = args.steps {
        scenario.parameters.steps = steps;
    }
    if let Some(dt) = args.dt {
        scenario.parameters.dt = dt;
    }
    if args.threaded {
        scenario.engine.mode = ExecutionMode::Threaded;
    }

    let report = scenario.run().context("simulation run failed")?;

    let sys = &scenario.system;
    info!(
        steps = report.steps_completed,
        years = sys.t / YEAR_SEC,
        wall = ?report.elapsed,
        energy = sys.total_energy(),
        "run complete"
    );
    for b in sys.bodies() {
        info!(
            name = b.name(),
            r_au = b.position.length() / AU,
            speed_km_s = b.velocity.length() / 1000.0,
            "final state"
        );
    }

    Ok(())
}
