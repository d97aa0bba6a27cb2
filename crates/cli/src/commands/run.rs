use std::{
    fs,
    path::{Path, PathBuf},
    time::Instant,
};

use anyhow::{Context, Result};
use clap::Args;
use rayon::prelude::*;
use tracing::{info, warn};
use trafflow_observers::{DensityBounds, Progress};
use trafflow_traffic::{
    Parameters, Scenario, VelocityLaw,
    field::Interpolant,
    simulate, table,
    tracer::Trajectory,
};

use super::{StrategyArg, load_scenario};

#[derive(Args)]
pub struct RunArgs {
    /// Scenario file (TOML); the reference run if omitted
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory for snapshot and trajectory tables
    #[arg(short, long, default_value = "output")]
    pub out_dir: PathBuf,

    /// Density interpolation, overriding the scenario
    #[arg(long, value_enum)]
    pub strategy: Option<StrategyArg>,

    /// Abort a density run as soon as it leaves [0, u_max]
    #[arg(long)]
    pub stop_on_violation: bool,

    /// Log progress every this many percent
    #[arg(long, default_value = "10")]
    pub progress: usize,
}

/// What one exponent produced.
struct Summary {
    exponent: f64,
    frames: usize,
    violations: usize,
    trajectories: Vec<Trajectory>,
}

pub fn execute(args: &RunArgs) -> Result<()> {
    let mut scenario = load_scenario(args.config.as_deref())?;
    if let Some(strategy) = args.strategy {
        scenario.strategy = strategy.into();
    }

    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("failed to create {}", args.out_dir.display()))?;

    let start = Instant::now();
    let runs: Vec<Parameters> = scenario.runs().collect();
    info!(runs = runs.len(), strategy = ?scenario.strategy, "starting scenario");

    let summaries = runs
        .par_iter()
        .map(|params| run_exponent(params, &scenario, args))
        .collect::<Result<Vec<_>>>()?;

    for summary in &summaries {
        for trajectory in &summary.trajectories {
            if let Some(end) = trajectory.last() {
                info!(
                    exponent = summary.exponent,
                    tracer = %trajectory.label(),
                    position = end.position,
                    speed = end.speed,
                    "tracer finished"
                );
            }
        }
        info!(
            exponent = summary.exponent,
            frames = summary.frames,
            violations = summary.violations,
            tracers = summary.trajectories.len(),
            "run finished"
        );
    }
    info!(elapsed = ?start.elapsed(), out_dir = %args.out_dir.display(), "scenario complete");
    Ok(())
}

fn run_exponent(params: &Parameters, scenario: &Scenario, args: &RunArgs) -> Result<Summary> {
    let p = params.exponent;

    let courant = params.courant_number();
    if courant > 1.0 {
        warn!(exponent = p, courant, "Courant number above one, expect violations");
    }

    let mut bounds = DensityBounds::new(params.u_max).with_tolerance(1e-12);
    if args.stop_on_violation {
        bounds = bounds.stop_on_violation();
    }
    let mut progress = Progress::new(format!("p = {p}"), params.steps(), args.progress);

    let run = simulate(params, scenario.sample_every, (&mut bounds, &mut progress))
        .with_context(|| format!("density run for p = {p} failed"))?;
    if let Some(violation) = bounds.first_violation() {
        warn!(
            exponent = p,
            step = violation.step,
            node = violation.node,
            value = violation.value,
            "density run left [0, u_max]"
        );
    }

    let density_path = output_path(&args.out_dir, "density", p);
    table::save_snapshots(&density_path, &run.series, scenario.time_precision)
        .with_context(|| format!("failed to write {}", density_path.display()))?;

    // Tracers follow the persisted table, not the in-memory run.
    let grid = params.grid()?;
    let field = Interpolant::from_table(
        fs::File::open(&density_path)
            .with_context(|| format!("failed to open {}", density_path.display()))?,
        &grid,
        scenario.strategy,
    )
    .with_context(|| format!("failed to interpolate {}", density_path.display()))?;
    let law = VelocityLaw::new(field, params);

    let integrator = scenario.tracers.integrator(params)?;
    let start_times = scenario.tracers.start_times(&run.series);
    let trajectories = start_times
        .par_iter()
        .map(|&t0| integrator.integrate(&law, t0, scenario.tracers.start_position))
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("tracer integration for p = {p} failed"))?;

    let trajectory_path = output_path(&args.out_dir, "trajectories", p);
    table::save_trajectories(&trajectory_path, &trajectories)
        .with_context(|| format!("failed to write {}", trajectory_path.display()))?;

    Ok(Summary {
        exponent: p,
        frames: run.series.len(),
        violations: bounds.steps_violated(),
        trajectories,
    })
}

/// Returns `out_dir/{stem}_p{exponent}.csv`.
fn output_path(out_dir: &Path, stem: &str, exponent: f64) -> PathBuf {
    out_dir.join(format!("{stem}_p{exponent}.csv"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_names_follow_the_exponent() {
        let dir = Path::new("out");
        assert_eq!(output_path(dir, "density", 1.0), dir.join("density_p1.csv"));
        assert_eq!(output_path(dir, "trajectories", 2.5), dir.join("trajectories_p2.5.csv"));
    }
}
