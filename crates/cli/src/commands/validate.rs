use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use tracing::{info, warn};

use super::load_scenario;

#[derive(Args)]
pub struct ValidateArgs {
    /// Scenario file (TOML); the reference run if omitted
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

pub fn execute(args: &ValidateArgs) -> Result<()> {
    let scenario = load_scenario(args.config.as_deref())?;
    let params = &scenario.parameters;
    let grid = params.grid()?;

    info!(
        nodes = grid.len(),
        dx = params.dx,
        dt = params.dt,
        steps = params.steps(),
        "scenario is valid"
    );

    let mut unstable = 0;
    for run in scenario.runs() {
        let courant = run.courant_number();
        if courant > 1.0 {
            warn!(exponent = run.exponent, courant, "unstable: Courant number above one");
            unstable += 1;
        } else {
            info!(exponent = run.exponent, courant, "stable");
        }
    }

    let integrator = scenario.tracers.integrator(params)?;
    info!(
        start_position = scenario.tracers.start_position,
        dt = integrator.dt(),
        horizon = integrator.horizon(),
        strategy = ?scenario.strategy,
        "tracers"
    );

    if unstable > 0 {
        anyhow::bail!("{unstable} run(s) would violate the CFL condition");
    }
    Ok(())
}
