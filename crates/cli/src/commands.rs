pub mod run;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use trafflow_traffic::{Scenario, field::Strategy};

/// Interpolation strategy as accepted on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StrategyArg {
    Spline,
    Linear,
    Nearest,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Spline => Self::Spline,
            StrategyArg::Linear => Self::Linear,
            StrategyArg::Nearest => Self::Nearest,
        }
    }
}

/// Loads the scenario at `path`, or the reference scenario without one.
fn load_scenario(path: Option<&Path>) -> Result<Scenario> {
    match path {
        Some(path) => Scenario::load(path)
            .with_context(|| format!("failed to load scenario {}", path.display())),
        None => Ok(Scenario::default()),
    }
}
