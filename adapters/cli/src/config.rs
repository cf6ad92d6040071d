//! Loading of simulation tuning from TOML files.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use tower_defence_core::SimulationConfig;

/// Reads tuning from `path`, or returns the defaults when no path is given.
///
/// Keys missing from the file keep their default values.
pub(crate) fn load(path: Option<&Path>) -> Result<SimulationConfig> {
    let Some(path) = path else {
        return Ok(SimulationConfig::default());
    };

    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read simulation config at {}", path.display()))?;
    parse(&contents).with_context(|| format!("invalid simulation config at {}", path.display()))
}

fn parse(contents: &str) -> Result<SimulationConfig> {
    let config: SimulationConfig =
        toml::from_str(contents).context("failed to parse simulation config toml contents")?;
    config.validate()?;
    Ok(config)
}
