use anyhow::Result;
use log::debug;

use super::config::{Config, ConfigOverrides};
use crate::runtime::Runtime;

/// List every selection the wizard can reach with its asset and URL
#[tracing::instrument(skip(runtime, overrides))]
pub fn targets<R: Runtime>(runtime: R, overrides: ConfigOverrides) -> Result<()> {
    let config = Config::load(&runtime, overrides)?;
    let catalog = config.catalog(&runtime)?;

    let targets = catalog.targets()?;
    debug!("Catalog has {} target(s)", targets.len());

    for target in targets {
        println!(
            "{:<26} {:<28} {}",
            target.selection.to_string(),
            target.asset.as_str(),
            target.url(&config.base_url)
        );
    }

    Ok(())
}
