//! Deploy bigfunctions

use anyhow::{Context, Result};
use bigfun_core::{Catalog, ConfigStore, Dispatcher, target};

use crate::bigquery::BqDeployer;
use crate::prompt::TerminalPrompter;

/// Run the deploy command
pub async fn run(config_path: &str, folder: &str, bigfunction: &str, dry_run: bool) -> Result<()> {
    let catalog = Catalog::load(folder).context("Failed to read bigfunctions folder")?;
    tracing::debug!("Found {} bigfunctions in {}", catalog.len(), folder);

    tracing::debug!("Loading configuration from {}", config_path);
    let mut config = ConfigStore::load(config_path, Box::new(TerminalPrompter))
        .context("Failed to load configuration")?;

    let targets = target::resolve(bigfunction, &mut config, &catalog)
        .with_context(|| format!("Failed to resolve '{}'", bigfunction))?;

    let deployer = BqDeployer::new(folder, dry_run);
    let deployed = Dispatcher::new(&catalog, &deployer)
        .dispatch(&targets)
        .await
        .context("Deployment aborted")?;

    if dry_run {
        tracing::info!("Dry run: {} bigfunction(s) not deployed", deployed.len());
    } else {
        tracing::info!("✓ Deployed {} bigfunction(s)", deployed.len());
    }
    Ok(())
}
