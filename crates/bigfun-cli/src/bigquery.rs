//! BigQuery deployer backed by the `bq` command line tool

use std::path::PathBuf;

use async_trait::async_trait;
use bigfun_core::catalog::load_definition;
use bigfun_core::{Deployer, Error, QualifiedName, Result};
use tokio::process::Command;

/// Deploys definitions by running `CREATE OR REPLACE FUNCTION` through `bq`
pub struct BqDeployer {
    definitions: PathBuf,
    dry_run: bool,
}

impl BqDeployer {
    /// Deploy definitions read from `definitions`.
    ///
    /// With `dry_run` the DDL is printed instead of executed.
    pub fn new(definitions: impl Into<PathBuf>, dry_run: bool) -> Self {
        Self {
            definitions: definitions.into(),
            dry_run,
        }
    }
}

#[async_trait]
impl Deployer for BqDeployer {
    async fn deploy(&self, target: &str) -> Result<()> {
        let target = QualifiedName::parse(target)?;
        let function = load_definition(&self.definitions, &target.name)?;
        let ddl = function.create_statement(&target.project, &target.dataset)?;

        if self.dry_run {
            println!("-- {}\n{};\n", target, ddl);
            return Ok(());
        }

        tracing::debug!("Running DDL:\n{}", ddl);

        let output = Command::new("bq")
            .arg("query")
            .arg(format!("--project_id={}", target.project))
            .args(["--nouse_legacy_sql", "--quiet"])
            .arg(&ddl)
            .output()
            .await
            .map_err(|e| Error::Deploy {
                target: target.to_string(),
                message: format!("failed to run bq: {}", e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            let message = if stderr.trim().is_empty() {
                stdout.trim().to_string()
            } else {
                stderr.trim().to_string()
            };
            return Err(Error::Deploy {
                target: target.to_string(),
                message,
            });
        }

        tracing::info!("✓ {}", target);
        Ok(())
    }
}
