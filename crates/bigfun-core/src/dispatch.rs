//! Deployment dispatch
//!
//! Walks every (dataset, function) pair of a [`ResolvedTargets`] and hands the
//! qualified name to a [`Deployer`]. Pairs are deployed one at a time and the
//! first failure stops the walk; pairs already deployed stay deployed.

use async_trait::async_trait;

use crate::catalog::Catalog;
use crate::error::{Error, Result};
use crate::target::{QualifiedName, ResolvedTargets};

/// Pushes one function to the warehouse
#[async_trait]
pub trait Deployer: Send + Sync {
    /// Deploy `target`, normally `project.dataset.name`
    async fn deploy(&self, target: &str) -> Result<()>;
}

/// Deploys resolved targets after checking them against the catalog
pub struct Dispatcher<'a> {
    catalog: &'a Catalog,
    deployer: &'a dyn Deployer,
}

impl<'a> Dispatcher<'a> {
    /// Create a dispatcher validating against `catalog`
    pub fn new(catalog: &'a Catalog, deployer: &'a dyn Deployer) -> Self {
        Self { catalog, deployer }
    }

    /// Deploy every pair in order, returning the names that were deployed
    pub async fn dispatch(&self, targets: &ResolvedTargets) -> Result<Vec<QualifiedName>> {
        let mut deployed = Vec::new();

        for target in targets.pairs() {
            if !self.catalog.contains(&target.name) {
                return Err(Error::UnknownFunction {
                    name: target.name,
                    folder: self.catalog.folder().to_path_buf(),
                });
            }

            tracing::info!("Deploying {}", target);
            self.deployer.deploy(&target.to_string()).await?;
            deployed.push(target);
        }

        Ok(deployed)
    }
}
