//! Target identifiers
//!
//! Operators name what to deploy with a compact dotted identifier:
//!
//! | identifier              | project | datasets         | functions     |
//! |-------------------------|---------|------------------|---------------|
//! | `*`                     | default | default datasets | whole catalog |
//! | `name`                  | default | default datasets | `name`        |
//! | `dataset.name`          | default | `dataset`        | `name`        |
//! | `project.dataset.name`  | given   | `dataset`        | `name`        |
//!
//! Anything with more segments is malformed.

use std::fmt;

use crate::catalog::Catalog;
use crate::config::ConfigStore;
use crate::error::{Error, Result};

/// A parsed identifier, before defaults are applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetIdentifier {
    /// `*` - every function in the catalog
    Wildcard,
    /// `name`
    BareName {
        /// Function name
        name: String,
    },
    /// `dataset.name`
    DatasetQualified {
        /// Dataset
        dataset: String,
        /// Function name
        name: String,
    },
    /// `project.dataset.name`
    FullyQualified {
        /// GCP project
        project: String,
        /// Dataset
        dataset: String,
        /// Function name
        name: String,
    },
    /// Three or more dots
    Malformed {
        /// Identifier as given
        raw: String,
    },
}

impl TargetIdentifier {
    /// Classify `raw` by its shape
    pub fn parse(raw: &str) -> Self {
        if raw == "*" {
            return Self::Wildcard;
        }

        let segments: Vec<&str> = raw.split('.').collect();
        match segments.as_slice() {
            [name] => Self::BareName {
                name: name.to_string(),
            },
            [dataset, name] => Self::DatasetQualified {
                dataset: dataset.to_string(),
                name: name.to_string(),
            },
            [project, dataset, name] => Self::FullyQualified {
                project: project.to_string(),
                dataset: dataset.to_string(),
                name: name.to_string(),
            },
            _ => Self::Malformed {
                raw: raw.to_string(),
            },
        }
    }

    /// Expand into concrete targets, reading defaults from `config` as needed.
    ///
    /// Only the settings a shape actually needs are looked up, so a fully
    /// qualified identifier never prompts.
    pub fn resolve(&self, config: &mut ConfigStore, catalog: &Catalog) -> Result<ResolvedTargets> {
        let resolved = match self {
            Self::Wildcard => ResolvedTargets {
                project: config.default_project()?,
                datasets: config.default_datasets()?,
                names: catalog.names().to_vec(),
            },
            Self::BareName { name } => ResolvedTargets {
                project: config.default_project()?,
                datasets: config.default_datasets()?,
                names: vec![name.clone()],
            },
            Self::DatasetQualified { dataset, name } => ResolvedTargets {
                project: config.default_project()?,
                datasets: vec![dataset.clone()],
                names: vec![name.clone()],
            },
            Self::FullyQualified {
                project,
                dataset,
                name,
            } => ResolvedTargets {
                project: project.clone(),
                datasets: vec![dataset.clone()],
                names: vec![name.clone()],
            },
            Self::Malformed { raw } => {
                return Err(Error::MalformedIdentifier {
                    identifier: raw.clone(),
                });
            }
        };

        tracing::debug!(
            "Resolved to project {} with {} dataset(s) and {} function(s)",
            resolved.project,
            resolved.datasets.len(),
            resolved.names.len()
        );
        Ok(resolved)
    }
}

/// Parse and resolve `raw` in one step
pub fn resolve(raw: &str, config: &mut ConfigStore, catalog: &Catalog) -> Result<ResolvedTargets> {
    TargetIdentifier::parse(raw).resolve(config, catalog)
}

/// Concrete project, datasets and function names to deploy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTargets {
    /// GCP project
    pub project: String,
    /// Datasets, in deploy order
    pub datasets: Vec<String>,
    /// Function names, in deploy order
    pub names: Vec<String>,
}

impl ResolvedTargets {
    /// Every (dataset, name) pair: datasets outer, names inner
    pub fn pairs(&self) -> impl Iterator<Item = QualifiedName> + '_ {
        self.datasets.iter().flat_map(move |dataset| {
            self.names.iter().map(move |name| QualifiedName {
                project: self.project.clone(),
                dataset: dataset.clone(),
                name: name.clone(),
            })
        })
    }
}

/// `project.dataset.name`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    /// GCP project
    pub project: String,
    /// Dataset
    pub dataset: String,
    /// Function name
    pub name: String,
}

impl QualifiedName {
    /// Parse a string that must have exactly three segments
    pub fn parse(raw: &str) -> Result<Self> {
        match TargetIdentifier::parse(raw) {
            TargetIdentifier::FullyQualified {
                project,
                dataset,
                name,
            } => Ok(Self {
                project,
                dataset,
                name,
            }),
            _ => Err(Error::MalformedIdentifier {
                identifier: raw.to_string(),
            }),
        }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.project, self.dataset, self.name)
    }
}
