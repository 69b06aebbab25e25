//! Error types for bigfun-core

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for bigfun-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in bigfun-core
#[derive(Error, Debug)]
pub enum Error {
    /// A setting was requested that has no prompt or default
    #[error("unknown configuration setting '{key}'")]
    UnknownSetting {
        /// Requested setting name
        key: String,
    },

    /// The configuration file exists but could not be read
    #[error("failed to read configuration file {}: {source}", path.display())]
    ConfigRead {
        /// Configuration file path
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// The configuration file could not be written
    #[error("failed to write configuration file {}: {source}", path.display())]
    ConfigWrite {
        /// Configuration file path
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// The configuration file is not a flat mapping
    #[error("invalid configuration file {}: {message}", path.display())]
    ConfigParse {
        /// Configuration file path
        path: PathBuf,
        /// Description of what's invalid
        message: String,
    },

    /// The operator could not be prompted for a setting
    #[error("could not prompt \"{prompt}\": {message}")]
    Prompt {
        /// Prompt text shown to the operator
        prompt: String,
        /// Description of the failure
        message: String,
    },

    /// Identifier has more segments than `project.dataset.name`
    #[error(
        "malformed bigfunction identifier '{identifier}': expected '*', 'name', 'dataset.name' or 'project.dataset.name'"
    )]
    MalformedIdentifier {
        /// Identifier as given by the operator
        identifier: String,
    },

    /// Function name is not in the definitions folder
    #[error("could not find {name} bigfunction in {}", folder.display())]
    UnknownFunction {
        /// Requested function name
        name: String,
        /// Definitions folder that was searched
        folder: PathBuf,
    },

    /// The definitions folder does not exist
    #[error("bigfunctions folder not found: {}", path.display())]
    DefinitionsNotFound {
        /// Folder that was expected
        path: PathBuf,
    },

    /// A definition file could not be turned into DDL or docs
    #[error("invalid bigfunction '{name}': {message}")]
    InvalidDefinition {
        /// Function name
        name: String,
        /// Description of the error
        message: String,
    },

    /// The warehouse rejected a deployment
    #[error("failed to deploy {target}: {message}")]
    Deploy {
        /// Qualified name being deployed
        target: String,
        /// Description of the error
        message: String,
    },

    /// Template rendering error
    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),

    /// Filesystem watch error
    #[error("watch error: {0}")]
    Watch(#[from] notify::Error),

    /// Failed to parse YAML
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
