//! BigFun Core Library
//!
//! This crate provides the core functionality for the `bigfun` CLI:
//! - Configuration store with prompt-on-missing defaults
//! - Function catalog and definition parsing
//! - Target identifier parsing and resolution
//! - Deployment dispatch
//! - Markdown documentation and folder watching
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ Identifier  │────▶│  Resolver   │────▶│ Dispatcher  │────▶ Deployer
//! │ (p.d.name)  │     │ + Config    │     │ + Catalog   │
//! └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use bigfun_core::{Catalog, ConfigStore, Dispatcher, target};
//!
//! let catalog = Catalog::load("bigfunctions")?;
//! let mut config = ConfigStore::load("config.yaml", prompter)?;
//! let targets = target::resolve("us.sum", &mut config, &catalog)?;
//! Dispatcher::new(&catalog, &deployer).dispatch(&targets).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod catalog;
pub mod config;
pub mod definition;
pub mod dispatch;
pub mod docs;
pub mod error;
pub mod target;
pub mod watch;

pub use catalog::Catalog;
pub use config::{ConfigStore, Prompter};
pub use definition::BigFunction;
pub use dispatch::{Deployer, Dispatcher};
pub use docs::DocsGenerator;
pub use error::{Error, Result};
pub use target::{QualifiedName, ResolvedTargets, TargetIdentifier};
pub use watch::DefinitionWatcher;
