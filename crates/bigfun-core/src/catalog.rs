//! Function catalog
//!
//! The set of bigfunction names found in the definitions folder. Names are
//! file names with the `.yaml` / `.yml` extension stripped. A name defined
//! by both a `.yaml` and a `.yml` file is listed once and loads from `.yaml`.
//! Files whose name would contain a `.` are skipped, since a dotted name
//! cannot be told apart from a qualified identifier.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::definition::BigFunction;
use crate::error::{Error, Result};

/// Default folder holding one definition file per function
pub const DEFAULT_FOLDER: &str = "bigfunctions";

/// Snapshot of the definitions folder
#[derive(Debug, Clone)]
pub struct Catalog {
    folder: PathBuf,
    names: Vec<String>,
}

impl Catalog {
    /// Read the function names in `folder`, sorted by file name
    pub fn load(folder: impl AsRef<Path>) -> Result<Self> {
        let folder = folder.as_ref().to_path_buf();
        if !folder.is_dir() {
            return Err(Error::DefinitionsNotFound { path: folder });
        }

        let entries = std::fs::read_dir(&folder)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file() && is_definition_file(p));

        let mut names = BTreeSet::new();
        for path in entries {
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if stem.contains('.') {
                tracing::warn!(
                    "Skipping {}: bigfunction names cannot contain '.'",
                    path.display()
                );
                continue;
            }
            if !names.insert(stem.to_string()) {
                tracing::warn!("{} is defined twice, using {}.yaml", stem, stem);
            }
        }

        Ok(Self {
            folder,
            names: names.into_iter().collect(),
        })
    }

    /// Build a catalog from known names without touching the filesystem
    pub fn from_names<I, S>(folder: impl Into<PathBuf>, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            folder: folder.into(),
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Folder the catalog was read from
    pub fn folder(&self) -> &Path {
        &self.folder
    }

    /// Function names in catalog order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of functions
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the folder held no definitions
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Whether `name` has a definition
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Load and parse the definition of `name`
    pub fn definition(&self, name: &str) -> Result<BigFunction> {
        load_definition(&self.folder, name)
    }

    /// Load every definition in catalog order
    pub fn definitions(&self) -> Result<Vec<BigFunction>> {
        self.names.iter().map(|n| self.definition(n)).collect()
    }
}

/// Load `<folder>/<name>.yaml` (or `.yml`)
pub fn load_definition(folder: &Path, name: &str) -> Result<BigFunction> {
    let path = ["yaml", "yml"]
        .iter()
        .map(|ext| folder.join(format!("{}.{}", name, ext)))
        .find(|p| p.is_file())
        .ok_or_else(|| Error::UnknownFunction {
            name: name.to_string(),
            folder: folder.to_path_buf(),
        })?;

    tracing::debug!("Loading definition {}", path.display());
    let contents = std::fs::read_to_string(&path)?;
    BigFunction::from_yaml(name, &contents).map_err(|e| Error::InvalidDefinition {
        name: name.to_string(),
        message: e.to_string(),
    })
}

fn is_definition_file(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext == "yaml" || ext == "yml")
}
