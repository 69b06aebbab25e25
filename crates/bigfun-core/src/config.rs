//! Configuration store
//!
//! Settings live in a flat YAML mapping (`config.yaml` by default). A setting
//! that is missing from the file is prompted for once, then written back so
//! later runs never ask again.
//!
//! # Recognized settings
//!
//! - `default_gcp_project` - project used when an identifier omits it
//! - `default_datasets` - comma separated datasets used when an identifier
//!   omits the dataset

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Setting holding the default GCP project
pub const DEFAULT_GCP_PROJECT: &str = "default_gcp_project";

/// Setting holding the comma separated default datasets
pub const DEFAULT_DATASETS: &str = "default_datasets";

/// A setting the store knows how to prompt for
#[derive(Debug, Clone, Copy)]
pub struct KnownSetting {
    /// Setting name as stored in the file
    pub key: &'static str,
    /// Text shown to the operator
    pub prompt: &'static str,
    /// Value used when the operator enters nothing
    pub default: &'static str,
}

/// Settings that may be prompted for
pub const KNOWN_SETTINGS: &[KnownSetting] = &[
    KnownSetting {
        key: DEFAULT_GCP_PROJECT,
        prompt: "Default GCP project where to deploy bigfunctions",
        default: "bigfunctions",
    },
    KnownSetting {
        key: DEFAULT_DATASETS,
        prompt: "Default dataset(s) where to deploy bigfunctions (comma separated if many)",
        default: "eu,us,asia_east1,asia_east2,asia_northeast1,asia_northeast2,asia_northeast3,\
                  asia_south1,asia_southeast1,australia_southeast1,europe_north1,europe_west1,\
                  europe_west2,europe_west3,europe_west4,europe_west6,northamerica_northeast1,\
                  southamerica_east1,us_central1,us_east1,us_east4,us_west1,us_west2",
    },
];

/// Look up the prompt and default for a setting
pub fn known_setting(key: &str) -> Option<&'static KnownSetting> {
    KNOWN_SETTINGS.iter().find(|s| s.key == key)
}

/// Asks the operator for a setting value
pub trait Prompter {
    /// Show `text` with `default` and return what the operator typed.
    ///
    /// An empty answer means "use the default".
    fn prompt(&mut self, text: &str, default: &str) -> Result<String>;
}

/// Persisted key-value settings with prompt-on-missing semantics
pub struct ConfigStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
    prompter: Box<dyn Prompter>,
}

impl std::fmt::Debug for ConfigStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigStore")
            .field("path", &self.path)
            .field("values", &self.values)
            .finish_non_exhaustive()
    }
}

impl ConfigStore {
    /// Load settings from `path`, or start empty if the file does not exist
    pub fn load(path: impl AsRef<Path>, prompter: Box<dyn Prompter>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let values = if path.exists() {
            let contents = std::fs::read_to_string(&path).map_err(|source| Error::ConfigRead {
                path: path.clone(),
                source,
            })?;
            parse_settings(&path, &contents)?
        } else {
            tracing::debug!("No configuration file at {}", path.display());
            BTreeMap::new()
        };

        Ok(Self {
            path,
            values,
            prompter,
        })
    }

    /// Path the store persists to
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Value of `key` if it is already set, without prompting
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Return the value of `key`, prompting for and persisting it if unset
    pub fn get_or_prompt(&mut self, key: &str) -> Result<String> {
        if let Some(value) = self.values.get(key) {
            return Ok(value.clone());
        }

        let setting = known_setting(key).ok_or_else(|| Error::UnknownSetting {
            key: key.to_string(),
        })?;

        let answer = self.prompter.prompt(setting.prompt, setting.default)?;
        let value = if answer.trim().is_empty() {
            setting.default.to_string()
        } else {
            answer.trim().to_string()
        };

        self.values.insert(key.to_string(), value.clone());
        self.persist()?;
        tracing::info!("Saved {} = {} in {}", key, value, self.path.display());

        Ok(value)
    }

    /// Default project for identifiers that omit it
    pub fn default_project(&mut self) -> Result<String> {
        self.get_or_prompt(DEFAULT_GCP_PROJECT)
    }

    /// Default datasets for identifiers that omit them.
    ///
    /// A value that holds no dataset name (e.g. `","`) is an error rather
    /// than an empty list, which would make every deploy a no-op.
    pub fn default_datasets(&mut self) -> Result<Vec<String>> {
        let value = self.get_or_prompt(DEFAULT_DATASETS)?;
        let datasets = split_list(&value);
        if datasets.is_empty() {
            return Err(Error::ConfigParse {
                path: self.path.clone(),
                message: format!("setting '{}' lists no datasets", DEFAULT_DATASETS),
            });
        }
        Ok(datasets)
    }

    /// Write every setting to the file, replacing it atomically
    fn persist(&self) -> Result<()> {
        let write_err = |source| Error::ConfigWrite {
            path: self.path.clone(),
            source,
        };

        let contents = serde_yaml::to_string(&self.values)?;

        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir).map_err(write_err)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(write_err)?;
        tmp.write_all(contents.as_bytes()).map_err(write_err)?;
        tmp.persist(&self.path).map_err(|e| write_err(e.error))?;

        Ok(())
    }
}

/// Split a comma separated setting into its non-empty, trimmed entries
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_settings(path: &Path, contents: &str) -> Result<BTreeMap<String, String>> {
    let invalid = |message: String| Error::ConfigParse {
        path: path.to_path_buf(),
        message,
    };

    let doc: serde_yaml::Value =
        serde_yaml::from_str(contents).map_err(|e| invalid(e.to_string()))?;

    let mapping = match doc {
        serde_yaml::Value::Null => return Ok(BTreeMap::new()),
        serde_yaml::Value::Mapping(m) => m,
        _ => return Err(invalid("expected a mapping of setting names to values".into())),
    };

    let mut values = BTreeMap::new();
    for (key, value) in mapping {
        let key = scalar_to_string(&key)
            .ok_or_else(|| invalid("setting names must be strings".into()))?;
        let value = match &value {
            serde_yaml::Value::Sequence(items) => items
                .iter()
                .map(scalar_to_string)
                .collect::<Option<Vec<_>>>()
                .map(|items| items.join(",")),
            other => scalar_to_string(other),
        }
        .ok_or_else(|| invalid(format!("setting '{}' must be a string or a list", key)))?;
        values.insert(key, value);
    }
    Ok(values)
}

fn scalar_to_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
