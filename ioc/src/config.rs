//! Container configuration.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// What happens when auto-constructing a dependency fails part-way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstructionPolicy {
  /// Log a warning and hand out the type's zero value.
  #[default]
  Lenient,
  /// Fail the enclosing `get`, `call` or `inject`.
  Strict,
}

/// Settings for a [`Container`](crate::Container).
///
/// ```yaml
/// construction: strict
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContainerConfig {
  #[serde(default)]
  pub construction: ConstructionPolicy,
}

impl ContainerConfig {
  pub fn strict() -> Self {
    Self {
      construction: ConstructionPolicy::Strict,
    }
  }

  pub fn from_yaml_str(source: &str) -> Result<Self> {
    serde_yaml::from_str(source).map_err(|e| Error::ConfigParse(e.to_string()))
  }

  pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
    let file = File::open(path)?;
    serde_yaml::from_reader(BufReader::new(file)).map_err(|e| Error::ConfigParse(e.to_string()))
  }
}
