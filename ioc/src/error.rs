//! Error types for the container.

use thiserror::Error;

/// The error type for every fallible container operation.
#[derive(Debug, Error)]
pub enum Error {
  #[error("Factory for '{key}' must return exactly one value, found {found}")]
  InvalidFactorySignature { key: String, found: usize },

  #[error("'{name}' cannot be invoked: {reason}")]
  NotCallable { name: String, reason: String },

  #[error("Argument {index} of '{name}' expects {expected}, got {actual}")]
  ArgumentMismatch {
    name: String,
    index: usize,
    expected: String,
    actual: String,
  },

  #[error(
    "Cannot inject field '{field}' of {target}: declared type is {declared}, resolved value is {actual}"
  )]
  FieldTypeMismatch {
    target: String,
    field: String,
    declared: String,
    actual: String,
  },

  #[error("No value could be resolved for {type_name}, and the type has no zero value")]
  Unresolved { type_name: String },

  #[error("Failed to read configuration file: {0}")]
  ConfigRead(#[from] std::io::Error),

  #[error("Failed to parse configuration: {0}")]
  ConfigParse(String),
}

/// A specialized `Result` type for container operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
