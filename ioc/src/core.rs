//! Core, non-public data structures for the container.

use crate::callable::Descriptor;
use crate::value::Value;
use dashmap::DashMap;
use once_cell::sync::OnceCell;
use std::sync::Arc;

/// A registered factory.
#[derive(Clone)]
pub(crate) enum Provider {
  /// Invoked at most once; the cell serializes concurrent first access.
  Singleton {
    descriptor: Descriptor,
    cell: Arc<OnceCell<Value>>,
  },
  /// Invoked on every resolution.
  Transient { descriptor: Descriptor },
}

impl Provider {
  pub(crate) fn singleton(descriptor: Descriptor) -> Self {
    Provider::Singleton {
      descriptor,
      cell: Arc::new(OnceCell::new()),
    }
  }

  pub(crate) fn transient(descriptor: Descriptor) -> Self {
    Provider::Transient { descriptor }
  }

  pub(crate) fn kind(&self) -> &'static str {
    match self {
      Provider::Singleton { .. } => "singleton",
      Provider::Transient { .. } => "transient",
    }
  }
}

/// Everything [`flush`](crate::Container::flush) resets, swapped as a unit.
#[derive(Default)]
pub(crate) struct Registry {
  pub(crate) providers: DashMap<String, Provider>,
  pub(crate) instances: DashMap<String, Value>,
  pub(crate) aliases: DashMap<String, String>,
}

impl Registry {
  /// Normalizes `key` through the alias table.
  pub(crate) fn canonical(&self, key: &str) -> String {
    self
      .aliases
      .get(key)
      .map(|target| target.value().clone())
      .unwrap_or_else(|| key.to_owned())
  }

  pub(crate) fn contains(&self, key: &str) -> bool {
    let key = self.canonical(key);
    self.providers.contains_key(&key) || self.instances.contains_key(&key)
  }
}
