//! The type-erased value that flows through the container.

use crate::key::TypeKey;
use std::any::{type_name, Any};
use std::fmt;
use std::sync::Arc;

/// A shared, type-erased value tagged with the [`TypeKey`] of its payload.
///
/// Cloning a `Value` clones the handle, never the payload, so a value stored
/// with [`Container::instance`](crate::Container::instance) comes back from
/// `get` as the very same allocation.
#[derive(Clone)]
pub struct Value {
  key: TypeKey,
  type_name: &'static str,
  inner: Arc<dyn Any + Send + Sync>,
}

impl Value {
  /// Wraps `value` as a fresh, uniquely owned payload.
  pub fn new<T: Any + Send + Sync>(value: T) -> Self {
    Self::from_arc(Arc::new(value))
  }

  /// Wraps an existing shared handle without copying the payload.
  pub fn from_arc<T: Any + Send + Sync>(value: Arc<T>) -> Self {
    Self {
      key: TypeKey::of::<T>(),
      type_name: type_name::<T>(),
      inner: value,
    }
  }

  pub fn type_key(&self) -> &TypeKey {
    &self.key
  }

  /// The human-readable type name of the payload.
  pub fn type_name(&self) -> &'static str {
    self.type_name
  }

  pub fn is<T: Any>(&self) -> bool {
    self.inner.is::<T>()
  }

  pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
    self.inner.downcast_ref::<T>()
  }

  /// Returns a shared handle to the payload if it is a `T`.
  pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
    self.inner.clone().downcast::<T>().ok()
  }

  /// Moves the payload out when this is the last handle to it. Otherwise the
  /// value is handed back untouched.
  pub fn take<T: Any + Send + Sync>(self) -> Result<T, Value> {
    let Value {
      key,
      type_name,
      inner,
    } = self;
    match inner.downcast::<T>() {
      Ok(typed) => Arc::try_unwrap(typed).map_err(|shared| Value {
        key,
        type_name,
        inner: shared,
      }),
      Err(inner) => Err(Value {
        key,
        type_name,
        inner,
      }),
    }
  }

  /// True when both handles point at the same payload.
  pub fn ptr_eq(&self, other: &Value) -> bool {
    Arc::ptr_eq(&self.inner, &other.inner)
  }
}

impl fmt::Debug for Value {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Value").field("type", &self.type_name).finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_clone_shares_payload() {
    let value = Value::new(String::from("shared"));
    let copy = value.clone();

    assert!(value.ptr_eq(&copy));
    assert_eq!(copy.downcast_ref::<String>().unwrap(), "shared");
    assert_eq!(value.type_key(), &TypeKey::of::<String>());
  }

  #[test]
  fn test_take_requires_unique_handle() {
    let value = Value::new(7u32);
    let copy = value.clone();

    let value = value.take::<u32>().unwrap_err();
    drop(copy);
    assert_eq!(value.take::<u32>().unwrap(), 7);
  }

  #[test]
  fn test_take_wrong_type_hands_value_back() {
    let value = Value::new(7u32);
    let value = value.take::<i64>().unwrap_err();
    assert!(value.is::<u32>());
  }

  #[test]
  fn test_from_arc_preserves_identity() {
    let shared = Arc::new(vec![1, 2, 3]);
    let value = Value::from_arc(shared.clone());
    assert!(Arc::ptr_eq(&shared, &value.downcast::<Vec<i32>>().unwrap()));
  }
}
