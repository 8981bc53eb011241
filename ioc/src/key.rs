//! Canonical string identities for types and registration keys.

use std::any::{type_name, Any, TypeId};
use std::borrow::{Borrow, Cow};
use std::fmt;

/// The canonical identity of a type, or an explicit registration key.
///
/// Keys derived from a type are built from [`std::any::type_name`]. Closures
/// all share the `{{closure}}` path segment of their enclosing item, so their
/// keys additionally carry the [`TypeId`] of the closure, which is unique per
/// definition site.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeKey(Cow<'static, str>);

impl TypeKey {
  /// Returns the key for type `T`.
  pub fn of<T: ?Sized + Any>() -> Self {
    let name = type_name::<T>();
    if name.contains("{{closure}}") {
      Self(Cow::Owned(format!("{}#{:?}", name, TypeId::of::<T>())))
    } else {
      Self(Cow::Borrowed(name))
    }
  }

  /// Returns the key for the type of `value`.
  pub fn of_val<T: ?Sized + Any>(_value: &T) -> Self {
    Self::of::<T>()
  }

  /// Wraps an explicit registration key such as `"config"`.
  pub fn named(key: impl Into<String>) -> Self {
    Self(Cow::Owned(key.into()))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Debug for TypeKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "TypeKey({})", self.0)
  }
}

impl fmt::Display for TypeKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl Borrow<str> for TypeKey {
  fn borrow(&self) -> &str {
    &self.0
  }
}

impl AsRef<str> for TypeKey {
  fn as_ref(&self) -> &str {
    &self.0
  }
}

impl From<&str> for TypeKey {
  fn from(key: &str) -> Self {
    Self::named(key)
  }
}

impl From<String> for TypeKey {
  fn from(key: String) -> Self {
    Self::named(key)
  }
}
