//! The type-identity registry: how each resolvable type describes itself.
//!
//! Rust has no runtime reflection, so every type that can be a factory
//! parameter, a factory result or an injected field implements [`Component`].
//! The trait tells the container which [`TypeKey`] the type is grouped under,
//! how to pull it out of a type-erased [`Value`], which near-miss values it
//! accepts by conversion, what its zero value is and how to build it from
//! scratch.

use crate::container::Resolver;
use crate::error::Result;
use crate::key::TypeKey;
use crate::value::Value;
use std::any::{type_name, Any};
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// A type the container can resolve, store and hand out.
///
/// Every method has a default, so `impl Component for MyService {}` is a
/// complete implementation for a type that is only ever shared through
/// `Arc<MyService>`. Types that should also be resolvable by value override
/// [`from_value`](Component::from_value), usually with a clone. The
/// [`component!`](crate::component) and [`injectable!`](crate::injectable)
/// macros write these impls for you.
pub trait Component: Any + Send + Sync + Sized {
  /// True for the variadic element wrapper [`Rest`].
  const VARIADIC: bool = false;

  /// The key this type is grouped and looked up under.
  fn type_key() -> TypeKey {
    TypeKey::of::<Self>()
  }

  fn type_name() -> &'static str {
    type_name::<Self>()
  }

  /// Extracts a `Self` from a value that may be shared with others.
  fn from_value(_value: &Value) -> Option<Self> {
    None
  }

  /// Extracts a `Self`, moving the payload out when the handle is unique.
  fn from_owned(value: Value) -> Result<Self, Value> {
    match value.take::<Self>() {
      Ok(found) => Ok(found),
      Err(value) => Self::from_value(&value).ok_or(value),
    }
  }

  fn into_value(self) -> Value {
    Value::new(self)
  }

  /// Accepts a value of a different type that converts losslessly.
  fn convert(_value: &Value) -> Option<Self> {
    None
  }

  /// The zero value handed out when nothing else resolves.
  fn zero() -> Option<Self> {
    None
  }

  /// Builds a fresh `Self`, resolving its own dependencies through `cx`.
  fn construct(_cx: &mut Resolver<'_>) -> Result<Option<Self>> {
    Ok(None)
  }

  /// Resolution strategy for this type. The default runs the full chain:
  /// caller arguments, convertible caller arguments, container registrations
  /// and finally auto-construction.
  fn resolve(cx: &mut Resolver<'_>) -> Result<Option<Self>> {
    cx.resolve_chain::<Self>()
  }
}

macro_rules! integer_component {
  ($($ty:ty),* $(,)?) => {
    $(
      impl Component for $ty {
        fn from_value(value: &Value) -> Option<Self> {
          value.downcast_ref::<Self>().copied()
        }

        fn convert(value: &Value) -> Option<Self> {
          convert_integer::<Self>(value)
        }

        fn zero() -> Option<Self> {
          Some(0)
        }
      }
    )*
  };
}

integer_component!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

fn convert_integer<T>(value: &Value) -> Option<T>
where
  T: TryFrom<i8>
    + TryFrom<i16>
    + TryFrom<i32>
    + TryFrom<i64>
    + TryFrom<i128>
    + TryFrom<isize>
    + TryFrom<u8>
    + TryFrom<u16>
    + TryFrom<u32>
    + TryFrom<u64>
    + TryFrom<u128>
    + TryFrom<usize>,
{
  macro_rules! attempt {
    ($($src:ty),*) => {
      $(
        if let Some(found) = value.downcast_ref::<$src>() {
          return <T as TryFrom<$src>>::try_from(*found).ok();
        }
      )*
    };
  }
  attempt!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
  None
}

macro_rules! float_component {
  ($ty:ty => [$($src:ty),*]) => {
    impl Component for $ty {
      fn from_value(value: &Value) -> Option<Self> {
        value.downcast_ref::<Self>().copied()
      }

      fn convert(value: &Value) -> Option<Self> {
        $(
          if let Some(found) = value.downcast_ref::<$src>() {
            return Some(<$ty>::from(*found));
          }
        )*
        None
      }

      fn zero() -> Option<Self> {
        Some(0.0)
      }
    }
  };
}

float_component!(f32 => [i8, i16, u8, u16]);
float_component!(f64 => [f32, i8, i16, i32, u8, u16, u32]);

impl Component for bool {
  fn from_value(value: &Value) -> Option<Self> {
    value.downcast_ref::<Self>().copied()
  }

  fn zero() -> Option<Self> {
    Some(false)
  }
}

impl Component for char {
  fn from_value(value: &Value) -> Option<Self> {
    value.downcast_ref::<Self>().copied()
  }

  fn convert(value: &Value) -> Option<Self> {
    if let Some(byte) = value.downcast_ref::<u8>() {
      return Some(char::from(*byte));
    }
    value
      .downcast_ref::<u32>()
      .and_then(|code| char::from_u32(*code))
  }

  fn zero() -> Option<Self> {
    Some('\0')
  }
}

impl Component for String {
  fn from_value(value: &Value) -> Option<Self> {
    value.downcast_ref::<Self>().cloned()
  }

  fn convert(value: &Value) -> Option<Self> {
    if let Some(text) = value.downcast_ref::<&'static str>() {
      return Some((*text).to_owned());
    }
    if let Some(text) = value.downcast_ref::<Box<str>>() {
      return Some(text.to_string());
    }
    if let Some(text) = value.downcast_ref::<Arc<str>>() {
      return Some(text.to_string());
    }
    if let Some(c) = value.downcast_ref::<char>() {
      return Some(c.to_string());
    }
    value
      .downcast_ref::<Vec<u8>>()
      .and_then(|bytes| String::from_utf8(bytes.clone()).ok())
  }

  fn zero() -> Option<Self> {
    Some(String::new())
  }
}

impl Component for &'static str {
  fn from_value(value: &Value) -> Option<Self> {
    value.downcast_ref::<Self>().copied()
  }

  fn zero() -> Option<Self> {
    Some("")
  }
}

impl<T: Component + Clone> Component for Vec<T> {
  fn from_value(value: &Value) -> Option<Self> {
    value.downcast_ref::<Self>().cloned()
  }

  fn zero() -> Option<Self> {
    Some(Vec::new())
  }
}

/// A shared handle resolves under the key of the type it points at, so an
/// `Arc<T>` parameter receives the very instance that was registered.
impl<T: Component> Component for Arc<T> {
  fn type_key() -> TypeKey {
    T::type_key()
  }

  fn from_value(value: &Value) -> Option<Self> {
    value.downcast::<T>()
  }

  fn from_owned(value: Value) -> Result<Self, Value> {
    value.downcast::<T>().ok_or(value)
  }

  fn into_value(self) -> Value {
    Value::from_arc(self)
  }

  fn convert(value: &Value) -> Option<Self> {
    T::convert(value).map(Arc::new)
  }

  fn zero() -> Option<Self> {
    T::zero().map(Arc::new)
  }

  fn construct(cx: &mut Resolver<'_>) -> Result<Option<Self>> {
    Ok(T::construct(cx)?.map(Arc::new))
  }
}

/// An optional dependency: resolves to `None` instead of failing.
impl<T: Component> Component for Option<T> {
  fn type_key() -> TypeKey {
    T::type_key()
  }

  fn from_value(value: &Value) -> Option<Self> {
    T::from_value(value).map(Some)
  }

  fn from_owned(value: Value) -> Result<Self, Value> {
    match value.take::<Self>() {
      Ok(found) => Ok(found),
      Err(value) => T::from_owned(value).map(Some),
    }
  }

  fn into_value(self) -> Value {
    match self {
      Some(found) => found.into_value(),
      None => Value::new(None::<T>),
    }
  }

  fn convert(value: &Value) -> Option<Self> {
    T::convert(value).map(Some)
  }

  fn zero() -> Option<Self> {
    Some(None)
  }

  fn construct(cx: &mut Resolver<'_>) -> Result<Option<Self>> {
    Ok(T::construct(cx)?.map(Some))
  }

  fn resolve(cx: &mut Resolver<'_>) -> Result<Option<Self>> {
    Ok(Some(T::resolve(cx)?))
  }
}

/// Variadic parameter: drains every remaining caller argument of type `T`.
///
/// Only meaningful as the last parameter of a callable, where it marks the
/// descriptor as variadic. No matching arguments yields an empty list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rest<T>(pub Vec<T>);

impl<T> Rest<T> {
  pub fn into_inner(self) -> Vec<T> {
    self.0
  }
}

impl<T> Deref for Rest<T> {
  type Target = [T];

  fn deref(&self) -> &[T] {
    &self.0
  }
}

impl<T: Component> Component for Rest<T> {
  const VARIADIC: bool = true;

  fn type_key() -> TypeKey {
    T::type_key()
  }

  fn zero() -> Option<Self> {
    Some(Rest(Vec::new()))
  }

  fn resolve(cx: &mut Resolver<'_>) -> Result<Option<Self>> {
    let items = cx
      .arguments()
      .drain_exact(&T::type_key())
      .into_iter()
      .filter_map(|value| T::from_owned(value).ok())
      .collect();
    Ok(Some(Rest(items)))
  }
}

/// A trait-object handle, e.g. `Interface<dyn Greeter>`.
///
/// The payload is stored as `Arc<T>`, so every resolution of the same
/// registration hands out the same object.
pub struct Interface<T: ?Sized>(Arc<T>);

impl<T: ?Sized> Interface<T> {
  pub fn new(inner: Arc<T>) -> Self {
    Self(inner)
  }

  pub fn into_inner(self) -> Arc<T> {
    self.0
  }

  pub fn ptr_eq(&self, other: &Self) -> bool {
    Arc::ptr_eq(&self.0, &other.0)
  }
}

impl<T: ?Sized> Clone for Interface<T> {
  fn clone(&self) -> Self {
    Self(self.0.clone())
  }
}

impl<T: ?Sized> Deref for Interface<T> {
  type Target = T;

  fn deref(&self) -> &T {
    &self.0
  }
}

impl<T: ?Sized> From<Arc<T>> for Interface<T> {
  fn from(inner: Arc<T>) -> Self {
    Self(inner)
  }
}

impl<T: ?Sized> fmt::Debug for Interface<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Interface<{}>", type_name::<T>())
  }
}

impl<T: ?Sized + Send + Sync + 'static> Component for Interface<T> {
  fn type_key() -> TypeKey {
    TypeKey::of::<Arc<T>>()
  }

  fn from_value(value: &Value) -> Option<Self> {
    value.downcast_ref::<Arc<T>>().cloned().map(Interface)
  }

  fn from_owned(value: Value) -> Result<Self, Value> {
    Self::from_value(&value).ok_or(value)
  }

  fn into_value(self) -> Value {
    Value::new(self.0)
  }
}
