//! Field-level injection into existing structures.

use crate::callable::TypeInfo;
use crate::component::Component;
use crate::container::{Container, Resolver};
use crate::error::Result;
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// A structure whose fields the container can fill in.
///
/// [`fields`](Inject::fields) is the injection table: a field takes part only
/// if it is listed, optionally with an explicit lookup key. Fields left out
/// are never touched. A listed field that nothing resolves keeps its current
/// value; it is not reset to its type's zero value. Use
/// [`injectable!`](crate::injectable) to write the table and the matching
/// [`Component`] impl.
pub trait Inject: Sized + Send + Sync + 'static {
  fn fields() -> Vec<Field<Self>>;

  /// Self-construction hook. Returning `Ok(true)` means the value built
  /// itself from `container` and field injection is skipped.
  fn construct(&mut self, _container: &Container) -> Result<bool> {
    Ok(false)
  }
}

/// A field write that has been resolved but not yet applied.
pub(crate) type Staged<S> = Box<dyn FnOnce(&mut S)>;

type Accept<S> = Box<dyn Fn(Value) -> Result<Staged<S>, Value> + Send + Sync>;
type ResolveField<S> = Box<dyn Fn(&mut Resolver<'_>) -> Result<Option<Staged<S>>> + Send + Sync>;

/// One entry of an injection table.
pub struct Field<S> {
  name: &'static str,
  key: Option<String>,
  declared: TypeInfo,
  accept: Accept<S>,
  resolve: ResolveField<S>,
}

impl<S: 'static> Field<S> {
  /// Declares field `name` of type `F`, written through `write`.
  pub fn new<F, W>(name: &'static str, write: W) -> Self
  where
    F: Component,
    W: Fn(&mut S, F) + Send + Sync + 'static,
  {
    let write = Arc::new(write);
    let resolve_write = write.clone();
    Self {
      name,
      key: None,
      declared: TypeInfo::of::<F>(),
      accept: Box::new(move |value: Value| -> Result<Staged<S>, Value> {
        let found = F::from_owned(value).or_else(|value| F::convert(&value).ok_or(value))?;
        let write = write.clone();
        Ok(Box::new(move |target: &mut S| (*write)(target, found)))
      }),
      resolve: Box::new(move |cx: &mut Resolver<'_>| -> Result<Option<Staged<S>>> {
        let write = resolve_write.clone();
        Ok(F::resolve(cx)?.map(|found| -> Staged<S> {
          Box::new(move |target: &mut S| (*write)(target, found))
        }))
      }),
    }
  }

  /// Looks the field up by `key` before falling back to its type.
  pub fn keyed(mut self, key: impl Into<String>) -> Self {
    self.key = Some(key.into());
    self
  }

  pub fn name(&self) -> &'static str {
    self.name
  }

  pub fn key(&self) -> Option<&str> {
    self.key.as_deref()
  }

  pub fn declared(&self) -> &TypeInfo {
    &self.declared
  }

  /// Stages a write of `value`, or hands it back if it does not fit.
  pub(crate) fn accept(&self, value: Value) -> Result<Staged<S>, Value> {
    (self.accept)(value)
  }

  /// Stages a write of whatever the resolution chain finds for the field.
  pub(crate) fn resolve(&self, cx: &mut Resolver<'_>) -> Result<Option<Staged<S>>> {
    (self.resolve)(cx)
  }
}

impl<S> fmt::Debug for Field<S> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Field")
      .field("name", &self.name)
      .field("key", &self.key)
      .field("declared", &self.declared.name())
      .finish()
  }
}
