//! Descriptors: the introspected shape of a callable.

use crate::component::Component;
use crate::container::{resolve_argument, Resolver};
use crate::error::{Error, Result};
use crate::key::TypeKey;
use crate::value::Value;
use std::fmt;
use std::iter::Enumerate;
use std::sync::Arc;
use std::vec::IntoIter;

/// The key and display name of one parameter or return type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeInfo {
  key: TypeKey,
  name: &'static str,
}

impl TypeInfo {
  pub fn of<T: Component>() -> Self {
    Self {
      key: T::type_key(),
      name: T::type_name(),
    }
  }

  pub fn key(&self) -> &TypeKey {
    &self.key
  }

  pub fn name(&self) -> &'static str {
    self.name
  }
}

type ResolveFn = fn(&mut Resolver<'_>) -> Result<Value>;

/// One declared parameter of a callable.
#[derive(Clone)]
pub struct Parameter {
  info: TypeInfo,
  variadic: bool,
  resolve: ResolveFn,
}

impl Parameter {
  pub fn of<P: Component>() -> Self {
    Self {
      info: TypeInfo::of::<P>(),
      variadic: P::VARIADIC,
      resolve: resolve_argument::<P>,
    }
  }

  pub fn key(&self) -> &TypeKey {
    self.info.key()
  }

  pub fn type_name(&self) -> &'static str {
    self.info.name()
  }

  pub fn is_variadic(&self) -> bool {
    self.variadic
  }

  /// Produces an argument for this parameter through its type's strategy.
  pub(crate) fn resolve(&self, cx: &mut Resolver<'_>) -> Result<Value> {
    (self.resolve)(cx)
  }
}

impl fmt::Debug for Parameter {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Parameter")
      .field("type", &self.info.name)
      .field("variadic", &self.variadic)
      .finish()
  }
}

type Invoke = dyn Fn(Vec<Value>) -> Result<Vec<Value>> + Send + Sync;

/// The introspected shape of a callable, built once by [`Descriptor::wrap`].
///
/// Cloning is cheap; clones share the wrapped function.
#[derive(Clone)]
pub struct Descriptor {
  name: TypeKey,
  parameters: Arc<[Parameter]>,
  returns: Arc<[TypeInfo]>,
  invoke: Arc<Invoke>,
}

impl Descriptor {
  /// Introspects `callable`.
  ///
  /// Anything that is not a function of [`Component`] parameters returning
  /// [`Returns`] is rejected at compile time.
  pub fn wrap<Args>(callable: impl Callable<Args>) -> Self {
    callable.describe()
  }

  fn from_parts(
    name: TypeKey,
    parameters: Vec<Parameter>,
    returns: Vec<TypeInfo>,
    invoke: impl Fn(Vec<Value>) -> Result<Vec<Value>> + Send + Sync + 'static,
  ) -> Self {
    Self {
      name,
      parameters: parameters.into(),
      returns: returns.into(),
      invoke: Arc::new(invoke),
    }
  }

  /// The identity of the wrapped function.
  pub fn name(&self) -> &TypeKey {
    &self.name
  }

  pub fn parameters(&self) -> &[Parameter] {
    &self.parameters
  }

  pub fn returns(&self) -> &[TypeInfo] {
    &self.returns
  }

  pub fn num_in(&self) -> usize {
    self.parameters.len()
  }

  pub fn num_out(&self) -> usize {
    self.returns.len()
  }

  /// True when the final parameter accepts zero or more values.
  pub fn is_variadic(&self) -> bool {
    self
      .parameters
      .last()
      .map_or(false, Parameter::is_variadic)
  }

  /// Calls the wrapped function with one argument per parameter, in order.
  pub fn invoke(&self, args: Vec<Value>) -> Result<Vec<Value>> {
    if args.len() != self.parameters.len() {
      return Err(Error::NotCallable {
        name: self.name.to_string(),
        reason: format!(
          "expected {} arguments, got {}",
          self.parameters.len(),
          args.len()
        ),
      });
    }
    (self.invoke)(args)
  }
}

impl fmt::Debug for Descriptor {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Descriptor")
      .field("name", &self.name)
      .field("parameters", &self.parameters)
      .field("returns", &self.returns)
      .finish()
  }
}

/// The values a callable may return: nothing, one component, or a tuple.
pub trait Returns: 'static {
  fn types() -> Vec<TypeInfo>;

  fn into_values(self) -> Vec<Value>;
}

impl Returns for () {
  fn types() -> Vec<TypeInfo> {
    Vec::new()
  }

  fn into_values(self) -> Vec<Value> {
    Vec::new()
  }
}

impl<T: Component> Returns for T {
  fn types() -> Vec<TypeInfo> {
    vec![TypeInfo::of::<T>()]
  }

  fn into_values(self) -> Vec<Value> {
    vec![self.into_value()]
  }
}

impl<A: Component, B: Component> Returns for (A, B) {
  fn types() -> Vec<TypeInfo> {
    vec![TypeInfo::of::<A>(), TypeInfo::of::<B>()]
  }

  fn into_values(self) -> Vec<Value> {
    vec![self.0.into_value(), self.1.into_value()]
  }
}

impl<A: Component, B: Component, C: Component> Returns for (A, B, C) {
  fn types() -> Vec<TypeInfo> {
    vec![TypeInfo::of::<A>(), TypeInfo::of::<B>(), TypeInfo::of::<C>()]
  }

  fn into_values(self) -> Vec<Value> {
    vec![
      self.0.into_value(),
      self.1.into_value(),
      self.2.into_value(),
    ]
  }
}

/// Anything the container can wrap into a [`Descriptor`].
///
/// Implemented for functions and closures of up to eight [`Component`]
/// parameters, and for descriptors themselves. `Args` only disambiguates the
/// implementations and is inferred at the call site.
pub trait Callable<Args> {
  fn describe(self) -> Descriptor;
}

/// Marker for callables that are already wrapped.
pub enum Wrapped {}

impl Callable<Wrapped> for Descriptor {
  fn describe(self) -> Descriptor {
    self
  }
}

impl Callable<Wrapped> for &Descriptor {
  fn describe(self) -> Descriptor {
    self.clone()
  }
}

fn extract<P: Component>(name: &TypeKey, args: &mut Enumerate<IntoIter<Value>>) -> Result<P> {
  let (index, value) = args.next().ok_or_else(|| Error::NotCallable {
    name: name.to_string(),
    reason: "argument list ended early".to_string(),
  })?;
  P::from_owned(value).map_err(|value| Error::ArgumentMismatch {
    name: name.to_string(),
    index,
    expected: P::type_name().to_string(),
    actual: value.type_name().to_string(),
  })
}

macro_rules! impl_callable {
  ($($param:ident),*) => {
    impl<Func, Ret, $($param,)*> Callable<($($param,)*)> for Func
    where
      Func: Fn($($param),*) -> Ret + Send + Sync + 'static,
      Ret: Returns,
      $($param: Component,)*
    {
      #[allow(unused_mut, unused_variables)]
      fn describe(self) -> Descriptor {
        let name = TypeKey::of::<Func>();
        let parameters = vec![$(Parameter::of::<$param>()),*];
        let call_name = name.clone();
        Descriptor::from_parts(name, parameters, Ret::types(), move |args: Vec<Value>| {
          let mut args = args.into_iter().enumerate();
          let result = (self)($(extract::<$param>(&call_name, &mut args)?),*);
          Ok(result.into_values())
        })
      }
    }
  };
}

impl_callable!();
impl_callable!(P1);
impl_callable!(P1, P2);
impl_callable!(P1, P2, P3);
impl_callable!(P1, P2, P3, P4);
impl_callable!(P1, P2, P3, P4, P5);
impl_callable!(P1, P2, P3, P4, P5, P6);
impl_callable!(P1, P2, P3, P4, P5, P6, P7);
impl_callable!(P1, P2, P3, P4, P5, P6, P7, P8);
