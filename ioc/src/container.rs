//! The main `Container` struct and the resolution pipeline behind it.

use crate::arguments::ArgumentPool;
use crate::callable::{Callable, Descriptor};
use crate::component::Component;
use crate::config::{ConstructionPolicy, ContainerConfig};
use crate::core::{Provider, Registry};
use crate::error::{Error, Result};
use crate::inject::Inject;
use crate::key::TypeKey;
use crate::value::Value;
use parking_lot::RwLock;
use std::any::type_name;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// The dependency injection container.
///
/// A `Container` is a cheap handle: clones share the same registrations. It
/// is thread-safe and registrations may be added at any point of the
/// application's lifecycle. There is no global instance; build one and pass
/// it to whatever needs it.
#[derive(Clone, Default)]
pub struct Container {
  inner: Arc<Shared>,
}

#[derive(Default)]
struct Shared {
  registry: RwLock<Arc<Registry>>,
  config: ContainerConfig,
}

impl Container {
  /// Creates a new, empty `Container` with the lenient construction policy.
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_config(config: ContainerConfig) -> Self {
    Self {
      inner: Arc::new(Shared {
        registry: RwLock::default(),
        config,
      }),
    }
  }

  pub fn config(&self) -> &ContainerConfig {
    &self.inner.config
  }

  /// The key values of type `T` are grouped and looked up under.
  pub fn key_of<T: Component>() -> TypeKey {
    T::type_key()
  }

  // --- PRIVATE HELPERS ---

  fn registry(&self) -> Arc<Registry> {
    self.inner.registry.read().clone()
  }

  fn register(&self, key: &str, provider: Provider, descriptor: &Descriptor) -> Result<()> {
    if descriptor.num_out() != 1 {
      return Err(Error::InvalidFactorySignature {
        key: key.to_owned(),
        found: descriptor.num_out(),
      });
    }
    let returns = descriptor.returns()[0].key().clone();
    debug!(key, kind = provider.kind(), returns = %returns, "registering factory");

    let registry = self.registry();
    let canonical = registry.canonical(key);
    // A replaced registration must not keep serving the old cached value.
    registry.instances.remove(&canonical);
    registry.providers.insert(canonical, provider);
    if returns.as_str() != key {
      registry.aliases.insert(returns.as_str().to_owned(), key.to_owned());
    }
    Ok(())
  }

  // --- PUBLIC API ---

  // --- Registration ---

  /// Registers a transient factory: it runs on every resolution of `key`.
  ///
  /// The factory's return type becomes an alias of `key`, so the value is
  /// also reachable by type.
  pub fn bind<Args>(&self, key: &str, factory: impl Callable<Args>) -> Result<()> {
    let descriptor = factory.describe();
    self.register(key, Provider::transient(descriptor.clone()), &descriptor)
  }

  /// Registers a singleton factory: it runs at most once, on first access.
  pub fn singleton<Args>(&self, key: &str, factory: impl Callable<Args>) -> Result<()> {
    let descriptor = factory.describe();
    self.register(key, Provider::singleton(descriptor.clone()), &descriptor)
  }

  /// Registers a transient factory under the key of its own return type.
  pub fn provide<Args>(&self, factory: impl Callable<Args>) -> Result<()> {
    let descriptor = factory.describe();
    let key = return_key(&descriptor)?;
    self.register(&key, Provider::transient(descriptor.clone()), &descriptor)
  }

  /// Registers a singleton factory under the key of its own return type.
  pub fn provide_singleton<Args>(&self, factory: impl Callable<Args>) -> Result<()> {
    let descriptor = factory.describe();
    let key = return_key(&descriptor)?;
    self.register(&key, Provider::singleton(descriptor.clone()), &descriptor)
  }

  /// Stores a ready value under `key`, bypassing factories.
  pub fn instance<T: Component>(&self, key: &str, value: T) {
    self.instance_value(key, value.into_value());
  }

  pub fn instance_value(&self, key: &str, value: Value) {
    let registry = self.registry();
    let canonical = registry.canonical(key);
    debug!(key = %canonical, value_type = value.type_name(), "registering instance");
    registry.instances.insert(canonical, value);
  }

  /// Makes `alias` resolve to whatever `key` resolves to.
  pub fn alias(&self, key: &str, alias: &str) {
    self
      .registry()
      .aliases
      .insert(alias.to_owned(), key.to_owned());
  }

  // --- Query ---

  pub fn has_bound(&self, key: &str) -> bool {
    self.registry().contains(key)
  }

  /// Resolves the value registered under `key`.
  ///
  /// Returns `Ok(None)` when nothing is registered under the key or any alias
  /// of it.
  pub fn get(&self, key: &str) -> Result<Option<Value>> {
    self.get_with(key, [])
  }

  /// Like [`get`](Self::get), with extra arguments for the factory.
  pub fn get_with(&self, key: &str, args: impl IntoIterator<Item = Value>) -> Result<Option<Value>> {
    Resolver::new(self, args).lookup(key)
  }

  /// Resolves `key` and extracts it as a `T`.
  ///
  /// A registered value that is neither a `T` nor convertible to one yields
  /// `Ok(None)`.
  pub fn get_as<T: Component>(&self, key: &str) -> Result<Option<T>> {
    Ok(
      self
        .get(key)?
        .and_then(|value| T::from_owned(value).or_else(|value| T::convert(&value).ok_or(value)).ok()),
    )
  }

  /// Resolves a `T` by type through the full resolution chain.
  pub fn resolve<T: Component>(&self) -> Result<T> {
    self.resolve_with([])
  }

  pub fn resolve_with<T: Component>(&self, args: impl IntoIterator<Item = Value>) -> Result<T> {
    Resolver::new(self, args).require::<T>()
  }

  // --- Invocation ---

  /// Calls `callable`, resolving every parameter it declares.
  pub fn call<Args>(&self, callable: impl Callable<Args>) -> Result<Vec<Value>> {
    self.call_with(callable, [])
  }

  /// Like [`call`](Self::call). Values in `args` are matched to parameters
  /// before anything registered in the container.
  pub fn call_with<Args>(
    &self,
    callable: impl Callable<Args>,
    args: impl IntoIterator<Item = Value>,
  ) -> Result<Vec<Value>> {
    let descriptor = callable.describe();
    Resolver::new(self, args).invoke(&descriptor)
  }

  // --- Injection ---

  /// Fills in the annotated fields of `target`.
  ///
  /// Either every resolved field is written or, on error, none is.
  pub fn inject<S: Inject>(&self, target: &mut S) -> Result<()> {
    self.inject_with(target, [])
  }

  pub fn inject_with<S: Inject>(&self, target: &mut S, args: impl IntoIterator<Item = Value>) -> Result<()> {
    Resolver::new(self, args).inject(target)
  }

  // --- Lifecycle ---

  /// Drops every registration, alias and cached instance.
  pub fn flush(&self) {
    *self.inner.registry.write() = Arc::new(Registry::default());
    debug!("container flushed");
  }
}

fn return_key(descriptor: &Descriptor) -> Result<String> {
  match descriptor.returns() {
    [single] => Ok(single.key().as_str().to_owned()),
    other => Err(Error::InvalidFactorySignature {
      key: descriptor.name().to_string(),
      found: other.len(),
    }),
  }
}

impl fmt::Debug for Container {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let registry = self.registry();
    f.debug_struct("Container")
      .field("providers", &registry.providers.len())
      .field("instances", &registry.instances.len())
      .field("aliases", &registry.aliases.len())
      .field("config", &self.inner.config)
      .finish()
  }
}

/// Factories may ask for the container itself.
impl Component for Container {
  fn from_value(value: &Value) -> Option<Self> {
    value.downcast_ref::<Self>().cloned()
  }

  fn resolve(cx: &mut Resolver<'_>) -> Result<Option<Self>> {
    Ok(Some(cx.container().clone()))
  }
}

/// The state of one top-level `get`, `call`, `resolve` or `inject`.
///
/// Nested factory invocations share the resolver, and so share the caller's
/// arguments.
pub struct Resolver<'c> {
  container: &'c Container,
  arguments: ArgumentPool,
}

impl<'c> Resolver<'c> {
  pub(crate) fn new(container: &'c Container, args: impl IntoIterator<Item = Value>) -> Self {
    let mut arguments = ArgumentPool::new(args);
    arguments.push(Value::new(container.clone()));
    Self {
      container,
      arguments,
    }
  }

  pub fn container(&self) -> &'c Container {
    self.container
  }

  pub fn arguments(&mut self) -> &mut ArgumentPool {
    &mut self.arguments
  }

  pub fn policy(&self) -> ConstructionPolicy {
    self.container.config().construction
  }

  /// Looks `key` up among instances, singletons and transient bindings.
  pub fn lookup(&mut self, key: &str) -> Result<Option<Value>> {
    let registry = self.container.registry();
    let key = registry.canonical(key);

    if let Some(instance) = registry.instances.get(&key) {
      trace!(key = %key, "resolved cached instance");
      return Ok(Some(instance.value().clone()));
    }

    let provider = match registry.providers.get(&key) {
      Some(provider) => provider.value().clone(),
      None => return Ok(None),
    };

    match provider {
      // The value stays in the provider's own cell, so a registration that
      // replaces the provider also retires the value.
      Provider::Singleton { descriptor, cell } => cell
        .get_or_try_init(|| {
          debug!(key = %key, "materializing singleton");
          self.produce(&key, &descriptor)
        })
        .map(|value| Some(value.clone())),
      Provider::Transient { descriptor } => {
        trace!(key = %key, "invoking transient factory");
        self.produce(&key, &descriptor).map(Some)
      }
    }
  }

  /// Resolves a `T` through, in order: an exact caller argument, a caller
  /// argument convertible to `T`, the container's registration for `T`'s key,
  /// and auto-construction.
  pub fn resolve_chain<T: Component>(&mut self) -> Result<Option<T>> {
    let key = T::type_key();

    if let Some(value) = self.arguments.pull_exact(&key) {
      match T::from_owned(value) {
        Ok(found) => {
          trace!(key = %key, "resolved from argument");
          return Ok(Some(found));
        }
        Err(value) => {
          trace!(key = %key, actual = value.type_name(), "argument does not extract");
          // Only a successful extraction consumes the argument.
          self.arguments.restore(value);
        }
      }
    }

    if let Some(found) = self.arguments.find_convertible(&key, T::convert) {
      trace!(key = %key, "resolved from convertible argument");
      return Ok(Some(found));
    }

    if let Some(value) = self.lookup(key.as_str())? {
      match T::from_owned(value).or_else(|value| T::convert(&value).ok_or(value)) {
        Ok(found) => return Ok(Some(found)),
        Err(value) => debug!(key = %key, actual = value.type_name(), "registered value does not fit"),
      }
    }

    match T::construct(self) {
      Ok(found) => Ok(found),
      Err(err) if self.policy() == ConstructionPolicy::Lenient => {
        warn!(
          target: "fibre_container::resolve",
          type_name = T::type_name(),
          error = %err,
          "auto-construction failed, falling back to the zero value"
        );
        Ok(T::zero())
      }
      Err(err) => Err(err),
    }
  }

  /// Resolves a `T`, falling back to its zero value.
  pub fn require<T: Component>(&mut self) -> Result<T> {
    match T::resolve(self)? {
      Some(found) => Ok(found),
      None => T::zero().ok_or_else(|| Error::Unresolved {
        type_name: T::type_name().to_owned(),
      }),
    }
  }

  /// Fills in the annotated fields of `target` using this resolver.
  pub fn inject<S: Inject>(&mut self, target: &mut S) -> Result<()> {
    let container = self.container;
    if target.construct(container)? {
      trace!(target_type = type_name::<S>(), "target constructed itself");
      return Ok(());
    }

    let mut staged = Vec::new();
    for field in S::fields() {
      let explicit = match field.key() {
        Some(key) => container.get(key)?,
        None => None,
      };
      let write = match explicit {
        Some(value) => Some(field.accept(value).map_err(|value| Error::FieldTypeMismatch {
          target: type_name::<S>().to_owned(),
          field: field.name().to_owned(),
          declared: field.declared().name().to_owned(),
          actual: value.type_name().to_owned(),
        })?),
        None => field.resolve(self)?,
      };
      staged.extend(write);
    }

    for write in staged {
      write(target);
    }
    Ok(())
  }

  /// Resolves every parameter of `descriptor` and invokes it.
  pub fn invoke(&mut self, descriptor: &Descriptor) -> Result<Vec<Value>> {
    let mut args = Vec::with_capacity(descriptor.num_in());
    for parameter in descriptor.parameters() {
      args.push(parameter.resolve(self)?);
    }
    descriptor.invoke(args)
  }

  fn produce(&mut self, key: &str, descriptor: &Descriptor) -> Result<Value> {
    self
      .invoke(descriptor)?
      .into_iter()
      .next()
      .ok_or_else(|| Error::InvalidFactorySignature {
        key: key.to_owned(),
        found: 0,
      })
  }
}

/// The resolution strategy behind every declared callable parameter.
pub(crate) fn resolve_argument<P: Component>(cx: &mut Resolver<'_>) -> Result<Value> {
  Ok(cx.require::<P>()?.into_value())
}
