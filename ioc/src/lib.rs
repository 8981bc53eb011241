//! # Fibre Container
//!
//! A thread-safe, dynamic dependency injection container for Rust.
//!
//! Factories, singletons and plain values are registered under string keys
//! at any point of the application's lifecycle. The container then supplies
//! them by key, by declared type, or by filling in the fields of a
//! structure, and resolves every parameter a factory declares.
//!
//! ## Core Concepts
//!
//! - **Container**: the registry of factories, instances and aliases. It is
//!   a cheap handle; clone it to share it.
//! - **Component**: how a type describes itself to the container. Built-in
//!   for primitives, strings, `Arc<T>`, `Option<T>` and more; the
//!   [`component!`] and [`injectable!`] macros cover your own types.
//! - **Resolution chain**: a parameter is taken from the caller's extra
//!   arguments, then from a convertible extra argument, then from the
//!   container, and finally built from scratch.
//! - **Traits**: services can be registered and resolved as trait objects
//!   through [`Interface`].
//!
//! ## Quick Start
//!
//! ```
//! use fibre_container::{resolve, Container, Interface};
//! use std::sync::Arc;
//!
//! trait Greeter: Send + Sync {
//!   fn greet(&self) -> String;
//! }
//!
//! struct EnglishGreeter {
//!   message: String,
//! }
//!
//! impl Greeter for EnglishGreeter {
//!   fn greet(&self) -> String {
//!     self.message.clone()
//!   }
//! }
//!
//! let container = Container::new();
//! container.instance("greeting_message", String::from("Hello, World!"));
//!
//! // Factories declare their dependencies as parameters.
//! container
//!   .singleton("greeter", |c: Container| -> Interface<dyn Greeter> {
//!     let message = resolve!(c, String, "greeting_message");
//!     Interface::new(Arc::new(EnglishGreeter { message }))
//!   })
//!   .unwrap();
//!
//! let greeter = resolve!(container, Interface<dyn Greeter>);
//! assert_eq!(greeter.greet(), "Hello, World!");
//! ```

mod arguments;
mod callable;
mod component;
mod config;
mod container;
mod core;
mod error;
mod inject;
mod key;
mod macros;
mod value;

pub use arguments::ArgumentPool;
pub use callable::{Callable, Descriptor, Parameter, Returns, TypeInfo, Wrapped};
pub use component::{Component, Interface, Rest};
pub use config::{ConstructionPolicy, ContainerConfig};
pub use container::{Container, Resolver};
pub use error::{Error, Result};
pub use inject::{Field, Inject};
pub use key::TypeKey;
pub use value::Value;
