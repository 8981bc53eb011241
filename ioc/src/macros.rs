//! Public macros for ergonomic registration and resolution.

/// Resolves a service from a container, panicking if it cannot be produced.
///
/// `resolve!(container, T)` runs the full resolution chain for `T`.
/// `resolve!(container, T, "key")` looks the service up by key and extracts
/// it as a `T`.
///
/// # Panics
///
/// Panics when resolution fails or, for the keyed form, when nothing
/// registered under the key fits `T`. Use [`Container::resolve`] or
/// [`Container::get_as`] for the non-panicking versions.
///
/// [`Container::resolve`]: crate::Container::resolve
/// [`Container::get_as`]: crate::Container::get_as
///
/// # Examples
///
/// ```
/// use fibre_container::{resolve, Container};
///
/// let container = Container::new();
/// container.singleton("greeting", || String::from("hello")).unwrap();
///
/// let by_type = resolve!(container, String);
/// let by_key = resolve!(container, String, "greeting");
/// assert_eq!(by_type, "hello");
/// assert_eq!(by_key, "hello");
/// ```
#[macro_export]
macro_rules! resolve {
  ($container:expr, $type:ty) => {
    $container.resolve::<$type>().unwrap_or_else(|err| {
      panic!(
        "Failed to resolve required service {}: {}",
        ::std::any::type_name::<$type>(),
        err
      )
    })
  };

  ($container:expr, $type:ty, $key:expr) => {
    match $container.get_as::<$type>($key) {
      Ok(Some(found)) => found,
      Ok(None) => panic!(
        "Failed to resolve required service with key '{}': {}",
        $key,
        ::std::any::type_name::<$type>()
      ),
      Err(err) => panic!(
        "Failed to resolve required service with key '{}': {}",
        $key, err
      ),
    }
  };
}

/// Builds a list of caller arguments for `get_with`, `call_with`,
/// `resolve_with` and `inject_with`.
///
/// ```
/// use fibre_container::{args, Container};
///
/// let container = Container::new();
/// let results = container
///   .call_with(|a: u8, b: String| format!("{b}{a}"), args![7u8, String::from("v")])
///   .unwrap();
/// assert_eq!(results[0].downcast_ref::<String>().unwrap(), "v7");
/// ```
#[macro_export]
macro_rules! args {
  () => {
    ::std::vec::Vec::<$crate::Value>::new()
  };
  ($($arg:expr),+ $(,)?) => {
    ::std::vec![$($crate::Component::into_value($arg)),+]
  };
}

/// Implements [`Component`](crate::Component) for a plain type.
///
/// - `component!(T)` shares `T` only through `Arc<T>`.
/// - `component!(T: Clone)` also resolves `T` by value.
/// - `component!(T: Default)` lets the container build a `T` when nothing is
///   registered, and hands out `T::default()` as the zero value.
/// - `component!(T: Clone + Default)` does both.
#[macro_export]
macro_rules! component {
  ($type:ty: Clone + Default) => {
    impl $crate::Component for $type {
      fn from_value(value: &$crate::Value) -> ::std::option::Option<Self> {
        value.downcast_ref::<Self>().cloned()
      }

      fn zero() -> ::std::option::Option<Self> {
        ::std::option::Option::Some(<Self as ::std::default::Default>::default())
      }

      fn construct(_cx: &mut $crate::Resolver<'_>) -> $crate::Result<::std::option::Option<Self>> {
        ::std::result::Result::Ok(::std::option::Option::Some(
          <Self as ::std::default::Default>::default(),
        ))
      }
    }
  };

  ($type:ty: Clone) => {
    impl $crate::Component for $type {
      fn from_value(value: &$crate::Value) -> ::std::option::Option<Self> {
        value.downcast_ref::<Self>().cloned()
      }
    }
  };

  ($type:ty: Default) => {
    impl $crate::Component for $type {
      fn zero() -> ::std::option::Option<Self> {
        ::std::option::Option::Some(<Self as ::std::default::Default>::default())
      }

      fn construct(_cx: &mut $crate::Resolver<'_>) -> $crate::Result<::std::option::Option<Self>> {
        ::std::result::Result::Ok(::std::option::Option::Some(
          <Self as ::std::default::Default>::default(),
        ))
      }
    }
  };

  ($type:ty) => {
    impl $crate::Component for $type {}
  };
}

/// Declares the injection table of a struct and makes it a component that
/// the container can build.
///
/// Each listed field is filled in by type, or by key when written
/// `field = "key"`. Unlisted fields are never touched. The struct must
/// implement `Default`, which is its zero value and the starting point of
/// auto-construction. Add `: Clone` to also resolve the struct by value.
///
/// ```
/// use fibre_container::{injectable, Container};
///
/// #[derive(Default)]
/// struct Settings {
///   host: String,
///   port: u16,
/// }
///
/// injectable!(Settings { host = "host", port });
///
/// let container = Container::new();
/// container.instance("host", "localhost");
/// container.provide(|| 8080u16).unwrap();
///
/// let mut settings = Settings::default();
/// container.inject(&mut settings).unwrap();
/// assert_eq!(settings.host, "localhost");
/// assert_eq!(settings.port, 8080);
/// ```
#[macro_export]
macro_rules! injectable {
  (@inject $type:ty { $($field:ident $(= $key:expr)?),* $(,)? }) => {
    impl $crate::Inject for $type {
      fn fields() -> ::std::vec::Vec<$crate::Field<Self>> {
        ::std::vec![
          $(
            $crate::Field::new(stringify!($field), |target: &mut Self, value| target.$field = value)
              $(.keyed($key))?
          ),*
        ]
      }
    }
  };

  (@component $type:ty { $($extra:tt)* }) => {
    impl $crate::Component for $type {
      $($extra)*

      fn zero() -> ::std::option::Option<Self> {
        ::std::option::Option::Some(<Self as ::std::default::Default>::default())
      }

      fn construct(cx: &mut $crate::Resolver<'_>) -> $crate::Result<::std::option::Option<Self>> {
        let mut built = <Self as ::std::default::Default>::default();
        cx.inject(&mut built)?;
        ::std::result::Result::Ok(::std::option::Option::Some(built))
      }
    }
  };

  ($type:ty: Clone { $($fields:tt)* }) => {
    $crate::injectable!(@inject $type { $($fields)* });
    $crate::injectable!(@component $type {
      fn from_value(value: &$crate::Value) -> ::std::option::Option<Self> {
        value.downcast_ref::<Self>().cloned()
      }
    });
  };

  ($type:ty { $($fields:tt)* }) => {
    $crate::injectable!(@inject $type { $($fields)* });
    $crate::injectable!(@component $type {});
  };
}
