use fibre_container::{args, component, resolve, Container, Descriptor, Error, Rest, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

// --- Test Fixtures ---

#[derive(Debug, Clone, PartialEq)]
struct User {
  name: String,
}

#[derive(Debug, Clone, PartialEq)]
struct Session {
  user: User,
}

component!(User: Clone);
component!(Session: Clone);

struct Database;
component!(Database);

// --- Calls ---

#[test]
fn test_call_prefers_extra_arguments() {
  // Arrange
  let container = Container::new();
  container.provide(|| String::from("registered")).unwrap();

  // Act
  let results = container
    .call_with(|name: String| name, args![String::from("extra")])
    .unwrap();

  // Assert
  assert_eq!(results[0].downcast_ref::<String>().unwrap(), "extra");
}

#[test]
fn test_call_uses_registered_provider() {
  // Arrange
  let container = Container::new();
  container.provide(|| String::from("registered")).unwrap();

  // Act
  let results = container.call(|name: String| name.len()).unwrap();

  // Assert
  assert_eq!(*results[0].downcast_ref::<usize>().unwrap(), "registered".len());
}

#[test]
fn test_call_converts_near_miss_arguments_and_consumes_them() {
  let container = Container::new();

  // Each u64 parameter takes the next convertible argument exactly once.
  let results = container
    .call_with(|a: u64, b: u64| (a, b), args![1u8, 2u16])
    .unwrap();

  assert_eq!(results.len(), 2);
  assert_eq!(*results[0].downcast_ref::<u64>().unwrap(), 1);
  assert_eq!(*results[1].downcast_ref::<u64>().unwrap(), 2);
}

#[test]
fn test_unresolved_parameters_receive_zero_values() {
  let container = Container::new();

  let results = container
    .call(|count: i32, label: String, enabled: bool| format!("{count}:{label}:{enabled}"))
    .unwrap();

  assert_eq!(results[0].downcast_ref::<String>().unwrap(), "0::false");
}

#[test]
fn test_parameter_without_zero_value_fails() {
  let container = Container::new();

  let err = container.call(|_db: Arc<Database>| ()).unwrap_err();

  match err {
    Error::Unresolved { type_name } => assert!(type_name.contains("Database")),
    other => panic!("unexpected error: {other}"),
  }
}

#[test]
fn test_optional_parameter_resolves_to_none() {
  let container = Container::new();

  let results = container
    .call(|db: Option<Arc<Database>>| db.is_some())
    .unwrap();

  assert!(!*results[0].downcast_ref::<bool>().unwrap());
}

#[test]
fn test_rejected_exact_argument_stays_available() {
  // Arrange
  let container = Container::new();
  let shared = Arc::new(Database);

  // Act
  // `Database` cannot be moved out of a shared handle, so the first
  // parameter passes on the argument and the second one receives it.
  let results = container
    .call_with(
      |_owned: Option<Database>, handle: Option<Arc<Database>>| handle,
      [Value::from_arc(shared.clone())],
    )
    .unwrap();

  // Assert
  let handle = results[0].downcast::<Database>().unwrap();
  assert!(Arc::ptr_eq(&handle, &shared));
}

#[test]
fn test_variadic_parameter_drains_matching_arguments() {
  // Arrange
  let container = Container::new();
  let sum = |prefix: String, rest: Rest<u32>| format!("{prefix}{}", rest.iter().sum::<u32>());
  let descriptor = Descriptor::wrap(sum);
  assert!(descriptor.is_variadic());

  // Act
  let three = container
    .call_with(&descriptor, args![String::from("sum="), 1u32, 2u32, 3u32])
    .unwrap();
  let none = container
    .call_with(&descriptor, args![String::from("sum=")])
    .unwrap();

  // Assert
  assert_eq!(three[0].downcast_ref::<String>().unwrap(), "sum=6");
  assert_eq!(none[0].downcast_ref::<String>().unwrap(), "sum=0");
}

#[test]
fn test_prewrapped_descriptor_is_callable() {
  let container = Container::new();
  let double = Descriptor::wrap(|n: u8| n * 2);

  let results = container.call_with(double, args![21u8]).unwrap();

  assert_eq!(*results[0].downcast_ref::<u8>().unwrap(), 42);
}

// --- Dependency Chains ---

#[test]
fn test_multi_level_dependency_shares_caller_arguments() {
  // Arrange
  let container = Container::new();
  container.bind("user", |name: String| User { name }).unwrap();
  container.bind("session", |user: User| Session { user }).unwrap();

  // Act
  let session = container
    .get_with("session", args![String::from("ada")])
    .unwrap()
    .unwrap();

  // Assert
  assert_eq!(
    session.downcast_ref::<Session>().unwrap(),
    &Session {
      user: User { name: "ada".into() }
    }
  );
}

#[test]
fn test_factory_can_depend_on_the_container() {
  // Arrange
  let container = Container::new();
  container.instance("environment", "production");
  container
    .bind("banner", |c: Container| {
      let env = resolve!(c, String, "environment");
      User { name: format!("running in {env}") }
    })
    .unwrap();

  // Act
  let banner = resolve!(container, User, "banner");

  // Assert
  assert_eq!(banner.name, "running in production");
}

#[test]
fn test_resolve_with_runs_the_full_chain() {
  let container = Container::new();
  container.bind("user", |name: String| User { name }).unwrap();

  let user = container
    .resolve_with::<User>(args![String::from("grace")])
    .unwrap();

  assert_eq!(user.name, "grace");
}

#[test]
fn test_singleton_depending_on_transient() {
  // Arrange
  let container = Container::new();
  let calls = Arc::new(AtomicUsize::new(0));
  let counter = calls.clone();
  container
    .bind("name", move || {
      counter.fetch_add(1, Ordering::SeqCst);
      "transient"
    })
    .unwrap();
  container
    .singleton("user", |name: &'static str| User { name: name.to_string() })
    .unwrap();

  // Act
  let u1 = resolve!(container, User, "user");
  let u2 = resolve!(container, User, "user");

  // Assert
  assert_eq!(u1.name, "transient");
  assert_eq!(u1, u2);
  // The singleton captured the transient value once.
  assert_eq!(calls.load(Ordering::SeqCst), 1);
}

// --- Concurrency ---

#[test]
fn test_singleton_factory_is_called_only_once_under_concurrency() {
  // An atomic counter to track how many times the factory is executed.
  static FACTORY_EXECUTION_COUNT: AtomicUsize = AtomicUsize::new(0);

  struct Clock;
  component!(Clock);

  // Arrange
  let container = Container::new();
  container
    .singleton("clock", || {
      FACTORY_EXECUTION_COUNT.fetch_add(1, Ordering::SeqCst);
      // Widen the window for a racing second initialization.
      thread::sleep(Duration::from_millis(50));
      Clock
    })
    .unwrap();

  // Act
  let clocks: Vec<Arc<Clock>> = thread::scope(|s| {
    let handles: Vec<_> = (0..20)
      .map(|_| s.spawn(|| resolve!(container, Arc<Clock>, "clock")))
      .collect();
    handles
      .into_iter()
      .map(|handle| handle.join().unwrap())
      .collect()
  });

  // Assert
  assert_eq!(FACTORY_EXECUTION_COUNT.load(Ordering::SeqCst), 1);
  assert!(clocks.iter().all(|clock| Arc::ptr_eq(clock, &clocks[0])));
}

#[test]
fn test_replacing_a_singleton_mid_materialization() {
  // Arrange
  let container = Container::new();
  container
    .singleton("k", || {
      thread::sleep(Duration::from_millis(300));
      String::from("old")
    })
    .unwrap();

  // Act
  let in_flight = thread::scope(|s| {
    let pending = s.spawn(|| container.get_as::<String>("k").unwrap());
    thread::sleep(Duration::from_millis(50));
    container.singleton("k", || String::from("new")).unwrap();
    pending.join().unwrap()
  });

  // Assert
  assert_eq!(in_flight.as_deref(), Some("old"));
  // The late result of the replaced factory must not shadow the new one.
  assert_eq!(container.get_as::<String>("k").unwrap().as_deref(), Some("new"));
  assert_eq!(resolve!(container, String), "new");
}

#[test]
fn test_concurrent_registration_and_resolution() {
  // Arrange
  let container = Container::new();
  container.instance("common", String::from("shared"));

  // Act
  thread::scope(|s| {
    for i in 0..10usize {
      let container = &container;
      s.spawn(move || {
        // Each thread registers its own unique service.
        container.instance(&format!("thread_service_{i}"), i);

        for _ in 0..100 {
          assert_eq!(resolve!(container, String, "common"), "shared");
        }

        let mine = resolve!(container, usize, &format!("thread_service_{i}"));
        assert_eq!(mine, i);
      });
    }
  });

  // Assert
  assert_eq!(resolve!(container, usize, "thread_service_5"), 5);
}
