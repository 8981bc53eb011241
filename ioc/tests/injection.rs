use fibre_container::{
  args, injectable, Container, ContainerConfig, Error, Field, Inject, Result,
};
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

// --- Test Fixtures ---

#[derive(Debug, Default, Clone, PartialEq)]
struct Profile {
  name: String,
  greeting: String,
  visits: u32,
}

// `visits` is not listed, so injection never touches it.
injectable!(Profile: Clone { name, greeting = "greeting" });

#[derive(Debug, Default, Clone, PartialEq)]
struct Settings {
  port: u16,
}

injectable!(Settings: Clone { port = "port" });

#[derive(Debug, Default)]
struct App {
  settings: Settings,
  title: String,
}

injectable!(App { settings, title = "title" });

#[derive(Debug, Default)]
struct Server {
  settings: Arc<Settings>,
}

injectable!(Server { settings });

#[derive(Debug, Default, PartialEq)]
struct Prebuilt {
  value: u32,
}

impl Inject for Prebuilt {
  fn fields() -> Vec<Field<Self>> {
    vec![Field::new("value", |target: &mut Self, value: u32| target.value = value)]
  }

  fn construct(&mut self, _container: &Container) -> Result<bool> {
    self.value = 99;
    Ok(true)
  }
}

/// Records the level and target of every event it sees.
#[derive(Clone, Default)]
struct EventLog(Arc<Mutex<Vec<(Level, String)>>>);

impl<S: Subscriber> Layer<S> for EventLog {
  fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
    let metadata = event.metadata();
    self
      .0
      .lock()
      .push((*metadata.level(), metadata.target().to_string()));
  }
}

// --- Field Injection ---

#[test]
fn test_inject_fills_plain_and_keyed_fields() {
  // Arrange
  let container = Container::new();
  container.provide(|| String::from("ada")).unwrap();
  // A near-miss value under the key is converted to the field type.
  container.instance("greeting", "hello");

  let mut profile = Profile {
    visits: 7,
    ..Profile::default()
  };

  // Act
  container.inject(&mut profile).unwrap();

  // Assert
  assert_eq!(
    profile,
    Profile {
      name: "ada".into(),
      greeting: "hello".into(),
      visits: 7,
    }
  );
}

#[test]
fn test_keyed_field_falls_back_to_its_type() {
  let container = Container::new();
  container.provide(|| String::from("fallback")).unwrap();

  let mut profile = Profile::default();
  container.inject(&mut profile).unwrap();

  assert_eq!(profile.greeting, "fallback");
}

#[test]
fn test_unresolved_fields_are_left_untouched() {
  let container = Container::new();

  let mut profile = Profile {
    name: "kept".into(),
    greeting: "also kept".into(),
    visits: 1,
  };
  container.inject(&mut profile).unwrap();

  assert_eq!(profile.name, "kept");
  assert_eq!(profile.greeting, "also kept");
}

#[test]
fn test_inject_with_prefers_caller_arguments() {
  let container = Container::new();
  container.provide(|| String::from("registered")).unwrap();

  let mut profile = Profile::default();
  container
    .inject_with(&mut profile, args![String::from("grace")])
    .unwrap();

  assert_eq!(profile.name, "grace");
}

#[test]
fn test_mismatched_keyed_value_leaves_target_unmodified() {
  // Arrange
  let container = Container::new();
  container.provide(|| String::from("ada")).unwrap();
  container.instance("greeting", 42u32);

  let mut profile = Profile {
    visits: 3,
    ..Profile::default()
  };
  let before = profile.clone();

  // Act
  let err = container.inject(&mut profile).unwrap_err();

  // Assert
  match err {
    Error::FieldTypeMismatch {
      field,
      declared,
      actual,
      ..
    } => {
      assert_eq!(field, "greeting");
      assert!(declared.contains("String"));
      assert_eq!(actual, "u32");
    }
    other => panic!("unexpected error: {other}"),
  }
  // `name` resolved before the failure but was never written.
  assert_eq!(profile, before);
}

#[test]
fn test_self_constructing_target_skips_fields() {
  let container = Container::new();
  container.provide(|| 5u32).unwrap();

  let mut prebuilt = Prebuilt::default();
  container.inject(&mut prebuilt).unwrap();

  assert_eq!(prebuilt, Prebuilt { value: 99 });
}

// --- Auto-construction ---

#[test]
fn test_nested_structures_are_auto_constructed() {
  // Arrange
  let container = Container::new();
  container.instance("port", 8080u16);
  container.instance("title", String::from("demo"));

  // Act
  let mut app = App::default();
  container.inject(&mut app).unwrap();

  // Assert
  assert_eq!(app.settings, Settings { port: 8080 });
  assert_eq!(app.title, "demo");
}

#[test]
fn test_failed_auto_construction_degrades_to_zero_when_lenient() {
  let container = Container::new();
  container.instance("port", "not a number");

  let settings = container.resolve::<Settings>().unwrap();

  assert_eq!(settings, Settings::default());
}

#[test]
fn test_failed_auto_construction_is_an_error_when_strict() {
  let container = Container::with_config(ContainerConfig::strict());
  container.instance("port", "not a number");

  let err = container.resolve::<Settings>().unwrap_err();

  assert!(matches!(err, Error::FieldTypeMismatch { .. }));
}

#[test]
fn test_strict_policy_from_yaml() {
  let config = ContainerConfig::from_yaml_str("construction: strict").unwrap();
  let container = Container::with_config(config);
  container.instance("port", "not a number");

  let results = container.call(|settings: Settings| settings.port);

  assert!(results.is_err());
}

#[test]
fn test_shared_handle_parameter_is_auto_constructed() {
  let container = Container::new();

  let results = container
    .call_with(|settings: Arc<Settings>| settings.port, args![9u16])
    .unwrap();

  assert_eq!(*results[0].downcast_ref::<u16>().unwrap(), 9);
}

#[test]
fn test_shared_handle_field_is_auto_constructed() {
  let container = Container::new();
  container.instance("port", 8443u16);

  let mut server = Server::default();
  container.inject(&mut server).unwrap();

  assert_eq!(*server.settings, Settings { port: 8443 });
}

#[test]
fn test_lenient_degrade_emits_a_warning() {
  // Arrange
  let log = EventLog::default();
  let subscriber = tracing_subscriber::registry().with(log.clone());
  let container = Container::new();
  container.instance("port", "not a number");

  // Act
  let settings = tracing::subscriber::with_default(subscriber, || {
    container.resolve::<Settings>().unwrap()
  });

  // Assert
  assert_eq!(settings, Settings::default());
  let events = log.0.lock();
  assert!(events
    .iter()
    .any(|(level, target)| *level == Level::WARN && target == "fibre_container::resolve"));
}

#[test]
fn test_strict_failure_emits_no_warning() {
  let log = EventLog::default();
  let subscriber = tracing_subscriber::registry().with(log.clone());
  let container = Container::with_config(ContainerConfig::strict());
  container.instance("port", "not a number");

  let result = tracing::subscriber::with_default(subscriber, || container.resolve::<Settings>());

  assert!(result.is_err());
  assert!(log.0.lock().iter().all(|(level, _)| *level != Level::WARN));
}
