use fibre_container::{component, resolve, Container, Error};
use std::panic;
use std::sync::Arc;

struct UnregisteredService;
component!(UnregisteredService);

fn main() {
  let container = Container::new();

  // --- Using the panicking `resolve!` macro ---
  println!("Attempting to resolve a service that was never registered...");

  let result = panic::catch_unwind(panic::AssertUnwindSafe(|| {
    // This line will panic!
    let _service = resolve!(container, Arc<UnregisteredService>);
  }));

  assert!(result.is_err(), "resolve! should have panicked.");
  println!("Successfully caught the expected panic from resolve!.");

  // --- Using the non-panicking methods ---
  println!("\nNow, attempting to resolve using `get()` and `resolve()`...");

  match container.get("unregistered") {
    Ok(None) => println!("Correctly received `None` for the missing key."),
    other => panic!("Should not have found the service: {other:?}"),
  }

  match container.resolve::<Arc<UnregisteredService>>() {
    Err(Error::Unresolved { type_name }) => println!("Correctly failed to resolve {type_name}."),
    _ => panic!("Should not have resolved the service!"),
  }
}
