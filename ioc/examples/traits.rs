use fibre_container::{component, resolve, Container, Interface};
use std::sync::Arc;

// 1. Define the abstraction (the trait)
trait Logger: Send + Sync {
  fn log(&self, message: &str);
}

// 2. Define a concrete implementation
struct ConsoleLogger;
impl Logger for ConsoleLogger {
  fn log(&self, message: &str) {
    println!("[CONSOLE LOG]: {}", message);
  }
}

// 3. Define a service that depends on the abstraction
struct ReportService {
  logger: Interface<dyn Logger>,
}

component!(ReportService);

impl ReportService {
  fn generate_report(&self) {
    self.logger.log("Starting report generation.");
    self.logger.log("Finished report generation.");
  }
}

fn main() -> fibre_container::Result<()> {
  let container = Container::new();

  // --- Registration ---

  // Register the concrete ConsoleLogger as the implementation of `dyn Logger`.
  container.singleton("logger", || {
    Interface::new(Arc::new(ConsoleLogger) as Arc<dyn Logger>)
  })?;

  // The ReportService factory declares its dependency as a parameter; the
  // container supplies it by type.
  container.singleton("reports", |logger: Interface<dyn Logger>| ReportService { logger })?;

  // --- Resolution and Usage ---
  println!("Resolving the high-level service...");
  let report_service = resolve!(container, Arc<ReportService>);

  println!("Using the service...");
  report_service.generate_report();
  Ok(())
}
