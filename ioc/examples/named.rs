use fibre_container::{resolve, Container, Interface};
use std::sync::Arc;

// --- Abstraction and Implementations ---
trait MessageSender: Send + Sync {
  fn send(&self, to: &str, message: &str) -> String;
}

struct EmailSender;
impl MessageSender for EmailSender {
  fn send(&self, to: &str, message: &str) -> String {
    format!("Sending email to {}: '{}'", to, message)
  }
}

struct SmsSender;
impl MessageSender for SmsSender {
  fn send(&self, to: &str, message: &str) -> String {
    format!("Sending SMS to {}: '{}'", to, message)
  }
}

fn sender(inner: Arc<dyn MessageSender>) -> Interface<dyn MessageSender> {
  Interface::new(inner)
}

fn main() -> fibre_container::Result<()> {
  let container = Container::new();

  // --- Registration ---
  // Register both implementations under their own keys.
  container.singleton("email", || sender(Arc::new(EmailSender)))?;
  container.singleton("sms", || sender(Arc::new(SmsSender)))?;
  container.alias("sms", "text");

  // --- Resolution ---
  // Choose the implementation at the point of resolution.
  let email_notifier = resolve!(container, Interface<dyn MessageSender>, "email");
  let sms_notifier = resolve!(container, Interface<dyn MessageSender>, "text");

  let result1 = email_notifier.send("test@example.com", "Hello from Fibre!");
  let result2 = sms_notifier.send("+123456789", "Hello from Fibre!");

  println!("{}", result1);
  println!("{}", result2);

  assert!(result1.contains("email"));
  assert!(result2.contains("SMS"));
  Ok(())
}
