use fibre_container::{injectable, Container, ContainerConfig};

#[derive(Debug, Default, Clone)]
struct Database {
  url: String,
  pool_size: u32,
}

injectable!(Database: Clone { url = "database.url", pool_size = "database.pool_size" });

#[derive(Debug, Default)]
struct Application {
  name: String,
  database: Database,
}

injectable!(Application { name = "app.name", database });

fn main() -> fibre_container::Result<()> {
  let config = ContainerConfig::from_yaml_str("construction: strict")?;
  let container = Container::with_config(config);

  container.instance("app.name", "inventory");
  container.instance("database.url", "postgres://localhost/inventory");
  // A u8 is widened to the u32 field.
  container.instance("database.pool_size", 8u8);

  let mut app = Application::default();
  container.inject(&mut app)?;

  println!("{app:#?}");
  assert_eq!(app.name, "inventory");
  assert_eq!(app.database.pool_size, 8);
  Ok(())
}
