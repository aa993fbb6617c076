//! Basic example of the Sanduq service container.
//!
//! A small composition root: explicit registrations for the shared
//! services, alias-bound configuration values, and autowiring for the
//! application types.

use std::sync::Arc;

use sanduq::prelude::*;

// === Services ===

struct ConsoleLogger;

impl ConsoleLogger {
    fn log(&self, msg: &str) {
        println!("[LOG] {msg}");
    }
}

struct Database {
    url: String,
}

impl Database {
    fn query(&self, sql: &str) -> String {
        format!("rows from {} for `{sql}`", self.url)
    }
}

struct UserRepository {
    db: Arc<Database>,
}

impl Construct for UserRepository {
    fn dependencies() -> Vec<ElementKey> {
        vec![ElementKey::of::<Database>()]
    }

    fn construct(args: Args) -> Result<Self> {
        Ok(Self { db: args.object(0)? })
    }
}

struct UserService {
    repo: Arc<UserRepository>,
    logger: Arc<ConsoleLogger>,
}

impl Construct for UserService {
    fn dependencies() -> Vec<ElementKey> {
        vec![
            ElementKey::of::<UserRepository>(),
            ElementKey::of::<ConsoleLogger>(),
        ]
    }

    fn construct(args: Args) -> Result<Self> {
        Ok(Self {
            repo: args.object(0)?,
            logger: args.object(1)?,
        })
    }
}

impl UserService {
    fn get_user(&self, id: u64) -> String {
        self.logger.log(&format!("getting user {id}"));
        self.repo.db.query(&format!("SELECT * FROM users WHERE id = {id}"))
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("sanduq=debug")
        .init();

    let container = Container::new();

    // Configuration values live in alias space
    container.set(
        ElementDefinition::of_base(BaseKind::Str)
            .with_alias("database_url")
            .with_instance(Value::from("postgres://localhost/myapp")),
    )?;

    // Shared services are explicit singletons
    container.set(
        ElementDefinition::of_class::<ConsoleLogger>()
            .singleton()
            .with_alias("logger")
            .with_builder(vec![], |_| Ok(Value::object(ConsoleLogger))),
    )?;
    container.set(
        ElementDefinition::of_class::<Database>()
            .singleton()
            .with_alias("database")
            .with_builder(vec![ElementKey::alias("database_url")], |args| {
                Ok(Value::object(Database {
                    url: args.str(0)?.to_owned(),
                }))
            }),
    )?;

    // Application types are autowired by namespace
    container.register_constructor::<UserRepository>();
    container.register_constructor::<UserService>();
    container.enable_autowired_for_namespace("basic::")?;

    let service: Arc<UserService> = container.get()?;
    println!("{}", service.get_user(42));

    // Prototype scope: a second resolution is a fresh service over the
    // same singleton database
    let again: Arc<UserService> = container.get()?;
    assert!(!Arc::ptr_eq(&service, &again));
    assert!(Arc::ptr_eq(&service.repo.db, &again.repo.db));

    Ok(())
}
