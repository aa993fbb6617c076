//! Provider trait — a module of related element registrations.
//!
//! Providers group registrations by domain so a composition root reads
//! as a list of modules instead of one long registration block:
//!
//! ```rust,ignore
//! container.apply(&HttpProvider)?;
//! container.apply(&StorageProvider)?;
//! container.apply(&AppProvider)?;
//! ```

use crate::container::Container;
use crate::error::Result;

/// A module that registers related elements into a container.
///
/// Applied through [`Container::apply`]; a failing registration aborts
/// the module and surfaces to the caller.
pub trait Provider: Send + Sync {
    /// Register this module's elements.
    fn setup(&self, container: &Container) -> Result<()>;

    /// Human-readable name used in logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::ElementDefinition;
    use crate::value::{BaseKind, Value};

    struct SettingsProvider;

    impl Provider for SettingsProvider {
        fn setup(&self, container: &Container) -> Result<()> {
            container.set(
                ElementDefinition::of_base(BaseKind::Str)
                    .with_alias("app_name")
                    .with_instance(Value::from("sanduq-demo")),
            )?;
            container.set(
                ElementDefinition::of_base(BaseKind::Bool)
                    .with_alias("debug")
                    .with_instance(Value::from(true)),
            )
        }
    }

    #[test]
    fn provider_registers_into_container() {
        let container = Container::new();
        container.apply(&SettingsProvider).unwrap();

        let name = container.get_by_alias("app_name").unwrap();
        assert_eq!(name, Value::from("sanduq-demo"));
        assert_eq!(container.get_by_alias("debug").unwrap(), Value::from(true));
    }

    #[test]
    fn provider_has_a_name() {
        assert!(SettingsProvider.name().contains("SettingsProvider"));
    }

    #[test]
    fn applying_twice_fails_on_duplicate_alias() {
        let container = Container::new();
        container.apply(&SettingsProvider).unwrap();
        assert!(container.apply(&SettingsProvider).is_err());
    }
}
