//! # Sanduq — a scope-aware dependency injection container for Rust
//!
//! A service container that maps abstract identities (a type, or a type
//! plus a human-readable alias) to concrete instances, building them on
//! demand from registered builders and recursively resolving their
//! declared dependencies, with cycle detection, singleton/prototype
//! scopes and namespace autowiring.

pub use sanduq_container::*;
pub use sanduq_support::rendering;

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use std::sync::Arc;

    struct Clock;

    #[test]
    fn facade_exposes_the_container_surface() {
        let container = Container::new();
        container
            .set(
                ElementDefinition::of_class::<Clock>()
                    .singleton()
                    .with_builder(vec![], |_| Ok(Value::object(Clock))),
            )
            .unwrap();

        let a: Arc<Clock> = container.get().unwrap();
        let b: Arc<Clock> = container.get().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
