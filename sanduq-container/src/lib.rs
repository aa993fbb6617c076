//! Core container implementation for Sanduq DI.

pub mod construct;
pub mod container;
pub mod definition;
pub mod error;
pub mod key;
pub mod provider;
pub mod scope;
pub mod value;

pub use container::prelude;
pub use container::Container;
pub use construct::Construct;
pub use definition::ElementDefinition;
pub use error::{ContainerError, Result};
pub use key::ElementKey;
pub use provider::Provider;
pub use scope::Scope;
pub use value::{Args, BaseKind, Value, ValueKind};
