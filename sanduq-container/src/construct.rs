//! Constructor binding — the explicit replacement for reflection.
//!
//! A statically-typed container cannot inspect constructor signatures at
//! runtime. Types opt in by implementing [`Construct`], declaring their
//! ordered dependency keys and a build function; the container keeps
//! those specs in a registry keyed by type name. The registry powers
//! both the [`Builder::Constructor`](crate::definition::Builder) sentinel
//! and namespace autowiring.

use std::any::{TypeId, type_name};
use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, trace};

use crate::definition::BuilderFn;
use crate::error::Result;
use crate::key::ElementKey;
use crate::value::{Args, Value};

/// A type the container can build from its declared dependencies.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use sanduq_container::{Construct, ElementKey};
/// use sanduq_container::value::Args;
/// use sanduq_container::error::Result;
///
/// struct Database;
/// impl Construct for Database {
///     fn construct(_: Args) -> Result<Self> {
///         Ok(Database)
///     }
/// }
///
/// struct UserRepo {
///     db: Arc<Database>,
/// }
/// impl Construct for UserRepo {
///     fn dependencies() -> Vec<ElementKey> {
///         vec![ElementKey::of::<Database>()]
///     }
///     fn construct(args: Args) -> Result<Self> {
///         Ok(UserRepo { db: args.object(0)? })
///     }
/// }
/// ```
pub trait Construct: Sized + Send + Sync + 'static {
    /// The ordered dependency keys of this type's constructor. A type
    /// with no dependencies keeps the default empty list.
    fn dependencies() -> Vec<ElementKey> {
        Vec::new()
    }

    /// Builds an instance from the positionally-resolved arguments.
    fn construct(args: Args) -> Result<Self>;
}

/// A registered constructor: dependency keys plus an erased build
/// function producing a shared object value.
pub(crate) struct ConstructorSpec {
    pub type_name: &'static str,
    pub type_id: TypeId,
    pub params: Vec<ElementKey>,
    pub build: BuilderFn,
}

impl ConstructorSpec {
    fn of<T: Construct>() -> Self {
        Self {
            type_name: type_name::<T>(),
            type_id: TypeId::of::<T>(),
            params: T::dependencies(),
            build: Arc::new(|args| Ok(Value::object(T::construct(args)?))),
        }
    }
}

/// Maps type names to constructor specs.
#[derive(Default)]
pub(crate) struct ConstructorRegistry {
    specs: DashMap<&'static str, Arc<ConstructorSpec>>,
}

impl ConstructorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `T`'s constructor. Re-registering the same type replaces
    /// the earlier entry.
    pub fn insert<T: Construct>(&self) {
        let spec = Arc::new(ConstructorSpec::of::<T>());
        debug!(ty = %spec.type_name, params = spec.params.len(), "registered constructor");
        self.specs.insert(spec.type_name, spec);
    }

    /// Looks up a constructor spec by type name. The guard is dropped
    /// before returning so callers can recurse freely.
    pub fn get(&self, type_name: &str) -> Option<Arc<ConstructorSpec>> {
        let found = self.specs.get(type_name).map(|entry| entry.value().clone());
        if found.is_none() {
            trace!(ty = type_name, "no constructor registered");
        }
        found
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Leaf;

    impl Construct for Leaf {
        fn construct(_: Args) -> Result<Self> {
            Ok(Leaf)
        }
    }

    struct Node;

    impl Construct for Node {
        fn dependencies() -> Vec<ElementKey> {
            vec![ElementKey::of::<Leaf>(), ElementKey::alias("label")]
        }

        fn construct(args: Args) -> Result<Self> {
            args.object::<Leaf>(0)?;
            args.str(1)?;
            Ok(Node)
        }
    }

    #[test]
    fn registry_lookup_by_type_name() {
        let registry = ConstructorRegistry::new();
        registry.insert::<Leaf>();
        registry.insert::<Node>();
        assert_eq!(registry.len(), 2);

        let spec = registry.get(type_name::<Node>()).unwrap();
        assert_eq!(spec.type_id, TypeId::of::<Node>());
        assert_eq!(spec.params.len(), 2);
        assert!(registry.get("unknown::Type").is_none());
    }

    #[test]
    fn spec_builds_an_object_value() {
        let spec = ConstructorSpec::of::<Leaf>();
        assert!(spec.params.is_empty());
        let value = (spec.build)(Args::new(vec![])).unwrap();
        assert!(value.downcast::<Leaf>().is_some());
    }
}
