//! The container — registration indices and the resolution engine.
//!
//! # Architecture
//! ```text
//! set(ElementDefinition) ──┐
//! register_constructor() ──┤        ┌── get_by_type(name) / get::<T>()
//! enable_autowired_..() ───┼──> Container
//! apply(Provider) ─────────┘        └── get_by_alias(name)
//! ```
//!
//! One index maps [`ElementKey`]s (type space and alias space, tagged) to
//! shared definitions; a definition registered with both identities is
//! reachable through either key and shares one singleton cell. Resolution
//! is a plain recursive call chain carrying an explicit dependency stack
//! used only for cycle detection.
//!
//! # Examples
//! ```
//! use std::sync::Arc;
//! use sanduq_container::prelude::*;
//!
//! struct Database;
//!
//! let container = Container::new();
//! container.set(
//!     ElementDefinition::of_class::<Database>()
//!         .singleton()
//!         .with_builder(vec![], |_| Ok(Value::object(Database))),
//! )?;
//!
//! let db: Arc<Database> = container.get()?;
//! # sanduq_container::error::Result::Ok(())
//! ```

use std::any::type_name;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, trace, warn};

use crate::construct::{Construct, ConstructorRegistry};
use crate::definition::{Builder, ElementDefinition};
use crate::error::{ContainerError, Result};
use crate::key::ElementKey;
use crate::provider::Provider;
use crate::value::Value;

const MSG_EAGER_PROTOTYPE: &str = "prototype scope does not support eager initialization";
const MSG_INSTANCE_PROTOTYPE: &str = "prototype scope does not support direct instance binding";

/// The service container.
///
/// Thread-safe: registration serializes against resolution, and the
/// singleton instance slot on each definition is set-if-absent, so the
/// check-then-build-then-cache sequence never hands out two identities
/// for one singleton.
pub struct Container {
    index: RwLock<HashMap<ElementKey, Arc<ElementDefinition>>>,
    autowired_prefixes: RwLock<Vec<String>>,
    constructors: ConstructorRegistry,
}

impl Container {
    /// Creates an empty container.
    pub fn new() -> Self {
        Self {
            index: RwLock::new(HashMap::new()),
            autowired_prefixes: RwLock::new(Vec::new()),
            constructors: ConstructorRegistry::new(),
        }
    }

    // ── Registration ──

    /// Registers one element definition.
    ///
    /// Validation happens before any index mutation: duplicate type or
    /// alias identities, scope conflicts, base kinds without an alias and
    /// contract-violating pre-supplied instances are all rejected with
    /// the container unchanged. An eager definition is built before this
    /// returns.
    pub fn set(&self, definition: ElementDefinition) -> Result<()> {
        let mut definition = definition;
        self.validate_definition(&definition)?;
        definition.ensure_builder();

        let definition = Arc::new(definition);
        let type_key = definition.type_key();
        let alias_key = definition.alias_key();

        {
            let mut index = self.index.write();
            if let Some(key) = &type_key {
                if index.contains_key(key) {
                    return Err(ContainerError::TypeAlreadyDefined(key.name().to_owned()));
                }
            }
            if let Some(key) = &alias_key {
                if index.contains_key(key) {
                    return Err(ContainerError::AliasAlreadyDefined(key.name().to_owned()));
                }
            }
            if let Some(key) = type_key.clone() {
                index.insert(key, definition.clone());
            }
            if let Some(key) = alias_key.clone() {
                index.insert(key, definition.clone());
            }
        }

        debug!(
            ty = %definition.service_type(),
            alias = definition.alias().unwrap_or(""),
            scope = %definition.scope(),
            eager = definition.is_eager(),
            "registered element"
        );

        if definition.is_eager() && !definition.has_instance() {
            // Eager implies singleton here; prototype+eager was rejected
            // above. Build through the normal engine so cycles and
            // contract violations surface now.
            // A definition always carries at least one identity: class
            // types have a type key, base kinds a mandatory alias.
            if let Some(key) = type_key.or(alias_key) {
                self.resolve_key(&key, &mut Vec::new())?;
            }
        }
        Ok(())
    }

    fn validate_definition(&self, definition: &ElementDefinition) -> Result<()> {
        if let Some(key) = definition.type_key() {
            if key.name().is_empty() {
                return Err(ContainerError::InvalidName);
            }
        }
        if let Some(alias) = definition.alias() {
            if alias.is_empty() {
                return Err(ContainerError::InvalidName);
            }
        }
        if let crate::definition::ServiceType::Base(kind) = definition.service_type()
            && definition.alias().is_none()
        {
            return Err(ContainerError::BaseTypeWithoutAlias(kind.tag()));
        }
        if definition.is_prototype_scope() {
            // An instance implies the not-deferred flag, so this check
            // must precede the eager one to report the right conflict.
            if definition.has_instance() {
                return Err(ContainerError::ScopeConflict(MSG_INSTANCE_PROTOTYPE));
            }
            if definition.is_eager() {
                return Err(ContainerError::ScopeConflict(MSG_EAGER_PROTOTYPE));
            }
        }
        if let Some(instance) = definition.instance() {
            definition.validate_value(&instance)?;
        }
        Ok(())
    }

    /// Records `T`'s constructor so the `Constructor` builder sentinel
    /// and namespace autowiring can build it.
    pub fn register_constructor<T: Construct>(&self) {
        self.constructors.insert::<T>();
    }

    /// Opts a namespace prefix into autowiring: an unregistered type
    /// whose name starts with the prefix is implicitly registered on
    /// first access as a deferred, prototype-scoped, constructor-built
    /// element.
    pub fn enable_autowired_for_namespace(&self, prefix: impl Into<String>) -> Result<()> {
        let prefix = prefix.into();
        if prefix.is_empty() {
            return Err(ContainerError::InvalidNamespace);
        }
        debug!(prefix = %prefix, "autowiring enabled for namespace");
        self.autowired_prefixes.write().push(prefix);
        Ok(())
    }

    /// Applies a [`Provider`] module's registrations.
    pub fn apply(&self, provider: &dyn Provider) -> Result<()> {
        debug!(provider = provider.name(), "applying provider");
        provider.setup(self)
    }

    // ── Resolution ──

    /// Resolves by type identity.
    pub fn get_by_type(&self, type_name: impl AsRef<str>) -> Result<Value> {
        self.resolve_key(&ElementKey::ty(type_name.as_ref()), &mut Vec::new())
    }

    /// Resolves by alias identity.
    pub fn get_by_alias(&self, alias: impl AsRef<str>) -> Result<Value> {
        self.resolve_key(&ElementKey::alias(alias.as_ref()), &mut Vec::new())
    }

    /// Typed convenience over [`Container::get_by_type`]: resolves `T`
    /// by its own type name and downcasts the shared instance.
    pub fn get<T: Send + Sync + 'static>(&self) -> Result<Arc<T>> {
        let value = self.get_by_type(type_name::<T>())?;
        let actual = value.describe();
        value.downcast::<T>().ok_or(ContainerError::TypeMismatch {
            expected: sanduq_support::rendering::short_type_name(type_name::<T>()),
            actual,
        })
    }

    /// Returns whether a definition exists for `key`. Never synthesizes.
    pub fn contains(&self, key: &ElementKey) -> bool {
        self.index.read().contains_key(key)
    }

    /// Number of indexed keys (a definition with both identities counts
    /// twice).
    pub fn len(&self) -> usize {
        self.index.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.read().is_empty()
    }

    /// One resolution step for `key` with the current dependency stack.
    fn resolve_key(&self, key: &ElementKey, stack: &mut Vec<ElementKey>) -> Result<Value> {
        // Cycle check runs before pushing, so depth-0 self-reference is
        // caught as well.
        if stack.contains(key) {
            let mut chain = stack.clone();
            chain.push(key.clone());
            warn!(key = %key, "circular dependency");
            return Err(ContainerError::CircularDependency { chain });
        }

        let definition = self.lookup(key, stack)?;

        if definition.is_singleton_scope() {
            if let Some(cached) = definition.instance() {
                // Defensive re-check of the cached value's contract.
                definition.validate_value(&cached)?;
                trace!(key = %key, "singleton cache hit");
                return Ok(cached);
            }
        }

        stack.push(key.clone());
        let built = self.invoke_builder(&definition, stack);
        stack.pop();
        let value = built?;

        definition.validate_value(&value)?;

        if definition.is_singleton_scope() {
            return Ok(definition.cache_instance(value));
        }
        Ok(value)
    }

    /// Finds the definition for `key`, synthesizing an autowired one for
    /// unregistered type keys inside an approved namespace.
    fn lookup(
        &self,
        key: &ElementKey,
        stack: &[ElementKey],
    ) -> Result<Arc<ElementDefinition>> {
        if let Some(definition) = self.index.read().get(key) {
            return Ok(definition.clone());
        }
        if let ElementKey::Type(name) = key {
            if self.matches_autowired_namespace(name) {
                return self.synthesize_autowired(name, stack);
            }
        }
        Err(ContainerError::NotFound {
            key: key.clone(),
            stack: stack.to_vec(),
        })
    }

    fn matches_autowired_namespace(&self, type_name: &str) -> bool {
        self.autowired_prefixes
            .read()
            .iter()
            .any(|prefix| type_name.starts_with(prefix.as_str()))
    }

    /// Resolve-or-synthesize-then-register: builds a default definition
    /// for an in-namespace type and pushes it through the normal `set`
    /// path, making the implicit registration observable like any other.
    fn synthesize_autowired(
        &self,
        type_name: &str,
        stack: &[ElementKey],
    ) -> Result<Arc<ElementDefinition>> {
        let spec = self.constructors.get(type_name).ok_or_else(|| {
            ContainerError::ConstructorNotAccessible {
                type_name: type_name.to_owned(),
                stack: stack.to_vec(),
            }
        })?;

        debug!(ty = type_name, "synthesizing autowired definition");
        let definition = ElementDefinition::of_autowired(type_name, spec.type_id)
            .deferred()
            .prototype();

        match self.set(definition) {
            Ok(()) => {}
            // Another thread synthesized the same type concurrently; the
            // indexed definition wins.
            Err(ContainerError::TypeAlreadyDefined(_)) => {}
            Err(other) => return Err(other),
        }

        let key = ElementKey::ty(type_name);
        self.index.read().get(&key).cloned().ok_or(ContainerError::NotFound {
            key,
            stack: stack.to_vec(),
        })
    }

    /// Invokes a definition's builder with the extended stack, resolving
    /// each declared parameter key in order through the engine.
    fn invoke_builder(
        &self,
        definition: &ElementDefinition,
        stack: &mut Vec<ElementKey>,
    ) -> Result<Value> {
        match definition.builder() {
            Some(Builder::Factory { params, build }) => {
                let args = self.resolve_params(params, stack)?;
                build(crate::value::Args::new(args))
            }
            Some(Builder::Constructor) | None => {
                let type_name = match definition.service_type() {
                    crate::definition::ServiceType::Class { name, .. } => name.clone(),
                    crate::definition::ServiceType::Base(kind) => kind.tag().to_owned(),
                };
                let spec = self.constructors.get(&type_name).ok_or_else(|| {
                    ContainerError::ConstructorNotAccessible {
                        type_name: type_name.clone(),
                        stack: stack.clone(),
                    }
                })?;
                let args = self.resolve_params(&spec.params, stack)?;
                (spec.build)(crate::value::Args::new(args))
            }
        }
    }

    fn resolve_params(
        &self,
        params: &[ElementKey],
        stack: &mut Vec<ElementKey>,
    ) -> Result<Vec<Value>> {
        let mut resolved = Vec::with_capacity(params.len());
        for param in params {
            resolved.push(self.resolve_key(param, stack)?);
        }
        Ok(resolved)
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("indexed_keys", &self.len())
            .finish()
    }
}

pub mod prelude {
    pub use super::Container;
    pub use crate::construct::Construct;
    pub use crate::definition::ElementDefinition;
    pub use crate::error::{ContainerError, Result};
    pub use crate::key::ElementKey;
    pub use crate::provider::Provider;
    pub use crate::scope::Scope;
    pub use crate::value::{Args, BaseKind, Value, ValueKind};
}
