//! Element definitions — the registration record for one service.
//!
//! An [`ElementDefinition`] describes how the container produces one
//! element: its declared identity (a class type or a base kind), an
//! optional alias, lifecycle scope, eagerness, and a builder. Once
//! registered it is immutable; the only state that changes afterwards is
//! the once-initialized singleton instance cell.

use std::any::{TypeId, type_name};
use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use sanduq_support::rendering::short_type_name;

use crate::error::{ContainerError, Result};
use crate::key::ElementKey;
use crate::scope::Scope;
use crate::value::{Args, BaseKind, Value};

/// Factory function invoked with positionally-resolved arguments.
pub type BuilderFn = Arc<dyn Fn(Args) -> Result<Value> + Send + Sync>;

/// How an element's instances are produced.
#[derive(Clone)]
pub enum Builder {
    /// Build through the type's registered constructor. This is the
    /// default when no explicit builder or instance is supplied, and the
    /// builder autowired definitions are synthesized with.
    Constructor,

    /// Build through an explicit factory, resolving the declared
    /// parameter keys in order first.
    Factory {
        params: Vec<ElementKey>,
        build: BuilderFn,
    },
}

impl fmt::Debug for Builder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constructor => write!(f, "Constructor"),
            Self::Factory { params, .. } => {
                f.debug_struct("Factory").field("params", params).finish_non_exhaustive()
            }
        }
    }
}

/// The declared identity of an element.
#[derive(Debug, Clone)]
pub enum ServiceType {
    /// A class identity: a fully-qualified type name, with the concrete
    /// [`TypeId`] captured when the registration was made from a
    /// statically-known type.
    Class {
        name: String,
        id: Option<TypeId>,
    },
    /// One of the base kinds. Indexed by alias only.
    Base(BaseKind),
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class { name, .. } => write!(f, "{}", short_type_name(name)),
            Self::Base(kind) => write!(f, "{kind}"),
        }
    }
}

/// Registration record for one element.
///
/// Configured through a fluent surface and handed to
/// [`Container::set`](crate::container::Container::set):
///
/// ```
/// use sanduq_container::{ElementDefinition, Value};
///
/// struct Database;
///
/// let def = ElementDefinition::of_class::<Database>()
///     .singleton()
///     .with_alias("database")
///     .with_builder(vec![], |_| Ok(Value::object(Database)));
/// assert!(def.scope().is_cached());
/// ```
pub struct ElementDefinition {
    service_type: ServiceType,
    alias: Option<String>,
    scope: Scope,
    deferred: bool,
    builder: Option<Builder>,
    instance: OnceCell<Value>,
}

impl ElementDefinition {
    /// Starts a definition for the class type `T`.
    ///
    /// Defaults: prototype scope, deferred initialization, constructor
    /// builder.
    pub fn of_class<T: Send + Sync + 'static>() -> Self {
        Self::new(ServiceType::Class {
            name: type_name::<T>().to_owned(),
            id: Some(TypeId::of::<T>()),
        })
    }

    /// Starts a definition for a class identity known only by name.
    ///
    /// Without a captured [`TypeId`] the build result is validated for
    /// object-ness only. Prefer [`ElementDefinition::of_class`].
    pub fn of_named_class(name: impl Into<String>) -> Self {
        Self::new(ServiceType::Class {
            name: name.into(),
            id: None,
        })
    }

    /// Starts a definition for a base kind. Must be given an alias
    /// before registration.
    pub fn of_base(kind: BaseKind) -> Self {
        Self::new(ServiceType::Base(kind))
    }

    pub(crate) fn of_autowired(name: &str, id: TypeId) -> Self {
        Self::new(ServiceType::Class {
            name: name.to_owned(),
            id: Some(id),
        })
        .use_constructor()
    }

    fn new(service_type: ServiceType) -> Self {
        Self {
            service_type,
            alias: None,
            scope: Scope::Prototype,
            deferred: true,
            builder: None,
            instance: OnceCell::new(),
        }
    }

    // ── Fluent configuration ──

    /// Sets the alias identity.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Switches to singleton scope.
    pub fn singleton(mut self) -> Self {
        self.scope = Scope::Singleton;
        self
    }

    /// Switches to prototype scope.
    pub fn prototype(mut self) -> Self {
        self.scope = Scope::Prototype;
        self
    }

    /// Requests initialization at registration time.
    pub fn eager(mut self) -> Self {
        self.deferred = false;
        self
    }

    /// Requests initialization on first access (the default).
    pub fn deferred(mut self) -> Self {
        self.deferred = true;
        self
    }

    /// Sets an explicit factory builder with its ordered dependency keys.
    pub fn with_builder(
        mut self,
        params: Vec<ElementKey>,
        build: impl Fn(Args) -> Result<Value> + Send + Sync + 'static,
    ) -> Self {
        self.builder = Some(Builder::Factory {
            params,
            build: Arc::new(build),
        });
        self
    }

    /// Selects the type's registered constructor as the builder.
    pub fn use_constructor(mut self) -> Self {
        self.builder = Some(Builder::Constructor);
        self
    }

    /// Binds a ready instance. Implicitly forces singleton scope: there
    /// is no builder to re-run for fresh instances.
    pub fn with_instance(mut self, value: Value) -> Self {
        // A later .prototype() call still trips the scope-conflict check
        // at registration.
        self.instance = OnceCell::with_value(value);
        self.scope = Scope::Singleton;
        self.deferred = false;
        self
    }

    // ── Accessors ──

    pub fn service_type(&self) -> &ServiceType {
        &self.service_type
    }

    /// The type-space index key; `None` for base kinds, which are
    /// reachable through their alias only.
    pub fn type_key(&self) -> Option<ElementKey> {
        match &self.service_type {
            ServiceType::Class { name, .. } => Some(ElementKey::Type(name.clone())),
            ServiceType::Base(_) => None,
        }
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// The alias-space index key, when an alias was set.
    pub fn alias_key(&self) -> Option<ElementKey> {
        self.alias.as_ref().map(|a| ElementKey::Alias(a.clone()))
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn is_singleton_scope(&self) -> bool {
        self.scope == Scope::Singleton
    }

    pub fn is_prototype_scope(&self) -> bool {
        self.scope == Scope::Prototype
    }

    pub fn is_deferred(&self) -> bool {
        self.deferred
    }

    pub fn is_eager(&self) -> bool {
        !self.deferred
    }

    pub fn is_base_type(&self) -> bool {
        matches!(self.service_type, ServiceType::Base(_))
    }

    pub fn builder(&self) -> Option<&Builder> {
        self.builder.as_ref()
    }

    pub(crate) fn ensure_builder(&mut self) {
        if self.builder.is_none() {
            self.builder = Some(Builder::Constructor);
        }
    }

    // ── Instance cell ──

    /// Returns the cached instance, if one has been built or supplied.
    pub fn instance(&self) -> Option<Value> {
        self.instance.get().cloned()
    }

    pub fn has_instance(&self) -> bool {
        self.instance.get().is_some()
    }

    /// Set-if-absent: stores `value` unless another build won the race,
    /// and returns whichever value the cell ended up holding.
    pub(crate) fn cache_instance(&self, value: Value) -> Value {
        self.instance.get_or_init(|| value).clone()
    }

    // ── Contract validation ──

    /// Checks a produced value against the declared identity: exact kind
    /// match for base kinds, [`TypeId`] match for class types that
    /// captured one.
    pub fn validate_value(&self, value: &Value) -> Result<()> {
        match &self.service_type {
            ServiceType::Base(kind) => {
                if value.kind() != kind.value_kind() {
                    return Err(ContainerError::TypeMismatch {
                        expected: kind.tag().to_owned(),
                        actual: value.describe(),
                    });
                }
            }
            ServiceType::Class { name, id } => {
                let matches = match (value, id) {
                    (Value::Object(obj), Some(expected)) => obj.type_id() == *expected,
                    (Value::Object(_), None) => true,
                    _ => false,
                };
                if !matches {
                    return Err(ContainerError::TypeMismatch {
                        expected: short_type_name(name),
                        actual: value.describe(),
                    });
                }
            }
        }
        Ok(())
    }
}

impl fmt::Debug for ElementDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementDefinition")
            .field("service_type", &self.service_type)
            .field("alias", &self.alias)
            .field("scope", &self.scope)
            .field("deferred", &self.deferred)
            .field("builder", &self.builder)
            .field("built", &self.has_instance())
            .finish()
    }
}
