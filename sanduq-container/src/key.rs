//! Element identification keys.
//!
//! [`ElementKey`] uniquely identifies an element within the container.
//! Types and aliases are disjoint identity namespaces, so the key is a
//! tagged union: a type key and an alias key never compare equal, even
//! when the underlying strings match. The resolution engine carries a
//! homogeneous stack of these keys for cycle detection.

use std::any::type_name;
use std::fmt;

use sanduq_support::rendering::short_type_name;

/// Uniquely identifies an element in the container.
///
/// # Examples
/// ```
/// use sanduq_container::key::ElementKey;
///
/// struct Database;
///
/// let by_type = ElementKey::of::<Database>();
/// let by_alias = ElementKey::alias("database");
/// assert_ne!(by_type, by_alias);
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum ElementKey {
    /// Identity in type space: a fully-qualified type name.
    Type(String),
    /// Identity in alias space: a human-readable name.
    Alias(String),
}

impl ElementKey {
    /// Creates a type-space key from the Rust type `T`.
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::Type(type_name::<T>().to_owned())
    }

    /// Creates a type-space key from a raw type name.
    ///
    /// Prefer [`ElementKey::of`] when the type is known statically.
    #[inline]
    pub fn ty(name: impl Into<String>) -> Self {
        Self::Type(name.into())
    }

    /// Creates an alias-space key.
    #[inline]
    pub fn alias(name: impl Into<String>) -> Self {
        Self::Alias(name.into())
    }

    /// Returns the underlying identity string.
    #[inline]
    pub fn name(&self) -> &str {
        match self {
            Self::Type(name) | Self::Alias(name) => name,
        }
    }

    /// Returns `true` for type-space keys.
    #[inline]
    pub fn is_type(&self) -> bool {
        matches!(self, Self::Type(_))
    }

    /// Returns `true` for alias-space keys.
    #[inline]
    pub fn is_alias(&self) -> bool {
        matches!(self, Self::Alias(_))
    }
}

impl fmt::Display for ElementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type(name) => write!(f, "{}", short_type_name(name)),
            Self::Alias(name) => write!(f, "@{name}"),
        }
    }
}

impl fmt::Debug for ElementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type(name) => write!(f, "ElementKey::Type({name})"),
            Self::Alias(name) => write!(f, "ElementKey::Alias({name})"),
        }
    }
}
