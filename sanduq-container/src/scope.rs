//! Element lifecycle scopes.
//!
//! - [`Scope::Prototype`] — a fresh instance on every resolution
//! - [`Scope::Singleton`] — built once, cached on the definition, reused
//!
//! Prototype is the default. It is incompatible with eager
//! initialization and with pre-supplied instances, since both require
//! the definition to hold a built value.

use std::fmt;

/// Defines the lifetime of an element's instances within the container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Scope {
    /// New instance created on every resolution. Never cached.
    #[default]
    Prototype,

    /// One instance for the container's lifetime, created on first
    /// resolution (or at registration when eager) and cached.
    Singleton,
}

impl Scope {
    /// Returns `true` if this scope caches instances.
    #[inline]
    pub fn is_cached(&self) -> bool {
        matches!(self, Scope::Singleton)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Prototype => write!(f, "prototype"),
            Scope::Singleton => write!(f, "singleton"),
        }
    }
}
