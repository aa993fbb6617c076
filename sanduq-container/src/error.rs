//! Error types for container operations.
//!
//! One error kind, parameterized by reason, covers every failure mode.
//! Failures that occur mid-resolution carry the dependency stack so the
//! message shows the whole chain that led to the fault.

use sanduq_support::rendering::{render_chain, short_type_name};

use crate::key::ElementKey;

/// Main error type for all container operations.
#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    /// An element was registered with an empty type name or alias.
    #[error("not a valid element name")]
    InvalidName,

    /// An empty namespace prefix was passed to autowiring.
    #[error("not a valid namespace prefix")]
    InvalidNamespace,

    /// A class type identity was registered twice.
    #[error("type already defined: {}", short_type_name(.0))]
    TypeAlreadyDefined(String),

    /// An alias identity was registered twice.
    #[error("alias already defined: @{0}")]
    AliasAlreadyDefined(String),

    /// A base-kind definition was registered without an alias.
    #[error("base type '{0}' requires an alias")]
    BaseTypeWithoutAlias(&'static str),

    /// The definition's scope conflicts with its other settings.
    #[error("{0}")]
    ScopeConflict(&'static str),

    /// No definition exists for the requested key.
    #[error("definition not found: {key}{}", render_stack(.stack))]
    NotFound {
        key: ElementKey,
        stack: Vec<ElementKey>,
    },

    /// A constructor build was requested for a type with no registered
    /// constructor.
    #[error("constructor not accessible for {}{}", short_type_name(.type_name), render_stack(.stack))]
    ConstructorNotAccessible {
        type_name: String,
        stack: Vec<ElementKey>,
    },

    /// The resolution chain closed on itself.
    #[error("circular dependency detected: {}", render_keys(.chain))]
    CircularDependency { chain: Vec<ElementKey> },

    /// A build result did not satisfy the declared type contract.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    /// A builder failed on its own terms.
    #[error("builder failed: {source}")]
    BuildFailed {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ContainerError {
    /// Wraps an arbitrary builder error.
    pub fn build(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::BuildFailed {
            source: source.into(),
        }
    }
}

fn render_keys(keys: &[ElementKey]) -> String {
    let rendered: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
    render_chain(&rendered)
}

fn render_stack(stack: &[ElementKey]) -> String {
    if stack.is_empty() {
        String::new()
    } else {
        format!(" (while resolving {})", render_keys(stack))
    }
}

/// Convenient Result type for container operations.
pub type Result<T> = std::result::Result<T, ContainerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display_with_stack() {
        let err = ContainerError::NotFound {
            key: ElementKey::alias("db"),
            stack: vec![ElementKey::ty("app::Service"), ElementKey::alias("repo")],
        };
        let msg = err.to_string();
        assert!(msg.contains("definition not found: @db"));
        assert!(msg.contains("Service -> @repo"));
    }

    #[test]
    fn not_found_display_without_stack() {
        let err = ContainerError::NotFound {
            key: ElementKey::ty("app::Service"),
            stack: vec![],
        };
        assert_eq!(err.to_string(), "definition not found: Service");
    }

    #[test]
    fn circular_dependency_display() {
        let err = ContainerError::CircularDependency {
            chain: vec![
                ElementKey::ty("app::A"),
                ElementKey::ty("app::B"),
                ElementKey::ty("app::A"),
            ],
        };
        let msg = err.to_string();
        assert!(msg.contains("circular dependency"));
        assert!(msg.contains("A -> B -> A"));
    }

    #[test]
    fn type_mismatch_display() {
        let err = ContainerError::TypeMismatch {
            expected: "int".into(),
            actual: "string".into(),
        };
        assert_eq!(err.to_string(), "type mismatch: expected int, got string");
    }

    #[test]
    fn build_failed_wraps_source() {
        let err = ContainerError::build("connection refused");
        assert!(err.to_string().contains("connection refused"));
    }
}
