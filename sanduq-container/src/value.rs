//! Values produced and consumed by the container.
//!
//! Elements are registered under string identities, so the values flowing
//! through resolution are type-erased. [`Value`] carries the six base kinds
//! (string, int, float, bool, list, callable) plus [`Value::Object`] for
//! class instances, which keeps the concrete [`TypeId`] so the container
//! can validate build results against their declared contract.

use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::sync::Arc;

use sanduq_support::rendering::short_type_name;

use crate::error::{ContainerError, Result};

/// A value held as one of the base callable kinds.
pub type CallableValue = Arc<dyn Fn(Args) -> Result<Value> + Send + Sync>;

/// A type-erased value produced by a builder.
#[derive(Clone)]
pub enum Value {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    List(Vec<Value>),
    Callable(CallableValue),
    Object(ObjectValue),
}

/// A shared class instance with its captured concrete type identity.
#[derive(Clone)]
pub struct ObjectValue {
    inner: Arc<dyn Any + Send + Sync>,
    type_id: TypeId,
    type_name: &'static str,
}

impl Value {
    /// Wraps a class instance, capturing its concrete type identity.
    pub fn object<T: Send + Sync + 'static>(value: T) -> Self {
        Self::shared(Arc::new(value))
    }

    /// Wraps an already-shared class instance without another allocation.
    pub fn shared<T: Send + Sync + 'static>(value: Arc<T>) -> Self {
        Self::Object(ObjectValue {
            inner: value,
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
        })
    }

    /// Wraps a callable.
    pub fn callable(f: impl Fn(Args) -> Result<Value> + Send + Sync + 'static) -> Self {
        Self::Callable(Arc::new(f))
    }

    /// Returns the kind tag of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Str(_) => ValueKind::Str,
            Self::Int(_) => ValueKind::Int,
            Self::Float(_) => ValueKind::Float,
            Self::Bool(_) => ValueKind::Bool,
            Self::List(_) => ValueKind::List,
            Self::Callable(_) => ValueKind::Callable,
            Self::Object(_) => ValueKind::Object,
        }
    }

    /// Recovers the shared instance if this is an object of type `T`.
    pub fn downcast<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        match self {
            Self::Object(obj) => obj.inner.clone().downcast::<T>().ok(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns a description of this value for error messages: the kind
    /// tag, refined to the concrete type name for objects.
    pub fn describe(&self) -> String {
        match self {
            Self::Object(obj) => short_type_name(obj.type_name),
            other => other.kind().to_string(),
        }
    }
}

impl ObjectValue {
    /// The concrete [`TypeId`] captured when the object was wrapped.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// The concrete type name captured when the object was wrapped.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

// Objects and callables compare by identity, everything else by value.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Callable(a), Self::Callable(b)) => Arc::ptr_eq(a, b),
            (Self::Object(a), Self::Object(b)) => Arc::ptr_eq(&a.inner, &b.inner),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => write!(f, "Str({s:?})"),
            Self::Int(i) => write!(f, "Int({i})"),
            Self::Float(v) => write!(f, "Float({v})"),
            Self::Bool(b) => write!(f, "Bool({b})"),
            Self::List(items) => f.debug_tuple("List").field(items).finish(),
            Self::Callable(_) => write!(f, "Callable(..)"),
            Self::Object(obj) => write!(f, "Object({})", short_type_name(obj.type_name)),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::List(items)
    }
}

/// Kind tag of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Str,
    Int,
    Float,
    Bool,
    List,
    Callable,
    Object,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Self::Str => "string",
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::List => "list",
            Self::Callable => "callable",
            Self::Object => "object",
        };
        write!(f, "{tag}")
    }
}

/// The base (non-class) kinds an element may be declared as.
///
/// A base-kind element must carry an alias, because the kind tag alone
/// is not a meaningful lookup key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseKind {
    Str,
    Int,
    Float,
    Bool,
    List,
    Callable,
}

impl BaseKind {
    /// The [`ValueKind`] a build result must match exactly.
    pub fn value_kind(self) -> ValueKind {
        match self {
            Self::Str => ValueKind::Str,
            Self::Int => ValueKind::Int,
            Self::Float => ValueKind::Float,
            Self::Bool => ValueKind::Bool,
            Self::List => ValueKind::List,
            Self::Callable => ValueKind::Callable,
        }
    }

    /// The declared-type tag used in error messages.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Str => "string",
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::List => "list",
            Self::Callable => "callable",
        }
    }
}

impl fmt::Display for BaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// Positionally-resolved builder arguments.
///
/// Accessors fail with a type-mismatch error naming the offending
/// position, so a builder wired against the wrong keys reports a usable
/// diagnostic instead of panicking.
#[derive(Debug)]
pub struct Args(Vec<Value>);

impl Args {
    pub fn new(values: Vec<Value>) -> Self {
        Self(values)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consumes the arguments, yielding the raw value list.
    pub fn into_values(self) -> Vec<Value> {
        self.0
    }

    pub fn get(&self, index: usize) -> Result<&Value> {
        self.0.get(index).ok_or_else(|| ContainerError::TypeMismatch {
            expected: format!("argument at position {index}"),
            actual: format!("{} arguments", self.0.len()),
        })
    }

    pub fn str(&self, index: usize) -> Result<&str> {
        let value = self.get(index)?;
        value.as_str().ok_or_else(|| mismatch("string", value, index))
    }

    pub fn int(&self, index: usize) -> Result<i64> {
        let value = self.get(index)?;
        value.as_int().ok_or_else(|| mismatch("int", value, index))
    }

    pub fn float(&self, index: usize) -> Result<f64> {
        let value = self.get(index)?;
        value.as_float().ok_or_else(|| mismatch("float", value, index))
    }

    pub fn bool(&self, index: usize) -> Result<bool> {
        let value = self.get(index)?;
        value.as_bool().ok_or_else(|| mismatch("bool", value, index))
    }

    pub fn list(&self, index: usize) -> Result<&[Value]> {
        let value = self.get(index)?;
        value.as_list().ok_or_else(|| mismatch("list", value, index))
    }

    /// Recovers a shared class instance argument.
    pub fn object<T: Send + Sync + 'static>(&self, index: usize) -> Result<Arc<T>> {
        let value = self.get(index)?;
        value
            .downcast::<T>()
            .ok_or_else(|| mismatch(type_name::<T>(), value, index))
    }
}

fn mismatch(expected: &str, actual: &Value, index: usize) -> ContainerError {
    ContainerError::TypeMismatch {
        expected: format!("{} at position {index}", short_type_name(expected)),
        actual: actual.describe(),
    }
}
