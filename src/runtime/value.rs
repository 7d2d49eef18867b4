use std::{fmt, sync::Arc};

use crate::runtime::{function::Function, thunk::Thunk};

/// Runtime value passed through call payloads, scopes and pre-applied argument vectors.
///
/// ## Memory Management Model
///
/// Values use `Arc` for heap-allocated types (String, Array, Function, Thunk)
/// while keeping primitives (Integer, Float, Boolean, Unit) unboxed. Every
/// value is immutable after creation, so a value can be handed to any number
/// of concurrently running call chains without locking.
///
/// ### Equality
///
/// Functions compare by identity: two functions built from the same call
/// target and schema are still different values. Everything else compares
/// structurally.
#[derive(Debug, Clone)]
pub enum Value {
    /// 64-bit signed integer.
    Integer(i64),
    /// 64-bit floating point number.
    Float(f64),
    /// Boolean value.
    Boolean(bool),
    /// UTF-8 string value.
    String(Arc<str>),
    /// The unit value, also the default ambient state.
    Unit,
    /// Ordered collection of values.
    Array(Arc<Vec<Value>>),
    /// Callable function value.
    Function(Arc<Function>),
    /// Deferred computation, forced on demand.
    Thunk(Arc<Thunk>),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Unit, Value::Unit) => true,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => Arc::ptr_eq(a, b),
            (Value::Thunk(a), Value::Thunk(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Boolean(v) => write!(f, "{}", v),
            Value::String(v) => write!(f, "\"{}\"", v),
            Value::Unit => write!(f, "()"),
            Value::Array(elements) => {
                let items: Vec<String> = elements.iter().map(|e| e.to_string()).collect();
                write!(f, "[{}]", items.join(", "))
            }
            Value::Function(function) => write!(f, "<function {}>", function.name()),
            Value::Thunk(_) => write!(f, "<thunk>"),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.into())
    }
}

impl From<Function> for Value {
    fn from(function: Function) -> Self {
        Value::Function(Arc::new(function))
    }
}

impl Value {
    /// Returns the canonical runtime type label used in error messages.
    ///
    /// These labels are user-visible and are expected to remain stable.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "Int",
            Value::Float(_) => "Float",
            Value::Boolean(_) => "Bool",
            Value::String(_) => "String",
            Value::Unit => "Unit",
            Value::Array(_) => "Array",
            Value::Function(_) => "Function",
            Value::Thunk(_) => "Thunk",
        }
    }

    pub fn as_function(&self) -> Option<&Arc<Function>> {
        match self {
            Value::Function(function) => Some(function),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }
}
