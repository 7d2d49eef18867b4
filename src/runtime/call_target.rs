use std::{fmt, sync::Arc};

use crate::runtime::{BuiltinFn, arguments::CallArguments, error::RuntimeError, value::Value};

/// Where a call target's body was defined.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    pub file: Arc<str>,
    pub line: u32,
    pub column: u32,
}

impl SourceLocation {
    pub fn new(file: &str, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// An opaque, invocable function body.
///
/// Whatever produced the body (a compiler, an interpreter, a host binding)
/// only has to accept a marshalled [`CallArguments`] payload and return a
/// value or a failure. Failures are propagated untouched by every caller.
pub trait CallTarget: Send + Sync {
    fn name(&self) -> &str;

    fn source_location(&self) -> Option<&SourceLocation> {
        None
    }

    fn invoke(&self, arguments: CallArguments) -> Result<Value, RuntimeError>;
}

/// Call target backed by a plain Rust function.
#[derive(Clone)]
pub struct BuiltinCallTarget {
    pub name: &'static str,
    pub func: BuiltinFn,
    pub location: Option<SourceLocation>,
}

impl BuiltinCallTarget {
    pub fn new(name: &'static str, func: BuiltinFn) -> Self {
        Self {
            name,
            func,
            location: None,
        }
    }

    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }
}

impl fmt::Debug for BuiltinCallTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BuiltinCallTarget({})", self.name)
    }
}

impl CallTarget for BuiltinCallTarget {
    fn name(&self) -> &str {
        self.name
    }

    fn source_location(&self) -> Option<&SourceLocation> {
        self.location.as_ref()
    }

    fn invoke(&self, arguments: CallArguments) -> Result<Value, RuntimeError> {
        (self.func)(arguments)
    }
}

/// Reads the `index`-th positional argument as an integer.
pub fn arg_int(arguments: &CallArguments, index: usize) -> Result<i64, RuntimeError> {
    match arguments.positional_arguments().get(index) {
        Some(Value::Integer(value)) => Ok(*value),
        Some(other) => Err(RuntimeError::TypeMismatch {
            expected: "Int",
            got: other.type_name(),
        }),
        None => Err(RuntimeError::failure(format!(
            "missing positional argument {}",
            index
        ))),
    }
}
