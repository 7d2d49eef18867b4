//! The surface exposed to hosts that do not speak the runtime's calling
//! convention.
//!
//! Foreign hosts see functions as opaque objects: they may execute them and
//! compare them by identity through the single `equals` member, and nothing
//! else.
use std::sync::Arc;

use crate::runtime::{
    dispatch::Dispatcher, error::InteropError, function::Function, value::Value,
};

/// Name of the only member a function exposes.
pub const MEMBER_EQUALS: &str = "equals";

/// What a foreign call needs from the runtime: the dispatcher that applies
/// functions and the default ambient state for calls entering from outside.
#[derive(Clone)]
pub struct InteropContext {
    dispatcher: Arc<dyn Dispatcher>,
    default_state: Value,
}

impl InteropContext {
    pub fn new(dispatcher: Arc<dyn Dispatcher>) -> Self {
        Self {
            dispatcher,
            default_state: Value::Unit,
        }
    }

    pub fn with_default_state(mut self, state: Value) -> Self {
        self.default_state = state;
        self
    }

    pub fn dispatcher(&self) -> &dyn Dispatcher {
        self.dispatcher.as_ref()
    }

    pub fn default_state(&self) -> &Value {
        &self.default_state
    }
}

/// Message protocol understood by foreign hosts.
pub trait ForeignObject {
    fn is_executable(&self) -> bool;

    fn execute(
        &self,
        context: &InteropContext,
        arguments: &[Value],
    ) -> Result<Value, InteropError>;

    fn has_members(&self) -> bool;

    fn is_member_invocable(&self, member: &str) -> bool;

    fn invoke_member(&self, member: &str, arguments: &[Value]) -> Result<Value, InteropError>;

    fn get_members(&self, include_internal: bool) -> Value;
}

impl ForeignObject for Function {
    fn is_executable(&self) -> bool {
        true
    }

    fn execute(
        &self,
        context: &InteropContext,
        arguments: &[Value],
    ) -> Result<Value, InteropError> {
        tracing::trace!(function = self.name(), args = arguments.len(), "foreign execute");
        context
            .dispatcher()
            .apply(
                self,
                None,
                context.default_state().clone(),
                arguments.to_vec(),
            )
            .map_err(InteropError::Callee)
    }

    fn has_members(&self) -> bool {
        true
    }

    fn is_member_invocable(&self, member: &str) -> bool {
        member == MEMBER_EQUALS
    }

    fn invoke_member(&self, member: &str, arguments: &[Value]) -> Result<Value, InteropError> {
        if member != MEMBER_EQUALS {
            return Err(InteropError::UnknownIdentifier(member.to_string()));
        }
        let that = single_argument(arguments)?;
        let identical = match that {
            Value::Function(other) => std::ptr::eq(self, Arc::as_ptr(other)),
            _ => false,
        };
        Ok(Value::Boolean(identical))
    }

    fn get_members(&self, _include_internal: bool) -> Value {
        Value::Array(Arc::new(vec![Value::from(MEMBER_EQUALS)]))
    }
}

/// Extracts the one argument of a unary member, rejecting values that may
/// not cross the host boundary.
fn single_argument(arguments: &[Value]) -> Result<&Value, InteropError> {
    match arguments {
        [Value::Thunk(_)] => Err(InteropError::UnsupportedType("Thunk")),
        [value] => Ok(value),
        _ => Err(InteropError::ArityMismatch {
            expected: 1,
            got: arguments.len(),
        }),
    }
}

#[cfg(test)]
#[path = "interop_test.rs"]
mod interop_test;
