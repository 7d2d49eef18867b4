//! The payload layout shared by every caller and every call target.
//!
//! A payload has four slots, always in this order:
//!
//! 1. the closure scope of the function (or thunk) being called,
//! 2. the caller info, when the caller supplied one,
//! 3. the ambient state threaded through the whole call chain,
//! 4. the positional arguments, already in the callee schema's order.
//!
//! Packing is the only place the layout is established. Unpacking is plain
//! slot access and performs no validation.
use std::sync::Arc;

use crate::runtime::{
    caller_info::CallerInfo, function::Function, scope::Scope, thunk::Thunk, value::Value,
};

#[derive(Debug, Clone)]
pub struct CallArguments {
    local_scope: Option<Arc<Scope>>,
    caller_info: Option<Arc<CallerInfo>>,
    state: Value,
    positional: Vec<Value>,
}

impl CallArguments {
    /// Payload for calling `function`. `positional` must already be sorted
    /// into the order of `function.schema().arguments()`.
    ///
    /// Callees whose schema declares full caller-frame access rely on
    /// `caller_info` being present; supplying it is the caller's duty.
    pub fn for_function(
        function: &Function,
        caller_info: Option<Arc<CallerInfo>>,
        state: Value,
        positional: Vec<Value>,
    ) -> Self {
        Self::from_parts(function.scope().cloned(), caller_info, state, positional)
    }

    /// Payload for forcing `thunk`: no caller info and no positional arguments.
    pub fn for_thunk(thunk: &Thunk, state: Value) -> Self {
        Self::from_parts(Some(Arc::clone(thunk.scope())), None, state, Vec::new())
    }

    pub fn from_parts(
        local_scope: Option<Arc<Scope>>,
        caller_info: Option<Arc<CallerInfo>>,
        state: Value,
        positional: Vec<Value>,
    ) -> Self {
        Self {
            local_scope,
            caller_info,
            state,
            positional,
        }
    }

    #[inline]
    pub fn local_scope(&self) -> Option<&Arc<Scope>> {
        self.local_scope.as_ref()
    }

    #[inline]
    pub fn caller_info(&self) -> Option<&Arc<CallerInfo>> {
        self.caller_info.as_ref()
    }

    #[inline]
    pub fn state(&self) -> &Value {
        &self.state
    }

    #[inline]
    pub fn positional_arguments(&self) -> &[Value] {
        &self.positional
    }

    pub fn into_positional_arguments(self) -> Vec<Value> {
        self.positional
    }
}

#[cfg(test)]
#[path = "arguments_test.rs"]
mod arguments_test;
