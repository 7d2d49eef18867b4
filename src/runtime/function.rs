use std::{fmt, sync::Arc};

use crate::runtime::{
    BuiltinFn,
    argument_definition::ArgumentDefinition,
    call_target::{BuiltinCallTarget, CallTarget, SourceLocation},
    function_schema::{CallStrategy, FunctionSchema},
    leak_detector,
    scope::Scope,
    value::Value,
};

/// A function value.
///
/// All fields are fixed at construction. Partial application never touches
/// an existing function: callers take [`Function::clone_pre_applied_arguments`],
/// extend the copy, and build a new function around it that shares the call
/// target, scope and schema of the original.
pub struct Function {
    call_target: Arc<dyn CallTarget>,
    scope: Option<Arc<Scope>>,
    schema: Arc<FunctionSchema>,
    pre_applied_arguments: Option<Box<[Value]>>,
    oversaturated_arguments: Option<Box<[Value]>>,
}

impl Function {
    /// Creates a function without any applied or carried arguments.
    pub fn new(
        call_target: Arc<dyn CallTarget>,
        scope: Option<Arc<Scope>>,
        schema: Arc<FunctionSchema>,
    ) -> Self {
        Self::with_arguments(call_target, scope, schema, None, None)
    }

    /// Creates a function carrying pre-applied and oversaturated arguments.
    ///
    /// `pre_applied_arguments` follows the schema's positional order and may
    /// not be longer than the schema's arity. `oversaturated_arguments` are
    /// applied to this function's result once it is saturated.
    pub fn with_arguments(
        call_target: Arc<dyn CallTarget>,
        scope: Option<Arc<Scope>>,
        schema: Arc<FunctionSchema>,
        pre_applied_arguments: Option<Vec<Value>>,
        oversaturated_arguments: Option<Vec<Value>>,
    ) -> Self {
        debug_assert!(
            pre_applied_arguments
                .as_ref()
                .is_none_or(|args| args.len() <= schema.arity()),
            "pre-applied arguments exceed the arity of {}",
            call_target.name()
        );
        leak_detector::record_function();
        Self {
            call_target,
            scope,
            schema,
            pre_applied_arguments: pre_applied_arguments.map(Vec::into_boxed_slice),
            oversaturated_arguments: oversaturated_arguments.map(Vec::into_boxed_slice),
        }
    }

    /// Wraps a native body as a scope-less function.
    pub fn from_builtin(
        name: &'static str,
        func: BuiltinFn,
        call_strategy: CallStrategy,
        arguments: Vec<ArgumentDefinition>,
    ) -> Self {
        Self::new(
            Arc::new(BuiltinCallTarget::new(name, func)),
            None,
            Arc::new(FunctionSchema::new(call_strategy, arguments)),
        )
    }

    /// Like [`Function::from_builtin`], but the body is guaranteed to receive
    /// caller info on every call.
    pub fn from_builtin_with_caller_frame_access(
        name: &'static str,
        func: BuiltinFn,
        call_strategy: CallStrategy,
        arguments: Vec<ArgumentDefinition>,
    ) -> Self {
        Self::new(
            Arc::new(BuiltinCallTarget::new(name, func)),
            None,
            Arc::new(FunctionSchema::with_caller_frame_access(
                call_strategy,
                arguments,
            )),
        )
    }

    /// Returns a new function sharing this one's call target, scope, schema
    /// and carried oversaturated arguments, with `pre_applied_arguments`
    /// bound.
    pub fn with_pre_applied(&self, pre_applied_arguments: Vec<Value>) -> Self {
        Self::with_arguments(
            Arc::clone(&self.call_target),
            self.scope.clone(),
            Arc::clone(&self.schema),
            Some(pre_applied_arguments),
            self.oversaturated_arguments.as_deref().map(<[Value]>::to_vec),
        )
    }

    pub fn call_target(&self) -> &Arc<dyn CallTarget> {
        &self.call_target
    }

    pub fn name(&self) -> &str {
        self.call_target.name()
    }

    pub fn source_location(&self) -> Option<&SourceLocation> {
        self.call_target.source_location()
    }

    pub fn call_strategy(&self) -> CallStrategy {
        self.schema.call_strategy()
    }

    pub fn scope(&self) -> Option<&Arc<Scope>> {
        self.scope.as_ref()
    }

    pub fn schema(&self) -> &Arc<FunctionSchema> {
        &self.schema
    }

    /// Arguments accumulated beyond the declared arity. Empty when none
    /// were carried.
    pub fn oversaturated_arguments(&self) -> &[Value] {
        self.oversaturated_arguments.as_deref().unwrap_or(&[])
    }

    /// Returns a copy of the pre-applied arguments that the caller may
    /// mutate freely before wrapping it in a new function.
    pub fn clone_pre_applied_arguments(&self) -> Vec<Value> {
        self.pre_applied_arguments
            .as_deref()
            .map(<[Value]>::to_vec)
            .unwrap_or_default()
    }

    pub fn pre_applied_len(&self) -> usize {
        self.pre_applied_arguments.as_deref().map_or(0, <[Value]>::len)
    }

    pub fn remaining_arity(&self) -> usize {
        self.schema.arity().saturating_sub(self.pre_applied_len())
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name())
            .field("arity", &self.schema.arity())
            .field("pre_applied", &self.pre_applied_len())
            .field("oversaturated", &self.oversaturated_arguments().len())
            .finish()
    }
}

#[cfg(test)]
#[path = "function_test.rs"]
mod function_test;
