use std::sync::Arc;

use tracing::{debug, trace};

use crate::runtime::{
    arguments::CallArguments,
    caller_info::CallerInfo,
    config::RuntimeConfig,
    error::{RuntimeError, TailCall},
    function::Function,
    function_schema::{CallStrategy, FunctionSchema},
    thunk::Thunk,
    value::Value,
};

/// Applies a function to positional arguments.
///
/// Implementations decide how pre-applied, supplied and surplus arguments
/// combine into calls; callee failures are returned unchanged.
pub trait Dispatcher: Send + Sync {
    /// Top-level application, used by the foreign-call adapter and by any
    /// caller that is not itself running inside a call loop. Never returns
    /// [`RuntimeError::TailCall`].
    fn apply(
        &self,
        function: &Function,
        caller_info: Option<Arc<CallerInfo>>,
        state: Value,
        arguments: Vec<Value>,
    ) -> Result<Value, RuntimeError>;

    /// Application from inside a running body. A [`CallStrategy::Direct`]
    /// callee may hand a tail call back to the caller, which must return it
    /// to its own call loop.
    fn apply_in_frame(
        &self,
        function: &Function,
        caller_info: Option<Arc<CallerInfo>>,
        state: Value,
        arguments: Vec<Value>,
    ) -> Result<Value, RuntimeError> {
        self.apply(function, caller_info, state, arguments)
    }
}

/// Dispatcher implementing currying semantics:
///
/// - too few arguments: a new function with a longer pre-applied vector is
///   returned and nothing runs;
/// - exactly enough (counting defaults): the body runs once;
/// - too many: the body runs with the declared arguments and its result is
///   applied to the surplus, together with any oversaturated arguments the
///   function carried.
#[derive(Debug, Clone, Default)]
pub struct CurryDispatcher {
    config: RuntimeConfig,
}

impl CurryDispatcher {
    pub fn new(config: RuntimeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Forces `thunk`, resolving any tail call its body requests.
    pub fn force(&self, thunk: &Thunk, state: &Value) -> Result<Value, RuntimeError> {
        match thunk.force(state.clone()) {
            Err(RuntimeError::TailCall(call)) => self.run_call_loop(*call, state),
            result => result,
        }
    }

    fn apply_once(
        &self,
        function: &Function,
        caller_info: Option<Arc<CallerInfo>>,
        state: &Value,
        arguments: Vec<Value>,
    ) -> Result<Value, RuntimeError> {
        let schema = function.schema();
        let mut positional = function.clone_pre_applied_arguments();
        positional.extend(arguments);

        if self.config.trace_calls {
            trace!(
                function = function.name(),
                supplied = positional.len(),
                arity = schema.arity(),
                "apply"
            );
        }

        if !schema.is_saturated_by(positional.len()) {
            debug!(
                function = function.name(),
                applied = positional.len(),
                arity = schema.arity(),
                "partial application"
            );
            return Ok(Value::from(function.with_pre_applied(positional)));
        }

        let excess = if positional.len() > schema.arity() {
            positional.split_off(schema.arity())
        } else {
            Vec::new()
        };
        self.force_eager_arguments(schema, &mut positional, state)?;

        let caller_info = match caller_info {
            None if schema.caller_frame_access().should_pass_caller_info() => {
                debug!(function = function.name(), "passing detached caller info");
                Some(Arc::new(CallerInfo::detached()))
            }
            other => other,
        };

        let payload = CallArguments::for_function(function, caller_info, state.clone(), positional);
        let result = function.call_target().invoke(payload);

        let carried = function.oversaturated_arguments();
        if carried.is_empty() && excess.is_empty() {
            return result;
        }

        // The surplus must be applied to the finished result, so pending tail
        // calls are resolved here rather than by the caller's loop.
        let result = match result {
            Err(RuntimeError::TailCall(call)) => self.run_call_loop(*call, state)?,
            other => other?,
        };

        let mut pending = Vec::with_capacity(carried.len() + excess.len());
        pending.extend_from_slice(carried);
        pending.extend(excess);
        debug!(
            function = function.name(),
            pending = pending.len(),
            "applying oversaturated arguments to result"
        );
        match result {
            Value::Function(next) => self.apply(&next, None, state.clone(), pending),
            other => Err(RuntimeError::NotAFunction(other.type_name())),
        }
    }

    fn run_call_loop(&self, mut call: TailCall, state: &Value) -> Result<Value, RuntimeError> {
        debug!(function = call.function.name(), "entering call loop");
        let mut iterations: u64 = 0;
        loop {
            iterations += 1;
            if let Some(limit) = self.config.call_loop_limit {
                if iterations > limit {
                    return Err(RuntimeError::CallLoopLimit(limit));
                }
            }
            match self.apply_once(&call.function, None, state, call.arguments) {
                Err(RuntimeError::TailCall(next)) => call = *next,
                result => return result,
            }
        }
    }

    /// Replaces thunks supplied for non-suspended arguments by their values.
    fn force_eager_arguments(
        &self,
        schema: &FunctionSchema,
        positional: &mut [Value],
        state: &Value,
    ) -> Result<(), RuntimeError> {
        for (definition, slot) in schema.arguments().iter().zip(positional.iter_mut()) {
            if definition.is_suspended() {
                continue;
            }
            while let Value::Thunk(thunk) = &*slot {
                let thunk = Arc::clone(thunk);
                *slot = self.force(&thunk, state)?;
            }
        }
        Ok(())
    }
}

impl Dispatcher for CurryDispatcher {
    fn apply(
        &self,
        function: &Function,
        caller_info: Option<Arc<CallerInfo>>,
        state: Value,
        arguments: Vec<Value>,
    ) -> Result<Value, RuntimeError> {
        match self.apply_once(function, caller_info, &state, arguments) {
            Err(RuntimeError::TailCall(call)) => self.run_call_loop(*call, &state),
            result => result,
        }
    }

    fn apply_in_frame(
        &self,
        function: &Function,
        caller_info: Option<Arc<CallerInfo>>,
        state: Value,
        arguments: Vec<Value>,
    ) -> Result<Value, RuntimeError> {
        match self.apply_once(function, caller_info, &state, arguments) {
            Err(RuntimeError::TailCall(call))
                if function.call_strategy() == CallStrategy::CallLoop =>
            {
                self.run_call_loop(*call, &state)
            }
            result => result,
        }
    }
}

#[cfg(test)]
#[path = "dispatch_test.rs"]
mod dispatch_test;
