use std::{fmt, sync::Arc};

use crate::runtime::{
    arguments::CallArguments, call_target::CallTarget, error::RuntimeError, leak_detector,
    scope::Scope, value::Value,
};

/// A deferred computation bound to the scope it was created in.
pub struct Thunk {
    call_target: Arc<dyn CallTarget>,
    scope: Arc<Scope>,
}

impl Thunk {
    pub fn new(call_target: Arc<dyn CallTarget>, scope: Arc<Scope>) -> Self {
        leak_detector::record_thunk();
        Self { call_target, scope }
    }

    pub fn call_target(&self) -> &Arc<dyn CallTarget> {
        &self.call_target
    }

    pub fn scope(&self) -> &Arc<Scope> {
        &self.scope
    }

    /// Runs the body with a state-only payload.
    ///
    /// Results are not cached; every call re-invokes the body.
    pub fn force(&self, state: Value) -> Result<Value, RuntimeError> {
        self.call_target
            .invoke(CallArguments::for_thunk(self, state))
    }
}

impl fmt::Debug for Thunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Thunk({})", self.call_target.name())
    }
}
