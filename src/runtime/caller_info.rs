use std::sync::Arc;

use crate::runtime::{call_target::SourceLocation, leak_detector, scope::Scope};

/// Snapshot of the calling context, threaded into callees whose schema asks
/// for [`CallerFrameAccess::Full`](crate::runtime::function_schema::CallerFrameAccess::Full).
#[derive(Debug, Clone)]
pub struct CallerInfo {
    local_scope: Option<Arc<Scope>>,
    caller_name: Option<Arc<str>>,
    location: Option<SourceLocation>,
}

impl CallerInfo {
    pub fn new(
        local_scope: Option<Arc<Scope>>,
        caller_name: Option<Arc<str>>,
        location: Option<SourceLocation>,
    ) -> Self {
        leak_detector::record_caller_info();
        Self {
            local_scope,
            caller_name,
            location,
        }
    }

    /// Caller info for calls that originate outside any runtime frame, such
    /// as a foreign host executing a function.
    pub fn detached() -> Self {
        Self::new(None, None, None)
    }

    pub fn local_scope(&self) -> Option<&Arc<Scope>> {
        self.local_scope.as_ref()
    }

    pub fn caller_name(&self) -> Option<&str> {
        self.caller_name.as_deref()
    }

    pub fn location(&self) -> Option<&SourceLocation> {
        self.location.as_ref()
    }

    pub fn is_detached(&self) -> bool {
        self.local_scope.is_none() && self.caller_name.is_none()
    }
}
