use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeakStats {
    pub functions: usize,
    pub thunks: usize,
    pub scopes: usize,
    pub caller_infos: usize,
}

impl LeakStats {
    /// Counts allocated between `earlier` and `self`.
    pub fn since(&self, earlier: &LeakStats) -> LeakStats {
        LeakStats {
            functions: self.functions - earlier.functions,
            thunks: self.thunks - earlier.thunks,
            scopes: self.scopes - earlier.scopes,
            caller_infos: self.caller_infos - earlier.caller_infos,
        }
    }
}

static FUNCTIONS: AtomicUsize = AtomicUsize::new(0);
static THUNKS: AtomicUsize = AtomicUsize::new(0);
static SCOPES: AtomicUsize = AtomicUsize::new(0);
static CALLER_INFOS: AtomicUsize = AtomicUsize::new(0);

pub fn record_function() {
    FUNCTIONS.fetch_add(1, Ordering::Relaxed);
}

pub fn record_thunk() {
    THUNKS.fetch_add(1, Ordering::Relaxed);
}

pub fn record_scope() {
    SCOPES.fetch_add(1, Ordering::Relaxed);
}

pub fn record_caller_info() {
    CALLER_INFOS.fetch_add(1, Ordering::Relaxed);
}

pub fn snapshot() -> LeakStats {
    LeakStats {
        functions: FUNCTIONS.load(Ordering::Relaxed),
        thunks: THUNKS.load(Ordering::Relaxed),
        scopes: SCOPES.load(Ordering::Relaxed),
        caller_infos: CALLER_INFOS.load(Ordering::Relaxed),
    }
}
