use std::sync::Arc;

use crate::runtime::{leak_detector, value::Value};

/// A materialized lexical frame captured by functions and thunks.
///
/// Scopes are immutable. Binding more names allocates a child scope that
/// points at its parent, so a scope can be shared by every function and
/// thunk defined inside it.
#[derive(Debug, Default)]
pub struct Scope {
    parent: Option<Arc<Scope>>,
    bindings: Vec<(Arc<str>, Value)>,
}

impl Scope {
    pub fn root() -> Arc<Self> {
        Self::with_bindings(None, Vec::new())
    }

    pub fn with_bindings(parent: Option<Arc<Scope>>, bindings: Vec<(Arc<str>, Value)>) -> Arc<Self> {
        leak_detector::record_scope();
        Arc::new(Self { parent, bindings })
    }

    /// Returns a child of `self` holding the given bindings.
    pub fn extend(self: &Arc<Self>, bindings: Vec<(Arc<str>, Value)>) -> Arc<Self> {
        Self::with_bindings(Some(Arc::clone(self)), bindings)
    }

    /// Resolves `name`, innermost binding first.
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        let mut scope = Some(self);
        while let Some(current) = scope {
            if let Some((_, value)) = current.bindings.iter().rev().find(|(n, _)| &**n == name) {
                return Some(value);
            }
            scope = current.parent.as_deref();
        }
        None
    }

    pub fn parent(&self) -> Option<&Arc<Scope>> {
        self.parent.as_ref()
    }

    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut scope = self.parent.as_deref();
        while let Some(current) = scope {
            depth += 1;
            scope = current.parent.as_deref();
        }
        depth
    }
}
