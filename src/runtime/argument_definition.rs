use std::sync::Arc;

/// How the dispatcher treats a lazy value supplied for an argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Thunks are forced before the body runs.
    Execute,
    /// Thunks are passed through unforced.
    Suspend,
}

/// One declared parameter of a function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentDefinition {
    position: usize,
    name: Arc<str>,
    has_default: bool,
    execution_mode: ExecutionMode,
}

impl ArgumentDefinition {
    pub fn new(position: usize, name: &str) -> Self {
        Self {
            position,
            name: name.into(),
            has_default: false,
            execution_mode: ExecutionMode::Execute,
        }
    }

    /// A parameter whose body supplies a default when the caller omits it.
    pub fn with_default(position: usize, name: &str) -> Self {
        Self {
            has_default: true,
            ..Self::new(position, name)
        }
    }

    pub fn suspended(position: usize, name: &str) -> Self {
        Self {
            execution_mode: ExecutionMode::Suspend,
            ..Self::new(position, name)
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has_default(&self) -> bool {
        self.has_default
    }

    pub fn execution_mode(&self) -> ExecutionMode {
        self.execution_mode
    }

    pub fn is_suspended(&self) -> bool {
        self.execution_mode == ExecutionMode::Suspend
    }
}
