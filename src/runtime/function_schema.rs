use crate::runtime::argument_definition::ArgumentDefinition;

/// How the dispatcher drives a function's call target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallStrategy {
    /// A single direct invocation. Tail-call requests propagate to the
    /// nearest enclosing call loop.
    Direct,
    /// Invocations run inside a call loop that resolves tail-call requests
    /// without growing the native stack.
    CallLoop,
}

/// Whether a callee may observe its caller's context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallerFrameAccess {
    None,
    Full,
}

impl CallerFrameAccess {
    pub fn should_pass_caller_info(self) -> bool {
        self == CallerFrameAccess::Full
    }
}

/// Immutable argument descriptor shared by every function created from one
/// definition.
///
/// `arguments` are stored in canonical positional order: the position of a
/// definition equals its index. Pre-applied argument vectors and the
/// positional slot of a call payload both follow this order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSchema {
    call_strategy: CallStrategy,
    caller_frame_access: CallerFrameAccess,
    arguments: Vec<ArgumentDefinition>,
}

impl FunctionSchema {
    pub fn new(call_strategy: CallStrategy, arguments: Vec<ArgumentDefinition>) -> Self {
        Self::build(call_strategy, CallerFrameAccess::None, arguments)
    }

    /// Schema for callees that inspect who called them (reflection builtins,
    /// constructs that unwind the caller's frame). Every call to such a
    /// function carries caller info.
    pub fn with_caller_frame_access(
        call_strategy: CallStrategy,
        arguments: Vec<ArgumentDefinition>,
    ) -> Self {
        Self::build(call_strategy, CallerFrameAccess::Full, arguments)
    }

    fn build(
        call_strategy: CallStrategy,
        caller_frame_access: CallerFrameAccess,
        arguments: Vec<ArgumentDefinition>,
    ) -> Self {
        debug_assert!(
            arguments
                .iter()
                .enumerate()
                .all(|(index, arg)| arg.position() == index),
            "argument definitions must be in positional order"
        );
        Self {
            call_strategy,
            caller_frame_access,
            arguments,
        }
    }

    pub fn call_strategy(&self) -> CallStrategy {
        self.call_strategy
    }

    pub fn caller_frame_access(&self) -> CallerFrameAccess {
        self.caller_frame_access
    }

    pub fn arguments(&self) -> &[ArgumentDefinition] {
        &self.arguments
    }

    pub fn arity(&self) -> usize {
        self.arguments.len()
    }

    pub fn argument(&self, position: usize) -> Option<&ArgumentDefinition> {
        self.arguments.get(position)
    }

    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.arguments
            .iter()
            .position(|arg| arg.name() == name)
    }

    /// Returns whether `supplied` leading positional arguments are enough to
    /// run the body: either all are present, or every missing one has a
    /// default.
    pub fn is_saturated_by(&self, supplied: usize) -> bool {
        self.arguments
            .iter()
            .skip(supplied)
            .all(ArgumentDefinition::has_default)
    }
}
