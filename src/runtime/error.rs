use std::sync::Arc;

use thiserror::Error;

use crate::runtime::{function::Function, value::Value};

/// Failures raised while applying functions or forcing thunks.
///
/// Call targets return these directly; the dispatcher and the foreign-call
/// adapter hand them back to their caller without rewrapping.
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Language-level failure produced by the called code.
    #[error("{0}")]
    Failure(String),
    #[error("not a function: {0}")]
    NotAFunction(&'static str),
    #[error("expected {expected}, got {got}")]
    TypeMismatch {
        expected: &'static str,
        got: &'static str,
    },
    #[error("call loop exceeded {0} iterations")]
    CallLoopLimit(u64),
    /// Control signal asking the nearest call loop to perform this call in
    /// place of the current frame.
    #[error("unresolved tail call to {}", .0.function.name())]
    TailCall(Box<TailCall>),
}

impl RuntimeError {
    pub fn failure(message: impl Into<String>) -> Self {
        RuntimeError::Failure(message.into())
    }

    pub fn tail_call(function: Arc<Function>, arguments: Vec<Value>) -> Self {
        RuntimeError::TailCall(Box::new(TailCall {
            function,
            arguments,
        }))
    }

    pub fn is_tail_call(&self) -> bool {
        matches!(self, RuntimeError::TailCall(_))
    }
}

/// A pending call requested from tail position.
#[derive(Debug)]
pub struct TailCall {
    pub function: Arc<Function>,
    pub arguments: Vec<Value>,
}

/// Failures surfaced to foreign hosts through [`crate::runtime::interop::ForeignObject`].
#[derive(Error, Debug)]
pub enum InteropError {
    #[error("unknown identifier: {0}")]
    UnknownIdentifier(String),
    #[error("wrong number of arguments: want={expected}, got={got}")]
    ArityMismatch { expected: usize, got: usize },
    #[error("unsupported type: {0}")]
    UnsupportedType(&'static str),
    #[error(transparent)]
    Callee(#[from] RuntimeError),
}
