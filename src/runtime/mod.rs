//! Callable values and the calling convention shared by every call site.
//!
//! # No-Cycle Invariant
//! Runtime values are represented as immutable graphs and are expected to
//! remain acyclic. Heap-backed `Value` variants, functions, thunks and scopes
//! use `Arc` for cheap sharing across call chains, so introducing cycles would
//! leak memory under reference counting.
//!
//! The invariant is:
//! - Runtime values form immutable DAGs, not cyclic graphs.
//! - A function's captured scope must not bind the function itself.
//! - Applying more arguments never mutates an existing function; it allocates
//!   a new one sharing the call target and schema.
use crate::runtime::{arguments::CallArguments, error::RuntimeError, value::Value};

pub mod argument_definition;
pub mod arguments;
pub mod call_target;
pub mod caller_info;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod function;
pub mod function_schema;
pub mod interop;
pub mod leak_detector;
pub mod scope;
pub mod thunk;
pub mod value;

pub type BuiltinFn = fn(CallArguments) -> Result<Value, RuntimeError>;
