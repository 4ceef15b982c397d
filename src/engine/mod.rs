//! Batch execution engine.

mod executor;

pub use executor::{ExecutionSettings, Executor, FailureMode};
