//! Typed runtime faults
//!
//! Faults are data, not exceptions. An integration call that fails returns a
//! [`Fault`] naming its kind; classification into a
//! [`FailureEvent`](super::FailureEvent) is a pure function over that kind —
//! never over message content — performed once, at the scaffolding layer.

use std::time::Duration;

use thiserror::Error;

use super::failure::FailureEvent;
use crate::eval::EvalError;

/// A runtime fault raised by a state's core logic, awaiting classification
#[derive(Debug, Error)]
pub enum Fault {
    /// The integration call exceeded the state's timeout budget
    #[error("integration call exceeded its timeout budget of {budget:?}")]
    Timeout { budget: Duration },

    /// The bound service reported an application-level error
    ///
    /// `error` may be a custom error name; it flows into `Catch`/`Retry`
    /// matching unchanged.
    #[error("task failed: {error}")]
    Task {
        error: String,
        cause: Option<String>,
    },

    /// Credential resolution or delegated-principal use was rejected
    #[error("permission denied: {cause}")]
    Permissions { cause: String },

    /// Anything unclassified; falls back to the generic classification
    #[error("runtime fault: {cause}")]
    Runtime { cause: String },

    /// Already classified by a lower layer; passes through unchanged
    #[error("{0}")]
    Failure(Box<FailureEvent>),
}

impl Fault {
    /// An application-level service error
    pub fn task(error: impl Into<String>, cause: Option<String>) -> Self {
        Self::Task {
            error: error.into(),
            cause,
        }
    }

    /// An unclassified runtime fault
    pub fn runtime(cause: impl Into<String>) -> Self {
        Self::Runtime {
            cause: cause.into(),
        }
    }
}

impl From<FailureEvent> for Fault {
    fn from(event: FailureEvent) -> Self {
        Self::Failure(Box::new(event))
    }
}

impl From<anyhow::Error> for Fault {
    fn from(err: anyhow::Error) -> Self {
        Self::Runtime {
            cause: format!("{err:#}"),
        }
    }
}

/// Failure path of a state's core logic
///
/// Three disjoint routes out of `eval_state`, handled differently by the
/// lifecycle: evaluation errors propagate raw (definition-time defects are
/// the interpreter loop's problem, not a service failure), an external stop
/// is surfaced distinctly so it can never be misclassified, and runtime
/// faults go through the classification hook.
#[derive(Debug, Error)]
pub enum StateFault {
    /// Expression evaluation failed; never classified
    #[error(transparent)]
    Eval(#[from] EvalError),

    /// The enclosing execution was stopped while this state was in flight
    #[error("execution stopped")]
    Stopped { cause: Option<String> },

    /// Runtime fault, to be classified into a failure record
    #[error(transparent)]
    Fault(#[from] Fault),
}

/// What `execute` surfaces to the interpreter loop
#[derive(Debug, Error)]
pub enum StateError {
    /// The attempt failed; the record drives retry/catch routing
    #[error("state failed: {0}")]
    Failed(FailureEvent),

    /// The enclosing execution was stopped; terminate without a failure record
    #[error("execution stopped")]
    Stopped { cause: Option<String> },

    /// Definition-time defect, propagated unchanged
    #[error(transparent)]
    Eval(#[from] EvalError),
}

impl StateError {
    /// The classified failure record, if the attempt produced one
    pub fn failure_event(&self) -> Option<&FailureEvent> {
        match self {
            Self::Failed(event) => Some(event),
            _ => None,
        }
    }
}
