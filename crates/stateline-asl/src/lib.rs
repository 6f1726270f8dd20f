//! # Task-State Execution Scaffolding
//!
//! The execution core of a JSON-defined workflow language: the uniform
//! lifecycle every service-invoking ("Task") state goes through, independent
//! of which service it calls.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Interpreter loop (external)               │
//! │   (walks the state graph, routes Retry/Catch on FailureEvent)│
//! └─────────────────────────────────────────────────────────────┘
//!                              │ execute(env)
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 ExecutionState lifecycle                     │
//! │  (entered event → core logic → exited event | FailureEvent) │
//! └─────────────────────────────────────────────────────────────┘
//!                              │ eval_state(env)
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   TaskState scaffolding                      │
//! │  (shape parameters, resolve credentials, race the call       │
//! │   against timeout budget and stop signal, classify faults)  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │ invoke(ctx, params, credentials)
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │               Integration (external, per service)            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use stateline_asl::prelude::*;
//!
//! struct PutRecord;
//!
//! #[async_trait]
//! impl Integration for PutRecord {
//!     async fn invoke(
//!         &self,
//!         ctx: &TaskContext,
//!         parameters: Parameters,
//!         credentials: ComputedCredentials,
//!     ) -> Result<serde_json::Value, Fault> {
//!         // Call the service...
//!         Ok(serde_json::json!({"ok": true}))
//!     }
//!
//!     fn allowed_parameter_keys(&self) -> Option<&[&str]> {
//!         Some(&["TableName", "Item"])
//!     }
//! }
//!
//! let props = TaskStateProps::new("Persist", "arn:aws:states:::storage:putRecord".parse()?)
//!     .with_parargs(Parargs::literal(serde_json::json!({"TableName": "orders"})))
//!     .with_timeout(std::time::Duration::from_secs(30));
//! let state = TaskState::new(props, PutRecord);
//!
//! let mut env = Environment::new("arn:aws:states:us-east-1:123456789012:execution:demo:1");
//! let output = state.execute(&mut env).await?;
//! ```

pub mod error;
pub mod eval;
pub mod state;

/// Prelude for common imports
pub mod prelude {
    pub use crate::error::{ErrorName, Fault, FailureEvent, StateError, StatesErrorNameType};
    pub use crate::eval::{Environment, EvalError, Expression, Literal};
    pub use crate::state::task::{
        ComputedCredentials, Credentials, Integration, IntegrationRegistry, Parameters, Parargs,
        Resource, TaskContext, TaskState, TaskStateProps,
    };
    pub use crate::state::ExecutionState;
    pub use async_trait::async_trait;
}

// Re-export key types at crate root
pub use error::{ErrorName, Fault, FailureEvent, StateError, StateFault, StatesErrorNameType};
pub use eval::{Environment, EvalError, Expression, Literal};
pub use state::task::{
    ComputedCredentials, Credentials, DynTaskState, Integration, IntegrationRegistry, Parameters,
    Parargs, Resource, ResourceCondition, ResourceError, TaskContext, TaskState, TaskStateProps,
};
pub use state::{classify_generic, ExecutionState};
