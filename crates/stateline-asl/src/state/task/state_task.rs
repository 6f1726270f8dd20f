//! Task-state scaffolding
//!
//! The uniform per-attempt algorithm for every service-invoking state:
//! shape parameters, resolve delegated credentials, run the integration call
//! under the state's timeout budget while watching for an external stop,
//! and classify whatever fault comes back. Retry and catch routing belong to
//! the interpreter loop; this layer's sole job is correct classification.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use stateline_events::{HistoryEventDetails, HistoryEventType, TaskTimedOutEventDetails};
use tracing::debug;

use super::credentials::{resolve, ComputedCredentials, Credentials};
use super::parameters::{shape, Parameters, Parargs};
use super::resource::Resource;
use super::service::{Integration, TaskContext};
use crate::error::{ErrorName, Fault, FailureEvent, StateFault, StatesErrorNameType};
use crate::eval::{Environment, EvalError};
use crate::state::lifecycle::{classify_generic, ExecutionState};

/// Construction-time properties of a Task state
///
/// Bound once by the definition compiler, immutable during execution. The
/// timeout budget is declared on the state (`TimeoutSeconds`); `None` means
/// the platform's effectively-unbounded default.
#[derive(Debug)]
pub struct TaskStateProps {
    /// Name of the state in the workflow definition
    pub name: String,

    /// The external integration target
    pub resource: Resource,

    /// Declared parameter template, if any
    pub parargs: Option<Parargs>,

    /// Declared cross-principal delegation, if any
    pub credentials: Option<Credentials>,

    /// Timeout budget for the integration call
    pub timeout: Option<Duration>,
}

impl TaskStateProps {
    /// Properties for a state with no parameters, credentials, or timeout
    pub fn new(name: impl Into<String>, resource: Resource) -> Self {
        Self {
            name: name.into(),
            resource,
            parargs: None,
            credentials: None,
            timeout: None,
        }
    }

    /// Declare a parameter template
    pub fn with_parargs(mut self, parargs: Parargs) -> Self {
        self.parargs = Some(parargs);
        self
    }

    /// Declare a cross-principal delegation
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Declare a timeout budget
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// A service-invoking state, composed with its integration capability
///
/// Works generically over any [`Integration`], including the type-erased
/// [`Arc<dyn Integration>`] handles an
/// [`IntegrationRegistry`](super::service::IntegrationRegistry) yields.
/// One value serves every attempt of the state: evaluation state lives in
/// the [`Environment`], and parameters and credentials are computed fresh
/// per attempt.
pub struct TaskState<I: Integration> {
    props: TaskStateProps,
    integration: I,
}

/// Task state bound to a registry-provided integration handle
pub type DynTaskState = TaskState<std::sync::Arc<dyn Integration>>;

impl<I: Integration> TaskState<I> {
    /// Bind a Task state to its integration
    pub fn new(props: TaskStateProps, integration: I) -> Self {
        Self { props, integration }
    }

    /// The bound integration target
    pub fn resource(&self) -> &Resource {
        &self.props.resource
    }

    fn eval_parameters(&self, env: &mut Environment) -> Result<Parameters, EvalError> {
        shape(
            self.props.parargs.as_ref(),
            env,
            self.integration.allowed_parameter_keys(),
        )
    }

    fn eval_credentials(&self, env: &mut Environment) -> Result<ComputedCredentials, EvalError> {
        resolve(self.props.credentials.as_ref(), env)
    }

    /// The canonical timed-out failure record for this state
    fn timed_out_failure_event(&self) -> FailureEvent {
        let timeout_name = StatesErrorNameType::StatesTimeout;
        FailureEvent::new(timeout_name, HistoryEventType::TaskTimedOut).with_details(
            HistoryEventDetails::TaskTimedOut(TaskTimedOutEventDetails {
                resource_type: self.props.resource.service().to_string(),
                resource: self.props.resource.action().to_string(),
                error: Some(timeout_name.as_str().to_string()),
                cause: None,
            }),
        )
    }
}

#[async_trait]
impl<I: Integration> ExecutionState for TaskState<I> {
    fn name(&self) -> &str {
        &self.props.name
    }

    fn entered_event_type(&self) -> HistoryEventType {
        HistoryEventType::TaskStateEntered
    }

    fn exited_event_type(&self) -> HistoryEventType {
        HistoryEventType::TaskStateExited
    }

    async fn eval_state(&self, env: &mut Environment) -> Result<Value, StateFault> {
        let parameters = self.eval_parameters(env)?;
        let credentials = self.eval_credentials(env)?;

        let ctx = TaskContext::new(env, &self.props.name, &self.props.resource);
        let cancel = env.cancellation_token();
        debug!(
            state = %self.props.name,
            resource = %self.props.resource,
            attempt = %ctx.attempt_id,
            "invoking integration"
        );

        // The stop signal and the timeout budget both race the call. Losing
        // futures are dropped, not awaited: timeout detection is advisory to
        // this control flow, it does not abort detached work the integration
        // may have spawned.
        let call = self.integration.invoke(&ctx, parameters, credentials);
        let outcome = match self.props.timeout {
            Some(budget) => tokio::select! {
                _ = cancel.cancelled() => {
                    return Err(StateFault::Stopped { cause: env.stop_cause() });
                }
                timed = tokio::time::timeout(budget, call) => match timed {
                    Ok(outcome) => outcome,
                    Err(_elapsed) => return Err(Fault::Timeout { budget }.into()),
                },
            },
            None => tokio::select! {
                _ = cancel.cancelled() => {
                    return Err(StateFault::Stopped { cause: env.stop_cause() });
                }
                outcome = call => outcome,
            },
        };

        outcome.map_err(StateFault::Fault)
    }

    fn classify_fault(&self, env: &Environment, fault: Fault) -> FailureEvent {
        // The integration's own override beats the generic paths
        if let Some(event) = self.integration.classify_fault(env, &fault) {
            return event;
        }

        match fault {
            // Matched strictly by kind, never by message content
            Fault::Timeout { .. } => self.timed_out_failure_event(),
            Fault::Task { error, cause } => FailureEvent::task_failed(
                ErrorName::from_name(error),
                self.props.resource.service(),
                self.props.resource.action(),
                cause,
            ),
            Fault::Permissions { cause } => FailureEvent::task_failed(
                StatesErrorNameType::StatesPermissions,
                self.props.resource.service(),
                self.props.resource.action(),
                Some(cause),
            ),
            other => classify_generic(env, other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    fn resource() -> Resource {
        "arn:aws:states:::storage:putRecord".parse().unwrap()
    }

    /// Integration returning a canned outcome, with optional hooks
    struct CannedIntegration {
        outcome: fn() -> Result<Value, Fault>,
        allow: Option<&'static [&'static str]>,
        classified: Option<FailureEvent>,
    }

    impl CannedIntegration {
        fn succeeding(outcome: fn() -> Result<Value, Fault>) -> Self {
            Self {
                outcome,
                allow: None,
                classified: None,
            }
        }
    }

    #[async_trait]
    impl Integration for CannedIntegration {
        async fn invoke(
            &self,
            _ctx: &TaskContext,
            _parameters: Parameters,
            _credentials: ComputedCredentials,
        ) -> Result<Value, Fault> {
            (self.outcome)()
        }

        fn classify_fault(&self, _env: &Environment, _fault: &Fault) -> Option<FailureEvent> {
            self.classified.clone()
        }

        fn allowed_parameter_keys(&self) -> Option<&[&str]> {
            self.allow
        }
    }

    #[tokio::test]
    async fn test_success_output_is_passed_through() {
        let state = TaskState::new(
            TaskStateProps::new("Persist", resource()),
            CannedIntegration::succeeding(|| Ok(json!({"ok": true}))),
        );
        let mut env = Environment::new("exec:demo:1");

        let output = state.execute(&mut env).await.unwrap();
        assert_eq!(output, json!({"ok": true}));
        assert_eq!(env.stack_depth(), 0);
    }

    #[tokio::test]
    async fn test_timeout_yields_the_canonical_record() {
        struct HangingIntegration;

        #[async_trait]
        impl Integration for HangingIntegration {
            async fn invoke(
                &self,
                _ctx: &TaskContext,
                _parameters: Parameters,
                _credentials: ComputedCredentials,
            ) -> Result<Value, Fault> {
                futures::future::pending().await
            }
        }

        let state = TaskState::new(
            TaskStateProps::new("Persist", resource())
                .with_timeout(Duration::from_millis(20)),
            HangingIntegration,
        );
        let mut env = Environment::new("exec:demo:1");

        let err = state.execute(&mut env).await.unwrap_err();
        let event = err.failure_event().unwrap();

        assert_eq!(event.error(), "States.Timeout");
        assert_eq!(event.event_type, HistoryEventType::TaskTimedOut);
        match event.event_details.as_ref().unwrap() {
            HistoryEventDetails::TaskTimedOut(d) => {
                assert_eq!(d.error.as_deref(), Some("States.Timeout"));
                assert_eq!(d.resource_type, "storage");
                assert_eq!(d.resource, "putRecord");
            }
            other => panic!("unexpected details payload: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_task_fault_keeps_the_custom_error_name() {
        let state = TaskState::new(
            TaskStateProps::new("Persist", resource()),
            CannedIntegration::succeeding(|| {
                Err(Fault::task(
                    "Storage.ConditionFailed",
                    Some("record version mismatch".to_string()),
                ))
            }),
        );
        let mut env = Environment::new("exec:demo:1");

        let err = state.execute(&mut env).await.unwrap_err();
        let event = err.failure_event().unwrap();

        assert_eq!(event.error(), "Storage.ConditionFailed");
        assert_eq!(event.event_type, HistoryEventType::TaskFailed);
    }

    #[tokio::test]
    async fn test_permissions_fault_uses_the_reserved_name() {
        let state = TaskState::new(
            TaskStateProps::new("Persist", resource()),
            CannedIntegration::succeeding(|| {
                Err(Fault::Permissions {
                    cause: "delegated role rejected".to_string(),
                })
            }),
        );
        let mut env = Environment::new("exec:demo:1");

        let err = state.execute(&mut env).await.unwrap_err();
        let event = err.failure_event().unwrap();
        assert_eq!(event.error(), "States.Permissions");
    }

    #[tokio::test]
    async fn test_unrecognized_fault_falls_back_to_the_base_hook() {
        let state = TaskState::new(
            TaskStateProps::new("Persist", resource()),
            CannedIntegration::succeeding(|| Err(Fault::runtime("wire format mismatch"))),
        );
        let mut env = Environment::new("exec:demo:1");

        let err = state.execute(&mut env).await.unwrap_err();
        let event = err.failure_event().unwrap();
        assert_eq!(event.error(), "States.Runtime");
        assert_eq!(event.event_type, HistoryEventType::ExecutionFailed);
    }

    #[tokio::test]
    async fn test_integration_override_beats_the_timeout_path() {
        let override_event = FailureEvent::task_failed(
            ErrorName::from_name("Storage.SlowPartition"),
            "storage",
            "putRecord",
            None,
        );
        let state = TaskState::new(
            TaskStateProps::new("Persist", resource()),
            CannedIntegration {
                outcome: || {
                    Err(Fault::Timeout {
                        budget: Duration::from_secs(1),
                    })
                },
                allow: None,
                classified: Some(override_event.clone()),
            },
        );
        let mut env = Environment::new("exec:demo:1");

        let err = state.execute(&mut env).await.unwrap_err();
        assert_eq!(*err.failure_event().unwrap(), override_event);
    }

    #[tokio::test]
    async fn test_allow_list_restricts_shaped_parameters() {
        let state = TaskState::new(
            TaskStateProps::new("Persist", resource())
                .with_parargs(Parargs::literal(json!({"a": 1, "b": 2}))),
            CannedIntegration {
                outcome: || Ok(json!(null)),
                allow: Some(&["a"]),
                classified: None,
            },
        );
        let mut env = Environment::new("exec:demo:1");

        let shaped = state.eval_parameters(&mut env).unwrap();
        assert_eq!(shaped.len(), 1);
        assert_eq!(shaped["a"], json!(1));
    }

    #[tokio::test]
    async fn test_absent_declarations_do_not_touch_the_environment() {
        let state = TaskState::new(
            TaskStateProps::new("Persist", resource()),
            CannedIntegration::succeeding(|| Ok(json!(null))),
        );
        let mut env = Environment::new("exec:demo:1");

        assert!(state.eval_parameters(&mut env).unwrap().is_empty());
        assert!(state.eval_credentials(&mut env).unwrap().is_empty());
        assert_eq!(env.stack_depth(), 0);
    }

    #[tokio::test]
    async fn test_eval_errors_are_not_classified() {
        let state = TaskState::new(
            TaskStateProps::new("Persist", resource()).with_parargs(Parargs::new(
                |_env: &mut Environment| -> Result<(), EvalError> {
                    Err(EvalError::Expression("unknown path $.x".to_string()))
                },
            )),
            CannedIntegration::succeeding(|| Ok(json!(null))),
        );
        let mut env = Environment::new("exec:demo:1");

        let err = state.execute(&mut env).await.unwrap_err();
        assert!(err.failure_event().is_none());
        assert!(matches!(err, crate::error::StateError::Eval(_)));
    }

    #[tokio::test]
    async fn test_registry_handles_work_type_erased() {
        let integration: Arc<dyn Integration> =
            Arc::new(CannedIntegration::succeeding(|| Ok(json!({"done": 1}))));
        let state: DynTaskState =
            TaskState::new(TaskStateProps::new("Persist", resource()), integration);
        let mut env = Environment::new("exec:demo:1");

        let output = state.execute(&mut env).await.unwrap();
        assert_eq!(output, json!({"done": 1}));
    }
}
