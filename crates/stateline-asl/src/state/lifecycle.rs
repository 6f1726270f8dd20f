//! Execution lifecycle shared by every state kind
//!
//! One attempt of any state runs `entered -> core logic -> exited | failed`.
//! The entered record strictly precedes any evaluation work; on failure the
//! exit record is not emitted — the failure record is the attempt's terminal
//! signal.

use async_trait::async_trait;
use serde_json::Value;
use stateline_events::{
    HistoryEventDetails, HistoryEventType, StateEnteredEventDetails, StateExitedEventDetails,
};
use tracing::{debug, warn};

use crate::error::{Fault, FailureEvent, StateError, StateFault, StatesErrorNameType};
use crate::eval::Environment;

/// Base classification for faults no override recognizes
///
/// Pre-classified failures pass through unchanged. Everything else becomes a
/// generic runtime failure: the canonical `States.Runtime` name, with the
/// fault's display text confined to the cause field.
pub fn classify_generic(env: &Environment, fault: Fault) -> FailureEvent {
    match fault {
        Fault::Failure(event) => *event,
        other => {
            warn!(
                execution = %env.meta().execution_arn,
                cause = %other,
                "unrecognized fault, classifying as runtime failure"
            );
            FailureEvent::execution_failed(
                StatesErrorNameType::StatesRuntime,
                Some(other.to_string()),
            )
        }
    }
}

/// The lifecycle contract every executable state implements
///
/// Implementors supply their kind's entry/exit event types and the core
/// logic; the provided [`execute`](ExecutionState::execute) drives telemetry
/// and failure classification uniformly. The classification hook defaults to
/// [`classify_generic`]; overrides that recognize more specific fault shapes
/// delegate to it explicitly for everything else rather than re-building the
/// generic record.
#[async_trait]
pub trait ExecutionState: Send + Sync {
    /// Name of the state in the workflow definition
    fn name(&self) -> &str;

    /// Entry telemetry tag for this state kind
    fn entered_event_type(&self) -> HistoryEventType;

    /// Exit telemetry tag for this state kind
    fn exited_event_type(&self) -> HistoryEventType;

    /// Core logic of one attempt
    async fn eval_state(&self, env: &mut Environment) -> Result<Value, StateFault>;

    /// Classify a runtime fault into a failure record
    fn classify_fault(&self, env: &Environment, fault: Fault) -> FailureEvent {
        classify_generic(env, fault)
    }

    /// Run one attempt of this state
    ///
    /// Emits the entered record before any evaluation work, then either the
    /// exited record (success) or nothing further (the returned error is the
    /// terminal signal). Evaluation errors propagate raw; an external stop
    /// surfaces distinctly and is never classified.
    async fn execute(&self, env: &mut Environment) -> Result<Value, StateError> {
        let input = serde_json::to_string(env.input()).ok();
        env.record_event(
            self.entered_event_type(),
            Some(HistoryEventDetails::StateEntered(StateEnteredEventDetails {
                name: self.name().to_string(),
                input,
            })),
        );
        debug!(state = self.name(), "state entered");

        match self.eval_state(env).await {
            Ok(output) => {
                let output_text = serde_json::to_string(&output).ok();
                env.record_event(
                    self.exited_event_type(),
                    Some(HistoryEventDetails::StateExited(StateExitedEventDetails {
                        name: self.name().to_string(),
                        output: output_text,
                    })),
                );
                debug!(state = self.name(), "state exited");
                Ok(output)
            }
            Err(StateFault::Eval(err)) => {
                debug!(state = self.name(), error = %err, "evaluation error, propagating");
                Err(StateError::Eval(err))
            }
            Err(StateFault::Stopped { cause }) => {
                debug!(state = self.name(), "execution stopped mid-state");
                Err(StateError::Stopped { cause })
            }
            Err(StateFault::Fault(fault)) => {
                let event = self.classify_fault(env, fault);
                warn!(state = self.name(), error = event.error(), "state failed");
                Err(StateError::Failed(event))
            }
        }
    }
}
