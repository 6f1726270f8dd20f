//! Per-execution evaluation environment

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde_json::Value;
use stateline_events::{HistoryEvent, HistoryEventDetails, HistoryEventType};
use tokio_util::sync::CancellationToken;

/// Ambient execution metadata, read-only during state evaluation
#[derive(Debug, Clone)]
pub struct ExecutionMeta {
    /// Identifier of the running execution instance
    pub execution_arn: String,

    /// When the execution started
    pub started_at: DateTime<Utc>,
}

/// The shared per-execution evaluation context
///
/// One environment per execution instance, owned by one logical thread of
/// control; all stack and history mutation goes through `&mut` access. The
/// value stack is the hand-off channel of the expression-evaluation
/// protocol: every evaluator must pop exactly what it pushed, in LIFO order,
/// within the same logical step. No component may leave values on the stack
/// across step boundaries.
#[derive(Debug)]
pub struct Environment {
    meta: ExecutionMeta,
    input: Value,
    stack: Vec<Value>,
    history: Vec<HistoryEvent>,
    cancellation: CancellationToken,
    stop_cause: Mutex<Option<String>>,
}

impl Environment {
    /// Create an environment for a new execution instance
    pub fn new(execution_arn: impl Into<String>) -> Self {
        Self {
            meta: ExecutionMeta {
                execution_arn: execution_arn.into(),
                started_at: Utc::now(),
            },
            input: Value::Null,
            stack: Vec::new(),
            history: Vec::new(),
            cancellation: CancellationToken::new(),
            stop_cause: Mutex::new(None),
        }
    }

    /// Set the current state input (done by the interpreter loop between states)
    pub fn set_input(&mut self, input: Value) {
        self.input = input;
    }

    /// Current state input
    pub fn input(&self) -> &Value {
        &self.input
    }

    /// Ambient execution metadata
    pub fn meta(&self) -> &ExecutionMeta {
        &self.meta
    }

    // ------------------------------------------------------------------
    // Value stack
    // ------------------------------------------------------------------

    /// Push a value onto the evaluation stack
    pub fn push(&mut self, value: Value) {
        self.stack.push(value);
    }

    /// Pop the most recently pushed value
    pub fn pop(&mut self) -> Option<Value> {
        self.stack.pop()
    }

    /// Current stack depth
    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    // ------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------

    /// Append an event to the execution history
    ///
    /// Ids are sequential starting at 1; `previous_event_id` links to the
    /// prior event. Returns the id of the appended event.
    pub fn record_event(
        &mut self,
        event_type: HistoryEventType,
        details: Option<HistoryEventDetails>,
    ) -> u64 {
        let id = self.history.len() as u64 + 1;
        self.history.push(HistoryEvent {
            id,
            previous_event_id: id - 1,
            timestamp: Utc::now(),
            event_type,
            details,
        });
        id
    }

    /// The execution history recorded so far
    pub fn history(&self) -> &[HistoryEvent] {
        &self.history
    }

    // ------------------------------------------------------------------
    // External stop
    // ------------------------------------------------------------------

    /// Token observed by in-flight state evaluation
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    /// Stop the execution externally
    ///
    /// In-flight state evaluation surfaces this as a distinct fault path,
    /// never as a timeout or generic failure.
    pub fn stop(&self, cause: Option<String>) {
        *self.stop_cause.lock() = cause;
        self.cancellation.cancel();
    }

    /// Check whether a stop was requested
    pub fn is_stopped(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Cause supplied with the stop request, if any
    pub fn stop_cause(&self) -> Option<String> {
        self.stop_cause.lock().clone()
    }
}
