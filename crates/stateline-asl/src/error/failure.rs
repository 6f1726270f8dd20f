//! The canonical failure record

use serde::{Deserialize, Serialize};
use stateline_events::{
    ExecutionFailedEventDetails, HistoryEventDetails, HistoryEventType, TaskFailedEventDetails,
};

use super::states::ErrorName;

/// The classified representation of a failed execution attempt
///
/// Created exactly once per failed attempt, then treated as data: the
/// interpreter loop matches `error_name` against the definition's
/// `Retry`/`Catch` clauses and appends the record to the execution history.
/// The error name is non-optional by type; a failure record without a name
/// cannot be constructed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FailureEvent {
    /// Name from the closed taxonomy, or a custom passthrough name
    pub error_name: ErrorName,

    /// History event type announcing the failure
    pub event_type: HistoryEventType,

    /// Category-specific telemetry payload
    pub event_details: Option<HistoryEventDetails>,
}

impl FailureEvent {
    /// Create a failure record with no details payload
    pub fn new(error_name: impl Into<ErrorName>, event_type: HistoryEventType) -> Self {
        Self {
            error_name: error_name.into(),
            event_type,
            event_details: None,
        }
    }

    /// Attach a details payload
    pub fn with_details(mut self, details: HistoryEventDetails) -> Self {
        self.event_details = Some(details);
        self
    }

    /// An execution-level failure record
    ///
    /// The canonical name goes in the name and `error` fields; `cause` is
    /// the only place free-form fault text may appear.
    pub fn execution_failed(error_name: impl Into<ErrorName>, cause: Option<String>) -> Self {
        let error_name = error_name.into();
        let details = ExecutionFailedEventDetails {
            error: Some(error_name.as_str().to_string()),
            cause,
        };
        Self::new(error_name, HistoryEventType::ExecutionFailed)
            .with_details(HistoryEventDetails::ExecutionFailed(details))
    }

    /// A task-level failure record naming the bound resource
    pub fn task_failed(
        error_name: impl Into<ErrorName>,
        resource_type: impl Into<String>,
        resource: impl Into<String>,
        cause: Option<String>,
    ) -> Self {
        let error_name = error_name.into();
        let details = TaskFailedEventDetails {
            resource_type: resource_type.into(),
            resource: resource.into(),
            error: Some(error_name.as_str().to_string()),
            cause,
        };
        Self::new(error_name, HistoryEventType::TaskFailed)
            .with_details(HistoryEventDetails::TaskFailed(details))
    }

    /// Canonical string form of the error name
    pub fn error(&self) -> &str {
        self.error_name.as_str()
    }
}

impl std::fmt::Display for FailureEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.error_name, self.event_type)
    }
}
