//! History events and their type tags

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::detail::HistoryEventDetails;

/// Type tag for a history event
///
/// Entry/exit tags exist per state kind: each kind of state announces itself
/// with its own entered/exited pair (a Fail state has no exited tag — it is
/// terminal). Task lifecycle tags cover the interaction with the bound
/// service, and execution-level tags bracket the execution itself.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum HistoryEventType {
    // Execution lifecycle
    ExecutionStarted,
    ExecutionSucceeded,
    ExecutionFailed,
    ExecutionAborted,
    ExecutionTimedOut,

    // State entry/exit, one pair per state kind
    ChoiceStateEntered,
    ChoiceStateExited,
    FailStateEntered,
    MapStateEntered,
    MapStateExited,
    ParallelStateEntered,
    ParallelStateExited,
    PassStateEntered,
    PassStateExited,
    SucceedStateEntered,
    SucceedStateExited,
    TaskStateEntered,
    TaskStateExited,
    WaitStateEntered,
    WaitStateExited,

    // Task/service interaction
    TaskScheduled,
    TaskStarted,
    TaskSubmitted,
    TaskSucceeded,
    TaskFailed,
    TaskTimedOut,
}

impl HistoryEventType {
    /// Canonical string form, identical to the serialized representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ExecutionStarted => "ExecutionStarted",
            Self::ExecutionSucceeded => "ExecutionSucceeded",
            Self::ExecutionFailed => "ExecutionFailed",
            Self::ExecutionAborted => "ExecutionAborted",
            Self::ExecutionTimedOut => "ExecutionTimedOut",
            Self::ChoiceStateEntered => "ChoiceStateEntered",
            Self::ChoiceStateExited => "ChoiceStateExited",
            Self::FailStateEntered => "FailStateEntered",
            Self::MapStateEntered => "MapStateEntered",
            Self::MapStateExited => "MapStateExited",
            Self::ParallelStateEntered => "ParallelStateEntered",
            Self::ParallelStateExited => "ParallelStateExited",
            Self::PassStateEntered => "PassStateEntered",
            Self::PassStateExited => "PassStateExited",
            Self::SucceedStateEntered => "SucceedStateEntered",
            Self::SucceedStateExited => "SucceedStateExited",
            Self::TaskStateEntered => "TaskStateEntered",
            Self::TaskStateExited => "TaskStateExited",
            Self::WaitStateEntered => "WaitStateEntered",
            Self::WaitStateExited => "WaitStateExited",
            Self::TaskScheduled => "TaskScheduled",
            Self::TaskStarted => "TaskStarted",
            Self::TaskSubmitted => "TaskSubmitted",
            Self::TaskSucceeded => "TaskSucceeded",
            Self::TaskFailed => "TaskFailed",
            Self::TaskTimedOut => "TaskTimedOut",
        }
    }

    /// Check if this event type ends the execution
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::ExecutionSucceeded
                | Self::ExecutionFailed
                | Self::ExecutionAborted
                | Self::ExecutionTimedOut
        )
    }
}

impl std::fmt::Display for HistoryEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable record appended to an execution's audit trail
///
/// Events are ordered by `id` within one execution; `previous_event_id`
/// links each event to its predecessor (0 for the first event). Events are
/// never rewritten — a failed attempt is recorded as a new event, not an
/// edit of an old one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEvent {
    /// Position in the execution's history, starting at 1
    pub id: u64,

    /// Id of the preceding event (0 for the first event)
    pub previous_event_id: u64,

    /// When the event was recorded
    pub timestamp: DateTime<Utc>,

    /// Event type tag
    #[serde(rename = "type")]
    pub event_type: HistoryEventType,

    /// Category-specific payload, keyed by its schema field name
    /// (a `None` flattens to nothing)
    #[serde(flatten)]
    pub details: Option<HistoryEventDetails>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detail::TaskTimedOutEventDetails;

    #[test]
    fn test_event_type_serializes_to_platform_name() {
        let json = serde_json::to_string(&HistoryEventType::TaskStateEntered).unwrap();
        assert_eq!(json, "\"TaskStateEntered\"");

        let json = serde_json::to_string(&HistoryEventType::TaskTimedOut).unwrap();
        assert_eq!(json, "\"TaskTimedOut\"");
    }

    #[test]
    fn test_as_str_matches_serialized_form() {
        for event_type in [
            HistoryEventType::ExecutionStarted,
            HistoryEventType::TaskStateEntered,
            HistoryEventType::TaskStateExited,
            HistoryEventType::TaskFailed,
            HistoryEventType::TaskTimedOut,
            HistoryEventType::FailStateEntered,
        ] {
            let json = serde_json::to_string(&event_type).unwrap();
            assert_eq!(json, format!("\"{}\"", event_type.as_str()));
        }
    }

    #[test]
    fn test_is_terminal() {
        assert!(HistoryEventType::ExecutionFailed.is_terminal());
        assert!(HistoryEventType::ExecutionAborted.is_terminal());
        assert!(!HistoryEventType::TaskStateExited.is_terminal());
        assert!(!HistoryEventType::TaskFailed.is_terminal());
    }

    #[test]
    fn test_history_event_wire_shape() {
        let event = HistoryEvent {
            id: 3,
            previous_event_id: 2,
            timestamp: Utc::now(),
            event_type: HistoryEventType::TaskTimedOut,
            details: Some(HistoryEventDetails::TaskTimedOut(
                TaskTimedOutEventDetails {
                    resource_type: "storage".to_string(),
                    resource: "putRecord".to_string(),
                    error: Some("States.Timeout".to_string()),
                    cause: None,
                },
            )),
        };

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["id"], 3);
        assert_eq!(value["previousEventId"], 2);
        assert_eq!(value["type"], "TaskTimedOut");
        assert_eq!(
            value["taskTimedOutEventDetails"]["error"],
            "States.Timeout"
        );
        assert_eq!(
            value["taskTimedOutEventDetails"]["resourceType"],
            "storage"
        );

        let parsed: HistoryEvent = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, event);
    }

    #[test]
    fn test_history_event_without_details() {
        let event = HistoryEvent {
            id: 1,
            previous_event_id: 0,
            timestamp: Utc::now(),
            event_type: HistoryEventType::ExecutionStarted,
            details: None,
        };

        let value = serde_json::to_value(&event).unwrap();
        let object = value.as_object().unwrap();
        assert!(!object.keys().any(|k| k.ends_with("EventDetails")));

        let parsed: HistoryEvent = serde_json::from_value(value).unwrap();
        assert_eq!(parsed.details, None);
    }
}
