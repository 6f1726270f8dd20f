//! Per-category event details payloads
//!
//! Each history event type that carries a payload has its own details
//! struct, serialized under a schema-mandated key
//! (`"taskTimedOutEventDetails"`, `"stateEnteredEventDetails"`, ...).
//! [`HistoryEventDetails`] is the closed union over those payloads; flattened
//! into a [`HistoryEvent`](crate::event::HistoryEvent) it produces exactly
//! the documented wire shape.

use serde::{Deserialize, Serialize};

/// Payload for `*StateEntered` events
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StateEnteredEventDetails {
    /// Name of the state being entered
    pub name: String,

    /// State input, as a serialized JSON string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
}

/// Payload for `*StateExited` events
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StateExitedEventDetails {
    /// Name of the state being exited
    pub name: String,

    /// State output, as a serialized JSON string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

/// Payload for `TaskFailed` events
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TaskFailedEventDetails {
    /// Service identifier of the bound resource
    pub resource_type: String,

    /// API action of the bound resource
    pub resource: String,

    /// Error name (canonical or custom)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Human-readable cause; never carries the canonical name's job
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
}

/// Payload for `TaskTimedOut` events
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TaskTimedOutEventDetails {
    /// Service identifier of the bound resource
    pub resource_type: String,

    /// API action of the bound resource
    pub resource: String,

    /// Error name that triggered the timeout record
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Human-readable cause
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
}

/// Payload for `ExecutionStarted` events
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionStartedEventDetails {
    /// Execution input, as a serialized JSON string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,

    /// Principal the execution runs as
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_arn: Option<String>,
}

/// Payload for `ExecutionSucceeded` events
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionSucceededEventDetails {
    /// Execution output, as a serialized JSON string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

/// Payload for `ExecutionFailed` events
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionFailedEventDetails {
    /// Error name (canonical or custom)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Human-readable cause
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
}

/// Payload for `ExecutionAborted` events
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionAbortedEventDetails {
    /// Error name, if the stop carried one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Human-readable cause
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
}

/// Union of all details payloads, keyed by schema field name
///
/// Externally tagged on purpose: flattening this enum into an event record
/// yields `{"stateEnteredEventDetails": {...}}` and friends verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum HistoryEventDetails {
    #[serde(rename = "stateEnteredEventDetails")]
    StateEntered(StateEnteredEventDetails),

    #[serde(rename = "stateExitedEventDetails")]
    StateExited(StateExitedEventDetails),

    #[serde(rename = "taskFailedEventDetails")]
    TaskFailed(TaskFailedEventDetails),

    #[serde(rename = "taskTimedOutEventDetails")]
    TaskTimedOut(TaskTimedOutEventDetails),

    #[serde(rename = "executionStartedEventDetails")]
    ExecutionStarted(ExecutionStartedEventDetails),

    #[serde(rename = "executionSucceededEventDetails")]
    ExecutionSucceeded(ExecutionSucceededEventDetails),

    #[serde(rename = "executionFailedEventDetails")]
    ExecutionFailed(ExecutionFailedEventDetails),

    #[serde(rename = "executionAbortedEventDetails")]
    ExecutionAborted(ExecutionAbortedEventDetails),
}

impl HistoryEventDetails {
    /// Error name carried by the payload, if the category has one
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::TaskFailed(d) => d.error.as_deref(),
            Self::TaskTimedOut(d) => d.error.as_deref(),
            Self::ExecutionFailed(d) => d.error.as_deref(),
            Self::ExecutionAborted(d) => d.error.as_deref(),
            _ => None,
        }
    }

    /// Cause text carried by the payload, if the category has one
    pub fn cause(&self) -> Option<&str> {
        match self {
            Self::TaskFailed(d) => d.cause.as_deref(),
            Self::TaskTimedOut(d) => d.cause.as_deref(),
            Self::ExecutionFailed(d) => d.cause.as_deref(),
            Self::ExecutionAborted(d) => d.cause.as_deref(),
            _ => None,
        }
    }
}
