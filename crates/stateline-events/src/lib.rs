//! # Execution History Schema
//!
//! Wire-format types for a workflow execution's audit trail.
//!
//! Every state transition an execution goes through is recorded as a
//! [`HistoryEvent`]: an immutable, ordered record with a type tag and an
//! optional category-specific details payload. The serialized shape of these
//! types is load-bearing — workflow definitions' error-matching clauses and
//! downstream tooling pattern-match on the literal strings — so field names
//! and event-type names reproduce the platform's documented schema exactly.
//!
//! Two conventions worth calling out:
//!
//! - Event-type names serialize in CamelCase (`"TaskStateEntered"`).
//! - State `input`/`output` fields in details payloads are carried as
//!   serialized JSON *strings*, not nested JSON values.

pub mod detail;
pub mod event;

pub use detail::{
    ExecutionAbortedEventDetails, ExecutionFailedEventDetails, ExecutionStartedEventDetails,
    ExecutionSucceededEventDetails, HistoryEventDetails, StateEnteredEventDetails,
    StateExitedEventDetails, TaskFailedEventDetails, TaskTimedOutEventDetails,
};
pub use event::{HistoryEvent, HistoryEventType};
