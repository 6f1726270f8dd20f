//! The closed error-name taxonomy
//!
//! Reserved error names are fixed strings consumed by downstream tooling and
//! by workflow definitions' own `Catch`/`Retry` error-matching clauses. The
//! mapping from variant to string is stable and must reproduce the platform's
//! documented names exactly (a timeout serializes as `States.Timeout`).

use serde::{Deserialize, Serialize, Serializer};

/// Reserved error names of the workflow definition language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatesErrorNameType {
    StatesAll,
    StatesHeartbeatTimeout,
    StatesTimeout,
    StatesTaskFailed,
    StatesPermissions,
    StatesResultPathMatchFailure,
    StatesParameterPathFailure,
    StatesBranchFailed,
    StatesNoChoiceMatched,
    StatesIntrinsicFailure,
    StatesExceedToleratedFailureThreshold,
    StatesItemReaderFailed,
    StatesResultWriterFailed,
    StatesRuntime,
}

impl StatesErrorNameType {
    /// Canonical string form
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StatesAll => "States.ALL",
            Self::StatesHeartbeatTimeout => "States.HeartbeatTimeout",
            Self::StatesTimeout => "States.Timeout",
            Self::StatesTaskFailed => "States.TaskFailed",
            Self::StatesPermissions => "States.Permissions",
            Self::StatesResultPathMatchFailure => "States.ResultPathMatchFailure",
            Self::StatesParameterPathFailure => "States.ParameterPathFailure",
            Self::StatesBranchFailed => "States.BranchFailed",
            Self::StatesNoChoiceMatched => "States.NoChoiceMatched",
            Self::StatesIntrinsicFailure => "States.IntrinsicFailure",
            Self::StatesExceedToleratedFailureThreshold => {
                "States.ExceedToleratedFailureThreshold"
            }
            Self::StatesItemReaderFailed => "States.ItemReaderFailed",
            Self::StatesResultWriterFailed => "States.ResultWriterFailed",
            Self::StatesRuntime => "States.Runtime",
        }
    }

    /// Resolve a canonical string back to its reserved name
    pub fn from_name(name: &str) -> Option<Self> {
        let typ = match name {
            "States.ALL" => Self::StatesAll,
            "States.HeartbeatTimeout" => Self::StatesHeartbeatTimeout,
            "States.Timeout" => Self::StatesTimeout,
            "States.TaskFailed" => Self::StatesTaskFailed,
            "States.Permissions" => Self::StatesPermissions,
            "States.ResultPathMatchFailure" => Self::StatesResultPathMatchFailure,
            "States.ParameterPathFailure" => Self::StatesParameterPathFailure,
            "States.BranchFailed" => Self::StatesBranchFailed,
            "States.NoChoiceMatched" => Self::StatesNoChoiceMatched,
            "States.IntrinsicFailure" => Self::StatesIntrinsicFailure,
            "States.ExceedToleratedFailureThreshold" => {
                Self::StatesExceedToleratedFailureThreshold
            }
            "States.ItemReaderFailed" => Self::StatesItemReaderFailed,
            "States.ResultWriterFailed" => Self::StatesResultWriterFailed,
            "States.Runtime" => Self::StatesRuntime,
            _ => return None,
        };
        Some(typ)
    }
}

impl std::fmt::Display for StatesErrorNameType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error name: reserved, or a custom user-defined passthrough
///
/// Custom names come from the workflow definition (a Fail state's `Error`
/// field, an integration's application-level error code) and flow through
/// classification unchanged. Resolving a known `States.*` string yields the
/// reserved variant; unknown `States.`-prefixed strings are kept verbatim —
/// rejecting them is the definition validator's job, not this layer's.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ErrorName {
    States(StatesErrorNameType),
    Custom(String),
}

impl ErrorName {
    /// Resolve a string into a reserved name where possible
    pub fn from_name(name: impl Into<String>) -> Self {
        let name = name.into();
        match StatesErrorNameType::from_name(&name) {
            Some(typ) => Self::States(typ),
            None => Self::Custom(name),
        }
    }

    /// Canonical string form
    pub fn as_str(&self) -> &str {
        match self {
            Self::States(typ) => typ.as_str(),
            Self::Custom(name) => name.as_str(),
        }
    }

    /// Check this name against a `Retry`/`Catch` matching pattern
    ///
    /// `States.ALL` matches every name; a pattern ending in `.*` matches any
    /// name with that prefix (`"Storage.*"` matches `"Storage.Throttled"`);
    /// anything else is an exact match.
    pub fn is_matched_by(&self, pattern: &str) -> bool {
        if pattern == StatesErrorNameType::StatesAll.as_str() {
            return true;
        }
        if let Some(prefix) = pattern.strip_suffix(".*") {
            return self
                .as_str()
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.starts_with('.'));
        }
        self.as_str() == pattern
    }
}

impl From<StatesErrorNameType> for ErrorName {
    fn from(typ: StatesErrorNameType) -> Self {
        Self::States(typ)
    }
}

impl std::fmt::Display for ErrorName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ErrorName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ErrorName {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::from_name(name))
    }
}
