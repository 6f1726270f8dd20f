//! Integration target bound to a Task state

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from resource parsing
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResourceError {
    #[error("malformed resource arn: {arn}")]
    Malformed { arn: String },

    #[error("unrecognized invocation condition: {condition}")]
    UnknownCondition { condition: String },
}

/// Invocation condition suffix of an optimized integration resource
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ResourceCondition {
    /// `.sync` — run the job and wait for it to complete
    Sync,
    /// `.sync:2` — as `.sync`, with the response serialized as JSON
    SyncJson,
    /// `.waitForTaskToken` — pause until the task token is returned
    WaitForTaskToken,
}

impl ResourceCondition {
    fn from_suffix(suffix: &str) -> Result<Self, ResourceError> {
        match suffix {
            "sync" => Ok(Self::Sync),
            "sync:2" => Ok(Self::SyncJson),
            "waitForTaskToken" => Ok(Self::WaitForTaskToken),
            other => Err(ResourceError::UnknownCondition {
                condition: other.to_string(),
            }),
        }
    }
}

/// The external integration target of a Task state
///
/// Bound at definition time and immutable for the lifetime of the state.
/// Two forms are accepted:
///
/// - the optimized-integration form, `arn:<partition>:states:::<service>:<api>`
///   with an optional `.sync` / `.sync:2` / `.waitForTaskToken` condition;
/// - a plain service ARN (a function ARN, an activity ARN), for which the
///   service is taken from the ARN's service segment and the action defaults
///   to `invoke`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Resource {
    arn: String,
    service: String,
    action: String,
    condition: Option<ResourceCondition>,
}

impl Resource {
    /// The raw resource string from the definition
    pub fn arn(&self) -> &str {
        &self.arn
    }

    /// Service identifier of the integration target
    pub fn service(&self) -> &str {
        &self.service
    }

    /// API action on the target service
    pub fn action(&self) -> &str {
        &self.action
    }

    /// Invocation condition, if the resource declared one
    pub fn condition(&self) -> Option<ResourceCondition> {
        self.condition
    }
}

impl FromStr for Resource {
    type Err = ResourceError;

    fn from_str(arn: &str) -> Result<Self, Self::Err> {
        let malformed = || ResourceError::Malformed {
            arn: arn.to_string(),
        };

        let segments: Vec<&str> = arn.split(':').collect();
        if segments.len() < 6 || segments[0] != "arn" {
            return Err(malformed());
        }

        // Optimized integration: arn:<p>:states:::<service>:<api>[.<cond>]
        // (empty region and account segments distinguish it from plain ARNs)
        if segments[2] == "states" && segments[3].is_empty() && segments[4].is_empty() {
            if segments.len() < 7 {
                return Err(malformed());
            }
            let service = segments[5];
            // Conditions may themselves contain a colon (`sync:2`), so the
            // action spans every remaining segment
            let action_part = segments[6..].join(":");
            if service.is_empty() || action_part.is_empty() {
                return Err(malformed());
            }

            let (action, condition) = match action_part.split_once('.') {
                Some((action, suffix)) => {
                    (action.to_string(), Some(ResourceCondition::from_suffix(suffix)?))
                }
                None => (action_part, None),
            };

            return Ok(Self {
                arn: arn.to_string(),
                service: service.to_string(),
                action,
                condition,
            });
        }

        // Plain service ARN: the target is the whole ARN, invoked directly
        let service = segments[2];
        if service.is_empty() {
            return Err(malformed());
        }
        Ok(Self {
            arn: arn.to_string(),
            service: service.to_string(),
            action: "invoke".to_string(),
            condition: None,
        })
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.arn)
    }
}
