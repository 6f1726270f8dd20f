//! Integration contract and registry
//!
//! Concrete service integrations live outside this crate; this module owns
//! the contract they must satisfy and the registry the interpreter loop uses
//! to bind a Task state's resource to an implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::credentials::ComputedCredentials;
use super::parameters::Parameters;
use super::resource::Resource;
use crate::error::{Fault, FailureEvent};
use crate::eval::Environment;

/// Context handed to an integration for one invocation attempt
///
/// Carries the ambient identifiers and a cancellation token mirroring the
/// execution's stop signal. Long-running integrations may observe the token
/// to abort early; the scaffolding's own timeout race does not depend on
/// them doing so.
#[derive(Debug, Clone)]
pub struct TaskContext {
    /// Unique id of this invocation attempt
    pub attempt_id: Uuid,

    /// Identifier of the owning execution instance
    pub execution_arn: String,

    /// Name of the Task state being executed
    pub state_name: String,

    /// The bound integration target
    pub resource: Resource,

    cancellation: CancellationToken,
}

impl TaskContext {
    pub(crate) fn new(env: &Environment, state_name: &str, resource: &Resource) -> Self {
        Self {
            attempt_id: Uuid::now_v7(),
            execution_arn: env.meta().execution_arn.clone(),
            state_name: state_name.to_string(),
            resource: resource.clone(),
            cancellation: env.cancellation_token(),
        }
    }

    /// Check whether the execution was stopped
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Resolves when the execution is stopped
    pub async fn cancelled(&self) {
        self.cancellation.cancelled().await
    }
}

/// The capability contract every concrete integration implements
///
/// `invoke` performs the actual service call; the optional hooks let an
/// integration restrict which parameter keys it recognizes and claim faults
/// it can classify more precisely than the scaffolding. The hooks are
/// infallible by type — a classifier cannot itself fail.
#[async_trait]
pub trait Integration: Send + Sync {
    /// Perform the service call for one attempt
    ///
    /// The returned value becomes the state's output unchanged. Failures
    /// are returned as typed faults; integrations that can already name the
    /// precise failure record may return `Fault::Failure` directly.
    async fn invoke(
        &self,
        ctx: &TaskContext,
        parameters: Parameters,
        credentials: ComputedCredentials,
    ) -> Result<Value, Fault>;

    /// Claim a fault this integration recognizes
    ///
    /// Returning `None` defers to the scaffolding's classification (timeout
    /// by kind, then the generic fallback).
    fn classify_fault(&self, env: &Environment, fault: &Fault) -> Option<FailureEvent> {
        let _ = (env, fault);
        None
    }

    /// Parameter keys this integration recognizes
    ///
    /// `None` (the default) means unrestricted. A non-empty list makes
    /// shaping drop every other key silently.
    fn allowed_parameter_keys(&self) -> Option<&[&str]> {
        None
    }
}

// Type-erased integrations satisfy the contract by delegation, so the
// scaffolding can be used generically or with registry-provided handles.
#[async_trait]
impl Integration for Arc<dyn Integration> {
    async fn invoke(
        &self,
        ctx: &TaskContext,
        parameters: Parameters,
        credentials: ComputedCredentials,
    ) -> Result<Value, Fault> {
        (**self).invoke(ctx, parameters, credentials).await
    }

    fn classify_fault(&self, env: &Environment, fault: &Fault) -> Option<FailureEvent> {
        (**self).classify_fault(env, fault)
    }

    fn allowed_parameter_keys(&self) -> Option<&[&str]> {
        (**self).allowed_parameter_keys()
    }
}

/// Errors from registry lookups
#[derive(Debug, Error)]
pub enum RegistryError {
    /// No integration registered for the resource's service
    #[error("no integration registered for service: {0}")]
    UnknownService(String),
}

/// Registry of integrations, keyed by service identifier
///
/// The interpreter loop resolves each Task state's bound resource through
/// this when constructing the state graph.
#[derive(Default)]
pub struct IntegrationRegistry {
    integrations: HashMap<String, Arc<dyn Integration>>,
}

impl IntegrationRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an integration for a service identifier
    pub fn register(&mut self, service: impl Into<String>, integration: Arc<dyn Integration>) {
        self.integrations.insert(service.into(), integration);
    }

    /// Check if a service has a registered integration
    pub fn contains(&self, service: &str) -> bool {
        self.integrations.contains_key(service)
    }

    /// Resolve the integration bound to a resource
    pub fn resolve(&self, resource: &Resource) -> Result<Arc<dyn Integration>, RegistryError> {
        self.integrations
            .get(resource.service())
            .cloned()
            .ok_or_else(|| RegistryError::UnknownService(resource.service().to_string()))
    }

    /// Registered service identifiers
    pub fn services(&self) -> impl Iterator<Item = &str> {
        self.integrations.keys().map(|s| s.as_str())
    }
}

impl std::fmt::Debug for IntegrationRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntegrationRegistry")
            .field("services", &self.integrations.keys().collect::<Vec<_>>())
            .finish()
    }
}
