//! Task states: the service-invoking state kind

mod credentials;
mod parameters;
mod resource;
mod service;
mod state_task;

pub use credentials::{resolve, ComputedCredentials, Credentials};
pub use parameters::{shape, Parameters, Parargs};
pub use resource::{Resource, ResourceCondition, ResourceError};
pub use service::{Integration, IntegrationRegistry, RegistryError, TaskContext};
pub use state_task::{DynTaskState, TaskState, TaskStateProps};
