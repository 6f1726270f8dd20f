//! Error taxonomy and failure records
//!
//! The closed set of named failure categories, the canonical `States.*`
//! strings they serialize to, and the [`FailureEvent`] record every concrete
//! failure path must route through. Ad-hoc error payloads are not
//! constructed anywhere else in the crate.

mod failure;
mod fault;
mod states;

pub use failure::FailureEvent;
pub use fault::{Fault, StateError, StateFault};
pub use states::{ErrorName, StatesErrorNameType};
