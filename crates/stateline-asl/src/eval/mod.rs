//! Evaluation environment and expression protocol

mod environment;
mod expression;

pub use environment::{Environment, ExecutionMeta};
pub use expression::{eval_to_value, EvalError, Expression, Literal};

pub(crate) use expression::json_type_name;
