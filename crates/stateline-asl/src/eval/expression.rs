//! Expression evaluation protocol
//!
//! The definition compiler (an external collaborator) turns declared
//! templates into [`Expression`] implementors. The protocol is stack-based:
//! `eval` pushes exactly one value onto the environment's stack. In-repo
//! consumers never read the stack across a call boundary — they go through
//! [`eval_to_value`], which enforces the push/pop discipline and hands the
//! result back as an ordinary return value.

use serde_json::Value;
use thiserror::Error;

use super::environment::Environment;

/// Errors from expression evaluation
///
/// These indicate definition-time defects (a malformed template, a protocol
/// violation), not runtime service failures. They are never classified into
/// failure records; they propagate raw to the interpreter loop's top-level
/// handling.
#[derive(Debug, Error)]
pub enum EvalError {
    /// Popped an empty stack
    #[error("value stack underflow")]
    StackUnderflow,

    /// An expression broke the one-push contract
    #[error("expression left a net of {net} value(s) on the stack, expected exactly 1")]
    StackDiscipline { net: i64 },

    /// An expression produced a value of the wrong shape
    #[error("expression produced {found} where {expected} was expected")]
    UnexpectedType {
        expected: &'static str,
        found: &'static str,
    },

    /// The evaluator itself failed
    #[error("expression evaluation failed: {0}")]
    Expression(String),
}

/// A declared, unevaluated expression
///
/// `eval` must push exactly one value onto `env`'s stack and pop anything it
/// pushed beyond that before returning.
pub trait Expression: Send + Sync {
    fn eval(&self, env: &mut Environment) -> Result<(), EvalError>;
}

impl<F> Expression for F
where
    F: Fn(&mut Environment) -> Result<(), EvalError> + Send + Sync,
{
    fn eval(&self, env: &mut Environment) -> Result<(), EvalError> {
        self(env)
    }
}

/// The degenerate constant expression: pushes a JSON literal
#[derive(Debug, Clone)]
pub struct Literal(pub Value);

impl Expression for Literal {
    fn eval(&self, env: &mut Environment) -> Result<(), EvalError> {
        env.push(self.0.clone());
        Ok(())
    }
}

/// Evaluate an expression and return its result directly
///
/// Wraps the stack protocol in ordinary data flow: the pushed value is
/// popped within the same logical step, so the stack is observably unchanged
/// across this call. A net push count other than one is a protocol violation
/// and surfaces as [`EvalError::StackDiscipline`].
pub fn eval_to_value(
    expression: &dyn Expression,
    env: &mut Environment,
) -> Result<Value, EvalError> {
    let baseline = env.stack_depth();
    expression.eval(env)?;

    let net = env.stack_depth() as i64 - baseline as i64;
    if net != 1 {
        return Err(EvalError::StackDiscipline { net });
    }
    env.pop().ok_or(EvalError::StackUnderflow)
}

/// Short JSON type name for error messages
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
