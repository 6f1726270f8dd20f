//! Delegated-credential resolution
//!
//! A Task state may declare a cross-principal delegation expression (an
//! assumable role reference, optionally with a session name). Resolution
//! happens per attempt; the computed material lives for that attempt only —
//! it is never cached, and its `Debug` form never prints the values.

use serde_json::Value;

use super::parameters::Parameters;
use crate::eval::{eval_to_value, json_type_name, Environment, EvalError, Expression, Literal};

/// The declared, unevaluated delegation expression of a state
pub struct Credentials {
    expression: Box<dyn Expression>,
}

impl Credentials {
    /// Wrap a compiled delegation expression
    pub fn new(expression: impl Expression + 'static) -> Self {
        Self {
            expression: Box::new(expression),
        }
    }

    /// A constant delegation declaration
    pub fn literal(value: Value) -> Self {
        Self::new(Literal(value))
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credentials(..)")
    }
}

/// Resolved short-lived credential material for one execution attempt
///
/// Empty when the state declares no delegation. Dropped at the end of the
/// attempt that computed it.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ComputedCredentials(Parameters);

impl ComputedCredentials {
    /// Whether any delegation was resolved
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of resolved entries
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Look up one entry of the resolved bundle
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Consume the bundle, exposing the raw mapping to the integration call
    pub fn into_inner(self) -> Parameters {
        self.0
    }
}

impl From<Parameters> for ComputedCredentials {
    fn from(map: Parameters) -> Self {
        Self(map)
    }
}

// Credential material must never reach logs, including via {:?}
impl std::fmt::Debug for ComputedCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ComputedCredentials({} entries, redacted)", self.0.len())
    }
}

/// Resolve a state's credential declaration for one execution attempt
///
/// An absent declaration yields the empty bundle without touching the
/// environment. Evaluation errors propagate unchanged — classification is
/// the caller's responsibility, not this component's.
pub fn resolve(
    declaration: Option<&Credentials>,
    env: &mut Environment,
) -> Result<ComputedCredentials, EvalError> {
    let Some(credentials) = declaration else {
        return Ok(ComputedCredentials::default());
    };

    match eval_to_value(&*credentials.expression, env)? {
        Value::Object(map) => Ok(ComputedCredentials(map)),
        other => Err(EvalError::UnexpectedType {
            expected: "an object",
            found: json_type_name(&other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absent_declaration_yields_empty_bundle() {
        let mut env = Environment::new("exec:demo:1");
        let resolved = resolve(None, &mut env).unwrap();

        assert!(resolved.is_empty());
        assert_eq!(env.stack_depth(), 0);
    }

    #[test]
    fn test_declared_delegation_is_returned_unmodified() {
        let mut env = Environment::new("exec:demo:1");
        let credentials = Credentials::literal(json!({
            "RoleArn": "arn:aws:iam::123456789012:role/cross-account",
        }));

        let resolved = resolve(Some(&credentials), &mut env).unwrap();
        assert_eq!(resolved.len(), 1);
        assert_eq!(
            resolved.get("RoleArn").unwrap(),
            "arn:aws:iam::123456789012:role/cross-account"
        );
    }

    #[test]
    fn test_debug_redacts_values() {
        let credentials: ComputedCredentials = {
            let mut map = Parameters::new();
            map.insert("SecretAccessKey".to_string(), json!("hunter2"));
            map.into()
        };

        let debug = format!("{credentials:?}");
        assert!(!debug.contains("hunter2"));
        assert!(!debug.contains("SecretAccessKey"));
        assert!(debug.contains("1 entries"));
    }

    #[test]
    fn test_evaluation_errors_propagate_unchanged() {
        let mut env = Environment::new("exec:demo:1");
        let credentials = Credentials::new(|_env: &mut Environment| -> Result<(), EvalError> {
            Err(EvalError::Expression("unknown path $.role".to_string()))
        });

        let err = resolve(Some(&credentials), &mut env).unwrap_err();
        assert!(matches!(err, EvalError::Expression(_)));
    }

    #[test]
    fn test_non_object_delegation_is_a_definition_defect() {
        let mut env = Environment::new("exec:demo:1");
        let credentials = Credentials::literal(json!("just-a-string"));

        let err = resolve(Some(&credentials), &mut env).unwrap_err();
        assert!(matches!(err, EvalError::UnexpectedType { .. }));
    }
}
