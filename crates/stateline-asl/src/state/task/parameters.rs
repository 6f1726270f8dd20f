//! Parameter shaping
//!
//! A Task state's declared parameter template is evaluated fresh on every
//! attempt, then filtered against the integration's allow-list of recognized
//! keys. Integrations documented as accepting only a subset of fields must
//! ignore extraneous input, not reject it — so the filtering is silent.

use serde_json::Value;

use crate::eval::{eval_to_value, json_type_name, Environment, EvalError, Expression, Literal};

/// Evaluated parameter mapping handed to an integration
///
/// Insertion-ordered: shaping the same declaration against an unchanged
/// environment yields the same keys in the same order.
pub type Parameters = serde_json::Map<String, Value>;

/// The declared, unevaluated parameter template of a state
///
/// The name covers both spellings in the definition language: `Parameters`
/// in the path-based variant, `Arguments` in the query-language variant.
/// Immutable once bound; owned by the state.
pub struct Parargs {
    expression: Box<dyn Expression>,
}

impl Parargs {
    /// Wrap a compiled parameter expression
    pub fn new(expression: impl Expression + 'static) -> Self {
        Self {
            expression: Box::new(expression),
        }
    }

    /// A constant parameter template
    pub fn literal(value: Value) -> Self {
        Self::new(Literal(value))
    }

    /// Evaluate the template into a raw parameter mapping
    pub fn eval(&self, env: &mut Environment) -> Result<Parameters, EvalError> {
        match eval_to_value(&*self.expression, env)? {
            Value::Object(map) => Ok(map),
            other => Err(EvalError::UnexpectedType {
                expected: "an object",
                found: json_type_name(&other),
            }),
        }
    }
}

impl std::fmt::Debug for Parargs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Parargs(..)")
    }
}

/// Shape a state's parameters for one execution attempt
///
/// An absent declaration yields an empty mapping without touching the
/// environment. When `allow_list` is present and non-empty, keys outside it
/// are dropped silently; an empty or absent allow-list passes the raw
/// mapping through unfiltered.
pub fn shape(
    declaration: Option<&Parargs>,
    env: &mut Environment,
    allow_list: Option<&[&str]>,
) -> Result<Parameters, EvalError> {
    let Some(parargs) = declaration else {
        return Ok(Parameters::new());
    };

    let parameters = parargs.eval(env)?;

    match allow_list {
        Some(allow) if !allow.is_empty() => Ok(parameters
            .into_iter()
            .filter(|(key, _)| allow.contains(&key.as_str()))
            .collect()),
        _ => Ok(parameters),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absent_declaration_yields_empty_mapping() {
        let mut env = Environment::new("exec:demo:1");
        let shaped = shape(None, &mut env, Some(&["a"])).unwrap();

        assert!(shaped.is_empty());
        assert_eq!(env.stack_depth(), 0);
    }

    #[test]
    fn test_allow_list_drops_extraneous_keys_silently() {
        let mut env = Environment::new("exec:demo:1");
        let parargs = Parargs::literal(json!({"a": 1, "b": 2}));

        let shaped = shape(Some(&parargs), &mut env, Some(&["a"])).unwrap();

        assert_eq!(shaped.len(), 1);
        assert_eq!(shaped["a"], json!(1));
    }

    #[test]
    fn test_empty_allow_list_passes_through_unfiltered() {
        let mut env = Environment::new("exec:demo:1");
        let parargs = Parargs::literal(json!({"a": 1, "b": 2}));

        let shaped = shape(Some(&parargs), &mut env, Some(&[])).unwrap();
        assert_eq!(shaped.len(), 2);

        let shaped = shape(Some(&parargs), &mut env, None).unwrap();
        assert_eq!(shaped.len(), 2);
    }

    #[test]
    fn test_surviving_keys_keep_raw_order() {
        let mut env = Environment::new("exec:demo:1");
        let parargs = Parargs::literal(json!({"c": 3, "a": 1, "b": 2}));

        let shaped = shape(Some(&parargs), &mut env, Some(&["a", "b", "c"])).unwrap();
        let keys: Vec<_> = shaped.keys().cloned().collect();
        assert_eq!(keys, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_shaping_is_idempotent() {
        let mut env = Environment::new("exec:demo:1");
        let parargs = Parargs::literal(json!({"x": 1, "y": {"nested": true}}));

        let first = shape(Some(&parargs), &mut env, Some(&["x", "y"])).unwrap();
        let second = shape(Some(&parargs), &mut env, Some(&["x", "y"])).unwrap();

        assert_eq!(first, second);
        let first_keys: Vec<_> = first.keys().collect();
        let second_keys: Vec<_> = second.keys().collect();
        assert_eq!(first_keys, second_keys);
    }

    #[test]
    fn test_non_object_template_is_a_definition_defect() {
        let mut env = Environment::new("exec:demo:1");
        let parargs = Parargs::literal(json!([1, 2, 3]));

        let err = shape(Some(&parargs), &mut env, None).unwrap_err();
        assert!(matches!(err, EvalError::UnexpectedType { .. }));
    }

    #[test]
    fn test_evaluation_errors_propagate_unchanged() {
        let mut env = Environment::new("exec:demo:1");
        let parargs = Parargs::new(|_env: &mut Environment| -> Result<(), EvalError> {
            Err(EvalError::Expression("unknown path $.missing".to_string()))
        });

        let err = shape(Some(&parargs), &mut env, None).unwrap_err();
        assert!(matches!(err, EvalError::Expression(_)));
    }

    #[test]
    fn test_stack_left_empty_after_shaping() {
        let mut env = Environment::new("exec:demo:1");
        let parargs = Parargs::literal(json!({"a": 1}));

        shape(Some(&parargs), &mut env, None).unwrap();
        assert_eq!(env.stack_depth(), 0);
    }
}
