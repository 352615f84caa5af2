//! Row evaluation of a parsed filter expression.
//!
//! Evaluation never fails and never mutates the row: a type mismatch between
//! an operator and a row value resolves to "condition not satisfied" for that
//! row, so heterogeneous row sets still produce partial results.

use super::ast::{Condition, Expr, Operator};
use super::pattern::contains_ci;
use crate::core::{Row, numeric_of, text_of};
use crate::json::deep_equals;

/// Evaluate `expr` against one row. Combinators short-circuit.
pub fn evaluate(expr: &Expr, row: &Row) -> bool {
    match expr {
        Expr::And(clauses) => clauses.iter().all(|clause| evaluate(clause, row)),
        Expr::Or(clauses) => clauses.iter().any(|clause| evaluate(clause, row)),
        Expr::Condition(condition) => eval_condition(condition, row),
    }
}

fn eval_condition(condition: &Condition, row: &Row) -> bool {
    let value = row.get(&condition.field);
    match &condition.op {
        Operator::Eq(operand) => value.is_some_and(|v| deep_equals(v, operand)),
        // A missing field is not equal to anything, including null.
        Operator::Ne(operand) => !value.is_some_and(|v| deep_equals(v, operand)),
        Operator::Gt(bound) => numeric_field(value).is_some_and(|n| n > *bound),
        Operator::Gte(bound) => numeric_field(value).is_some_and(|n| n >= *bound),
        Operator::Lt(bound) => numeric_field(value).is_some_and(|n| n < *bound),
        Operator::Lte(bound) => numeric_field(value).is_some_and(|n| n <= *bound),
        Operator::In(candidates) => {
            value.is_some_and(|v| candidates.iter().any(|c| deep_equals(v, c)))
        }
        Operator::Nin(candidates) => {
            !value.is_some_and(|v| candidates.iter().any(|c| deep_equals(v, c)))
        }
        // Present counts even when the stored value is null or empty.
        Operator::Exists(wanted) => value.is_some() == *wanted,
        Operator::Regex(pattern) => value
            .and_then(|v| v.as_str())
            .is_some_and(|s| pattern.regex.is_match(s)),
        Operator::Text(needle) => value
            .and_then(text_of)
            .is_some_and(|s| contains_ci(&s, needle)),
    }
}

fn numeric_field(value: Option<&serde_json::Value>) -> Option<f64> {
    value.and_then(numeric_of)
}
