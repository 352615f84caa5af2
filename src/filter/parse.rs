//! WHERE tree parsing with eager whole-tree validation.
//!
//! Every operator key and operand shape in the tree is checked before any
//! row is evaluated; a malformed filter never reaches the scan. Unrecognized
//! keys are explicit errors, never silently ignored.

use serde_json::{Map, Value};

use super::ast::{CompiledPattern, Condition, Expr, Operator};
use super::pattern;
use crate::core::{QueryError, Result};

/// Parse a client-supplied WHERE string into a validated expression.
pub fn parse_expression(text: &str) -> Result<Expr> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| QueryError::InvalidWhereFormat(e.to_string()))?;
    match value {
        Value::Object(map) => parse_object(&map),
        other => Err(QueryError::InvalidWhereFormat(format!(
            "filter must be a JSON object, got {}",
            crate::core::type_name(&other)
        ))),
    }
}

/// One level of the tree: field conditions and combinators joined by
/// implicit AND.
fn parse_object(map: &Map<String, Value>) -> Result<Expr> {
    let mut clauses = Vec::with_capacity(map.len());
    for (key, operand) in map {
        match key.as_str() {
            "$and" | "$or" => clauses.push(parse_combinator(key, operand)?),
            k if k.starts_with('$') => {
                return Err(QueryError::UnsupportedOperator(key.clone()));
            }
            _ => parse_field(key, operand, &mut clauses)?,
        }
    }
    if clauses.len() == 1 {
        Ok(clauses.pop().unwrap())
    } else {
        // Covers the empty filter `{}` as well: AND of nothing matches all.
        Ok(Expr::And(clauses))
    }
}

fn parse_combinator(name: &str, operand: &Value) -> Result<Expr> {
    let items = match operand {
        Value::Array(items) if !items.is_empty() => items,
        _ => {
            return Err(QueryError::InvalidOperandType {
                operator: name.to_string(),
                expected: "non-empty array",
            });
        }
    };
    let clauses = items
        .iter()
        .map(|item| match item {
            Value::Object(map) => parse_object(map),
            _ => Err(QueryError::InvalidWhereFormat(format!(
                "'{name}' clauses must be objects"
            ))),
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(match name {
        "$and" => Expr::And(clauses),
        _ => Expr::Or(clauses),
    })
}

/// A field maps either to an operator object (`{"$gte": 10, "$lte": 20}`,
/// each entry its own condition) or to a literal equality value. An object
/// operand counts as an operator object as soon as any key starts with `$`,
/// and then every key must be a recognized operator.
fn parse_field(field: &str, operand: &Value, out: &mut Vec<Expr>) -> Result<()> {
    match operand {
        Value::Object(map) if map.keys().any(|k| k.starts_with('$')) => {
            for (op_key, op_operand) in map {
                out.push(Expr::Condition(Condition {
                    field: field.to_string(),
                    op: parse_operator(op_key, op_operand)?,
                }));
            }
            Ok(())
        }
        literal => {
            out.push(Expr::Condition(Condition {
                field: field.to_string(),
                op: Operator::Eq(literal.clone()),
            }));
            Ok(())
        }
    }
}

fn parse_operator(name: &str, operand: &Value) -> Result<Operator> {
    match name {
        "$ne" => Ok(Operator::Ne(operand.clone())),
        "$gt" => Ok(Operator::Gt(number_operand(name, operand)?)),
        "$gte" => Ok(Operator::Gte(number_operand(name, operand)?)),
        "$lt" => Ok(Operator::Lt(number_operand(name, operand)?)),
        "$lte" => Ok(Operator::Lte(number_operand(name, operand)?)),
        "$in" => Ok(Operator::In(array_operand(name, operand)?)),
        "$nin" => Ok(Operator::Nin(array_operand(name, operand)?)),
        "$exists" => match operand {
            Value::Bool(b) => Ok(Operator::Exists(*b)),
            _ => Err(QueryError::InvalidOperandType {
                operator: name.to_string(),
                expected: "boolean",
            }),
        },
        "$regex" => {
            let source = string_operand(name, operand)?;
            let regex = pattern::get_or_compile(&source)?;
            Ok(Operator::Regex(CompiledPattern { source, regex }))
        }
        "$text" => Ok(Operator::Text(string_operand(name, operand)?)),
        other => Err(QueryError::UnsupportedOperator(other.to_string())),
    }
}

fn number_operand(operator: &str, operand: &Value) -> Result<f64> {
    operand
        .as_f64()
        .ok_or_else(|| QueryError::InvalidOperandType {
            operator: operator.to_string(),
            expected: "number",
        })
}

fn array_operand(operator: &str, operand: &Value) -> Result<Vec<Value>> {
    match operand {
        Value::Array(items) => Ok(items.clone()),
        _ => Err(QueryError::InvalidOperandType {
            operator: operator.to_string(),
            expected: "array",
        }),
    }
}

fn string_operand(operator: &str, operand: &Value) -> Result<String> {
    match operand {
        Value::String(s) => Ok(s.clone()),
        _ => Err(QueryError::InvalidOperandType {
            operator: operator.to_string(),
            expected: "string",
        }),
    }
}
