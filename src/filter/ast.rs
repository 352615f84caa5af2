use regex::Regex;
use serde_json::Value;
use std::sync::Arc;

/// A validated filter expression tree.
///
/// Only recognized operators survive parsing, so evaluation needs no
/// unknown-operator fallthrough.
#[derive(Debug, Clone)]
pub enum Expr {
    /// All clauses must hold. The implicit combination of multiple
    /// field conditions at the root parses to this.
    And(Vec<Expr>),
    /// At least one clause must hold.
    Or(Vec<Expr>),
    /// A single field condition.
    Condition(Condition),
}

#[derive(Debug, Clone)]
pub struct Condition {
    pub field: String,
    pub op: Operator,
}

/// The closed operator set, each tag carrying its already-validated operand.
#[derive(Debug, Clone)]
pub enum Operator {
    /// Bare equality: a non-operator operand value.
    Eq(Value),
    Ne(Value),
    Gt(f64),
    Gte(f64),
    Lt(f64),
    Lte(f64),
    In(Vec<Value>),
    Nin(Vec<Value>),
    Exists(bool),
    Regex(CompiledPattern),
    /// Case-insensitive substring containment.
    Text(String),
}

/// A `$regex` operand compiled at parse time.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    pub source: String,
    pub regex: Arc<Regex>,
}

impl Operator {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Eq(_) => "$eq",
            Self::Ne(_) => "$ne",
            Self::Gt(_) => "$gt",
            Self::Gte(_) => "$gte",
            Self::Lt(_) => "$lt",
            Self::Lte(_) => "$lte",
            Self::In(_) => "$in",
            Self::Nin(_) => "$nin",
            Self::Exists(_) => "$exists",
            Self::Regex(_) => "$regex",
            Self::Text(_) => "$text",
        }
    }
}
