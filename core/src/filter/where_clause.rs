//! The `where` tree of a filter.
//!
//! Parsing is schema-free and lenient: anything that is not an object becomes
//! an empty [`Where`]. Whether a key names a property or a relation is decided
//! later, against the model registry.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Comparison operators accepted in `{ key: { op: value } }` expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    Inq,
    Nin,
    Between,
    Like,
    Nlike,
    Ilike,
    Nilike,
    Regexp,
}

impl Operator {
    pub const ALL: &'static [Operator] = &[
        Operator::Eq,
        Operator::Neq,
        Operator::Gt,
        Operator::Gte,
        Operator::Lt,
        Operator::Lte,
        Operator::Inq,
        Operator::Nin,
        Operator::Between,
        Operator::Like,
        Operator::Nlike,
        Operator::Ilike,
        Operator::Nilike,
        Operator::Regexp,
    ];

    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Neq => "neq",
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::Inq => "inq",
            Self::Nin => "nin",
            Self::Between => "between",
            Self::Like => "like",
            Self::Nlike => "nlike",
            Self::Ilike => "ilike",
            Self::Nilike => "nilike",
            Self::Regexp => "regexp",
        }
    }

    /// Operators whose value is a list of bind values.
    #[inline]
    pub const fn takes_list(self) -> bool {
        matches!(self, Self::Inq | Self::Nin | Self::Between)
    }
}

impl FromStr for Operator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::ALL
            .iter()
            .copied()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| format!("unknown operator '{s}'"))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The right-hand side of a `where` key.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Implicit equality (`null` means `IS NULL`).
    Value(Value),
    /// `{ op: value, options?: ... }`
    Operator {
        op: Operator,
        value: Value,
        options: Option<Value>,
    },
    /// Any other object. Only meaningful under a relation key.
    Nested(Where),
}

/// One entry of a `where` object, in input order.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    And(Vec<Where>),
    Or(Vec<Where>),
    Key { key: String, expr: Expr },
}

/// A parsed `where` object.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Where {
    pub clauses: Vec<Clause>,
}

impl Where {
    pub const fn new() -> Self {
        Self {
            clauses: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Parses a JSON `where` value. Non-objects yield an empty tree.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Object(map) => Self::from_map(map),
            Value::Null => Self::new(),
            other => {
                crate::relsql_trace_skip!("<where>", other, "where is not an object");
                let _ = other;
                Self::new()
            }
        }
    }

    fn from_map(map: &Map<String, Value>) -> Self {
        let clauses = map
            .iter()
            .map(|(key, value)| match (key.as_str(), value) {
                ("and", Value::Array(branches)) => {
                    Clause::And(branches.iter().map(Where::from_json).collect())
                }
                ("or", Value::Array(branches)) => {
                    Clause::Or(branches.iter().map(Where::from_json).collect())
                }
                _ => Clause::Key {
                    key: key.clone(),
                    expr: Expr::from_json(value),
                },
            })
            .collect();

        Self { clauses }
    }

    /// Builder helper: appends `key = value`.
    pub fn eq(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.clauses.push(Clause::Key {
            key: key.into(),
            expr: Expr::Value(value.into()),
        });
        self
    }

    /// Builder helper: appends `{ key: { op: value } }`.
    pub fn op(mut self, key: impl Into<String>, op: Operator, value: impl Into<Value>) -> Self {
        self.clauses.push(Clause::Key {
            key: key.into(),
            expr: Expr::Operator {
                op,
                value: value.into(),
                options: None,
            },
        });
        self
    }

    /// Builder helper: appends a nested filter under a relation key.
    pub fn related(mut self, relation: impl Into<String>, filter: Where) -> Self {
        self.clauses.push(Clause::Key {
            key: relation.into(),
            expr: Expr::Nested(filter),
        });
        self
    }

    pub fn and(mut self, branches: impl IntoIterator<Item = Where>) -> Self {
        self.clauses.push(Clause::And(branches.into_iter().collect()));
        self
    }

    pub fn or(mut self, branches: impl IntoIterator<Item = Where>) -> Self {
        self.clauses.push(Clause::Or(branches.into_iter().collect()));
        self
    }
}

impl Expr {
    fn from_json(value: &Value) -> Self {
        let Value::Object(map) = value else {
            return Expr::Value(value.clone());
        };

        // The first key decides, as in LoopBack: `{ inq: [...], options: ... }`.
        if let Some((first, operand)) = map.iter().next()
            && let Ok(op) = first.parse::<Operator>()
        {
            return Expr::Operator {
                op,
                value: operand.clone(),
                options: map.get("options").cloned(),
            };
        }

        Expr::Nested(Where::from_map(map))
    }
}

impl<'de> Deserialize<'de> for Where {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Where::from_json(&value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn implicit_equality_and_operators() {
        let w = Where::from_json(&json!({
            "status": "open",
            "id": {"inq": [1, 2]},
        }));
        assert_eq!(w.clauses.len(), 2);
        assert_eq!(
            w.clauses[0],
            Clause::Key {
                key: "status".into(),
                expr: Expr::Value(json!("open"))
            }
        );
        assert!(matches!(
            &w.clauses[1],
            Clause::Key { expr: Expr::Operator { op: Operator::Inq, .. }, .. }
        ));
    }

    #[test]
    fn and_or_need_arrays() {
        let w = Where::from_json(&json!({
            "and": [{"a": 1}, {"b": 2}],
            "or": "not-an-array",
        }));
        assert!(matches!(&w.clauses[0], Clause::And(branches) if branches.len() == 2));
        assert!(matches!(&w.clauses[1], Clause::Key { key, .. } if key == "or"));
    }

    #[test]
    fn nested_relation_filter() {
        let w = Where::from_json(&json!({"project": {"name": "Internal"}}));
        let Clause::Key { key, expr: Expr::Nested(inner) } = &w.clauses[0] else {
            panic!("expected nested clause, got {:?}", w.clauses[0]);
        };
        assert_eq!(key, "project");
        assert_eq!(inner.clauses.len(), 1);
    }

    #[test]
    fn operator_options_are_kept() {
        let w = Where::from_json(&json!({"name": {"like": "a%", "options": "i"}}));
        assert!(matches!(
            &w.clauses[0],
            Clause::Key { expr: Expr::Operator { op: Operator::Like, options: Some(_), .. }, .. }
        ));
    }

    #[test]
    fn non_object_where_is_empty() {
        assert!(Where::from_json(&json!([1, 2])).is_empty());
        assert!(Where::from_json(&json!("status = 1")).is_empty());
        assert!(Where::from_json(&Value::Null).is_empty());
    }

    #[test]
    fn builder_matches_parser() {
        let built = Where::new()
            .eq("status", "open")
            .or([Where::new().eq("userId", 1), Where::new().eq("userId", 2)]);
        let parsed = Where::from_json(&json!({
            "status": "open",
            "or": [{"userId": 1}, {"userId": 2}],
        }));
        assert_eq!(built, parsed);
    }
}
