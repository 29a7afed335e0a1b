//! Comparison predicates for a single column

use relsql_core::{Operator, PropertyType, SQL};
use serde_json::Value;

use crate::{MySqlSQL, MySqlValue};

/// `column = ?`, or `column IS NULL` for a null value.
///
/// # Example
/// ```
/// # use relsql_mysql::{conditions::eq, MySqlValue};
/// assert_eq!(eq("t0.`status`", MySqlValue::from("open")).sql(), "t0.`status` = ?");
/// assert_eq!(eq("t0.`status`", MySqlValue::Null).sql(), "t0.`status` IS NULL");
/// ```
pub fn eq(column: &str, value: MySqlValue) -> MySqlSQL {
    if value.is_null() {
        return SQL::raw(format!("{column} IS NULL"));
    }
    compare(column, "=", value)
}

/// `column != ?`, or `column IS NOT NULL` for a null value.
pub fn neq(column: &str, value: MySqlValue) -> MySqlSQL {
    if value.is_null() {
        return SQL::raw(format!("{column} IS NOT NULL"));
    }
    compare(column, "!=", value)
}

fn compare(column: &str, op: &str, value: MySqlValue) -> MySqlSQL {
    SQL::raw(format!("{column} {op} ")).append(SQL::<MySqlValue>::parameter(value))
}

/// `column IN (?, ...)`. An empty list matches nothing and binds nothing.
pub fn in_list(column: &str, values: Vec<MySqlValue>) -> MySqlSQL {
    if values.is_empty() {
        return SQL::raw(format!("{column} IN (NULL)"));
    }
    SQL::raw(format!("{column} IN ("))
        .append(SQL::<MySqlValue>::parameters(values))
        .append_raw(")")
}

/// `column NOT IN (?, ...)`. An empty list matches everything.
pub fn not_in_list(column: &str, values: Vec<MySqlValue>) -> MySqlSQL {
    if values.is_empty() {
        return SQL::raw("1 = 1");
    }
    SQL::raw(format!("{column} NOT IN ("))
        .append(SQL::<MySqlValue>::parameters(values))
        .append_raw(")")
}

/// `column BETWEEN ? AND ?`
pub fn between(column: &str, low: MySqlValue, high: MySqlValue) -> MySqlSQL {
    SQL::raw(format!("{column} BETWEEN "))
        .append(SQL::<MySqlValue>::parameter(low))
        .append_raw(" AND ")
        .append(SQL::<MySqlValue>::parameter(high))
}

/// `column REGEXP ?`; case-sensitive matching uses `REGEXP BINARY ?`.
pub fn regexp(column: &str, pattern: String, ignore_case: bool) -> MySqlSQL {
    let op = if ignore_case { "REGEXP" } else { "REGEXP BINARY" };
    compare(column, op, MySqlValue::Text(pattern))
}

/// Compiles `{ op: value }` against a column of type `kind`.
pub fn predicate(
    column: &str,
    op: Operator,
    value: &Value,
    options: Option<&Value>,
    kind: PropertyType,
) -> MySqlSQL {
    let coerce = |v: &Value| MySqlValue::coerce(v, kind);

    match op {
        Operator::Eq => eq(column, coerce(value)),
        Operator::Neq => neq(column, coerce(value)),
        Operator::Gt => compare(column, ">", coerce(value)),
        Operator::Gte => compare(column, ">=", coerce(value)),
        Operator::Lt => compare(column, "<", coerce(value)),
        Operator::Lte => compare(column, "<=", coerce(value)),
        Operator::Inq => in_list(column, list(value).map(coerce).collect()),
        Operator::Nin => not_in_list(column, list(value).map(coerce).collect()),
        Operator::Between => {
            let mut bounds = list(value).map(coerce);
            let low = bounds.next().unwrap_or_default();
            let high = bounds.next().unwrap_or_default();
            between(column, low, high)
        }
        // MySQL collations are case-insensitive already.
        Operator::Like | Operator::Ilike => compare(column, "LIKE", pattern(value)),
        Operator::Nlike | Operator::Nilike => compare(column, "NOT LIKE", pattern(value)),
        Operator::Regexp => {
            let text = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            let (source, mut flags) = split_regexp(&text);
            if let Some(Value::String(extra)) = options {
                flags.push_str(extra);
            }
            if flags.contains(['g', 'm']) {
                relsql_core::relsql_trace_skip!(column, flags, "regexp flags g/m are ignored");
            }
            regexp(column, source.to_owned(), flags.contains('i'))
        }
    }
}

/// A list operand; a scalar is a one-element list.
fn list(value: &Value) -> impl Iterator<Item = &Value> {
    match value {
        Value::Array(items) => items.iter(),
        other => std::slice::from_ref(other).iter(),
    }
}

fn pattern(value: &Value) -> MySqlValue {
    MySqlValue::coerce(value, PropertyType::String)
}

/// Splits `/source/flags` into its parts. Anything else is a bare source.
fn split_regexp(text: &str) -> (&str, String) {
    if let Some(body) = text.strip_prefix('/')
        && let Some(end) = body.rfind('/')
    {
        let flags = &body[end + 1..];
        if flags.chars().all(|c| "dgimsuy".contains(c)) {
            return (&body[..end], flags.to_owned());
        }
    }
    (text, String::new())
}
