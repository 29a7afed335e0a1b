//! Running compiled statements and mapping their rows back to models.

use hashbrown::HashSet;
use relsql_core::{Filter, Property, PropertyType, RelsqlError, Result, Where};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::{Compiler, MySqlSQL, MySqlValue, columns};

/// A result row, keyed by column (or, after mapping, property) name.
pub type Row = Map<String, Value>;

/// Something that can run a parameterized statement.
pub trait Executor {
    fn query(&self, sql: &str, params: &[MySqlValue]) -> Result<Vec<Row>>;
}

impl<E: Executor + ?Sized> Executor for &E {
    fn query(&self, sql: &str, params: &[MySqlValue]) -> Result<Vec<Row>> {
        (**self).query(sql, params)
    }
}

/// One page of results and the number of rows matching without pagination.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub rows: Vec<Row>,
    pub total: u64,
}

/// A compiler paired with an executor.
#[derive(Debug)]
pub struct Connector<'r, E> {
    compiler: Compiler<'r>,
    executor: E,
}

impl<'r, E: Executor> Connector<'r, E> {
    pub fn new(compiler: Compiler<'r>, executor: E) -> Self {
        Self { compiler, executor }
    }

    pub fn compiler(&self) -> Compiler<'r> {
        self.compiler
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Runs a compiled statement as is.
    pub fn execute(&self, statement: MySqlSQL) -> Result<Vec<Row>> {
        let (sql, params) = statement.into_parts();
        self.executor.query(&sql, &params)
    }

    /// Rows of `model` matching `filter`, keyed by property name.
    ///
    /// Ordering by a hasMany relation repeats a parent once per related row;
    /// only the first row per primary key is kept. `limit` applies to the
    /// joined rows, so such a page can hold fewer than `limit` rows.
    pub fn find(&self, model: &str, filter: &Filter) -> Result<Vec<Row>> {
        let statement = self.compiler.build_select(model, filter)?;
        let definition = self.compiler.registry().model(model)?;
        let selected = columns::select_properties(definition, filter.fields.as_ref());

        first_per_key(&definition.id_properties(), self.execute(statement)?)
            .into_iter()
            .map(|row| map_row(&selected, row))
            .collect()
    }

    /// Number of distinct `model` rows matching `filter`.
    pub fn count(&self, model: &str, filter: &Where) -> Result<u64> {
        let statement = self.compiler.build_count(model, filter)?;
        let rows = self.execute(statement)?;
        count_value(rows.first().and_then(|row| row.get("cnt")))
    }

    /// `find` plus the total the same `where` matches across all pages.
    pub fn find_page(&self, model: &str, filter: &Filter) -> Result<Page> {
        let rows = self.find(model, filter)?;
        let total = self.count(model, &filter.r#where)?;
        Ok(Page { rows, total })
    }
}

/// Drops rows whose primary key was already seen. Rows without their key
/// columns are kept.
fn first_per_key(keys: &[&Property], rows: Vec<Row>) -> Vec<Row> {
    if keys.is_empty() {
        return rows;
    }
    let mut seen = HashSet::with_capacity(rows.len());
    rows.into_iter()
        .filter(|row| {
            let key: Option<Vec<Value>> = keys
                .iter()
                .map(|key| row.get(key.column_name()).cloned())
                .collect();
            key.is_none_or(|key| seen.insert(Value::Array(key).to_string()))
        })
        .collect()
}

/// Renames columns to properties and drops helper columns.
fn map_row(selected: &[&Property], mut row: Row) -> Result<Row> {
    let mut mapped = Row::new();
    for property in selected {
        let column = property.column_name();
        let value = row.remove(column).ok_or_else(|| {
            RelsqlError::Mapping(format!("column {column} is missing from the result"))
        })?;
        mapped.insert(property.name.clone(), restore(value, property.kind));
    }
    Ok(mapped)
}

/// Booleans come back from MySQL as `TINYINT(1)`.
fn restore(value: Value, kind: PropertyType) -> Value {
    match (kind, &value) {
        (PropertyType::Boolean, Value::Number(n)) => Value::Bool(n.as_f64().is_some_and(|n| n != 0.0)),
        _ => value,
    }
}

/// Drivers return counts as integers, floats or, for BIGINT, strings.
fn count_value(value: Option<&Value>) -> Result<u64> {
    match value {
        None | Some(Value::Null) => Ok(0),
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .ok_or_else(|| RelsqlError::Mapping(format!("invalid count {n}"))),
        Some(Value::String(s)) => s
            .trim()
            .parse()
            .map_err(|_| RelsqlError::Mapping(format!("invalid count {s:?}"))),
        Some(other) => Err(RelsqlError::Mapping(format!("invalid count {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn counts_from_any_driver() {
        assert_eq!(count_value(Some(&json!(3))).unwrap(), 3);
        assert_eq!(count_value(Some(&json!(3.0))).unwrap(), 3);
        assert_eq!(count_value(Some(&json!("12"))).unwrap(), 12);
        assert_eq!(count_value(None).unwrap(), 0);
        assert!(count_value(Some(&json!("many"))).is_err());
    }

    #[test]
    fn repeated_keys_keep_the_first_row() {
        let id = Property::new("id", PropertyType::Number).id();
        let rows: Vec<Row> = serde_json::from_value(json!([
            {"id": 2, "t1_orderBydate": "2024-02"},
            {"id": 1, "t1_orderBydate": "2024-01"},
            {"id": 2, "t1_orderBydate": "2023-12"},
            {"t1_orderBydate": null},
            {"t1_orderBydate": null},
        ]))
        .unwrap();

        let rows = first_per_key(&[&id], rows);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0]["t1_orderBydate"], json!("2024-02"));
        assert_eq!(rows[1]["id"], json!(1));
    }

    #[test]
    fn rows_are_mapped_to_properties() {
        let done = Property::new("done", PropertyType::Boolean).column("is_done");
        let title = Property::new("title", PropertyType::String);
        let row: Row = serde_json::from_value(json!({
            "id": 1,
            "is_done": 1,
            "title": "Invoice",
            "t1_orderByname": "Acme"
        }))
        .unwrap();

        let mapped = map_row(&[&title, &done], row).unwrap();
        assert_eq!(Value::Object(mapped), json!({"title": "Invoice", "done": true}));
    }

    #[test]
    fn missing_columns_are_reported() {
        let title = Property::new("title", PropertyType::String);
        let err = map_row(&[&title], Row::new()).unwrap_err();
        assert!(matches!(err, RelsqlError::Mapping(_)));
    }
}
