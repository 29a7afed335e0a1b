//! Driver implementations.
//!
//! SQLite understands the backtick-quoted, `?`-parameterized statements the
//! compiler emits, which makes rusqlite a convenient local backend.

use relsql_core::Result;
use rusqlite::types::{ToSqlOutput, Value as SqliteValue, ValueRef};
use serde_json::Value;

use crate::MySqlValue;
use crate::connector::{Executor, Row};

impl rusqlite::ToSql for MySqlValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            MySqlValue::Null => ToSqlOutput::Owned(SqliteValue::Null),
            MySqlValue::Integer(i) => ToSqlOutput::Owned(SqliteValue::Integer(*i)),
            MySqlValue::Real(r) => ToSqlOutput::Owned(SqliteValue::Real(*r)),
            MySqlValue::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
        })
    }
}

impl Executor for rusqlite::Connection {
    fn query(&self, sql: &str, params: &[MySqlValue]) -> Result<Vec<Row>> {
        let mut statement = self.prepare(sql)?;
        let names: Vec<String> = statement
            .column_names()
            .into_iter()
            .map(str::to_owned)
            .collect();

        let mut rows = statement.query(rusqlite::params_from_iter(params))?;
        let mut result = Vec::new();
        while let Some(row) = rows.next()? {
            let mut mapped = Row::new();
            for (index, name) in names.iter().enumerate() {
                mapped.insert(name.clone(), to_json(row.get_ref(index)?));
            }
            result.push(mapped);
        }
        Ok(result)
    }
}

fn to_json(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(r) => serde_json::Number::from_f64(r).map_or(Value::Null, Value::Number),
        ValueRef::Text(text) => Value::String(String::from_utf8_lossy(text).into_owned()),
        ValueRef::Blob(bytes) => Value::from(bytes.to_vec()),
    }
}
