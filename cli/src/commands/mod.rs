//! CLI command implementations
//!
//! Each command module implements a specific relsql CLI command.

pub mod check;
pub mod count;
pub mod models;
#[cfg(feature = "rusqlite")]
pub mod query;
pub mod select;

use std::path::Path;

use relsql_core::{Filter, Where};
use relsql_mysql::MySqlSQL;

use crate::error::CliError;
use crate::output;

/// Reads a JSON argument given inline or as `@path`.
fn read_arg(raw: Option<&str>) -> Result<Option<String>, CliError> {
    match raw {
        None => Ok(None),
        Some(arg) => match arg.strip_prefix('@') {
            Some(path) => std::fs::read_to_string(Path::new(path))
                .map(Some)
                .map_err(|e| CliError::IoError(format!("{path}: {e}"))),
            None => Ok(Some(arg.to_owned())),
        },
    }
}

/// `--filter`: a full filter object. Missing or blank means no filter.
pub fn parse_filter(raw: Option<&str>) -> Result<Filter, CliError> {
    match read_arg(raw)? {
        Some(text) if !text.trim().is_empty() => serde_json::from_str(&text)
            .map_err(|source| CliError::InvalidJson { what: "filter", source }),
        _ => Ok(Filter::default()),
    }
}

/// `--where`: just the `where` object.
pub fn parse_where(raw: Option<&str>) -> Result<Where, CliError> {
    match read_arg(raw)? {
        Some(text) if !text.trim().is_empty() => {
            let value: serde_json::Value = serde_json::from_str(&text)
                .map_err(|source| CliError::InvalidJson { what: "where", source })?;
            Ok(Where::from_json(&value))
        }
        _ => Ok(Where::default()),
    }
}

fn emit(statement: &MySqlSQL, json: bool) -> Result<(), CliError> {
    let sql = statement.sql();
    let params: Vec<_> = statement.params().into_iter().cloned().collect();
    if json {
        output::print_json(&output::Statement {
            sql: &sql,
            params: &params,
        })
    } else {
        output::print_statement(&sql, &params);
        Ok(())
    }
}
