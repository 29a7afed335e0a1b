//! CLI output helpers for consistent formatting.

use colored::Colorize;
use relsql_mysql::MySqlValue;
use serde::Serialize;

use crate::error::CliError;

pub fn heading(text: &str) -> String {
    format!("{}", text.bright_cyan())
}

pub fn label(text: &str) -> String {
    format!("{}", text.bright_blue())
}

pub fn muted(text: &str) -> String {
    format!("{}", text.bright_black())
}

pub fn warning(text: &str) -> String {
    format!("{}", text.yellow())
}

pub fn status_ok() -> String {
    format!("{}", "OK".green())
}

pub fn status_error() -> String {
    format!("{}", "ERROR".red())
}

/// Pretty JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(value).map_err(|e| CliError::Other(e.to_string()))?;
    println!("{json}");
    Ok(())
}

/// A compiled statement: SQL on one line, then its parameters.
pub fn print_statement(sql: &str, params: &[MySqlValue]) {
    println!("{sql}");
    if !params.is_empty() {
        let list: Vec<String> = params.iter().map(ToString::to_string).collect();
        println!("{} [{}]", muted("--"), list.join(", "));
    }
}

#[derive(Serialize)]
pub struct Statement<'a> {
    pub sql: &'a str,
    pub params: &'a [MySqlValue],
}
