//! Query command - runs a filter against a SQLite database

use std::path::Path;

use relsql_core::{CompileOptions, RelsqlError};
use relsql_mysql::{Compiler, Connector};
use rusqlite::{Connection, OpenFlags};

use crate::config::Config;
use crate::error::CliError;
use crate::output;

pub fn run(
    config: &Config,
    options: CompileOptions,
    model: &str,
    database: &Path,
    filter: Option<&str>,
    with_total: bool,
) -> Result<(), CliError> {
    let registry = config.registry()?;
    let filter = super::parse_filter(filter)?;

    let connection = Connection::open_with_flags(database, OpenFlags::SQLITE_OPEN_READ_ONLY)
        .map_err(RelsqlError::from)?;
    let connector = Connector::new(Compiler::with_options(&registry, options), connection);

    if with_total {
        output::print_json(&connector.find_page(model, &filter)?)
    } else {
        output::print_json(&connector.find(model, &filter)?)
    }
}
