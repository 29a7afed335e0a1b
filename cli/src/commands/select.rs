//! Select command - prints the SELECT a filter compiles to

use relsql_core::CompileOptions;
use relsql_mysql::Compiler;

use crate::config::Config;
use crate::error::CliError;

pub fn run(
    config: &Config,
    options: CompileOptions,
    model: &str,
    filter: Option<&str>,
    json: bool,
) -> Result<(), CliError> {
    let registry = config.registry()?;
    let filter = super::parse_filter(filter)?;
    let statement = Compiler::with_options(&registry, options).build_select(model, &filter)?;
    super::emit(&statement, json)
}
