//! Count command - prints the COUNT a `where` compiles to

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
    let filter = super::parse_where(filter)?;
    let statement = Compiler::with_options(&registry, options).build_count(model, &filter)?;
    super::emit(&statement, json)
}
