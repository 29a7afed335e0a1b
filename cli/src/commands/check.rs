//! Check command - validates configuration and model metadata

use crate::config::Config;
use crate::error::CliError;
use crate::output;

pub fn run(config: &Config) -> Result<(), CliError> {
    println!("{}", output::heading("Checking configuration..."));
    println!();

    let strictness = if config.strict { "strict" } else { "lenient" };
    println!("  {}: {}", output::label("Strictness"), strictness);
    println!("  {}: {}", output::label("Models"), config.models_display());
    if !config.inline.is_empty() {
        println!("  {}: {}", output::label("Inline"), config.inline.len());
    }

    // Model files
    println!();
    print!("  {} Model files... ", output::label("Checking"));
    match config.model_files() {
        Ok(files) => {
            println!("{}", output::status_ok());
            for f in &files {
                println!("    {}", f.display());
            }
            if files.is_empty() {
                println!("    {}", output::warning("none (inline models only)"));
            }
        }
        Err(e) => {
            println!("{}", output::status_error());
            println!("    {e}");
            return Err(e.into());
        }
    }

    // Registry
    println!();
    print!("  {} Model metadata... ", output::label("Checking"));
    match config.registry() {
        Ok(registry) => {
            println!("{}", output::status_ok());
            for model in registry.models() {
                println!(
                    "    {} {}",
                    model.name,
                    output::muted(&format!(
                        "({} properties, {} relations)",
                        model.properties.len(),
                        model.relations.len()
                    ))
                );
            }
        }
        Err(e) => {
            println!("{}", output::status_error());
            println!("    {e}");
            return Err(e.into());
        }
    }

    println!();
    println!("{}", output::status_ok());
    Ok(())
}
