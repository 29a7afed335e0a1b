//! relsql CLI - compile LoopBack-style filters into MySQL from the command line
//!
//! Models come from a `relsql.toml` configuration file: a glob of LoopBack
//! model JSON files, inline `[[model]]` tables, or both.
//!
//! # Configuration
//!
//! ```toml
//! strict = false
//! models = "models/*.json"
//!
//! [[model]]
//! name = "Tag"
//! properties = [{ name = "id", type = "number", id = true }, { name = "label" }]
//! ```
//!
//! # Commands
//!
//! - `relsql select <MODEL> --filter JSON` - Print the SELECT for a filter
//! - `relsql count <MODEL> --where JSON` - Print the COUNT for a where clause
//! - `relsql check` - Validate configuration and model metadata
//! - `relsql models` - List models, relations and join shapes
//! - `relsql query <MODEL> --database PATH` - Run a filter against SQLite (`rusqlite` feature)
//!
//! JSON arguments may be given inline or as `@path/to/file.json`.

pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use config::{Config, Error as ConfigError};
pub use error::CliError;
