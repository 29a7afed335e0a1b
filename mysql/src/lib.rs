//! MySQL dialect for relsql
//!
//! Compiles relsql filters into MySQL statements: `LEFT JOIN`s for every
//! relation a filter or sort key walks through, deterministic `t<n>` aliases,
//! and `?` placeholders with a positional parameter list.
//!
//! ```
//! use relsql_core::{Filter, ModelDefinition, ModelRegistry, Property, PropertyType, Relation};
//! use relsql_mysql::Compiler;
//!
//! let registry = ModelRegistry::new([
//!     ModelDefinition::new("Task")
//!         .property(Property::new("id", PropertyType::Number).id())
//!         .property(Property::new("projectId", PropertyType::Number))
//!         .relation(Relation::belongs_to("project", "Project")),
//!     ModelDefinition::new("Project")
//!         .property(Property::new("id", PropertyType::Number).id())
//!         .property(Property::new("name", PropertyType::String)),
//! ])
//! .unwrap();
//!
//! let filter = Filter::from_json_str(r#"{"where": {"project": {"name": "Internal"}}}"#).unwrap();
//! let sql = Compiler::new(&registry).build_select("Task", &filter).unwrap();
//! assert_eq!(
//!     sql.sql(),
//!     "SELECT DISTINCT t0.`id`, t0.`projectId` FROM `Task` t0 \
//!      LEFT JOIN `Project` t1 ON t0.`projectId` = t1.`id` \
//!      WHERE t1.`name` = ? ORDER BY t0.`id`"
//! );
//! ```

pub mod columns;
pub mod conditions;
pub mod connector;
pub mod context;
#[cfg(feature = "rusqlite")]
mod drivers;
pub mod escape;
pub mod order;
pub mod statement;
pub mod values;
mod where_clause;

use relsql_core::SQL;

pub use connector::{Connector, Executor, Page, Row};
pub use context::{AliasEntry, AliasMap, JoinResult, ROOT_ALIAS};
pub use order::OrderResult;
pub use statement::Compiler;
pub use values::MySqlValue;

/// SQL fragment bound with MySQL values.
pub type MySqlSQL = SQL<MySqlValue>;
