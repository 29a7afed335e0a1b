//! # relsql
//!
//! Compiles LoopBack-style JSON filters into parameterized MySQL, with
//! `LEFT JOIN`s for every relation a filter or sort key walks through.
//!
//! ## Quick Start
//!
//! ```rust
//! use relsql::prelude::*;
//!
//! # fn main() -> relsql::Result<()> {
//! let registry = ModelRegistry::new([
//!     ModelDefinition::new("Task")
//!         .property(Property::new("id", PropertyType::Number).id())
//!         .property(Property::new("status", PropertyType::String))
//!         .property(Property::new("projectId", PropertyType::Number))
//!         .relation(Relation::belongs_to("project", "Project")),
//!     ModelDefinition::new("Project")
//!         .property(Property::new("id", PropertyType::Number).id())
//!         .property(Property::new("name", PropertyType::String)),
//! ])?;
//!
//! let filter = Filter::from_json_str(
//!     r#"{"where": {"status": "open"}, "order": "project.name DESC", "limit": 10}"#,
//! )?;
//! let (sql, params) = Compiler::new(&registry).build_select("Task", &filter)?.into_parts();
//!
//! assert_eq!(
//!     sql,
//!     "SELECT DISTINCT t0.`id`, t0.`status`, t0.`projectId`, t1.`name` AS `t1_orderByname` \
//!      FROM `Task` t0 LEFT JOIN `Project` t1 ON t0.`projectId` = t1.`id` \
//!      WHERE t0.`status` = ? ORDER BY t1.`name` DESC LIMIT 10"
//! );
//! assert_eq!(params, vec![MySqlValue::from("open")]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! | Feature    | Enables                                              |
//! |------------|------------------------------------------------------|
//! | `tracing`  | debug/warn/trace events for statements, skips, aliases |
//! | `rusqlite` | `Executor` for `rusqlite::Connection`                |

// =============================================================================
// Root-level exports
// =============================================================================

pub use relsql_core::error::Result;

pub mod error {
    pub use relsql_core::error::RelsqlError;
}

/// Filters, model metadata and the SQL fragment type.
pub mod core {
    pub use relsql_core::filter::{
        Clause, Direction, Expr, Fields, Filter, Operator, OrderSpec, OrderTerm, Where,
    };
    pub use relsql_core::model::{
        JoinShape, ModelDefinition, ModelRegistry, Property, PropertyType, Relation, RelationType,
    };
    pub use relsql_core::options::{CompileOptions, Strictness};
    pub use relsql_core::traits::*;
    pub use relsql_core::{PLACEHOLDER, SQL, SQLChunk};
}

/// The MySQL compiler and connector.
pub mod mysql {
    pub use relsql_mysql::*;
}

pub mod prelude {
    pub use crate::core::{
        CompileOptions, Fields, Filter, ModelDefinition, ModelRegistry, OrderSpec, Property,
        PropertyType, Relation, Strictness, Where,
    };
    pub use crate::error::RelsqlError;
    pub use relsql_mysql::{Compiler, Connector, Executor, MySqlSQL, MySqlValue, Page, Row};
}
