//! Dialect-neutral building blocks for relsql: parameterized SQL fragments,
//! the filter AST and model metadata.

pub mod error;
pub mod filter;
pub mod model;
pub mod options;
pub mod sql;
pub mod tracing;
pub mod traits;

// Re-export key types and traits
pub use error::{RelsqlError, Result};
pub use filter::{Direction, Fields, Filter, Operator, OrderSpec, OrderTerm, Where};
pub use model::{
    JoinShape, ModelDefinition, ModelRegistry, Property, PropertyType, Relation, RelationType,
};
pub use options::{CompileOptions, Strictness};
pub use sql::{PLACEHOLDER, SQL, SQLChunk};
pub use traits::*;
