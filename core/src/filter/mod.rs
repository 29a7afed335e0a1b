//! The JSON filter accepted by the compiler.
//!
//! ```json
//! {
//!   "where": { "status": "open", "project": { "name": "Internal" } },
//!   "order": ["project.name ASC", "date DESC"],
//!   "fields": ["id", "title"],
//!   "limit": 20,
//!   "skip": 40
//! }
//! ```

mod fields;
mod order;
mod where_clause;

pub use fields::*;
pub use order::*;
pub use where_clause::*;

use serde::Deserialize;

use crate::error::Result;

/// A complete query filter.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct Filter {
    pub r#where: Where,
    pub order: Option<OrderSpec>,
    pub fields: Option<Fields>,
    pub limit: Option<u64>,
    pub skip: Option<u64>,
    pub offset: Option<u64>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a filter from JSON text. An empty document is an empty filter.
    pub fn from_json_str(json: &str) -> Result<Self> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_where(mut self, filter: Where) -> Self {
        self.r#where = filter;
        self
    }

    pub fn order<'s>(mut self, terms: impl IntoIterator<Item = &'s str>) -> Self {
        self.order = Some(OrderSpec::parse(terms));
        self
    }

    pub fn fields(mut self, fields: Fields) -> Self {
        self.fields = Some(fields);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn skip(mut self, skip: u64) -> Self {
        self.skip = Some(skip);
        self
    }

    /// Rows to skip; `offset` wins over `skip`.
    pub fn offset(&self) -> Option<u64> {
        self.offset.or(self.skip)
    }

    /// Same filter without pagination, for total counts.
    pub fn without_pagination(&self) -> Self {
        Self {
            limit: None,
            skip: None,
            offset: None,
            ..self.clone()
        }
    }
}
