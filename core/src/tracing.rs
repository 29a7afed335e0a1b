//! Tracing utilities for compile and execution observability.
//!
//! Enable the `tracing` feature (of the crate invoking the macros) to emit
//! events via the `tracing` crate. The macros no-op when the feature is
//! disabled, avoiding `#[cfg]` boilerplate at every call site.

/// Emit a debug-level tracing event with the SQL text and parameter count.
///
/// ```ignore
/// relsql_trace_query!(&sql_str, params.len());
/// ```
#[macro_export]
macro_rules! relsql_trace_query {
    ($sql:expr, $param_count:expr) => {
        #[cfg(feature = "tracing")]
        tracing::debug!(sql = %$sql, params = $param_count, "relsql.query");
    };
}

/// Emit a warn-level event for a filter key the compiler skipped.
///
/// ```ignore
/// relsql_trace_skip!("Task", "titel", "unknown property");
/// ```
#[macro_export]
macro_rules! relsql_trace_skip {
    ($model:expr, $key:expr, $reason:literal) => {
        #[cfg(feature = "tracing")]
        tracing::warn!(model = %$model, key = %$key, reason = $reason, "relsql.skip");
    };
}

/// Emit a trace-level event when a join alias is assigned.
#[macro_export]
macro_rules! relsql_trace_alias {
    ($path:expr, $model:expr, $alias:expr) => {
        #[cfg(feature = "tracing")]
        tracing::trace!(path = %$path, model = %$model, alias = %$alias, "relsql.alias");
    };
}
