//! Core traits for SQL generation.

use crate::sql::SQL;

/// A marker trait for types that can be used as SQL parameters.
///
/// This trait is used as a bound on the parameter type in SQL fragments.
pub trait SQLParam: Clone + core::fmt::Debug {}

/// Trait for types that can be converted to SQL fragments.
pub trait ToSQL<V: SQLParam> {
    fn to_sql(&self) -> SQL<V>;

    /// Consume self and return SQL without cloning.
    /// Default delegates to `to_sql()`; types that own their SQL override it.
    fn into_sql(self) -> SQL<V>
    where
        Self: Sized,
    {
        self.to_sql()
    }
}

impl<V: SQLParam, T: ToSQL<V>> ToSQL<V> for &T {
    fn to_sql(&self) -> SQL<V> {
        (**self).to_sql()
    }
}
