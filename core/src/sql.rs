use compact_str::{CompactString, ToCompactString};
use smallvec::{SmallVec, smallvec};
use std::fmt::Display;

use crate::traits::{SQLParam, ToSQL};

/// Text of the positional placeholder every parameter renders as.
pub const PLACEHOLDER: &str = "?";

/// A SQL chunk represents a part of an SQL statement.
#[derive(Debug, Clone, PartialEq)]
pub enum SQLChunk<V: SQLParam> {
    /// Literal SQL text. Never contains a placeholder.
    Text(CompactString),
    /// A bound value, rendered as `?`.
    Param(V),
}

impl<V: SQLParam> SQLChunk<V> {
    /// Creates a text chunk from a static string
    pub const fn text(text: &'static str) -> Self {
        Self::Text(CompactString::const_new(text))
    }

    /// Creates a parameter chunk
    pub const fn param(value: V) -> Self {
        Self::Param(value)
    }

    fn is_empty_text(&self) -> bool {
        matches!(self, SQLChunk::Text(t) if t.is_empty())
    }

    fn write_to_buffer(&self, buf: &mut CompactString) {
        match self {
            SQLChunk::Text(text) => buf.push_str(text),
            SQLChunk::Param(_) => buf.push_str(PLACEHOLDER),
        }
    }
}

/// A SQL statement or fragment with parameters.
///
/// Pairs SQL text with the ordered list of values bound to its `?`
/// placeholders. Fragments compose with [`SQL::append`] and [`SQL::join`];
/// every composition keeps one parameter per placeholder.
#[derive(Debug, Clone, PartialEq)]
pub struct SQL<V: SQLParam> {
    /// The chunks that make up this SQL statement or fragment.
    pub chunks: SmallVec<[SQLChunk<V>; 3]>,
}

impl<V: SQLParam> SQL<V> {
    /// Creates a new empty SQL fragment.
    pub const fn empty() -> Self {
        SQL {
            chunks: SmallVec::new_const(),
        }
    }

    /// Creates a new SQL fragment from a raw string.
    ///
    /// The string is treated as literal SQL text, not a parameter.
    pub fn raw<T: AsRef<str>>(sql: T) -> Self {
        Self {
            chunks: smallvec![SQLChunk::Text(sql.as_ref().to_compact_string())],
        }
    }

    /// Creates a new SQL fragment representing a single parameter.
    pub fn parameter(value: impl Into<V>) -> Self {
        Self {
            chunks: smallvec![SQLChunk::Param(value.into())],
        }
    }

    /// Creates a comma-separated list of parameter placeholders: "?, ?, ?"
    pub fn parameters<I>(values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<V>,
    {
        let values = values.into_iter();
        let (lower, _) = values.size_hint();
        let mut chunks = SmallVec::with_capacity(lower.saturating_mul(2));

        for (i, value) in values.enumerate() {
            if i > 0 {
                chunks.push(SQLChunk::text(", "));
            }
            chunks.push(SQLChunk::Param(value.into()));
        }

        SQL { chunks }
    }

    /// Appends a raw string to this SQL fragment.
    pub fn append_raw(mut self, sql: impl AsRef<str>) -> Self {
        self.chunks
            .push(SQLChunk::Text(sql.as_ref().to_compact_string()));
        self
    }

    /// Appends another SQL fragment to this one.
    ///
    /// Both the SQL text and parameters are merged.
    pub fn append(mut self, other: impl Into<SQL<V>>) -> Self {
        self.chunks.extend(other.into().chunks);
        self
    }

    /// In-place variant of [`SQL::append`].
    pub fn push(&mut self, other: impl Into<SQL<V>>) {
        self.chunks.extend(other.into().chunks);
    }

    /// Joins multiple SQL fragments with a separator.
    ///
    /// Empty fragments are dropped so a separator never dangles.
    pub fn join<T>(sqls: T, separator: &'static str) -> SQL<V>
    where
        T: IntoIterator,
        T::Item: ToSQL<V>,
    {
        let mut chunks = SmallVec::new();
        let mut first = true;

        for sql in sqls {
            let sql = sql.into_sql();
            if sql.is_empty() {
                continue;
            }
            if !first {
                chunks.push(SQLChunk::text(separator));
            }
            first = false;
            chunks.extend(sql.chunks);
        }

        SQL { chunks }
    }

    /// Wraps this fragment in parentheses.
    pub fn parens(self) -> Self {
        SQL::raw("(").append(self).append_raw(")")
    }

    /// True when the fragment renders no text and binds nothing.
    pub fn is_empty(&self) -> bool {
        self.chunks.iter().all(SQLChunk::is_empty_text)
    }

    /// Returns the SQL string represented by this fragment, using `?` for parameters.
    pub fn sql(&self) -> String {
        let mut buf = CompactString::with_capacity(self.estimate_capacity());
        for i in 0..self.chunks.len() {
            self.chunks[i].write_to_buffer(&mut buf);
            if self.needs_space(i) {
                buf.push(' ');
            }
        }
        buf.into()
    }

    /// Returns references to parameter values in placeholder order.
    pub fn params(&self) -> Vec<&V> {
        self.chunks
            .iter()
            .filter_map(|chunk| match chunk {
                SQLChunk::Param(value) => Some(value),
                SQLChunk::Text(_) => None,
            })
            .collect()
    }

    /// Number of bound parameters.
    pub fn param_count(&self) -> usize {
        self.chunks
            .iter()
            .filter(|chunk| matches!(chunk, SQLChunk::Param(_)))
            .count()
    }

    /// Consumes the fragment, returning the rendered SQL and owned parameters.
    pub fn into_parts(self) -> (String, Vec<V>) {
        let sql = self.sql();
        let params = self
            .chunks
            .into_iter()
            .filter_map(|chunk| match chunk {
                SQLChunk::Param(value) => Some(value),
                SQLChunk::Text(_) => None,
            })
            .collect();
        (sql, params)
    }

    fn estimate_capacity(&self) -> usize {
        self.chunks
            .iter()
            .map(|chunk| match chunk {
                SQLChunk::Text(t) => t.len() + 1,
                SQLChunk::Param(_) => 2,
            })
            .sum()
    }

    /// A space is inserted between two chunks when the first ends a word and
    /// the next one starts one.
    pub(crate) fn needs_space(&self, index: usize) -> bool {
        let current = &self.chunks[index];
        if current.is_empty_text() {
            return false;
        }

        let Some(next) = self.chunks[index + 1..]
            .iter()
            .find(|candidate| !candidate.is_empty_text())
        else {
            return false;
        };

        chunk_ends_word(current) && chunk_starts_word(next)
    }
}

/// Helper function to determine if a chunk ends with a word character
fn chunk_ends_word<V: SQLParam>(chunk: &SQLChunk<V>) -> bool {
    match chunk {
        SQLChunk::Text(t) => {
            let last = t.chars().last().unwrap_or(' ');
            !last.is_whitespace() && !['(', '.'].contains(&last)
        }
        SQLChunk::Param(_) => true,
    }
}

/// Helper function to determine if a chunk starts with a word character
fn chunk_starts_word<V: SQLParam>(chunk: &SQLChunk<V>) -> bool {
    match chunk {
        SQLChunk::Text(t) => {
            let first = t.chars().next().unwrap_or(' ');
            !first.is_whitespace() && ![')', ',', ';', '.'].contains(&first)
        }
        SQLChunk::Param(_) => true,
    }
}

impl<V: SQLParam> Default for SQL<V> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<V: SQLParam> From<&str> for SQL<V> {
    fn from(s: &str) -> Self {
        SQL::raw(s)
    }
}

impl<V: SQLParam> From<String> for SQL<V> {
    fn from(s: String) -> Self {
        SQL::raw(s)
    }
}

impl<V: SQLParam> ToSQL<V> for SQL<V> {
    fn to_sql(&self) -> SQL<V> {
        self.clone()
    }

    fn into_sql(self) -> SQL<V> {
        self
    }
}

impl<V: SQLParam + Display> Display for SQL<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, r#"sql: "{}", params: ["#, self.sql())?;
        for (i, param) in self.params().iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{param}")?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Val(i64);

    impl SQLParam for Val {}

    impl From<i64> for Val {
        fn from(v: i64) -> Self {
            Val(v)
        }
    }

    #[test]
    fn spacing_between_words() {
        let sql = SQL::<Val>::raw("SELECT")
            .append_raw("`id`")
            .append_raw("FROM")
            .append_raw("`Task` t0");
        assert_eq!(sql.sql(), "SELECT `id` FROM `Task` t0");
    }

    #[test]
    fn no_space_inside_parens() {
        let sql = SQL::<Val>::raw("`id` IN (")
            .append(SQL::<Val>::parameters([1i64, 2, 3]))
            .append_raw(")");
        assert_eq!(sql.sql(), "`id` IN (?, ?, ?)");
        assert_eq!(sql.params(), vec![&Val(1), &Val(2), &Val(3)]);
    }

    #[test]
    fn join_skips_empty_fragments() {
        let parts = vec![
            SQL::<Val>::raw("a = ").append(SQL::<Val>::parameter(1i64)),
            SQL::empty(),
            SQL::raw("b = ").append(SQL::<Val>::parameter(2i64)),
        ];
        let sql = SQL::join(parts, " AND ");
        assert_eq!(sql.sql(), "a = ? AND b = ?");
        assert_eq!(sql.param_count(), 2);
    }

    #[test]
    fn join_of_nothing_is_empty() {
        let sql = SQL::<Val>::join(Vec::<SQL<Val>>::new(), ", ");
        assert!(sql.is_empty());
        assert_eq!(sql.sql(), "");
    }

    #[test]
    fn parens_wrap() {
        let sql = SQL::<Val>::raw("x = ").append(SQL::<Val>::parameter(7i64)).parens();
        assert_eq!(sql.sql(), "(x = ?)");
    }

    #[test]
    fn into_parts_keeps_order() {
        let sql = SQL::<Val>::raw("a BETWEEN")
            .append(SQL::<Val>::parameter(1i64))
            .append_raw("AND")
            .append(SQL::<Val>::parameter(9i64));
        let (text, params) = sql.into_parts();
        assert_eq!(text, "a BETWEEN ? AND ?");
        assert_eq!(params, vec![Val(1), Val(9)]);
    }
}
