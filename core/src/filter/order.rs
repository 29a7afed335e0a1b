//! `order` parsing: `"field[.field...] [asc|desc]"`, as a string or a list.

use core::fmt;

use serde::{Deserialize, Deserializer};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    #[inline]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }

    fn parse(token: &str) -> Option<Self> {
        if token.eq_ignore_ascii_case("asc") {
            Some(Self::Asc)
        } else if token.eq_ignore_ascii_case("desc") {
            Some(Self::Desc)
        } else {
            None
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// A single sort key. `path` has one segment for a plain property and
/// several for `relation.relation.property`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderTerm {
    pub path: Vec<String>,
    pub direction: Option<Direction>,
}

impl OrderTerm {
    pub fn new(path: &str, direction: Option<Direction>) -> Self {
        Self {
            path: path.split('.').map(str::to_owned).collect(),
            direction,
        }
    }

    /// True for `relation.property` terms.
    pub fn is_related(&self) -> bool {
        self.path.len() > 1
    }

    /// Relation segments, without the trailing property.
    pub fn relations(&self) -> &[String] {
        &self.path[..self.path.len().saturating_sub(1)]
    }

    pub fn property(&self) -> &str {
        self.path.last().map(String::as_str).unwrap_or_default()
    }
}

/// The parsed `order` of a filter. Tokens that could not be parsed are kept
/// in `rejected` so the compiler can report them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OrderSpec {
    pub terms: Vec<OrderTerm>,
    pub rejected: Vec<String>,
}

impl OrderSpec {
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty() && self.rejected.is_empty()
    }

    pub fn parse<'s>(entries: impl IntoIterator<Item = &'s str>) -> Self {
        let mut spec = Self::default();
        for entry in entries {
            // "a ASC, b DESC" is accepted as two terms
            for term in entry.split(',') {
                let term = term.trim();
                if term.is_empty() {
                    continue;
                }
                spec.push_token(term);
            }
        }
        spec
    }

    fn push_token(&mut self, token: &str) {
        let mut words = token.split_whitespace();
        let Some(path) = words.next() else {
            return;
        };

        if path.split('.').any(str::is_empty) {
            self.rejected.push(token.to_owned());
            return;
        }

        let direction = match (words.next(), words.next()) {
            (None, _) => None,
            (Some(word), None) => match Direction::parse(word) {
                Some(direction) => Some(direction),
                None => {
                    self.rejected.push(token.to_owned());
                    return;
                }
            },
            (Some(_), Some(_)) => {
                self.rejected.push(token.to_owned());
                return;
            }
        };

        self.terms.push(OrderTerm::new(path, direction));
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OrderInput {
    One(String),
    Many(Vec<String>),
}

impl<'de> Deserialize<'de> for OrderSpec {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match OrderInput::deserialize(deserializer)? {
            OrderInput::One(entry) => OrderSpec::parse([entry.as_str()]),
            OrderInput::Many(entries) => OrderSpec::parse(entries.iter().map(String::as_str)),
        })
    }
}
