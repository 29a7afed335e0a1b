use serde::{Deserialize, Serialize};

/// What the compiler does with filter keys it cannot resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strictness {
    /// Log a warning and skip the key.
    #[default]
    Lenient,
    /// Fail the compile with `UnknownProperty` / `UnknownRelation`.
    Strict,
}

/// Options for a single compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CompileOptions {
    #[serde(default)]
    pub strictness: Strictness,
}

impl CompileOptions {
    pub const fn strict() -> Self {
        Self {
            strictness: Strictness::Strict,
        }
    }

    #[inline]
    pub const fn is_strict(&self) -> bool {
        matches!(self.strictness, Strictness::Strict)
    }
}
