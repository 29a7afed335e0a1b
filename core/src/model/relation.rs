use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// How two models are associated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationType {
    BelongsTo,
    HasMany,
    HasOne,
}

/// A named relation from the owning model to `model`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relation {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: RelationType,
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreign_key: Option<String>,
    /// Pivot model of a hasMany-through relation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub through: Option<String>,
    /// Pivot column pointing at `model`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_through: Option<String>,
}

/// Resolved join layout of a relation, with default keys filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinShape<'r> {
    /// `parent.fk = target.pk`
    BelongsTo { foreign_key: Cow<'r, str> },
    /// `target.fk = parent.pk` (hasMany and hasOne)
    HasMany { foreign_key: Cow<'r, str> },
    /// `pivot.fk = parent.pk`, then `pivot.key_through = target.pk`
    Through {
        through: &'r str,
        foreign_key: Cow<'r, str>,
        key_through: Cow<'r, str>,
    },
}

impl Relation {
    pub fn new(name: impl Into<String>, kind: RelationType, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            model: model.into(),
            foreign_key: None,
            through: None,
            key_through: None,
        }
    }

    pub fn belongs_to(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self::new(name, RelationType::BelongsTo, model)
    }

    pub fn has_many(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self::new(name, RelationType::HasMany, model)
    }

    pub fn has_one(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self::new(name, RelationType::HasOne, model)
    }

    pub fn foreign_key(mut self, key: impl Into<String>) -> Self {
        self.foreign_key = Some(key.into());
        self
    }

    pub fn through(mut self, model: impl Into<String>) -> Self {
        self.through = Some(model.into());
        self
    }

    pub fn key_through(mut self, key: impl Into<String>) -> Self {
        self.key_through = Some(key.into());
        self
    }

    /// Configured foreign key; an empty string counts as unset.
    fn configured_foreign_key(&self) -> Option<&str> {
        self.foreign_key.as_deref().filter(|k| !k.is_empty())
    }

    /// Pivot model, when this is a hasMany-through relation.
    pub fn through_model(&self) -> Option<&str> {
        match self.kind {
            RelationType::HasMany => self.through.as_deref().filter(|t| !t.is_empty()),
            RelationType::BelongsTo | RelationType::HasOne => None,
        }
    }

    /// Join layout for this relation declared on `owner`.
    pub fn join_shape<'r>(&'r self, owner: &str) -> JoinShape<'r> {
        let key_or = move |default: &str| match self.configured_foreign_key() {
            Some(key) => Cow::Borrowed(key),
            None => Cow::Owned(default_key(default)),
        };

        if let Some(through) = self.through_model() {
            let key_through = match self.key_through.as_deref().filter(|k| !k.is_empty()) {
                Some(key) => Cow::Borrowed(key),
                None => Cow::Owned(default_key(&self.model)),
            };
            return JoinShape::Through {
                through,
                foreign_key: key_or(owner),
                key_through,
            };
        }

        match self.kind {
            RelationType::BelongsTo => JoinShape::BelongsTo {
                foreign_key: key_or(&self.model),
            },
            RelationType::HasMany | RelationType::HasOne => JoinShape::HasMany {
                foreign_key: key_or(owner),
            },
        }
    }
}

/// `TimeSheet` -> `timeSheetId`
pub fn default_key(model: &str) -> String {
    let mut chars = model.chars();
    let mut key = String::with_capacity(model.len() + 2);
    if let Some(first) = chars.next() {
        key.extend(first.to_lowercase());
        key.push_str(chars.as_str());
    }
    key.push_str("Id");
    key
}
