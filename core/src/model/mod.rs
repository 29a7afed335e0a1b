//! Model metadata: properties, relations and the registry the compiler reads.

mod loopback;
mod registry;
mod relation;

pub use registry::*;
pub use relation::*;

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Declared type of a model property. Drives value coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    String,
    Number,
    Boolean,
    Date,
    Object,
    Array,
    #[default]
    Any,
}

impl PropertyType {
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::Object => "object",
            Self::Array => "array",
            Self::Any => "any",
        }
    }
}

impl FromStr for PropertyType {
    type Err = core::convert::Infallible;

    /// Case-insensitive; unrecognised type names (`GeoPoint`, `Buffer`, ...) map to `Any`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "string" | "text" => Self::String,
            "number" | "integer" | "float" => Self::Number,
            "boolean" | "bool" => Self::Boolean,
            "date" | "datetime" => Self::Date,
            "object" | "json" => Self::Object,
            "array" => Self::Array,
            _ => Self::Any,
        })
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PropertyType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Ok(name.parse().unwrap_or_default())
    }
}

/// A model property and the column that stores it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub name: String,
    #[serde(default, rename = "type")]
    pub kind: PropertyType,
    /// Part of the primary key
    #[serde(default)]
    pub id: bool,
    /// Column name when it differs from the property name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
}

impl Property {
    pub fn new(name: impl Into<String>, kind: PropertyType) -> Self {
        Self {
            name: name.into(),
            kind,
            id: false,
            column: None,
        }
    }

    pub fn id(mut self) -> Self {
        self.id = true;
        self
    }

    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    #[inline]
    pub fn column_name(&self) -> &str {
        self.column.as_deref().unwrap_or(&self.name)
    }
}

/// A model: its table, ordered properties and named relations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDefinition {
    pub name: String,
    /// Table name when it differs from the model name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    #[serde(default)]
    pub properties: Vec<Property>,
    #[serde(default)]
    pub relations: Vec<Relation>,
}

impl ModelDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: None,
            properties: Vec::new(),
            relations: Vec::new(),
        }
    }

    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    pub fn relation(mut self, relation: Relation) -> Self {
        self.relations.push(relation);
        self
    }

    #[inline]
    pub fn table_name(&self) -> &str {
        self.table.as_deref().unwrap_or(&self.name)
    }

    pub fn get_property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn get_relation(&self, name: &str) -> Option<&Relation> {
        self.relations.iter().find(|r| r.name == name)
    }

    /// Primary key properties: those flagged `id`, else a property named `id`.
    pub fn id_properties(&self) -> Vec<&Property> {
        let flagged: Vec<_> = self.properties.iter().filter(|p| p.id).collect();
        if !flagged.is_empty() {
            return flagged;
        }
        self.get_property("id").into_iter().collect()
    }

    /// Column holding the primary key referenced by joins. Composite keys
    /// join on their first column.
    pub fn id_column(&self) -> Option<&str> {
        self.id_properties().first().map(|p| p.column_name())
    }

    /// Finds the property stored in `column`.
    pub fn property_for_column(&self, column: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.column_name() == column)
    }
}
