//! Import of LoopBack model JSON (`common/models/*.json`).

use serde_json::{Map, Value};

use super::{ModelDefinition, Property, PropertyType, Relation, RelationType};
use crate::error::{RelsqlError, Result};

impl ModelDefinition {
    /// Reads a model from LoopBack's JSON model format.
    ///
    /// Properties and relations keep their declaration order. When no
    /// property is flagged `id` and `idInjection` is not disabled, a numeric
    /// `id` property is added in front.
    pub fn from_loopback_json(value: &Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| invalid("model definition is not an object"))?;

        let name = object
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| invalid("model definition has no name"))?;

        let mut model = ModelDefinition::new(name);
        model.table = mysql_setting(object.get("options"), "table")
            .or_else(|| mysql_setting(Some(value), "table"))
            .map(str::to_owned);

        if let Some(properties) = object.get("properties") {
            let properties = properties
                .as_object()
                .ok_or_else(|| invalid(&format!("{name}: properties is not an object")))?;
            for (property, spec) in properties {
                model.properties.push(read_property(property, spec));
            }
        }

        let id_injection = object
            .get("idInjection")
            .and_then(Value::as_bool)
            .unwrap_or(true);
        if id_injection && model.id_properties().is_empty() {
            model
                .properties
                .insert(0, Property::new("id", PropertyType::Number).id());
        }

        if let Some(relations) = object.get("relations") {
            let relations = relations
                .as_object()
                .ok_or_else(|| invalid(&format!("{name}: relations is not an object")))?;
            for (relation, spec) in relations {
                model.relations.push(read_relation(name, relation, spec)?);
            }
        }

        Ok(model)
    }

    pub fn from_loopback_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_loopback_json(&value)
    }
}

fn invalid(message: &str) -> RelsqlError {
    RelsqlError::InvalidSchema(message.to_owned())
}

/// `<value>.mysql.<key>` as a non-empty string.
fn mysql_setting<'v>(value: Option<&'v Value>, key: &str) -> Option<&'v str> {
    value?
        .get("mysql")?
        .get(key)?
        .as_str()
        .filter(|s| !s.is_empty())
}

fn read_property(name: &str, spec: &Value) -> Property {
    match spec {
        // "title": "string"
        Value::String(kind) => Property::new(name, kind.parse().unwrap_or_default()),
        Value::Object(map) => {
            let kind = match map.get("type") {
                Some(Value::String(kind)) => kind.parse().unwrap_or_default(),
                Some(Value::Array(_)) => PropertyType::Array,
                _ => PropertyType::Any,
            };
            let mut property = Property::new(name, kind);
            property.id = is_truthy_id(map);
            property.column = mysql_setting(Some(spec), "columnName").map(str::to_owned);
            property
        }
        _ => Property::new(name, PropertyType::Any),
    }
}

/// LoopBack accepts `id: true` and `id: <position>`.
fn is_truthy_id(map: &Map<String, Value>) -> bool {
    match map.get("id") {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n > 0.0),
        _ => false,
    }
}

fn read_relation(owner: &str, name: &str, spec: &Value) -> Result<Relation> {
    let text = |key: &str| spec.get(key).and_then(Value::as_str).map(str::to_owned);

    let kind = match spec.get("type").and_then(Value::as_str) {
        Some("belongsTo") => RelationType::BelongsTo,
        Some("hasMany") => RelationType::HasMany,
        Some("hasOne") => RelationType::HasOne,
        other => {
            return Err(invalid(&format!(
                "{owner}.{name}: unsupported relation type {}",
                other.unwrap_or("<missing>")
            )));
        }
    };
    let model =
        text("model").ok_or_else(|| invalid(&format!("{owner}.{name}: relation has no model")))?;

    Ok(Relation {
        name: name.to_owned(),
        kind,
        model,
        foreign_key: text("foreignKey"),
        through: text("through"),
        key_through: text("keyThrough"),
    })
}
