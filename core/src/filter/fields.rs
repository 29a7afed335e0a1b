use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::model::Property;

/// Field selection of a filter: `["a", "b"]` or `{ "a": true, "b": false }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Fields {
    List(Vec<String>),
    Map(Map<String, Value>),
}

impl Fields {
    /// Properties of `properties` selected by these fields.
    ///
    /// The result follows the model's declaration order, not the order the
    /// caller listed fields in. Rows are keyed by property name, so only the
    /// column order of the generated SQL depends on this.
    ///
    /// Any included field switches to include-only; otherwise excluded fields
    /// are dropped. A selection that matches nothing selects everything.
    pub fn select<'p>(&self, properties: &'p [Property]) -> Vec<&'p Property> {
        let (included, excluded): (Vec<&str>, Vec<&str>) = match self {
            Fields::List(names) => (names.iter().map(String::as_str).collect(), Vec::new()),
            Fields::Map(map) => {
                let mut included = Vec::new();
                let mut excluded = Vec::new();
                for (name, flag) in map {
                    if is_truthy(flag) {
                        included.push(name.as_str());
                    } else {
                        excluded.push(name.as_str());
                    }
                }
                (included, excluded)
            }
        };

        let selected: Vec<_> = if included.iter().any(|n| properties.iter().any(|p| p.name == *n)) {
            properties
                .iter()
                .filter(|p| included.contains(&p.name.as_str()))
                .collect()
        } else {
            properties
                .iter()
                .filter(|p| !excluded.contains(&p.name.as_str()))
                .collect()
        };

        if selected.is_empty() {
            properties.iter().collect()
        } else {
            selected
        }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PropertyType;
    use serde_json::json;

    fn properties() -> Vec<Property> {
        ["id", "title", "status", "projectId"]
            .into_iter()
            .map(|name| Property::new(name, PropertyType::Any))
            .collect()
    }

    fn names(selected: Vec<&Property>) -> Vec<&str> {
        selected.into_iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn list_includes_in_declaration_order() {
        let props = properties();
        let fields: Fields = serde_json::from_value(json!(["status", "id", "nope"])).unwrap();
        assert_eq!(names(fields.select(&props)), ["id", "status"]);
    }

    #[test]
    fn list_order_is_ignored() {
        let props = properties();
        let forward = Fields::List(vec!["title".into(), "projectId".into()]);
        let backward = Fields::List(vec!["projectId".into(), "title".into()]);
        assert_eq!(names(backward.select(&props)), ["title", "projectId"]);
        assert_eq!(forward.select(&props), backward.select(&props));
    }

    #[test]
    fn map_excludes() {
        let props = properties();
        let fields: Fields = serde_json::from_value(json!({"title": false, "projectId": 0})).unwrap();
        assert_eq!(names(fields.select(&props)), ["id", "status"]);
    }

    #[test]
    fn include_wins_over_exclude() {
        let props = properties();
        let fields: Fields = serde_json::from_value(json!({"title": true, "status": false})).unwrap();
        assert_eq!(names(fields.select(&props)), ["title"]);
    }

    #[test]
    fn unknown_names_select_everything() {
        let props = properties();
        let fields = Fields::List(vec!["nope".into()]);
        assert_eq!(fields.select(&props).len(), 4);
    }
}
