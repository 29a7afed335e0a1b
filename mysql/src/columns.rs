use relsql_core::{Fields, ModelDefinition, Property, SQL};

use crate::MySqlSQL;
use crate::escape::qualify;

/// Properties a select returns, in declaration order.
pub fn select_properties<'m>(model: &'m ModelDefinition, fields: Option<&Fields>) -> Vec<&'m Property> {
    match fields {
        Some(fields) => fields.select(&model.properties),
        None => model.properties.iter().collect(),
    }
}

/// `t0.`a`, t0.`b``: the comma separated column list of `properties`.
pub fn column_list(properties: &[&Property], alias: Option<&str>) -> MySqlSQL {
    SQL::join(
        properties
            .iter()
            .map(|property| SQL::raw(qualify(alias, property.column_name()))),
        ", ",
    )
}

/// Primary key properties missing from `selected`, for `SELECT DISTINCT`.
pub fn missing_keys<'m>(model: &'m ModelDefinition, selected: &[&Property]) -> Vec<&'m Property> {
    model
        .id_properties()
        .into_iter()
        .filter(|key| !selected.iter().any(|p| p.name == key.name))
        .collect()
}
