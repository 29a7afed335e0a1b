use hashbrown::{HashMap, HashSet};

use super::{ModelDefinition, Relation};
use crate::error::{RelsqlError, Result};

/// All known models, validated as a whole.
///
/// The registry is immutable once built and can be shared between threads
/// compiling independent statements.
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    models: HashMap<String, ModelDefinition>,
}

impl ModelRegistry {
    /// Builds and validates a registry.
    pub fn new(models: impl IntoIterator<Item = ModelDefinition>) -> Result<Self> {
        let mut map = HashMap::new();
        for model in models {
            if map.contains_key(&model.name) {
                return Err(RelsqlError::InvalidSchema(format!(
                    "model {} is defined twice",
                    model.name
                )));
            }
            map.insert(model.name.clone(), model);
        }

        let registry = Self { models: map };
        registry.validate()?;
        Ok(registry)
    }

    pub fn get(&self, name: &str) -> Option<&ModelDefinition> {
        self.models.get(name)
    }

    /// Like [`ModelRegistry::get`], failing with `UnknownModel`.
    pub fn model(&self, name: &str) -> Result<&ModelDefinition> {
        self.get(name)
            .ok_or_else(|| RelsqlError::UnknownModel(name.to_owned()))
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Models sorted by name.
    pub fn models(&self) -> Vec<&ModelDefinition> {
        let mut models: Vec<_> = self.models.values().collect();
        models.sort_by(|a, b| a.name.cmp(&b.name));
        models
    }

    fn validate(&self) -> Result<()> {
        for model in self.models() {
            validate_model(model)?;
            for relation in &model.relations {
                self.validate_relation(model, relation)?;
            }
        }
        Ok(())
    }

    fn validate_relation(&self, owner: &ModelDefinition, relation: &Relation) -> Result<()> {
        let target = self.get(&relation.model).ok_or_else(|| {
            RelsqlError::InvalidSchema(format!(
                "relation {}.{} targets unknown model {}",
                owner.name, relation.name, relation.model
            ))
        })?;
        if target.id_column().is_none() {
            return Err(RelsqlError::InvalidSchema(format!(
                "relation {}.{} targets {} which has no id property",
                owner.name, relation.name, target.name
            )));
        }

        for key in [&relation.foreign_key, &relation.key_through]
            .into_iter()
            .flatten()
            .filter(|k| !k.is_empty())
        {
            validate_identifier(key)?;
        }

        if let Some(through) = relation.through_model()
            && self.get(through).is_none()
        {
            return Err(RelsqlError::InvalidSchema(format!(
                "relation {}.{} goes through unknown model {}",
                owner.name, relation.name, through
            )));
        }

        Ok(())
    }
}

fn validate_model(model: &ModelDefinition) -> Result<()> {
    validate_identifier(&model.name)?;
    validate_identifier(model.table_name())?;

    if model.properties.is_empty() {
        return Err(RelsqlError::InvalidSchema(format!(
            "model {} declares no properties",
            model.name
        )));
    }
    if model.id_column().is_none() {
        return Err(RelsqlError::InvalidSchema(format!(
            "model {} has no id property",
            model.name
        )));
    }

    let mut names = HashSet::new();
    for property in &model.properties {
        validate_name(&property.name)?;
        validate_identifier(property.column_name())?;
        if !names.insert(property.name.as_str()) {
            return Err(RelsqlError::InvalidSchema(format!(
                "property {}.{} is declared twice",
                model.name, property.name
            )));
        }
    }
    for relation in &model.relations {
        validate_name(&relation.name)?;
        if !names.insert(relation.name.as_str()) {
            return Err(RelsqlError::InvalidSchema(format!(
                "{}.{} is both a property and a relation, or a duplicate relation",
                model.name, relation.name
            )));
        }
    }

    Ok(())
}

/// Names usable in filters: identifiers that do not contain a path separator.
fn validate_name(name: &str) -> Result<()> {
    validate_identifier(name)?;
    if name.contains('.') {
        return Err(RelsqlError::InvalidIdentifier(name.to_owned()));
    }
    Ok(())
}

/// Identifiers end up in SQL text: a `?` would desynchronise placeholders
/// from parameters.
pub fn validate_identifier(name: &str) -> Result<()> {
    if name.is_empty() || name.contains(['?', '\0']) {
        return Err(RelsqlError::InvalidIdentifier(name.to_owned()));
    }
    Ok(())
}
