//! Models command - lists models, their relations and how they join

use relsql_core::{JoinShape, ModelDefinition, ModelRegistry, RelationType};

use crate::config::Config;
use crate::error::CliError;
use crate::output;

pub fn run(config: &Config, json: bool) -> Result<(), CliError> {
    let registry = config.registry()?;
    let models = registry.models();

    if json {
        return output::print_json(&models);
    }

    for model in models {
        print_model(&registry, model);
    }
    Ok(())
}

fn print_model(registry: &ModelRegistry, model: &ModelDefinition) {
    let keys: Vec<&str> = model.id_properties().iter().map(|p| p.name.as_str()).collect();
    println!(
        "{} {}",
        output::heading(&model.name),
        output::muted(&format!("(table {}, id {})", model.table_name(), keys.join(", ")))
    );

    for property in &model.properties {
        match &property.column {
            Some(column) => println!("  {}: {} -> {column}", property.name, property.kind),
            None => println!("  {}: {}", property.name, property.kind),
        }
    }

    let owner_key = model.id_column().unwrap_or("id");
    for relation in &model.relations {
        let target = relation.model.as_str();
        let target_key = registry
            .get(target)
            .and_then(ModelDefinition::id_column)
            .unwrap_or("id");
        let owner = model.name.as_str();
        let shape = match relation.join_shape(owner) {
            JoinShape::BelongsTo { foreign_key } => {
                format!("{owner}.{foreign_key} = {target}.{target_key}")
            }
            JoinShape::HasMany { foreign_key } => {
                format!("{target}.{foreign_key} = {owner}.{owner_key}")
            }
            JoinShape::Through {
                through,
                foreign_key,
                key_through,
            } => format!(
                "{through}.{foreign_key} = {owner}.{owner_key}, \
                 {through}.{key_through} = {target}.{target_key}"
            ),
        };
        println!(
            "  {} {} {target} {}",
            output::label(&relation.name),
            relation_kind(relation.kind),
            output::muted(&format!("[{shape}]"))
        );
    }
    println!();
}

fn relation_kind(kind: RelationType) -> &'static str {
    match kind {
        RelationType::BelongsTo => "belongsTo",
        RelationType::HasMany => "hasMany",
        RelationType::HasOne => "hasOne",
    }
}
