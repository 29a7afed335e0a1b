//! Shared fixtures: the demo models and a seeded in-memory SQLite database.
#![allow(dead_code)]

use std::path::PathBuf;

use relsql::prelude::*;
use rusqlite::Connection;

fn demos() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos")
}

/// Registry loaded from `demos/models/*.json`.
pub fn registry() -> ModelRegistry {
    let pattern = demos().join("models").join("*.json");
    let models = glob::glob(&pattern.to_string_lossy())
        .unwrap()
        .map(|path| {
            let json = std::fs::read_to_string(path.unwrap()).unwrap();
            ModelDefinition::from_loopback_str(&json).unwrap()
        });
    ModelRegistry::new(models).unwrap()
}

/// In-memory database seeded with `demos/schema.sql`.
pub fn connection() -> Connection {
    let schema = std::fs::read_to_string(demos().join("schema.sql")).unwrap();
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&schema).unwrap();
    conn
}

pub fn filter(json: serde_json::Value) -> Filter {
    serde_json::from_value(json).unwrap()
}

/// The `id`s of `rows`, in order.
pub fn ids(rows: &[Row]) -> Vec<i64> {
    rows.iter()
        .map(|row| row["id"].as_i64().unwrap())
        .collect()
}
