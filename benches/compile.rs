use criterion::{Criterion, criterion_group, criterion_main};
use relsql::prelude::*;
use serde_json::json;
use std::hint::black_box;

fn registry() -> ModelRegistry {
    let pattern = concat!(env!("CARGO_MANIFEST_DIR"), "/demos/models/*.json");
    let models = glob::glob(pattern).unwrap().map(|path| {
        let json = std::fs::read_to_string(path.unwrap()).unwrap();
        ModelDefinition::from_loopback_str(&json).unwrap()
    });
    ModelRegistry::new(models).unwrap()
}

fn filter(json: serde_json::Value) -> Filter {
    serde_json::from_value(json).unwrap()
}

fn bench_select(c: &mut Criterion) {
    let registry = registry();
    let compiler = Compiler::new(&registry);
    let mut group = c.benchmark_group("select");

    let plain = filter(json!({"where": {"status": "open", "userId": {"inq": [1, 2, 3]}}, "limit": 20}));
    group.bench_function("plain", |b| {
        b.iter(|| compiler.build_select("Task", black_box(&plain)).unwrap())
    });

    let relations = filter(json!({
        "where": {
            "project": {"client": {"name": "Acme"}, "billable": true},
            "or": [{"timeSheets": {"duration": {"gt": 2}}}, {"user.active": false}]
        },
        "order": ["project.client.name DESC", "dueDate"],
        "limit": 20,
        "skip": 40
    }));
    group.bench_function("relations", |b| {
        b.iter(|| compiler.build_select("Task", black_box(&relations)).unwrap())
    });

    let through = filter(json!({"where": {"members": {"email": {"like": "%@example.com"}}}, "order": "members.name"}));
    group.bench_function("through", |b| {
        b.iter(|| compiler.build_select("Project", black_box(&through)).unwrap())
    });

    group.finish();
}

fn bench_parse(c: &mut Criterion) {
    let text = r#"{"where": {"and": [{"status": "open"}, {"or": [{"userId": 1}, {"userId": 2}]}], "project.name": {"ilike": "web%"}}, "order": "title DESC", "fields": ["id", "title"]}"#;
    c.bench_function("parse_filter", |b| {
        b.iter(|| Filter::from_json_str(black_box(text)).unwrap())
    });
}

criterion_group!(benches, bench_select, bench_parse);
criterion_main!(benches);
