mod common;

use common::{TASK_COLUMNS, int, placeholders, registry, text};
use relsql_core::{CompileOptions, Filter, RelsqlError};
use relsql_mysql::Compiler;
use serde_json::json;

fn select(model: &str, filter: serde_json::Value) -> (String, Vec<relsql_mysql::MySqlValue>) {
    let registry = registry();
    let filter: Filter = serde_json::from_value(filter).unwrap();
    Compiler::new(&registry)
        .build_select(model, &filter)
        .unwrap()
        .into_parts()
}

#[test]
fn plain_property_filter() {
    let (sql, params) = select("Task", json!({"where": {"status": "open"}}));
    assert_eq!(
        sql,
        format!("SELECT {TASK_COLUMNS} FROM `Task` t0 WHERE t0.`status` = ? ORDER BY t0.`id`")
    );
    assert_eq!(params, vec![text("open")]);
}

#[test]
fn empty_filter_orders_by_id() {
    let (sql, params) = select("Customer", json!({}));
    assert_eq!(
        sql,
        "SELECT t0.`id`, t0.`name`, t0.`email`, t0.`active` FROM `Customer` t0 ORDER BY t0.`id`"
    );
    assert!(params.is_empty());
}

#[test]
fn belongs_to_filter_and_order_share_one_join() {
    let (sql, params) = select(
        "Task",
        json!({
            "where": {"project": {"name": "Internal"}, "project.billable": true},
            "order": "project.name DESC"
        }),
    );
    assert_eq!(
        sql,
        format!(
            "SELECT DISTINCT {TASK_COLUMNS}, t1.`name` AS `t1_orderByname` FROM `Task` t0 \
             LEFT JOIN `Project` t1 ON t0.`projectId` = t1.`id` \
             WHERE t1.`name` = ? AND t1.`billable` = ? ORDER BY t1.`name` DESC"
        )
    );
    assert_eq!(params, vec![text("Internal"), int(1)]);
    assert_eq!(sql.matches("LEFT JOIN").count(), 1);
}

#[test]
fn nested_relations_chain_aliases() {
    let (sql, params) = select(
        "Task",
        json!({"where": {"project": {"client": {"name": "Acme"}}}}),
    );
    assert!(sql.contains(
        "LEFT JOIN `Project` t1 ON t0.`projectId` = t1.`id` \
         LEFT JOIN `Client` t2 ON t1.`clientId` = t2.`id` \
         WHERE t2.`name` = ?"
    ));
    assert_eq!(params, vec![text("Acme")]);
}

#[test]
fn has_many_joins_on_the_child_key() {
    let (sql, _) = select("Project", json!({"where": {"tasks": {"status": "open"}}}));
    assert!(sql.contains("LEFT JOIN `Task` t1 ON t1.`projectId` = t0.`id` WHERE t1.`status` = ?"));
    assert!(sql.starts_with("SELECT DISTINCT t0.`id`, "));
}

#[test]
fn has_many_through_joins_pivot_first() {
    let (sql, params) = select(
        "Project",
        json!({"where": {"members": {"email": "ann@example.com"}}}),
    );
    assert!(sql.contains(
        "LEFT JOIN `ProjectMember` t1 ON t1.`projectId` = t0.`id` \
         LEFT JOIN `Customer` t2 ON t1.`userId` = t2.`id` \
         WHERE t2.`email` = ?"
    ));
    assert_eq!(params, vec![text("ann@example.com")]);
}

#[test]
fn column_and_table_overrides() {
    let (sql, params) = select(
        "TimeSheet",
        json!({"where": {"userId": 3, "user": {"active": "true"}}}),
    );
    assert!(sql.contains("FROM `time_sheet` t0 LEFT JOIN `Customer` t1 ON t0.`user_id` = t1.`id`"));
    assert!(sql.contains("WHERE t0.`user_id` = ? AND t1.`active` = ?"));
    assert_eq!(params, vec![int(3), int(1)]);
}

#[test]
fn distinct_prepends_missing_primary_key() {
    let (sql, _) = select(
        "Task",
        json!({"fields": ["title"], "where": {"project": {"name": "Internal"}}}),
    );
    assert!(sql.starts_with("SELECT DISTINCT t0.`id`, t0.`title` FROM `Task` t0"));

    let (sql, _) = select("Task", json!({"fields": {"title": true}}));
    assert!(sql.starts_with("SELECT t0.`title` FROM `Task` t0"));
}

#[test]
fn order_terms() {
    let (sql, _) = select("TimeSheet", json!({"order": ["date DESC, duration", "bogus", "id up"]}));
    assert!(sql.ends_with("ORDER BY t0.`date` DESC, t0.`duration`"));
}

#[test]
fn order_through_relation_adds_extra_column() {
    let (sql, _) = select("Project", json!({"order": "members.name ASC"}));
    assert_eq!(
        sql,
        "SELECT DISTINCT t0.`id`, t0.`name`, t0.`clientId`, t0.`billable`, \
         t2.`name` AS `t2_orderByname` FROM `Project` t0 \
         LEFT JOIN `ProjectMember` t1 ON t1.`projectId` = t0.`id` \
         LEFT JOIN `Customer` t2 ON t1.`userId` = t2.`id` \
         ORDER BY t2.`name` ASC"
    );
}

#[test]
fn distinct_selects_unselected_order_columns() {
    let (sql, params) = select(
        "Task",
        json!({
            "fields": ["title"],
            "where": {"project": {"name": "Website"}},
            "order": "dueDate DESC"
        }),
    );
    assert_eq!(
        sql,
        "SELECT DISTINCT t0.`id`, t0.`title`, t0.`dueDate` AS `t0_orderBydueDate` FROM `Task` t0 \
         LEFT JOIN `Project` t1 ON t0.`projectId` = t1.`id` \
         WHERE t1.`name` = ? ORDER BY t0.`dueDate` DESC"
    );
    assert_eq!(params, vec![text("Website")]);

    // already selected, or no DISTINCT at all
    let (sql, _) = select(
        "Task",
        json!({
            "fields": ["title", "dueDate"],
            "where": {"project": {"name": "Website"}},
            "order": ["dueDate DESC", "dueDate"]
        }),
    );
    assert!(sql.starts_with("SELECT DISTINCT t0.`id`, t0.`title`, t0.`dueDate` FROM"));
    let (sql, _) = select("Task", json!({"fields": ["title"], "order": "dueDate DESC"}));
    assert_eq!(sql, "SELECT t0.`title` FROM `Task` t0 ORDER BY t0.`dueDate` DESC");
}

#[test]
fn where_joins_are_created_before_order_joins() {
    let (sql, _) = select(
        "Task",
        json!({
            "where": {"user": {"active": true}},
            "order": ["project.client.name", "user.name"]
        }),
    );
    assert!(sql.contains(
        "LEFT JOIN `Customer` t1 ON t0.`userId` = t1.`id` \
         LEFT JOIN `Project` t2 ON t0.`projectId` = t2.`id` \
         LEFT JOIN `Client` t3 ON t2.`clientId` = t3.`id`"
    ));
    assert!(sql.ends_with("ORDER BY t3.`name`, t1.`name`"));
}

#[test]
fn pagination_comes_last() {
    let (sql, _) = select("Task", json!({"limit": 10, "skip": 20}));
    assert!(sql.ends_with("ORDER BY t0.`id` LIMIT 10 OFFSET 20"));

    let (sql, _) = select("Task", json!({"offset": 5}));
    assert!(sql.ends_with("LIMIT 9223372036854775807 OFFSET 5"));
}

#[test]
fn dates_are_coerced() {
    let (sql, params) = select("Task", json!({"where": {"dueDate": {"lt": "2024-01-31"}}}));
    assert!(sql.contains("WHERE t0.`dueDate` < ?"));
    assert_eq!(params, vec![text("2024-01-31 00:00:00.000")]);
}

#[test]
fn unknown_keys_are_skipped_by_default() {
    let (sql, params) = select(
        "Task",
        json!({"where": {"titel": "typo", "owner": {"name": "x"}, "project.nope": 1}}),
    );
    // the known relation head still joins
    assert!(sql.contains("LEFT JOIN `Project` t1"));
    assert!(!sql.contains("WHERE"));
    assert!(params.is_empty());
}

#[test]
fn strict_mode_rejects_unknown_keys() {
    let registry = registry();
    let compiler = Compiler::with_options(&registry, CompileOptions::strict());

    let filter = Filter::from_json_str(r#"{"where": {"titel": "typo"}}"#).unwrap();
    let err = compiler.build_select("Task", &filter).unwrap_err();
    assert!(matches!(
        err,
        RelsqlError::UnknownProperty { ref model, ref property } if model == "Task" && property == "titel"
    ));

    let filter = Filter::from_json_str(r#"{"order": "owner.name"}"#).unwrap();
    let err = compiler.build_select("Task", &filter).unwrap_err();
    assert!(matches!(err, RelsqlError::UnknownRelation { .. }));

    let filter = Filter::from_json_str(r#"{"order": "title sideways"}"#).unwrap();
    let err = compiler.build_select("Task", &filter).unwrap_err();
    assert!(matches!(err, RelsqlError::InvalidFilter(_)));
}

#[test]
fn unknown_root_model_is_an_error() {
    let registry = registry();
    let err = Compiler::new(&registry)
        .build_select("Invoice", &Filter::default())
        .unwrap_err();
    assert!(matches!(err, RelsqlError::UnknownModel(name) if name == "Invoice"));
}

#[test]
fn compiling_twice_is_byte_identical() {
    let filter = json!({
        "where": {"or": [{"project": {"name": "A"}}, {"timeSheets": {"duration": {"gt": 2}}}]},
        "order": ["project.client.name DESC", "title"]
    });
    assert_eq!(select("Task", filter.clone()), select("Task", filter));
}

#[test]
fn placeholders_match_parameters() {
    let filters = [
        json!({"where": {"status": "open"}}),
        json!({"where": {"id": {"inq": [1, 2, 3]}, "title": {"like": "%a%"}}}),
        json!({"where": {"id": {"nin": []}, "projectId": {"inq": []}}}),
        json!({"where": {"dueDate": {"between": ["2024-01-01"]}}}),
        json!({"where": {"and": [{"status": "open"}, {"or": [{"userId": 1}, {"userId": null}]}]}}),
        json!({"where": {"project": {"client": {"name": {"neq": "x"}}}, "user.email": {"nlike": "%@x"}}}),
        json!({"where": {"timeSheets": {"duration": {"gte": "1.5"}}}, "order": "project.name", "limit": 3}),
    ];
    for filter in filters {
        let (sql, params) = select("Task", filter.clone());
        assert_eq!(placeholders(&sql), params.len(), "{filter} -> {sql}");
    }
}
