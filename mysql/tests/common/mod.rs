#![allow(dead_code)]

use relsql_core::{ModelDefinition, ModelRegistry, Property, PropertyType, Relation};
use relsql_mysql::MySqlValue;

/// Select list of an unfiltered `Task`.
pub const TASK_COLUMNS: &str =
    "t0.`id`, t0.`title`, t0.`status`, t0.`projectId`, t0.`userId`, t0.`dueDate`";

fn id() -> Property {
    Property::new("id", PropertyType::Number).id()
}

fn number(name: &str) -> Property {
    Property::new(name, PropertyType::Number)
}

fn string(name: &str) -> Property {
    Property::new(name, PropertyType::String)
}

/// Timesheet app: customers, clients, projects, tasks and timesheets.
pub fn registry() -> ModelRegistry {
    ModelRegistry::new([
        ModelDefinition::new("Customer")
            .property(id())
            .property(string("name"))
            .property(string("email"))
            .property(Property::new("active", PropertyType::Boolean)),
        ModelDefinition::new("Client")
            .property(id())
            .property(string("name"))
            .relation(Relation::has_many("projects", "Project")),
        ModelDefinition::new("Project")
            .property(id())
            .property(string("name"))
            .property(number("clientId"))
            .property(Property::new("billable", PropertyType::Boolean))
            .relation(Relation::belongs_to("client", "Client"))
            .relation(Relation::has_many("tasks", "Task"))
            .relation(
                Relation::has_many("members", "Customer")
                    .through("ProjectMember")
                    .key_through("userId"),
            ),
        ModelDefinition::new("ProjectMember")
            .property(id())
            .property(number("projectId"))
            .property(number("userId")),
        ModelDefinition::new("Task")
            .property(id())
            .property(string("title"))
            .property(string("status"))
            .property(number("projectId"))
            .property(number("userId"))
            .property(Property::new("dueDate", PropertyType::Date))
            .relation(Relation::belongs_to("project", "Project"))
            .relation(Relation::belongs_to("user", "Customer").foreign_key("userId"))
            .relation(Relation::has_many("timeSheets", "TimeSheet")),
        ModelDefinition::new("TimeSheet")
            .table("time_sheet")
            .property(id())
            .property(Property::new("date", PropertyType::Date))
            .property(number("duration"))
            .property(number("taskId"))
            .property(number("userId").column("user_id"))
            .relation(Relation::belongs_to("task", "Task"))
            .relation(Relation::belongs_to("user", "Customer").foreign_key("userId")),
    ])
    .expect("fixture schema is valid")
}

pub fn text(value: &str) -> MySqlValue {
    MySqlValue::Text(value.to_owned())
}

pub fn int(value: i64) -> MySqlValue {
    MySqlValue::Integer(value)
}

/// Number of `?` placeholders in `sql`.
pub fn placeholders(sql: &str) -> usize {
    sql.matches('?').count()
}
