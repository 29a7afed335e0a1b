//! Per-compile state: alias assignment and accumulated joins.

use compact_str::{CompactString, format_compact};
use hashbrown::HashMap;
use relsql_core::{
    CompileOptions, JoinShape, ModelDefinition, ModelRegistry, Relation, RelsqlError, Result, SQL,
};

use crate::escape::{escape_id, qualify};
use crate::{MySqlSQL, MySqlValue};

/// Alias of the root model in compiled statements.
pub const ROOT_ALIAS: &str = "t0";

/// A table alias and the model it stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasEntry {
    pub alias: CompactString,
    pub model: CompactString,
}

/// Relation path (`""`, `"project"`, `"project.client"`) to alias.
///
/// Pivot tables of hasMany-through relations are recorded under
/// `"<path>#<through model>"`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasMap {
    entries: HashMap<CompactString, AliasEntry>,
    order: Vec<CompactString>,
}

impl AliasMap {
    pub fn get(&self, path: &str) -> Option<&AliasEntry> {
        self.entries.get(path)
    }

    pub fn alias(&self, path: &str) -> Option<&str> {
        self.get(path).map(|entry| entry.alias.as_str())
    }

    /// First alias assigned to `model`.
    pub fn by_model(&self, model: &str) -> Option<&str> {
        self.iter()
            .find(|(_, entry)| entry.model == model)
            .map(|(_, entry)| entry.alias.as_str())
    }

    /// Entries in assignment order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AliasEntry)> {
        self.order
            .iter()
            .filter_map(|path| self.entries.get(path).map(|entry| (path.as_str(), entry)))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn insert(&mut self, path: CompactString, entry: AliasEntry) {
        relsql_core::relsql_trace_alias!(path, entry.model, entry.alias);
        self.order.push(path.clone());
        self.entries.insert(path, entry);
    }
}

/// Joins produced by a compile and the aliases they introduced.
#[derive(Debug, Clone)]
pub struct JoinResult {
    pub aliases: AliasMap,
    pub join_stmt: MySqlSQL,
}

impl JoinResult {
    pub fn has_joins(&self) -> bool {
        !self.join_stmt.is_empty()
    }
}

/// Where in the relation tree a filter is being compiled.
#[derive(Debug, Clone)]
pub(crate) struct Scope<'r> {
    pub path: CompactString,
    pub model: &'r ModelDefinition,
    pub alias: Option<CompactString>,
}

impl Scope<'_> {
    /// Column reference for `name` (a property name or a raw column).
    pub fn column(&self, name: &str) -> String {
        let column = self
            .model
            .get_property(name)
            .map_or(name, |property| property.column_name());
        qualify(self.alias.as_deref(), column)
    }

    /// Alias, or the escaped table name when compiled without one.
    fn qualifier(&self) -> String {
        match &self.alias {
            Some(alias) => alias.to_string(),
            None => escape_id(self.model.table_name()),
        }
    }

    fn child_path(&self, name: &str) -> CompactString {
        if self.path.is_empty() {
            CompactString::from(name)
        } else {
            format_compact!("{}.{}", self.path, name)
        }
    }
}

/// State threaded through one compile. Never outlives the statement it builds.
#[derive(Debug)]
pub(crate) struct CompileContext<'r> {
    registry: &'r ModelRegistry,
    options: CompileOptions,
    next_alias: usize,
    aliases: AliasMap,
    joins: Vec<MySqlSQL>,
}

impl<'r> CompileContext<'r> {
    pub(crate) fn new(registry: &'r ModelRegistry, options: CompileOptions) -> Self {
        Self {
            registry,
            options,
            next_alias: 1,
            aliases: AliasMap::default(),
            joins: Vec::new(),
        }
    }

    /// Scope of the statement's root model. `alias` is normally [`ROOT_ALIAS`].
    pub(crate) fn root(&mut self, model: &'r ModelDefinition, alias: Option<&str>) -> Scope<'r> {
        if let Some(alias) = alias {
            self.aliases.insert(
                CompactString::default(),
                AliasEntry {
                    alias: alias.into(),
                    model: model.name.as_str().into(),
                },
            );
        }
        Scope {
            path: CompactString::default(),
            model,
            alias: alias.map(CompactString::from),
        }
    }

    fn next_alias(&mut self) -> CompactString {
        let alias = format_compact!("t{}", self.next_alias);
        self.next_alias += 1;
        alias
    }

    /// Joins `relation` from `parent`, reusing the alias when the same
    /// relation path was joined before. Returns the scope of the target.
    pub(crate) fn join_relation(
        &mut self,
        parent: &Scope<'r>,
        relation: &'r Relation,
    ) -> Result<Scope<'r>> {
        let path = parent.child_path(&relation.name);
        let target = self.registry.model(&relation.model)?;

        if let Some(entry) = self.aliases.get(&path) {
            return Ok(Scope {
                path,
                model: target,
                alias: Some(entry.alias.clone()),
            });
        }

        let parent_q = parent.qualifier();
        let target_pk = primary_key(target)?;
        let target_table = escape_id(target.table_name());

        let alias = match relation.join_shape(&parent.model.name) {
            JoinShape::BelongsTo { foreign_key } => {
                let alias = self.next_alias();
                self.joins.push(SQL::raw(format!(
                    "LEFT JOIN {target_table} {alias} ON {parent_q}.{} = {alias}.{}",
                    escape_id(column_of(parent.model, &foreign_key)),
                    escape_id(target_pk),
                )));
                alias
            }
            JoinShape::HasMany { foreign_key } => {
                let alias = self.next_alias();
                self.joins.push(SQL::raw(format!(
                    "LEFT JOIN {target_table} {alias} ON {alias}.{} = {parent_q}.{}",
                    escape_id(column_of(target, &foreign_key)),
                    escape_id(primary_key(parent.model)?),
                )));
                alias
            }
            JoinShape::Through {
                through,
                foreign_key,
                key_through,
            } => {
                let pivot = self.registry.model(through)?;

                let pivot_alias = self.next_alias();
                self.joins.push(SQL::raw(format!(
                    "LEFT JOIN {} {pivot_alias} ON {pivot_alias}.{} = {parent_q}.{}",
                    escape_id(pivot.table_name()),
                    escape_id(column_of(pivot, &foreign_key)),
                    escape_id(primary_key(parent.model)?),
                )));
                self.aliases.insert(
                    format_compact!("{path}#{through}"),
                    AliasEntry {
                        alias: pivot_alias.clone(),
                        model: through.into(),
                    },
                );

                let alias = self.next_alias();
                self.joins.push(SQL::raw(format!(
                    "LEFT JOIN {target_table} {alias} ON {pivot_alias}.{} = {alias}.{}",
                    escape_id(column_of(pivot, &key_through)),
                    escape_id(target_pk),
                )));
                alias
            }
        };

        self.aliases.insert(
            path.clone(),
            AliasEntry {
                alias: alias.clone(),
                model: target.name.as_str().into(),
            },
        );

        Ok(Scope {
            path,
            model: target,
            alias: Some(alias),
        })
    }

    /// Skips an unknown property, or fails in strict mode.
    pub(crate) fn unknown_property(&self, model: &str, key: &str) -> Result<()> {
        if self.options.is_strict() {
            return Err(RelsqlError::UnknownProperty {
                model: model.to_owned(),
                property: key.to_owned(),
            });
        }
        relsql_core::relsql_trace_skip!(model, key, "unknown property");
        Ok(())
    }

    /// Skips an unknown relation, or fails in strict mode.
    pub(crate) fn unknown_relation(&self, model: &str, key: &str) -> Result<()> {
        if self.options.is_strict() {
            return Err(RelsqlError::UnknownRelation {
                model: model.to_owned(),
                relation: key.to_owned(),
            });
        }
        relsql_core::relsql_trace_skip!(model, key, "unknown relation");
        Ok(())
    }

    /// Skips a key whose value cannot be compiled, or fails in strict mode.
    pub(crate) fn unusable(&self, model: &str, key: &str, message: &str) -> Result<()> {
        if self.options.is_strict() {
            return Err(RelsqlError::InvalidFilter(format!(
                "{model}.{key}: {message}"
            )));
        }
        relsql_core::relsql_trace_skip!(model, key, "unusable filter value");
        Ok(())
    }

    /// Consumes the context, returning the joins in creation order.
    pub(crate) fn into_join_result(self) -> JoinResult {
        JoinResult {
            aliases: self.aliases,
            join_stmt: SQL::<MySqlValue>::join(self.joins, " "),
        }
    }
}

fn primary_key(model: &ModelDefinition) -> Result<&str> {
    model
        .id_column()
        .ok_or_else(|| RelsqlError::InvalidSchema(format!("model {} has no id property", model.name)))
}

/// Column storing property `name`; names that are not properties are
/// taken as column names.
fn column_of<'m>(model: &'m ModelDefinition, name: &'m str) -> &'m str {
    model
        .get_property(name)
        .map_or(name, |property| property.column_name())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alias_map_lookups() {
        let mut map = AliasMap::default();
        map.insert(
            "".into(),
            AliasEntry {
                alias: "t0".into(),
                model: "Task".into(),
            },
        );
        map.insert(
            "project".into(),
            AliasEntry {
                alias: "t1".into(),
                model: "Project".into(),
            },
        );
        map.insert(
            "timeSheets.task.project".into(),
            AliasEntry {
                alias: "t4".into(),
                model: "Project".into(),
            },
        );

        assert_eq!(map.alias("project"), Some("t1"));
        assert_eq!(map.by_model("Project"), Some("t1"));
        assert_eq!(map.by_model("Client"), None);
        let paths: Vec<_> = map.iter().map(|(path, _)| path).collect();
        assert_eq!(paths, ["", "project", "timeSheets.task.project"]);
    }
}
