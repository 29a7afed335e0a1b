//! SELECT and COUNT assembly.

use relsql_core::{
    CompileOptions, Fields, Filter, ModelDefinition, ModelRegistry, OrderSpec, Result, SQL, Where,
};

use crate::context::{CompileContext, JoinResult, ROOT_ALIAS, Scope};
use crate::escape::{escape_id, qualify};
use crate::order::{OrderResult, compile_order};
use crate::where_clause::compile_where;
use crate::{MySqlSQL, columns};

/// `LIMIT` used when only an offset is given: MySQL has no bare `OFFSET`.
pub const MAX_LIMIT: u64 = i64::MAX as u64;

/// Compiles filters against a model registry.
///
/// A compiler is cheap to copy and never mutated by compiling: aliases and
/// joins are tracked per statement.
#[derive(Debug, Clone, Copy)]
pub struct Compiler<'r> {
    registry: &'r ModelRegistry,
    options: CompileOptions,
}

impl<'r> Compiler<'r> {
    pub fn new(registry: &'r ModelRegistry) -> Self {
        Self::with_options(registry, CompileOptions::default())
    }

    pub fn with_options(registry: &'r ModelRegistry, options: CompileOptions) -> Self {
        Self { registry, options }
    }

    pub fn registry(&self) -> &'r ModelRegistry {
        self.registry
    }

    pub fn options(&self) -> CompileOptions {
        self.options
    }

    fn context(&self) -> CompileContext<'r> {
        CompileContext::new(self.registry, self.options)
    }

    /// `SELECT ... FROM <table> t0 [joins] [WHERE] ORDER BY ... [LIMIT]`
    pub fn build_select(&self, model: &str, filter: &Filter) -> Result<MySqlSQL> {
        let model = self.registry.model(model)?;
        let selected = columns::select_properties(model, filter.fields.as_ref());

        let mut ctx = self.context();
        let root = ctx.root(model, Some(ROOT_ALIAS));
        let predicates = compile_where(&mut ctx, &root, &filter.r#where)?;
        let order = match &filter.order {
            Some(spec) => compile_order(&mut ctx, &root, spec)?,
            None => OrderResult::default(),
        };
        let order = if order.terms.is_empty() {
            OrderResult {
                terms: default_order(&root),
                ..order
            }
        } else {
            order
        };
        let joins = ctx.into_join_result();

        let mut extra: Vec<&MySqlSQL> = order.columns.iter().collect();
        let mut select = if joins.has_joins() {
            let mut keys = columns::missing_keys(model, &selected);
            keys.extend(selected.iter().copied());
            // DISTINCT only sorts by selected columns
            extra.extend(
                order
                    .root_columns
                    .iter()
                    .filter(|(property, _)| !keys.iter().any(|p| p.name == *property))
                    .map(|(_, column)| column),
            );
            SQL::raw("SELECT DISTINCT").append(columns::column_list(&keys, Some(ROOT_ALIAS)))
        } else {
            SQL::raw("SELECT").append(columns::column_list(&selected, Some(ROOT_ALIAS)))
        };
        if !extra.is_empty() {
            select.push(SQL::raw(", ").append(SQL::join(extra, ", ")));
        }

        let sql = select
            .append(from(model))
            .append(joins.join_stmt)
            .append(where_clause(predicates))
            .append(order.order_by())
            .append(pagination(filter.limit, filter.offset()));

        relsql_core::relsql_trace_query!(sql.sql(), sql.param_count());
        Ok(sql)
    }

    /// `SELECT COUNT(*) AS cnt ...`, or `COUNT(DISTINCT <pk>)` when the filter
    /// joins other tables.
    pub fn build_count(&self, model: &str, filter: &Where) -> Result<MySqlSQL> {
        let model = self.registry.model(model)?;

        let mut ctx = self.context();
        let root = ctx.root(model, Some(ROOT_ALIAS));
        let predicates = compile_where(&mut ctx, &root, filter)?;
        let joins = ctx.into_join_result();

        let count = if joins.has_joins() {
            let keys = model.id_properties();
            format!(
                "SELECT COUNT(DISTINCT {}) AS cnt",
                columns::column_list(&keys, Some(ROOT_ALIAS)).sql()
            )
        } else {
            "SELECT COUNT(*) AS cnt".to_owned()
        };

        let sql = SQL::raw(count)
            .append(from(model))
            .append(joins.join_stmt)
            .append(where_clause(predicates));

        relsql_core::relsql_trace_query!(sql.sql(), sql.param_count());
        Ok(sql)
    }

    /// The `WHERE` clause of `filter`, or an empty fragment.
    ///
    /// Without an alias, root columns are emitted bare. Relation predicates
    /// use the same aliases [`Compiler::build_joins`] assigns for this filter.
    pub fn build_where(&self, model: &str, filter: &Where, alias: Option<&str>) -> Result<MySqlSQL> {
        let model = self.registry.model(model)?;
        let mut ctx = self.context();
        let root = ctx.root(model, alias);
        let predicates = compile_where(&mut ctx, &root, filter)?;
        Ok(where_clause(predicates))
    }

    /// The `LEFT JOIN`s `filter` needs, and the aliases they introduce.
    pub fn build_joins(&self, model: &str, filter: &Where, alias: Option<&str>) -> Result<JoinResult> {
        let model = self.registry.model(model)?;
        let mut ctx = self.context();
        let root = ctx.root(model, alias);
        compile_where(&mut ctx, &root, filter)?;
        Ok(ctx.into_join_result())
    }

    /// `ORDER BY` for `order`, with the joins and extra columns it needs.
    pub fn build_order_by(
        &self,
        model: &str,
        order: &OrderSpec,
        alias: Option<&str>,
    ) -> Result<(OrderResult, JoinResult)> {
        let model = self.registry.model(model)?;
        let mut ctx = self.context();
        let root = ctx.root(model, alias);
        let order = compile_order(&mut ctx, &root, order)?;
        Ok((order, ctx.into_join_result()))
    }

    /// Comma separated, escaped column list for `fields`.
    pub fn build_column_names(
        &self,
        model: &str,
        fields: Option<&Fields>,
        alias: Option<&str>,
    ) -> Result<MySqlSQL> {
        let model = self.registry.model(model)?;
        let selected = columns::select_properties(model, fields);
        Ok(columns::column_list(&selected, alias))
    }
}

fn from(model: &ModelDefinition) -> MySqlSQL {
    SQL::raw(format!("FROM {} {ROOT_ALIAS}", escape_id(model.table_name())))
}

fn where_clause(predicates: Vec<MySqlSQL>) -> MySqlSQL {
    let predicates = SQL::join(predicates, " AND ");
    if predicates.is_empty() {
        return predicates;
    }
    SQL::raw("WHERE").append(predicates)
}

fn default_order(root: &Scope<'_>) -> Vec<MySqlSQL> {
    root.model
        .id_properties()
        .into_iter()
        .map(|key| SQL::raw(qualify(root.alias.as_deref(), key.column_name())))
        .collect()
}

/// `LIMIT n [OFFSET m]`. A limit of 0 means no limit.
fn pagination(limit: Option<u64>, offset: Option<u64>) -> MySqlSQL {
    let limit = limit.filter(|&n| n > 0);
    match (limit, offset) {
        (None, None) => SQL::empty(),
        (Some(limit), None) => SQL::raw(format!("LIMIT {limit}")),
        (limit, Some(offset)) => SQL::raw(format!(
            "LIMIT {} OFFSET {offset}",
            limit.unwrap_or(MAX_LIMIT)
        )),
    }
}
