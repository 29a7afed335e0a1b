use relsql_core::{OrderSpec, Result, SQL};

use crate::MySqlSQL;
use crate::context::{CompileContext, Scope};
use crate::escape::escape_id;

/// Compiled `order`: sort terms plus the extra select columns they need
/// under `SELECT DISTINCT`.
///
/// `columns` are always selected. `root_columns` are keyed by property and
/// only selected when the property is not already in the select list.
#[derive(Debug, Clone, Default)]
pub struct OrderResult {
    pub terms: Vec<MySqlSQL>,
    pub columns: Vec<MySqlSQL>,
    pub root_columns: Vec<(String, MySqlSQL)>,
}

impl OrderResult {
    /// `ORDER BY a, b`, or nothing.
    pub fn order_by(&self) -> MySqlSQL {
        if self.terms.is_empty() {
            return SQL::empty();
        }
        SQL::raw("ORDER BY").append(SQL::join(&self.terms, ", "))
    }
}

pub(crate) fn compile_order<'r>(
    ctx: &mut CompileContext<'r>,
    root: &Scope<'r>,
    spec: &OrderSpec,
) -> Result<OrderResult> {
    let mut result = OrderResult::default();

    for rejected in &spec.rejected {
        ctx.unusable(&root.model.name, rejected, "invalid order term")?;
    }

    'terms: for term in &spec.terms {
        let mut scope = root.clone();
        for name in term.relations() {
            let Some(relation) = scope.model.get_relation(name) else {
                ctx.unknown_relation(&scope.model.name, name)?;
                continue 'terms;
            };
            scope = ctx.join_relation(&scope, relation)?;
        }

        let property = term.property();
        if scope.model.get_property(property).is_none() {
            ctx.unknown_property(&scope.model.name, property)?;
            continue;
        }

        let column = scope.column(property);
        let sql = match term.direction {
            Some(direction) => format!("{column} {direction}"),
            None => column.clone(),
        };
        result.terms.push(SQL::raw(sql));

        let alias = scope.alias.as_deref().unwrap_or_default();
        let extra: MySqlSQL = SQL::raw(format!(
            "{column} AS {}",
            escape_id(&format!("{alias}_orderBy{property}"))
        ));
        if term.is_related() {
            if !result.columns.contains(&extra) {
                result.columns.push(extra);
            }
        } else if !result.root_columns.iter().any(|(name, _)| name == property) {
            result.root_columns.push((property.to_owned(), extra));
        }
    }

    Ok(result)
}
