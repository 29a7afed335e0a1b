//! The filter walk: one pass emits joins (into the context) and predicates.

use relsql_core::filter::{Clause, Expr, Where};
use relsql_core::{Result, SQL};

use crate::context::{CompileContext, Scope};
use crate::{MySqlSQL, conditions};

/// Compiles `filter` in `scope`, returning the predicates to be ANDed.
pub(crate) fn compile_where<'r>(
    ctx: &mut CompileContext<'r>,
    scope: &Scope<'r>,
    filter: &Where,
) -> Result<Vec<MySqlSQL>> {
    let mut predicates = Vec::new();

    for clause in &filter.clauses {
        match clause {
            Clause::And(branches) => {
                if let Some(group) = compile_group(ctx, scope, branches, " AND ")? {
                    predicates.push(group);
                }
            }
            Clause::Or(branches) => {
                if let Some(group) = compile_group(ctx, scope, branches, " OR ")? {
                    predicates.push(group);
                }
            }
            Clause::Key { key, expr } => {
                compile_key(ctx, scope, key, expr, &mut predicates)?;
            }
        }
    }

    Ok(predicates)
}

/// `(branch OP branch ...)`; `None` when every branch compiled to nothing.
fn compile_group<'r>(
    ctx: &mut CompileContext<'r>,
    scope: &Scope<'r>,
    branches: &[Where],
    separator: &'static str,
) -> Result<Option<MySqlSQL>> {
    let mut parts = Vec::with_capacity(branches.len());
    for branch in branches {
        let mut predicates = compile_where(ctx, scope, branch)?;
        match predicates.len() {
            0 => {}
            1 => parts.extend(predicates.pop()),
            _ => parts.push(SQL::join(predicates, " AND ").parens()),
        }
    }

    if parts.is_empty() {
        return Ok(None);
    }
    Ok(Some(SQL::join(parts, separator).parens()))
}

fn compile_key<'r>(
    ctx: &mut CompileContext<'r>,
    scope: &Scope<'r>,
    key: &str,
    expr: &Expr,
    predicates: &mut Vec<MySqlSQL>,
) -> Result<()> {
    let model = scope.model;

    // "project.client.name": value  ==  project: { "client.name": value }
    if let Some((head, rest)) = key.split_once('.') {
        let Some(relation) = model.get_relation(head) else {
            return ctx.unknown_relation(&model.name, head);
        };
        let child = ctx.join_relation(scope, relation)?;
        return compile_key(ctx, &child, rest, expr, predicates);
    }

    if let Some(property) = model.get_property(key) {
        let column = scope.column(key);
        match expr {
            Expr::Value(value) => {
                predicates.push(conditions::eq(
                    &column,
                    crate::MySqlValue::coerce(value, property.kind),
                ));
            }
            Expr::Operator { op, value, options } => {
                predicates.push(conditions::predicate(
                    &column,
                    *op,
                    value,
                    options.as_ref(),
                    property.kind,
                ));
            }
            Expr::Nested(_) => {
                ctx.unusable(&model.name, key, "expected a value or an operator")?;
            }
        }
        return Ok(());
    }

    // the join is emitted even when the value is unusable
    if let Some(relation) = model.get_relation(key) {
        let child = ctx.join_relation(scope, relation)?;
        let Expr::Nested(inner) = expr else {
            return ctx.unusable(&model.name, key, "relation filter must be an object");
        };
        predicates.extend(compile_where(ctx, &child, inner)?);
        return Ok(());
    }

    ctx.unknown_property(&model.name, key)
}
