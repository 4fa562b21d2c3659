//! Validates a parsed `Stmt` against the catalog before it reaches the
//! planner: table/column existence, projection and predicate column
//! resolution, value arity, and per-column type agreement.

#[cfg(test)]
mod tests;

use catalog::{Catalog, Column, Schema};
use common::{DbError, DbResult};
use parser::{Expr, Literal, SelectItem, Stmt};
use types::SqlType;

/// Validate `stmt` against `catalog`. On success, returns nothing new —
/// validation is a gate, not a transform; the planner re-reads the same
/// `Stmt` plus a freshly looked-up `Schema`.
pub fn analyze(stmt: &Stmt, catalog: &Catalog) -> DbResult<()> {
    match stmt {
        Stmt::Select {
            columns,
            table,
            selection,
        } => analyze_select(columns, table, selection.as_ref(), catalog),
        Stmt::Insert { table, values } => analyze_insert(table, values, catalog),
        Stmt::CreateTable {
            table,
            columns,
            primary_key: _,
        } => analyze_create_table(table, columns, catalog),
        Stmt::DropTable { table } => analyze_drop_table(table, catalog),
    }
}

fn schema_or_unknown_table<'a>(table: &str, catalog: &'a Catalog) -> DbResult<&'a Schema> {
    catalog
        .get_schema(table)
        .ok_or_else(|| DbError::Semantic(format!("unknown table: {table}")))
}

fn analyze_select(
    columns: &[SelectItem],
    table: &str,
    selection: Option<&Expr>,
    catalog: &Catalog,
) -> DbResult<()> {
    let schema = schema_or_unknown_table(table, catalog)?;

    for item in columns {
        if let SelectItem::Column(name) = item {
            if schema.column_by_name(name).is_none() {
                return Err(DbError::Semantic(format!(
                    "unknown column: {name} (table {table})"
                )));
            }
        }
    }

    if let Some(expr) = selection {
        validate_condition(expr, schema)?;
    }

    Ok(())
}

/// A `WHERE` clause is exactly one binary predicate in this core. The
/// left operand must be an existing column; the right operand, if itself
/// a column reference, is validated the same way.
fn validate_condition(expr: &Expr, schema: &Schema) -> DbResult<()> {
    match expr {
        Expr::Binary { left, right, .. } => {
            match left.as_ref() {
                Expr::ColumnRef(name) => {
                    if schema.column_by_name(name).is_none() {
                        return Err(DbError::Semantic(format!(
                            "unknown column in WHERE clause: {name}"
                        )));
                    }
                }
                other => {
                    return Err(DbError::Semantic(format!(
                        "WHERE left operand must be a column reference, got {other:?}"
                    )))
                }
            }
            if let Expr::ColumnRef(name) = right.as_ref() {
                if schema.column_by_name(name).is_none() {
                    return Err(DbError::Semantic(format!(
                        "unknown column in WHERE clause: {name}"
                    )));
                }
            }
            Ok(())
        }
        other => Err(DbError::Semantic(format!(
            "WHERE clause must be a single binary predicate, got {other:?}"
        ))),
    }
}

fn analyze_insert(table: &str, values: &[Expr], catalog: &Catalog) -> DbResult<()> {
    let schema = schema_or_unknown_table(table, catalog)?;

    if values.len() != schema.columns.len() {
        return Err(DbError::Semantic(format!(
            "column count mismatch: table {table} has {} columns, {} values given",
            schema.columns.len(),
            values.len()
        )));
    }

    for (col, expr) in schema.columns.iter().zip(values) {
        let Expr::Constant(lit) = expr else {
            return Err(DbError::Semantic(format!(
                "INSERT values must be literal constants, got {expr:?}"
            )));
        };
        validate_value(lit, col)?;
    }

    Ok(())
}

/// A `NULL` literal is admitted unconditionally: every column in this
/// core is nullable by default, since there is no `NOT NULL` constraint
/// in the grammar. `Float`/`Bool` literals never validate against
/// `INT`/`VARCHAR` — those exist purely so the parser can accept tokens
/// the grammar allows and let this stage reject them with a proper
/// type-mismatch error.
fn validate_value(lit: &Literal, col: &Column) -> DbResult<()> {
    match (lit, col.sql_type) {
        (Literal::Null, _) => Ok(()),
        (Literal::Int(_), SqlType::Int) => Ok(()),
        (Literal::Text(_), SqlType::Varchar) => Ok(()),
        _ => Err(DbError::Semantic(format!(
            "type mismatch for column {}: expected {}, got {lit:?}",
            col.name,
            col.sql_type.as_str()
        ))),
    }
}

fn analyze_create_table(
    table: &str,
    columns: &[parser::ColumnDef],
    catalog: &Catalog,
) -> DbResult<()> {
    if catalog.table_exists(table) {
        return Err(DbError::Semantic(format!("table {table} already exists")));
    }

    // `ColumnType` only ever has `Int`/`Varchar` variants, so "every
    // declared type is INT or VARCHAR" holds by construction; nothing
    // else to check here.
    let _ = columns;

    Ok(())
}

fn analyze_drop_table(table: &str, catalog: &Catalog) -> DbResult<()> {
    if !catalog.table_exists(table) {
        return Err(DbError::Semantic(format!("table {table} does not exist")));
    }
    Ok(())
}
