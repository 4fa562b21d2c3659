//! Plan interpretation against the storage layer: the last stage of the
//! `Lexer -> Parser -> Semantic Analyzer -> Planner -> Executor` pipeline.
//!
//! The executor re-validates `INSERT` arity/types against the resolved
//! schema rather than trusting the semantic analyzer blindly, and
//! `SELECT` projection defensively drops any column name that doesn't
//! resolve — both are intentional belt-and-suspenders, matching the
//! source's own redundant defensiveness rather than trusting a single
//! upstream check.

#[cfg(test)]
mod tests;

use catalog::{Catalog, Column, Schema};
use common::{DbError, DbResult, Row};
use parser::{BinaryOp, Expr, Literal, SelectItem};
use planner::Plan;
use std::cmp::Ordering;
use storage_engine::StorageEngine;
use types::{SqlType, Value};

/// The Result ABI handed back to whatever submitted the SQL string.
/// `SELECT` returns row tuples, `INSERT` an affected-row count (always 1
/// on success), `CREATE`/`DROP` a success boolean.
#[derive(Clone, Debug, PartialEq)]
pub enum ExecResult {
    Rows(Vec<Row>),
    Affected(i64),
    Success(bool),
}

/// Run one validated `Plan` to completion.
pub fn execute(
    plan: Plan,
    catalog: &mut Catalog,
    storage: &mut StorageEngine,
) -> DbResult<ExecResult> {
    match plan {
        Plan::CreateTable {
            table,
            columns,
            primary_key,
        } => execute_create_table(&table, columns, primary_key, catalog, storage),
        Plan::Insert {
            table,
            schema,
            values,
        } => execute_insert(&table, &schema, values, storage),
        Plan::Select {
            table: _,
            schema,
            columns,
            selection,
        } => execute_select(&schema, &columns, selection.as_ref(), storage),
        Plan::DropTable { table } => execute_drop_table(&table, catalog, storage),
    }
}

fn execute_create_table(
    table: &str,
    columns: Vec<Column>,
    primary_key: Option<String>,
    catalog: &mut Catalog,
    storage: &mut StorageEngine,
) -> DbResult<ExecResult> {
    match catalog.create_table(table, columns, primary_key) {
        Ok(()) => {
            storage.create_table(table)?;
            Ok(ExecResult::Success(true))
        }
        // Already validated by the semantic analyzer in normal use; a
        // conflict reaching here becomes a plan-false rather than an
        // error, matching the source's `create_table` boolean return.
        Err(DbError::Semantic(_)) => Ok(ExecResult::Success(false)),
        Err(other) => Err(other),
    }
}

fn execute_drop_table(
    table: &str,
    catalog: &mut Catalog,
    storage: &mut StorageEngine,
) -> DbResult<ExecResult> {
    // Storage-level failure is non-fatal here: the catalog mutation is
    // what the caller observes (§4.9), not whether the on-disk file was
    // cleanly removed.
    let _ = storage.drop_table(table);
    let success = catalog.drop_table(table).is_ok();
    Ok(ExecResult::Success(success))
}

fn execute_insert(
    table: &str,
    schema: &Schema,
    values: Vec<Literal>,
    storage: &mut StorageEngine,
) -> DbResult<ExecResult> {
    if values.len() != schema.columns.len() {
        return Err(DbError::Semantic(format!(
            "column count mismatch: table {table} has {} columns, {} values given",
            schema.columns.len(),
            values.len()
        )));
    }

    let typed = schema
        .columns
        .iter()
        .zip(values.iter())
        .map(|(col, lit)| validate_and_convert(lit, col))
        .collect::<DbResult<Vec<_>>>()?;

    let rid = storage.insert_record(schema, &typed)?;
    if rid.is_none() {
        return Err(DbError::Execution(format!(
            "insert into {table} failed: no page had room and allocation failed"
        )));
    }

    Ok(ExecResult::Affected(1))
}

/// `NULL` is admitted against any column (every column is nullable; this
/// core has no `NOT NULL` constraint). `Float`/`Bool` literals never
/// match `INT`/`VARCHAR`.
fn validate_and_convert(lit: &Literal, col: &Column) -> DbResult<Value> {
    match (lit, col.sql_type) {
        (Literal::Null, _) => Ok(Value::Null),
        (Literal::Int(v), SqlType::Int) => Ok(Value::Int(*v)),
        (Literal::Text(s), SqlType::Varchar) => Ok(Value::Text(s.clone())),
        _ => Err(DbError::Semantic(format!(
            "type mismatch for column {}: expected {}, got {lit:?}",
            col.name,
            col.sql_type.as_str()
        ))),
    }
}

fn execute_select(
    schema: &Schema,
    columns: &[SelectItem],
    selection: Option<&Expr>,
    storage: &mut StorageEngine,
) -> DbResult<ExecResult> {
    let rows = storage.scan_records(schema)?;
    let mut out = Vec::new();
    for row in rows {
        let keep = match selection {
            Some(expr) => eval_predicate(expr, &row, schema),
            None => true,
        };
        if keep {
            out.push(project_row(&row, schema, columns));
        }
    }
    Ok(ExecResult::Rows(out))
}

/// A `WHERE` clause is exactly one binary predicate in this core. A
/// `NULL` operand, or a comparison between incompatible types, yields
/// `false` (two-valued logic, a simplification from SQL's usual
/// three-valued `NULL` handling).
fn eval_predicate(expr: &Expr, row: &Row, schema: &Schema) -> bool {
    let Expr::Binary { left, op, right } = expr else {
        return false;
    };
    let (Some(l), Some(r)) = (
        resolve_operand(left, row, schema),
        resolve_operand(right, row, schema),
    ) else {
        return false;
    };
    compare(&l, *op, &r)
}

fn resolve_operand(expr: &Expr, row: &Row, schema: &Schema) -> Option<Value> {
    match expr {
        Expr::ColumnRef(name) => schema
            .column_index(name)
            .and_then(|idx| row.values().get(idx))
            .cloned(),
        Expr::Constant(lit) => lit.to_value(),
        Expr::Binary { .. } => None,
    }
}

fn compare(left: &Value, op: BinaryOp, right: &Value) -> bool {
    if matches!(left, Value::Null) || matches!(right, Value::Null) {
        return false;
    }
    match op {
        BinaryOp::Eq => left.eq_same_type(right).unwrap_or(false),
        BinaryOp::Ne => left.eq_same_type(right).map(|eq| !eq).unwrap_or(false),
        BinaryOp::Lt => left
            .cmp_same_type(right)
            .map(|ord| ord == Ordering::Less)
            .unwrap_or(false),
        BinaryOp::Le => left
            .cmp_same_type(right)
            .map(|ord| ord != Ordering::Greater)
            .unwrap_or(false),
        BinaryOp::Gt => left
            .cmp_same_type(right)
            .map(|ord| ord == Ordering::Greater)
            .unwrap_or(false),
        BinaryOp::Ge => left
            .cmp_same_type(right)
            .map(|ord| ord != Ordering::Less)
            .unwrap_or(false),
    }
}

/// Project `row` per `columns`: every column for a wildcard, or the
/// named subset in the order listed. A name that doesn't resolve is
/// silently dropped rather than erroring — a defensive fallback for a
/// plan that reached here without having passed semantic analysis.
fn project_row(row: &Row, schema: &Schema, columns: &[SelectItem]) -> Row {
    if columns.iter().any(|c| matches!(c, SelectItem::Wildcard)) {
        return row.clone();
    }
    let mut out = Vec::with_capacity(columns.len());
    for item in columns {
        if let SelectItem::Column(name) = item {
            if let Some(idx) = schema.column_index(name) {
                if let Some(value) = row.values().get(idx) {
                    out.push(value.clone());
                }
            }
        }
    }
    Row::new(out)
}
