//! AST -> Query Plan.
//!
//! This is deliberately not a multi-stage logical/physical optimizer:
//! there is nothing in this core's grammar to push down, reorder, or
//! cost. One `Stmt` shape lowers to exactly one `Plan` shape, carrying
//! the already-validated fields plus (for `Select`/`Insert`) the
//! resolved `Schema` the executor needs to serialize and decode records.


use catalog::{Catalog, Column, Schema};
use common::{DbError, DbResult};
use parser::{ColumnType, Expr, Literal, SelectItem, Stmt};

/// Which of the four statement shapes a `Plan` was lowered from. Kept as
/// a distinct type (rather than matching the `Plan` variant directly)
/// because the source this is ported from tags its plan nodes with an
/// explicit `plan_type` field alongside their detail bag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlanType {
    Select,
    Insert,
    CreateTable,
    DropTable,
}

/// The executor's input: one of four variants, each carrying the fields
/// semantic analysis already validated.
#[derive(Clone, Debug, PartialEq)]
pub enum Plan {
    Select {
        table: String,
        schema: Schema,
        columns: Vec<SelectItem>,
        selection: Option<Expr>,
    },
    Insert {
        table: String,
        schema: Schema,
        values: Vec<Literal>,
    },
    CreateTable {
        table: String,
        columns: Vec<Column>,
        primary_key: Option<String>,
    },
    DropTable {
        table: String,
    },
}

impl Plan {
    pub fn plan_type(&self) -> PlanType {
        match self {
            Plan::Select { .. } => PlanType::Select,
            Plan::Insert { .. } => PlanType::Insert,
            Plan::CreateTable { .. } => PlanType::CreateTable,
            Plan::DropTable { .. } => PlanType::DropTable,
        }
    }
}

/// Lower a (semantically validated) `Stmt` into a `Plan`. Schema lookups
/// here are expected to always succeed: the semantic analyzer already
/// confirmed table existence for every variant that needs one. A lookup
/// failure surfaces as a planner error rather than panicking, in case
/// this is ever called without having run analysis first.
pub fn plan(stmt: Stmt, catalog: &Catalog) -> DbResult<Plan> {
    match stmt {
        Stmt::Select {
            columns,
            table,
            selection,
        } => {
            let schema = resolved_schema(&table, catalog)?;
            Ok(Plan::Select {
                table,
                schema,
                columns,
                selection,
            })
        }
        Stmt::Insert { table, values } => {
            let schema = resolved_schema(&table, catalog)?;
            let values = values
                .into_iter()
                .map(|expr| match expr {
                    Expr::Constant(lit) => Ok(lit),
                    other => Err(DbError::Planner(format!(
                        "INSERT value must be a literal constant, got {other:?}"
                    ))),
                })
                .collect::<DbResult<Vec<_>>>()?;
            Ok(Plan::Insert {
                table,
                schema,
                values,
            })
        }
        Stmt::CreateTable {
            table,
            columns,
            primary_key,
        } => {
            let columns = columns
                .into_iter()
                .map(|c| match c.sql_type {
                    ColumnType::Int => Column::int(c.name),
                    ColumnType::Varchar(len) => Column::varchar(c.name, len),
                })
                .collect();
            Ok(Plan::CreateTable {
                table,
                columns,
                primary_key,
            })
        }
        Stmt::DropTable { table } => Ok(Plan::DropTable { table }),
    }
}

fn resolved_schema(table: &str, catalog: &Catalog) -> DbResult<Schema> {
    catalog
        .get_schema(table)
        .cloned()
        .ok_or_else(|| DbError::Planner(format!("no schema resolved for table {table}")))
}
