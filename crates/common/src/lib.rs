
use serde::{Deserialize, Serialize};
use std::io;
use std::path::PathBuf;
use thiserror::Error;
use types::Value;

/// Identifier of a page within a single table's file. Not globally unique;
/// always interpreted together with a table name.
pub type PageId = i32;

/// Ordinal of a record within a page (its position among that page's
/// fixed-width slots, not a byte offset).
pub type RecordId = i32;

/// Packs a `(page_id, record_id)` pair into the 32-bit record identifier
/// returned by insert. Constrains `record_id < 2^16` per page.
///
/// # Example
/// ```
/// use common::{encode_rid, decode_rid};
/// let rid = encode_rid(3, 7);
/// assert_eq!(decode_rid(rid), (3, 7));
/// ```
pub fn encode_rid(page_id: PageId, record_id: RecordId) -> i32 {
    (page_id << 16) | (record_id & 0xFFFF)
}

pub fn decode_rid(rid: i32) -> (PageId, RecordId) {
    (rid >> 16, rid & 0xFFFF)
}

/// One decoded row, positional and aligned with its schema's column order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row(pub Vec<Value>);

impl Row {
    pub fn new(values: Vec<Value>) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[Value] {
        &self.0
    }

    pub fn into_values(self) -> Vec<Value> {
        self.0
    }
}

impl From<Vec<Value>> for Row {
    fn from(values: Vec<Value>) -> Self {
        Row(values)
    }
}

/// Canonical error type shared across every database subsystem.
///
/// Every fallible public function in this workspace returns `DbResult<T>`;
/// there is no subsystem-local error type.
#[derive(Error, Debug)]
pub enum DbError {
    /// Unrecognized character during lexing.
    #[error("lex error: {0}")]
    Lex(String),
    /// Token mismatch with expected grammar.
    #[error("syntax error: {0}")]
    Syntax(String),
    /// Unknown table/column, type mismatch, arity mismatch, duplicate
    /// table, missing table, unsupported column type.
    #[error("semantic error: {0}")]
    Semantic(String),
    /// Planner-level failure (should be unreachable once semantic
    /// analysis has passed, retained for defense in depth).
    #[error("plan error: {0}")]
    Planner(String),
    /// Insert failure, corrupted page read, and other executor-level
    /// failures.
    #[error("execution error: {0}")]
    Execution(String),
    /// File-not-found, size-mismatch write, and other I/O-adjacent
    /// storage failures not covered by `io::Error` directly.
    #[error("storage error: {0}")]
    Storage(String),
    /// Eviction impossible: every resident page is pinned.
    #[error("buffer error: {0}")]
    Buffer(String),
    /// Catalog read/write failure.
    #[error("catalog error: {0}")]
    Catalog(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type DbResult<T> = Result<T, DbError>;

/// Runtime configuration for the database components.
///
/// # Example
/// ```
/// use common::Config;
/// use std::path::PathBuf;
///
/// let config = Config::builder()
///     .data_dir(PathBuf::from("./my_db"))
///     .buffer_pool_pages(256)
///     .build();
/// ```
#[derive(Clone, Debug, Serialize, Deserialize, bon::Builder)]
pub struct Config {
    /// Directory where table files and `catalog.json` live.
    #[builder(default = PathBuf::from("./db_data"))]
    pub data_dir: PathBuf,
    /// Fixed page size in bytes. Overriding this away from 4096 is
    /// unsupported by the on-disk layout; the field exists so `Config`
    /// documents the constant rather than hiding it.
    #[builder(default = 4096)]
    pub page_size: usize,
    /// Number of pages the buffer pool keeps resident per table.
    #[builder(default = 100)]
    pub buffer_pool_pages: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./db_data"),
            page_size: 4096,
            buffer_pool_pages: 100,
        }
    }
}

/// Convenient re-exports for downstream crates.
pub mod prelude {
    pub use crate::{decode_rid, encode_rid, Config, DbError, DbResult, PageId, RecordId, Row};
    pub use types::{SqlType, Value};
}
