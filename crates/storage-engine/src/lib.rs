//! Record-level facade combining the `BufferPool`, `FileManager`, and the
//! schema-aware serialization that turns a `Row` of `Value`s into a
//! fixed-width record and back.
//!
//! Everything below `StorageEngine` (the buffer pool, the page, the file
//! manager) is schema-agnostic; this is the one layer that knows how a
//! `catalog::Schema` maps to bytes.

#[cfg(test)]
mod tests;

use buffer::BufferPool;
use catalog::Schema;
use common::{decode_rid, encode_rid, DbError, DbResult, PageId, Row};
use types::{SqlType, Value};

/// Encode one row's values into the fixed-width byte layout its schema
/// describes. A `None`/`Null` value zero-fills its column's width; a
/// value whose runtime type doesn't match its column's declared type is
/// also zero-filled rather than rejected here (arity/type checking is the
/// semantic analyzer's and executor's job, not this layer's).
pub fn serialize_record(schema: &Schema, values: &[Value]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(schema.record_size());
    for (col, value) in schema.columns.iter().zip(values) {
        let width = col.type_size();
        match (col.sql_type, value) {
            (_, Value::Null) => buf.extend(std::iter::repeat_n(0u8, width)),
            (SqlType::Int, Value::Int(v)) => buf.extend_from_slice(&v.to_be_bytes()),
            (SqlType::Varchar, Value::Text(s)) => {
                let bytes = s.as_bytes();
                let take = bytes.len().min(width);
                buf.extend_from_slice(&bytes[..take]);
                buf.extend(std::iter::repeat_n(0u8, width - take));
            }
            _ => buf.extend(std::iter::repeat_n(0u8, width)),
        }
    }
    buf
}

/// Decode a fixed-width record back into a `Row`. An all-zero field (or a
/// field that would run past a short read) decodes as `NULL` — this is
/// the documented collision with a genuine zero/empty value (see
/// DESIGN.md), not a bug introduced here.
pub fn deserialize_record(schema: &Schema, bytes: &[u8]) -> Row {
    let mut values = Vec::with_capacity(schema.columns.len());
    let mut offset = 0;
    for col in &schema.columns {
        let width = col.type_size();
        let slice = bytes.get(offset..offset + width);
        offset += width;

        let Some(slice) = slice else {
            values.push(Value::Null);
            continue;
        };
        if slice.iter().all(|&b| b == 0) {
            values.push(Value::Null);
            continue;
        }

        let value = match col.sql_type {
            SqlType::Int => Value::Int(i32::from_be_bytes(slice.try_into().unwrap())),
            SqlType::Varchar => {
                let end = slice.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
                Value::Text(String::from_utf8_lossy(&slice[..end]).into_owned())
            }
        };
        values.push(value);
    }
    Row::new(values)
}

/// The record-level API the executor drives: table lifecycle, insert, and
/// full-table scan, all expressed in terms of a `catalog::Schema` rather
/// than raw bytes.
pub struct StorageEngine {
    buffer_pool: BufferPool,
}

impl StorageEngine {
    pub fn new(buffer_pool: BufferPool) -> Self {
        Self { buffer_pool }
    }

    pub fn create_table(&self, name: &str) -> DbResult<bool> {
        self.buffer_pool.file_manager().create_file(name)
    }

    /// Purge every resident page for `name` from the buffer pool (flushing
    /// dirty ones first, even though the file is about to disappear), then
    /// delete the table's file.
    pub fn drop_table(&mut self, name: &str) -> DbResult<bool> {
        self.buffer_pool.purge_table(name)?;
        self.buffer_pool.file_manager().delete_file(name)
    }

    /// Serialize `values` against `schema` and append them to the first
    /// page with room, allocating a new page if none has space. Returns
    /// the encoded `(page_id, record_id)` identifier, or `None` if
    /// allocation itself failed.
    pub fn insert_record(&mut self, schema: &Schema, values: &[Value]) -> DbResult<Option<i32>> {
        let record_bytes = serialize_record(schema, values);
        let record_size = schema.record_size();
        let table = schema.table_name.as_str();

        let page_count = self.buffer_pool.file_manager().get_page_count(table)?;
        for page_id in 0..page_count {
            let Some(page) = self.buffer_pool.pin_page_mut(table, page_id)? else {
                continue;
            };
            if !page.has_free_space(record_size) {
                self.buffer_pool.unpin_page(table, page_id, false)?;
                continue;
            }
            let record_id = page.insert_record(&record_bytes);
            self.buffer_pool.unpin_page(table, page_id, true)?;
            return Ok(record_id.map(|rid| encode_rid(page_id, rid)));
        }

        let Some(page) = self.buffer_pool.allocate_page(table)? else {
            return Ok(None);
        };
        let new_page_id = page.page_id;
        let record_id = page.insert_record(&record_bytes);
        self.buffer_pool
            .unpin_page(table, new_page_id, true)?;
        Ok(record_id.map(|rid| encode_rid(new_page_id, rid)))
    }

    /// Decode every record of `schema`'s table, in page/record order.
    /// Collected eagerly into a `Vec`: this core has no open cursors or
    /// concurrent writers to race against, so there is nothing a lazy
    /// iterator would buy beyond deferred I/O.
    pub fn scan_records(&mut self, schema: &Schema) -> DbResult<Vec<Row>> {
        let table = schema.table_name.as_str();
        let record_size = schema.record_size();
        let page_count = self.buffer_pool.file_manager().get_page_count(table)?;

        let mut rows = Vec::new();
        for page_id in 0..page_count {
            let Some(page) = self.buffer_pool.pin_page(table, page_id)? else {
                return Err(DbError::Execution(format!(
                    "corrupted table {table}: page {page_id} missing within page_count {page_count}"
                )));
            };
            let num_records = page.num_records();
            for record_id in 0..num_records {
                let bytes = page.get_record(record_id, record_size).ok_or_else(|| {
                    DbError::Execution(format!(
                        "corrupted page read: table {table} page {page_id} record {record_id}"
                    ))
                })?;
                rows.push(deserialize_record(schema, bytes));
            }
            self.buffer_pool.unpin_page(table, page_id, false)?;
        }
        Ok(rows)
    }

    pub fn flush_all(&mut self) -> DbResult<()> {
        self.buffer_pool.flush_all()
    }

    /// Exposed so the database facade can hand a page-level record
    /// identifier to a caller that needs to decode it (not used by the
    /// core SQL surface, which never echoes a rid back to the user, but
    /// kept as a thin public wrapper around the shared helper).
    pub fn decode_record_id(rid: i32) -> (PageId, i32) {
        decode_rid(rid)
    }
}
