use super::*;
use buffer::BufferPool;
use catalog::Column;
use storage::FileManager;
use tempfile::tempdir;

fn schema(table: &str) -> Schema {
    Schema::new(
        table,
        vec![Column::int("id"), Column::varchar("name", 8)],
        Some("id".to_string()),
    )
}

fn engine(capacity: usize) -> (StorageEngine, tempfile::TempDir) {
    let dir = tempdir().unwrap();
    let fm = FileManager::new(dir.path());
    (StorageEngine::new(BufferPool::new(fm, capacity)), dir)
}

#[test]
fn serialize_then_deserialize_round_trips_non_collision_values() {
    let schema = schema("t");
    let values = vec![Value::Int(7), Value::Text("alice".into())];
    let bytes = serialize_record(&schema, &values);
    assert_eq!(bytes.len(), schema.record_size());
    assert_eq!(deserialize_record(&schema, &bytes).into_values(), values);
}

#[test]
fn all_zero_field_decodes_as_null() {
    let schema = schema("t");
    let values = vec![Value::Int(0), Value::Text(String::new())];
    let bytes = serialize_record(&schema, &values);
    let row = deserialize_record(&schema, &bytes);
    assert_eq!(row.values(), &[Value::Null, Value::Null]);
}

#[test]
fn varchar_truncates_to_declared_length() {
    let schema = Schema::new("t", vec![Column::varchar("s", 3)], None);
    let bytes = serialize_record(&schema, &[Value::Text("abcdef".into())]);
    let row = deserialize_record(&schema, &bytes);
    assert_eq!(row.values(), &[Value::Text("abc".into())]);
}

#[test]
fn insert_and_scan_round_trip_in_order() {
    let (mut engine, _dir) = engine(10);
    let schema = schema("users");
    engine.create_table("users").unwrap();

    engine
        .insert_record(&schema, &[Value::Int(1), Value::Text("alice".into())])
        .unwrap();
    engine
        .insert_record(&schema, &[Value::Int(2), Value::Text("bob".into())])
        .unwrap();

    let rows = engine.scan_records(&schema).unwrap();
    assert_eq!(
        rows,
        vec![
            Row::new(vec![Value::Int(1), Value::Text("alice".into())]),
            Row::new(vec![Value::Int(2), Value::Text("bob".into())]),
        ]
    );
}

#[test]
fn insert_allocates_new_page_once_current_page_is_full() {
    let (mut engine, _dir) = engine(10);
    let schema = Schema::new("t", vec![Column::varchar("s", 3000)], None);
    engine.create_table("t").unwrap();

    // record_size ~3000 bytes; only one fits in a 4096-byte page's 4088
    // usable bytes, forcing a new page for every subsequent insert.
    for i in 0..3 {
        engine
            .insert_record(&schema, &[Value::Text(format!("r{i}"))])
            .unwrap();
    }

    let page_count = engine
        .buffer_pool
        .file_manager()
        .get_page_count("t")
        .unwrap();
    assert!(page_count >= 2, "expected spillover to a second page, got {page_count}");

    let rows = engine.scan_records(&schema).unwrap();
    assert_eq!(rows.len(), 3);
}

#[test]
fn drop_table_purges_buffer_pool_and_deletes_file() {
    let (mut engine, _dir) = engine(10);
    let schema = schema("t");
    engine.create_table("t").unwrap();
    engine
        .insert_record(&schema, &[Value::Int(1), Value::Text("a".into())])
        .unwrap();

    assert!(engine.drop_table("t").unwrap());
    assert_eq!(
        engine.buffer_pool.file_manager().get_page_count("t").unwrap(),
        0
    );
}
