use super::*;
use buffer::BufferPool;
use parser::parse;
use semantic::analyze;
use storage::FileManager;
use tempfile::tempdir;

fn setup(capacity: usize) -> (Catalog, StorageEngine, tempfile::TempDir) {
    let dir = tempdir().unwrap();
    let catalog = Catalog::load(dir.path()).unwrap();
    let fm = FileManager::new(dir.path());
    let storage = StorageEngine::new(BufferPool::new(fm, capacity));
    (catalog, storage, dir)
}

fn run(sql: &str, catalog: &mut Catalog, storage: &mut StorageEngine) -> DbResult<ExecResult> {
    let stmt = parse(sql).unwrap();
    analyze(&stmt, catalog).unwrap();
    let plan = planner::plan(stmt, catalog).unwrap();
    execute(plan, catalog, storage)
}

#[test]
fn create_insert_select_round_trip_in_order() {
    let (mut catalog, mut storage, _dir) = setup(10);

    assert_eq!(
        run(
            "CREATE TABLE users (id INT PRIMARY KEY, name VARCHAR(16))",
            &mut catalog,
            &mut storage
        )
        .unwrap(),
        ExecResult::Success(true)
    );
    assert_eq!(
        run(
            "INSERT INTO users VALUES (1, 'alice')",
            &mut catalog,
            &mut storage
        )
        .unwrap(),
        ExecResult::Affected(1)
    );
    assert_eq!(
        run(
            "INSERT INTO users VALUES (2, 'bob')",
            &mut catalog,
            &mut storage
        )
        .unwrap(),
        ExecResult::Affected(1)
    );

    let ExecResult::Rows(rows) = run("SELECT * FROM users", &mut catalog, &mut storage).unwrap()
    else {
        panic!("expected Rows");
    };
    assert_eq!(
        rows,
        vec![
            Row::new(vec![Value::Int(1), Value::Text("alice".into())]),
            Row::new(vec![Value::Int(2), Value::Text("bob".into())]),
        ]
    );
}

#[test]
fn projection_and_predicate() {
    let (mut catalog, mut storage, _dir) = setup(10);
    run(
        "CREATE TABLE users (id INT PRIMARY KEY, name VARCHAR(16))",
        &mut catalog,
        &mut storage,
    )
    .unwrap();
    run("INSERT INTO users VALUES (1, 'alice')", &mut catalog, &mut storage).unwrap();
    run("INSERT INTO users VALUES (2, 'bob')", &mut catalog, &mut storage).unwrap();

    let ExecResult::Rows(rows) = run(
        "SELECT name FROM users WHERE id = 2",
        &mut catalog,
        &mut storage,
    )
    .unwrap() else {
        panic!("expected Rows");
    };
    assert_eq!(rows, vec![Row::new(vec![Value::Text("bob".into())])]);
}

#[test]
fn varchar_truncates_on_insert() {
    let (mut catalog, mut storage, _dir) = setup(10);
    run("CREATE TABLE t (s VARCHAR(3))", &mut catalog, &mut storage).unwrap();
    run("INSERT INTO t VALUES ('abcdef')", &mut catalog, &mut storage).unwrap();

    let ExecResult::Rows(rows) = run("SELECT * FROM t", &mut catalog, &mut storage).unwrap()
    else {
        panic!("expected Rows");
    };
    assert_eq!(rows, vec![Row::new(vec![Value::Text("abc".into())])]);
}

#[test]
fn create_table_conflict_returns_success_false() {
    let (mut catalog, mut storage, _dir) = setup(10);
    run("CREATE TABLE t (id INT)", &mut catalog, &mut storage).unwrap();

    let plan = planner::plan(
        parser::Stmt::CreateTable {
            table: "t".into(),
            columns: vec![parser::ColumnDef {
                name: "id".into(),
                sql_type: parser::ColumnType::Int,
                primary_key: false,
            }],
            primary_key: None,
        },
        &catalog,
    )
    .unwrap();
    assert_eq!(
        execute(plan, &mut catalog, &mut storage).unwrap(),
        ExecResult::Success(false)
    );
}

#[test]
fn drop_table_removes_catalog_entry_and_file() {
    let (mut catalog, mut storage, _dir) = setup(10);
    run("CREATE TABLE t (id INT)", &mut catalog, &mut storage).unwrap();
    assert_eq!(
        run("DROP TABLE t", &mut catalog, &mut storage).unwrap(),
        ExecResult::Success(true)
    );
    assert!(!catalog.table_exists("t"));
}

#[test]
fn null_values_round_trip_as_null() {
    let (mut catalog, mut storage, _dir) = setup(10);
    run(
        "CREATE TABLE t (id INT, s VARCHAR(4))",
        &mut catalog,
        &mut storage,
    )
    .unwrap();
    run("INSERT INTO t VALUES (NULL, NULL)", &mut catalog, &mut storage).unwrap();

    let ExecResult::Rows(rows) = run("SELECT * FROM t", &mut catalog, &mut storage).unwrap()
    else {
        panic!("expected Rows");
    };
    assert_eq!(rows, vec![Row::new(vec![Value::Null, Value::Null])]);
}

#[test]
fn where_clause_against_null_is_false() {
    // Int value 0 collides with NULL on decode (documented collision);
    // exercise that the predicate treats it as NULL, not as 0.
    let (mut catalog, mut storage, _dir) = setup(10);
    run("CREATE TABLE t (id INT)", &mut catalog, &mut storage).unwrap();
    run("INSERT INTO t VALUES (0)", &mut catalog, &mut storage).unwrap();

    let ExecResult::Rows(rows) = run("SELECT * FROM t WHERE id = 0", &mut catalog, &mut storage)
        .unwrap()
    else {
        panic!("expected Rows");
    };
    assert!(rows.is_empty());
}

#[test]
fn unknown_projected_column_is_dropped_defensively() {
    let (mut catalog, mut storage, _dir) = setup(10);
    run("CREATE TABLE t (id INT)", &mut catalog, &mut storage).unwrap();
    run("INSERT INTO t VALUES (1)", &mut catalog, &mut storage).unwrap();

    // Bypass semantic analysis to exercise the executor's own defensive
    // filter directly: a plan asking for a nonexistent column still
    // returns a row, just with that column silently absent.
    let plan = planner::Plan::Select {
        table: "t".into(),
        schema: catalog.get_schema("t").unwrap().clone(),
        columns: vec![parser::SelectItem::Column("ghost".into())],
        selection: None,
    };
    let ExecResult::Rows(rows) = execute(plan, &mut catalog, &mut storage).unwrap() else {
        panic!("expected Rows");
    };
    assert_eq!(rows, vec![Row::new(vec![])]);
}
