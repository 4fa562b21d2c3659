use super::*;
use catalog::Column;
use parser::parse;
use tempfile::tempdir;

fn catalog_with_users() -> Catalog {
    let dir = tempdir().unwrap();
    let mut catalog = Catalog::load(dir.path()).unwrap();
    catalog
        .create_table(
            "users",
            vec![Column::int("id"), Column::varchar("name", 16)],
            Some("id".to_string()),
        )
        .unwrap();
    catalog
}

#[test]
fn select_against_unknown_table_is_semantic_error() {
    let catalog = catalog_with_users();
    let stmt = parse("SELECT * FROM ghosts").unwrap();
    let err = analyze(&stmt, &catalog).unwrap_err();
    assert!(matches!(err, DbError::Semantic(_)));
}

#[test]
fn select_unknown_projected_column_is_semantic_error() {
    let catalog = catalog_with_users();
    let stmt = parse("SELECT age FROM users").unwrap();
    assert!(analyze(&stmt, &catalog).is_err());
}

#[test]
fn select_star_with_valid_predicate_passes() {
    let catalog = catalog_with_users();
    let stmt = parse("SELECT * FROM users WHERE id = 2").unwrap();
    assert!(analyze(&stmt, &catalog).is_ok());
}

#[test]
fn select_predicate_on_unknown_column_is_semantic_error() {
    let catalog = catalog_with_users();
    let stmt = parse("SELECT * FROM users WHERE age = 2").unwrap();
    assert!(analyze(&stmt, &catalog).is_err());
}

#[test]
fn insert_arity_mismatch_is_semantic_error() {
    let catalog = catalog_with_users();
    let stmt = parse("INSERT INTO users VALUES (1)").unwrap();
    assert!(analyze(&stmt, &catalog).is_err());
}

#[test]
fn insert_type_mismatch_is_semantic_error() {
    let catalog = catalog_with_users();
    let stmt = parse("INSERT INTO users VALUES ('x', 'alice')").unwrap();
    assert!(analyze(&stmt, &catalog).is_err());
}

#[test]
fn insert_null_is_always_admitted() {
    let catalog = catalog_with_users();
    let stmt = parse("INSERT INTO users VALUES (NULL, NULL)").unwrap();
    assert!(analyze(&stmt, &catalog).is_ok());
}

#[test]
fn create_table_conflicting_name_is_semantic_error() {
    let catalog = catalog_with_users();
    let stmt = parse("CREATE TABLE users (id INT)").unwrap();
    assert!(analyze(&stmt, &catalog).is_err());
}

#[test]
fn create_table_new_name_passes() {
    let catalog = catalog_with_users();
    let stmt = parse("CREATE TABLE orders (id INT, total INT)").unwrap();
    assert!(analyze(&stmt, &catalog).is_ok());
}

#[test]
fn drop_missing_table_is_semantic_error() {
    let catalog = catalog_with_users();
    let stmt = parse("DROP TABLE ghosts").unwrap();
    assert!(analyze(&stmt, &catalog).is_err());
}

#[test]
fn drop_existing_table_passes() {
    let catalog = catalog_with_users();
    let stmt = parse("DROP TABLE users").unwrap();
    assert!(analyze(&stmt, &catalog).is_ok());
}
