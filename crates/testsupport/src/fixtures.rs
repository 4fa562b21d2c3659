use common::Config;
use database::Database;
use tempfile::TempDir;

/// An isolated `Database` rooted in a fresh temp directory. The returned
/// `TempDir` must stay alive for as long as `Database` is in use; it is
/// deleted when dropped.
pub fn open_temp_database(buffer_pool_pages: usize) -> (Database, TempDir) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let config = Config::builder()
        .data_dir(dir.path().to_path_buf())
        .buffer_pool_pages(buffer_pool_pages)
        .build();
    let db = Database::open(config).expect("open database");
    (db, dir)
}
