//! The facade tying `Catalog`, `BufferPool`, and `FileManager` into one
//! handle: `open` a data directory, `execute` SQL strings against it,
//! `flush_all` before shutdown. This is the seam the CLI binary and
//! integration tests call through.


use buffer::BufferPool;
use catalog::Catalog;
pub use executor::ExecResult;
use common::{Config, DbResult};
use std::fs;
use storage::FileManager;
use storage_engine::StorageEngine;

pub struct Database {
    catalog: Catalog,
    storage: StorageEngine,
}

impl Database {
    pub fn open(config: Config) -> DbResult<Database> {
        fs::create_dir_all(&config.data_dir)?;
        let catalog = Catalog::load(&config.data_dir)?;
        let file_manager = FileManager::new(&config.data_dir);
        let buffer_pool = BufferPool::new(file_manager, config.buffer_pool_pages);
        Ok(Database {
            catalog,
            storage: StorageEngine::new(buffer_pool),
        })
    }

    pub fn execute(&mut self, sql: &str) -> DbResult<ExecResult> {
        let stmt = parser::parse(sql)?;
        semantic::analyze(&stmt, &self.catalog)?;
        let plan = planner::plan(stmt, &self.catalog)?;
        executor::execute(plan, &mut self.catalog, &mut self.storage)
    }

    pub fn flush_all(&mut self) -> DbResult<()> {
        self.storage.flush_all()
    }
}
