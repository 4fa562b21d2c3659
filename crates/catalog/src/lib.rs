//! Persistent table-name -> schema directory.
//!
//! The catalog is the single source of truth for what tables exist and
//! what shape their rows take. It is rewritten in full to `catalog.json`
//! on every mutation; there is no incremental WAL for catalog changes.


use common::{DbError, DbResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use types::SqlType;

/// One column definition within a `Schema`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(rename = "type")]
    pub sql_type: SqlType,
    /// Meaningful only for `Varchar`; absent/ignored for `Int`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
}

impl Column {
    pub fn int(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sql_type: SqlType::Int,
            length: None,
        }
    }

    pub fn varchar(name: impl Into<String>, length: u32) -> Self {
        Self {
            name: name.into(),
            sql_type: SqlType::Varchar,
            length: Some(length),
        }
    }

    /// Byte width this column occupies in a fixed-width record.
    pub fn type_size(&self) -> usize {
        match self.sql_type {
            SqlType::Int => 4,
            SqlType::Varchar => self.length.unwrap_or(0) as usize,
        }
    }
}

/// The ordered column list and optional primary key of a table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    #[serde(skip)]
    pub table_name: String,
    pub columns: Vec<Column>,
    pub primary_key: Option<String>,
}

impl Schema {
    pub fn new(
        table_name: impl Into<String>,
        columns: Vec<Column>,
        primary_key: Option<String>,
    ) -> Self {
        Self {
            table_name: table_name.into(),
            columns,
            primary_key,
        }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn column_by_name(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Sum of every column's fixed width; the width of one record for
    /// this table.
    pub fn record_size(&self) -> usize {
        self.columns.iter().map(Column::type_size).sum()
    }
}

#[derive(Serialize, Deserialize)]
struct CatalogDocument {
    #[serde(flatten)]
    tables: BTreeMap<String, Schema>,
}

/// Table-name -> `Schema` directory, persisted as `<data_dir>/catalog.json`.
pub struct Catalog {
    data_dir: PathBuf,
    schemas: BTreeMap<String, Schema>,
}

impl Catalog {
    fn catalog_path(data_dir: &Path) -> PathBuf {
        data_dir.join("catalog.json")
    }

    /// Load the catalog rooted at `data_dir`. A missing file yields an
    /// empty catalog. A parse error also yields an empty catalog: this
    /// mirrors the source behavior exactly (a corrupt `catalog.json` is
    /// silently discarded rather than surfaced as an error).
    pub fn load(data_dir: impl Into<PathBuf>) -> DbResult<Self> {
        let data_dir = data_dir.into();
        let path = Self::catalog_path(&data_dir);

        let schemas = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<CatalogDocument>(&contents) {
                Ok(doc) => doc
                    .tables
                    .into_iter()
                    .map(|(name, mut schema)| {
                        schema.table_name = name.clone();
                        (name, schema)
                    })
                    .collect(),
                Err(_) => BTreeMap::new(),
            },
            Err(_) => BTreeMap::new(),
        };

        Ok(Self { data_dir, schemas })
    }

    fn save(&self) -> DbResult<()> {
        fs::create_dir_all(&self.data_dir)?;
        let doc = CatalogDocument {
            tables: self.schemas.clone(),
        };
        let json = serde_json::to_string_pretty(&doc)
            .map_err(|e| DbError::Catalog(format!("failed to serialize catalog: {e}")))?;
        fs::write(Self::catalog_path(&self.data_dir), json)?;
        Ok(())
    }

    pub fn table_exists(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    pub fn get_schema(&self, name: &str) -> Option<&Schema> {
        self.schemas.get(name)
    }

    /// Install `name`'s schema and persist. Fails if the table already
    /// exists or if `columns` repeats a column name (schemas require
    /// unique column names, §3).
    pub fn create_table(
        &mut self,
        name: &str,
        columns: Vec<Column>,
        primary_key: Option<String>,
    ) -> DbResult<()> {
        if self.schemas.contains_key(name) {
            return Err(DbError::Semantic(format!("table {name} already exists")));
        }

        let mut seen = std::collections::HashSet::new();
        for col in &columns {
            if !seen.insert(col.name.as_str()) {
                return Err(DbError::Semantic(format!(
                    "duplicate column name: {}",
                    col.name
                )));
            }
        }

        self.schemas
            .insert(name.to_string(), Schema::new(name, columns, primary_key));
        self.save()
    }

    /// Remove `name`'s schema and persist. Fails if the table does not
    /// exist.
    pub fn drop_table(&mut self, name: &str) -> DbResult<()> {
        if self.schemas.remove(name).is_none() {
            return Err(DbError::Semantic(format!("table {name} does not exist")));
        }
        self.save()
    }
}
