//! Fixed-size paged file I/O: the `Page` image and the `FileManager` that
//! reads and writes pages of a per-table `.dat` file.
//!
//! There is no slot directory here: a page's records sit at fixed offsets
//! computed from a single `record_size` known to the caller (the owning
//! table's schema). Page and FileManager know nothing about schemas,
//! columns, or `Value` — they move raw bytes only.


use common::{DbError, DbResult, PageId};
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

pub const PAGE_SIZE: usize = 4096;
const HEADER_SIZE: usize = 8;

/// In-memory image of one on-disk page: an 8-byte header
/// (`num_records`, `free_space_start`, both big-endian i32) followed by
/// contiguous fixed-width records.
#[derive(Clone, Debug)]
pub struct Page {
    pub page_id: PageId,
    data: Box<[u8; PAGE_SIZE]>,
    dirty: bool,
}

impl Page {
    /// A fresh, empty page: `num_records = 0`, `free_space_start = 8`.
    pub fn new(page_id: PageId) -> Self {
        let mut data = Box::new([0u8; PAGE_SIZE]);
        write_i32_be(&mut data[0..4], 0);
        write_i32_be(&mut data[4..8], HEADER_SIZE as i32);
        Self {
            page_id,
            data,
            dirty: false,
        }
    }

    /// Wrap a raw `PAGE_SIZE` buffer read from disk. Fails if the buffer
    /// is not exactly `PAGE_SIZE` bytes.
    pub fn from_bytes(page_id: PageId, buf: &[u8]) -> DbResult<Self> {
        if buf.len() != PAGE_SIZE {
            return Err(DbError::Storage(format!(
                "page buffer must be {PAGE_SIZE} bytes, got {}",
                buf.len()
            )));
        }
        let mut data = Box::new([0u8; PAGE_SIZE]);
        data.copy_from_slice(buf);
        Ok(Self {
            page_id,
            data,
            dirty: false,
        })
    }

    pub fn num_records(&self) -> i32 {
        read_i32_be(&self.data[0..4])
    }

    pub fn free_space_start(&self) -> i32 {
        read_i32_be(&self.data[4..8])
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn as_bytes(&self) -> &[u8; PAGE_SIZE] {
        &self.data
    }

    pub fn has_free_space(&self, record_size: usize) -> bool {
        (PAGE_SIZE as i32 - self.free_space_start()) >= record_size as i32
    }

    /// Append `record_bytes` at the next fixed offset. Returns the new
    /// record's ordinal (`num_records` before the insert), or `None` if
    /// the page lacks space.
    pub fn insert_record(&mut self, record_bytes: &[u8]) -> Option<i32> {
        let record_size = record_bytes.len();
        if !self.has_free_space(record_size) {
            return None;
        }

        let num_records = self.num_records();
        let offset = HEADER_SIZE + num_records as usize * record_size;
        self.data[offset..offset + record_size].copy_from_slice(record_bytes);

        let new_num_records = num_records + 1;
        write_i32_be(&mut self.data[0..4], new_num_records);
        write_i32_be(
            &mut self.data[4..8],
            (HEADER_SIZE + new_num_records as usize * record_size) as i32,
        );
        self.dirty = true;

        Some(num_records)
    }

    /// Read the `record_size`-byte slice for `record_id`, or `None` if
    /// out of range or it would run past the page.
    pub fn get_record(&self, record_id: i32, record_size: usize) -> Option<&[u8]> {
        if record_id < 0 || record_id >= self.num_records() {
            return None;
        }
        let offset = HEADER_SIZE + record_id as usize * record_size;
        if offset + record_size > PAGE_SIZE {
            return None;
        }
        Some(&self.data[offset..offset + record_size])
    }
}

fn read_i32_be(bytes: &[u8]) -> i32 {
    i32::from_be_bytes(bytes.try_into().unwrap())
}

fn write_i32_be(bytes: &mut [u8], value: i32) {
    bytes.copy_from_slice(&value.to_be_bytes());
}

/// Per-table file I/O in page-sized units. Each table lives at
/// `<data_dir>/<table>.dat`: a 4-byte big-endian page-count header
/// followed by that many contiguous `PAGE_SIZE` blocks.
pub struct FileManager {
    data_dir: PathBuf,
}

impl FileManager {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    fn path_for(&self, table: &str) -> PathBuf {
        self.data_dir.join(format!("{table}.dat"))
    }

    /// Create `<table>.dat` with a zero page-count header. Idempotent:
    /// if the file already exists, does nothing and returns `false`.
    pub fn create_file(&self, table: &str) -> DbResult<bool> {
        let path = self.path_for(table);
        if path.exists() {
            return Ok(false);
        }
        fs::create_dir_all(&self.data_dir)?;
        let mut file = File::create(&path)?;
        file.write_all(&0i32.to_be_bytes())?;
        Ok(true)
    }

    /// Remove `<table>.dat` if present. Returns whether a file was
    /// actually removed.
    pub fn delete_file(&self, table: &str) -> DbResult<bool> {
        let path = self.path_for(table);
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path)?;
        Ok(true)
    }

    /// Read exactly `PAGE_SIZE` bytes for `page_id`. Returns `None` if
    /// the table file does not exist.
    pub fn read_page(&self, table: &str, page_id: PageId) -> DbResult<Option<[u8; PAGE_SIZE]>> {
        let path = self.path_for(table);
        if !path.exists() {
            return Ok(None);
        }
        let mut file = File::open(&path)?;
        file.seek(SeekFrom::Start(Self::page_offset(page_id)))?;
        let mut buf = [0u8; PAGE_SIZE];
        file.read_exact(&mut buf)?;
        Ok(Some(buf))
    }

    /// Overwrite the `PAGE_SIZE` bytes at `page_id` in place. Fails if
    /// `data` is not exactly `PAGE_SIZE` bytes.
    pub fn write_page(&self, table: &str, page_id: PageId, data: &[u8]) -> DbResult<()> {
        if data.len() != PAGE_SIZE {
            return Err(DbError::Storage(format!(
                "write_page expects {PAGE_SIZE} bytes, got {}",
                data.len()
            )));
        }
        let path = self.path_for(table);
        let mut file = OpenOptions::new().write(true).open(&path)?;
        file.seek(SeekFrom::Start(Self::page_offset(page_id)))?;
        file.write_all(data)?;
        Ok(())
    }

    /// Append a fresh zeroed page and bump the header's page count.
    /// Returns the pre-increment count as the new page's id, or `-1` if
    /// the table file does not exist.
    pub fn allocate_page(&self, table: &str) -> DbResult<PageId> {
        let path = self.path_for(table);
        if !path.exists() {
            return Ok(-1);
        }

        let mut file = OpenOptions::new().read(true).write(true).open(&path)?;
        let page_count = Self::read_page_count(&mut file)?;

        file.seek(SeekFrom::Start(0))?;
        file.write_all(&(page_count + 1).to_be_bytes())?;

        file.seek(SeekFrom::End(0))?;
        file.write_all(&[0u8; PAGE_SIZE])?;

        Ok(page_count)
    }

    /// Number of pages currently stored for `table`. `0` if the file
    /// does not exist (not an error).
    pub fn get_page_count(&self, table: &str) -> DbResult<i32> {
        let path = self.path_for(table);
        if !path.exists() {
            return Ok(0);
        }
        let mut file = File::open(&path)?;
        Self::read_page_count(&mut file)
    }

    fn read_page_count(file: &mut File) -> DbResult<i32> {
        file.seek(SeekFrom::Start(0))?;
        let mut header = [0u8; 4];
        file.read_exact(&mut header)?;
        Ok(i32::from_be_bytes(header))
    }

    fn page_offset(page_id: PageId) -> u64 {
        4 + page_id as u64 * PAGE_SIZE as u64
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
