//! # Storage Layer
//!
//! Persistence of filters behind the [`FilterStore`] trait. The rule engine
//! never calls a store; commands do, handing it the exported wire tree.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: production storage
//!   - every filter lives in one index file, `filters.json`, keyed by id
//! - [`memory::InMemoryStore`]: in-memory storage for tests
//!
//! ## Storage Format
//!
//! For `FileStore`:
//! ```text
//! <data dir>/
//! ├── filters.json   # { "<uuid>": FilterRecord, ... }
//! └── config.json    # GridFilterConfig
//! ```

use crate::error::Result;
use crate::model::FilterRecord;
use uuid::Uuid;

pub mod fs;
pub mod memory;

/// Abstract interface for filter storage.
pub trait FilterStore {
    /// Store a new filter. Fails if a filter with the same id already exists.
    fn create_filter(&mut self, filter: &FilterRecord) -> Result<()>;

    /// Overwrite an existing filter.
    fn save_filter(&mut self, filter: &FilterRecord) -> Result<()>;

    /// Get a filter by ID
    fn get_filter(&self, id: &Uuid) -> Result<FilterRecord>;

    /// All stored filters, oldest first
    fn list_filters(&self) -> Result<Vec<FilterRecord>>;

    /// Delete a filter permanently
    fn delete_filter(&mut self, id: &Uuid) -> Result<()>;
}
