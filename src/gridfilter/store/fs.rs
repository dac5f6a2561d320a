use super::FilterStore;
use crate::error::{FilterError, Result};
use crate::model::FilterRecord;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

const INDEX_FILENAME: &str = "filters.json";

pub struct FileStore {
    root: PathBuf,
    pretty: bool,
}

impl FileStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root, pretty: true }
    }

    pub fn with_pretty_json(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn index_path(&self) -> PathBuf {
        self.root.join(INDEX_FILENAME)
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(FilterError::Io)?;
        }
        Ok(())
    }

    fn load_index(&self) -> Result<BTreeMap<Uuid, FilterRecord>> {
        let index_file = self.index_path();
        if !index_file.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(index_file).map_err(FilterError::Io)?;
        let index = serde_json::from_str(&content).map_err(FilterError::Serialization)?;
        Ok(index)
    }

    fn save_index(&self, index: &BTreeMap<Uuid, FilterRecord>) -> Result<()> {
        self.ensure_dir()?;
        let content = if self.pretty {
            serde_json::to_string_pretty(index)
        } else {
            serde_json::to_string(index)
        }
        .map_err(FilterError::Serialization)?;
        fs::write(self.index_path(), content).map_err(FilterError::Io)?;
        debug!(filters = index.len(), path = %self.index_path().display(), "saved filter index");
        Ok(())
    }
}

impl FilterStore for FileStore {
    fn create_filter(&mut self, filter: &FilterRecord) -> Result<()> {
        let mut index = self.load_index()?;
        if index.contains_key(&filter.id) {
            return Err(FilterError::Store(format!(
                "Filter already exists: {}",
                filter.id
            )));
        }
        index.insert(filter.id, filter.clone());
        self.save_index(&index)
    }

    fn save_filter(&mut self, filter: &FilterRecord) -> Result<()> {
        let mut index = self.load_index()?;
        match index.get_mut(&filter.id) {
            Some(slot) => *slot = filter.clone(),
            None => return Err(FilterError::FilterNotFound(filter.id)),
        }
        self.save_index(&index)
    }

    fn get_filter(&self, id: &Uuid) -> Result<FilterRecord> {
        self.load_index()?
            .remove(id)
            .ok_or(FilterError::FilterNotFound(*id))
    }

    fn list_filters(&self) -> Result<Vec<FilterRecord>> {
        let mut filters: Vec<_> = self.load_index()?.into_values().collect();
        filters.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(filters)
    }

    fn delete_filter(&mut self, id: &Uuid) -> Result<()> {
        let mut index = self.load_index()?;
        if index.remove(id).is_none() {
            return Err(FilterError::FilterNotFound(*id));
        }
        self.save_index(&index)
    }
}
