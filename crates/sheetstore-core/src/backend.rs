//! Storage backends.
//!
//! The engine never touches storage directly; it goes through
//! [`GridBackend`], which exposes the four positional grid edits plus
//! tab provisioning. Row indices are zero-based data-row indices; the
//! header row is not addressable.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::grid::Grid;

/// Access to the underlying tabular store.
///
/// `fetch_grid` returns the full current snapshot; mutations address a
/// single row. Implementations fail with [`StoreError::TabNotFound`]
/// when the tab is absent and [`StoreError::StoreUnavailable`] for any
/// storage-level failure.
pub trait GridBackend: Send + Sync {
    /// Fetches the full header+rows snapshot of one tab.
    fn fetch_grid(&self, store_id: &str, tab: &str) -> StoreResult<Grid>;

    /// Appends one row at the end of the tab.
    fn append_row(&self, store_id: &str, tab: &str, row: Vec<String>) -> StoreResult<()>;

    /// Overwrites one full row in place.
    fn write_row(&self, store_id: &str, tab: &str, index: usize, row: Vec<String>) -> StoreResult<()>;

    /// Physically removes one row, compacting indices.
    fn delete_row(&self, store_id: &str, tab: &str, index: usize) -> StoreResult<()>;

    /// Provisions a tab with the given header row. Returns `false`
    /// (without touching anything) if the tab already exists.
    fn create_tab(&self, store_id: &str, tab: &str, headers: &[String]) -> StoreResult<bool>;
}

// =============================================================================
// In-memory backend
// =============================================================================

/// Grid storage held entirely in memory. Used by tests and `--memory`
/// mode; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    tabs: RwLock<HashMap<(String, String), Grid>>,
}

impl MemoryBackend {
    /// Creates an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a grid directly, replacing any existing tab. Test and
    /// seeding convenience.
    pub fn insert_grid(&self, store_id: &str, tab: &str, grid: Grid) {
        self.tabs
            .write()
            .insert((store_id.to_string(), tab.to_string()), grid);
    }

    fn with_tab<T>(
        &self,
        store_id: &str,
        tab: &str,
        f: impl FnOnce(&mut Grid) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let mut tabs = self.tabs.write();
        let grid = tabs
            .get_mut(&(store_id.to_string(), tab.to_string()))
            .ok_or_else(|| StoreError::tab_not_found(tab))?;
        f(grid)
    }
}

impl GridBackend for MemoryBackend {
    fn fetch_grid(&self, store_id: &str, tab: &str) -> StoreResult<Grid> {
        self.tabs
            .read()
            .get(&(store_id.to_string(), tab.to_string()))
            .cloned()
            .ok_or_else(|| StoreError::tab_not_found(tab))
    }

    fn append_row(&self, store_id: &str, tab: &str, row: Vec<String>) -> StoreResult<()> {
        self.with_tab(store_id, tab, |grid| {
            grid.rows.push(row);
            Ok(())
        })
    }

    fn write_row(&self, store_id: &str, tab: &str, index: usize, row: Vec<String>) -> StoreResult<()> {
        self.with_tab(store_id, tab, |grid| {
            let slot = grid
                .rows
                .get_mut(index)
                .ok_or_else(|| StoreError::unavailable(format!("row index {index} out of range")))?;
            *slot = row;
            Ok(())
        })
    }

    fn delete_row(&self, store_id: &str, tab: &str, index: usize) -> StoreResult<()> {
        self.with_tab(store_id, tab, |grid| {
            if index >= grid.rows.len() {
                return Err(StoreError::unavailable(format!(
                    "row index {index} out of range"
                )));
            }
            grid.rows.remove(index);
            Ok(())
        })
    }

    fn create_tab(&self, store_id: &str, tab: &str, headers: &[String]) -> StoreResult<bool> {
        let mut tabs = self.tabs.write();
        let key = (store_id.to_string(), tab.to_string());
        if tabs.contains_key(&key) {
            return Ok(false);
        }
        tabs.insert(key, Grid::new(headers.to_vec()));
        Ok(true)
    }
}

// =============================================================================
// File backend
// =============================================================================

/// Grid storage persisted as one JSON document per store id.
///
/// A store file maps tab name to grid. Every mutation is a full
/// read-modify-write of the store file; fine at the target scale of
/// hundreds to low thousands of rows.
#[derive(Debug)]
pub struct FileBackend {
    data_dir: PathBuf,
}

type StoreDoc = BTreeMap<String, Grid>;

impl FileBackend {
    /// Creates a backend rooted at `data_dir`. The directory must
    /// already exist.
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    fn store_path(&self, store_id: &str) -> StoreResult<PathBuf> {
        // Store ids become file names; keep them to a safe charset.
        let valid = !store_id.is_empty()
            && store_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.');
        if !valid || store_id.starts_with('.') {
            return Err(StoreError::unavailable(format!(
                "invalid store id '{store_id}'"
            )));
        }
        Ok(self.data_dir.join(format!("{store_id}.json")))
    }

    fn load_store(&self, path: &Path) -> StoreResult<StoreDoc> {
        if !path.exists() {
            return Ok(StoreDoc::new());
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn save_store(&self, path: &Path, doc: &StoreDoc) -> StoreResult<()> {
        let content = serde_json::to_string_pretty(doc)?;
        fs::write(path, content)?;
        Ok(())
    }

    fn with_tab<T>(
        &self,
        store_id: &str,
        tab: &str,
        f: impl FnOnce(&mut Grid) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let path = self.store_path(store_id)?;
        let mut doc = self.load_store(&path)?;
        let grid = doc
            .get_mut(tab)
            .ok_or_else(|| StoreError::tab_not_found(tab))?;
        let result = f(grid)?;
        self.save_store(&path, &doc)?;
        Ok(result)
    }
}

impl GridBackend for FileBackend {
    fn fetch_grid(&self, store_id: &str, tab: &str) -> StoreResult<Grid> {
        let path = self.store_path(store_id)?;
        let doc = self.load_store(&path)?;
        doc.get(tab)
            .cloned()
            .ok_or_else(|| StoreError::tab_not_found(tab))
    }

    fn append_row(&self, store_id: &str, tab: &str, row: Vec<String>) -> StoreResult<()> {
        self.with_tab(store_id, tab, |grid| {
            grid.rows.push(row);
            Ok(())
        })
    }

    fn write_row(&self, store_id: &str, tab: &str, index: usize, row: Vec<String>) -> StoreResult<()> {
        self.with_tab(store_id, tab, |grid| {
            let slot = grid
                .rows
                .get_mut(index)
                .ok_or_else(|| StoreError::unavailable(format!("row index {index} out of range")))?;
            *slot = row;
            Ok(())
        })
    }

    fn delete_row(&self, store_id: &str, tab: &str, index: usize) -> StoreResult<()> {
        self.with_tab(store_id, tab, |grid| {
            if index >= grid.rows.len() {
                return Err(StoreError::unavailable(format!(
                    "row index {index} out of range"
                )));
            }
            grid.rows.remove(index);
            Ok(())
        })
    }

    fn create_tab(&self, store_id: &str, tab: &str, headers: &[String]) -> StoreResult<bool> {
        let path = self.store_path(store_id)?;
        let mut doc = self.load_store(&path)?;
        if doc.contains_key(tab) {
            return Ok(false);
        }
        doc.insert(tab.to_string(), Grid::new(headers.to_vec()));
        self.save_store(&path, &doc)?;
        debug!(store_id, tab, "created tab");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers() -> Vec<String> {
        vec!["auction_name".into(), "address".into()]
    }

    #[test]
    fn test_memory_fetch_unknown_tab() {
        let backend = MemoryBackend::new();
        let err = backend.fetch_grid("s", "MISSING").unwrap_err();
        assert!(matches!(err, StoreError::TabNotFound { .. }));
    }

    #[test]
    fn test_memory_create_tab_idempotent() {
        let backend = MemoryBackend::new();
        assert!(backend.create_tab("s", "T", &headers()).unwrap());
        backend
            .append_row("s", "T", vec!["a".into(), "b".into()])
            .unwrap();

        // Second create reports already-existed and keeps the data.
        assert!(!backend.create_tab("s", "T", &headers()).unwrap());
        assert_eq!(backend.fetch_grid("s", "T").unwrap().rows.len(), 1);
    }

    #[test]
    fn test_memory_write_and_delete() {
        let backend = MemoryBackend::new();
        backend.create_tab("s", "T", &headers()).unwrap();
        backend
            .append_row("s", "T", vec!["one".into(), "1".into()])
            .unwrap();
        backend
            .append_row("s", "T", vec!["two".into(), "2".into()])
            .unwrap();

        backend
            .write_row("s", "T", 0, vec!["ONE".into(), "1".into()])
            .unwrap();
        backend.delete_row("s", "T", 1).unwrap();

        let grid = backend.fetch_grid("s", "T").unwrap();
        assert_eq!(grid.rows, vec![vec!["ONE".to_string(), "1".to_string()]]);
    }

    #[test]
    fn test_memory_out_of_range_index() {
        let backend = MemoryBackend::new();
        backend.create_tab("s", "T", &headers()).unwrap();
        let err = backend.delete_row("s", "T", 3).unwrap_err();
        assert!(matches!(err, StoreError::StoreUnavailable { .. }));
    }

    #[test]
    fn test_file_backend_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::new(dir.path());

        backend.create_tab("store1", "T", &headers()).unwrap();
        backend
            .append_row("store1", "T", vec!["a".into(), "b".into()])
            .unwrap();

        // A fresh backend over the same directory sees the data.
        let reopened = FileBackend::new(dir.path());
        let grid = reopened.fetch_grid("store1", "T").unwrap();
        assert_eq!(grid.headers, headers());
        assert_eq!(grid.rows, vec![vec!["a".to_string(), "b".to_string()]]);
    }

    #[test]
    fn test_file_backend_create_tab_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::new(dir.path());

        assert!(backend.create_tab("s", "T", &headers()).unwrap());
        backend
            .append_row("s", "T", vec!["a".into(), "b".into()])
            .unwrap();
        assert!(!backend.create_tab("s", "T", &headers()).unwrap());
        assert_eq!(backend.fetch_grid("s", "T").unwrap().rows.len(), 1);
    }

    #[test]
    fn test_file_backend_rejects_unsafe_store_id() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::new(dir.path());
        for bad in ["../escape", "a/b", "", ".hidden"] {
            let err = backend.fetch_grid(bad, "T").unwrap_err();
            assert!(matches!(err, StoreError::StoreUnavailable { .. }), "{bad}");
        }
    }

    #[test]
    fn test_file_backend_separate_stores() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::new(dir.path());
        backend.create_tab("alpha", "T", &headers()).unwrap();
        backend.create_tab("beta", "T", &headers()).unwrap();
        backend
            .append_row("alpha", "T", vec!["x".into(), "y".into()])
            .unwrap();

        assert_eq!(backend.fetch_grid("alpha", "T").unwrap().rows.len(), 1);
        assert!(backend.fetch_grid("beta", "T").unwrap().rows.is_empty());
    }
}
