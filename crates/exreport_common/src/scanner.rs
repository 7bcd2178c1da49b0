//! Record Scanner
//!
//! Walks `<root>/<Type>/<date>/*/*` for a [`TimeWindow`] and yields the
//! records inside it. Listing is lazy: an hour directory is only read when
//! iteration reaches it. Missing or unreadable directories yield nothing.

use std::path::{Path, PathBuf};
use tracing::debug;

use crate::layout::{is_exception_type_dir_name, RecordLocator};
use crate::store::{RecordStore, StoreEntry};
use crate::window::TimeWindow;

/// One exception type directory under a store root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDir {
    /// Directory name as stored
    pub name: String,
    pub path: PathBuf,
}

pub struct RecordScanner<'a, S: RecordStore> {
    store: &'a S,
    window: &'a TimeWindow,
}

impl<'a, S: RecordStore> RecordScanner<'a, S> {
    pub fn new(store: &'a S, window: &'a TimeWindow) -> Self {
        Self { store, window }
    }

    /// Exception type directories of a store root
    pub fn type_dirs(&self, root: &Path) -> Vec<TypeDir> {
        list_or_empty(self.store, root)
            .into_iter()
            .filter(|entry| entry.is_dir && !entry.is_hidden())
            .filter_map(|entry| {
                let name = entry.name();
                is_exception_type_dir_name(&name).then_some(TypeDir {
                    name,
                    path: entry.path,
                })
            })
            .collect()
    }

    /// Records of one exception type inside the window
    pub fn records(&self, type_dir: &TypeDir) -> impl Iterator<Item = RecordLocator> + 'a {
        let store = self.store;
        let window = self.window;
        let date_dir = type_dir.path.join(window.date_dir());

        list_or_empty(store, &date_dir)
            .into_iter()
            .filter(|hour| hour.is_dir && !hour.is_hidden())
            .flat_map(move |hour| list_or_empty(store, &hour.path))
            .filter(|file| !file.is_dir && !file.is_hidden())
            .filter_map(|file| {
                let located = RecordLocator::from_path(&file.path);
                if located.is_none() {
                    debug!("Not a record (no timestamp): {}", file.path.display());
                }
                located
            })
            .filter(move |record| window.admits(record))
    }

    /// Records of every exception type under a root
    pub fn scan_root(&self, root: &Path) -> impl Iterator<Item = RecordLocator> + 'a {
        let scanner = RecordScanner {
            store: self.store,
            window: self.window,
        };
        self.type_dirs(root)
            .into_iter()
            .flat_map(move |type_dir| scanner.records(&type_dir))
    }
}

fn list_or_empty<S: RecordStore>(store: &S, dir: &Path) -> Vec<StoreEntry> {
    match store.list_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("No records under {}: {}", dir.display(), e);
            Vec::new()
        }
    }
}
