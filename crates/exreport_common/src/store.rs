//! Record store access
//!
//! Directory listing and file reading sit behind [`RecordStore`] so the
//! scanner and header parser can run against an in-memory tree in tests.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// One child of a listed directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreEntry {
    pub path: PathBuf,
    pub is_dir: bool,
}

impl StoreEntry {
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Dot-files are skipped, as a shell glob would
    pub fn is_hidden(&self) -> bool {
        self.name().starts_with('.')
    }
}

/// Read-only view of a record store
pub trait RecordStore {
    /// Immediate children of `dir`
    fn list_dir(&self, dir: &Path) -> io::Result<Vec<StoreEntry>>;

    /// Open a record for line-by-line reading
    fn open_record(&self, path: &Path) -> io::Result<Box<dyn BufRead + '_>>;
}

impl<S: RecordStore + ?Sized> RecordStore for &S {
    fn list_dir(&self, dir: &Path) -> io::Result<Vec<StoreEntry>> {
        (**self).list_dir(dir)
    }

    fn open_record(&self, path: &Path) -> io::Result<Box<dyn BufRead + '_>> {
        (**self).open_record(path)
    }
}

/// The local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStore;

impl RecordStore for LocalStore {
    fn list_dir(&self, dir: &Path) -> io::Result<Vec<StoreEntry>> {
        let mut entries = Vec::new();
        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            match entry {
                Ok(entry) => entries.push(StoreEntry {
                    is_dir: entry.file_type().is_dir(),
                    path: entry.into_path(),
                }),
                // The directory itself could not be read
                Err(e) if e.depth() == 0 => return Err(io::Error::from(e)),
                Err(e) => debug!("Skipping unreadable store entry: {}", e),
            }
        }
        Ok(entries)
    }

    fn open_record(&self, path: &Path) -> io::Result<Box<dyn BufRead + '_>> {
        Ok(Box::new(BufReader::new(File::open(path)?)))
    }
}
