//! Record store layout
//!
//! The capture side writes one file per exception occurrence:
//!
//! ```text
//! <root>/<ExceptionType>/<YYYY-MM-DD>/<HH>/<YYYY-MM-DDTHH:MM:SS>.<ms>.txt
//! ```
//!
//! Namespaced type names (`Foo::Bar`) are stored as `Foo_Bar`. The path is
//! the only index there is, so everything about a record is decoded here.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Separator the store uses in place of `::`
pub const DIR_NAMESPACE_SEPARATOR: &str = "_";

/// Namespace separator in displayed type names
pub const TYPE_NAMESPACE_SEPARATOR: &str = "::";

pub const DATE_FORMAT: &str = "%Y-%m-%d";

static TIMESTAMP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4}-\d\d-\d\d)?[T_](\d\d:\d\d:\d\d)(?:\.(\d+))?").unwrap());

static TIME_OF_DAY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"T(\d\d:\d\d:\d\d)").unwrap());

/// Store directory name for an exception type (`Foo::Bar` -> `Foo_Bar`)
pub fn type_to_dir_name(exception_type: &str) -> String {
    exception_type.replace(TYPE_NAMESPACE_SEPARATOR, DIR_NAMESPACE_SEPARATOR)
}

/// Display name for a store directory (`Foo_Bar` -> `Foo::Bar`)
pub fn dir_name_to_type(dir_name: &str) -> String {
    dir_name.replace(DIR_NAMESPACE_SEPARATOR, TYPE_NAMESPACE_SEPARATOR)
}

/// Whether a store root entry looks like an exception type directory
pub fn is_exception_type_dir_name(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_ascii_uppercase())
}

/// `HH:MM:SS` embedded in a record path after a `T`
pub fn embedded_time_of_day(path: &str) -> Option<&str> {
    TIME_OF_DAY_RE
        .captures(path)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Public URL of a record: the path minus its first `strip` segments
pub fn record_url(hostname: &str, path: &Path, strip: usize) -> String {
    let path = path.to_string_lossy();
    let tail = path.splitn(strip.saturating_add(1), '/').last().unwrap_or_default();
    format!("http://{}/{}", hostname, tail)
}

/// URL with its last two segments (hour directory and file name) removed
pub fn directory_url(record_url: &str) -> String {
    let segments: Vec<&str> = record_url.split('/').collect();
    let keep = segments.len().saturating_sub(2);
    segments[..keep].join("/")
}

/// Final path segment of a URL
pub fn url_file_name(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

/// One record decoded from its location in the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordLocator {
    /// Directory name as stored (`Foo_Bar`)
    pub type_dir: String,
    /// Display type name (`Foo::Bar`)
    pub exception_type: String,
    /// `YYYY-MM-DD` directory
    pub date: String,
    /// `HH` directory
    pub hour: String,
    /// `HH:MM:SS` from the file name
    pub time_of_day: String,
    /// Millisecond disambiguator from the file name, when present
    pub millis: Option<u32>,
    pub path: PathBuf,
}

impl RecordLocator {
    /// Decode `.../<type>/<date>/<hour>/<file>`
    ///
    /// Returns `None` when the path is too short or the file name carries no
    /// time of day; such files are not records.
    pub fn from_path(path: &Path) -> Option<Self> {
        let mut parts = path.iter().rev().map(|p| p.to_string_lossy());
        let file_name = parts.next()?;
        let hour = parts.next()?.into_owned();
        let date = parts.next()?.into_owned();
        let type_dir = parts.next()?.into_owned();

        let (time_of_day, millis) = match TIMESTAMP_RE.captures(&file_name) {
            Some(caps) => (
                caps.get(2)?.as_str().to_string(),
                caps.get(3).and_then(|m| m.as_str().parse().ok()),
            ),
            None => (embedded_time_of_day(&file_name)?.to_string(), None),
        };

        Some(Self {
            exception_type: dir_name_to_type(&type_dir),
            type_dir,
            date,
            hour,
            time_of_day,
            millis,
            path: path.to_path_buf(),
        })
    }

    /// `YYYY-MM-DDTHH:MM:SS` of the occurrence
    pub fn timestamp(&self) -> String {
        format!("{}T{}", self.date, self.time_of_day)
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}
