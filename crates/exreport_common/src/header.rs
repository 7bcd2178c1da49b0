//! Record header parsing
//!
//! A record starts with free-form text up to the first line beginning with
//! `----`. The category is whatever follows `occurred in` up to the next
//! colon, e.g. `A RuntimeError occurred in test#do_raise:` gives `test#do_raise`.

use once_cell::sync::Lazy;
use regex::Regex;
use std::io::{self, BufRead};
use std::path::Path;

use crate::error::{ReportError, Result};
use crate::store::RecordStore;

/// Lines starting with this end the header
pub const HEADER_DELIMITER: &[u8] = b"----";

/// Header text used when the header block is blank
pub const EMPTY_HEADER: &str = "empty";

static CATEGORY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"occurred in ([^:]+)").unwrap());

/// Read the header block from a reader, stopping at the delimiter line
pub fn read_header<R: BufRead>(mut reader: R) -> io::Result<String> {
    let mut header = String::new();
    let mut line = Vec::new();
    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            break;
        }
        if line.starts_with(HEADER_DELIMITER) {
            break;
        }
        header.push_str(&String::from_utf8_lossy(&line));
    }

    if header.trim().is_empty() {
        return Ok(EMPTY_HEADER.to_string());
    }
    Ok(header)
}

/// Header block of an in-memory record
pub fn header_from_bytes(bytes: &[u8]) -> String {
    // Reading from a slice cannot fail
    read_header(bytes).unwrap_or_else(|_| EMPTY_HEADER.to_string())
}

/// First `occurred in ...` capture, or the empty string
pub fn extract_category(header: &str) -> String {
    CATEGORY_RE
        .captures(header)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Header and category of a record file in the store
pub fn read_category<S: RecordStore>(store: &S, path: &Path) -> Result<String> {
    let to_error = |source| ReportError::RecordRead {
        path: path.to_path_buf(),
        source,
    };
    let reader = store.open_record(path).map_err(to_error)?;
    let header = read_header(reader).map_err(to_error)?;
    Ok(extract_category(&header))
}
