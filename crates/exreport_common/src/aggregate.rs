//! Aggregation of records into per-type, per-category summaries

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use crate::config::ReadErrorPolicy;
use crate::error::Result;
use crate::header::read_category;
use crate::layout::{directory_url, record_url, RecordLocator};
use crate::scanner::RecordScanner;
use crate::store::RecordStore;
use crate::window::TimeWindow;

/// Everything known about one exception type for a report run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExceptionSummary {
    count: usize,
    directory_url: String,
    categories: BTreeMap<String, Vec<String>>,
}

impl ExceptionSummary {
    /// Add one record URL under a category
    pub fn record(&mut self, category: &str, url: String) {
        if self.count == 0 {
            self.directory_url = directory_url(&url);
        }
        self.count += 1;
        self.categories
            .entry(category.to_string())
            .or_default()
            .push(url);
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Link for the type's date directory, taken from its first record
    pub fn directory_url(&self) -> &str {
        &self.directory_url
    }

    /// Category -> record URLs in scan order
    pub fn categories(&self) -> &BTreeMap<String, Vec<String>> {
        &self.categories
    }

    /// Categories by record count, largest first; ties by name
    pub fn ranked_categories(&self) -> Vec<(&str, &[String])> {
        let mut ranked: Vec<_> = self
            .categories
            .iter()
            .map(|(name, urls)| (name.as_str(), urls.as_slice()))
            .collect();
        ranked.sort_by(|a, b| b.1.len().cmp(&a.1.len()));
        ranked
    }

    /// Count equals the number of URLs across categories
    pub fn is_consistent(&self) -> bool {
        self.count == self.categories.values().map(Vec::len).sum::<usize>()
    }
}

/// Summaries keyed by display exception type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Aggregate {
    exceptions: BTreeMap<String, ExceptionSummary>,
}

impl Aggregate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, exception_type: &str, category: &str, url: String) {
        self.exceptions
            .entry(exception_type.to_string())
            .or_default()
            .record(category, url);
    }

    pub fn get(&self, exception_type: &str) -> Option<&ExceptionSummary> {
        self.exceptions.get(exception_type)
    }

    pub fn is_empty(&self) -> bool {
        self.exceptions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.exceptions.len()
    }

    /// Total records across all types
    pub fn total(&self) -> usize {
        self.exceptions.values().map(ExceptionSummary::count).sum()
    }

    /// Types by total count, largest first; ties by name
    pub fn ranked(&self) -> Vec<(&str, &ExceptionSummary)> {
        let mut ranked: Vec<_> = self
            .exceptions
            .iter()
            .map(|(name, summary)| (name.as_str(), summary))
            .collect();
        ranked.sort_by(|a, b| b.1.count().cmp(&a.1.count()));
        ranked
    }

    pub fn is_consistent(&self) -> bool {
        self.exceptions.values().all(ExceptionSummary::is_consistent)
    }
}

/// Drives scanning and header parsing into an [`Aggregate`]
pub struct Aggregator<'a, S: RecordStore> {
    store: &'a S,
    window: &'a TimeWindow,
    hostname: &'a str,
    strip: usize,
    on_read_error: ReadErrorPolicy,
}

impl<'a, S: RecordStore> Aggregator<'a, S> {
    pub fn new(store: &'a S, window: &'a TimeWindow, hostname: &'a str, strip: usize) -> Self {
        Self {
            store,
            window,
            hostname,
            strip,
            on_read_error: ReadErrorPolicy::default(),
        }
    }

    pub fn on_read_error(mut self, policy: ReadErrorPolicy) -> Self {
        self.on_read_error = policy;
        self
    }

    /// Scan one store root into `aggregate`
    pub fn collect_root(&self, root: &std::path::Path, aggregate: &mut Aggregate) -> Result<()> {
        let scanner = RecordScanner::new(self.store, self.window);
        for type_dir in scanner.type_dirs(root) {
            info!("Processing: {}", type_dir.path.display());
            for record in scanner.records(&type_dir) {
                self.collect_record(&record, aggregate)?;
            }
        }
        Ok(())
    }

    /// Scan several roots into one aggregate
    pub fn collect<'r, I>(&self, roots: I) -> Result<Aggregate>
    where
        I: IntoIterator<Item = &'r std::path::Path>,
    {
        let mut aggregate = Aggregate::new();
        for root in roots {
            self.collect_root(root, &mut aggregate)?;
        }
        debug_assert!(aggregate.is_consistent());
        Ok(aggregate)
    }

    fn collect_record(&self, record: &RecordLocator, aggregate: &mut Aggregate) -> Result<()> {
        let url = record_url(self.hostname, &record.path, self.strip);
        let category = match read_category(self.store, &record.path) {
            Ok(category) => category,
            Err(e) if self.on_read_error == ReadErrorPolicy::Skip => {
                warn!("Skipping record: {}", e);
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        debug!("\t{}[{}] << {}", record.exception_type, category, url);
        aggregate.record(&record.exception_type, &category, url);
        Ok(())
    }
}
