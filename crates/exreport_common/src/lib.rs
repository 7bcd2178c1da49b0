//! exreport common - exception record aggregation and reporting
//!
//! Reads the record store written by the capture side, groups records by
//! exception type and category, and renders an HTML summary that is either
//! returned or mailed.

pub mod aggregate;
pub mod config;
pub mod delivery;
pub mod error;
pub mod header;
pub mod layout;
pub mod render;
pub mod reporter;
pub mod scanner;
pub mod store;
pub mod window;

pub use aggregate::{Aggregate, Aggregator, ExceptionSummary};
pub use config::{ReadErrorPolicy, ReporterConfig};
pub use delivery::{MailTransport, OutgoingMail, SmtpTransport};
pub use error::{ReportError, Result};
pub use layout::RecordLocator;
pub use render::render_html;
pub use reporter::{ReportOutcome, Reporter};
pub use store::{LocalStore, RecordStore, StoreEntry};
pub use window::TimeWindow;
