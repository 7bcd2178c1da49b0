//! Report run: aggregate, render, then return or mail the document

use chrono::{Local, NaiveDateTime};
use tracing::{info, trace};

use crate::aggregate::{Aggregate, Aggregator};
use crate::config::ReporterConfig;
use crate::delivery::{MailTransport, OutgoingMail, SmtpTransport};
use crate::error::Result;
use crate::layout::RecordLocator;
use crate::render::render_html;
use crate::scanner::RecordScanner;
use crate::store::{LocalStore, RecordStore};
use crate::window::TimeWindow;

/// What a run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportOutcome {
    /// No recipient configured: the rendered HTML
    Document(String),
    /// Report handed to the mail transport
    Mailed { recipient: String },
}

pub struct Reporter<'a, S: RecordStore = LocalStore, T: MailTransport = SmtpTransport> {
    config: &'a ReporterConfig,
    store: S,
    transport: T,
    now: NaiveDateTime,
}

impl<'a> Reporter<'a> {
    /// Reporter over the local filesystem and SMTP
    pub fn new(config: &'a ReporterConfig) -> Self {
        Self::with_collaborators(config, LocalStore, SmtpTransport)
    }
}

impl<'a, S: RecordStore, T: MailTransport> Reporter<'a, S, T> {
    pub fn with_collaborators(config: &'a ReporterConfig, store: S, transport: T) -> Self {
        Self {
            config,
            store,
            transport,
            now: Local::now().naive_local(),
        }
    }

    /// Pin the clock used to resolve the window
    pub fn with_now(mut self, now: NaiveDateTime) -> Self {
        self.now = now;
        self
    }

    pub fn window(&self) -> TimeWindow {
        TimeWindow::resolve(
            self.config.report.date,
            self.config.report.minutes_ago,
            self.now,
        )
    }

    /// Every record inside the window, across all store roots
    pub fn scan(&self) -> Vec<RecordLocator> {
        let window = self.window();
        let scanner = RecordScanner::new(&self.store, &window);
        self.config
            .store
            .roots()
            .flat_map(|root| scanner.scan_root(root))
            .collect()
    }

    pub fn aggregate(&self) -> Result<Aggregate> {
        let window = self.window();
        let hostname = self.config.report.effective_hostname();
        info!(
            "Aggregating records for {} from {} (host {}, on read error: {})",
            window.date_dir(),
            window.min_time,
            hostname,
            self.config.store.on_read_error.as_str()
        );

        let aggregate = Aggregator::new(&self.store, &window, &hostname, self.config.store.strip)
            .on_read_error(self.config.store.on_read_error)
            .collect(self.config.store.roots())?;

        info!(
            "Found {} records across {} exception types",
            aggregate.total(),
            aggregate.len()
        );
        Ok(aggregate)
    }

    /// Rendered HTML for the configured window
    pub fn render(&self) -> Result<String> {
        let aggregate = self.aggregate()?;
        let html = render_html(&aggregate, self.config.report.exceptions_per_method);
        trace!("html:\n{}", html);
        Ok(html)
    }

    /// Render and deliver: mail when a recipient is set, else return the HTML
    pub fn run(&self) -> Result<ReportOutcome> {
        let html = self.render()?;
        match &self.config.mail.to {
            Some(to) => {
                info!("Mailing report to: {}...", to);
                let mail = OutgoingMail::html_report(&self.config.mail, to, &html);
                self.transport.send(&mail)?;
                Ok(ReportOutcome::Mailed {
                    recipient: to.clone(),
                })
            }
            None => Ok(ReportOutcome::Document(html)),
        }
    }
}
