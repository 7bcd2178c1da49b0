//! Command line surface for exreport

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use exreport_common::{ReadErrorPolicy, ReporterConfig};
use std::path::PathBuf;

// Version is embedded at build time
const VERSION: &str = env!("EXREPORT_VERSION");

#[derive(Parser, Debug)]
#[command(name = "exreport")]
#[command(about = "Summarize captured exception records into an HTML report", long_about = None)]
#[command(version = VERSION)]
pub struct Cli {
    /// Config file (default: $XDG_CONFIG_HOME/exreport/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub options: RunOptions,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render the report, then print, save or mail it
    Report {
        /// Write the document to a file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = Format::Html)]
        format: Format,
    },

    /// List the record files inside the report window
    Scan,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Html,
    /// The aggregate as JSON
    Json,
}

/// Flags that override config file values
#[derive(clap::Args, Debug, Default)]
pub struct RunOptions {
    /// Record store root
    #[arg(long, global = true)]
    pub store_root: Option<PathBuf>,

    /// Host name used in record URLs
    #[arg(long, global = true)]
    pub hostname: Option<String>,

    /// Day to report on (YYYY-MM-DD, default yesterday)
    #[arg(long, global = true)]
    pub date: Option<NaiveDate>,

    /// Report only the last N minutes of today
    #[arg(long, global = true)]
    pub minutes_ago: Option<u32>,

    /// Leading path segments dropped from record URLs
    #[arg(long, global = true)]
    pub strip: Option<usize>,

    /// Sample links per category
    #[arg(long, global = true)]
    pub exceptions_per_method: Option<usize>,

    /// Mail the report to this address
    #[arg(long, global = true)]
    pub mail_to: Option<String>,

    #[arg(long, global = true)]
    pub mail_from: Option<String>,

    #[arg(long, global = true)]
    pub mail_subject: Option<String>,

    #[arg(long, global = true)]
    pub smtp_host: Option<String>,

    #[arg(long, global = true)]
    pub smtp_port: Option<u16>,

    /// Leave unreadable records out instead of failing
    #[arg(long, global = true)]
    pub skip_unreadable: bool,

    /// Print progress while scanning
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

impl RunOptions {
    /// Apply flags on top of a loaded config
    pub fn apply(&self, config: &mut ReporterConfig) {
        if let Some(root) = &self.store_root {
            config.store.root = root.clone();
        }
        if let Some(strip) = self.strip {
            config.store.strip = strip;
        }
        if self.skip_unreadable {
            config.store.on_read_error = ReadErrorPolicy::Skip;
        }
        if let Some(hostname) = &self.hostname {
            config.report.hostname = Some(hostname.clone());
        }
        if let Some(date) = self.date {
            config.report.date = Some(date);
        }
        if let Some(minutes) = self.minutes_ago {
            config.report.minutes_ago = Some(minutes);
        }
        if let Some(n) = self.exceptions_per_method {
            config.report.exceptions_per_method = n;
        }
        if self.verbose {
            config.report.verbose = true;
        }
        if let Some(to) = &self.mail_to {
            config.mail.to = Some(to.clone());
        }
        if let Some(from) = &self.mail_from {
            config.mail.from = from.clone();
        }
        if let Some(subject) = &self.mail_subject {
            config.mail.subject = subject.clone();
        }
        if let Some(host) = &self.smtp_host {
            config.mail.smtp_host = host.clone();
        }
        if let Some(port) = self.smtp_port {
            config.mail.smtp_port = port;
        }
    }
}
