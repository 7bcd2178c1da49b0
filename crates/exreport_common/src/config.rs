//! Reporter Configuration
//!
//! Every knob the report run understands, grouped the same way the TOML file
//! is laid out:
//!
//! ```toml
//! [store]
//! root = "log/exceptions"
//! strip = 2
//!
//! [report]
//! hostname = "app01"
//! exceptions_per_method = 3
//!
//! [mail]
//! to = "ops@example.com"
//! ```
//!
//! User configuration lives in `$XDG_CONFIG_HOME/exreport/config.toml`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{ReportError, Result};

const CONFIG_DIR: &str = "exreport";
const CONFIG_FILE: &str = "config.toml";

/// What to do when a single record file cannot be read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReadErrorPolicy {
    /// Fail the whole run
    #[default]
    Abort,
    /// Log a warning and leave the record out of the report
    Skip,
}

impl ReadErrorPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadErrorPolicy::Abort => "abort",
            ReadErrorPolicy::Skip => "skip",
        }
    }
}

/// Record store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSettings {
    /// Base directory the capture side writes records into
    #[serde(default = "default_store_root")]
    pub root: PathBuf,

    /// Further store roots, scanned after `root` into the same report
    #[serde(default)]
    pub extra_roots: Vec<PathBuf>,

    /// Leading path segments dropped when turning a record path into a URL
    #[serde(default = "default_strip")]
    pub strip: usize,

    #[serde(default)]
    pub on_read_error: ReadErrorPolicy,
}

fn default_store_root() -> PathBuf {
    PathBuf::from("log/exceptions")
}

fn default_strip() -> usize {
    2
}

impl StoreSettings {
    /// All roots in scan order
    pub fn roots(&self) -> impl Iterator<Item = &Path> {
        std::iter::once(self.root.as_path()).chain(self.extra_roots.iter().map(PathBuf::as_path))
    }
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            root: default_store_root(),
            extra_roots: Vec::new(),
            strip: default_strip(),
            on_read_error: ReadErrorPolicy::default(),
        }
    }
}

/// Report window and rendering settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSettings {
    /// Host used in record URLs (machine hostname when unset)
    #[serde(default)]
    pub hostname: Option<String>,

    /// Day to report on (yesterday when unset)
    #[serde(default)]
    pub date: Option<NaiveDate>,

    /// Report only the last N minutes; overrides `date`
    #[serde(default)]
    pub minutes_ago: Option<u32>,

    /// Sample links shown per category
    #[serde(default = "default_exceptions_per_method")]
    pub exceptions_per_method: usize,

    #[serde(default)]
    pub verbose: bool,
}

fn default_exceptions_per_method() -> usize {
    3
}

impl ReportSettings {
    /// Configured hostname, falling back to the machine's own
    pub fn effective_hostname(&self) -> String {
        self.hostname.clone().unwrap_or_else(system_hostname)
    }
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            hostname: None,
            date: None,
            minutes_ago: None,
            exceptions_per_method: default_exceptions_per_method(),
            verbose: false,
        }
    }
}

/// Mail delivery settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailSettings {
    /// Recipient; the report is returned instead of mailed when unset
    #[serde(default)]
    pub to: Option<String>,

    #[serde(default = "default_mail_from")]
    pub from: String,

    #[serde(default = "default_mail_subject")]
    pub subject: String,

    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,

    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
}

fn default_mail_from() -> String {
    "exception_reporter".to_string()
}

fn default_mail_subject() -> String {
    "Exception Report".to_string()
}

fn default_smtp_host() -> String {
    "localhost".to_string()
}

fn default_smtp_port() -> u16 {
    25
}

impl Default for MailSettings {
    fn default() -> Self {
        Self {
            to: None,
            from: default_mail_from(),
            subject: default_mail_subject(),
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Complete reporter configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ReporterConfig {
    #[serde(default)]
    pub store: StoreSettings,

    #[serde(default)]
    pub report: ReportSettings,

    #[serde(default)]
    pub mail: MailSettings,

    #[serde(default)]
    pub log: LogConfig,
}

impl ReporterConfig {
    /// Parse a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ReporterConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load an explicit config file; missing or malformed files are errors
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| ReportError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Load the user config if one exists, defaults otherwise
    pub fn load() -> Result<Self> {
        match user_config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Reject values that cannot produce a meaningful report
    pub fn validate(&self) -> Result<()> {
        if let Some(hostname) = &self.report.hostname {
            if hostname.is_empty() || hostname.contains('/') {
                return Err(ReportError::Config(format!(
                    "report.hostname '{}' is not a host name",
                    hostname
                )));
            }
        }
        if matches!(&self.mail.to, Some(to) if to.trim().is_empty()) {
            return Err(ReportError::Config("mail.to is empty".to_string()));
        }
        Ok(())
    }
}

/// Get the user config file path
pub fn user_config_path() -> Option<PathBuf> {
    let config_dir = match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
        _ => dirs::config_dir()?,
    };
    Some(config_dir.join(CONFIG_DIR).join(CONFIG_FILE))
}

/// Hostname of this machine
pub fn system_hostname() -> String {
    // Try hostname command first
    if let Ok(output) = Command::new("hostname").output() {
        if output.status.success() {
            let name = String::from_utf8_lossy(&output.stdout).trim().to_string();
            if !name.is_empty() {
                return name;
            }
        }
    }

    // Fallback: read /etc/hostname
    if let Ok(hostname) = fs::read_to_string("/etc/hostname") {
        let name = hostname.trim();
        if !name.is_empty() {
            return name.to_string();
        }
    }

    "localhost".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ReporterConfig::default();
        assert_eq!(config.store.root, PathBuf::from("log/exceptions"));
        assert_eq!(config.store.strip, 2);
        assert_eq!(config.store.on_read_error, ReadErrorPolicy::Abort);
        assert_eq!(config.report.exceptions_per_method, 3);
        assert!(config.report.date.is_none());
        assert!(config.report.minutes_ago.is_none());
        assert!(!config.report.verbose);
        assert!(config.mail.to.is_none());
        assert_eq!(config.mail.from, "exception_reporter");
        assert_eq!(config.mail.subject, "Exception Report");
        assert_eq!(config.mail.smtp_host, "localhost");
        assert_eq!(config.mail.smtp_port, 25);
        assert_eq!(config.log.level, "warn");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ReporterConfig::from_toml_str(
            r#"
[store]
root = "/srv/app/log/exceptions"
on_read_error = "skip"

[report]
hostname = "app01"
date = "2020-01-01"

[mail]
to = "ops@example.com"
smtp_port = 2525
"#,
        )
        .unwrap();

        assert_eq!(config.store.root, PathBuf::from("/srv/app/log/exceptions"));
        assert_eq!(config.store.strip, 2);
        assert_eq!(config.store.on_read_error, ReadErrorPolicy::Skip);
        assert_eq!(config.report.hostname.as_deref(), Some("app01"));
        assert_eq!(
            config.report.date,
            Some(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap())
        );
        assert_eq!(config.report.exceptions_per_method, 3);
        assert_eq!(config.mail.to.as_deref(), Some("ops@example.com"));
        assert_eq!(config.mail.smtp_port, 2525);
        assert_eq!(config.mail.smtp_host, "localhost");
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let err = ReporterConfig::from_toml_str("[store]\nstrip = \"two\"\n").unwrap_err();
        assert!(matches!(err, ReportError::ConfigParse(_)));
    }

    #[test]
    fn test_validation() {
        let mut config = ReporterConfig::default();
        config.report.exceptions_per_method = 0;
        assert!(config.validate().is_ok());

        let mut config = ReporterConfig::default();
        config.report.hostname = Some("foo/bar".to_string());
        assert!(config.validate().is_err());

        let mut config = ReporterConfig::default();
        config.mail.to = Some("  ".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_roots_order() {
        let store = StoreSettings {
            root: PathBuf::from("/a"),
            extra_roots: vec![PathBuf::from("/b"), PathBuf::from("/c")],
            ..Default::default()
        };
        let roots: Vec<_> = store.roots().collect();
        assert_eq!(roots, vec![Path::new("/a"), Path::new("/b"), Path::new("/c")]);
    }

    #[test]
    fn test_load_from_missing_file() {
        let err = ReporterConfig::load_from(Path::new("/nonexistent/exreport.toml")).unwrap_err();
        assert!(matches!(err, ReportError::ConfigRead { .. }));
    }

    #[test]
    fn test_explicit_hostname_wins() {
        let settings = ReportSettings {
            hostname: Some("foo".to_string()),
            ..Default::default()
        };
        assert_eq!(settings.effective_hostname(), "foo");
        assert!(!system_hostname().is_empty());
    }
}
