//! Error types for exreport.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Cannot read record {}: {source}", .path.display())]
    RecordRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot read config {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Config(String),

    #[error("SMTP {stage} rejected: {reply}")]
    Smtp { stage: &'static str, reply: String },

    #[error("Mail transport error: {0}")]
    Transport(#[source] std::io::Error),
}

impl ReportError {
    /// Process exit code for the CLI
    pub fn exit_code(&self) -> i32 {
        match self {
            ReportError::RecordRead { .. } => 66,
            ReportError::ConfigRead { .. }
            | ReportError::ConfigParse(_)
            | ReportError::Config(_) => 78,
            ReportError::Smtp { .. } | ReportError::Transport(_) => 69,
        }
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_read_message_names_path() {
        let err = ReportError::RecordRead {
            path: PathBuf::from("/store/RuntimeError/2020-01-01/02/a.txt"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/store/RuntimeError/2020-01-01/02/a.txt"));
        assert!(msg.contains("denied"));
        assert_eq!(err.exit_code(), 66);
    }

    #[test]
    fn test_smtp_message() {
        let err = ReportError::Smtp {
            stage: "RCPT TO",
            reply: "550 no such user".to_string(),
        };
        assert_eq!(err.to_string(), "SMTP RCPT TO rejected: 550 no such user");
        assert_eq!(err.exit_code(), 69);
    }

    #[test]
    fn test_store_read_failure_is_not_a_transport_error() {
        fn read_store() -> Result<()> {
            std::fs::read("/nonexistent/exreport/store").map_err(|source| {
                ReportError::RecordRead {
                    path: PathBuf::from("/nonexistent/exreport/store"),
                    source,
                }
            })?;
            Ok(())
        }
        let err = read_store().unwrap_err();
        assert!(matches!(err, ReportError::RecordRead { .. }));
        assert!(!err.to_string().contains("Mail transport"));
    }
}
