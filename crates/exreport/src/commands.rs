//! Command handlers

use anyhow::{Context, Result};
use exreport_common::{ReportError, ReportOutcome, Reporter, ReporterConfig};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::cli::{Cli, Format};

/// Config file (explicit or user default) with CLI flags applied on top
pub fn load_config(cli: &Cli) -> Result<ReporterConfig> {
    let mut config = match &cli.config {
        Some(path) => ReporterConfig::load_from(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ReporterConfig::load().context("Failed to load user config")?,
    };
    cli.options.apply(&mut config);
    config.validate().context("Invalid options")?;
    Ok(config)
}

/// Handle `exreport report`
pub fn report(config: &ReporterConfig, output: Option<&Path>, format: Format) -> Result<()> {
    let reporter = Reporter::new(config);

    let document = match format {
        Format::Json => {
            let aggregate = reporter.aggregate()?;
            serde_json::to_string_pretty(&aggregate).context("Failed to encode aggregate")?
        }
        Format::Html => match reporter.run()? {
            ReportOutcome::Mailed { recipient } => {
                println!("Report mailed to {}", recipient);
                return Ok(());
            }
            ReportOutcome::Document(html) => html,
        },
    };

    match output {
        Some(path) => {
            fs::write(path, &document)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Report written to {}", path.display());
        }
        None => println!("{}", document),
    }
    Ok(())
}

/// Handle `exreport scan`
pub fn scan(config: &ReporterConfig) -> Result<()> {
    let reporter = Reporter::new(config);
    let window = reporter.window();
    info!("Scanning {} from {}", window.date_dir(), window.min_time);

    for record in reporter.scan() {
        println!("{}", record.path.display());
    }
    Ok(())
}

/// Process exit status for a failed command, looking through `.context`
pub fn exit_code(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<ReportError>()
        .map(|e| e.exit_code() as u8)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_load_explicit_config_then_flags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[store]\nroot = \"/from/file\"\nstrip = 3\n\n[report]\nhostname = \"filehost\"\n",
        )
        .unwrap();

        let cli = Cli::try_parse_from([
            "exreport",
            "--config",
            path.to_str().unwrap(),
            "--hostname",
            "flaghost",
            "scan",
        ])
        .unwrap();
        let config = load_config(&cli).unwrap();

        assert_eq!(config.store.root, Path::new("/from/file"));
        assert_eq!(config.store.strip, 3);
        assert_eq!(config.report.hostname.as_deref(), Some("flaghost"));
    }

    #[test]
    fn test_missing_explicit_config_fails() {
        let cli = Cli::try_parse_from(["exreport", "--config", "/nonexistent/exreport.toml", "scan"])
            .unwrap();
        assert!(load_config(&cli).is_err());
    }

    #[test]
    fn test_report_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ReporterConfig::default();
        config.store.root = dir.path().join("exceptions");
        config.report.hostname = Some("foo".to_string());

        let out = dir.path().join("report.html");
        report(&config, Some(&out), Format::Html).unwrap();
        let html = fs::read_to_string(&out).unwrap();
        assert!(html.starts_with("<html>"));

        let out = dir.path().join("report.json");
        report(&config, Some(&out), Format::Json).unwrap();
        let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert!(json["exceptions"].as_object().unwrap().is_empty());
    }

    #[test]
    fn test_exit_code_through_context() {
        let err = anyhow::Error::new(ReportError::Config("bad".to_string())).context("Invalid options");
        assert_eq!(exit_code(&err), 78);
        assert_eq!(exit_code(&anyhow::anyhow!("other")), 1);
    }
}
