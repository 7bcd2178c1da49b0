//! exreport - CLI for exception record reports

pub mod cli;
pub mod commands;
pub mod logging;
