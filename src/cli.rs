// src/cli.rs

//! Installer argument parsing using `clap`.
//!
//! The launcher binary has no flags of its own: every argument belongs to the
//! analysis engine.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `apex-ls-mcp-install`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "apex-ls-mcp-install",
    version,
    about = "Download and cache the apex-ls-mcp JAR.",
    long_about = None
)]
pub struct InstallArgs {
    /// Path to a TOML config file.
    ///
    /// Falls back to `APEX_LS_MCP_CONFIG`, then to the packaged defaults.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Only report whether the cache is usable; never download.
    #[arg(long)]
    pub check: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `APEX_LS_MCP_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `InstallArgs::parse()`.
pub fn parse() -> InstallArgs {
    InstallArgs::parse()
}
