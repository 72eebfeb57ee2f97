// src/cli.rs

//! CLI argument parsing using `clap`.

use std::net::SocketAddr;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `hookrunner`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "hookrunner",
    version,
    about = "Run configured commands when Git services send webhooks.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the hooks config file (TOML).
    ///
    /// Default: `Hooks.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = "Hooks.toml")]
    pub config: String,

    /// Address to listen on; overrides `[server].bind`.
    #[arg(long, value_name = "ADDR")]
    pub bind: Option<SocketAddr>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `HOOKRUNNER_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print hooks, but don't start the server.
    #[arg(long)]
    pub dry_run: bool,
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

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
