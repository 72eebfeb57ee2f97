// src/logging.rs

//! Logging setup for `hookrunner` using `tracing` + `tracing-subscriber`.
//!
//! The subscriber is driven by an [`EnvFilter`] built from, in order:
//! 1. the default directive `info`
//! 2. `HOOKRUNNER_LOG` (full `EnvFilter` syntax)
//! 3. `--log-level`, which replaces the global level but keeps any
//!    per-target directives from `HOOKRUNNER_LOG`
//!
//! Useful targets:
//! - `tower_http` request spans are emitted at `debug`;
//! - `hookrunner::exec::step_runner` logs each line a command prints at `debug`.
//!
//! So `HOOKRUNNER_LOG=info,tower_http=debug` traces requests without
//! flooding the output with command logs. Logs are sent to STDERR.

use anyhow::{Context, Result, anyhow};
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::LogLevel;

pub const LOG_ENV: &str = "HOOKRUNNER_LOG";

const DEFAULT_DIRECTIVE: &str = "info";

/// Initialise global logging subscriber.
///
/// Fails on invalid `HOOKRUNNER_LOG` directives, or when a global subscriber
/// is already installed.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env = std::env::var(LOG_ENV).ok();
    let filter = build_filter(env.as_deref(), cli_level)?;

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("failed to install log subscriber: {e}"))?;

    Ok(())
}

fn build_filter(env: Option<&str>, cli_level: Option<LogLevel>) -> Result<EnvFilter> {
    let directives = directives(env, cli_level);
    EnvFilter::try_new(&directives)
        .with_context(|| format!("invalid log directives '{directives}' (check {LOG_ENV})"))
}

/// Later directives for the same target win, so the CLI level goes last.
fn directives(env: Option<&str>, cli_level: Option<LogLevel>) -> String {
    let mut parts = vec![DEFAULT_DIRECTIVE];
    if let Some(env) = env.map(str::trim).filter(|s| !s.is_empty()) {
        parts.push(env);
    }
    if let Some(level) = cli_level {
        parts.push(level_directive(level));
    }
    parts.join(",")
}

fn level_directive(lvl: LogLevel) -> &'static str {
    match lvl {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    }
}
