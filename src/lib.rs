// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod hooks;
pub mod logging;
pub mod params;
pub mod server;
pub mod types;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::ConfigFile;
use crate::config::loader::load_and_validate;
use crate::engine::{DispatchOptions, Dispatcher};
use crate::exec::ShellExecutor;
use crate::hooks::{HookRegistry, InitSelection, Step};
use crate::params::GitServiceExtractor;
use crate::server::AppState;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - the hook registry
/// - parameter extraction and the shell executor
/// - the dispatcher and HTTP server
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_and_validate(&config_path)?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    let addr = args.bind.unwrap_or(cfg.server.bind);
    let options = DispatchOptions {
        strict_task_lookup: cfg.server.strict_task_lookup,
    };

    let registry = Arc::new(HookRegistry::from_config(&cfg));
    info!(hooks = ?registry.keys().collect::<Vec<_>>(), "loaded hooks");

    let dispatcher = Dispatcher::new(
        registry,
        Arc::new(GitServiceExtractor),
        Arc::new(ShellExecutor::new()),
        options,
    );

    server::serve(addr, AppState::new(dispatcher)).await
}

/// Simple dry-run output: print hooks, tasks, inits and commands.
fn print_dry_run(cfg: &ConfigFile) {
    println!("hookrunner dry-run");
    println!("  server.bind = {}", cfg.server.bind);
    println!("  server.strict_task_lookup = {}", cfg.server.strict_task_lookup);
    println!();

    println!("hooks ({}):", cfg.hooks.len());
    for (key, hook) in cfg.hooks.iter() {
        println!("  - {key} ({})", hook.name);
        println!("      concurrency: {:?}", hook.concurrency);

        for task in &hook.tasks {
            println!("      task {}", task.step.name);
            print_step(&task.step);
            match &task.init {
                InitSelection::None => {}
                InitSelection::All => println!("          init: all"),
                InitSelection::Named(names) => println!("          init: {names:?}"),
            }
        }

        for init in &hook.inits {
            println!("      init {}", init.name);
            print_step(init);
        }
    }

    debug!("dry-run complete (no server started)");
}

fn print_step(step: &Step) {
    println!("          cmd: {}", step.command);
    if let Some(ref dir) = step.directory {
        println!("          directory: {}", dir.display());
    }
    if !step.enabled {
        println!("          enabled: false");
    }
    for (field, patterns) in step.conditions.describe() {
        println!("          when {field}: {patterns:?}");
    }
}
