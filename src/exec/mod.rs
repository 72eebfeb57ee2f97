// src/exec/mod.rs

//! Process execution layer.
//!
//! This module is responsible for actually running the commands of tasks and
//! inits, using `tokio::process::Command`, and reporting how they ended.
//!
//! - [`backend`] provides the `StepExecutor` trait and the concrete
//!   `ShellExecutor` used in production, which tests can replace with a
//!   recording fake.
//! - [`step_runner`] spawns and awaits a single step process.

pub mod backend;
pub mod step_runner;

use std::path::{Path, PathBuf};

use crate::hooks::Step;
use crate::types::StepKind;

pub use backend::{ShellExecutor, StepExecutor};

/// How a step process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Success,
    /// Nonzero exit code, or `-1` when the process could not be spawned or
    /// was terminated by a signal.
    Failed(i32),
}

impl StepOutcome {
    pub fn from_code(code: i32) -> Self {
        if code == 0 {
            StepOutcome::Success
        } else {
            StepOutcome::Failed(code)
        }
    }
}

/// One concrete run of a step, with its working directory already resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepInvocation {
    pub kind: StepKind,
    pub name: String,
    pub command: String,
    pub directory: Option<PathBuf>,
}

impl StepInvocation {
    pub fn task(step: &Step) -> Self {
        Self::new(StepKind::Task, step, None)
    }

    /// An init run on behalf of a task whose directory is `task_directory`.
    pub fn init(step: &Step, task_directory: Option<&Path>) -> Self {
        Self::new(StepKind::Init, step, task_directory)
    }

    fn new(kind: StepKind, step: &Step, fallback: Option<&Path>) -> Self {
        Self {
            kind,
            name: step.name.clone(),
            command: step.command.clone(),
            directory: step.resolve_directory(fallback).map(Path::to_path_buf),
        }
    }
}
