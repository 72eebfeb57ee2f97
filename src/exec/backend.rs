// src/exec/backend.rs

//! Pluggable executor backend abstraction.
//!
//! The dispatcher talks to a `StepExecutor` instead of spawning processes
//! itself. This makes it easy to swap in a fake executor in tests while
//! keeping the production implementation in [`step_runner`].
//!
//! - `ShellExecutor` is the default implementation used by `hookrunner`.
//!   It runs the step's command through the platform shell.
//! - Tests can provide their own `StepExecutor` that, for example, records
//!   which steps were run and returns scripted outcomes.
//!
//! [`step_runner`]: super::step_runner

use std::future::Future;
use std::pin::Pin;

use crate::hooks::Hook;

use super::step_runner::run_step;
use super::{StepInvocation, StepOutcome};

/// Trait abstracting how a single task or init is executed.
///
/// Implementations must not fail: anything that prevents the command from
/// running is reported as [`StepOutcome::Failed`].
pub trait StepExecutor: Send + Sync {
    /// Run `invocation` for `hook` and resolve once it has finished.
    fn run<'a>(
        &'a self,
        hook: &'a Hook,
        invocation: &'a StepInvocation,
    ) -> Pin<Box<dyn Future<Output = StepOutcome> + Send + 'a>>;
}

/// Real executor backend used in production.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellExecutor;

impl ShellExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl StepExecutor for ShellExecutor {
    fn run<'a>(
        &'a self,
        hook: &'a Hook,
        invocation: &'a StepInvocation,
    ) -> Pin<Box<dyn Future<Output = StepOutcome> + Send + 'a>> {
        Box::pin(run_step(hook, invocation))
    }
}
