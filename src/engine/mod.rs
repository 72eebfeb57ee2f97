// src/engine/mod.rs

//! Request dispatch engine for hookrunner.
//!
//! This module ties together:
//! - the hook registry (which hook a request is for)
//! - parameter extraction and secret verification
//! - condition evaluation for tasks and their inits
//! - the step executor
//!
//! The dispatch algorithm lives in [`dispatcher`]; [`locks`] holds the
//! optional per-hook serialization used by `concurrency = "serial"` hooks.

use axum::http::StatusCode;

use crate::exec::StepOutcome;
use crate::types::StepKind;

/// What happened to one task or init during a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepAction {
    Disabled,
    ConditionsNotMet,
    Ran(StepOutcome),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepDecision {
    pub kind: StepKind,
    pub name: String,
    pub action: StepAction,
}

impl StepDecision {
    pub fn new(kind: StepKind, name: impl Into<String>, action: StepAction) -> Self {
        Self {
            kind,
            name: name.into(),
            action,
        }
    }
}

/// Result of dispatching one webhook request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchResponse {
    pub status: StatusCode,
    pub body: String,
    /// Every skip/run decision, in the order it was taken.
    pub decisions: Vec<StepDecision>,
}

impl DispatchResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            decisions: Vec::new(),
        }
    }

    /// Names of the steps that were actually executed, in order.
    pub fn executed(&self) -> impl Iterator<Item = (StepKind, &str)> {
        self.decisions
            .iter()
            .filter(|d| matches!(d.action, StepAction::Ran(_)))
            .map(|d| (d.kind, d.name.as_str()))
    }
}

/// Dispatcher behaviour taken from the `[server]` config section.
#[derive(Debug, Clone, Copy, Default)]
pub struct DispatchOptions {
    /// Return `404` immediately when a requested task name matches nothing,
    /// instead of completing the request with `200`.
    pub strict_task_lookup: bool,
}

pub mod dispatcher;
pub mod locks;

pub use dispatcher::Dispatcher;
pub use locks::HookLocks;
