// src/engine/dispatcher.rs

//! Webhook request dispatcher.
//!
//! One call to [`Dispatcher::handle`] processes one request start to finish:
//!
//! 1. resolve the hook by key (`404` if unknown),
//! 2. extract parameters (`500` if the sender is not a supported Git service),
//! 3. verify the secret (`401` on mismatch),
//! 4. run the addressed tasks in declaration order, each preceded by its
//!    selected inits, skipping disabled steps and steps whose conditions do
//!    not match,
//! 5. answer `200`.
//!
//! Step failures never stop the loop and never change the status code. Only
//! steps 1-3 can end a request early.

use std::sync::Arc;

use axum::http::StatusCode;
use tracing::{debug, error, info, warn};

use crate::exec::{StepExecutor, StepInvocation, StepOutcome};
use crate::hooks::{Hook, HookRegistry, Task, conditions};
use crate::params::{ParameterExtractor, ParameterSet, RawRequest};
use crate::types::StepKind;

use super::locks::HookLocks;
use super::{DispatchOptions, DispatchResponse, StepAction, StepDecision};

pub struct Dispatcher {
    registry: Arc<HookRegistry>,
    extractor: Arc<dyn ParameterExtractor>,
    executor: Arc<dyn StepExecutor>,
    locks: HookLocks,
    options: DispatchOptions,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("hooks", &self.registry.len())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    pub fn new(
        registry: Arc<HookRegistry>,
        extractor: Arc<dyn ParameterExtractor>,
        executor: Arc<dyn StepExecutor>,
        options: DispatchOptions,
    ) -> Self {
        let locks = HookLocks::from_registry(&registry);
        Self {
            registry,
            extractor,
            executor,
            locks,
            options,
        }
    }

    pub fn registry(&self) -> &HookRegistry {
        &self.registry
    }

    /// Handle `POST /{key}` (`task_name = None`) or `POST /{key}/{task}`.
    pub async fn handle(
        &self,
        key: &str,
        task_name: Option<&str>,
        request: &RawRequest,
    ) -> DispatchResponse {
        let Some(hook) = self.registry.lookup(key) else {
            return DispatchResponse::new(StatusCode::NOT_FOUND, format!("Hook '{key}' not found."));
        };

        let Some(parameters) = self.extractor.extract(request) else {
            return DispatchResponse::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Unsupported Git service.",
            );
        };

        if !parameters.secret.verify(&hook.secret) {
            warn!(hook = %hook.name, provider = %parameters.provider, "secret mismatch");
            return DispatchResponse::new(StatusCode::UNAUTHORIZED, "");
        }

        let _turn = self.locks.acquire(hook).await;

        let candidates = hook.candidates(task_name);
        let mut response = DispatchResponse::new(StatusCode::OK, "");

        // Only a named task can be missing; a hook without tasks simply has
        // nothing to run for `POST /{key}`.
        if let Some(name) = task_name.filter(|_| candidates.is_empty()) {
            let body = format!("Task '{name}' not found in hook '{key}'.");
            if self.options.strict_task_lookup {
                return DispatchResponse::new(StatusCode::NOT_FOUND, body);
            }
            warn!(hook = %hook.name, task = %name, "no task matches request");
            response.status = StatusCode::NOT_FOUND;
            response.body = body;
        }

        for task in candidates {
            self.run_task(hook, task, &parameters, &mut response.decisions)
                .await;
        }

        // The loop completed; this wins over the "task not found" status
        // recorded above, the message body is kept.
        response.status = StatusCode::OK;
        response
    }

    async fn run_task(
        &self,
        hook: &Hook,
        task: &Task,
        parameters: &ParameterSet,
        decisions: &mut Vec<StepDecision>,
    ) {
        let step = &task.step;

        if !step.enabled {
            warn!(hook = %hook.name, task = %step.name, "task is disabled");
            decisions.push(StepDecision::new(StepKind::Task, &step.name, StepAction::Disabled));
            return;
        }

        if !conditions::matches(step, parameters) {
            info!(hook = %hook.name, task = %step.name, "task doesn't match conditions");
            decisions.push(StepDecision::new(
                StepKind::Task,
                &step.name,
                StepAction::ConditionsNotMet,
            ));
            return;
        }

        for init in hook.inits_for(task) {
            if !init.enabled {
                debug!(hook = %hook.name, task = %step.name, init = %init.name, "init is disabled");
                decisions.push(StepDecision::new(StepKind::Init, &init.name, StepAction::Disabled));
                continue;
            }

            if !conditions::matches(init, parameters) {
                info!(hook = %hook.name, init = %init.name, "init doesn't match conditions");
                decisions.push(StepDecision::new(
                    StepKind::Init,
                    &init.name,
                    StepAction::ConditionsNotMet,
                ));
                continue;
            }

            info!(hook = %hook.name, task = %step.name, init = %init.name, "running init");
            let invocation = StepInvocation::init(init, step.directory.as_deref());
            // Init results are recorded but never gate the task.
            let outcome = self.executor.run(hook, &invocation).await;
            decisions.push(StepDecision::new(StepKind::Init, &init.name, StepAction::Ran(outcome)));
        }

        info!(hook = %hook.name, task = %step.name, "running task");
        let invocation = StepInvocation::task(step);
        let outcome = self.executor.run(hook, &invocation).await;
        decisions.push(StepDecision::new(StepKind::Task, &step.name, StepAction::Ran(outcome)));

        match outcome {
            StepOutcome::Success => {
                info!(hook = %hook.name, task = %step.name, "task completed");
            }
            StepOutcome::Failed(code) => {
                error!(hook = %hook.name, task = %step.name, exit_code = code, "task failed");
            }
        }
    }
}
