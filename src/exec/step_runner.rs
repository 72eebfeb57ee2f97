// src/exec/step_runner.rs

//! Individual step process runner.

use std::process::Stdio;

use anyhow::{Context, Result, anyhow};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::hooks::Hook;

use super::{StepInvocation, StepOutcome};

/// Run a single step process to completion.
///
/// Never fails: a missing working directory, a spawn error or a wait error is
/// logged and reported as `StepOutcome::Failed(-1)`, so the caller can carry
/// on with the next step.
pub async fn run_step(hook: &Hook, invocation: &StepInvocation) -> StepOutcome {
    match run_step_inner(hook, invocation).await {
        Ok(outcome) => outcome,
        Err(err) => {
            error!(
                hook = %hook.name,
                kind = %invocation.kind,
                step = %invocation.name,
                error = %format!("{err:#}"),
                "step execution error"
            );
            StepOutcome::Failed(-1)
        }
    }
}

async fn run_step_inner(hook: &Hook, invocation: &StepInvocation) -> Result<StepOutcome> {
    let directory = invocation.directory.as_deref().ok_or_else(|| {
        anyhow!(
            "{} '{}' has no working directory configured",
            invocation.kind,
            invocation.name
        )
    })?;

    debug!(
        hook = %hook.name,
        kind = %invocation.kind,
        step = %invocation.name,
        cmd = %invocation.command,
        dir = %directory.display(),
        "starting step process"
    );

    // Build a shell command appropriate for the platform.
    let mut cmd = if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(&invocation.command);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(&invocation.command);
        c
    };

    cmd.current_dir(directory)
        .env("HOOKRUNNER_HOOK", &hook.key)
        .env("HOOKRUNNER_HOOK_NAME", &hook.name)
        .env("HOOKRUNNER_STEP", &invocation.name)
        .env("HOOKRUNNER_STEP_KIND", invocation.kind.as_str())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = cmd.spawn().with_context(|| {
        format!(
            "spawning process for {} '{}' in {}",
            invocation.kind,
            invocation.name,
            directory.display()
        )
    })?;

    // Always consume output so pipe buffers don't fill; log at debug.
    let stdout = child
        .stdout
        .take()
        .map(|out| forward_lines(out, "stdout", invocation));
    let stderr = child
        .stderr
        .take()
        .map(|err| forward_lines(err, "stderr", invocation));

    let status = child.wait().await.with_context(|| {
        format!(
            "waiting for process of {} '{}'",
            invocation.kind, invocation.name
        )
    })?;

    for reader in [stdout, stderr].into_iter().flatten() {
        let _ = reader.await;
    }

    let code = status.code().unwrap_or(-1);
    info!(
        hook = %hook.name,
        kind = %invocation.kind,
        step = %invocation.name,
        exit_code = code,
        success = status.success(),
        "step process exited"
    );

    Ok(StepOutcome::from_code(code))
}

fn forward_lines<R>(stream: R, channel: &'static str, invocation: &StepInvocation) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let step = invocation.name.clone();
    let kind = invocation.kind;
    tokio::spawn(async move {
        let mut lines = BufReader::new(stream).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            debug!(%kind, step = %step, "{channel}: {line}");
        }
    })
}
