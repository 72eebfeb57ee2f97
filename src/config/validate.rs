// src/config/validate.rs

use std::collections::{BTreeMap, HashSet};

use tracing::warn;

use crate::config::model::{ConfigFile, HookConfig, RawConfigFile, StepConfig};
use crate::errors::{HookRunnerError, Result};
use crate::hooks::{Conditions, Hook, InitSelection, Step, Task};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::HookRunnerError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        ensure_has_hooks(&raw)?;

        let mut hooks = BTreeMap::new();
        for (key, hook) in raw.hook {
            let hook = build_hook(key.clone(), hook)?;
            hooks.insert(key, hook);
        }

        Ok(ConfigFile::new_unchecked(raw.server, hooks))
    }
}

fn ensure_has_hooks(cfg: &RawConfigFile) -> Result<()> {
    if cfg.hook.is_empty() {
        return Err(HookRunnerError::ConfigError(
            "config must contain at least one [hook.<key>] section".to_string(),
        ));
    }
    Ok(())
}

fn build_hook(key: String, cfg: HookConfig) -> Result<Hook> {
    validate_hook_key(&key)?;
    validate_unique_names(&key, "task", cfg.tasks.iter().map(|t| t.step.name.as_str()))?;
    validate_unique_names(&key, "init", cfg.inits.iter().map(|i| i.name.as_str()))?;
    warn_unknown_init_references(&key, &cfg);

    if cfg.tasks.is_empty() {
        warn!(hook = %key, "hook has no tasks; requests will complete without running anything");
    }
    if cfg.secret.is_empty() {
        warn!(hook = %key, "hook has an empty secret");
    }

    let inits = cfg
        .inits
        .into_iter()
        .map(|init| build_step(&key, init))
        .collect::<Result<Vec<_>>>()?;

    let tasks = cfg
        .tasks
        .into_iter()
        .map(|task| {
            Ok(Task {
                step: build_step(&key, task.step)?,
                init: task.init,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Hook {
        name: cfg.name.unwrap_or_else(|| key.clone()),
        key,
        secret: cfg.secret,
        concurrency: cfg.concurrency,
        tasks,
        inits,
    })
}

fn validate_hook_key(key: &str) -> Result<()> {
    if key.is_empty() || key.contains('/') {
        return Err(HookRunnerError::ConfigError(format!(
            "hook key '{key}' must be a non-empty single path segment"
        )));
    }
    Ok(())
}

fn validate_unique_names<'a>(
    hook: &str,
    what: &str,
    names: impl Iterator<Item = &'a str>,
) -> Result<()> {
    let mut seen = HashSet::new();
    for name in names {
        if name.trim().is_empty() {
            return Err(HookRunnerError::ConfigError(format!(
                "hook '{hook}' has a {what} with an empty name"
            )));
        }
        if !seen.insert(name) {
            return Err(HookRunnerError::ConfigError(format!(
                "hook '{hook}' declares {what} '{name}' more than once"
            )));
        }
    }
    Ok(())
}

/// Unknown names in `init = [...]` are skipped at dispatch time; this only
/// makes them visible at startup.
fn warn_unknown_init_references(hook: &str, cfg: &HookConfig) {
    let known: HashSet<&str> = cfg.inits.iter().map(|i| i.name.as_str()).collect();

    for task in &cfg.tasks {
        if let InitSelection::Named(names) = &task.init {
            for name in names.iter().filter(|n| !known.contains(n.as_str())) {
                warn!(
                    hook = %hook,
                    task = %task.step.name,
                    init = %name,
                    "task references an init that does not exist in the hook"
                );
            }
        }
    }
}

fn build_step(hook: &str, cfg: StepConfig) -> Result<Step> {
    if cfg.command.trim().is_empty() {
        return Err(HookRunnerError::ConfigError(format!(
            "step '{}' in hook '{}' has an empty command",
            cfg.name, hook
        )));
    }

    let conditions = Conditions::compile(&cfg.conditions)?;

    Ok(Step {
        name: cfg.name,
        enabled: cfg.enabled,
        directory: cfg.directory,
        command: cfg.command,
        conditions,
    })
}
