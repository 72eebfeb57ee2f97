#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::PathBuf;

use hookrunner::config::{
    ConfigFile, HookConfig, PatternList, RawConfigFile, ServerSection, StepConfig, TaskConfig,
};
use hookrunner::hooks::{HookRegistry, InitSelection};
use hookrunner::types::ConcurrencyMode;

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                server: ServerSection::default(),
                hook: BTreeMap::new(),
            },
        }
    }

    pub fn with_hook(mut self, key: &str, hook: HookConfig) -> Self {
        self.config.hook.insert(key.to_string(), hook);
        self
    }

    pub fn strict_task_lookup(mut self, val: bool) -> Self {
        self.config.server.strict_task_lookup = val;
        self
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }

    pub fn build_registry(self) -> HookRegistry {
        HookRegistry::from_config(&self.build())
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `HookConfig`.
pub struct HookConfigBuilder {
    hook: HookConfig,
}

impl HookConfigBuilder {
    pub fn new(secret: &str) -> Self {
        Self {
            hook: HookConfig {
                name: None,
                secret: secret.to_string(),
                concurrency: ConcurrencyMode::Parallel,
                tasks: vec![],
                inits: vec![],
            },
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.hook.name = Some(name.to_string());
        self
    }

    pub fn concurrency(mut self, mode: ConcurrencyMode) -> Self {
        self.hook.concurrency = mode;
        self
    }

    pub fn task(mut self, task: TaskConfig) -> Self {
        self.hook.tasks.push(task);
        self
    }

    pub fn init(mut self, init: StepConfig) -> Self {
        self.hook.inits.push(init);
        self
    }

    pub fn build(self) -> HookConfig {
        self.hook
    }
}

/// Builder for the fields shared by tasks and inits.
pub struct StepConfigBuilder {
    step: StepConfig,
}

impl StepConfigBuilder {
    pub fn new(name: &str, command: &str) -> Self {
        Self {
            step: StepConfig {
                name: name.to_string(),
                enabled: true,
                directory: None,
                command: command.to_string(),
                conditions: BTreeMap::new(),
            },
        }
    }

    pub fn enabled(mut self, val: bool) -> Self {
        self.step.enabled = val;
        self
    }

    pub fn directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.step.directory = Some(dir.into());
        self
    }

    pub fn when(mut self, field: &str, pattern: &str) -> Self {
        self.step
            .conditions
            .insert(field.to_string(), PatternList::One(pattern.to_string()));
        self
    }

    pub fn when_any(mut self, field: &str, patterns: &[&str]) -> Self {
        self.step.conditions.insert(
            field.to_string(),
            PatternList::Any(patterns.iter().map(|p| p.to_string()).collect()),
        );
        self
    }

    pub fn build(self) -> StepConfig {
        self.step
    }
}

/// Builder for `TaskConfig`.
pub struct TaskConfigBuilder {
    step: StepConfigBuilder,
    init: InitSelection,
}

impl TaskConfigBuilder {
    pub fn new(name: &str, command: &str) -> Self {
        Self {
            step: StepConfigBuilder::new(name, command),
            init: InitSelection::None,
        }
    }

    pub fn enabled(mut self, val: bool) -> Self {
        self.step = self.step.enabled(val);
        self
    }

    pub fn directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.step = self.step.directory(dir);
        self
    }

    pub fn when(mut self, field: &str, pattern: &str) -> Self {
        self.step = self.step.when(field, pattern);
        self
    }

    pub fn all_inits(mut self) -> Self {
        self.init = InitSelection::All;
        self
    }

    pub fn inits(mut self, names: &[&str]) -> Self {
        self.init = InitSelection::Named(names.iter().map(|n| n.to_string()).collect());
        self
    }

    pub fn build(self) -> TaskConfig {
        TaskConfig {
            step: self.step.build(),
            init: self.init,
        }
    }
}
