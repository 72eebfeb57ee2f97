// src/config/model.rs

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::path::PathBuf;

use serde::Deserialize;

use crate::hooks::{Hook, InitSelection};
use crate::types::ConcurrencyMode;

/// Configuration exactly as read from a TOML file, before validation.
///
/// ```toml
/// [server]
/// bind = "0.0.0.0:46657"
///
/// [hook.deploy]
/// secret = "abc"
///
/// [[hook.deploy.init]]
/// name = "fetch"
/// command = "git fetch --all"
///
/// [[hook.deploy.task]]
/// name = "build"
/// directory = "/srv/site"
/// command = "make build"
/// init = true
/// conditions = { branch = "main" }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    /// Listener settings from `[server]`.
    #[serde(default)]
    pub server: ServerSection,

    /// All hooks from `[hook.<key>]`, keyed by the URL path segment.
    #[serde(default)]
    pub hook: BTreeMap<String, HookConfig>,
}

/// Validated configuration.
///
/// Only obtainable through `TryFrom<RawConfigFile>` (see `validate.rs`), so
/// every hook in here has unique task/init names and compiled conditions.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub server: ServerSection,
    pub hooks: BTreeMap<String, Hook>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(server: ServerSection, hooks: BTreeMap<String, Hook>) -> Self {
        Self { server, hooks }
    }
}

/// `[server]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSection {
    /// Socket address the HTTP listener binds to.
    #[serde(default = "default_bind")]
    pub bind: SocketAddr,

    /// Answer `404` right away when `/{key}/{task}` names no task in the hook.
    ///
    /// Off by default: the request then completes with `200` like any other
    /// dispatch that ran nothing.
    #[serde(default)]
    pub strict_task_lookup: bool,
}

fn default_bind() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 46657))
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            strict_task_lookup: false,
        }
    }
}

/// `[hook.<key>]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct HookConfig {
    /// Label used in logs; defaults to the hook key.
    #[serde(default)]
    pub name: Option<String>,

    /// Shared secret the incoming webhook must present.
    #[serde(default)]
    pub secret: String,

    #[serde(default)]
    pub concurrency: ConcurrencyMode,

    /// `[[hook.<key>.task]]` entries, in declaration order.
    #[serde(default, rename = "task")]
    pub tasks: Vec<TaskConfig>,

    /// `[[hook.<key>.init]]` entries, in declaration order.
    #[serde(default, rename = "init")]
    pub inits: Vec<StepConfig>,
}

/// Fields shared by tasks and inits.
#[derive(Debug, Clone, Deserialize)]
pub struct StepConfig {
    pub name: String,

    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Working directory. Inits without one use the directory of the task
    /// they run for.
    #[serde(default)]
    pub directory: Option<PathBuf>,

    /// Shell command line.
    pub command: String,

    /// Parameter field name -> glob pattern(s) the value must match.
    #[serde(default)]
    pub conditions: BTreeMap<String, PatternList>,
}

fn default_enabled() -> bool {
    true
}

/// `[[hook.<key>.task]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskConfig {
    #[serde(flatten)]
    pub step: StepConfig,

    /// `false`/absent, `true`, or a list of init names.
    #[serde(default)]
    pub init: InitSelection,
}

/// A single glob or a list of alternatives.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PatternList {
    One(String),
    Any(Vec<String>),
}

impl PatternList {
    pub fn patterns(&self) -> &[String] {
        match self {
            PatternList::One(p) => std::slice::from_ref(p),
            PatternList::Any(ps) => ps,
        }
    }
}
