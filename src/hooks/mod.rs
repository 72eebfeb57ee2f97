// src/hooks/mod.rs

//! In-memory hook definitions.
//!
//! A [`Hook`] owns an ordered list of [`Task`]s and an ordered list of init
//! [`Step`]s. Tasks and inits share the same [`Step`] shape, so condition
//! evaluation and execution only ever deal with one type; the task-only
//! bits (name lookup, [`InitSelection`]) live on [`Task`].
//!
//! Everything in here is built once from the validated config and never
//! mutated afterwards.

pub mod conditions;
pub mod registry;

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::types::ConcurrencyMode;

pub use conditions::Conditions;
pub use registry::HookRegistry;

#[derive(Debug, Clone)]
pub struct Hook {
    /// URL path segment selecting this hook.
    pub key: String,
    /// Label used in logs.
    pub name: String,
    pub secret: String,
    pub concurrency: ConcurrencyMode,
    pub tasks: Vec<Task>,
    pub inits: Vec<Step>,
}

/// Shape shared by tasks and inits.
#[derive(Debug, Clone)]
pub struct Step {
    pub name: String,
    pub enabled: bool,
    pub directory: Option<PathBuf>,
    pub command: String,
    pub conditions: Conditions,
}

#[derive(Debug, Clone)]
pub struct Task {
    pub step: Step,
    pub init: InitSelection,
}

/// Which of the hook's inits run before a task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "RawInitSelection")]
pub enum InitSelection {
    /// `init` absent or `false`.
    #[default]
    None,
    /// `init = true`.
    All,
    /// `init = ["a", "b"]`. Order in the list is irrelevant; inits always run
    /// in the hook's declaration order.
    Named(Vec<String>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawInitSelection {
    Flag(bool),
    Names(Vec<String>),
}

impl From<RawInitSelection> for InitSelection {
    fn from(raw: RawInitSelection) -> Self {
        match raw {
            RawInitSelection::Flag(true) => InitSelection::All,
            RawInitSelection::Flag(false) => InitSelection::None,
            RawInitSelection::Names(names) => InitSelection::Named(names),
        }
    }
}

impl InitSelection {
    fn includes(&self, init: &str) -> bool {
        match self {
            InitSelection::None => false,
            InitSelection::All => true,
            InitSelection::Named(names) => names.iter().any(|n| n == init),
        }
    }
}

impl Hook {
    /// Tasks addressed by a request: every task when no name is given,
    /// otherwise the tasks carrying that name.
    pub fn candidates(&self, task_name: Option<&str>) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|task| task_name.is_none_or(|name| task.step.name == name))
            .collect()
    }

    /// Inits selected by `task.init`, in the hook's declaration order.
    ///
    /// Names that do not exist in the hook simply produce nothing.
    pub fn inits_for<'a>(&'a self, task: &'a Task) -> impl Iterator<Item = &'a Step> + 'a {
        self.inits
            .iter()
            .filter(move |init| task.init.includes(&init.name))
    }
}

impl Step {
    /// Working directory for one run of this step.
    ///
    /// `fallback` is the owning task's directory when the step is an init.
    /// Nothing is written back, so two tasks sharing an init each get their
    /// own default.
    pub fn resolve_directory<'a>(&'a self, fallback: Option<&'a Path>) -> Option<&'a Path> {
        self.directory.as_deref().or(fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(name: &str, directory: Option<&str>) -> Step {
        Step {
            name: name.to_string(),
            enabled: true,
            directory: directory.map(PathBuf::from),
            command: format!("echo {name}"),
            conditions: Conditions::default(),
        }
    }

    fn hook(init_selections: Vec<(&str, InitSelection)>) -> Hook {
        Hook {
            key: "deploy".into(),
            name: "Deploy".into(),
            secret: "abc".into(),
            concurrency: ConcurrencyMode::Parallel,
            tasks: init_selections
                .into_iter()
                .map(|(name, init)| Task {
                    step: step(name, Some("/srv")),
                    init,
                })
                .collect(),
            inits: vec![step("a", None), step("b", None), step("c", Some("/opt"))],
        }
    }

    fn names<'a>(steps: impl Iterator<Item = &'a Step>) -> Vec<&'a str> {
        steps.map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn named_inits_follow_hook_order() {
        let hook = hook(vec![(
            "build",
            InitSelection::Named(vec!["c".into(), "zzz".into(), "a".into()]),
        )]);
        assert_eq!(names(hook.inits_for(&hook.tasks[0])), vec!["a", "c"]);
    }

    #[test]
    fn init_flag_selects_all_or_nothing() {
        let hook = hook(vec![("all", InitSelection::All), ("none", InitSelection::None)]);
        assert_eq!(names(hook.inits_for(&hook.tasks[0])), vec!["a", "b", "c"]);
        assert!(hook.inits_for(&hook.tasks[1]).next().is_none());
    }

    #[test]
    fn candidates_filter_by_name() {
        let hook = hook(vec![("build", InitSelection::None), ("test", InitSelection::None)]);
        assert_eq!(hook.candidates(None).len(), 2);
        assert_eq!(hook.candidates(Some("test"))[0].step.name, "test");
        assert!(hook.candidates(Some("nope")).is_empty());
    }

    #[test]
    fn init_directory_defaults_per_call() {
        let hook = hook(vec![]);
        let a = &hook.inits[0];
        let c = &hook.inits[2];

        assert_eq!(a.resolve_directory(Some(Path::new("/one"))), Some(Path::new("/one")));
        assert_eq!(a.resolve_directory(Some(Path::new("/two"))), Some(Path::new("/two")));
        assert_eq!(a.resolve_directory(None), None);
        assert!(a.directory.is_none());
        assert_eq!(c.resolve_directory(Some(Path::new("/one"))), Some(Path::new("/opt")));
    }

    #[test]
    fn init_selection_deserializes_from_bool_or_list() {
        #[derive(Deserialize)]
        struct Wrapper {
            #[serde(default)]
            init: InitSelection,
        }

        let parse = |s: &str| toml::from_str::<Wrapper>(s).unwrap().init;
        assert_eq!(parse(""), InitSelection::None);
        assert_eq!(parse("init = false"), InitSelection::None);
        assert_eq!(parse("init = true"), InitSelection::All);
        assert_eq!(
            parse(r#"init = ["a", "b"]"#),
            InitSelection::Named(vec!["a".into(), "b".into()])
        );
    }
}
