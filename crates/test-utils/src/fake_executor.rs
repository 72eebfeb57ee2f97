use std::collections::HashMap;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use hookrunner::exec::{StepExecutor, StepInvocation, StepOutcome};
use hookrunner::hooks::Hook;
use hookrunner::types::StepKind;

/// One call the fake executor received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRun {
    pub hook: String,
    pub kind: StepKind,
    pub name: String,
    pub command: String,
    pub directory: Option<PathBuf>,
}

/// A fake executor that:
/// - records which steps were "run"
/// - immediately returns `Success`, unless an exit code was scripted for
///   that step name with [`RecordingExecutor::exit_code`].
#[derive(Clone, Default)]
pub struct RecordingExecutor {
    runs: Arc<Mutex<Vec<RecordedRun>>>,
    exit_codes: Arc<Mutex<HashMap<String, i32>>>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every run of the step called `name` exit with `code`.
    pub fn exit_code(self, name: &str, code: i32) -> Self {
        self.exit_codes
            .lock()
            .unwrap()
            .insert(name.to_string(), code);
        self
    }

    pub fn runs(&self) -> Vec<RecordedRun> {
        self.runs.lock().unwrap().clone()
    }

    /// `"task:build"` / `"init:fetch"` labels, in execution order.
    pub fn labels(&self) -> Vec<String> {
        self.runs()
            .iter()
            .map(|r| format!("{}:{}", r.kind, r.name))
            .collect()
    }
}

impl StepExecutor for RecordingExecutor {
    fn run<'a>(
        &'a self,
        hook: &'a Hook,
        invocation: &'a StepInvocation,
    ) -> Pin<Box<dyn Future<Output = StepOutcome> + Send + 'a>> {
        let runs = Arc::clone(&self.runs);
        let code = self
            .exit_codes
            .lock()
            .unwrap()
            .get(&invocation.name)
            .copied()
            .unwrap_or(0);

        Box::pin(async move {
            {
                let mut guard = runs.lock().unwrap();
                guard.push(RecordedRun {
                    hook: hook.key.clone(),
                    kind: invocation.kind,
                    name: invocation.name.clone(),
                    command: invocation.command.clone(),
                    directory: invocation.directory.clone(),
                });
            }
            StepOutcome::from_code(code)
        })
    }
}
