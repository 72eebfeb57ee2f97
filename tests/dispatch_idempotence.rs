// tests/dispatch_idempotence.rs

use proptest::prelude::*;

use hookrunner::engine::DispatchOptions;
use hookrunner::hooks::HookRegistry;
use hookrunner_test_utils::builders::{
    ConfigFileBuilder, HookConfigBuilder, StepConfigBuilder, TaskConfigBuilder,
};
use hookrunner_test_utils::fake_executor::RecordingExecutor;
use hookrunner_test_utils::recording_dispatcher;
use hookrunner_test_utils::requests::gitlab_push;

const BRANCHES: [&str; 3] = ["main", "dev", "feature/*"];

#[derive(Debug, Clone)]
struct StepShape {
    enabled: bool,
    branch: Option<usize>,
}

#[derive(Debug, Clone)]
struct TaskShape {
    step: StepShape,
    inits: Option<Vec<usize>>,
    fails: bool,
}

fn step_shape() -> impl Strategy<Value = StepShape> {
    (any::<bool>(), proptest::option::of(0..BRANCHES.len()))
        .prop_map(|(enabled, branch)| StepShape { enabled, branch })
}

fn task_shape(num_inits: usize) -> impl Strategy<Value = TaskShape> {
    (
        step_shape(),
        proptest::option::of(proptest::collection::vec(0..num_inits + 1, 0..4)),
        any::<bool>(),
    )
        .prop_map(|(step, inits, fails)| TaskShape { step, inits, fails })
}

fn hook_strategy() -> impl Strategy<Value = (Vec<StepShape>, Vec<TaskShape>)> {
    (1..4usize).prop_flat_map(|num_inits| {
        (
            proptest::collection::vec(step_shape(), num_inits),
            proptest::collection::vec(task_shape(num_inits), 0..5),
        )
    })
}

fn build(inits: &[StepShape], tasks: &[TaskShape]) -> (HookRegistry, RecordingExecutor) {
    let mut hook = HookConfigBuilder::new("abc");
    for (i, init) in inits.iter().enumerate() {
        let mut b = StepConfigBuilder::new(&format!("init_{i}"), "true").enabled(init.enabled);
        if let Some(idx) = init.branch {
            b = b.when("branch", BRANCHES[idx]);
        }
        hook = hook.init(b.build());
    }

    let mut executor = RecordingExecutor::new();
    for (i, task) in tasks.iter().enumerate() {
        let name = format!("task_{i}");
        let mut b = TaskConfigBuilder::new(&name, "true")
            .directory("/srv")
            .enabled(task.step.enabled);
        if let Some(idx) = task.step.branch {
            b = b.when("branch", BRANCHES[idx]);
        }
        b = match &task.inits {
            None => b,
            // Index `num_inits` names an init that does not exist.
            Some(idxs) => {
                let names: Vec<String> = idxs.iter().map(|j| format!("init_{j}")).collect();
                let refs: Vec<&str> = names.iter().map(String::as_str).collect();
                b.inits(&refs)
            }
        };
        if task.fails {
            executor = executor.exit_code(&name, 1);
        }
        hook = hook.task(b.build());
    }

    let registry = ConfigFileBuilder::new()
        .with_hook("h", hook.build())
        .build_registry();
    (registry, executor)
}

proptest! {
    #[test]
    fn repeated_dispatch_takes_identical_decisions(
        (inits, tasks) in hook_strategy(),
        branch in prop::sample::select(vec!["main", "dev", "feature/x"]),
    ) {
        let (registry, executor) = build(&inits, &tasks);
        let dispatcher = recording_dispatcher(registry, &executor, DispatchOptions::default());
        let request = gitlab_push("abc", branch);

        let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
        let first = rt.block_on(dispatcher.handle("h", None, &request));
        let second = rt.block_on(dispatcher.handle("h", None, &request));

        prop_assert_eq!(first.status, axum::http::StatusCode::OK);
        prop_assert_eq!(&first.decisions, &second.decisions);

        // Both dispatches executed the same steps.
        let runs = executor.labels();
        prop_assert_eq!(runs.len(), first.executed().count() * 2);
    }
}
