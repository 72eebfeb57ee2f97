// tests/dispatch_concurrency.rs

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::time::{Duration, sleep};

use hookrunner::engine::{DispatchOptions, Dispatcher};
use hookrunner::exec::{StepExecutor, StepInvocation, StepOutcome};
use hookrunner::hooks::Hook;
use hookrunner::params::GitServiceExtractor;
use hookrunner::types::ConcurrencyMode;
use hookrunner_test_utils::builders::{ConfigFileBuilder, HookConfigBuilder, TaskConfigBuilder};
use hookrunner_test_utils::requests::gitlab_push;
use hookrunner_test_utils::{init_tracing, with_timeout};

/// An executor that:
/// - sleeps for a while per step
/// - tracks the highest number of steps it saw running at once.
#[derive(Default)]
struct OverlapExecutor {
    running: AtomicUsize,
    peak: AtomicUsize,
}

impl StepExecutor for OverlapExecutor {
    fn run<'a>(
        &'a self,
        _hook: &'a Hook,
        _invocation: &'a StepInvocation,
    ) -> Pin<Box<dyn Future<Output = StepOutcome> + Send + 'a>> {
        Box::pin(async move {
            let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            sleep(Duration::from_millis(50)).await;
            self.running.fetch_sub(1, Ordering::SeqCst);
            StepOutcome::Success
        })
    }
}

async fn peak_overlap(mode: ConcurrencyMode) -> usize {
    let registry = ConfigFileBuilder::new()
        .with_hook(
            "deploy",
            HookConfigBuilder::new("abc")
                .concurrency(mode)
                .task(TaskConfigBuilder::new("build", "make").directory("/srv").build())
                .build(),
        )
        .build_registry();

    let executor = Arc::new(OverlapExecutor::default());
    let dispatcher = Arc::new(Dispatcher::new(
        Arc::new(registry),
        Arc::new(GitServiceExtractor),
        executor.clone(),
        DispatchOptions::default(),
    ));

    let handles: Vec<_> = (0..3)
        .map(|_| {
            let dispatcher = Arc::clone(&dispatcher);
            tokio::spawn(async move {
                dispatcher
                    .handle("deploy", None, &gitlab_push("abc", "main"))
                    .await
            })
        })
        .collect();

    for handle in handles {
        let response = with_timeout(handle).await.unwrap();
        assert_eq!(response.status, axum::http::StatusCode::OK);
    }

    executor.peak.load(Ordering::SeqCst)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn serial_hook_never_overlaps() {
    init_tracing();
    assert_eq!(peak_overlap(ConcurrencyMode::Serial).await, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn parallel_hook_may_overlap() {
    init_tracing();
    assert!(peak_overlap(ConcurrencyMode::Parallel).await > 1);
}
