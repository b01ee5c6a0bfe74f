use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use runall::catalog::TaskDescriptor;
use runall::engine::{TaskFailure, TaskOutcome};
use runall::exec::TaskExecutor;

/// Scripted result for one task name.
#[derive(Debug, Clone, Default)]
pub struct FakeBehaviour {
    pub delay: Duration,
    pub failure: Option<TaskFailure>,
    pub output: String,
}

impl FakeBehaviour {
    pub fn ok() -> Self {
        Self::default()
    }

    pub fn exit(code: i32) -> Self {
        Self {
            failure: Some(TaskFailure::Exit(code)),
            ..Self::default()
        }
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_output(mut self, output: &str) -> Self {
        self.output = output.to_string();
        self
    }
}

/// A fake executor that:
/// - records which tasks were started and finished, in order
/// - tracks how many tasks were in flight at once
/// - sleeps for the scripted delay and returns the scripted outcome
///   (unscripted tasks succeed immediately)
#[derive(Debug, Clone, Default)]
pub struct FakeExecutor {
    behaviours: Arc<HashMap<String, FakeBehaviour>>,
    started: Arc<Mutex<Vec<String>>>,
    finished: Arc<Mutex<Vec<String>>>,
    in_flight: Arc<AtomicUsize>,
    peak_in_flight: Arc<AtomicUsize>,
}

impl FakeExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, behaviour: FakeBehaviour) -> Self {
        Arc::make_mut(&mut self.behaviours).insert(name.to_string(), behaviour);
        self
    }

    pub fn started(&self) -> Vec<String> {
        self.started.lock().unwrap().clone()
    }

    pub fn finished(&self) -> Vec<String> {
        self.finished.lock().unwrap().clone()
    }

    /// Highest number of tasks executing at the same time.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

impl TaskExecutor for FakeExecutor {
    fn execute(
        &self,
        task: TaskDescriptor,
    ) -> Pin<Box<dyn Future<Output = TaskOutcome> + Send + '_>> {
        Box::pin(async move {
            let behaviour = self.behaviours.get(&task.name).cloned().unwrap_or_default();
            let start = Instant::now();

            self.started.lock().unwrap().push(task.name.clone());
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

            if !behaviour.delay.is_zero() {
                tokio::time::sleep(behaviour.delay).await;
            }

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.finished.lock().unwrap().push(task.name.clone());

            TaskOutcome::new(task.name, start.elapsed(), behaviour.failure, behaviour.output)
        })
    }
}
