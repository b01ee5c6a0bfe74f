// tests/properties.rs

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use proptest::prelude::*;
use runall::catalog::resolve_catalog;
use runall::engine::{Scheduler, SchedulerOptions, TaskFailure, TaskOutcome};
use runall::report::{Console, RunSummary};
use runall::types::SchedulePolicy;
use runall_test_utils::{CatalogBuilder, FakeBehaviour, FakeExecutor};

// A catalog of up to 12 distinct entries, each either present or missing.
fn catalog_strategy() -> impl Strategy<Value = Vec<(String, bool)>> {
    proptest::collection::vec(any::<bool>(), 0..12).prop_map(|present| {
        present
            .into_iter()
            .enumerate()
            .map(|(i, p)| (format!("job_{i}.py"), p))
            .collect()
    })
}

proptest! {
    #[test]
    fn resolution_keeps_present_entries_in_catalog_order(entries in catalog_strategy()) {
        let builder = entries.iter().fold(CatalogBuilder::new("jobs"), |b, (entry, present)| {
            if *present { b.present(entry) } else { b.missing(entry) }
        });

        let resolved = resolve_catalog(builder.fs(), builder.base_dir(), builder.entries(), &Console::capture());

        let expected: Vec<String> = entries
            .iter()
            .filter(|(_, present)| *present)
            .map(|(entry, _)| entry.trim_end_matches(".py").to_string())
            .collect();
        let names: Vec<String> = resolved.iter().map(|t| t.name.clone()).collect();
        prop_assert_eq!(names, expected);
    }

    #[test]
    fn exit_status_is_zero_iff_nothing_failed(failures in proptest::collection::vec(any::<bool>(), 0..20)) {
        let outcomes: Vec<TaskOutcome> = failures
            .iter()
            .enumerate()
            .map(|(i, failed)| {
                let error = failed.then_some(TaskFailure::Exit(1));
                TaskOutcome::new(format!("t{i}"), Duration::from_millis(i as u64), error, "")
            })
            .collect();
        let summary = RunSummary::new(outcomes, Duration::from_secs(1));

        let any_failed = failures.iter().any(|f| *f);
        prop_assert_eq!(summary.exit_code(), if any_failed { 1 } else { 0 });
        prop_assert_eq!(summary.succeeded() + summary.failed(), failures.len());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn parallel_runs_yield_one_outcome_per_task(
        delays in proptest::collection::vec(0u64..30, 0..10),
        cap in proptest::option::of(1usize..4),
    ) {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .unwrap();

        let mut catalog = CatalogBuilder::new(".");
        let mut executor = FakeExecutor::new();
        for (i, delay) in delays.iter().enumerate() {
            let name = format!("task_{i}");
            catalog = catalog.present(&format!("{name}.py"));
            executor = executor.with(&name, FakeBehaviour::ok().after(Duration::from_millis(*delay)));
        }
        let executor = Arc::new(executor);

        let options = SchedulerOptions {
            policy: SchedulePolicy::Parallel,
            max_concurrency: cap,
            progress_interval: Duration::from_millis(5),
        };
        let scheduler = Scheduler::new(executor.clone(), options, Console::capture());
        let run = runtime.block_on(scheduler.run(catalog.descriptors())).unwrap();

        let names: BTreeSet<String> = run.outcomes.iter().map(|o| o.name.clone()).collect();
        let expected: BTreeSet<String> = (0..delays.len()).map(|i| format!("task_{i}")).collect();
        prop_assert_eq!(run.outcomes.len(), delays.len());
        prop_assert_eq!(names, expected);
        if let Some(cap) = cap {
            prop_assert!(executor.peak_in_flight() <= cap);
        }
    }
}
