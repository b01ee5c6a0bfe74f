// tests/process_executor.rs
#![cfg(unix)]

mod common;
use crate::common::{init_tracing, with_timeout, write_executable, write_script};

use std::time::Duration;

use runall::catalog::TaskDescriptor;
use runall::engine::TaskFailure;
use runall::exec::{run_task, ExecutorOptions, ProcessExecutor, TaskExecutor};
use runall::types::OutputMode;
use tempfile::tempdir;

fn sh(output: OutputMode) -> ExecutorOptions {
    ExecutorOptions {
        interpreter: Some("sh".to_string()),
        output,
        timeout: None,
    }
}

#[tokio::test]
async fn buffered_success_captures_combined_output() {
    init_tracing();
    let dir = tempdir().unwrap();
    write_script(dir.path(), "hello.sh", "echo out-line\necho err-line >&2\n");

    let task = TaskDescriptor::new(dir.path(), "hello.sh");
    let outcome = with_timeout(run_task(&task, &sh(OutputMode::Buffered))).await;

    assert_eq!(outcome.name, "hello");
    assert!(outcome.success(), "{outcome:?}");
    assert!(outcome.output.contains("out-line"), "{}", outcome.output);
    assert!(outcome.output.contains("err-line"), "{}", outcome.output);
}

#[tokio::test]
async fn nonzero_exit_is_a_failed_outcome_with_output() {
    init_tracing();
    let dir = tempdir().unwrap();
    write_script(dir.path(), "broken.sh", "echo 'something went wrong' >&2\nexit 3\n");

    let task = TaskDescriptor::new(dir.path(), "broken.sh");
    let outcome = with_timeout(run_task(&task, &sh(OutputMode::Buffered))).await;

    assert!(!outcome.success());
    assert_eq!(outcome.error, Some(TaskFailure::Exit(3)));
    assert!(outcome.output.contains("something went wrong"), "{}", outcome.output);
}

#[tokio::test]
async fn missing_interpreter_is_a_launch_failure() {
    init_tracing();
    let dir = tempdir().unwrap();
    write_script(dir.path(), "a.sh", "exit 0\n");

    let options = ExecutorOptions {
        interpreter: Some("runall-no-such-interpreter".to_string()),
        output: OutputMode::Buffered,
        timeout: None,
    };
    let task = TaskDescriptor::new(dir.path(), "a.sh");
    let outcome = with_timeout(run_task(&task, &options)).await;

    assert!(
        matches!(outcome.error, Some(TaskFailure::Launch(_))),
        "{outcome:?}"
    );
    assert!(outcome.output.is_empty());
}

#[tokio::test]
async fn runs_in_the_task_directory() {
    init_tracing();
    let dir = tempdir().unwrap();
    let jobs = dir.path().join("jobs");
    std::fs::create_dir(&jobs).unwrap();
    write_script(&jobs, "sibling.txt", "payload\n");
    write_script(&jobs, "cwd.sh", "cat sibling.txt\n");

    let task = TaskDescriptor::new(&jobs, "cwd.sh");
    let outcome = with_timeout(run_task(&task, &sh(OutputMode::Buffered))).await;

    assert!(outcome.success(), "{outcome:?}");
    assert_eq!(outcome.output.trim(), "payload");
}

#[tokio::test]
async fn timeout_kills_the_process() {
    init_tracing();
    let dir = tempdir().unwrap();
    write_script(dir.path(), "slow.sh", "sleep 5\n");

    let options = ExecutorOptions {
        timeout: Some(Duration::from_millis(200)),
        ..sh(OutputMode::Buffered)
    };
    let task = TaskDescriptor::new(dir.path(), "slow.sh");
    let outcome = with_timeout(run_task(&task, &options)).await;

    assert_eq!(outcome.error, Some(TaskFailure::TimedOut(Duration::from_millis(200))));
    assert!(outcome.duration < Duration::from_secs(3), "{:?}", outcome.duration);
}

#[tokio::test]
async fn streamed_mode_captures_nothing() {
    init_tracing();
    let dir = tempdir().unwrap();
    write_script(dir.path(), "loud.sh", "echo visible\nexit 1\n");

    let task = TaskDescriptor::new(dir.path(), "loud.sh");
    let outcome = with_timeout(run_task(&task, &sh(OutputMode::Streamed))).await;

    assert_eq!(outcome.error, Some(TaskFailure::Exit(1)));
    assert!(outcome.output.is_empty(), "{}", outcome.output);
}

#[tokio::test]
async fn executes_task_file_directly_without_interpreter() {
    init_tracing();
    let dir = tempdir().unwrap();
    write_executable(dir.path(), "direct.sh", "echo direct\n");

    let executor = ProcessExecutor::new(ExecutorOptions {
        interpreter: None,
        output: OutputMode::Buffered,
        timeout: None,
    });
    let outcome = with_timeout(executor.execute(TaskDescriptor::new(dir.path(), "direct.sh"))).await;

    assert!(outcome.success(), "{outcome:?}");
    assert_eq!(outcome.output.trim(), "direct");
}

#[tokio::test]
async fn relative_base_dir_still_resolves_the_script() {
    init_tracing();
    // The process runs in the script's directory, so a relative task path
    // must not be handed to it as-is.
    let dir = tempfile::Builder::new()
        .prefix("runall-rel-")
        .tempdir_in(".")
        .unwrap();
    assert!(dir.path().is_relative());
    write_script(dir.path(), "rel.sh", "echo relative-ok\n");

    let task = TaskDescriptor::new(dir.path(), "rel.sh");
    let outcome = with_timeout(run_task(&task, &sh(OutputMode::Buffered))).await;

    assert!(outcome.success(), "{outcome:?}");
    assert_eq!(outcome.output.trim(), "relative-ok");
}
