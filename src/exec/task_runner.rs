// src/exec/task_runner.rs

//! Individual task process runner.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, ChildStderr, ChildStdout, Command};
use tracing::{debug, info, warn};

use crate::catalog::TaskDescriptor;
use crate::engine::{TaskFailure, TaskOutcome};
use crate::types::OutputMode;

use super::backend::ExecutorOptions;

/// Run a single task process to completion and describe what happened.
///
/// The process gets the task path as its only argument (after the
/// interpreter, if any) and runs in the task file's directory. Every failure
/// (launch, non-zero exit, signal, timeout) becomes a failed outcome; this
/// function never errors. The duration covers launch overhead too.
pub async fn run_task(task: &TaskDescriptor, options: &ExecutorOptions) -> TaskOutcome {
    let started = Instant::now();
    let captured = Mutex::new(Vec::new());

    let result = run_task_inner(task, options, &captured).await;
    let duration = started.elapsed();

    let bytes = captured
        .into_inner()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    let output = String::from_utf8_lossy(&bytes).into_owned();

    match result {
        Ok(()) => TaskOutcome::succeeded(task.name.clone(), duration, output),
        Err(failure) => {
            debug!(
                task = %task.name,
                error = %failure,
                duration_ms = duration_ms(duration),
                "task process did not succeed"
            );
            TaskOutcome::failed(task.name.clone(), duration, failure, output)
        }
    }
}

async fn run_task_inner(
    task: &TaskDescriptor,
    options: &ExecutorOptions,
    captured: &Mutex<Vec<u8>>,
) -> Result<(), TaskFailure> {
    // The child runs in its own directory, so a relative path would no
    // longer point at the script.
    let script = absolute(&task.path)?;
    let workdir = absolute(task.working_dir())?;

    let mut cmd = build_command(&script, options.interpreter.as_deref());
    cmd.current_dir(&workdir)
        .stdin(Stdio::null())
        .kill_on_drop(true);

    match options.output {
        OutputMode::Streamed => {
            cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit());
        }
        OutputMode::Buffered => {
            cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
        }
    }

    info!(
        task = %task.name,
        path = ?script,
        interpreter = ?options.interpreter,
        output = %options.output,
        "starting task process"
    );

    let mut child = cmd
        .spawn()
        .map_err(|e| TaskFailure::Launch(e.to_string()))?;

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let waited: Result<Result<ExitStatus, TaskFailure>, Duration> = {
        let exit = wait_for_exit(&mut child, stdout, stderr, captured);
        match options.timeout {
            None => Ok(exit.await),
            Some(limit) => tokio::time::timeout(limit, exit)
                .await
                .map_err(|_| limit),
        }
    };

    let status = match waited {
        Ok(status) => status?,
        Err(limit) => {
            warn!(task = %task.name, timeout = ?limit, "task timed out; killing process");
            if let Err(e) = child.kill().await {
                warn!(task = %task.name, error = %e, "failed to kill timed-out process");
            }
            return Err(TaskFailure::TimedOut(limit));
        }
    };

    info!(
        task = %task.name,
        exit_code = status.code().unwrap_or(-1),
        success = status.success(),
        "task process exited"
    );

    classify(status)
}

fn absolute(path: &Path) -> Result<PathBuf, TaskFailure> {
    std::path::absolute(path)
        .map_err(|e| TaskFailure::Launch(format!("resolving path {}: {e}", path.display())))
}

fn build_command(script: &Path, interpreter: Option<&str>) -> Command {
    match interpreter {
        Some(program) => {
            let mut c = Command::new(program);
            c.arg(script);
            c
        }
        None => Command::new(script),
    }
}

/// Drain both output pipes (when captured) and wait for the process.
async fn wait_for_exit(
    child: &mut Child,
    stdout: Option<ChildStdout>,
    stderr: Option<ChildStderr>,
    captured: &Mutex<Vec<u8>>,
) -> Result<ExitStatus, TaskFailure> {
    let (out, err) = tokio::join!(pump(stdout, captured), pump(stderr, captured));
    out.and(err)
        .map_err(|e| TaskFailure::Wait(format!("reading output: {e}")))?;

    child
        .wait()
        .await
        .map_err(|e| TaskFailure::Wait(e.to_string()))
}

/// Copy one pipe into the shared buffer. Chunks from stdout and stderr land
/// in the order they are read.
async fn pump<R>(reader: Option<R>, captured: &Mutex<Vec<u8>>) -> std::io::Result<u64>
where
    R: AsyncRead + Unpin,
{
    let Some(mut reader) = reader else {
        return Ok(0);
    };

    let mut buf = vec![0u8; 8 * 1024];
    let mut total = 0u64;
    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            debug!(bytes = total, "output pipe closed");
            return Ok(total);
        }
        total += n as u64;
        captured
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .extend_from_slice(&buf[..n]);
    }
}

fn classify(status: ExitStatus) -> Result<(), TaskFailure> {
    if status.success() {
        return Ok(());
    }
    if let Some(code) = status.code() {
        return Err(TaskFailure::Exit(code));
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return Err(TaskFailure::Signal(signal));
        }
    }

    Err(TaskFailure::Exit(-1))
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
