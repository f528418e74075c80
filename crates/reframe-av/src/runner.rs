//! Asynchronous subprocess execution with line-streamed diagnostics.

use crate::{Error, Invocation, Result};
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::task::JoinHandle;

/// Default bound on how long completion may trail the launch.
const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(30);

/// Tunables for subprocess supervision.
#[derive(Debug, Clone)]
pub struct RunnerSettings {
    /// Upper bound between launch and the completion callback. When it
    /// elapses the runner stops waiting and declares completion anyway.
    pub wait_timeout: Duration,
    /// Kill and reap the subprocess when `wait_timeout` elapses. Off by
    /// default: the timeout bounds the caller's notification delay, not
    /// the subprocess lifetime.
    pub kill_on_timeout: bool,
}

impl Default for RunnerSettings {
    fn default() -> Self {
        Self {
            wait_timeout: DEFAULT_WAIT_TIMEOUT,
            kill_on_timeout: false,
        }
    }
}

/// How one run ended, delivered to the completion callback.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// Exit status, `None` when the wait timed out or failed before the
    /// process was reaped.
    pub status: Option<ExitStatus>,
    /// The wait timeout elapsed before the process exited.
    pub timed_out: bool,
}

impl RunOutcome {
    /// True when the process exited with a success status.
    pub fn success(&self) -> bool {
        self.status.map(|s| s.success()).unwrap_or(false)
    }
}

/// One in-flight subprocess.
///
/// The spawned drain task owns the OS child and fires the callbacks;
/// the handle observes the caller-visible completion. Never reused
/// across invocations.
#[derive(Debug)]
pub struct ExecutionHandle {
    task: JoinHandle<()>,
}

impl ExecutionHandle {
    /// True once the completion callback has run.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait until the completion callback has run.
    pub async fn join(self) {
        let _ = self.task.await;
    }
}

/// Launches invocations and streams their diagnostic output.
///
/// The tool's stderr is drained one line at a time into `on_line`, in
/// emission order; stdout is not consumed. `on_complete` runs exactly
/// once per launch, strictly after the last line has been delivered,
/// whatever the exit path. A launch failure is the only error returned
/// from [`ProcessRunner::run`] itself; everything after a successful
/// spawn is absorbed into the line stream or the completion outcome.
///
/// # Example
///
/// ```no_run
/// use reframe_av::{CommandBuilder, OutputDir, ProcessRunner, TranscodeOptions};
///
/// # async fn example() -> reframe_av::Result<()> {
/// let outputs = OutputDir::create("output")?;
/// let builder = CommandBuilder::new("ffmpeg");
/// let options = TranscodeOptions::new("/media/raw.mov", "clip.mp4");
/// let invocation = builder.build(&options, &outputs)?;
///
/// let runner = ProcessRunner::new();
/// let handle = runner.run(
///     invocation,
///     |line| println!("{line}"),
///     |outcome| println!("done, success: {}", outcome.success()),
/// )?;
/// handle.join().await;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    settings: RunnerSettings,
}

impl ProcessRunner {
    /// Create a runner with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a runner with explicit settings.
    pub fn with_settings(settings: RunnerSettings) -> Self {
        Self { settings }
    }

    /// Get the runner's settings.
    pub fn settings(&self) -> &RunnerSettings {
        &self.settings
    }

    /// Launch `invocation` and return once the subprocess is running.
    ///
    /// Must be called within a Tokio runtime; the drain task is spawned
    /// onto it. The returned handle reports (or awaits) completion.
    /// Callbacks run on the drain task, not the calling thread, and
    /// `on_line` deliveries for one handle are sequential and in stream
    /// order.
    ///
    /// # Errors
    ///
    /// [`Error::Launch`] when the executable is missing or not
    /// runnable. Later failures surface through the callbacks instead:
    /// a stream read error becomes one synthetic line followed by
    /// end-of-stream, and an elapsed wait becomes an outcome with
    /// `timed_out` set.
    pub fn run(
        &self,
        invocation: Invocation,
        mut on_line: impl FnMut(String) + Send + 'static,
        on_complete: impl FnOnce(RunOutcome) + Send + 'static,
    ) -> Result<ExecutionHandle> {
        let tool = invocation.tool_name();
        tracing::debug!("launching {}", invocation);

        let mut cmd = Command::new(invocation.program());
        cmd.args(invocation.args())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        let mut child = cmd
            .spawn()
            .map_err(|e| Error::launch(&tool, e.to_string()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| Error::launch(&tool, "stderr pipe unavailable"))?;

        let settings = self.settings.clone();
        let task = tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();

            // One deadline bounds drain plus reap, so the caller hears
            // completion within the configured window even from a tool
            // that never exits or never closes its stderr.
            let waited = tokio::time::timeout(settings.wait_timeout, async {
                loop {
                    match lines.next_line().await {
                        Ok(Some(line)) => on_line(line),
                        Ok(None) => break,
                        Err(e) => {
                            on_line(format!("error reading {tool} output: {e}"));
                            break;
                        }
                    }
                }
                child.wait().await
            })
            .await;

            let outcome = match waited {
                Ok(Ok(status)) => RunOutcome {
                    status: Some(status),
                    timed_out: false,
                },
                Ok(Err(e)) => {
                    tracing::warn!("failed to wait for {}: {}", tool, e);
                    RunOutcome {
                        status: None,
                        timed_out: false,
                    }
                }
                Err(_elapsed) => {
                    if settings.kill_on_timeout {
                        if let Err(e) = child.kill().await {
                            tracing::warn!("failed to kill {} after timeout: {}", tool, e);
                        }
                    } else {
                        tracing::warn!(
                            "{} still running after {:?}; gave up waiting",
                            tool,
                            settings.wait_timeout
                        );
                    }
                    RunOutcome {
                        status: None,
                        timed_out: true,
                    }
                }
            };

            // Release the child and any remaining pipe handles before
            // completion is signaled.
            drop(child);
            on_complete(outcome);
        });

        Ok(ExecutionHandle { task })
    }
}
