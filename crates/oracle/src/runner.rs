use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::runtime::Runtime;
use tokio::task::JoinHandle;
use tokio::time::timeout;

use crate::config::ProverConfig;
use crate::error::Result;

// After a kill, how long the pipe readers get to hand over buffered output.
const DRAIN_GRACE: Duration = Duration::from_millis(500);

/// How a prover run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    /// Process exited on its own; `None` when killed by a signal.
    Exited(Option<i32>),
    /// Killed after exceeding the configured timeout.
    TimedOut(Duration),
    /// Could not be started or waited on.
    LaunchFailed(String),
}

/// Captured output of one prover run. Output is kept even when the run failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProverRun {
    pub stdout: String,
    pub stderr: String,
    pub status: RunStatus,
    pub elapsed: Duration,
}

impl ProverRun {
    pub fn launch_failed(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            stdout: String::new(),
            stderr: message.clone(),
            status: RunStatus::LaunchFailed(message),
            elapsed: Duration::ZERO,
        }
    }

    pub fn exit_code(&self) -> Option<i32> {
        match self.status {
            RunStatus::Exited(code) => code,
            _ => None,
        }
    }
}

/// Runs the prover as a child process, one at a time, bounded by a timeout.
///
/// Owns a current-thread tokio runtime so callers stay synchronous.
pub struct VerifierRunner {
    config: ProverConfig,
    working_dir: PathBuf,
    runtime: Runtime,
}

impl VerifierRunner {
    pub fn new(config: ProverConfig, working_dir: impl Into<PathBuf>) -> Result<Self> {
        config.validate()?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(Self {
            config,
            working_dir: working_dir.into(),
            runtime,
        })
    }

    pub fn config(&self) -> &ProverConfig {
        &self.config
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    pub fn run(&self, lemma: &str) -> ProverRun {
        self.runtime.block_on(self.run_async(lemma))
    }

    async fn run_async(&self, lemma: &str) -> ProverRun {
        let started = Instant::now();
        let mut command = Command::new(&self.config.binary);
        command
            .args(self.config.args(lemma))
            .current_dir(&self.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        log::debug!(
            "Running {} {} in {}",
            self.config.binary,
            self.config.args(lemma).join(" "),
            self.working_dir.display()
        );

        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return ProverRun::launch_failed(format!(
                    "{} not found in PATH",
                    self.config.binary
                ));
            }
            Err(err) => {
                return ProverRun::launch_failed(format!(
                    "Error running {}: {err}",
                    self.config.binary
                ));
            }
        };

        let stdout_buf = Arc::new(Mutex::new(Vec::new()));
        let stderr_buf = Arc::new(Mutex::new(Vec::new()));
        let mut readers: Vec<JoinHandle<()>> = Vec::new();
        if let Some(pipe) = child.stdout.take() {
            readers.push(tokio::spawn(drain(pipe, Arc::clone(&stdout_buf))));
        }
        if let Some(pipe) = child.stderr.take() {
            readers.push(tokio::spawn(drain(pipe, Arc::clone(&stderr_buf))));
        }

        let limit = self.config.timeout();
        let status = match timeout(limit, child.wait()).await {
            Ok(Ok(status)) => RunStatus::Exited(status.code()),
            Ok(Err(err)) => RunStatus::LaunchFailed(format!("Waiting for prover failed: {err}")),
            Err(_) => {
                if let Err(err) = child.kill().await {
                    log::warn!("Failed to kill timed-out prover: {err}");
                }
                RunStatus::TimedOut(limit)
            }
        };

        for mut reader in readers {
            if timeout(DRAIN_GRACE, &mut reader).await.is_err() {
                reader.abort();
            }
        }

        let stdout = take_text(&stdout_buf);
        let mut stderr = take_text(&stderr_buf);
        match &status {
            RunStatus::TimedOut(limit) => {
                push_line(
                    &mut stderr,
                    &format!("Command timed out after {} seconds", limit.as_secs()),
                );
            }
            RunStatus::LaunchFailed(message) => push_line(&mut stderr, message),
            RunStatus::Exited(_) => {}
        }

        ProverRun {
            stdout,
            stderr,
            status,
            elapsed: started.elapsed(),
        }
    }
}

async fn drain<R>(mut pipe: R, sink: Arc<Mutex<Vec<u8>>>)
where
    R: AsyncRead + Unpin,
{
    let mut chunk = [0u8; 8192];
    loop {
        match pipe.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                if let Ok(mut buf) = sink.lock() {
                    buf.extend_from_slice(&chunk[..n]);
                }
            }
        }
    }
}

fn take_text(buf: &Mutex<Vec<u8>>) -> String {
    buf.lock()
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .unwrap_or_default()
}

fn push_line(text: &mut String, line: &str) {
    if !text.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }
    text.push_str(line);
    text.push('\n');
}
