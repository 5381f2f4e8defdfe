//! Shared integration-test harness for running the `launchseq` binary.

#![allow(dead_code)]

use std::path::PathBuf;
use std::process::Output;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, Command};

/// Default timeout for reading one line from the presentation.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// A running `launchseq run` process with piped stdin and stdout.
///
/// The child process is killed on drop via `kill_on_drop(true)`.
#[allow(clippy::missing_panics_doc)]
pub struct LaunchProcess {
    child: Child,
    stdin: Option<tokio::process::ChildStdin>,
    reader: BufReader<tokio::process::ChildStdout>,
    seen: Vec<String>,
}

impl LaunchProcess {
    /// Spawns `launchseq run` with the given extra arguments.
    ///
    /// Logs are silenced and views render to stdout alongside the
    /// navigator's output.
    #[allow(clippy::missing_panics_doc)]
    pub fn spawn_run(args: &[&str]) -> Self {
        let mut child = Command::new(env!("CARGO_BIN_EXE_launchseq"))
            .arg("run")
            .args(args)
            .arg("--quiet")
            .env_remove("LAUNCHSEQ_CONFIG")
            .env_remove("LAUNCHSEQ_DESTINATION")
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .expect("failed to spawn launchseq");

        let stdin = child.stdin.take().expect("stdin not captured");
        let stdout = child.stdout.take().expect("stdout not captured");

        Self {
            child,
            stdin: Some(stdin),
            reader: BufReader::new(stdout),
            seen: Vec::new(),
        }
    }

    /// Writes one input line (`""` is Enter, `"tap"` is a pointer press).
    #[allow(clippy::missing_panics_doc)]
    pub async fn send_line(&mut self, line: &str) {
        let stdin = self.stdin.as_mut().expect("stdin already closed");
        stdin
            .write_all(format!("{line}\n").as_bytes())
            .await
            .expect("failed to write to stdin");
        stdin.flush().await.expect("failed to flush stdin");
    }

    /// Reads stdout until a line containing `needle` appears.
    ///
    /// Panics on EOF or if nothing matches within `timeout`. Lines read on
    /// the way are kept in [`seen`](Self::seen).
    #[allow(clippy::missing_panics_doc)]
    pub async fn expect_line(&mut self, needle: &str, timeout: Duration) -> String {
        let result = tokio::time::timeout(timeout, async {
            loop {
                let mut line = String::new();
                let n = self
                    .reader
                    .read_line(&mut line)
                    .await
                    .expect("read_line I/O error");
                assert!(
                    n > 0,
                    "unexpected EOF waiting for {needle:?}; saw {:?}",
                    self.seen
                );
                let found = line.contains(needle);
                self.seen.push(line.clone());
                if found {
                    return line;
                }
            }
        })
        .await;
        result.unwrap_or_else(|_| panic!("timed out waiting for {needle:?}; saw {:?}", self.seen))
    }

    /// Every stdout line read so far.
    #[must_use]
    pub fn seen(&self) -> &[String] {
        &self.seen
    }

    /// Waits for the process to exit and returns its exit code.
    #[allow(clippy::missing_panics_doc)]
    pub async fn wait(mut self, timeout: Duration) -> Option<i32> {
        drop(self.stdin.take());
        let status = tokio::time::timeout(timeout, self.child.wait())
            .await
            .expect("process did not exit in time")
            .expect("failed to wait for process");
        status.code()
    }

    /// Sends SIGTERM to the process.
    #[allow(clippy::missing_panics_doc)]
    pub fn terminate(&self) {
        let pid = self.child.id().expect("process already exited");
        let status = std::process::Command::new("kill")
            .args(["-TERM", &pid.to_string()])
            .status()
            .expect("failed to run kill");
        assert!(status.success(), "kill -TERM failed");
    }
}

/// Runs `launchseq` to completion with the given arguments.
#[allow(clippy::missing_panics_doc)]
pub fn spawn_command(args: &[&str]) -> Output {
    std::process::Command::new(env!("CARGO_BIN_EXE_launchseq"))
        .args(args)
        .env_remove("LAUNCHSEQ_CONFIG")
        .env_remove("LAUNCHSEQ_DESTINATION")
        .stdin(std::process::Stdio::null())
        .output()
        .expect("failed to run launchseq")
}

/// Returns the path to a test fixture.
#[must_use]
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Same as [`fixture_path`], as a `String` for argument lists.
#[must_use]
pub fn fixture_arg(name: &str) -> String {
    fixture_path(name).display().to_string()
}
