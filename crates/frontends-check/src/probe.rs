//! Probing a local port with `check_http`.

use std::io::{self, Read};
use std::process::{Command, Stdio};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::command::build_check_http_command_with;
use crate::error::{CheckError, Result};

/// Status reported when the plugin was killed by a signal and left no exit code.
pub const UNKNOWN_STATUS: i32 = 3;

/// Exit status and combined stdout/stderr of one probe run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    pub status: i32,
    pub output: String,
}

/// Runs a command to completion with stderr merged into stdout.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProcessSpawner: Send + Sync {
    async fn run_merged(&self, argv: Vec<String>) -> io::Result<ProbeResult>;
}

/// Spawns real child processes.
#[derive(Debug, Default)]
pub struct SystemSpawner;

impl SystemSpawner {
    fn run_blocking(argv: &[String]) -> io::Result<ProbeResult> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "empty command"))?;

        let (mut reader, writer) = io::pipe()?;
        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(writer.try_clone()?)
            .stderr(writer);

        let mut child = command.spawn()?;
        // The parent's write ends live in `command`; reading only reaches EOF once they are gone.
        drop(command);

        let mut raw = Vec::new();
        reader.read_to_end(&mut raw)?;
        let status = child.wait()?;

        Ok(ProbeResult {
            status: status.code().unwrap_or(UNKNOWN_STATUS),
            output: String::from_utf8_lossy(&raw).into_owned(),
        })
    }
}

#[async_trait]
impl ProcessSpawner for SystemSpawner {
    async fn run_merged(&self, argv: Vec<String>) -> io::Result<ProbeResult> {
        tokio::task::spawn_blocking(move || Self::run_blocking(&argv))
            .await
            .map_err(io::Error::other)?
    }
}

/// Probes a port and returns the plugin's verdict.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Probe: Send + Sync {
    async fn check_http(&self, port: u16) -> Result<ProbeResult>;
}

/// [`Probe`] backed by the Nagios `check_http` plugin.
pub struct HttpProbe {
    check_http_path: String,
    spawner: Arc<dyn ProcessSpawner>,
}

impl HttpProbe {
    pub fn new(check_http_path: impl Into<String>, spawner: Arc<dyn ProcessSpawner>) -> Self {
        Self {
            check_http_path: check_http_path.into(),
            spawner,
        }
    }
}

#[async_trait]
impl Probe for HttpProbe {
    async fn check_http(&self, port: u16) -> Result<ProbeResult> {
        let command = build_check_http_command_with(&self.check_http_path, port);
        let argv = command.split_whitespace().map(str::to_string).collect();

        debug!(port, command = %command, "Running check_http");

        let result = self
            .spawner
            .run_merged(argv)
            .await
            .map_err(|source| CheckError::Spawn {
                command: command.clone(),
                source,
            })?;

        debug!(port, status = result.status, "check_http finished");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_check_http() {
        let mut spawner = MockProcessSpawner::new();
        spawner
            .expect_run_merged()
            .withf(|argv: &Vec<String>| {
                *argv == ["/usr/bin/check_sandwich", "-H", "localhost", "-p", "19343"]
            })
            .times(1)
            .returning(|_| {
                Ok(ProbeResult {
                    status: 11,
                    output: "vader_nooooooo.jpg".to_string(),
                })
            });

        let probe = HttpProbe::new("/usr/bin/check_sandwich", Arc::new(spawner));
        let actual = probe.check_http(19343).await.unwrap();

        assert_eq!(
            actual,
            ProbeResult {
                status: 11,
                output: "vader_nooooooo.jpg".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_check_http_propagates_spawn_failure() {
        let mut spawner = MockProcessSpawner::new();
        spawner
            .expect_run_merged()
            .times(1)
            .returning(|_| Err(io::Error::new(io::ErrorKind::NotFound, "no such file")));

        let probe = HttpProbe::new(crate::command::CHECK_HTTP_PATH, Arc::new(spawner));
        let err = probe.check_http(666).await.unwrap_err();

        match err {
            CheckError::Spawn { command, .. } => {
                assert_eq!(command, "/usr/lib/nagios/plugins/check_http -H localhost -p 666");
            }
            other => panic!("expected spawn error, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_system_spawner_merges_stderr_into_stdout() {
        let argv = vec![
            "sh".to_string(),
            "-c".to_string(),
            "echo out; echo err >&2; exit 2".to_string(),
        ];

        let result = SystemSpawner.run_merged(argv).await.unwrap();

        assert_eq!(result.status, 2);
        assert_eq!(result.output, "out\nerr\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_system_spawner_signal_death_is_unknown() {
        let argv = vec!["sh".to_string(), "-c".to_string(), "kill -9 $$".to_string()];

        let result = SystemSpawner.run_merged(argv).await.unwrap();

        assert_eq!(result.status, UNKNOWN_STATUS);
        assert_eq!(result.output, "");
    }

    #[tokio::test]
    async fn test_system_spawner_missing_binary() {
        let argv = vec!["/nonexistent/check_http".to_string()];
        let err = SystemSpawner.run_merged(argv).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_system_spawner_rejects_empty_argv() {
        let err = SystemSpawner.run_merged(vec![]).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
