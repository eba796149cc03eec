//! Infrastructure implementation of the `CommandRunner` port.
//!
//! `TokioCommandRunner` is the production implementation that uses tokio
//! for async process execution. Variables exported earlier in the run are
//! applied to every child it spawns.

use std::path::Path;
use std::process::{Output, Stdio};

use anyhow::{Context, Result};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, Command};

use crate::application::ports::{CommandRunner, StreamedRun};
use crate::infra::env::SharedEnv;

/// Production `CommandRunner`. No timeout is imposed; each call runs to
/// completion or failure.
pub struct TokioCommandRunner {
    env: SharedEnv,
}

impl TokioCommandRunner {
    #[must_use]
    pub fn new(env: SharedEnv) -> Self {
        Self { env }
    }

    fn command(&self, program: &str, args: &[&str]) -> Command {
        tracing::debug!(program, ?args, "spawning");
        let mut cmd = Command::new(program);
        cmd.args(args).envs(self.env.vars()).kill_on_drop(true);
        cmd
    }
}

async fn read_all<R: AsyncReadExt + Unpin>(handle: Option<R>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(mut h) = handle {
        let _ = h.read_to_end(&mut buf).await;
    }
    buf
}

async fn collect(program: &str, mut child: Child) -> Result<Output> {
    let stdout_handle = child.stdout.take();
    let stderr_handle = child.stderr.take();
    let (status, stdout, stderr) = tokio::join!(
        child.wait(),
        read_all(stdout_handle),
        read_all(stderr_handle),
    );
    let output = Output {
        status: status.with_context(|| format!("waiting for {program}"))?,
        stdout,
        stderr,
    };
    tracing::debug!(program, status = %output.status, "finished");
    Ok(output)
}

impl CommandRunner for TokioCommandRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        let child = self
            .command(program, args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("failed to spawn {program}"))?;
        collect(program, child).await
    }

    async fn run_with_stdin(&self, program: &str, args: &[&str], input: &[u8]) -> Result<Output> {
        let mut child = self
            .command(program, args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("failed to spawn {program}"))?;

        // Written alongside collection so a child filling its stdout pipe
        // cannot block on us. The handle drops after the write, closing stdin.
        let stdin_handle = child.stdin.take();
        let input = input.to_vec();
        let writer = tokio::spawn(async move {
            match stdin_handle {
                Some(mut stdin) => stdin.write_all(&input).await,
                None => Ok(()),
            }
        });

        let output = collect(program, child).await?;
        writer
            .await
            .with_context(|| format!("stdin task of {program}"))?
            .with_context(|| format!("writing stdin of {program}"))?;
        Ok(output)
    }

    async fn run_streaming(&self, program: &str, args: &[&str], cwd: &Path) -> Result<StreamedRun> {
        let mut child = self
            .command(program, args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("failed to spawn {program} in {}", cwd.display()))?;

        let stderr_handle = child.stderr.take();
        let forward = async {
            let mut wrote = false;
            let Some(mut from) = stderr_handle else {
                return wrote;
            };
            let mut to = tokio::io::stderr();
            let mut buf = [0u8; 8192];
            while let Ok(n) = from.read(&mut buf).await {
                if n == 0 {
                    break;
                }
                wrote = true;
                let _ = to.write_all(&buf[..n]).await;
            }
            let _ = to.flush().await;
            wrote
        };

        let (status, wrote_stderr) = tokio::join!(child.wait(), forward);
        Ok(StreamedRun {
            status: status.with_context(|| format!("waiting for {program}"))?,
            wrote_stderr,
        })
    }
}
