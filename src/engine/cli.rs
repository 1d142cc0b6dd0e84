//! Container engine backed by an external CLI, spawned with [`tokio::process::Command`].
//!
//! Output is captured rather than inherited so the runner decides how it is
//! displayed. Registry tokens are written to the child's stdin and never
//! appear on its command line.

use super::{CommandOutput, ContainerEngine, commands};
use crate::error::{MirrorError, Result};
use crate::image::ImageReference;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

pub const DEFAULT_ENGINE: &str = "docker";

#[derive(Debug, Clone)]
pub struct EngineCli {
    program: String,
}

impl EngineCli {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Run the engine with `args`, optionally feeding `stdin`, and fail on a
    /// non-zero exit status.
    async fn run(&self, args: &[String], stdin: Option<&str>) -> Result<CommandOutput> {
        let mut cmd = Command::new(&self.program);
        cmd.args(args)
            .stdin(if stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd.spawn().map_err(|e| self.spawn_error(e))?;

        if let Some(input) = stdin {
            if let Some(mut pipe) = child.stdin.take() {
                let written = async {
                    pipe.write_all(input.as_bytes()).await?;
                    pipe.write_all(b"\n").await
                }
                .await;
                // An engine that exits before reading stdin closes the pipe;
                // its exit status and stderr still decide the outcome
                match written {
                    Err(e) if e.kind() != ErrorKind::BrokenPipe => return Err(e.into()),
                    _ => {}
                }
                // Dropping the handle closes stdin so the engine stops reading
                drop(pipe);
            }
        }

        let output = child.wait_with_output().await?;
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            return Err(MirrorError::CommandFailed {
                command: format!("{} {}", self.program, args.join(" ")),
                status: output.status.to_string(),
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(CommandOutput { stdout, stderr })
    }

    fn spawn_error(&self, err: std::io::Error) -> MirrorError {
        match err.kind() {
            ErrorKind::NotFound | ErrorKind::PermissionDenied => MirrorError::EngineMissing {
                engine: self.program.clone(),
            },
            _ => MirrorError::Io(err),
        }
    }
}

#[async_trait]
impl ContainerEngine for EngineCli {
    fn program(&self) -> &str {
        &self.program
    }

    async fn version(&self) -> Result<CommandOutput> {
        // A present but broken engine counts as missing
        self.run(&commands::version(), None)
            .await
            .map_err(|e| match e {
                MirrorError::CommandFailed { .. } => MirrorError::EngineMissing {
                    engine: self.program.clone(),
                },
                other => other,
            })
    }

    async fn login(&self, registry: &str, username: &str, token: &str) -> Result<CommandOutput> {
        self.run(&commands::login(registry, username), Some(token))
            .await
    }

    async fn pull(&self, reference: &ImageReference) -> Result<CommandOutput> {
        self.run(&commands::pull(reference), None).await
    }

    async fn tag(&self, source: &ImageReference, target: &ImageReference) -> Result<CommandOutput> {
        self.run(&commands::tag(source, target), None).await
    }

    async fn push(&self, reference: &ImageReference) -> Result<CommandOutput> {
        self.run(&commands::push(reference), None).await
    }
}
