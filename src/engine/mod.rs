//! Container engine abstraction
//!
//! Every pipeline step is a single invocation of an external container CLI.
//! [`ContainerEngine`] is the seam between the pipeline and that CLI: the
//! production implementation is [`EngineCli`], which spawns `docker` (or a
//! compatible program such as `podman`), and tests substitute a recording fake.

pub mod cli;

pub use cli::EngineCli;

use crate::error::Result;
use crate::image::ImageReference;
use async_trait::async_trait;

/// Captured result of one successful engine invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn new(stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }
}

/// Operations the mirror needs from a container engine.
///
/// Implementations return `Err(MirrorError::EngineMissing)` when the engine
/// cannot be started at all, and `Err(MirrorError::CommandFailed)` when it ran
/// but exited unsuccessfully.
#[async_trait]
pub trait ContainerEngine: Send + Sync {
    /// Program name, used in messages
    fn program(&self) -> &str;

    /// `<engine> --version`
    async fn version(&self) -> Result<CommandOutput>;

    /// `<engine> login <registry> -u <username> --password-stdin`
    async fn login(&self, registry: &str, username: &str, token: &str) -> Result<CommandOutput>;

    /// `<engine> pull <reference>`
    async fn pull(&self, reference: &ImageReference) -> Result<CommandOutput>;

    /// `<engine> tag <source> <target>`
    async fn tag(&self, source: &ImageReference, target: &ImageReference) -> Result<CommandOutput>;

    /// `<engine> push <reference>`
    async fn push(&self, reference: &ImageReference) -> Result<CommandOutput>;
}

/// Arguments for each engine command, shared by the real engine and dry runs
pub mod commands {
    use crate::image::ImageReference;

    pub fn version() -> Vec<String> {
        vec!["--version".to_string()]
    }

    pub fn login(registry: &str, username: &str) -> Vec<String> {
        vec![
            "login".to_string(),
            registry.to_string(),
            "-u".to_string(),
            username.to_string(),
            "--password-stdin".to_string(),
        ]
    }

    pub fn pull(reference: &ImageReference) -> Vec<String> {
        vec!["pull".to_string(), reference.to_string()]
    }

    pub fn tag(source: &ImageReference, target: &ImageReference) -> Vec<String> {
        vec!["tag".to_string(), source.to_string(), target.to_string()]
    }

    pub fn push(reference: &ImageReference) -> Vec<String> {
        vec!["push".to_string(), reference.to_string()]
    }
}
