//! Command-line argument parsing

use crate::engine::cli::DEFAULT_ENGINE;
use crate::error::{MirrorError, Result};
use crate::image::DEFAULT_TAG;
use clap::{Parser, ValueEnum};

pub const DEFAULT_SOURCE_IMAGE: &str = "typesense/typesense";
pub const DEFAULT_REGISTRY: &str = "ghcr.io";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "image-mirror")]
#[command(about = "Mirror a Docker Hub image to the GitHub Container Registry")]
#[command(version)]
pub struct Args {
    /// GitHub username (required unless --skip-login is given)
    #[arg(long = "username", short = 'u')]
    pub username: Option<String>,

    /// GitHub personal access token with write:packages permission (required unless --skip-login is given)
    #[arg(long = "token", short = 't')]
    pub token: Option<String>,

    /// Target repository path, e.g. 'username/repo-name'
    #[arg(long = "repo", short = 'r')]
    pub repo: String,

    /// Tag to pull from Docker Hub
    #[arg(long = "source-tag", default_value = DEFAULT_TAG)]
    pub source_tag: String,

    /// Tag to push to the target registry
    #[arg(long = "target-tag", default_value = DEFAULT_TAG)]
    pub target_tag: String,

    /// Skip registry login (useful if already logged in)
    #[arg(long = "skip-login")]
    pub skip_login: bool,

    /// Source image on Docker Hub, without tag
    #[arg(long = "source-image", default_value = DEFAULT_SOURCE_IMAGE)]
    pub source_image: String,

    /// Target registry host
    #[arg(long = "registry")]
    pub registry: Option<String>,

    /// Image name under the target repository (defaults to the source image name)
    #[arg(long = "image-name")]
    pub image_name: Option<String>,

    /// Container engine CLI to invoke
    #[arg(long = "engine")]
    pub engine: Option<String>,

    /// Print the commands that would run without executing them
    #[arg(long = "dry-run", short = 'n')]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(long = "verbose", short = 'v', conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only print errors
    #[arg(long = "quiet", short = 'q')]
    pub quiet: bool,

    /// Output format for the final report
    #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
    pub output: OutputFormat,
}

impl Args {
    pub fn parse_args() -> Self {
        Args::parse()
    }

    /// Fill unset options from `MIRROR_*` environment variables
    pub fn with_process_env(self) -> Self {
        self.with_env(|key| std::env::var(key).ok())
    }

    /// Fill unset options using `lookup` as the environment
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.username.is_none() {
            self.username = lookup("MIRROR_USERNAME");
        }

        if self.token.is_none() {
            self.token = lookup("MIRROR_TOKEN").or_else(|| lookup("GITHUB_TOKEN"));
        }

        if self.registry.is_none() {
            self.registry = lookup("MIRROR_REGISTRY");
        }

        if self.engine.is_none() {
            self.engine = lookup("MIRROR_ENGINE");
        }

        if let Some(val) = lookup("MIRROR_VERBOSE") {
            if !self.quiet && (val.eq_ignore_ascii_case("true") || val == "1") {
                self.verbose = true;
            }
        }

        self
    }

    pub fn registry(&self) -> &str {
        self.registry.as_deref().unwrap_or(DEFAULT_REGISTRY)
    }

    pub fn engine(&self) -> &str {
        self.engine.as_deref().unwrap_or(DEFAULT_ENGINE)
    }

    /// Validate argument combinations clap cannot express
    pub fn validate(&self) -> Result<()> {
        if self.repo.trim_matches('/').is_empty() {
            return Err(MirrorError::Validation(
                "--repo cannot be empty".to_string(),
            ));
        }

        if self.engine().trim().is_empty() {
            return Err(MirrorError::Validation(
                "--engine cannot be empty".to_string(),
            ));
        }

        if !self.skip_login {
            if self.username.as_deref().is_none_or(str::is_empty) {
                return Err(MirrorError::Validation(
                    "--username is required unless --skip-login is given".to_string(),
                ));
            }
            if self.token.as_deref().is_none_or(str::is_empty) {
                return Err(MirrorError::Validation(
                    "--token is required unless --skip-login is given".to_string(),
                ));
            }
        }

        Ok(())
    }
}
