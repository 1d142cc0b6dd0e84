//! Error handling module for the image mirror

use thiserror::Error;

/// Exit code used when a pipeline step fails
pub const EXIT_STEP_FAILED: i32 = 1;
/// Exit code used for invalid arguments or configuration (matches clap)
pub const EXIT_USAGE: i32 = 2;

#[derive(Error, Debug)]
pub enum MirrorError {
    #[error("{engine} is not installed or not running")]
    EngineMissing { engine: String },
    #[error("Authentication to {registry} failed: {message}")]
    Authentication { registry: String, message: String },
    #[error("Failed to pull {reference}: {message}")]
    Pull { reference: String, message: String },
    #[error("Failed to tag {source_ref} as {target}: {message}")]
    Tag {
        source_ref: String,
        target: String,
        message: String,
    },
    #[error("Failed to push {reference}: {message}")]
    Push { reference: String, message: String },
    #[error("Command `{command}` failed ({status}): {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl MirrorError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            MirrorError::Validation(_) => EXIT_USAGE,
            _ => EXIT_STEP_FAILED,
        }
    }

    /// Re-wrap a generic command failure as the error of the step that ran it
    pub fn in_step(self, step: &crate::cli::MirrorStep) -> Self {
        match self {
            MirrorError::CommandFailed {
                status, stderr, ..
            } => step.failure(format!("{} ({})", stderr, status)),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, MirrorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let missing = MirrorError::EngineMissing {
            engine: "docker".to_string(),
        };
        assert_eq!(missing.exit_code(), EXIT_STEP_FAILED);
        assert_eq!(
            MirrorError::Validation("bad tag".to_string()).exit_code(),
            EXIT_USAGE
        );
    }

    #[test]
    fn test_engine_missing_message() {
        let err = MirrorError::EngineMissing {
            engine: "podman".to_string(),
        };
        assert_eq!(err.to_string(), "podman is not installed or not running");
    }
}
