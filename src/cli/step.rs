//! Pipeline steps of a mirror run

use crate::error::MirrorError;
use crate::image::ImageReference;
use std::fmt;

/// One step of the mirror pipeline, in execution order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MirrorStep {
    /// Check that the engine binary is available
    CheckEngine { engine: String },
    /// Log in to the destination registry
    Login { registry: String },
    /// Pull the source image
    Pull { reference: ImageReference },
    /// Tag the source image with the destination reference
    Tag {
        source: ImageReference,
        target: ImageReference,
    },
    /// Push the destination image
    Push { reference: ImageReference },
}

impl MirrorStep {
    /// Short machine-readable step name
    pub fn name(&self) -> &'static str {
        match self {
            MirrorStep::CheckEngine { .. } => "check",
            MirrorStep::Login { .. } => "login",
            MirrorStep::Pull { .. } => "pull",
            MirrorStep::Tag { .. } => "tag",
            MirrorStep::Push { .. } => "push",
        }
    }

    pub fn description(&self) -> String {
        match self {
            MirrorStep::CheckEngine { engine } => format!("Checking that {} is available", engine),
            MirrorStep::Login { registry } => format!("Logging in to {}", registry),
            MirrorStep::Pull { reference } => format!("Pulling {}", reference),
            MirrorStep::Tag { source, target } => format!("Tagging {} as {}", source, target),
            MirrorStep::Push { reference } => format!("Pushing {}", reference),
        }
    }

    pub fn success_message(&self) -> String {
        match self {
            MirrorStep::CheckEngine { engine } => format!("{} is available", engine),
            MirrorStep::Login { registry } => format!("Successfully logged in to {}", registry),
            MirrorStep::Pull { reference } => format!("Successfully pulled {}", reference),
            MirrorStep::Tag { target, .. } => format!("Successfully tagged image as {}", target),
            MirrorStep::Push { reference } => format!("Successfully pushed to {}", reference),
        }
    }

    /// Error describing this step's failure
    pub fn failure(&self, message: String) -> MirrorError {
        match self {
            MirrorStep::CheckEngine { engine } => MirrorError::EngineMissing {
                engine: engine.clone(),
            },
            MirrorStep::Login { registry } => MirrorError::Authentication {
                registry: registry.clone(),
                message,
            },
            MirrorStep::Pull { reference } => MirrorError::Pull {
                reference: reference.to_string(),
                message,
            },
            MirrorStep::Tag { source, target } => MirrorError::Tag {
                source_ref: source.to_string(),
                target: target.to_string(),
                message,
            },
            MirrorStep::Push { reference } => MirrorError::Push {
                reference: reference.to_string(),
                message,
            },
        }
    }
}

impl fmt::Display for MirrorStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_maps_to_step_error() {
        let step = MirrorStep::Login {
            registry: "ghcr.io".to_string(),
        };
        let err = step.failure("denied".to_string());
        assert_eq!(err.to_string(), "Authentication to ghcr.io failed: denied");

        let reference = ImageReference::parse("ghcr.io/octo/app:v1").unwrap();
        let step = MirrorStep::Push { reference };
        assert!(matches!(
            step.failure("boom".to_string()),
            MirrorError::Push { .. }
        ));
    }

    #[test]
    fn test_wrapping_command_failure() {
        let step = MirrorStep::Pull {
            reference: ImageReference::parse("alpine:3").unwrap(),
        };
        let err = MirrorError::CommandFailed {
            command: "docker pull alpine:3".to_string(),
            status: "exit status: 1".to_string(),
            stderr: "manifest unknown".to_string(),
        }
        .in_step(&step);
        assert_eq!(
            err.to_string(),
            "Failed to pull alpine:3: manifest unknown (exit status: 1)"
        );
    }
}
