//! Image reference parsing and formatting
//!
//! An [`ImageReference`] is the `[registry/]repository:tag` string handed to
//! the container engine. References are only ever built, validated and
//! printed here; resolving them is left to the engine.

use crate::error::{MirrorError, Result};
use serde::Serialize;
use std::fmt;

pub const DEFAULT_TAG: &str = "latest";

const MAX_TAG_LEN: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageReference {
    pub registry: Option<String>,
    pub repository: String,
    pub tag: String,
}

impl ImageReference {
    pub fn new(registry: Option<String>, repository: impl Into<String>, tag: impl Into<String>) -> Result<Self> {
        let reference = Self {
            registry,
            repository: repository.into(),
            tag: tag.into(),
        };
        reference.validate()?;
        Ok(reference)
    }

    /// Parse `[registry/]repository[:tag]`, defaulting the tag to `latest`
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Err(MirrorError::Validation(
                "Image reference cannot be empty".to_string(),
            ));
        }

        // A ':' before the last '/' belongs to a registry port, not a tag
        let last_slash = input.rfind('/').map(|i| i + 1).unwrap_or(0);
        let (name, tag) = match input[last_slash..].rfind(':') {
            Some(pos) => {
                let split = last_slash + pos;
                (&input[..split], &input[split + 1..])
            }
            None => (input, DEFAULT_TAG),
        };

        let (registry, repository) = match name.split_once('/') {
            Some((first, rest)) if Self::looks_like_registry(first) => {
                (Some(first.to_string()), rest)
            }
            _ => (None, name),
        };

        Self::new(registry, repository, tag)
    }

    /// Build `<registry>/<repo>/<image>:<tag>` for the mirror destination
    pub fn destination(registry: &str, repo: &str, image: &str, tag: &str) -> Result<Self> {
        let registry = registry.trim_end_matches('/');
        if registry.is_empty() {
            return Err(MirrorError::Validation(
                "Registry cannot be empty".to_string(),
            ));
        }
        let repo = repo.trim_matches('/');
        Self::new(
            Some(registry.to_string()),
            format!("{}/{}", repo, image),
            tag,
        )
    }

    /// Last path component of the repository, e.g. `typesense` for `typesense/typesense`
    pub fn name(&self) -> &str {
        self.repository
            .rsplit('/')
            .next()
            .unwrap_or(&self.repository)
    }

    /// Same repository under a different tag
    pub fn with_tag(&self, tag: &str) -> Result<Self> {
        Self::new(self.registry.clone(), self.repository.clone(), tag)
    }

    pub fn validate(&self) -> Result<()> {
        validate_repository(&self.repository)?;
        validate_tag(&self.tag)?;
        if let Some(registry) = &self.registry {
            if registry.is_empty() || registry.contains('/') {
                return Err(MirrorError::Validation(format!(
                    "Invalid registry host: '{}'",
                    registry
                )));
            }
        }
        Ok(())
    }

    fn looks_like_registry(component: &str) -> bool {
        component.contains('.') || component.contains(':') || component == "localhost"
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(registry) = &self.registry {
            write!(f, "{}/", registry)?;
        }
        write!(f, "{}:{}", self.repository, self.tag)
    }
}

pub fn validate_repository(repository: &str) -> Result<()> {
    if repository.is_empty() {
        return Err(MirrorError::Validation(
            "Repository cannot be empty".to_string(),
        ));
    }

    if repository.starts_with('/') || repository.ends_with('/') || repository.contains("//") {
        return Err(MirrorError::Validation(format!(
            "Repository has an empty path component: '{}'",
            repository
        )));
    }

    let valid_chars = repository
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '.' | '_' | '-' | '/'));
    if !valid_chars {
        return Err(MirrorError::Validation(format!(
            "Repository must contain only lowercase letters, digits, '.', '_', '-' and '/': '{}'",
            repository
        )));
    }

    Ok(())
}

pub fn validate_tag(tag: &str) -> Result<()> {
    let mut chars = tag.chars();
    let first_ok = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_');
    let rest_ok = chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'));

    if !first_ok || !rest_ok || tag.len() > MAX_TAG_LEN {
        return Err(MirrorError::Validation(format!(
            "Invalid tag '{}': must match [A-Za-z0-9_][A-Za-z0-9_.-]{{0,127}}",
            tag
        )));
    }
    Ok(())
}
