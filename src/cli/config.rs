//! Resolved mirror configuration

use crate::cli::args::{Args, OutputFormat};
use crate::error::{MirrorError, Result};
use crate::image::ImageReference;
use crate::output::REDACTED;
use std::fmt;

/// Registry credentials used for login
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub token: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            token: token.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.username.is_empty() {
            return Err(MirrorError::Validation(
                "Username cannot be empty".to_string(),
            ));
        }
        if self.token.is_empty() {
            return Err(MirrorError::Validation(
                "Token cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("token", &REDACTED)
            .finish()
    }
}

/// Everything the runner needs, validated
#[derive(Debug, Clone)]
pub struct MirrorConfig {
    pub source: ImageReference,
    pub destination: ImageReference,
    /// Registry host that login authenticates against
    pub registry: String,
    /// `None` when login is skipped
    pub credentials: Option<Credentials>,
    pub engine: String,
    pub dry_run: bool,
    pub output: OutputFormat,
}

impl MirrorConfig {
    pub fn from_args(args: &Args) -> Result<Self> {
        args.validate()?;

        let source = ImageReference::parse(&args.source_image)?.with_tag(&args.source_tag)?;
        let image_name = args
            .image_name
            .clone()
            .unwrap_or_else(|| source.name().to_string());
        let registry = args.registry().to_string();
        let destination =
            ImageReference::destination(&registry, &args.repo, &image_name, &args.target_tag)?;

        let credentials = if args.skip_login {
            None
        } else {
            let creds = Credentials::new(
                args.username.clone().unwrap_or_default(),
                args.token.clone().unwrap_or_default(),
            );
            creds.validate()?;
            Some(creds)
        };

        Ok(Self {
            source,
            destination,
            registry,
            credentials,
            engine: args.engine().to_string(),
            dry_run: args.dry_run,
            output: args.output,
        })
    }

    /// Display name for banners, e.g. `Typesense`
    pub fn display_name(&self) -> String {
        let name = self.source.name();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    pub fn secret(&self) -> Option<&str> {
        self.credentials.as_ref().map(|c| c.token.as_str())
    }
}
