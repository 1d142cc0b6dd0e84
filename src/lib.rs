//! Image Mirror Library
//!
//! Library root for the image-mirror crate: copies a container image from
//! Docker Hub to another registry (GHCR by default) by driving an external
//! container engine CLI through check, login, pull, tag and push.

pub mod cli;
pub mod engine;
pub mod error;
pub mod image;
pub mod output;

pub use engine::{CommandOutput, ContainerEngine, EngineCli};
pub use error::{MirrorError, Result};
pub use image::ImageReference;
pub use output::OutputManager;
