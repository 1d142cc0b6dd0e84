//! Command line interface module
//!
//! Argument parsing, configuration resolution and the runner that executes
//! the mirror pipeline.

pub mod args;
pub mod config;
pub mod runner;
pub mod step;

pub use args::{Args, OutputFormat};
pub use config::{Credentials, MirrorConfig};
pub use runner::{MirrorReport, Runner, StepReport};
pub use step::MirrorStep;
