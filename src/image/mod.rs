//! Container image references
//!
//! The mirror never touches image content; all it knows about an image is the
//! reference string passed to the engine. This module provides
//! [`ImageReference`] for building, validating and printing those strings.
//!
//! ```
//! use image_mirror::image::ImageReference;
//!
//! let dest = ImageReference::destination("ghcr.io", "octo/search", "typesense", "27.1").unwrap();
//! assert_eq!(dest.to_string(), "ghcr.io/octo/search/typesense:27.1");
//! ```

pub mod reference;

pub use reference::{DEFAULT_TAG, ImageReference};
