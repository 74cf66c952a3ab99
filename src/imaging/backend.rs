//! Image engine seam.
//!
//! The converter drives images exclusively through these two traits:
//! [`ImageBackend`] opens a source file into an [`ImageHandle`], and the
//! handle accumulates in-place edits plus encode settings until `write`.
//! One handle serves exactly one output's pipeline and is dropped when that
//! attempt finishes, success or not.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend); tests use the
//! recording `MockBackend` defined at the bottom of this module.

use super::ops::ImageOp;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("processing failed: {0}")]
    ProcessingFailed(String),
    #[error("unsupported {0}")]
    Unsupported(String),
}

/// Factory for image handles.
pub trait ImageBackend: Sync {
    /// Decode `path` into a fresh handle. Fails on unreadable or corrupt
    /// sources.
    fn open(&self, path: &Path) -> Result<Box<dyn ImageHandle>, BackendError>;
}

/// A single open image being edited in place.
pub trait ImageHandle {
    /// Select the output encoding by extension (no leading dot).
    fn set_format(&mut self, ext: &str) -> Result<(), BackendError>;

    /// Set encoder quality (0–100) for lossy formats.
    fn set_quality(&mut self, quality: u32) -> Result<(), BackendError>;

    /// Apply an edit.
    fn apply(&mut self, op: &ImageOp) -> Result<(), BackendError>;

    /// Encode and write the current image to `path`.
    fn write(&mut self, path: &Path) -> Result<(), BackendError>;
}
