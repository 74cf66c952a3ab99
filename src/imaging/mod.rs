//! Imaging seam: the engine contract and the shipped pure-Rust engine.
//!
//! The module is split into:
//! - **Backend**: [`ImageBackend`] / [`ImageHandle`] traits + [`BackendError`]
//! - **Ops**: the typed edit vocabulary ([`ImageOp`])
//! - **Rust backend**: [`RustBackend`], the `image`-crate implementation

pub mod backend;
pub mod ops;
pub mod rust_backend;

pub use backend::{BackendError, ImageBackend, ImageHandle};
pub use ops::ImageOp;
pub use rust_backend::RustBackend;
