//! Public runtime API surface.
//!
//! Error types shared by every service live here so callers can bubble them up
//! with consistent context.

pub mod errors;

pub use errors::{Result, RuntimeError};
