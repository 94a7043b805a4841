//! Error types for engine operations.
//!
//! Two kinds of failure exist here, and only these: absent optional data is
//! an `Option`, handled by fallback, and never an error; recoverable
//! failures (I/O, malformed embedded images, export) are typed variants of
//! [`ArmillaryError`]. Structural contract violations — duplicate visual
//! insertion, edit-session misuse, unbalanced transform stacks — panic at
//! the offending call instead of surfacing here.

use std::io;

use thiserror::Error;

use crate::draw::ImageError;

/// The main error type for engine operations.
#[derive(Debug, Error)]
pub enum ArmillaryError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Image(#[from] ImageError),

    #[error("layout error: {0}")]
    Layout(String),

    #[error("export error: {0}")]
    Export(Box<dyn std::error::Error>),
}

impl From<crate::export::Error> for ArmillaryError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}
