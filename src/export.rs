//! Vector export.
//!
//! The vector backend mirrors the raster painter over the same primitive
//! contract; see [`svg`] for the writer and the canonical formatting rules
//! golden-file comparison depends on.

pub mod svg;

use thiserror::Error;

/// Failures while exporting a model.
#[derive(Debug, Error)]
pub enum Error {
    #[error("render error: {0}")]
    Render(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
