//! Error types for gyrocore

use thiserror::Error;

/// Result type alias using gyrocore's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while generating or exporting a core mesh
#[derive(Error, Debug)]
pub enum Error {
    /// A parameter was outside its allowed domain (size, `cell_size`, or
    /// resolution not strictly positive).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A grid- or cache-sized allocation would overflow or exceed a sane
    /// ceiling before it is attempted.
    #[error("out of memory: {0}")]
    OutOfMemory(String),

    /// Mesh export failed
    #[error("export failed: {0}")]
    Export(String),

    /// Generation was cancelled via the progress callback. Not named in
    /// the core error contract; §5 leaves cancellation semantics to the
    /// implementer, and this one unwinds without partial global state.
    #[error("generation cancelled")]
    Cancelled,
}
