//! Error types shared by every module of the crate.

use std::io;

/// Failures raised by vector algebra, network construction, training and
/// model persistence.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Two operands, or an operand and a layer, disagree on dimension.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    /// A slice was requested with inverted or out-of-bounds indices.
    #[error("invalid range {from}..={to} for vector of size {size}")]
    InvalidRange { from: usize, to: usize, size: usize },

    /// A persisted model does not match the shape it declares.
    #[error("malformed model: {0}")]
    MalformedModel(String),

    /// Layer or training parameters that cannot be used.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Returns `Ok(())` when `found == expected`.
pub(crate) fn check_len(expected: usize, found: usize) -> Result<()> {
    if expected == found {
        Ok(())
    } else {
        Err(Error::DimensionMismatch { expected, found })
    }
}
