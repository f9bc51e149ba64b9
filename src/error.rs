//! Error and `Result` types.
//!
//! This crate uses a split error-handling policy:
//! - Construction, configuration and persistence return `Result`.
//! - Low-level hot-path methods (per-sample forward/backward, the `linalg`
//!   primitives) panic on misuse (shape mismatches) via `assert!` / `assert_eq!`.

use std::fmt;
use std::io;

#[derive(Debug)]
/// Errors returned by fallible constructors and high-level APIs.
pub enum Error {
    /// A vector or matrix argument has the wrong shape, or a network was
    /// built with inconsistent neuron counts.
    ShapeMismatch(String),
    /// The provided training configuration is invalid (e.g. zero epochs,
    /// non-finite learning rate).
    InvalidConfig(String),
    /// The persistence reader/writer failed.
    Io(io::Error),
    /// Encoding or decoding persisted parameters failed.
    Serialization(bincode::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ShapeMismatch(msg) => write!(f, "shape mismatch: {msg}"),
            Error::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            Error::Io(err) => write!(f, "io error: {err}"),
            Error::Serialization(err) => write!(f, "serialization error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Serialization(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<bincode::Error> for Error {
    fn from(err: bincode::Error) -> Error {
        Error::Serialization(err)
    }
}
