//! Shared error taxonomy for the RLNC coding engine.
//!
//! Mirrors the teacher pattern of one small crate that every consumer of
//! the coding engine shares, rather than each crate rolling its own
//! `enum`. `Error` is the single taxonomy described by the coding engine's
//! error handling design: configuration mistakes, malformed packets,
//! internal field-arithmetic assertions, and "not yet ready" states are
//! kept as distinct variants so callers can match on recovery strategy.

use thiserror::Error;

/// Marker trait implemented by every error type the coding engine surfaces.
///
/// Lets sibling crates accept `Box<dyn RlncError>` without depending on
/// this crate's concrete `Error` enum.
pub trait RlncError: std::error::Error {}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// `K == 0`, `S == 0`, `K > K_max`, `S > S_max`, or an unsupported
    /// `(field, algorithm)` pair. Recovery: caller fixes its parameters.
    #[error("invalid coder configuration: {reason}")]
    Config { reason: String },

    /// A malformed packet header, an out-of-range systematic index, or a
    /// coefficient-vector length mismatch. Recovery: the packet is dropped
    /// and the stream continues.
    #[error("malformed packet: {reason}")]
    Protocol { reason: String },

    /// A field operation required invertibility on a zero element. This
    /// indicates corruption of the decoder's invariants and is treated as
    /// an internal bug, not an input-dependent condition.
    #[error("field arithmetic error: {reason}")]
    Field { reason: String },

    /// `copy_symbols` (or an equivalent read of the decoded block) was
    /// called before the decoder reached a complete, finalized state.
    #[error("decoder not ready: rank {rank} of {k}")]
    NotReady { rank: usize, k: usize },
}

impl RlncError for Error {}

impl Error {
    pub fn config(reason: impl Into<String>) -> Self {
        Error::Config { reason: reason.into() }
    }

    pub fn protocol(reason: impl Into<String>) -> Self {
        Error::Protocol { reason: reason.into() }
    }

    pub fn field(reason: impl Into<String>) -> Self {
        Error::Field { reason: reason.into() }
    }
}
