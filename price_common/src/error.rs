//! Error types shared between client and server.
//!
//! The `PriceError` enum unifies common failure cases for I/O, serialization,
//! channel communication, configuration, source fetches and history storage,
//! allowing crates to propagate a single error type.
//!
//! Rejected ticks are not errors and have no variant here.
use std::io;
use std::sync::PoisonError;

use thiserror::Error;

/// Unified error type shared by client and server.
#[derive(Error, Debug)]
pub enum PriceError {
    /// I/O error originating from the standard library or sockets/files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Generic formatting/validation error with a human-readable message.
    #[error("Format error: {0}")]
    Format(String),

    /// A protocol line ran past the size cap before its newline.
    #[error("Line exceeds {limit} bytes")]
    LineTooLong {
        /// Maximum accepted line length in bytes.
        limit: usize,
    },

    /// Failure while encoding/decoding JSON via serde_json.
    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// Channel receive failed (e.g., sender closed); contains a short context string.
    #[error("Channel receive failed: {0}")]
    ChannelRecv(String),

    /// Error indicating a poisoned mutex/lock was encountered.
    #[error("Mutex Lock Poisoned: {0}")]
    MutexLock(String),

    /// Configuration value rejected during startup.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A price source failed to produce a tick (network, status or payload problem).
    #[error("Source {source_name} failed: {message}")]
    Source {
        /// Display name of the failing source.
        source_name: String,
        /// What went wrong.
        message: String,
    },

    /// The history archive could not store or read records.
    #[error("History archive error: {0}")]
    History(String),
}

impl<T> From<PoisonError<T>> for PriceError {
    fn from(err: PoisonError<T>) -> Self {
        PriceError::MutexLock(err.to_string())
    }
}

impl PriceError {
    /// Shorthand for a [`PriceError::Source`] value.
    pub fn source_failure(source_name: &str, message: impl Into<String>) -> Self {
        PriceError::Source {
            source_name: source_name.to_string(),
            message: message.into(),
        }
    }
}
