use std::io;
use thiserror::Error;

/// Custom error types for motorlink
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid payload length: {0} exceeds the 12-byte maximum")]
    InvalidPayloadLength(usize),

    #[error("Serial error: {0}")]
    Serial(String),

    #[error("Link error: {0}")]
    Link(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Creates a new serial error
    pub fn serial(msg: impl Into<String>) -> Self {
        Error::Serial(msg.into())
    }

    /// Creates a new link error
    pub fn link(msg: impl Into<String>) -> Self {
        Error::Link(msg.into())
    }

    /// Creates a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }
}

/// Classification of a rejected 4-byte frame candidate.
///
/// Only drives the receive-side resynchronization loop; the reassembler
/// absorbs these and never surfaces them to callers.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Bad header byte: {0:#04x}")]
    BadHeader(u8),

    #[error("Bad checksum: expected {expected:#04x}, found {found:#04x}")]
    BadChecksum { expected: u8, found: u8 },
}
