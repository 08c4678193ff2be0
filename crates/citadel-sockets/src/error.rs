//! Error types for citadel-sockets.

use std::fmt;
use std::io;

use thiserror::Error;

/// Result type for citadel-sockets operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The transfer primitive an error was raised from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    /// Plain read drain
    Read,
    /// Consuming receive drain
    Recv,
    /// Non-consuming receive drain
    RecvPeek,
    /// Write drain
    Write,
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Op::Read => "readn",
            Op::Recv => "recvn",
            Op::RecvPeek => "recvn peek",
            Op::Write => "writen",
        })
    }
}

/// Errors that can occur while moving bytes over a channel.
#[derive(Debug, Error)]
pub enum Error {
    /// The transport reported an error that retrying cannot resolve.
    ///
    /// `transferred` is the number of bytes moved before the failure and
    /// `attempts` the number of underlying transport calls made.
    #[error("{op} fatal after {transferred} bytes ({attempts} attempts): {source}")]
    Fatal {
        op: Op,
        transferred: usize,
        attempts: u32,
        #[source]
        source: io::Error,
    },

    /// A transfer was requested with an empty buffer.
    #[error("transfer request must be at least one byte")]
    EmptyRequest,

    /// The channel handle is the invalid sentinel.
    #[error("invalid channel handle")]
    InvalidHandle,

    /// IO error outside the drain loops (socket option calls).
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Bytes moved before the operation failed. Zero for errors raised
    /// before any transfer started.
    pub fn transferred(&self) -> usize {
        match self {
            Error::Fatal { transferred, .. } => *transferred,
            _ => 0,
        }
    }

    /// Whether this error came from the transport rather than a bad request.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Fatal { .. } | Error::Io(_))
    }
}
