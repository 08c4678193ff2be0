//! Fatal vs. retryable classification of transport errors.
//!
//! The drain loops never inspect error codes themselves; they ask an
//! [`ErrorPolicy`]. Raw sockets and secured sessions have different error
//! spaces, so each transport picks the policy that matches its own.

use std::io::{self, ErrorKind};

use crate::sys;

/// Decides whether a transport error aborts the current transfer.
pub trait ErrorPolicy {
    /// `true` if retrying cannot resolve `err`.
    fn is_fatal(&self, err: &io::Error) -> bool;
}

impl<F> ErrorPolicy for F
where
    F: Fn(&io::Error) -> bool,
{
    fn is_fatal(&self, err: &io::Error) -> bool {
        self(err)
    }
}

/// Errors the OS reports when a call made no progress but the stream is fine.
///
/// `TimedOut` only counts where the platform uses it for socket timeouts
/// (Winsock); on Unix it means the connection is gone.
pub fn is_transient(kind: ErrorKind) -> bool {
    match kind {
        ErrorKind::Interrupted | ErrorKind::WouldBlock => true,
        ErrorKind::TimedOut => sys::TIMEOUT_IS_TRANSIENT,
        _ => false,
    }
}

/// Stream-socket policy: interruption, would-block and socket timeouts are
/// retried, everything else is fatal. Datagram sockets use the same rules.
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardPolicy;

impl ErrorPolicy for StandardPolicy {
    fn is_fatal(&self, err: &io::Error) -> bool {
        !is_transient(err.kind())
    }
}

/// Plain read drain policy: only interruption is retried.
#[derive(Clone, Copy, Debug, Default)]
pub struct ReadPolicy;

impl ErrorPolicy for ReadPolicy {
    fn is_fatal(&self, err: &io::Error) -> bool {
        err.kind() != ErrorKind::Interrupted
    }
}

/// Secured-session policy.
///
/// Anything the TLS library raised itself is fatal regardless of the
/// `ErrorKind` it was wrapped in, as is a transport EOF without close_notify.
/// Errors from the socket underneath follow [`StandardPolicy`].
#[derive(Clone, Copy, Debug, Default)]
pub struct SecurePolicy;

impl ErrorPolicy for SecurePolicy {
    fn is_fatal(&self, err: &io::Error) -> bool {
        if err.kind() == ErrorKind::UnexpectedEof {
            return true;
        }
        if err.get_ref().is_some_and(|inner| inner.is::<rustls::Error>()) {
            return true;
        }
        StandardPolicy.is_fatal(err)
    }
}
