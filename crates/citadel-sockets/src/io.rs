//! Retry-until-complete transfer loops.
//!
//! Single transport calls may move fewer bytes than asked, be interrupted by
//! a signal, or time out. These loops hide that from the caller:
//!
//! - [`readn`] reads until the buffer is full or the peer closes
//! - [`recvn`] does the same with the wait-all hint and the transport's own
//!   error policy; [`recvn_peek`] observes the bytes without consuming them
//! - [`writen`] writes the whole buffer, counting underlying attempts
//!
//! A short `Ok` count from a read means clean end-of-stream. Failures come
//! back as [`Error::Fatal`], which records how far the transfer got.

use tracing::{debug, error, warn};

use crate::error::{Error, Op, Result};
use crate::policy::{ErrorPolicy, ReadPolicy};
use crate::transport::Transport;

/// How [`recvn_with`] treats the bytes it receives.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RecvMode {
    /// Consume bytes from the stream.
    #[default]
    Consume,
    /// Observe bytes without advancing the stream.
    Peek,
}

/// Outcome of a completed [`writen`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Written {
    /// Bytes written; always the full request.
    pub bytes: usize,
    /// Underlying write calls made, including retried ones.
    pub attempts: u32,
}

/// Read exactly `buf.len()` bytes, or fewer if the peer closes first.
///
/// Interrupted reads are retried. Any other error aborts, including
/// would-block on a non-blocking channel.
///
/// # Errors
///
/// [`Error::EmptyRequest`] for an empty buffer, [`Error::Fatal`] on a hard
/// transport error.
pub fn readn<T>(transport: &mut T, buf: &mut [u8]) -> Result<usize>
where
    T: Transport + ?Sized,
{
    if buf.is_empty() {
        return Err(Error::EmptyRequest);
    }

    let mut filled = 0;
    let mut attempts = 0u32;

    while filled < buf.len() {
        attempts = attempts.saturating_add(1);
        match transport.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if !ReadPolicy.is_fatal(&e) => {}
            Err(e) => {
                warn!("readn: {}", e);
                return Err(Error::Fatal {
                    op: Op::Read,
                    transferred: filled,
                    attempts,
                    source: e,
                })
            }
        }
    }

    Ok(filled)
}

/// Receive exactly `buf.len()` bytes, or fewer if the peer closes first.
pub fn recvn<T>(transport: &mut T, buf: &mut [u8]) -> Result<usize>
where
    T: Transport + ?Sized,
{
    recvn_with(transport, buf, RecvMode::Consume)
}

/// Observe the next `buf.len()` bytes without consuming them.
pub fn recvn_peek<T>(transport: &mut T, buf: &mut [u8]) -> Result<usize>
where
    T: Transport + ?Sized,
{
    recvn_with(transport, buf, RecvMode::Peek)
}

/// Receive into `buf` in the given mode.
///
/// Errors the transport classifies as non-fatal are retried; fatal ones
/// abort with [`Error::Fatal`]. A peer close ends the call with the count
/// obtained so far. In peek mode a short result is retried until the full
/// length is visible, unless the transport knows the peer has closed.
///
/// # Errors
///
/// [`Error::EmptyRequest`] for an empty buffer, [`Error::Fatal`] on a fatal
/// transport error.
pub fn recvn_with<T>(transport: &mut T, buf: &mut [u8], mode: RecvMode) -> Result<usize>
where
    T: Transport + ?Sized,
{
    if buf.is_empty() {
        return Err(Error::EmptyRequest);
    }

    match mode {
        RecvMode::Consume => recv_consume(transport, buf),
        RecvMode::Peek => recv_peek(transport, buf),
    }
}

fn recv_consume<T>(transport: &mut T, buf: &mut [u8]) -> Result<usize>
where
    T: Transport + ?Sized,
{
    let mut filled = 0;
    let mut attempts = 0u32;

    while filled < buf.len() {
        attempts = attempts.saturating_add(1);
        match transport.recv(&mut buf[filled..]) {
            Ok(0) => {
                debug!("recvn peer close after {} of {} bytes", filled, buf.len());
                break;
            }
            Ok(n) => filled += n,
            Err(e) if transport.is_fatal(&e) => {
                warn!("recvn: {}", e);
                return Err(Error::Fatal {
                    op: Op::Recv,
                    transferred: filled,
                    attempts,
                    source: e,
                });
            }
            Err(e) => debug!("recvn non-fatal: {}", e),
        }
    }

    Ok(filled)
}

fn recv_peek<T>(transport: &mut T, buf: &mut [u8]) -> Result<usize>
where
    T: Transport + ?Sized,
{
    let len = buf.len();
    let mut attempts = 0u32;

    loop {
        attempts = attempts.saturating_add(1);
        match transport.peek(buf) {
            Ok(n) if n >= len => return Ok(len),
            Ok(0) => {
                debug!("recvn peek peer close");
                return Ok(0);
            }
            Ok(n) if transport.peer_closed() => {
                debug!("recvn peek peer close with {} of {} bytes visible", n, len);
                return Ok(n);
            }
            Ok(_) => {}
            Err(e) if transport.is_fatal(&e) => {
                warn!("recvn peek: {}", e);
                return Err(Error::Fatal {
                    op: Op::RecvPeek,
                    transferred: 0,
                    attempts,
                    source: e,
                });
            }
            Err(e) => debug!("recvn peek non-fatal: {}", e),
        }
    }
}

/// Write all of `buf`.
///
/// Every underlying write call counts as an attempt, whatever its outcome.
/// A zero-byte write is a timeout and is retried, as are errors the
/// transport classifies as non-fatal (interruption and would-block for
/// sockets). Once every byte is accepted the transport is flushed, so data a
/// secured session still holds in its record buffer reaches the channel.
///
/// # Errors
///
/// [`Error::EmptyRequest`] for an empty buffer. [`Error::Fatal`] on a fatal
/// error, carrying the bytes written so far and the attempt count. When the
/// final flush fails, `transferred` counts bytes the transport accepted, not
/// bytes confirmed on the channel.
pub fn writen<T>(transport: &mut T, buf: &[u8]) -> Result<Written>
where
    T: Transport + ?Sized,
{
    if buf.is_empty() {
        return Err(Error::EmptyRequest);
    }

    let mut written = 0;
    let mut attempts = 0u32;

    while written < buf.len() {
        attempts = attempts.saturating_add(1);
        match transport.write(&buf[written..]) {
            Ok(n) => written += n,
            Err(e) if !transport.is_fatal(&e) => {}
            Err(e) => {
                error!("writen fatal after {} of {} bytes: {}", written, buf.len(), e);
                return Err(Error::Fatal {
                    op: Op::Write,
                    transferred: written,
                    attempts,
                    source: e,
                });
            }
        }
    }

    loop {
        match transport.flush() {
            Ok(()) => break,
            Err(e) if !transport.is_fatal(&e) => {}
            Err(e) => {
                error!("writen fatal on flush after {} bytes: {}", written, e);
                return Err(Error::Fatal {
                    op: Op::Write,
                    transferred: written,
                    attempts,
                    source: e,
                });
            }
        }
    }

    Ok(Written {
        bytes: written,
        attempts,
    })
}
