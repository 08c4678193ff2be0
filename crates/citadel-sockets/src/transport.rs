//! Byte transports the drain loops run against.
//!
//! A [`Transport`] is a single-call view of a connected channel:
//! - `read`: plain read, no flags
//! - `recv`: read with the wait-all hint where the platform has one
//! - `peek`: observe without consuming
//! - `write`: single write attempt
//! - `flush`: push out buffered writes, a no-op for raw sockets
//!
//! Two implementations cover the usual cases: [`SocketTransport`] over a raw
//! socket and [`crate::SecureSession`] over an established TLS stream.

use std::io;

use crate::channel::ChannelHandle;
use crate::error::{Error, Result};
use crate::policy::{ErrorPolicy, StandardPolicy};
use crate::sys::{self, AsHandle, Borrowed};

/// One connected byte stream, driven one underlying call at a time.
pub trait Transport {
    /// Read up to `buf.len()` bytes. `Ok(0)` means orderly shutdown.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Like [`Transport::read`], but asks the transport to wait for the whole
    /// buffer if it supports that.
    fn recv(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.read(buf)
    }

    /// Copy up to `buf.len()` pending bytes without consuming them.
    fn peek(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Write up to `buf.len()` bytes. `Ok(0)` means the call timed out.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize>;

    /// Push out anything the transport buffered from earlier writes.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Whether the transport knows the peer has finished sending.
    ///
    /// Lets peek mode stop on a short result. Transports that cannot tell
    /// return `false`.
    fn peer_closed(&self) -> bool {
        false
    }

    /// Whether `err` aborts the current transfer.
    fn is_fatal(&self, err: &io::Error) -> bool {
        StandardPolicy.is_fatal(err)
    }
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        (**self).read(buf)
    }

    fn recv(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        (**self).recv(buf)
    }

    fn peek(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        (**self).peek(buf)
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        (**self).write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }

    fn peer_closed(&self) -> bool {
        (**self).peer_closed()
    }

    fn is_fatal(&self, err: &io::Error) -> bool {
        (**self).is_fatal(err)
    }
}

/// Raw socket transport over a borrowed channel handle.
#[derive(Clone, Copy, Debug)]
pub struct SocketTransport<'a> {
    handle: Borrowed<'a>,
}

impl<'a> SocketTransport<'a> {
    /// Create a transport over `channel`, rejecting the invalid sentinel.
    pub fn new(channel: ChannelHandle<'a>) -> Result<Self> {
        let handle = channel.borrowed().ok_or(Error::InvalidHandle)?;
        Ok(Self { handle })
    }

    /// Borrow an open socket directly.
    pub fn from_socket<S: AsHandle + ?Sized>(socket: &'a S) -> Self {
        Self {
            handle: sys::borrow(socket),
        }
    }
}

impl Transport for SocketTransport<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        sys::read(self.handle, buf)
    }

    fn recv(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        sys::recv_all(self.handle, buf)
    }

    fn peek(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        sys::peek(self.handle, buf)
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        sys::write(self.handle, buf)
    }
}

/// A transport with its error classification replaced by `policy`.
#[derive(Debug)]
pub struct Policed<T, P> {
    inner: T,
    policy: P,
}

impl<T, P> Policed<T, P>
where
    T: Transport,
    P: ErrorPolicy,
{
    /// Wrap `inner`, classifying its errors with `policy`.
    pub fn new(inner: T, policy: P) -> Self {
        Self { inner, policy }
    }

    /// Drop the policy and return the wrapped transport.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T, P> Transport for Policed<T, P>
where
    T: Transport,
    P: ErrorPolicy,
{
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }

    fn recv(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.recv(buf)
    }

    fn peek(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.peek(buf)
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }

    fn peer_closed(&self) -> bool {
        self.inner.peer_closed()
    }

    fn is_fatal(&self, err: &io::Error) -> bool {
        self.policy.is_fatal(err)
    }
}
