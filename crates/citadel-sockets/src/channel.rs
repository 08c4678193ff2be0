//! Borrowed handles to connected transport endpoints.

use std::fmt;

use crate::sys::{self, AsHandle, Borrowed, RawHandle};

/// A connected socket borrowed for the duration of one or more transfer calls.
///
/// The handle never owns or closes the socket. `ChannelHandle::INVALID` is the
/// sentinel every operation rejects without touching the OS.
#[derive(Clone, Copy)]
pub struct ChannelHandle<'a> {
    inner: Option<Borrowed<'a>>,
}

impl ChannelHandle<'static> {
    /// The invalid handle sentinel.
    pub const INVALID: Self = Self { inner: None };
}

impl<'a> ChannelHandle<'a> {
    /// Borrow the handle of an open socket.
    pub fn new<S: AsHandle + ?Sized>(socket: &'a S) -> Self {
        Self {
            inner: Some(sys::borrow(socket)),
        }
    }

    /// Wrap a raw handle. Negative descriptors (or `INVALID_SOCKET`) map to
    /// [`ChannelHandle::INVALID`].
    ///
    /// # Safety
    ///
    /// Any other value must refer to a socket that stays open for `'a`.
    pub unsafe fn from_raw(raw: RawHandle) -> Self {
        Self {
            inner: sys::borrow_raw(raw),
        }
    }

    /// Whether this handle refers to an open socket.
    pub fn is_valid(&self) -> bool {
        self.inner.is_some()
    }

    /// The raw handle, or the platform's invalid sentinel.
    pub fn raw(&self) -> RawHandle {
        self.inner.map_or(sys::INVALID_HANDLE, sys::raw)
    }

    pub(crate) fn borrowed(&self) -> Option<Borrowed<'a>> {
        self.inner
    }
}

impl fmt::Debug for ChannelHandle<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner {
            Some(_) => write!(f, "ChannelHandle({})", self.raw()),
            None => f.write_str("ChannelHandle(INVALID)"),
        }
    }
}

impl<'a, S: AsHandle> From<&'a S> for ChannelHandle<'a> {
    fn from(socket: &'a S) -> Self {
        Self::new(socket)
    }
}
