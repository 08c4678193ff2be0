use std::io;
use std::os::windows::io::{AsRawSocket, BorrowedSocket, RawSocket};

use socket2::SockRef;

use super::as_uninit;

pub use std::os::windows::io::AsSocket as AsHandle;

/// Raw socket handle type on this platform.
pub type RawHandle = RawSocket;

/// Borrowed socket handle on this platform.
pub type Borrowed<'a> = BorrowedSocket<'a>;

/// The invalid handle sentinel (`INVALID_SOCKET`).
pub const INVALID_HANDLE: RawHandle = !0;

/// Winsock has no `TCP_MAXSEG`.
pub const HAS_MSS: bool = false;

/// `WSAETIMEDOUT` is what an expired `SO_RCVTIMEO`/`SO_SNDTIMEO` reports.
pub const TIMEOUT_IS_TRANSIENT: bool = true;

pub fn borrow<S: AsHandle + ?Sized>(socket: &S) -> Borrowed<'_> {
    socket.as_socket()
}

/// # Safety
///
/// A `raw` other than `INVALID_HANDLE` must stay open for the returned lifetime.
pub unsafe fn borrow_raw<'a>(raw: RawHandle) -> Option<Borrowed<'a>> {
    if raw == INVALID_HANDLE {
        None
    } else {
        Some(BorrowedSocket::borrow_raw(raw))
    }
}

pub fn raw(handle: Borrowed<'_>) -> RawHandle {
    handle.as_raw_socket()
}

pub fn read(handle: Borrowed<'_>, buf: &mut [u8]) -> io::Result<usize> {
    SockRef::from(&handle).recv(as_uninit(buf))
}

// No MSG_WAITALL here: Winsock rejects it on non-blocking sockets
// (WSAEOPNOTSUPP), and the handle's mode cannot be queried to pick the flag.
pub fn recv_all(handle: Borrowed<'_>, buf: &mut [u8]) -> io::Result<usize> {
    SockRef::from(&handle).recv(as_uninit(buf))
}

pub fn peek(handle: Borrowed<'_>, buf: &mut [u8]) -> io::Result<usize> {
    SockRef::from(&handle).peek(as_uninit(buf))
}

pub fn write(handle: Borrowed<'_>, buf: &[u8]) -> io::Result<usize> {
    SockRef::from(&handle).send(buf)
}

pub fn get_mss(_handle: Borrowed<'_>) -> io::Result<u32> {
    Err(io::ErrorKind::Unsupported.into())
}

pub fn set_mss(_handle: Borrowed<'_>, _mss: u32) -> io::Result<()> {
    Err(io::ErrorKind::Unsupported.into())
}

/// Toggle the `FIONBIO` mode word through `ioctlsocket`.
pub fn set_nonblocking(handle: Borrowed<'_>, nonblocking: bool) -> io::Result<()> {
    SockRef::from(&handle).set_nonblocking(nonblocking)
}

/// Winsock cannot report the current `FIONBIO` mode.
pub fn is_nonblocking(_handle: Borrowed<'_>) -> io::Result<bool> {
    Err(io::ErrorKind::Unsupported.into())
}
