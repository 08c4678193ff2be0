use std::io;
use std::mem;
use std::os::fd::{AsRawFd, BorrowedFd, RawFd};

use socket2::SockRef;

use super::as_uninit;

pub use std::os::fd::AsFd as AsHandle;

/// Raw socket handle type on this platform.
pub type RawHandle = RawFd;

/// Borrowed socket handle on this platform.
pub type Borrowed<'a> = BorrowedFd<'a>;

/// The invalid handle sentinel.
pub const INVALID_HANDLE: RawHandle = -1;

/// Whether `TCP_MAXSEG` can be queried and set.
pub const HAS_MSS: bool = true;

/// `ETIMEDOUT` means the connection died (retransmit or keepalive timeout);
/// socket receive/send timeouts surface as `EAGAIN` instead.
pub const TIMEOUT_IS_TRANSIENT: bool = false;

pub fn borrow<S: AsHandle + ?Sized>(socket: &S) -> Borrowed<'_> {
    socket.as_fd()
}

/// # Safety
///
/// A non-negative `raw` must stay open for the returned lifetime.
pub unsafe fn borrow_raw<'a>(raw: RawHandle) -> Option<Borrowed<'a>> {
    if raw < 0 {
        None
    } else {
        Some(BorrowedFd::borrow_raw(raw))
    }
}

pub fn raw(handle: Borrowed<'_>) -> RawHandle {
    handle.as_raw_fd()
}

pub fn read(handle: Borrowed<'_>, buf: &mut [u8]) -> io::Result<usize> {
    SockRef::from(&handle).recv(as_uninit(buf))
}

/// Receive with the wait-all hint so a blocking socket fills `buf` in one call
/// when it can.
pub fn recv_all(handle: Borrowed<'_>, buf: &mut [u8]) -> io::Result<usize> {
    SockRef::from(&handle).recv_with_flags(as_uninit(buf), libc::MSG_WAITALL)
}

pub fn peek(handle: Borrowed<'_>, buf: &mut [u8]) -> io::Result<usize> {
    SockRef::from(&handle).recv_with_flags(as_uninit(buf), libc::MSG_PEEK | libc::MSG_WAITALL)
}

pub fn write(handle: Borrowed<'_>, buf: &[u8]) -> io::Result<usize> {
    SockRef::from(&handle).send(buf)
}

pub fn get_mss(handle: Borrowed<'_>) -> io::Result<u32> {
    let mut mss: libc::c_int = 0;
    let mut len = mem::size_of::<libc::c_int>() as libc::socklen_t;
    // SAFETY: `mss` and `len` are valid for writes of the sizes passed.
    let rc = unsafe {
        libc::getsockopt(
            handle.as_raw_fd(),
            libc::IPPROTO_TCP,
            libc::TCP_MAXSEG,
            &mut mss as *mut libc::c_int as *mut libc::c_void,
            &mut len,
        )
    };
    if rc == -1 {
        return Err(io::Error::last_os_error());
    }
    Ok(mss as u32)
}

pub fn set_mss(handle: Borrowed<'_>, mss: u32) -> io::Result<()> {
    let value = libc::c_int::try_from(mss)
        .map_err(|_| io::Error::from(io::ErrorKind::InvalidInput))?;
    // SAFETY: `value` outlives the call and the length matches its type.
    let rc = unsafe {
        libc::setsockopt(
            handle.as_raw_fd(),
            libc::IPPROTO_TCP,
            libc::TCP_MAXSEG,
            &value as *const libc::c_int as *const libc::c_void,
            mem::size_of::<libc::c_int>() as libc::socklen_t,
        )
    };
    if rc == -1 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

/// Toggle `O_NONBLOCK` through `fcntl(F_GETFL/F_SETFL)`.
pub fn set_nonblocking(handle: Borrowed<'_>, nonblocking: bool) -> io::Result<()> {
    SockRef::from(&handle).set_nonblocking(nonblocking)
}

pub fn is_nonblocking(handle: Borrowed<'_>) -> io::Result<bool> {
    // SAFETY: F_GETFL takes no pointer arguments.
    let flags = unsafe { libc::fcntl(handle.as_raw_fd(), libc::F_GETFL) };
    if flags < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(flags & libc::O_NONBLOCK != 0)
}
