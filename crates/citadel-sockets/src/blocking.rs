//! Blocking-mode toggle for channel handles.

use tracing::debug;

use crate::channel::ChannelHandle;
use crate::sys;

/// Switch `channel` between blocking and non-blocking semantics.
///
/// Returns `false` without touching the OS when the handle is invalid, and
/// `false` when either reading or applying the mode fails. Only the
/// non-blocking bit changes; every other descriptor flag is preserved.
pub fn set_blocking(channel: ChannelHandle<'_>, blocking: bool) -> bool {
    let Some(handle) = channel.borrowed() else {
        return false;
    };

    match sys::set_nonblocking(handle, !blocking) {
        Ok(()) => true,
        Err(e) => {
            debug!("set_blocking({:?}, {}) failed: {}", channel, blocking, e);
            false
        }
    }
}

/// Whether `channel` is currently in blocking mode.
///
/// `None` when the handle is invalid or the platform cannot report the mode.
pub fn is_blocking(channel: ChannelHandle<'_>) -> Option<bool> {
    let handle = channel.borrowed()?;
    sys::is_nonblocking(handle).ok().map(|nonblocking| !nonblocking)
}
