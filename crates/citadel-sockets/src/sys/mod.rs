//! Platform seam.
//!
//! Everything that differs between socket APIs lives behind this module:
//! the raw handle type, how a handle is borrowed, the receive flags used by
//! the drain loops, segment-size control and the blocking-mode mechanism.
//! The rest of the crate never uses `#[cfg]` on the hot path.

use std::mem::MaybeUninit;

#[cfg(unix)]
mod unix;
#[cfg(unix)]
pub use unix::*;

#[cfg(windows)]
mod windows;
#[cfg(windows)]
pub use windows::*;

/// View an initialized buffer as the uninitialized slice socket2 receives into.
fn as_uninit(buf: &mut [u8]) -> &mut [MaybeUninit<u8>] {
    // SAFETY: `MaybeUninit<u8>` has the same layout as `u8`, and socket2 only
    // ever writes initialized bytes into the slice.
    unsafe { &mut *(buf as *mut [u8] as *mut [MaybeUninit<u8>]) }
}
