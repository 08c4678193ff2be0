//! TCP maximum segment size configuration.
//!
//! Setting the MSS is best-effort. Platforms without `TCP_MAXSEG` make both
//! operations silent no-ops, and some stacks clamp the requested value, which
//! is reported as a warning rather than an error.

use tracing::warn;

use crate::channel::ChannelHandle;
use crate::sys;

/// Apply `size` as the maximum segment size of `channel`.
///
/// A `size` of zero leaves the system default in place. Returns the effective
/// segment size after the change, or `None` when nothing was applied.
pub fn set_mss(channel: ChannelHandle<'_>, size: u32) -> Option<u32> {
    if !sys::HAS_MSS || size == 0 {
        return None;
    }
    let handle = channel.borrowed()?;

    if let Err(e) = sys::set_mss(handle, size) {
        warn!(
            "attempt to set TCP maximum segment size to {} failed, setting the MSS may not be implemented on this OS: {}",
            size, e
        );
        return None;
    }

    match sys::get_mss(handle) {
        Ok(effective) => {
            if effective != size {
                warn!(
                    "attempt to set TCP maximum segment size to {}, but got {}",
                    size, effective
                );
            }
            Some(effective)
        }
        Err(e) => {
            warn!("getsockopt TCP_MAXSEG: {}", e);
            None
        }
    }
}

/// Current maximum segment size of `channel`.
///
/// `None` stands for "unknown": the platform lacks the capability, the handle
/// is invalid, or the query failed (the last case is logged).
pub fn get_mss(channel: ChannelHandle<'_>) -> Option<u32> {
    if !sys::HAS_MSS {
        return None;
    }
    let handle = channel.borrowed()?;

    match sys::get_mss(handle) {
        Ok(mss) => Some(mss),
        Err(e) => {
            warn!("getsockopt TCP_MAXSEG: {}", e);
            None
        }
    }
}
