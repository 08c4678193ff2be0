//! Channel setup options.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::channel::ChannelHandle;
use crate::error::{Error, Result};
use crate::segment::set_mss;
use crate::sys;

/// Socket options applied to a channel before transfers start.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelOptions {
    /// Requested TCP maximum segment size; `None` keeps the system default.
    pub segment_size: Option<u32>,

    /// Blocking mode to switch to; `None` leaves the mode untouched.
    pub blocking: Option<bool>,
}

impl ChannelOptions {
    /// Read options from `CITADEL_SOCK_MSS` and `CITADEL_SOCK_BLOCKING`.
    ///
    /// Unset or unparseable variables leave the option at its default.
    pub fn from_env() -> Self {
        Self::from_vars(
            std::env::var("CITADEL_SOCK_MSS").ok().as_deref(),
            std::env::var("CITADEL_SOCK_BLOCKING").ok().as_deref(),
        )
    }

    fn from_vars(mss: Option<&str>, blocking: Option<&str>) -> Self {
        let segment_size = mss.and_then(|s| match s.trim().parse::<u32>() {
            Ok(0) => None,
            Ok(v) => Some(v),
            Err(e) => {
                warn!("ignoring CITADEL_SOCK_MSS={:?}: {}", s, e);
                None
            }
        });

        let blocking = blocking.and_then(|s| match s.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => {
                warn!("ignoring CITADEL_SOCK_BLOCKING={:?}", s);
                None
            }
        });

        Self {
            segment_size,
            blocking,
        }
    }

    /// Apply the options to `channel`.
    ///
    /// The segment size is best-effort and never fails the call; a failed
    /// blocking-mode switch does.
    pub fn apply(&self, channel: ChannelHandle<'_>) -> Result<()> {
        let handle = channel.borrowed().ok_or(Error::InvalidHandle)?;

        if let Some(size) = self.segment_size {
            set_mss(channel, size);
        }

        if let Some(blocking) = self.blocking {
            sys::set_nonblocking(handle, !blocking)?;
        }

        Ok(())
    }
}
