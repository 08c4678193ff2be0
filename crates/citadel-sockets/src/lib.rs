//! Citadel Sockets - Reliable byte transfer over connected channels
//!
//! This crate provides:
//! - Retry-until-complete read, receive and write loops
//! - A non-consuming peek mode, including over TLS sessions
//! - TCP maximum segment size get/set
//! - Blocking-mode toggling for socket handles
//!
//! # Design Philosophy
//!
//! A single `read` or `write` call may move fewer bytes than asked, fail with
//! `EINTR`, or time out. Protocol code should not care. The loops in [`io`]
//! keep calling the transport until the request is complete, the peer closes,
//! or the transport reports an error its [`ErrorPolicy`] deems fatal.
//!
//! The loops are written once against the [`Transport`] trait. Raw sockets
//! ([`SocketTransport`]) and secured sessions ([`SecureSession`]) plug in
//! underneath with identical retry and accounting behaviour.
//!
//! Everything is synchronous. No locks are taken and no threads are spawned;
//! one reader and one writer per channel is the caller's responsibility.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::net::TcpStream;
//! use citadel_sockets::{readn, writen, ChannelHandle, SocketTransport};
//!
//! let stream = TcpStream::connect("127.0.0.1:5001")?;
//! let mut transport = SocketTransport::new(ChannelHandle::new(&stream))?;
//!
//! let written = writen(&mut transport, b"hello")?;
//! assert_eq!(written.bytes, 5);
//!
//! let mut reply = [0u8; 5];
//! let n = readn(&mut transport, &mut reply)?;
//! assert!(n <= reply.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod blocking;
pub mod channel;
pub mod config;
pub mod error;
pub mod io;
pub mod policy;
pub mod secure;
pub mod segment;
mod sys;
pub mod transport;

#[cfg(test)]
mod testing;

// Re-export main types at crate root
pub use blocking::{is_blocking, set_blocking};
pub use channel::ChannelHandle;
pub use config::ChannelOptions;
pub use error::{Error, Op, Result};
pub use io::{readn, recvn, recvn_peek, recvn_with, writen, RecvMode, Written};
pub use policy::{ErrorPolicy, ReadPolicy, SecurePolicy, StandardPolicy};
pub use secure::{SecureSession, TlsSession};
pub use segment::{get_mss, set_mss};
pub use sys::{AsHandle, RawHandle, INVALID_HANDLE};
pub use transport::{Policed, SocketTransport, Transport};
