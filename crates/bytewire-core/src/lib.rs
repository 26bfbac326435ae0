#![warn(missing_docs)]

//! bytewire-core: foundational types shared across all layers.
//!
//! This crate provides the minimal set of leaf types the transport builds on:
//! - Configuration
//! - Error handling
//! - The cursor byte buffer used to stage framing data
//! - Socket lifecycle and session state enums
//!
//! Backend adapters live in `bytewire-transport`; the socket entity and its
//! callback contract live in `bytewire-socket`.

/// Cursor byte buffer over one fixed region.
pub mod buffer;
/// Configuration options for sockets and buffers.
pub mod config;
/// Error types and results.
pub mod error;
/// Socket lifecycle, session, and I/O status enums.
pub mod state;

pub use buffer::ByteBuffer;
pub use config::Config;
pub use error::{ErrorKind, Result};
pub use state::{IoStatus, SessionState, SocketMode, SocketState};
