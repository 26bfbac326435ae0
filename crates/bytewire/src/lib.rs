#![warn(missing_docs)]

//! Bytewire: a small public API facade for the workspace.
//!
//! This crate provides a clean, stable surface that re-exports the most
//! commonly used types for a polling-driven raw byte transport:
//!
//! - The socket entity and its callback contract (`Socket`, `Events`)
//! - Backend adapters (`NativeBackend`, `ResolvedBackend`, `BridgedBackend`)
//! - Core configuration, states, and the cursor buffer
//!
//! The embedder owns the loop: poll `accept` on listeners and `read` on
//! connected sockets at whatever cadence fits; no operation ever blocks.
//!
//! Example
//! ```no_run
//! use bytewire::{Config, DefaultBackend, Events, IoStatus, Socket, SocketMode};
//!
//! struct App;
//! impl Events<DefaultBackend> for App {
//!     fn allocate(&mut self) -> Socket<DefaultBackend> {
//!         Socket::new(Config::default())
//!     }
//!     fn on_accept(&mut self, _l: &mut Socket<DefaultBackend>, peer: Socket<DefaultBackend>) {
//!         println!("accepted {}:{}", peer.addr, peer.port);
//!     }
//!     fn on_connect(&mut self, _s: &mut Socket<DefaultBackend>) {}
//!     fn on_recv(&mut self, _s: &mut Socket<DefaultBackend>, bytes: &[u8]) {
//!         println!("got {} bytes", bytes.len());
//!     }
//!     fn on_send(&mut self, _s: &mut Socket<DefaultBackend>, _bytes: &[u8]) {}
//! }
//!
//! let mut app = App;
//! let mut listener = Socket::<DefaultBackend>::new(Config::default());
//! listener.init(&mut (), "127.0.0.1", "9000", SocketMode::Server);
//! listener.listen();
//! loop {
//!     listener.accept(&mut app);
//!     // ... poll reads on accepted sockets, at the embedder's cadence
//! }
//! ```

// Core: config, buffer, states, errors
pub use bytewire_core::{
    ByteBuffer, Config, ErrorKind, IoStatus, Result, SessionState, SocketMode, SocketState,
};
// Socket entity and callback contract
pub use bytewire_socket::{Events, Socket, SocketMetrics};
// Backends: one is composed in statically per build target
pub use bytewire_transport::{
    Backend, BridgeEvent, BridgeHost, BridgePort, BridgedBackend, MemoryPort, NativeBackend,
};
#[cfg(unix)]
pub use bytewire_transport::ResolvedBackend;

/// The backend composed in by default on targets with raw socket access.
pub type DefaultBackend = NativeBackend;

/// Convenience prelude with the most commonly used items.
pub mod prelude {
    #[cfg(unix)]
    pub use crate::ResolvedBackend;
    pub use crate::{
        Backend, BridgedBackend, ByteBuffer, Config, DefaultBackend, Events, IoStatus,
        NativeBackend, SessionState, Socket, SocketMode, SocketState,
    };
}
