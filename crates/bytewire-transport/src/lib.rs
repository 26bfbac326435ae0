#![warn(missing_docs)]

//! bytewire-transport: platform backend adapters behind one uniform contract.
//!
//! A [`Backend`](backend::Backend) maps the socket primitive set (create,
//! bind, listen, accept, connect, read, write, shutdown, close) onto one of
//! three implementations, selected statically at composition time:
//!
//! - [`NativeBackend`]: direct non-blocking socket primitives with manual
//!   address/port construction (no DNS).
//! - [`ResolvedBackend`] (unix): resolves host/port into a structured
//!   endpoint list before creating the handle, and gates accept on a
//!   zero-timeout poll readiness query.
//! - [`BridgedBackend`]: proxies every operation to a host-provided
//!   socket-like object for sandboxed environments without raw socket
//!   access, adapting the host's push-based delivery into the same
//!   pull-shaped contract.
//!
//! Contract parity: callback timing, tri-state results, and state
//! transitions are indistinguishable to the embedder regardless of backend.

/// The backend contract and its outcome types.
pub mod backend;
/// Host-bridged backend for sandboxed execution environments.
pub mod bridge;
/// Default native backend.
pub mod native;
#[cfg(unix)]
/// Alternate native backend with explicit address resolution.
pub mod resolved;

mod stream;

pub use backend::{Accepted, Backend, ConnectProgress, ReadOutcome, WriteOutcome};
pub use bridge::{BridgeEvent, BridgeHost, BridgePort, BridgedBackend, MemoryPort};
pub use native::NativeBackend;
#[cfg(unix)]
pub use resolved::ResolvedBackend;
