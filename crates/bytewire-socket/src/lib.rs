#![warn(missing_docs)]

//! bytewire-socket: the socket entity and its state machine.
//!
//! One [`Socket`] per listening or connected endpoint. The socket owns the
//! connection lifecycle, composes a backend adapter with its staging
//! buffers, and applies policy (closed-state short-circuits, callback
//! invocation, optimistic connect) uniformly regardless of backend.
//!
//! There is no internal event loop: the embedder's own polling cadence is
//! the only driver. Sockets are not synchronized internally; if shared
//! across threads the embedder must serialize externally.

/// The five-slot callback contract.
pub mod events;
/// Advisory per-connection metrics.
pub mod metrics;
/// The socket entity and its operations.
pub mod socket;

pub use events::Events;
pub use metrics::SocketMetrics;
pub use socket::Socket;
