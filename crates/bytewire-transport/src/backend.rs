//! The backend contract: one operation set, three implementations.

use std::net::SocketAddr;

use bytewire_core::{config::Config, error::ErrorKind, error::Result, state::SocketMode};

/// A freshly accepted inbound connection with its peer identity.
#[derive(Debug)]
pub struct Accepted<B> {
    /// Fully configured, non-blocking endpoint for the peer connection.
    pub backend: B,
    /// Peer IP address in textual form.
    pub addr: String,
    /// Peer port in textual form.
    pub port: String,
}

/// Progress of a non-blocking connect call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectProgress {
    /// The connection completed synchronously.
    Complete,
    /// The connection is being established in the background. Not an error.
    InProgress,
}

/// Outcome of one non-blocking read attempt.
#[derive(Debug)]
pub enum ReadOutcome {
    /// `n` bytes were placed at the front of the caller's buffer.
    Data(usize),
    /// Nothing available right now; poll again later.
    WouldBlock,
    /// The remote side sent FIN; the socket must be closed.
    PeerClosed,
    /// The connection was confirmed established. Only bridged backends
    /// report this, since they learn of establishment asynchronously.
    Established,
    /// Hard I/O failure; the socket must be closed.
    Failed(ErrorKind),
}

/// Outcome of one non-blocking write attempt.
#[derive(Debug)]
pub enum WriteOutcome {
    /// The OS accepted `n` bytes. May be less than the input length; the
    /// unsent remainder is not buffered or retried.
    Accepted(usize),
    /// The outbound OS buffer is full; nothing was sent.
    WouldBlock,
    /// Hard send failure; the socket must be closed.
    Failed(ErrorKind),
}

/// Platform-specific mapping of socket primitives behind one uniform
/// contract.
///
/// Implementations are selected statically, one per composition site, so the
/// non-blocking hot path stays branch-free. The socket entity owns the
/// policy (closed-state short-circuits, callback invocation, state
/// transitions); backends only map primitives.
pub trait Backend: Sized {
    /// Per-process environment handles are drawn from. `()` for the native
    /// backends; the bridge host connection for [`crate::BridgedBackend`].
    type Env;

    /// One-time, process-wide backend initialization. Call once, before any
    /// endpoint is opened. Not guaranteed idempotent.
    fn setup(env: &mut Self::Env) -> Result<()> {
        let _ = env;
        Ok(())
    }

    /// Creates a configured endpoint for `addr:port`: non-blocking from
    /// birth, send-coalescing disabled, socket options applied from config.
    fn open(
        env: &mut Self::Env,
        addr: &str,
        port: &str,
        mode: SocketMode,
        config: &Config,
    ) -> Result<Self>;

    /// Binds the endpoint and starts listening for inbound connections.
    fn listen(&mut self, config: &Config) -> Result<()>;

    /// Polls for one pending inbound connection.
    ///
    /// `Ok(None)` means no connection is pending, which is a non-error.
    /// An accepted peer comes back fully configured (non-blocking, latency
    /// tuned) with its address and port extracted.
    fn accept(&mut self, config: &Config) -> Result<Option<Accepted<Self>>>;

    /// Issues a non-blocking connect toward the configured endpoint.
    fn connect(&mut self, config: &Config) -> Result<ConnectProgress>;

    /// Attempts one non-blocking read into `buf`.
    fn read(&mut self, buf: &mut [u8]) -> ReadOutcome;

    /// Attempts one non-blocking write of `buf`.
    fn write(&mut self, buf: &[u8]) -> WriteOutcome;

    /// Signals half/full teardown on a non-listening endpoint.
    fn shutdown(&mut self);

    /// Releases auxiliary resources held by the endpoint (resolved address
    /// lists, staged bridge data). Dropping the endpoint has the same
    /// effect; this exists for embedders that reuse socket storage.
    fn free(&mut self) {}

    /// Local address the endpoint is bound to, when known. Diagnostics only.
    fn local_addr(&self) -> Option<SocketAddr>;

    /// Process-wide teardown, after every socket is closed.
    fn destroy(env: &mut Self::Env) {
        let _ = env;
    }
}
