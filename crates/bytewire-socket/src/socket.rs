use std::{any::Any, fmt, net::SocketAddr, time::Instant};

use bytewire_core::{
    buffer::ByteBuffer,
    config::Config,
    error::Result,
    state::{IoStatus, SessionState, SocketMode, SocketState},
};
use bytewire_transport::{Backend, ConnectProgress, ReadOutcome, WriteOutcome};

use crate::{events::Events, metrics::SocketMetrics};

/// One listening or connected endpoint.
///
/// The backend handle lives inside `backend` and is taken on close, so no
/// operation can touch it afterwards: every operation short-circuits on the
/// `Closed` state before reaching the handle. That discipline is what keeps
/// use-after-close impossible across all three backends.
pub struct Socket<B: Backend> {
    /// Remote (client) or bound (server) IP address in textual form.
    pub addr: String,
    /// Remote or bound port in textual form.
    pub port: String,
    mode: SocketMode,
    state: SocketState,
    session_state: SessionState,
    backend: Option<B>,
    /// Staging buffer for assembled inbound messages.
    pub message: ByteBuffer,
    /// Staging buffer for inbound framing data.
    pub read_buf: ByteBuffer,
    /// Staging buffer for outbound framing data.
    pub write_buf: ByteBuffer,
    /// Advisory connection metrics.
    pub metrics: SocketMetrics,
    /// Opaque back-reference owned and interpreted by the embedder only.
    pub userdata: Option<Box<dyn Any>>,
    config: Config,
}

impl<B: Backend> fmt::Debug for Socket<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Socket")
            .field("addr", &self.addr)
            .field("port", &self.port)
            .field("mode", &self.mode)
            .field("state", &self.state)
            .field("session_state", &self.session_state)
            .finish()
    }
}

impl<B: Backend> Socket<B> {
    /// Creates an uninitialized socket with staging buffers sized from
    /// `config`. Call [`Socket::init`] before any other operation.
    pub fn new(config: Config) -> Self {
        Self {
            addr: String::new(),
            port: String::new(),
            mode: SocketMode::default(),
            state: SocketState::None,
            session_state: SessionState::None,
            backend: None,
            message: ByteBuffer::with_capacity(config.message_buffer_size),
            read_buf: ByteBuffer::with_capacity(config.read_buffer_size),
            write_buf: ByteBuffer::with_capacity(config.write_buffer_size),
            metrics: SocketMetrics::default(),
            userdata: None,
            config,
        }
    }

    /// One-time, process-wide backend bring-up. Call once per process,
    /// before any socket is initialized.
    pub fn setup(env: &mut B::Env) -> Result<()> {
        B::setup(env)
    }

    /// Process-wide backend teardown, after every socket is closed.
    pub fn destroy(env: &mut B::Env) {
        B::destroy(env);
    }

    /// Coarse lifecycle state.
    pub fn state(&self) -> SocketState {
        self.state
    }

    /// Handshake sub-state.
    pub fn session_state(&self) -> SessionState {
        self.session_state
    }

    /// Advances the handshake sub-state. Driven by the embedder's upgrade
    /// protocol; independent of the coarse lifecycle axis.
    pub fn set_session_state(&mut self, session_state: SessionState) {
        self.session_state = session_state;
    }

    /// Role this socket was initialized for.
    pub fn mode(&self) -> SocketMode {
        self.mode
    }

    /// Returns true once the socket has reached its terminal state.
    pub fn is_closed(&self) -> bool {
        self.state.is_closed()
    }

    /// Local address the backend handle is bound to, when known.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.backend.as_ref().and_then(B::local_addr)
    }

    /// Binds identity fields and creates the backend handle: non-blocking
    /// from birth, send-coalescing disabled for latency.
    ///
    /// On address resolution or handle creation failure the socket is
    /// closed and `init` returns normally; the failure is local to this
    /// socket and visible through [`Socket::state`].
    pub fn init(&mut self, env: &mut B::Env, addr: &str, port: &str, mode: SocketMode) {
        if self.state != SocketState::None {
            tracing::warn!(state = ?self.state, "init on an already-initialized socket ignored");
            return;
        }
        self.addr = addr.to_owned();
        self.port = port.to_owned();
        self.mode = mode;
        match B::open(env, addr, port, mode, &self.config) {
            Ok(backend) => self.backend = Some(backend),
            Err(e) => {
                tracing::debug!(addr, port, error = %e, "socket init failed");
                self.close();
            }
        }
    }

    /// Binds and listens; the socket transitions to `Accepting`.
    ///
    /// On failure the socket is closed.
    pub fn listen(&mut self) {
        if self.state.is_closed() {
            return;
        }
        let outcome = match self.backend.as_mut() {
            Some(backend) => backend.listen(&self.config),
            None => return,
        };
        match outcome {
            Ok(()) => self.state = SocketState::Accepting,
            Err(e) => {
                tracing::debug!(addr = %self.addr, port = %self.port, error = %e, "socket listen failed");
                self.close();
            }
        }
    }

    /// Non-blocking poll for one pending inbound connection.
    ///
    /// No pending connection is a quiet no-op. On success the child socket
    /// is allocated through [`Events::allocate`], configured exactly like a
    /// freshly connected client, marked `Connected`, and handed to the
    /// embedder via [`Events::on_accept`]. On accept failure the listener
    /// closes and stops listening.
    ///
    /// Never invokes `allocate` unless this socket is actively listening.
    pub fn accept(&mut self, events: &mut dyn Events<B>) {
        if self.state != SocketState::Accepting {
            return;
        }
        let outcome = match self.backend.as_mut() {
            Some(backend) => backend.accept(&self.config),
            None => return,
        };
        match outcome {
            Ok(None) => {} // no pending connections; fine
            Ok(Some(accepted)) => {
                let mut child = events.allocate();
                child.addr = accepted.addr;
                child.port = accepted.port;
                child.mode = SocketMode::Server;
                child.backend = Some(accepted.backend);
                child.state = SocketState::Connected;
                child.metrics.connected_at = Some(Instant::now());
                tracing::debug!(addr = %child.addr, port = %child.port, "accepted connection");
                events.on_accept(self, child);
            }
            Err(e) => {
                tracing::debug!(error = %e, "socket accept failed; will stop listening");
                self.close();
            }
        }
    }

    /// Issues a non-blocking connect toward the configured endpoint.
    ///
    /// The state moves to `Connected` as soon as the connect is issued,
    /// without waiting for handshake completion — deliberate optimism:
    /// "connection in progress" is non-fatal here, and an actual failure
    /// surfaces on the first `read`/`write`. [`Events::on_connect`] fires
    /// once the call returns, whether completed or still in flight.
    pub fn connect(&mut self, events: &mut dyn Events<B>) {
        if self.state.is_closed() {
            return;
        }
        let outcome = match self.backend.as_mut() {
            Some(backend) => backend.connect(&self.config),
            None => return,
        };
        match outcome {
            Ok(progress) => {
                if progress == ConnectProgress::InProgress {
                    tracing::trace!(addr = %self.addr, port = %self.port, "connect in progress");
                }
                self.state = SocketState::Connected;
                self.metrics.connected_at = Some(Instant::now());
                events.on_connect(self);
            }
            Err(e) => {
                tracing::debug!(addr = %self.addr, port = %self.port, error = %e, "socket connect failed");
                self.close();
            }
        }
    }

    /// Non-blocking read of at most `max_len` bytes.
    ///
    /// `Ready`: bytes were delivered to [`Events::on_recv`] as a transient
    /// view. `Idle`: nothing available right now; retry on the next poll.
    /// `Fatal`: remote FIN or hard error; the socket is now closed. Reading
    /// an already-closed socket is a no-op returning `Fatal` without
    /// touching the backend handle.
    pub fn read(&mut self, max_len: usize, events: &mut dyn Events<B>) -> IoStatus {
        if max_len == 0 {
            return IoStatus::Fatal;
        }
        if self.state.is_closed() {
            return IoStatus::Fatal;
        }
        let mut scratch = vec![0u8; max_len];
        let outcome = match self.backend.as_mut() {
            Some(backend) => backend.read(&mut scratch),
            None => return IoStatus::Fatal,
        };
        match outcome {
            ReadOutcome::Data(n) => {
                self.metrics.last_packet = Some(Instant::now());
                events.on_recv(self, &scratch[..n]);
                IoStatus::Ready
            }
            ReadOutcome::WouldBlock => IoStatus::Idle,
            ReadOutcome::Established => {
                // bridged backends confirm establishment asynchronously
                self.state = SocketState::Connected;
                self.session_state = SessionState::ClientBridgeConnectCallback;
                IoStatus::Idle
            }
            ReadOutcome::PeerClosed => {
                self.close();
                IoStatus::Fatal
            }
            ReadOutcome::Failed(e) => {
                tracing::debug!(addr = %self.addr, port = %self.port, error = %e, "socket read failed");
                self.close();
                IoStatus::Fatal
            }
        }
    }

    /// Non-blocking write of `bytes`, as-is, without framing.
    ///
    /// Empty input or a closed socket returns `Fatal` immediately as a
    /// no-op. On success [`Events::on_send`] fires with the prefix the OS
    /// actually accepted (which may be shorter — the unsent remainder is
    /// not buffered or retried; the caller decides whether to retry or
    /// drop) and the result is `Ready`. A full outbound OS buffer returns
    /// `Fatal` without closing; hard errors close the socket.
    pub fn write(&mut self, bytes: &[u8], events: &mut dyn Events<B>) -> IoStatus {
        if bytes.is_empty() {
            return IoStatus::Fatal;
        }
        if self.state.is_closed() {
            return IoStatus::Fatal;
        }
        let outcome = match self.backend.as_mut() {
            Some(backend) => backend.write(bytes),
            None => return IoStatus::Fatal,
        };
        match outcome {
            WriteOutcome::Accepted(n) => {
                events.on_send(self, &bytes[..n]);
                IoStatus::Ready
            }
            WriteOutcome::WouldBlock => {
                tracing::debug!(
                    addr = %self.addr,
                    port = %self.port,
                    "socket write failed; outbound socket buffer full"
                );
                IoStatus::Fatal
            }
            WriteOutcome::Failed(e) => {
                tracing::debug!(addr = %self.addr, port = %self.port, error = %e, "socket write failed");
                self.close();
                IoStatus::Fatal
            }
        }
    }

    /// Signals half/full teardown on a non-listening socket. No-op if the
    /// socket is already closed or is a listener.
    pub fn shutdown(&mut self) {
        if self.state.is_closed() || self.state == SocketState::Accepting {
            return;
        }
        if let Some(backend) = self.backend.as_mut() {
            backend.shutdown();
        }
    }

    /// Releases auxiliary backend resources (resolved address lists, staged
    /// bridge data). Closing or dropping the socket has the same effect;
    /// this exists for embedders that reuse socket storage.
    pub fn free(&mut self) {
        if let Some(backend) = self.backend.as_mut() {
            backend.free();
        }
    }

    /// Releases the backend handle and moves to the terminal state.
    /// Idempotent; repeated calls are no-ops.
    pub fn close(&mut self) {
        if self.state.is_closed() {
            return;
        }
        self.state = SocketState::Closed;
        self.session_state = SessionState::ServerHungup;
        tracing::debug!(addr = %self.addr, port = %self.port, "setting socket closed");
        if let Some(mut backend) = self.backend.take() {
            backend.free();
            // dropping the backend releases the OS/bridge handle
        }
    }
}
