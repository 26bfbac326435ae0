//! Socket lifecycle, session, and I/O status enums.
//!
//! `SocketState` is the coarse lifecycle axis; `SessionState` tracks
//! handshake progress for upgrade-capable backends on an independent axis.

/// The role a socket is initialized for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SocketMode {
    /// Listening endpoint that accepts inbound connections.
    #[default]
    Server,
    /// Outbound endpoint that connects to a remote server.
    Client,
}

/// Coarse socket lifecycle state machine.
///
/// Only advances `None -> {Accepting | Connected} -> Closed`. `Closed` is
/// absorbing and terminal: once reached, no operation may touch the backend
/// handle again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SocketState {
    /// Created but not initialized yet.
    #[default]
    None,
    /// Listening for inbound connections.
    Accepting,
    /// Connected to a remote endpoint (optimistically, for outbound sockets).
    Connected,
    /// Terminal. The backend handle has been released.
    Closed,
}

impl SocketState {
    /// Returns true once the socket has reached its terminal state.
    pub fn is_closed(&self) -> bool {
        matches!(self, SocketState::Closed)
    }

    /// Returns true while the socket is usable for I/O or accepting.
    pub fn is_live(&self) -> bool {
        matches!(self, SocketState::Accepting | SocketState::Connected)
    }
}

/// Handshake sub-state for upgrade-style connection establishment.
///
/// Independent axis from [`SocketState`]; advanced by the embedder's
/// handshake layer, except for the bridged backend which reports connection
/// establishment asynchronously and the close path which always lands on
/// `ServerHungup`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No handshake activity yet.
    #[default]
    None,
    /// Server: waiting for the client's opening handshake.
    ServerHandshakeAwait,
    /// Server: responded to the opening handshake.
    ServerHandshakeResponded,
    /// Client: requested the opening handshake.
    ClientHandshakeRequested,
    /// Server: handshake complete, session established.
    ServerConnected,
    /// Client: received the server's handshake response.
    ClientHandshakeReceived,
    /// Client: hello payload sent.
    ClientHelloSent,
    /// Client: the bridge host confirmed connection establishment.
    ClientBridgeConnectCallback,
    /// Client: handshake complete, session established.
    ClientConnected,
    /// The remote side hung up or the socket was closed.
    ServerHungup,
}

impl SessionState {
    /// Returns true once the handshake has fully completed on either side.
    pub fn is_established(&self) -> bool {
        matches!(self, SessionState::ServerConnected | SessionState::ClientConnected)
    }

    /// Returns true once the session has been torn down.
    pub fn is_hungup(&self) -> bool {
        matches!(self, SessionState::ServerHungup)
    }
}

/// Tri-state outcome of a non-blocking socket operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoStatus {
    /// Data was delivered (read) or accepted (write).
    Ready,
    /// Nothing to do right now; retry on the next poll. Not an error.
    Idle,
    /// The operation cannot proceed: the socket is closed, the input was
    /// empty, or a hard failure occurred.
    Fatal,
}

impl IoStatus {
    /// Returns true when the operation moved bytes.
    pub fn is_ready(&self) -> bool {
        matches!(self, IoStatus::Ready)
    }

    /// Returns true when the caller should retry on the next poll.
    pub fn is_idle(&self) -> bool {
        matches!(self, IoStatus::Idle)
    }

    /// Returns true when the operation failed or was a no-op on a dead socket.
    pub fn is_fatal(&self) -> bool {
        matches!(self, IoStatus::Fatal)
    }
}
