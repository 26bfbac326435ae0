use std::default::Default;

#[derive(Clone, Debug)]
/// Configuration options to tune socket and buffer behavior.
pub struct Config {
    /// Disable Nagle's algorithm on every created socket (default: true).
    /// Keeps small writes from being coalesced, trading bandwidth for latency.
    pub nodelay: bool,
    /// Listen backlog for server sockets.
    pub backlog: u32,
    /// Capacity of the per-socket `message` staging buffer in bytes.
    pub message_buffer_size: usize,
    /// Capacity of the per-socket inbound staging buffer in bytes.
    pub read_buffer_size: usize,
    /// Capacity of the per-socket outbound staging buffer in bytes.
    pub write_buffer_size: usize,
    /// Socket receive buffer size in bytes (None = use system default).
    /// Corresponds to SO_RCVBUF.
    pub socket_recv_buffer_size: Option<usize>,
    /// Socket send buffer size in bytes (None = use system default).
    /// Corresponds to SO_SNDBUF.
    pub socket_send_buffer_size: Option<usize>,
    /// Time-to-live for outgoing packets (None = use system default).
    /// Corresponds to IP_TTL.
    pub socket_ttl: Option<u32>,
    /// Use a TLS bridge URL scheme (`wss`) instead of plain `ws` when
    /// connecting through the bridged backend (default: false).
    pub secure_bridge: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            nodelay: true,              // latency over throughput
            backlog: 3,                 // small queue; the embedder polls accept
            message_buffer_size: 4096,
            read_buffer_size: 4096,
            write_buffer_size: 4096,
            socket_recv_buffer_size: None, // use system default
            socket_send_buffer_size: None, // use system default
            socket_ttl: None,              // use system default
            secure_bridge: false,
        }
    }
}
