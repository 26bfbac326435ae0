use std::time::{Duration, Instant};

/// Advisory per-connection metrics.
///
/// Maintained opportunistically by the socket entity (`connected_at`,
/// `last_packet`) and by the embedder's protocol layer (everything else).
/// None of these carry invariants; they exist for diagnostics and pacing
/// decisions.
#[derive(Debug, Clone, Default)]
pub struct SocketMetrics {
    /// When the connection was established.
    pub connected_at: Option<Instant>,
    /// Last measured round-trip time.
    pub ping: Option<Duration>,
    /// Client seconds-since-connect reference used for RTT measurement.
    pub ts: f32,
    /// Outbound budget hint in KB/sec.
    pub rate: u8,
    /// Snapshot updates per second the peer asked for.
    pub update_rate: u8,
    /// Interpolation delay hint in milliseconds.
    pub interp_ms: u8,
    /// When the last packet arrived.
    pub last_packet: Option<Instant>,
    /// When the last snapshot was sent.
    pub last_snapshot: Option<Instant>,
}
