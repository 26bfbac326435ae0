//! Host-bridged backend for sandboxed execution environments.
//!
//! Some targets (browser-like sandboxes, restricted runtimes) expose no raw
//! socket primitives; every operation must be proxied to a host-provided
//! socket-like object across an out-of-process message interface. The host
//! *pushes* inbound data and lifecycle events; this adapter translates those
//! pushes back into the pull-shaped contract the other backends present, so
//! the embedder observes identical callback timing and state transitions.
//!
//! Wiring: the embedder implements [`BridgePort`] (outbound operations),
//! hands it to a [`BridgeHost`], and pumps host-side events into the
//! per-socket [`BridgeEvent`] channel obtained via [`BridgeHost::pusher`].

use std::{
    collections::{HashMap, VecDeque},
    fmt,
    net::SocketAddr,
    sync::Arc,
};

use bytewire_core::{config::Config, error::ErrorKind, error::Result, state::SocketMode};
use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};

use crate::backend::{Accepted, Backend, ConnectProgress, ReadOutcome, WriteOutcome};

/// Events the host pushes into a bridged socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeEvent {
    /// The host finished establishing the connection.
    Established,
    /// The host delivered inbound bytes.
    Message(Vec<u8>),
    /// The host observed an orderly remote close.
    Closed,
    /// The host reported a connection failure.
    Error(String),
}

/// Embedder-supplied proxy for outbound operations on host socket objects.
///
/// `close` must tolerate repeated calls for the same id; teardown can reach
/// it from both `shutdown` and drop.
pub trait BridgePort {
    /// Starts connecting host socket `id` to `url`.
    fn connect(&self, id: u64, url: &str) -> Result<()>;
    /// Sends bytes through host socket `id`.
    fn send(&self, id: u64, bytes: &[u8]) -> Result<()>;
    /// Closes host socket `id`.
    fn close(&self, id: u64);
}

/// Per-process bridge environment: allocates host socket ids and routes
/// host-pushed events to the owning socket.
pub struct BridgeHost {
    port: Arc<dyn BridgePort>,
    next_id: u64,
    pushers: HashMap<u64, Sender<BridgeEvent>>,
}

impl fmt::Debug for BridgeHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BridgeHost")
            .field("next_id", &self.next_id)
            .field("live_sockets", &self.pushers.len())
            .finish()
    }
}

impl BridgeHost {
    /// Creates a bridge environment over the embedder's port.
    pub fn new(port: Arc<dyn BridgePort>) -> Self {
        Self { port, next_id: 1, pushers: HashMap::new() }
    }

    fn register(&mut self) -> (u64, Receiver<BridgeEvent>) {
        let id = self.next_id;
        self.next_id += 1;
        let (tx, rx) = unbounded();
        self.pushers.insert(id, tx);
        (id, rx)
    }

    /// Sender the host glue pushes events for socket `id` into.
    pub fn pusher(&self, id: u64) -> Option<Sender<BridgeEvent>> {
        self.pushers.get(&id).cloned()
    }

    /// Forgets socket `id` once the host has destroyed its object.
    pub fn release(&mut self, id: u64) {
        self.pushers.remove(&id);
    }
}

/// Endpoint proxied through a host socket object.
pub struct BridgedBackend {
    id: u64,
    url: String,
    port: Arc<dyn BridgePort>,
    events: Receiver<BridgeEvent>,
    /// Host pushes arrive in frames; bytes beyond one read's scratch space
    /// wait here for the next poll.
    staged: VecDeque<u8>,
    closed: bool,
}

impl fmt::Debug for BridgedBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BridgedBackend")
            .field("id", &self.id)
            .field("url", &self.url)
            .field("staged", &self.staged.len())
            .field("closed", &self.closed)
            .finish()
    }
}

impl BridgedBackend {
    /// Host socket id this endpoint drives.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// URL the endpoint connects to.
    pub fn url(&self) -> &str {
        &self.url
    }

    fn drain_staged(&mut self, buf: &mut [u8]) -> usize {
        let n = self.staged.len().min(buf.len());
        for (slot, byte) in buf.iter_mut().zip(self.staged.drain(..n)) {
            *slot = byte;
        }
        n
    }
}

impl Backend for BridgedBackend {
    type Env = BridgeHost;

    fn open(
        env: &mut BridgeHost,
        addr: &str,
        port: &str,
        mode: SocketMode,
        config: &Config,
    ) -> Result<Self> {
        if matches!(mode, SocketMode::Server) {
            // sandboxed hosts cannot listen; servers are never bridge-hosted
            return Err(ErrorKind::UnsupportedOperation("bridged endpoints cannot listen"));
        }
        let scheme = if config.secure_bridge { "wss" } else { "ws" };
        let url = format!("{scheme}://{addr}:{port}/sock");
        let (id, events) = env.register();
        Ok(Self {
            id,
            url,
            port: Arc::clone(&env.port),
            events,
            staged: VecDeque::new(),
            closed: false,
        })
    }

    fn listen(&mut self, _config: &Config) -> Result<()> {
        Err(ErrorKind::UnsupportedOperation("bridged endpoints cannot listen"))
    }

    fn accept(&mut self, _config: &Config) -> Result<Option<Accepted<Self>>> {
        Err(ErrorKind::UnsupportedOperation("bridged endpoints cannot accept"))
    }

    fn connect(&mut self, _config: &Config) -> Result<ConnectProgress> {
        self.port.connect(self.id, &self.url)?;
        // establishment is confirmed later by a pushed Established event
        Ok(ConnectProgress::InProgress)
    }

    fn read(&mut self, buf: &mut [u8]) -> ReadOutcome {
        if !self.staged.is_empty() {
            let n = self.drain_staged(buf);
            return ReadOutcome::Data(n);
        }
        match self.events.try_recv() {
            Ok(BridgeEvent::Message(bytes)) => {
                self.staged.extend(bytes);
                let n = self.drain_staged(buf);
                ReadOutcome::Data(n)
            }
            Ok(BridgeEvent::Established) => ReadOutcome::Established,
            Ok(BridgeEvent::Closed) => ReadOutcome::PeerClosed,
            Ok(BridgeEvent::Error(msg)) => ReadOutcome::Failed(ErrorKind::Bridge(msg)),
            Err(TryRecvError::Empty) => ReadOutcome::WouldBlock,
            Err(TryRecvError::Disconnected) => ReadOutcome::Failed(ErrorKind::BridgeUnavailable),
        }
    }

    fn write(&mut self, buf: &[u8]) -> WriteOutcome {
        match self.port.send(self.id, buf) {
            Ok(()) => WriteOutcome::Accepted(buf.len()),
            Err(e) => WriteOutcome::Failed(e),
        }
    }

    fn shutdown(&mut self) {
        if !self.closed {
            self.closed = true;
            self.port.close(self.id);
        }
    }

    fn free(&mut self) {
        self.staged.clear();
    }

    fn local_addr(&self) -> Option<SocketAddr> {
        None
    }
}

impl Drop for BridgedBackend {
    fn drop(&mut self) {
        if !self.closed {
            self.closed = true;
            self.port.close(self.id);
        }
    }
}

/// In-memory [`BridgePort`] that records outbound traffic.
///
/// Useful for tests and for driving a bridged socket from a host loop that
/// lives in the same process.
#[derive(Clone, Default)]
pub struct MemoryPort {
    inner: Arc<std::sync::Mutex<MemoryPortState>>,
}

#[derive(Default)]
struct MemoryPortState {
    connected: Vec<(u64, String)>,
    sent: Vec<(u64, Vec<u8>)>,
    closed: Vec<u64>,
}

impl MemoryPort {
    /// `(id, url)` pairs passed to `connect`, in order.
    pub fn connected(&self) -> Vec<(u64, String)> {
        self.inner.lock().unwrap().connected.clone()
    }

    /// `(id, bytes)` pairs passed to `send`, in order.
    pub fn sent(&self) -> Vec<(u64, Vec<u8>)> {
        self.inner.lock().unwrap().sent.clone()
    }

    /// Ids passed to `close`, repeats included.
    pub fn closed(&self) -> Vec<u64> {
        self.inner.lock().unwrap().closed.clone()
    }
}

impl BridgePort for MemoryPort {
    fn connect(&self, id: u64, url: &str) -> Result<()> {
        self.inner.lock().unwrap().connected.push((id, url.to_owned()));
        Ok(())
    }

    fn send(&self, id: u64, bytes: &[u8]) -> Result<()> {
        self.inner.lock().unwrap().sent.push((id, bytes.to_vec()));
        Ok(())
    }

    fn close(&self, id: u64) {
        self.inner.lock().unwrap().closed.push(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(env: &mut BridgeHost) -> BridgedBackend {
        BridgedBackend::open(env, "127.0.0.1", "9000", SocketMode::Client, &Config::default())
            .unwrap()
    }

    #[test]
    fn server_mode_is_rejected_at_open() {
        let mut env = BridgeHost::new(Arc::new(MemoryPort::default()));
        let err =
            BridgedBackend::open(&mut env, "127.0.0.1", "9000", SocketMode::Server, &Config::default())
                .unwrap_err();
        assert!(matches!(err, ErrorKind::UnsupportedOperation(_)));
    }

    #[test]
    fn connect_builds_ws_url_and_proxies() {
        let port = MemoryPort::default();
        let mut env = BridgeHost::new(Arc::new(port.clone()));
        let mut backend = client(&mut env);
        backend.connect(&Config::default()).unwrap();
        assert_eq!(port.connected(), vec![(1, "ws://127.0.0.1:9000/sock".to_owned())]);

        let mut secure = Config::default();
        secure.secure_bridge = true;
        let mut backend2 =
            BridgedBackend::open(&mut env, "example.com", "443", SocketMode::Client, &secure)
                .unwrap();
        backend2.connect(&secure).unwrap();
        assert_eq!(port.connected()[1].1, "wss://example.com:443/sock");
    }

    #[test]
    fn pushed_messages_drain_in_order_across_small_reads() {
        let mut env = BridgeHost::new(Arc::new(MemoryPort::default()));
        let mut backend = client(&mut env);
        let pusher = env.pusher(backend.id()).unwrap();

        pusher.send(BridgeEvent::Message(b"abcdef".to_vec())).unwrap();
        pusher.send(BridgeEvent::Message(b"gh".to_vec())).unwrap();

        let mut buf = [0u8; 4];
        assert!(matches!(backend.read(&mut buf), ReadOutcome::Data(4)));
        assert_eq!(&buf, b"abcd");
        assert!(matches!(backend.read(&mut buf), ReadOutcome::Data(2)));
        assert_eq!(&buf[..2], b"ef");
        assert!(matches!(backend.read(&mut buf), ReadOutcome::Data(2)));
        assert_eq!(&buf[..2], b"gh");
        assert!(matches!(backend.read(&mut buf), ReadOutcome::WouldBlock));
    }

    #[test]
    fn lifecycle_events_translate_to_outcomes() {
        let mut env = BridgeHost::new(Arc::new(MemoryPort::default()));
        let mut backend = client(&mut env);
        let pusher = env.pusher(backend.id()).unwrap();
        let mut buf = [0u8; 8];

        pusher.send(BridgeEvent::Established).unwrap();
        assert!(matches!(backend.read(&mut buf), ReadOutcome::Established));

        pusher.send(BridgeEvent::Closed).unwrap();
        assert!(matches!(backend.read(&mut buf), ReadOutcome::PeerClosed));

        pusher.send(BridgeEvent::Error("refused".into())).unwrap();
        assert!(matches!(
            backend.read(&mut buf),
            ReadOutcome::Failed(ErrorKind::Bridge(_))
        ));
    }

    #[test]
    fn close_is_proxied_once_across_shutdown_and_drop() {
        let port = MemoryPort::default();
        let mut env = BridgeHost::new(Arc::new(port.clone()));
        let mut backend = client(&mut env);
        let id = backend.id();

        backend.shutdown();
        drop(backend);
        assert_eq!(port.closed(), vec![id]);
        env.release(id);
    }
}
