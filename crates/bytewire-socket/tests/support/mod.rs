//! Shared test support: an `Events` implementation that records every
//! callback invocation.

use bytewire_core::config::Config;
use bytewire_socket::{Events, Socket};
use bytewire_transport::Backend;

/// Records callback traffic so tests can assert on timing and payloads.
pub struct Recorder<B: Backend> {
    config: Config,
    pub allocations: usize,
    pub accepted: Vec<Socket<B>>,
    pub connects: usize,
    pub received: Vec<Vec<u8>>,
    pub sent: Vec<Vec<u8>>,
}

impl<B: Backend> Recorder<B> {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            allocations: 0,
            accepted: Vec::new(),
            connects: 0,
            received: Vec::new(),
            sent: Vec::new(),
        }
    }
}

impl<B: Backend> Events<B> for Recorder<B> {
    fn allocate(&mut self) -> Socket<B> {
        self.allocations += 1;
        Socket::new(self.config.clone())
    }

    fn on_accept(&mut self, _listener: &mut Socket<B>, accepted: Socket<B>) {
        self.accepted.push(accepted);
    }

    fn on_connect(&mut self, _socket: &mut Socket<B>) {
        self.connects += 1;
    }

    fn on_recv(&mut self, _socket: &mut Socket<B>, bytes: &[u8]) {
        // the view is transient; retaining it means copying
        self.received.push(bytes.to_vec());
    }

    fn on_send(&mut self, _socket: &mut Socket<B>, bytes: &[u8]) {
        self.sent.push(bytes.to_vec());
    }
}
