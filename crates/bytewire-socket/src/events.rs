use bytewire_transport::Backend;

use crate::socket::Socket;

/// The five-slot callback contract the socket entity drives.
///
/// An implementation is passed by reference into every socket operation and
/// invoked synchronously (and reentrantly) from inside it; there is no
/// internal event loop. Set up once before first use.
///
/// The embedder owns every socket's storage: `allocate` produces it and
/// `on_accept` hands it back; the core only ever tears down the backend
/// handle, never the socket value.
pub trait Events<B: Backend> {
    /// Produces storage for a new connection socket.
    fn allocate(&mut self) -> Socket<B>;

    /// A listener accepted and fully configured a peer. Ownership of the
    /// accepted socket passes to the embedder.
    fn on_accept(&mut self, listener: &mut Socket<B>, accepted: Socket<B>);

    /// An outbound connect call returned (success or async-in-progress).
    fn on_connect(&mut self, socket: &mut Socket<B>);

    /// Inbound bytes arrived. `bytes` is a transient read-only view, valid
    /// only for the duration of this call; copy anything to retain.
    fn on_recv(&mut self, socket: &mut Socket<B>, bytes: &[u8]);

    /// An outbound write was accepted. `bytes` is the prefix the OS actually
    /// took, which may be shorter than what was passed to `write`.
    fn on_send(&mut self, socket: &mut Socket<B>, bytes: &[u8]);
}
