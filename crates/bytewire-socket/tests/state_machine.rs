//! Lifecycle discipline tests: the `Closed` state is absorbing, and no
//! operation touches the backend handle once it is reached, on any backend.

mod support;

use bytewire_core::{
    config::Config,
    state::{SessionState, SocketMode, SocketState},
};
use bytewire_socket::Socket;
use bytewire_transport::NativeBackend;
use support::Recorder;

#[test]
fn invalid_address_closes_at_init_without_error() {
    let mut events = Recorder::new(Config::default());
    let mut socket = Socket::<NativeBackend>::new(Config::default());
    socket.init(&mut (), "999.999.0.1", "9000", SocketMode::Client);

    assert_eq!(socket.state(), SocketState::Closed);
    assert_eq!(socket.session_state(), SessionState::ServerHungup);

    // every subsequent operation is a fatal/no-op result
    assert!(socket.read(64, &mut events).is_fatal());
    assert!(socket.write(b"data", &mut events).is_fatal());
    socket.connect(&mut events);
    socket.listen();
    socket.shutdown();
    socket.accept(&mut events);
    assert_eq!(socket.state(), SocketState::Closed);
    assert_eq!(events.allocations, 0);
    assert_eq!(events.connects, 0);
}

#[test]
fn closed_socket_short_circuits_every_operation() {
    let mut events = Recorder::new(Config::default());
    let mut socket = Socket::<NativeBackend>::new(Config::default());
    socket.init(&mut (), "127.0.0.1", "0", SocketMode::Server);
    socket.close();

    socket.listen();
    assert_eq!(socket.state(), SocketState::Closed);
    socket.accept(&mut events);
    socket.connect(&mut events);
    socket.shutdown();
    assert!(socket.read(64, &mut events).is_fatal());
    assert!(socket.write(b"x", &mut events).is_fatal());

    assert_eq!(events.allocations, 0);
    assert_eq!(events.connects, 0);
    assert!(events.received.is_empty());
    assert!(events.sent.is_empty());
}

#[test]
fn accept_on_a_non_listening_socket_never_allocates() {
    let mut events = Recorder::new(Config::default());
    let mut socket = Socket::<NativeBackend>::new(Config::default());
    socket.init(&mut (), "127.0.0.1", "0", SocketMode::Client);

    // initialized but never put into listen mode
    assert_eq!(socket.state(), SocketState::None);
    socket.accept(&mut events);
    assert_eq!(events.allocations, 0);
}

#[test]
fn degenerate_io_arguments_are_fatal_noops() {
    let mut events = Recorder::new(Config::default());
    let mut socket = Socket::<NativeBackend>::new(Config::default());
    socket.init(&mut (), "127.0.0.1", "0", SocketMode::Client);

    assert!(socket.read(0, &mut events).is_fatal());
    assert!(socket.write(&[], &mut events).is_fatal());
    // degenerate arguments must not kill the socket itself
    assert_eq!(socket.state(), SocketState::None);
}

#[test]
fn accept_after_close_never_reaches_the_backend() {
    let mut events = Recorder::new(Config::default());
    let mut socket = Socket::<NativeBackend>::new(Config::default());
    socket.init(&mut (), "127.0.0.1", "0", SocketMode::Server);

    socket.listen();
    assert_eq!(socket.state(), SocketState::Accepting);
    socket.close();
    socket.accept(&mut events);
    assert_eq!(events.allocations, 0);
}

#[cfg(unix)]
mod resolved_parity {
    use super::*;
    use bytewire_transport::ResolvedBackend;

    #[test]
    fn unresolvable_host_closes_at_init_without_error() {
        let mut events = Recorder::new(Config::default());
        let mut socket = Socket::<ResolvedBackend>::new(Config::default());
        socket.init(&mut (), "no-such-host.invalid", "9000", SocketMode::Client);

        assert_eq!(socket.state(), SocketState::Closed);
        assert!(socket.read(64, &mut events).is_fatal());
        assert!(socket.write(b"data", &mut events).is_fatal());
        socket.accept(&mut events);
        assert_eq!(events.allocations, 0);
    }

    #[test]
    fn closed_socket_short_circuits_every_operation() {
        let mut events = Recorder::new(Config::default());
        let mut socket = Socket::<ResolvedBackend>::new(Config::default());
        socket.init(&mut (), "localhost", "0", SocketMode::Server);
        socket.close();

        socket.listen();
        socket.accept(&mut events);
        socket.connect(&mut events);
        socket.shutdown();
        assert!(socket.read(64, &mut events).is_fatal());
        assert!(socket.write(b"x", &mut events).is_fatal());
        assert_eq!(socket.state(), SocketState::Closed);
        assert_eq!(events.allocations, 0);
        assert_eq!(events.connects, 0);
    }
}
