//! End-to-end loopback: a listener and a connecting client exchanging raw
//! bytes through the full socket entity, driven only by polling.

mod support;

use std::{
    thread,
    time::{Duration, Instant},
};

use bytewire_core::{
    config::Config,
    state::{SessionState, SocketMode, SocketState},
};
use bytewire_socket::Socket;
use bytewire_transport::{Backend, NativeBackend};
use support::Recorder;

const POLL_DEADLINE: Duration = Duration::from_secs(5);

fn ping_pong<B: Backend<Env = ()>>() {
    let config = Config::default();
    let mut events = Recorder::<B>::new(config.clone());

    let mut listener = Socket::<B>::new(config.clone());
    listener.init(&mut (), "127.0.0.1", "0", SocketMode::Server);
    listener.listen();
    assert_eq!(listener.state(), SocketState::Accepting);
    let port = listener.local_addr().expect("listener must be bound").port().to_string();

    let mut client = Socket::<B>::new(config);
    client.init(&mut (), "127.0.0.1", &port, SocketMode::Client);
    client.connect(&mut events);
    assert_eq!(client.state(), SocketState::Connected);
    assert_eq!(events.connects, 1);

    // poll the listener until it picks up the pending connection
    let deadline = Instant::now() + POLL_DEADLINE;
    while events.accepted.is_empty() {
        assert!(Instant::now() < deadline, "accept timed out");
        listener.accept(&mut events);
        thread::sleep(Duration::from_millis(1));
    }
    assert_eq!(events.allocations, 1);
    let mut peer = events.accepted.remove(0);
    assert_eq!(peer.state(), SocketState::Connected);
    assert!(peer.metrics.connected_at.is_some());

    // client -> server
    assert!(client.write(b"PING", &mut events).is_ready());
    assert_eq!(events.sent.remove(0), b"PING");
    let deadline = Instant::now() + POLL_DEADLINE;
    while events.received.is_empty() {
        assert!(Instant::now() < deadline, "server read timed out");
        assert!(!peer.read(512, &mut events).is_fatal());
        thread::sleep(Duration::from_millis(1));
    }
    assert_eq!(events.received.remove(0), b"PING");

    // server -> client
    assert!(peer.write(b"PONG", &mut events).is_ready());
    assert_eq!(events.sent.remove(0), b"PONG");
    let deadline = Instant::now() + POLL_DEADLINE;
    while events.received.is_empty() {
        assert!(Instant::now() < deadline, "client read timed out");
        assert!(!client.read(512, &mut events).is_fatal());
        thread::sleep(Duration::from_millis(1));
    }
    assert_eq!(events.received.remove(0), b"PONG");

    // orderly teardown: the client observes the peer hangup as a fatal read
    peer.shutdown();
    peer.close();
    assert_eq!(peer.state(), SocketState::Closed);
    let deadline = Instant::now() + POLL_DEADLINE;
    loop {
        assert!(Instant::now() < deadline, "hangup not observed");
        if client.read(512, &mut events).is_fatal() {
            break;
        }
        thread::sleep(Duration::from_millis(1));
    }
    assert!(client.is_closed());
    assert_eq!(client.session_state(), SessionState::ServerHungup);

    listener.close();
}

#[test]
fn native_ping_pong_round_trip() {
    ping_pong::<NativeBackend>();
}

#[cfg(unix)]
#[test]
fn resolved_ping_pong_round_trip() {
    ping_pong::<bytewire_transport::ResolvedBackend>();
}

#[test]
fn accepted_peer_reports_client_endpoint() {
    let config = Config::default();
    let mut events = Recorder::<NativeBackend>::new(config.clone());

    let mut listener = Socket::<NativeBackend>::new(config.clone());
    listener.init(&mut (), "127.0.0.1", "0", SocketMode::Server);
    listener.listen();
    let port = listener.local_addr().unwrap().port().to_string();

    let mut client = Socket::<NativeBackend>::new(config);
    client.init(&mut (), "127.0.0.1", &port, SocketMode::Client);
    client.connect(&mut events);

    let deadline = Instant::now() + POLL_DEADLINE;
    while events.accepted.is_empty() {
        assert!(Instant::now() < deadline, "accept timed out");
        listener.accept(&mut events);
        thread::sleep(Duration::from_millis(1));
    }
    let peer = events.accepted.remove(0);
    assert_eq!(peer.addr, "127.0.0.1");
    assert!(peer.port.parse::<u16>().is_ok());

    client.close();
    listener.close();
}
