//! Shared TCP plumbing for the native backends.
//!
//! Both native backends funnel through the same role machine: an endpoint
//! starts `Pending` (created but unbound), then becomes either `Listening`
//! or `Connected`. All handles are non-blocking from birth.

use std::{
    io::{self, Read, Write},
    net::{Shutdown, SocketAddr, TcpListener, TcpStream},
};

use bytewire_core::{config::Config, error::ErrorKind, error::Result, state::SocketMode};
use socket2::{Domain, Protocol, SockAddr, Socket as RawSocket, SockRef, Type};

use crate::backend::{ConnectProgress, ReadOutcome, WriteOutcome};

/// What the underlying OS handle currently is.
#[derive(Debug)]
pub(crate) enum StreamRole {
    /// Created and configured, not yet bound or connected.
    Pending(RawSocket),
    /// Bound and listening.
    Listening(TcpListener),
    /// Connected (or connecting in the background) stream.
    Connected(TcpStream),
}

/// Applies configured socket options. System defaults stay untouched.
fn apply_options(socket: &RawSocket, config: &Config) -> io::Result<()> {
    if let Some(size) = config.socket_recv_buffer_size {
        socket.set_recv_buffer_size(size)?;
    }
    if let Some(size) = config.socket_send_buffer_size {
        socket.set_send_buffer_size(size)?;
    }
    if let Some(ttl) = config.socket_ttl {
        socket.set_ttl(ttl)?;
    }
    Ok(())
}

/// Creates a raw TCP socket for `target`'s address family: non-blocking,
/// send-coalescing disabled, options applied.
pub(crate) fn open_tcp(target: SocketAddr, mode: SocketMode, config: &Config) -> Result<RawSocket> {
    let socket = RawSocket::new(Domain::for_address(target), Type::STREAM, Some(Protocol::TCP))?;
    socket.set_nonblocking(true)?;
    socket.set_nodelay(config.nodelay)?;
    apply_options(&socket, config)?;
    if matches!(mode, SocketMode::Server) {
        // lets a rebooted listener rebind without waiting out TIME_WAIT
        socket.set_reuse_address(true)?;
    }
    Ok(socket)
}

/// Binds `target` and begins listening. The endpoint must still be pending.
pub(crate) fn bind_and_listen(
    role: &mut Option<StreamRole>,
    target: SocketAddr,
    config: &Config,
) -> Result<()> {
    match role.take() {
        Some(StreamRole::Pending(socket)) => {
            socket.bind(&SockAddr::from(target))?;
            socket.listen(config.backlog as i32)?;
            *role = Some(StreamRole::Listening(socket.into()));
            Ok(())
        }
        other => {
            *role = other;
            Err(ErrorKind::UnsupportedOperation("listen requires an unbound endpoint"))
        }
    }
}

/// Accepts one pending connection, fully configuring the peer stream.
///
/// `Ok(None)` when nothing is pending.
pub(crate) fn accept_stream(
    role: &Option<StreamRole>,
    config: &Config,
) -> Result<Option<(StreamRole, SocketAddr)>> {
    let Some(StreamRole::Listening(listener)) = role else {
        return Err(ErrorKind::UnsupportedOperation("accept requires a listening endpoint"));
    };
    match listener.accept() {
        Ok((stream, peer)) => {
            stream.set_nonblocking(true)?;
            stream.set_nodelay(config.nodelay)?;
            apply_options(&SockRef::from(&stream), config)?;
            Ok(Some((StreamRole::Connected(stream), peer)))
        }
        Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// True when a non-blocking connect reports "still in progress".
fn connect_in_progress(err: &io::Error) -> bool {
    if err.kind() == io::ErrorKind::WouldBlock {
        return true;
    }
    #[cfg(unix)]
    if err.raw_os_error() == Some(libc::EINPROGRESS) {
        return true;
    }
    false
}

/// Issues a non-blocking connect toward `target`. The endpoint must still be
/// pending; it becomes a `Connected` stream whether the connect completed or
/// is still in flight.
pub(crate) fn start_connect(
    role: &mut Option<StreamRole>,
    target: SocketAddr,
) -> Result<ConnectProgress> {
    match role.take() {
        Some(StreamRole::Pending(socket)) => {
            let progress = match socket.connect(&SockAddr::from(target)) {
                Ok(()) => ConnectProgress::Complete,
                Err(ref e) if connect_in_progress(e) => ConnectProgress::InProgress,
                Err(e) => return Err(e.into()),
            };
            *role = Some(StreamRole::Connected(socket.into()));
            Ok(progress)
        }
        other => {
            *role = other;
            Err(ErrorKind::UnsupportedOperation("connect requires an unbound endpoint"))
        }
    }
}

pub(crate) fn read_stream(role: &mut Option<StreamRole>, buf: &mut [u8]) -> ReadOutcome {
    let Some(StreamRole::Connected(stream)) = role else {
        return ReadOutcome::Failed(ErrorKind::UnsupportedOperation(
            "read requires a connected endpoint",
        ));
    };
    match stream.read(buf) {
        // remote side sent FIN and the OS is waiting on us to close
        Ok(0) => ReadOutcome::PeerClosed,
        Ok(n) => ReadOutcome::Data(n),
        Err(ref e)
            if e.kind() == io::ErrorKind::WouldBlock || e.kind() == io::ErrorKind::Interrupted =>
        {
            ReadOutcome::WouldBlock
        }
        Err(e) => ReadOutcome::Failed(e.into()),
    }
}

pub(crate) fn write_stream(role: &mut Option<StreamRole>, buf: &[u8]) -> WriteOutcome {
    let Some(StreamRole::Connected(stream)) = role else {
        return WriteOutcome::Failed(ErrorKind::UnsupportedOperation(
            "write requires a connected endpoint",
        ));
    };
    match stream.write(buf) {
        Ok(n) => WriteOutcome::Accepted(n),
        Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => WriteOutcome::WouldBlock,
        Err(e) => WriteOutcome::Failed(e.into()),
    }
}

pub(crate) fn shutdown_stream(role: &mut Option<StreamRole>) {
    if let Some(StreamRole::Connected(stream)) = role {
        if let Err(e) = stream.shutdown(Shutdown::Both) {
            tracing::debug!(error = %e, "stream shutdown failed");
        }
    }
}

pub(crate) fn local_addr(role: &Option<StreamRole>) -> Option<SocketAddr> {
    match role {
        Some(StreamRole::Pending(socket)) => socket.local_addr().ok()?.as_socket(),
        Some(StreamRole::Listening(listener)) => listener.local_addr().ok(),
        Some(StreamRole::Connected(stream)) => stream.local_addr().ok(),
        None => None,
    }
}
