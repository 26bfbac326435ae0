//! Alternate native backend with explicit address resolution.
//!
//! Differs from [`crate::NativeBackend`] in two ways: the host/port pair is
//! resolved into a structured endpoint list up front (so hostnames work),
//! and accept is gated on an explicit zero-timeout poll readiness query
//! before the accept call is attempted.

use std::{
    net::{SocketAddr, TcpListener, ToSocketAddrs},
    os::fd::AsRawFd,
};

use bytewire_core::{config::Config, error::ErrorKind, error::Result, state::SocketMode};

use crate::{
    backend::{Accepted, Backend, ConnectProgress, ReadOutcome, WriteOutcome},
    stream::{self, StreamRole},
};

/// Non-blocking TCP endpoint with up-front host/port resolution.
#[derive(Debug)]
pub struct ResolvedBackend {
    /// Resolved endpoint candidates; `free` releases them.
    candidates: Vec<SocketAddr>,
    target: SocketAddr,
    role: Option<StreamRole>,
}

/// Zero-timeout readiness query: is there a pending inbound connection?
fn accept_ready(listener: &TcpListener) -> bool {
    let mut pollfd =
        libc::pollfd { fd: listener.as_raw_fd(), events: libc::POLLIN, revents: 0 };
    // zero timeout keeps the query non-blocking
    let r = unsafe { libc::poll(&mut pollfd, 1, 0) };
    r > 0 && pollfd.revents & libc::POLLIN != 0
}

impl Backend for ResolvedBackend {
    type Env = ();

    fn open(
        _env: &mut (),
        addr: &str,
        port: &str,
        mode: SocketMode,
        config: &Config,
    ) -> Result<Self> {
        let port: u16 = port
            .parse()
            .map_err(|_| ErrorKind::InvalidAddress(format!("{addr}:{port}")))?;
        let candidates: Vec<SocketAddr> = (addr, port)
            .to_socket_addrs()
            .map_err(|_| ErrorKind::AddressResolution(format!("{addr}:{port}")))?
            .collect();
        let Some(target) = candidates.first().copied() else {
            return Err(ErrorKind::AddressResolution(format!("{addr}:{port}")));
        };
        let socket = stream::open_tcp(target, mode, config)?;
        Ok(Self { candidates, target, role: Some(StreamRole::Pending(socket)) })
    }

    fn listen(&mut self, config: &Config) -> Result<()> {
        stream::bind_and_listen(&mut self.role, self.target, config)
    }

    fn accept(&mut self, config: &Config) -> Result<Option<Accepted<Self>>> {
        // readiness gate first; only then attempt the accept itself
        if let Some(StreamRole::Listening(listener)) = &self.role {
            if !accept_ready(listener) {
                return Ok(None);
            }
        }
        let Some((role, peer)) = stream::accept_stream(&self.role, config)? else {
            return Ok(None);
        };
        Ok(Some(Accepted {
            backend: Self { candidates: Vec::new(), target: peer, role: Some(role) },
            addr: peer.ip().to_string(),
            port: peer.port().to_string(),
        }))
    }

    fn connect(&mut self, _config: &Config) -> Result<ConnectProgress> {
        stream::start_connect(&mut self.role, self.target)
    }

    fn read(&mut self, buf: &mut [u8]) -> ReadOutcome {
        stream::read_stream(&mut self.role, buf)
    }

    fn write(&mut self, buf: &[u8]) -> WriteOutcome {
        stream::write_stream(&mut self.role, buf)
    }

    fn shutdown(&mut self) {
        stream::shutdown_stream(&mut self.role);
    }

    fn free(&mut self) {
        self.candidates.clear();
        self.candidates.shrink_to_fit();
    }

    fn local_addr(&self) -> Option<SocketAddr> {
        stream::local_addr(&self.role)
    }
}

impl ResolvedBackend {
    /// Endpoints the host/port pair resolved to.
    pub fn candidates(&self) -> &[SocketAddr] {
        &self.candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_hostnames() {
        let config = Config::default();
        let backend =
            ResolvedBackend::open(&mut (), "localhost", "9000", SocketMode::Client, &config)
                .unwrap();
        assert!(!backend.candidates().is_empty());
        assert_eq!(backend.candidates()[0].port(), 9000);
    }

    #[test]
    fn unresolvable_hosts_fail_resolution() {
        let config = Config::default();
        let err = ResolvedBackend::open(
            &mut (),
            "no-such-host.invalid",
            "9000",
            SocketMode::Client,
            &config,
        )
        .unwrap_err();
        assert!(matches!(err, ErrorKind::AddressResolution(_)));
    }

    #[test]
    fn readiness_gate_reports_idle_listener() {
        let config = Config::default();
        let mut listener =
            ResolvedBackend::open(&mut (), "127.0.0.1", "0", SocketMode::Server, &config).unwrap();
        listener.listen(&config).unwrap();
        assert!(listener.accept(&config).unwrap().is_none());
    }
}
