//! Default native backend: direct non-blocking socket primitives.
//!
//! Address handling is deliberately manual: the address string must be a
//! literal IP (no DNS), mirroring an `inet_pton`-style construction. For
//! hostname resolution use [`crate::resolved::ResolvedBackend`].

use std::net::{IpAddr, SocketAddr};

use bytewire_core::{config::Config, error::ErrorKind, error::Result, state::SocketMode};

use crate::{
    backend::{Accepted, Backend, ConnectProgress, ReadOutcome, WriteOutcome},
    stream::{self, StreamRole},
};

/// Non-blocking TCP endpoint over the platform's socket primitives.
#[derive(Debug)]
pub struct NativeBackend {
    target: SocketAddr,
    role: Option<StreamRole>,
}

/// Parses a literal `ip:port` pair without touching DNS.
fn parse_endpoint(addr: &str, port: &str) -> Result<SocketAddr> {
    let ip: IpAddr = addr
        .parse()
        .map_err(|_| ErrorKind::InvalidAddress(format!("{addr}:{port}")))?;
    let port: u16 = port
        .parse()
        .map_err(|_| ErrorKind::InvalidAddress(format!("{addr}:{port}")))?;
    Ok(SocketAddr::new(ip, port))
}

impl Backend for NativeBackend {
    type Env = ();

    fn open(
        _env: &mut (),
        addr: &str,
        port: &str,
        mode: SocketMode,
        config: &Config,
    ) -> Result<Self> {
        let target = parse_endpoint(addr, port)?;
        let socket = stream::open_tcp(target, mode, config)?;
        Ok(Self { target, role: Some(StreamRole::Pending(socket)) })
    }

    fn listen(&mut self, config: &Config) -> Result<()> {
        stream::bind_and_listen(&mut self.role, self.target, config)
    }

    fn accept(&mut self, config: &Config) -> Result<Option<Accepted<Self>>> {
        let Some((role, peer)) = stream::accept_stream(&self.role, config)? else {
            return Ok(None);
        };
        Ok(Some(Accepted {
            backend: Self { target: peer, role: Some(role) },
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

    fn local_addr(&self) -> Option<SocketAddr> {
        stream::local_addr(&self.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_hostname_addresses() {
        let err = parse_endpoint("localhost", "9000").unwrap_err();
        assert!(matches!(err, ErrorKind::InvalidAddress(_)));
    }

    #[test]
    fn rejects_bad_ports() {
        assert!(parse_endpoint("127.0.0.1", "http").is_err());
        assert!(parse_endpoint("127.0.0.1", "70000").is_err());
    }

    #[test]
    fn accept_without_pending_connection_is_quiet() {
        let config = Config::default();
        let mut listener =
            NativeBackend::open(&mut (), "127.0.0.1", "0", SocketMode::Server, &config).unwrap();
        listener.listen(&config).unwrap();
        assert!(listener.accept(&config).unwrap().is_none());
    }

    #[test]
    fn listen_twice_is_an_error() {
        let config = Config::default();
        let mut listener =
            NativeBackend::open(&mut (), "127.0.0.1", "0", SocketMode::Server, &config).unwrap();
        listener.listen(&config).unwrap();
        assert!(matches!(
            listener.listen(&config),
            Err(ErrorKind::UnsupportedOperation(_))
        ));
    }
}
