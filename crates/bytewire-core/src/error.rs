use std::{fmt, io};

/// Wrapped result type for transport errors.
pub type Result<T> = std::result::Result<T, ErrorKind>;

/// Errors surfaced at the backend seam.
///
/// The socket layer converts these into state transitions plus tri-state
/// return codes; there is no process-wide error channel. Every failure is
/// local to one socket.
#[derive(Debug)]
pub enum ErrorKind {
    /// An I/O failure from the underlying socket primitive.
    Io(io::Error),
    /// The address string is not a literal IP address or the port is invalid.
    InvalidAddress(String),
    /// The host/port pair could not be resolved to any endpoint.
    AddressResolution(String),
    /// The bridge host reported a connection failure.
    Bridge(String),
    /// The bridge host dropped its end of the event channel.
    BridgeUnavailable,
    /// The operation is not supported in the endpoint's current role.
    UnsupportedOperation(&'static str),
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Io(e) => write!(f, "io error: {e}"),
            ErrorKind::InvalidAddress(addr) => {
                write!(f, "invalid address or address not supported: {addr}")
            }
            ErrorKind::AddressResolution(what) => {
                write!(f, "address resolution failed for {what}")
            }
            ErrorKind::Bridge(msg) => write!(f, "bridge host reported failure: {msg}"),
            ErrorKind::BridgeUnavailable => {
                write!(f, "bridge host dropped its end of the event channel")
            }
            ErrorKind::UnsupportedOperation(op) => write!(f, "unsupported operation: {op}"),
        }
    }
}

impl std::error::Error for ErrorKind {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ErrorKind::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ErrorKind {
    fn from(inner: io::Error) -> Self {
        ErrorKind::Io(inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_context() {
        let err = ErrorKind::InvalidAddress("999.0.0.1:x".into());
        assert!(err.to_string().contains("999.0.0.1:x"));

        let err = ErrorKind::from(io::Error::new(io::ErrorKind::Other, "boom"));
        assert!(err.to_string().contains("boom"));
    }
}
