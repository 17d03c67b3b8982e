use std::net::SocketAddr;
use std::time::Duration;

use framelink_status::StatusCode;

/// Errors that can occur while setting up or querying a session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// A caller-supplied argument was rejected before any I/O happened.
    #[error("bad parameter: {0}")]
    BadParameter(&'static str),

    /// The address or host name did not resolve to an IPv4 address.
    #[error("unknown address or host name: {host}")]
    UnknownAddress { host: String },

    /// The server host could not be looked up.
    #[error("cannot get server info for {host}: {source}")]
    ServerInfo {
        host: String,
        source: std::io::Error,
    },

    /// Socket creation failed.
    #[error("cannot create socket: {0}")]
    SocketCreate(std::io::Error),

    /// Setting a socket option failed.
    #[error("cannot configure socket: {0}")]
    SocketConfigure(std::io::Error),

    /// Failed to bind to the requested address.
    #[error("cannot bind to {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },

    /// Failed to start listening for incoming connections.
    #[error("cannot listen for incoming connections: {0}")]
    Listen(std::io::Error),

    /// Failed to connect to the server.
    #[error("cannot connect to {addr}: {source}")]
    Connect {
        addr: SocketAddr,
        source: std::io::Error,
    },

    /// Accepting a pending connection failed before a service socket existed.
    #[error("cannot create service socket: {0}")]
    Service(std::io::Error),

    /// The connection failed in a way the session layer cannot classify.
    #[error("connection error: {0}")]
    Connection(std::io::Error),

    /// Nothing became ready within the allowed time.
    #[error("timed out after {waited:?}")]
    Timeout { waited: Duration },

    /// A peer or local identity lookup failed.
    #[error("element not found: {0}")]
    NotFound(std::io::Error),
}

impl SessionError {
    /// The wire status code for this failure, for reporting it to a peer in
    /// an error packet.
    pub fn code(&self) -> StatusCode {
        match self {
            SessionError::BadParameter(_) => StatusCode::BadParameter,
            SessionError::UnknownAddress { .. } => StatusCode::UnknownAddress,
            SessionError::ServerInfo { .. } => StatusCode::ServerInfoUnavailable,
            SessionError::SocketCreate(_) => StatusCode::SocketCreateFailed,
            SessionError::SocketConfigure(_) => StatusCode::SocketConfigureFailed,
            SessionError::Bind { .. } => StatusCode::BindFailed,
            SessionError::Listen(_) => StatusCode::ListenFailed,
            SessionError::Connect { .. } => StatusCode::ConnectFailed,
            SessionError::Service(_) => StatusCode::ServiceFailed,
            SessionError::Connection(_) => StatusCode::ConnectionError,
            SessionError::Timeout { .. } => StatusCode::Timeout,
            SessionError::NotFound(_) => StatusCode::NotFound,
        }
    }
}

pub type Result<T> = std::result::Result<T, SessionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_variant_maps_to_its_registry_entry() {
        let io = || std::io::Error::other("probe");
        let cases = [
            (
                SessionError::BadParameter("x"),
                StatusCode::BadParameter,
            ),
            (
                SessionError::UnknownAddress {
                    host: "nowhere".into(),
                },
                StatusCode::UnknownAddress,
            ),
            (
                SessionError::ServerInfo {
                    host: "nowhere".into(),
                    source: io(),
                },
                StatusCode::ServerInfoUnavailable,
            ),
            (SessionError::SocketCreate(io()), StatusCode::SocketCreateFailed),
            (
                SessionError::SocketConfigure(io()),
                StatusCode::SocketConfigureFailed,
            ),
            (
                SessionError::Bind {
                    addr: "127.0.0.1:80".parse().unwrap(),
                    source: io(),
                },
                StatusCode::BindFailed,
            ),
            (SessionError::Listen(io()), StatusCode::ListenFailed),
            (
                SessionError::Connect {
                    addr: "127.0.0.1:80".parse().unwrap(),
                    source: io(),
                },
                StatusCode::ConnectFailed,
            ),
            (SessionError::Service(io()), StatusCode::ServiceFailed),
            (SessionError::Connection(io()), StatusCode::ConnectionError),
            (
                SessionError::Timeout {
                    waited: Duration::from_secs(1),
                },
                StatusCode::Timeout,
            ),
            (SessionError::NotFound(io()), StatusCode::NotFound),
        ];

        for (err, expected) in cases {
            assert_eq!(err.code(), expected, "{err}");
        }
    }

    #[test]
    fn test_display_includes_context() {
        let err = SessionError::Connect {
            addr: "127.0.0.1:7777".parse().unwrap(),
            source: std::io::Error::from(std::io::ErrorKind::ConnectionRefused),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("127.0.0.1:7777"), "{rendered}");
    }
}
