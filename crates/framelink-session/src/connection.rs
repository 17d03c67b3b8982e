use std::io::{Read, Write};
use std::net::{IpAddr, Shutdown, SocketAddr, TcpStream};
use std::os::fd::{AsRawFd, RawFd};
use std::time::Duration;

use tracing::debug;

use crate::error::{Result, SessionError};
use crate::socket::{lookup_ipv4, open_socket};

/// A connected TCP session endpoint implementing `Read` and `Write`.
///
/// Created by [`Connection::connect`] on the client side or
/// [`Listener::accept`](crate::Listener::accept) on the server side. The
/// socket closes when the last clone is dropped; there is no explicit close.
/// A connection carries one strictly ordered byte stream in each direction
/// and assumes a single reader and a single writer; callers splitting the
/// directions across threads give each its own [`try_clone`](Self::try_clone).
#[derive(Debug)]
pub struct Connection {
    stream: TcpStream,
}

impl Connection {
    /// Connect to `host:port` as a client (blocking).
    ///
    /// `host` may be numeric or a name; names go through a forward lookup.
    /// The local end binds an ephemeral port.
    pub fn connect(host: &str, port: u16) -> Result<Self> {
        if host.is_empty() {
            return Err(SessionError::BadParameter("host must not be empty"));
        }

        let ip = lookup_ipv4(host).map_err(|e| SessionError::ServerInfo {
            host: host.to_string(),
            source: e,
        })?;

        let (socket, _local) = open_socket(0, None)?;
        let remote = SocketAddr::new(ip, port);
        socket
            .connect(&remote.into())
            .map_err(|e| SessionError::Connect {
                addr: remote,
                source: e,
            })?;

        debug!(%remote, "connected to server");
        Ok(Self {
            stream: socket.into(),
        })
    }

    /// The peer's host name, from a reverse lookup of its address.
    pub fn peer_host(&self) -> Result<String> {
        let addr = self.stream.peer_addr().map_err(SessionError::NotFound)?;
        dns_lookup::lookup_addr(&addr.ip()).map_err(SessionError::NotFound)
    }

    /// The peer's IP address.
    pub fn peer_ip(&self) -> Result<IpAddr> {
        self.stream
            .peer_addr()
            .map(|addr| addr.ip())
            .map_err(SessionError::NotFound)
    }

    /// The peer's TCP port.
    pub fn peer_port(&self) -> Result<u16> {
        self.stream
            .peer_addr()
            .map(|addr| addr.port())
            .map_err(SessionError::NotFound)
    }

    /// The local TCP port of this end.
    pub fn local_port(&self) -> Result<u16> {
        self.stream
            .local_addr()
            .map(|addr| addr.port())
            .map_err(SessionError::NotFound)
    }

    /// Set the socket read timeout (`None` blocks indefinitely).
    ///
    /// An expired timeout surfaces from reads as a `WouldBlock`/`TimedOut`
    /// I/O error.
    pub fn set_read_timeout(&self, timeout: Option<Duration>) -> Result<()> {
        self.stream
            .set_read_timeout(timeout)
            .map_err(SessionError::SocketConfigure)
    }

    /// Set the socket write timeout (`None` blocks indefinitely).
    pub fn set_write_timeout(&self, timeout: Option<Duration>) -> Result<()> {
        self.stream
            .set_write_timeout(timeout)
            .map_err(SessionError::SocketConfigure)
    }

    /// Clone this connection (creates a new file descriptor for the same
    /// socket).
    pub fn try_clone(&self) -> Result<Self> {
        let stream = self.stream.try_clone().map_err(SessionError::SocketCreate)?;
        Ok(Self { stream })
    }

    /// Shut down both directions, unblocking a reader on another thread.
    ///
    /// Best-effort cancellation: the blocked side observes an orderly close.
    pub fn shutdown(&self) -> Result<()> {
        self.stream
            .shutdown(Shutdown::Both)
            .map_err(SessionError::Connection)
    }
}

impl Read for Connection {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.stream.read(buf)
    }
}

impl Write for Connection {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.stream.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.stream.flush()
    }
}

impl AsRawFd for Connection {
    fn as_raw_fd(&self) -> RawFd {
        self.stream.as_raw_fd()
    }
}

/// Adopt an already-connected stream, e.g. one accepted elsewhere.
impl From<TcpStream> for Connection {
    fn from(stream: TcpStream) -> Self {
        Self { stream }
    }
}

#[cfg(test)]
mod tests {
    use std::net::{Ipv4Addr, TcpListener};

    use super::*;

    #[test]
    fn test_connect_empty_host_rejected() {
        let err = Connection::connect("", 80).unwrap_err();
        assert!(matches!(err, SessionError::BadParameter(_)));
    }

    #[test]
    fn test_connect_refused_maps_to_connect_error() {
        // A bound but never-listening socket reserves the port and refuses,
        // with no window for another test to grab it.
        let (_socket, bound) = crate::socket::open_socket(0, Some("127.0.0.1")).unwrap();

        let err = Connection::connect("127.0.0.1", bound.port()).unwrap_err();
        assert!(matches!(err, SessionError::Connect { .. }));
    }

    #[test]
    fn test_connect_succeeds_against_unaccepted_backlog() {
        // A listener that never accepts still completes handshakes from its
        // backlog; connect must not hang waiting for the accept.
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let conn = Connection::connect("127.0.0.1", port).unwrap();
        assert_eq!(conn.peer_port().unwrap(), port);
    }

    #[test]
    fn test_connect_and_exchange() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let client = std::thread::spawn(move || {
            let mut conn = Connection::connect("127.0.0.1", port).unwrap();
            conn.write_all(b"hello").unwrap();
            let mut reply = [0u8; 2];
            conn.read_exact(&mut reply).unwrap();
            assert_eq!(&reply, b"ok");
        });

        let (stream, _addr) = listener.accept().unwrap();
        let mut server = Connection::from(stream);
        let mut buf = [0u8; 5];
        server.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"hello");
        server.write_all(b"ok").unwrap();

        client.join().unwrap();
    }

    #[test]
    fn test_metadata_matches_counterpart() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let client = std::thread::spawn(move || {
            let mut conn = Connection::connect("127.0.0.1", port).unwrap();
            let ports = (conn.local_port().unwrap(), conn.peer_port().unwrap());
            // Hold the connection open until the server has queried it.
            let mut sync = [0u8; 1];
            conn.read_exact(&mut sync).unwrap();
            ports
        });

        let (stream, _addr) = listener.accept().unwrap();
        let mut server = Connection::from(stream);

        assert_eq!(server.local_port().unwrap(), port);
        assert_eq!(server.peer_ip().unwrap(), IpAddr::V4(Ipv4Addr::LOCALHOST));

        let server_view = (server.peer_port().unwrap(), server.local_port().unwrap());
        server.write_all(b"x").unwrap();
        let client_view = client.join().unwrap();

        assert_eq!(server_view, client_view);
    }

    #[test]
    fn test_peer_host_resolves_loopback() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let client = std::thread::spawn(move || {
            let mut conn = Connection::connect("127.0.0.1", port).unwrap();
            let mut sync = [0u8; 1];
            conn.read_exact(&mut sync).unwrap();
        });

        let (stream, _addr) = listener.accept().unwrap();
        let mut server = Connection::from(stream);
        let host = server.peer_host().unwrap();
        assert!(!host.is_empty());

        server.write_all(b"x").unwrap();
        client.join().unwrap();
    }

    #[test]
    fn test_shutdown_unblocks_reader() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let client = std::thread::spawn(move || {
            let conn = Connection::connect("127.0.0.1", port).unwrap();
            let mut reader = conn.try_clone().unwrap();
            let blocked = std::thread::spawn(move || {
                let mut buf = [0u8; 1];
                reader.read(&mut buf)
            });
            std::thread::sleep(Duration::from_millis(50));
            conn.shutdown().unwrap();
            let read = blocked.join().unwrap().unwrap();
            assert_eq!(read, 0, "shutdown should read as orderly close");
        });

        let (_stream, _addr) = listener.accept().unwrap();
        client.join().unwrap();
    }
}
