use std::io::ErrorKind;
use std::net::{SocketAddr, TcpListener};
use std::os::fd::{AsRawFd, RawFd};
use std::time::Duration;

use tracing::{debug, info};

use crate::connection::Connection;
use crate::error::{Result, SessionError};
use crate::socket::{open_socket, wait_ready, LISTEN_BACKLOG};

/// A listening TCP server socket.
///
/// [`install`](Self::install) binds and listens; each [`accept`](Self::accept)
/// yields one [`Connection`]. The listener itself is independent of the
/// connections it produced and may be dropped while they stay open.
#[derive(Debug)]
pub struct Listener {
    inner: TcpListener,
    local_addr: SocketAddr,
}

impl Listener {
    /// Bind to `port` and start listening.
    ///
    /// Port 0 picks an ephemeral port; read it back with
    /// [`local_port`](Self::local_port). `bind_addr` restricts the listening
    /// interface, `None` listens on all interfaces.
    pub fn install(port: u16, bind_addr: Option<&str>) -> Result<Self> {
        let (socket, local_addr) = open_socket(port, bind_addr)?;
        socket.listen(LISTEN_BACKLOG).map_err(SessionError::Listen)?;

        info!(%local_addr, "listening");

        Ok(Self {
            inner: socket.into(),
            local_addr,
        })
    }

    /// Accept one pending connection (blocking).
    ///
    /// Waits for readiness first: `Some(timeout)` fails with
    /// [`SessionError::Timeout`] if nothing arrives in time, `None` waits
    /// indefinitely. An accept interrupted before a service socket exists is
    /// [`SessionError::Service`] and may simply be retried.
    pub fn accept(&self, timeout: Option<Duration>) -> Result<Connection> {
        wait_ready(&self.inner, timeout)?;

        let (stream, peer) = match self.inner.accept() {
            Ok(pair) => pair,
            Err(e) if e.kind() == ErrorKind::Interrupted || e.kind() == ErrorKind::WouldBlock => {
                return Err(SessionError::Service(e));
            }
            Err(e) => return Err(SessionError::Connection(e)),
        };

        debug!(%peer, "accepted connection");
        Ok(Connection::from(stream))
    }

    /// The bound local address.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// The bound local port.
    pub fn local_port(&self) -> u16 {
        self.local_addr.port()
    }
}

impl AsRawFd for Listener {
    fn as_raw_fd(&self) -> RawFd {
        self.inner.as_raw_fd()
    }
}
