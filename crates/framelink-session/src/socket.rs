use std::io::ErrorKind;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::os::fd::AsRawFd;
use std::time::Duration;

use socket2::{Domain, Protocol, Socket, Type};

use crate::error::{Result, SessionError};

/// Queue depth handed to `listen(2)`.
pub const LISTEN_BACKLOG: i32 = 10;

/// Resolve a host string to an IPv4 address.
///
/// Numeric addresses are parsed directly and never touch the resolver;
/// anything else goes through a forward name lookup.
pub(crate) fn lookup_ipv4(host: &str) -> std::io::Result<IpAddr> {
    if let Ok(ip) = host.parse::<IpAddr>() {
        return Ok(ip);
    }
    dns_lookup::lookup_host(host)?
        .into_iter()
        .find(IpAddr::is_ipv4)
        .ok_or_else(|| std::io::Error::new(ErrorKind::NotFound, "no IPv4 address for host"))
}

/// Create, configure, and bind an IPv4 TCP socket.
///
/// Servers pass their fixed `port`; clients pass 0 for an ephemeral one.
/// Address reuse is enabled only for servers, so a restarting listener can
/// rebind its port while ephemeral client ports are never shared. Lingering
/// close is disabled in both roles. `bind_addr` restricts the socket to one
/// interface; `None` binds to all.
///
/// Returns the socket together with the address actually bound, which
/// carries the assigned port when `port` was 0.
pub(crate) fn open_socket(port: u16, bind_addr: Option<&str>) -> Result<(Socket, SocketAddr)> {
    let socket = Socket::new(Domain::IPV4, Type::STREAM, Some(Protocol::TCP))
        .map_err(SessionError::SocketCreate)?;

    if port != 0 {
        socket
            .set_reuse_address(true)
            .map_err(SessionError::SocketConfigure)?;
    }
    socket
        .set_linger(None)
        .map_err(SessionError::SocketConfigure)?;

    let ip = match bind_addr {
        Some(addr) => lookup_ipv4(addr).map_err(|_| SessionError::UnknownAddress {
            host: addr.to_string(),
        })?,
        None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
    };

    let requested = SocketAddr::new(ip, port);
    socket
        .bind(&requested.into())
        .map_err(|e| SessionError::Bind {
            addr: requested,
            source: e,
        })?;

    let bound = socket
        .local_addr()
        .map_err(SessionError::NotFound)?
        .as_socket()
        .ok_or_else(|| {
            SessionError::NotFound(std::io::Error::other("bound address is not an inet address"))
        })?;

    Ok((socket, bound))
}

/// Block until `target` is readable.
///
/// `None` waits indefinitely. `Some(Duration::ZERO)` is an instant probe;
/// any other sub-millisecond wait rounds up to one millisecond so it never
/// degrades into that probe. Expiry fails with [`SessionError::Timeout`].
pub fn wait_ready<T: AsRawFd>(target: &T, timeout: Option<Duration>) -> Result<()> {
    let millis = match timeout {
        None => -1,
        Some(d) if d.is_zero() => 0,
        Some(d) => i32::try_from(d.as_millis().max(1)).unwrap_or(i32::MAX),
    };

    let mut fds = libc::pollfd {
        fd: target.as_raw_fd(),
        events: libc::POLLIN,
        revents: 0,
    };

    // SAFETY: `fds` is a valid pollfd for the duration of the call, and the
    // descriptor is owned by `target`, which outlives it.
    let rc = unsafe { libc::poll(&mut fds, 1, millis) };

    if rc < 0 {
        return Err(SessionError::Connection(std::io::Error::last_os_error()));
    }
    if rc == 0 {
        return Err(SessionError::Timeout {
            waited: timeout.unwrap_or_default(),
        });
    }
    if fds.revents & (libc::POLLERR | libc::POLLNVAL) != 0 {
        return Err(SessionError::Connection(std::io::Error::other(
            "socket in error state",
        )));
    }
    Ok(())
}
