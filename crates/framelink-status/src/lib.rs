//! The closed registry of wire status codes.
//!
//! Status codes travel between processes as 2-byte little-endian values in
//! error packet payloads, so the numbering is part of the wire protocol:
//! codes are never renumbered or removed, only appended. Lookups are pure
//! table walks over compile-time constants and never allocate.
//!
//! Codes received from a peer may come from a newer registry than this one;
//! [`StatusCode::from_wire`] maps anything unlisted to [`StatusCode::Unknown`]
//! instead of failing.

use std::fmt;

/// A wire status code.
///
/// The discriminant is the on-wire value. [`Display`](fmt::Display) renders
/// the human-readable description, and the type implements
/// [`std::error::Error`] so a status received from a peer can propagate
/// through `?` like any other failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum StatusCode {
    /// The operation completed.
    Success = 0,
    /// A failure this registry has no entry for.
    Unknown = 1,
    /// A requested element (peer name, address, port) could not be found.
    NotFound = 2,
    /// A caller-supplied argument was rejected.
    BadParameter = 3,
    /// Socket creation failed.
    SocketCreateFailed = 4,
    /// Setting a socket option failed.
    SocketConfigureFailed = 5,
    /// An address or host name did not resolve.
    UnknownAddress = 6,
    /// Binding a socket to a port failed.
    BindFailed = 7,
    /// The server host could not be looked up.
    ServerInfoUnavailable = 8,
    /// Connecting to the server failed.
    ConnectFailed = 9,
    /// Listening for incoming connections failed.
    ListenFailed = 10,
    /// Accepting a pending connection failed.
    ServiceFailed = 11,
    /// No data was available in the socket.
    NoData = 12,
    /// The peer closed the connection.
    ConnectionLost = 13,
    /// The connection failed in an unclassified way.
    ConnectionError = 14,
    /// An operation did not complete in time.
    Timeout = 15,
    /// A payload exceeded what a length prefix can describe.
    PayloadTooLarge = 16,
}

impl StatusCode {
    /// Every registered code, in wire order.
    pub const ALL: [StatusCode; 17] = [
        StatusCode::Success,
        StatusCode::Unknown,
        StatusCode::NotFound,
        StatusCode::BadParameter,
        StatusCode::SocketCreateFailed,
        StatusCode::SocketConfigureFailed,
        StatusCode::UnknownAddress,
        StatusCode::BindFailed,
        StatusCode::ServerInfoUnavailable,
        StatusCode::ConnectFailed,
        StatusCode::ListenFailed,
        StatusCode::ServiceFailed,
        StatusCode::NoData,
        StatusCode::ConnectionLost,
        StatusCode::ConnectionError,
        StatusCode::Timeout,
        StatusCode::PayloadTooLarge,
    ];

    /// Resolve a code received on the wire.
    ///
    /// Unlisted values resolve to [`StatusCode::Unknown`]; this never fails,
    /// since the peer may speak a newer registry.
    pub const fn from_wire(code: u16) -> Self {
        match code {
            0 => StatusCode::Success,
            1 => StatusCode::Unknown,
            2 => StatusCode::NotFound,
            3 => StatusCode::BadParameter,
            4 => StatusCode::SocketCreateFailed,
            5 => StatusCode::SocketConfigureFailed,
            6 => StatusCode::UnknownAddress,
            7 => StatusCode::BindFailed,
            8 => StatusCode::ServerInfoUnavailable,
            9 => StatusCode::ConnectFailed,
            10 => StatusCode::ListenFailed,
            11 => StatusCode::ServiceFailed,
            12 => StatusCode::NoData,
            13 => StatusCode::ConnectionLost,
            14 => StatusCode::ConnectionError,
            15 => StatusCode::Timeout,
            16 => StatusCode::PayloadTooLarge,
            _ => StatusCode::Unknown,
        }
    }

    /// The 2-byte value this code travels as.
    pub const fn wire_code(self) -> u16 {
        self as u16
    }

    /// The immutable symbolic name.
    pub const fn name(self) -> &'static str {
        match self {
            StatusCode::Success => "SUCCESS",
            StatusCode::Unknown => "UNKNOWN",
            StatusCode::NotFound => "NOT_FOUND",
            StatusCode::BadParameter => "BAD_PARAMETER",
            StatusCode::SocketCreateFailed => "SOCKET_CREATE_FAILED",
            StatusCode::SocketConfigureFailed => "SOCKET_CONFIGURE_FAILED",
            StatusCode::UnknownAddress => "UNKNOWN_ADDRESS",
            StatusCode::BindFailed => "BIND_FAILED",
            StatusCode::ServerInfoUnavailable => "SERVER_INFO_UNAVAILABLE",
            StatusCode::ConnectFailed => "CONNECT_FAILED",
            StatusCode::ListenFailed => "LISTEN_FAILED",
            StatusCode::ServiceFailed => "SERVICE_FAILED",
            StatusCode::NoData => "NO_DATA",
            StatusCode::ConnectionLost => "CONNECTION_LOST",
            StatusCode::ConnectionError => "CONNECTION_ERROR",
            StatusCode::Timeout => "TIMEOUT",
            StatusCode::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
        }
    }

    /// The human-readable description.
    pub const fn description(self) -> &'static str {
        match self {
            StatusCode::Success => "No error",
            StatusCode::Unknown => "Unknown error",
            StatusCode::NotFound => "Element not found",
            StatusCode::BadParameter => "Bad parameter",
            StatusCode::SocketCreateFailed => "Cannot create socket",
            StatusCode::SocketConfigureFailed => "Cannot configure socket",
            StatusCode::UnknownAddress => "Unknown address or host name",
            StatusCode::BindFailed => "Cannot bind socket to a port",
            StatusCode::ServerInfoUnavailable => "Cannot get server info",
            StatusCode::ConnectFailed => "Cannot connect to server",
            StatusCode::ListenFailed => "Cannot listen for incoming connections",
            StatusCode::ServiceFailed => "Cannot create service socket",
            StatusCode::NoData => "No data in socket",
            StatusCode::ConnectionLost => "Connection lost",
            StatusCode::ConnectionError => "Unknown connection error",
            StatusCode::Timeout => "Communication timeout",
            StatusCode::PayloadTooLarge => "Packet payload too large",
        }
    }

    /// Whether this code reports success.
    pub const fn is_success(self) -> bool {
        matches!(self, StatusCode::Success)
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

impl std::error::Error for StatusCode {}
