//! Framed packet messaging over plain TCP sessions.
//!
//! framelink lets heterogeneous client/server processes exchange discrete,
//! typed messages over an ordinary TCP byte stream. It is three small
//! layers:
//!
//! - [`session`] — connection lifecycle: connect, install/listen, accept
//!   with timeouts, peer identity
//! - [`wire`] — length-prefixed packet framing with exact-I/O discipline
//! - [`status`] — the closed registry of wire status codes
//!
//! All I/O is synchronous and blocking; callers wanting concurrency spawn
//! threads and give each its own connection (or clone).
//!
//! # Example
//!
//! ```no_run
//! use framelink::session::{Connection, Listener};
//! use framelink::wire::{PacketReader, PacketWriter};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Server side
//! let listener = Listener::install(4711, None)?;
//! let server = listener.accept(None)?;
//! let mut requests = PacketReader::new(server.try_clone()?);
//! let mut replies = PacketWriter::new(server);
//!
//! let request = requests.recv()?.into_packet();
//! replies.send_bytes(request.tag, &request.payload)?;
//!
//! // Client side (in another process)
//! let conn = Connection::connect("server.example", 4711)?;
//! let mut writer = PacketWriter::new(conn.try_clone()?);
//! let mut reader = PacketReader::new(conn);
//! writer.send_bytes(1, b"hello")?;
//! let reply = reader.recv()?.into_packet();
//! # Ok(())
//! # }
//! ```

/// Re-export session types.
pub mod session {
    pub use framelink_session::*;
}

/// Re-export status types.
pub mod status {
    pub use framelink_status::*;
}

/// Re-export wire types.
pub mod wire {
    pub use framelink_wire::*;
}
