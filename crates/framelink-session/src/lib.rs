//! TCP session layer for framelink.
//!
//! Provides the connection lifecycle the packet codec runs over:
//! - [`Connection::connect`] for clients, [`Listener::install`] for servers
//! - [`Listener::accept`] and [`wait_ready`] with explicit timeouts
//! - Peer identity queries (host, address, ports)
//!
//! All I/O is synchronous and blocking. The layer never retries or
//! reconnects on its own; every failure surfaces to the caller with the
//! wire status code it maps to.

pub mod connection;
pub mod error;
pub mod listener;
pub mod socket;

pub use connection::Connection;
pub use error::{Result, SessionError};
pub use listener::Listener;
pub use socket::{wait_ready, LISTEN_BACKLOG};
