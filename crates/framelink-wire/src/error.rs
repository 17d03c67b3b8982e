use framelink_status::StatusCode;

/// Errors that can occur while encoding, sending, or receiving packets.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// The payload exceeds what a length prefix can describe.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// An I/O error occurred on the underlying stream.
    #[error("stream I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The peer closed the connection.
    ///
    /// This is the one routine way a conversation ends; everything else in
    /// this enum is a fault.
    #[error("connection lost")]
    ConnectionLost,
}

impl WireError {
    /// The wire status code for this failure, for reporting it to a peer in
    /// an error packet.
    pub fn code(&self) -> StatusCode {
        match self {
            WireError::PayloadTooLarge { .. } => StatusCode::PayloadTooLarge,
            WireError::Io(_) => StatusCode::ConnectionError,
            WireError::ConnectionLost => StatusCode::ConnectionLost,
        }
    }
}

pub type Result<T> = std::result::Result<T, WireError>;
