//! Error types for the SRTP protocol.
//!
//! Errors fall into two groups. Connection-level errors mean the TCP stream can
//! no longer be trusted and the [`Session`](crate::Session) is faulted; the
//! caller has to open a new one. Request-level errors only concern the read
//! that produced them and leave the session usable. Use
//! [`SrtpError::is_connection_error`] to tell them apart.

use std::io;
use std::net::SocketAddr;

use thiserror::Error;

use crate::session::SessionState;

/// Result type alias for SRTP operations.
pub type Result<T> = std::result::Result<T, SrtpError>;

/// Errors that can occur during SRTP communication.
#[derive(Debug, Error)]
pub enum SrtpError {
    /// The TCP connection to the PLC could not be established.
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        /// Address that was dialed.
        addr: SocketAddr,
        /// Underlying socket error.
        #[source]
        source: io::Error,
    },

    /// The PLC answered the handshake with an unexpected acknowledge byte.
    #[error("handshake rejected: expected ack 0x01, received 0x{received:02X}")]
    HandshakeRejected {
        /// First byte of the handshake reply.
        received: u8,
    },

    /// The PLC closed the stream.
    #[error("connection closed by PLC")]
    ConnectionClosed,

    /// No reply within the receive timeout.
    #[error("communication timeout")]
    Timeout,

    /// I/O error during communication.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The address text does not match `[%]TYPE<digits>[:<digits>]`.
    #[error("invalid register address '{input}': {reason}")]
    InvalidAddress {
        /// The rejected address text.
        input: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The reply is too short for the requested register span.
    #[error("response too short: expected at least {required} bytes, got {actual}")]
    Decode {
        /// Bytes needed to decode the status and payload.
        required: usize,
        /// Bytes actually received.
        actual: usize,
    },

    /// The operation is not allowed in the session's current state.
    #[error("cannot {operation} while session is {state}")]
    InvalidState {
        /// Operation that was attempted.
        operation: &'static str,
        /// State the session was in.
        state: SessionState,
    },

    /// The PLC reported a non-zero status for the request.
    #[error("PLC status: major 0x{major:02X}, minor 0x{minor:02X}")]
    PlcStatus {
        /// Status code (reply byte 42).
        major: u8,
        /// Minor status code (reply byte 43).
        minor: u8,
    },
}

impl SrtpError {
    /// Creates a new `InvalidAddress` error.
    ///
    /// # Example
    ///
    /// ```
    /// use ge_srtp::SrtpError;
    ///
    /// let err = SrtpError::invalid_address("X5", "unknown memory type 'X'");
    /// assert!(!err.is_connection_error());
    /// ```
    pub fn invalid_address(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidAddress {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Creates a new `Decode` error.
    pub fn decode(required: usize, actual: usize) -> Self {
        Self::Decode { required, actual }
    }

    /// Creates a new `PlcStatus` error.
    pub fn plc_status(major: u8, minor: u8) -> Self {
        Self::PlcStatus { major, minor }
    }

    /// Returns whether this error faults the session.
    ///
    /// Connection-level errors (connect failure, handshake rejection, I/O
    /// errors, timeouts, peer close) require a new [`Session`](crate::Session).
    /// Everything else can be retried on the same session.
    ///
    /// # Example
    ///
    /// ```
    /// use ge_srtp::SrtpError;
    ///
    /// assert!(SrtpError::Timeout.is_connection_error());
    /// assert!(!SrtpError::decode(48, 44).is_connection_error());
    /// ```
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            Self::Connect { .. }
                | Self::HandshakeRejected { .. }
                | Self::ConnectionClosed
                | Self::Timeout
                | Self::Io(_)
        )
    }
}

/// Maps a socket error to `Timeout` when it signals an expired read/write timeout.
pub(crate) fn map_io_error(err: io::Error) -> SrtpError {
    match err.kind() {
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => SrtpError::Timeout,
        io::ErrorKind::UnexpectedEof
        | io::ErrorKind::ConnectionReset
        | io::ErrorKind::ConnectionAborted
        | io::ErrorKind::BrokenPipe => SrtpError::ConnectionClosed,
        _ => SrtpError::Io(err),
    }
}
