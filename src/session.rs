//! SRTP session: one connection to one PLC.
//!
//! A [`Session`] owns its transport and an explicit connection state:
//!
//! ```text
//! Disconnected ──connect──▶ Connecting ──▶ Handshaking ──▶ Ready
//!                                                          │
//!                        any state ──close──▶ Closed       │
//!     Connecting/Handshaking/Ready ──connection error──▶ Faulted
//! ```
//!
//! `Closed` and `Faulted` are terminal; open a new session to reconnect.
//!
//! # Fault policy
//!
//! Only connection-level failures fault the session: socket errors, the peer
//! closing the stream, handshake rejection and timeouts. A bad address is
//! reported to the caller and the session stays `Ready`, so the caller can
//! retry with a corrected address. This deliberately differs from treating
//! every failure as fatal.
//!
//! Every exchange waits for the full reply length it needs (56 bytes for the
//! handshake, `44 + 2·count` for a read), across as many TCP segments as it
//! takes. A reply that stays short until [`RECEIVE_TIMEOUT`] is a timeout and
//! faults the session: SRTP replies carry no request identifier, so the
//! missing bytes could otherwise arrive later and be read as the answer to the
//! next request.
//!
//! # Example
//!
//! ```no_run
//! use ge_srtp::{Session, SessionConfig};
//! use std::net::Ipv4Addr;
//!
//! let mut session = Session::open(SessionConfig::new(Ipv4Addr::new(192, 168, 0, 10)))?;
//!
//! let result = session.read_register("R20000:2")?;
//! println!("status 0x{:02X}, value {}", result.status_code, result.register_value);
//!
//! session.close();
//! # Ok::<(), ge_srtp::SrtpError>(())
//! ```
//!
//! # Thread Safety
//!
//! Reads take `&mut self`, so one session serves one request at a time. Drive
//! several PLCs concurrently by giving each thread its own session.

use std::net::{IpAddr, SocketAddr};

use tracing::{debug, trace};

use crate::address::RegisterAddress;
use crate::error::{Result, SrtpError};
use crate::messages::{DEFAULT_SRTP_PORT, FRAME_SIZE, INIT_ACK, INIT_MSG, RECEIVE_TIMEOUT};
use crate::request::RequestFrame;
use crate::response::{required_reply_len, DecodedResult};
use crate::transport::{TcpTransport, Transport};

/// Configuration for creating a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// PLC socket address.
    pub plc_addr: SocketAddr,
}

impl SessionConfig {
    /// Creates a configuration for the PLC at `plc_ip` on port 18245.
    ///
    /// # Example
    ///
    /// ```
    /// use ge_srtp::SessionConfig;
    /// use std::net::Ipv4Addr;
    ///
    /// let config = SessionConfig::new(Ipv4Addr::new(192, 168, 0, 10));
    /// assert_eq!(config.plc_addr.port(), 18245);
    /// ```
    pub fn new(plc_ip: impl Into<IpAddr>) -> Self {
        Self {
            plc_addr: SocketAddr::new(plc_ip.into(), DEFAULT_SRTP_PORT),
        }
    }

    /// Sets a custom PLC port (default is 18245).
    ///
    /// # Example
    ///
    /// ```
    /// use ge_srtp::SessionConfig;
    /// use std::net::Ipv4Addr;
    ///
    /// let config = SessionConfig::new(Ipv4Addr::LOCALHOST).with_port(28245);
    /// assert_eq!(config.plc_addr.port(), 28245);
    /// ```
    pub fn with_port(mut self, port: u16) -> Self {
        self.plc_addr.set_port(port);
        self
    }
}

impl From<SocketAddr> for SessionConfig {
    fn from(plc_addr: SocketAddr) -> Self {
        Self { plc_addr }
    }
}

/// Connection state of a [`Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// Created, no connection attempted yet.
    Disconnected,
    /// Transport being opened, or opened and awaiting the handshake.
    Connecting,
    /// Handshake sent, waiting for the acknowledge.
    Handshaking,
    /// Handshake accepted; reads are allowed.
    Ready,
    /// Closed by the caller.
    Closed,
    /// Abandoned after a connection-level error.
    Faulted,
}

impl SessionState {
    /// Returns whether the session can never be used again.
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionState::Closed | SessionState::Faulted)
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SessionState::Disconnected => "disconnected",
            SessionState::Connecting => "connecting",
            SessionState::Handshaking => "handshaking",
            SessionState::Ready => "ready",
            SessionState::Closed => "closed",
            SessionState::Faulted => "faulted",
        };
        f.write_str(name)
    }
}

/// Opens a session to the PLC at `ip` on the default port and performs the handshake.
///
/// # Errors
///
/// Returns a connection-level error if the connect or handshake fails.
///
/// # Example
///
/// ```no_run
/// use std::net::Ipv4Addr;
///
/// let mut session = ge_srtp::connect(Ipv4Addr::new(192, 168, 0, 10))?;
/// let value = session.read_register("%R5")?;
/// # Ok::<(), ge_srtp::SrtpError>(())
/// ```
pub fn connect(ip: impl Into<IpAddr>) -> Result<Session> {
    Session::open(SessionConfig::new(ip))
}

/// SRTP session with one PLC.
///
/// A session moves through the [`SessionState`]s and is never reused once
/// `Closed` or `Faulted`. Errors for which
/// [`SrtpError::is_connection_error`] returns true fault the session;
/// `InvalidAddress` errors leave it `Ready` so the read can be retried. A
/// reply that never reaches its full length surfaces as `Timeout` and faults
/// the session. Treating per-request failures as non-fatal is an intentional
/// change from abandoning the connection on any error.
pub struct Session<T = TcpTransport> {
    config: SessionConfig,
    state: SessionState,
    transport: Option<T>,
}

impl Session<TcpTransport> {
    /// Creates a disconnected session. Call [`connect`](Self::connect) next.
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            state: SessionState::Disconnected,
            transport: None,
        }
    }

    /// Creates a session and connects it.
    ///
    /// # Errors
    ///
    /// Returns a connection-level error if the connect or handshake fails.
    pub fn open(config: SessionConfig) -> Result<Self> {
        let mut session = Self::new(config);
        session.connect()?;
        Ok(session)
    }

    /// Opens the TCP connection and performs the handshake.
    ///
    /// Waits at most [`RECEIVE_TIMEOUT`] for the connect and for the handshake
    /// reply. There is no retry; on failure the session is `Faulted`.
    ///
    /// # Errors
    ///
    /// - `SrtpError::InvalidState` if the session is not `Disconnected`
    /// - `SrtpError::Connect` if the TCP connection fails
    /// - `SrtpError::HandshakeRejected` if the ack byte is not `0x01`
    /// - `SrtpError::Timeout` if no handshake reply arrives in time
    pub fn connect(&mut self) -> Result<()> {
        self.expect_state(SessionState::Disconnected, "connect")?;
        self.state = SessionState::Connecting;
        debug!(plc = %self.config.plc_addr, "connecting");

        match TcpTransport::connect(self.config.plc_addr, RECEIVE_TIMEOUT) {
            Ok(transport) => self.transport = Some(transport),
            Err(err) => return Err(self.fault(err)),
        }
        self.handshake()
    }
}

impl<T: Transport> Session<T> {
    /// Creates a session over an already established transport.
    ///
    /// The session starts in `Connecting`; call [`handshake`](Self::handshake)
    /// before reading.
    ///
    /// # Arguments
    ///
    /// * `config` - PLC address the transport is connected to
    /// * `transport` - Open byte transport; the session takes ownership
    ///
    /// # Example
    ///
    /// ```no_run
    /// use ge_srtp::{Session, SessionConfig, TcpTransport, RECEIVE_TIMEOUT};
    /// use std::net::Ipv4Addr;
    ///
    /// let config = SessionConfig::new(Ipv4Addr::new(192, 168, 0, 10));
    /// let transport = TcpTransport::connect(config.plc_addr, RECEIVE_TIMEOUT)?;
    /// let mut session = Session::with_transport(config, transport);
    /// session.handshake()?;
    /// # Ok::<(), ge_srtp::SrtpError>(())
    /// ```
    pub fn with_transport(config: SessionConfig, transport: T) -> Self {
        Self {
            config,
            state: SessionState::Connecting,
            transport: Some(transport),
        }
    }

    /// Sends the 56-byte init message and validates the PLC's acknowledge.
    ///
    /// # Errors
    ///
    /// - `SrtpError::InvalidState` if the session is not `Connecting`
    /// - `SrtpError::HandshakeRejected` if the reply's first byte is not `0x01`
    /// - `SrtpError::ConnectionClosed` if the reply is empty
    /// - `SrtpError::Timeout` or `SrtpError::Io` on transport failure
    pub fn handshake(&mut self) -> Result<()> {
        self.expect_state(SessionState::Connecting, "handshake")?;
        self.state = SessionState::Handshaking;

        let reply = match self.exchange(&INIT_MSG, FRAME_SIZE) {
            Ok(reply) => reply,
            Err(err) => return Err(self.fault(err)),
        };
        match reply.first() {
            Some(&INIT_ACK) => {
                self.state = SessionState::Ready;
                debug!(plc = %self.config.plc_addr, "handshake accepted");
                Ok(())
            }
            Some(&received) => Err(self.fault(SrtpError::HandshakeRejected { received })),
            None => Err(self.fault(SrtpError::ConnectionClosed)),
        }
    }

    /// Reads the registers named by `address`, e.g. `"R20000:2"` or `"%MB17"`.
    ///
    /// The register count comes from the `:count` suffix and defaults to 1.
    ///
    /// # Errors
    ///
    /// - `SrtpError::InvalidAddress` if the text is malformed (no I/O is done)
    /// - `SrtpError::InvalidState` if the session is not `Ready`
    /// - `SrtpError::Decode` if the reply is too short
    /// - connection-level errors, which fault the session
    pub fn read_register(&mut self, address: &str) -> Result<DecodedResult> {
        let address = RegisterAddress::parse(address)?;
        self.read(&address)
    }

    /// Reads `count` registers starting at `address`.
    ///
    /// # Errors
    ///
    /// As [`read_register`](Self::read_register). Additionally returns
    /// `SrtpError::InvalidAddress` if `count` is zero or the text carries a
    /// different `:count` suffix.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # let mut session = ge_srtp::connect(std::net::Ipv4Addr::new(192, 168, 0, 10))?;
    /// let result = session.read_registers("R20000", 2)?;
    /// println!("{:?}", result.register_value.to_u32());
    /// # Ok::<(), ge_srtp::SrtpError>(())
    /// ```
    pub fn read_registers(&mut self, address: &str, count: u8) -> Result<DecodedResult> {
        let parsed = RegisterAddress::parse(address)?;
        if address.contains(':') && parsed.count() != count {
            return Err(SrtpError::invalid_address(
                address,
                format!("count suffix {} conflicts with count {count}", parsed.count()),
            ));
        }
        let parsed = parsed
            .with_count(count)
            .map_err(|_| SrtpError::invalid_address(address, "count must be at least 1"))?;
        self.read(&parsed)
    }

    /// Reads an already parsed address.
    ///
    /// # Errors
    ///
    /// As [`read_register`](Self::read_register), minus address parsing.
    pub fn read(&mut self, address: &RegisterAddress) -> Result<DecodedResult> {
        self.expect_state(SessionState::Ready, "read register")?;

        let frame = RequestFrame::read_sys_memory(address);
        let reply = match self.exchange(frame.as_bytes(), required_reply_len(address.count())) {
            Ok(reply) => reply,
            Err(err) => return Err(self.fault(err)),
        };

        let result = DecodedResult::decode(&reply, address.count())?;
        trace!(
            %address,
            status = result.status_code,
            status_minor = result.status_code_minor,
            value = %result.register_value,
            "register read"
        );
        Ok(result)
    }

    /// Releases the transport. Idempotent; the session ends up `Closed`.
    pub fn close(&mut self) {
        if let Some(mut transport) = self.transport.take() {
            transport.shutdown();
        }
        if self.state != SessionState::Closed {
            debug!(plc = %self.config.plc_addr, from = %self.state, "session closed");
            self.state = SessionState::Closed;
        }
    }

    /// Returns the current connection state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Returns whether reads are allowed.
    pub fn is_ready(&self) -> bool {
        self.state == SessionState::Ready
    }

    /// Returns the session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    fn expect_state(&self, expected: SessionState, operation: &'static str) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(SrtpError::InvalidState {
                operation,
                state: self.state,
            })
        }
    }

    fn exchange(&mut self, frame: &[u8], min_len: usize) -> Result<Vec<u8>> {
        let transport = self.transport.as_mut().ok_or(SrtpError::InvalidState {
            operation: "send request",
            state: self.state,
        })?;
        trace!(request = %hex::encode(frame), "sending frame");
        let reply = transport.send_receive(frame, min_len)?;
        trace!(reply = %hex::encode(&reply), "received frame");
        Ok(reply)
    }

    /// Moves to `Faulted`, drops the transport and hands the error back.
    fn fault(&mut self, err: SrtpError) -> SrtpError {
        debug!(plc = %self.config.plc_addr, from = %self.state, error = %err, "session faulted");
        if let Some(mut transport) = self.transport.take() {
            transport.shutdown();
        }
        self.state = SessionState::Faulted;
        err
    }
}

impl<T> std::fmt::Debug for Session<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("plc_addr", &self.config.plc_addr)
            .field("state", &self.state)
            .finish()
    }
}
