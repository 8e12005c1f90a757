//! # GE SRTP Protocol Library
//!
//! A Rust library for reading registers from GE PLCs using the SRTP (Service
//! Request Transport Protocol) over TCP.
//!
//! This is a **protocol-only** library: no polling, scheduling, result
//! logging or IP scanning. Each read produces exactly 1 request and 1 response.
//! No automatic retries or reconnection.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::net::Ipv4Addr;
//!
//! fn main() -> ge_srtp::Result<()> {
//!     // Connect to the PLC on port 18245 and perform the handshake
//!     let mut session = ge_srtp::connect(Ipv4Addr::new(192, 168, 0, 10))?;
//!
//!     // Read %R5
//!     let result = session.read_register("%R5")?;
//!     println!("R5 = {:?}", result.register_value.to_u16());
//!
//!     // Read %R20000-%R20001 as one 32-bit value
//!     let result = session.read_register("R20000:2")?;
//!     println!("R20000:2 = {:?}", result.register_value.to_u32());
//!
//!     session.close();
//!     Ok(())
//! }
//! ```
//!
//! ## Addresses
//!
//! Addresses are written `[%]TYPE<index>[:<count>]` with a 1-based index:
//!
//! | Type | Description | Addressing |
//! |------|-------------|------------|
//! | `R` | Registers | word |
//! | `AI` / `AQ` | Analog inputs / outputs | word |
//! | `I` / `Q` / `M` | Discrete inputs / outputs / internal | bit |
//! | `QB` / `MB` | Discrete outputs / internal | byte |
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, SrtpError>`]. Connection-level errors
//! fault the session; request-level errors do not:
//!
//! ```no_run
//! use ge_srtp::SrtpError;
//! # let mut session = ge_srtp::connect(std::net::Ipv4Addr::new(192, 168, 0, 10))?;
//!
//! match session.read_register("R20000:2") {
//!     Ok(result) => println!("value: {}", result.register_value),
//!     Err(SrtpError::InvalidAddress { input, reason }) => println!("bad address {input}: {reason}"),
//!     Err(e) if e.is_connection_error() => println!("reconnect needed: {e}"),
//!     Err(e) => println!("read failed, session still usable: {e}"),
//! }
//! # Ok::<(), SrtpError>(())
//! ```
//!
//! ## Logging
//!
//! The library emits [`tracing`] events: connection lifecycle at `debug`,
//! hex dumps of every frame at `trace`. Install a subscriber to see them.

#![warn(clippy::all)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

mod address;
mod error;
mod memory;
mod messages;
mod request;
mod response;
mod session;
mod transport;

// Public re-exports
pub use address::{RegisterAddress, MAX_REGISTERS_PER_READ};
pub use error::{Result, SrtpError};
pub use memory::MemoryType;
pub use messages::{
    BASE_MSG, DEFAULT_SRTP_PORT, FRAME_SIZE, INIT_ACK, INIT_MSG, MAX_RESPONSE_SIZE,
    RECEIVE_TIMEOUT,
};
pub use request::RequestFrame;
pub use response::{DecodedResult, RegisterValue};
pub use session::{connect, Session, SessionConfig, SessionState};
pub use transport::{TcpTransport, Transport};
