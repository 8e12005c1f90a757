//! Fixed SRTP message tables.
//!
//! SRTP frames are 56-byte blocks. Requests are built by copying
//! [`BASE_MSG`] and patching the service fields at offsets 42–46; replies are
//! read at the same offsets.
//!
//! | Offset | Request | Reply |
//! |--------|---------|-------|
//! | 42 | service code | status code |
//! | 43 | segment selector | minor status code |
//! | 44 | address low byte | payload... |
//! | 45 | address high byte | |
//! | 46 | register count | |

use std::time::Duration;

/// Default SRTP TCP port.
pub const DEFAULT_SRTP_PORT: u16 = 18245;

/// Receive timeout for the handshake and every read.
pub const RECEIVE_TIMEOUT: Duration = Duration::from_secs(2);

/// Size of the handshake payload and of the request template.
pub const FRAME_SIZE: usize = 56;

/// Largest reply taken from a single receive.
pub const MAX_RESPONSE_SIZE: usize = 1024;

/// Handshake payload, sent verbatim right after the TCP connect.
pub const INIT_MSG: [u8; FRAME_SIZE] = [0x00; FRAME_SIZE];

/// First byte of a valid handshake reply.
pub const INIT_ACK: u8 = 0x01;

/// Service code for "read system memory".
pub(crate) const SERVICE_READ_SYS_MEMORY: u8 = 0x04;

pub(crate) const SERVICE_CODE_OFFSET: usize = 42;
pub(crate) const SEGMENT_OFFSET: usize = 43;
pub(crate) const ADDRESS_LOW_OFFSET: usize = 44;
pub(crate) const ADDRESS_HIGH_OFFSET: usize = 45;
pub(crate) const COUNT_OFFSET: usize = 46;

pub(crate) const STATUS_OFFSET: usize = 42;
pub(crate) const STATUS_MINOR_OFFSET: usize = 43;
pub(crate) const PAYLOAD_OFFSET: usize = 44;

/// Request template. Only offsets 42–46 vary between requests.
#[rustfmt::skip]
pub const BASE_MSG: [u8; FRAME_SIZE] = [
    0x02, 0x00, 0x06, 0x00, 0x00, 0x00, 0x00, 0x00, // 0: type 02 = request
    0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // 8
    0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // 16
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x06, 0xC0, // 24: 31 = mailbox type
    0x00, 0x00, 0x00, 0x00, 0x10, 0x0E, 0x00, 0x00, // 32: 36/37 = mailbox destination
    0x01, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // 40: packet 1 of 1, service fields
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // 48
];
