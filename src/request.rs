//! SRTP request frame construction.
//!
//! Every request is a copy of [`BASE_MSG`] with five bytes patched in. The
//! encoder performs no I/O; the resulting bytes are handed to the transport.
//!
//! ```
//! use ge_srtp::{RegisterAddress, RequestFrame};
//!
//! let addr = RegisterAddress::parse("R20000:2")?;
//! let frame = RequestFrame::read_sys_memory(&addr);
//! let bytes = frame.as_bytes();
//! assert_eq!(bytes.len(), 56);
//! assert_eq!(bytes[42], 0x04); // read system memory
//! assert_eq!(bytes[46], 2);    // register count
//! # Ok::<(), ge_srtp::SrtpError>(())
//! ```

use crate::address::RegisterAddress;
use crate::messages::{
    ADDRESS_HIGH_OFFSET, ADDRESS_LOW_OFFSET, BASE_MSG, COUNT_OFFSET, FRAME_SIZE, SEGMENT_OFFSET,
    SERVICE_CODE_OFFSET, SERVICE_READ_SYS_MEMORY,
};

/// An encoded request, ready to be written to the socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestFrame {
    bytes: [u8; FRAME_SIZE],
}

impl RequestFrame {
    /// Builds a "read system memory" request for `address`.
    pub fn read_sys_memory(address: &RegisterAddress) -> Self {
        let mut bytes = BASE_MSG;
        let [low, high] = address.offset().to_le_bytes();
        bytes[SERVICE_CODE_OFFSET] = SERVICE_READ_SYS_MEMORY;
        bytes[SEGMENT_OFFSET] = address.memory_type().code();
        bytes[ADDRESS_LOW_OFFSET] = low;
        bytes[ADDRESS_HIGH_OFFSET] = high;
        bytes[COUNT_OFFSET] = address.count();
        Self { bytes }
    }

    /// Returns the encoded frame.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl AsRef<[u8]> for RequestFrame {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryType;

    fn frame_for(text: &str) -> RequestFrame {
        RequestFrame::read_sys_memory(&RegisterAddress::parse(text).unwrap())
    }

    #[test]
    fn test_read_register_pair() {
        let frame = frame_for("R20000:2");
        let bytes = frame.as_bytes();

        assert_eq!(bytes.len(), FRAME_SIZE);
        assert_eq!(bytes[42], SERVICE_READ_SYS_MEMORY);
        assert_eq!(bytes[43], 0x08); // %R segment

        // 19999 = 0x4E1F
        assert_eq!(bytes[44], 0x1F);
        assert_eq!(bytes[45], 0x4E);
        assert_eq!(bytes[46], 2);
    }

    #[test]
    fn test_byte_addressed_frame() {
        let frame = frame_for("%MB17");
        let bytes = frame.as_bytes();

        assert_eq!(bytes[43], MemoryType::MB.code());
        assert_eq!(bytes[44], 2);
        assert_eq!(bytes[45], 0);
        assert_eq!(bytes[46], 1);
    }

    #[test]
    fn test_only_service_fields_change() {
        for text in ["R1", "AI300:4", "Q00065", "MB03521", "R65536:255"] {
            let frame = frame_for(text);
            for (i, (&got, &template)) in frame.as_bytes().iter().zip(BASE_MSG.iter()).enumerate() {
                if !(SERVICE_CODE_OFFSET..=COUNT_OFFSET).contains(&i) {
                    assert_eq!(got, template, "{text}: byte {i} differs from template");
                }
            }
        }
    }

    #[test]
    fn test_max_offset_and_count() {
        let frame = frame_for("R65536:255");
        let bytes = frame.as_bytes();
        assert_eq!(bytes[44], 0xFF);
        assert_eq!(bytes[45], 0xFF);
        assert_eq!(bytes[46], 0xFF);
    }
}
