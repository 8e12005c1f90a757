//! SRTP reply decoding.
//!
//! Only three fields of a reply are interpreted:
//!
//! | Offset | Field |
//! |--------|-------|
//! | 42 | status code |
//! | 43 | minor status code |
//! | 44..44+2·count | register payload |
//!
//! The payload is decoded as **one** little-endian integer spanning all
//! `2·count` bytes. Reading `R20000:2` therefore yields a single 32-bit value,
//! not two 16-bit words. Callers reading double-wide tags rely on this.
//!
//! # Example
//!
//! ```
//! use ge_srtp::DecodedResult;
//!
//! let mut reply = vec![0u8; 56];
//! reply[44..48].copy_from_slice(&[0x01, 0x02, 0x03, 0x04]);
//!
//! let result = DecodedResult::decode(&reply, 2)?;
//! assert!(result.is_success());
//! assert_eq!(result.register_value.to_u32(), Some(0x0403_0201));
//! # Ok::<(), ge_srtp::SrtpError>(())
//! ```

use crate::error::{Result, SrtpError};
use crate::messages::{PAYLOAD_OFFSET, STATUS_MINOR_OFFSET, STATUS_OFFSET};

/// Bytes a reply to a read of `count` registers must hold.
pub(crate) fn required_reply_len(count: u8) -> usize {
    PAYLOAD_OFFSET + 2 * usize::from(count)
}

/// Register payload: an unsigned little-endian integer `2·count` bytes wide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegisterValue {
    le_bytes: Vec<u8>,
}

impl RegisterValue {
    /// Wraps little-endian payload bytes.
    pub fn from_le_bytes(bytes: &[u8]) -> Self {
        Self {
            le_bytes: bytes.to_vec(),
        }
    }

    /// Little-endian payload bytes, least significant first.
    pub fn as_le_bytes(&self) -> &[u8] {
        &self.le_bytes
    }

    /// Width of the value in bytes.
    pub fn width(&self) -> usize {
        self.le_bytes.len()
    }

    /// Returns the value as `u128`, or `None` if it does not fit.
    pub fn to_u128(&self) -> Option<u128> {
        let (low, high) = self.le_bytes.split_at(self.le_bytes.len().min(16));
        if high.iter().any(|&b| b != 0) {
            return None;
        }
        let mut buf = [0u8; 16];
        buf[..low.len()].copy_from_slice(low);
        Some(u128::from_le_bytes(buf))
    }

    /// Returns the value as `u64`, or `None` if it does not fit.
    pub fn to_u64(&self) -> Option<u64> {
        self.to_u128().and_then(|v| u64::try_from(v).ok())
    }

    /// Returns the value as `u32`, or `None` if it does not fit.
    pub fn to_u32(&self) -> Option<u32> {
        self.to_u128().and_then(|v| u32::try_from(v).ok())
    }

    /// Returns the value as `u16`, or `None` if it does not fit.
    pub fn to_u16(&self) -> Option<u16> {
        self.to_u128().and_then(|v| u16::try_from(v).ok())
    }
}

impl std::fmt::Display for RegisterValue {
    /// Formats the value as big-endian hex, e.g. `0x04030201`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("0x")?;
        if self.le_bytes.is_empty() {
            return f.write_str("0");
        }
        for byte in self.le_bytes.iter().rev() {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// Structured result of a register read.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecodedResult {
    /// Status code (reply byte 42).
    pub status_code: u8,
    /// Minor status code (reply byte 43).
    pub status_code_minor: u8,
    /// Register payload.
    pub register_value: RegisterValue,
}

impl DecodedResult {
    /// Decodes a reply to a read of `count` registers.
    ///
    /// # Errors
    ///
    /// Returns `SrtpError::Decode` if `reply` is shorter than `44 + 2·count`
    /// bytes. No partial result is produced.
    pub fn decode(reply: &[u8], count: u8) -> Result<Self> {
        let end = required_reply_len(count);
        if reply.len() < end {
            return Err(SrtpError::decode(end, reply.len()));
        }

        Ok(Self {
            status_code: reply[STATUS_OFFSET],
            status_code_minor: reply[STATUS_MINOR_OFFSET],
            register_value: RegisterValue::from_le_bytes(&reply[PAYLOAD_OFFSET..end]),
        })
    }

    /// Returns whether both status bytes are zero.
    pub fn is_success(&self) -> bool {
        self.status_code == 0x00 && self.status_code_minor == 0x00
    }

    /// Returns `SrtpError::PlcStatus` if either status byte is non-zero.
    ///
    /// Reads never call this on their own; it is for callers that want a
    /// non-zero status treated as a failure.
    ///
    /// # Example
    ///
    /// ```
    /// use ge_srtp::{DecodedResult, SrtpError};
    ///
    /// let mut reply = vec![0u8; 56];
    /// reply[42] = 0x05;
    /// let result = DecodedResult::decode(&reply, 1)?;
    /// assert!(matches!(
    ///     result.check_status(),
    ///     Err(SrtpError::PlcStatus { major: 0x05, minor: 0x00 })
    /// ));
    /// # Ok::<(), SrtpError>(())
    /// ```
    pub fn check_status(&self) -> Result<()> {
        if self.is_success() {
            Ok(())
        } else {
            Err(SrtpError::plc_status(
                self.status_code,
                self.status_code_minor,
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_reply(status: u8, minor: u8, payload: &[u8]) -> Vec<u8> {
        let mut bytes = vec![0u8; 44];
        bytes[0] = 0x03;
        bytes[42] = status;
        bytes[43] = minor;
        bytes.extend_from_slice(payload);
        bytes
    }

    #[test]
    fn test_decode_single_register() {
        let reply = make_reply(0x00, 0x00, &[0x34, 0x12, 0xAA, 0xBB]);
        let result = DecodedResult::decode(&reply, 1).unwrap();

        assert_eq!(result.status_code, 0x00);
        assert_eq!(result.status_code_minor, 0x00);
        assert_eq!(result.register_value.width(), 2);
        assert_eq!(result.register_value.to_u16(), Some(0x1234));
    }

    #[test]
    fn test_decode_concatenates_registers() {
        let reply = make_reply(0x00, 0x00, &[0x01, 0x02, 0x03, 0x04]);
        let result = DecodedResult::decode(&reply, 2).unwrap();

        assert_eq!(result.register_value.to_u32(), Some(0x0403_0201));
        assert_eq!(result.register_value.to_u16(), None);
    }

    #[test]
    fn test_decode_status_bytes() {
        let reply = make_reply(0x05, 0x8F, &[0x00, 0x00]);
        let result = DecodedResult::decode(&reply, 1).unwrap();

        assert_eq!(result.status_code, 0x05);
        assert_eq!(result.status_code_minor, 0x8F);
        assert!(!result.is_success());
        match result.check_status().unwrap_err() {
            SrtpError::PlcStatus { major, minor } => {
                assert_eq!(major, 0x05);
                assert_eq!(minor, 0x8F);
            }
            other => panic!("Expected PlcStatus, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_too_short() {
        let reply = make_reply(0x00, 0x00, &[0x01, 0x02, 0x03]);
        match DecodedResult::decode(&reply, 2).unwrap_err() {
            SrtpError::Decode { required, actual } => {
                assert_eq!(required, 48);
                assert_eq!(actual, 47);
            }
            other => panic!("Expected Decode, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_missing_status() {
        let reply = [0x03; 10];
        assert!(DecodedResult::decode(&reply, 1).is_err());
    }

    #[test]
    fn test_decode_ignores_trailing_bytes() {
        let reply = make_reply(0x00, 0x00, &[0xFF, 0x00, 0xEE, 0xEE, 0xEE]);
        let result = DecodedResult::decode(&reply, 1).unwrap();
        assert_eq!(result.register_value.as_le_bytes(), &[0xFF, 0x00]);
    }

    #[test]
    fn test_wide_value_narrowing() {
        let mut payload = vec![0u8; 20];
        payload[0] = 0x2A;
        let value = RegisterValue::from_le_bytes(&payload);
        assert_eq!(value.to_u128(), Some(42));
        assert_eq!(value.to_u16(), Some(42));

        payload[17] = 0x01;
        let value = RegisterValue::from_le_bytes(&payload);
        assert_eq!(value.to_u128(), None);
    }

    #[test]
    fn test_value_display() {
        let value = RegisterValue::from_le_bytes(&[0x01, 0x02, 0x03, 0x04]);
        assert_eq!(value.to_string(), "0x04030201");
        assert_eq!(RegisterValue::default().to_string(), "0x0");
    }
}
