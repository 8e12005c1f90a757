//! Symbolic register addresses.
//!
//! Addresses are written the way GE programming tools show them:
//! `[%]TYPE<index>[:<count>]`, for example `%R20000:2` or `MB17`. The index is
//! 1-based. [`RegisterAddress::parse`] tokenizes the text against the closed
//! [`MemoryType`] table and computes the 0-based protocol offset.
//!
//! # Offsets
//!
//! - Word and bit types: `offset = index - 1`
//! - Byte types (`QB`, `MB`): `offset = (index - 1) / 8`
//!
//! ```
//! use ge_srtp::{MemoryType, RegisterAddress};
//!
//! let addr: RegisterAddress = "R20000:2".parse()?;
//! assert_eq!(addr.memory_type(), MemoryType::R);
//! assert_eq!(addr.index(), 20000);
//! assert_eq!(addr.count(), 2);
//! assert_eq!(addr.offset(), 19999);
//!
//! let addr = RegisterAddress::parse("MB17")?;
//! assert_eq!(addr.offset(), 2);
//! # Ok::<(), ge_srtp::SrtpError>(())
//! ```

use std::str::FromStr;

use crate::error::{Result, SrtpError};
use crate::memory::MemoryType;

/// Largest register count a single read can request.
pub const MAX_REGISTERS_PER_READ: u8 = u8::MAX;

/// A validated register address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct RegisterAddress {
    memory_type: MemoryType,
    index: u32,
    count: u8,
    offset: u16,
}

impl RegisterAddress {
    /// Creates an address from its parts.
    ///
    /// # Errors
    ///
    /// Returns `SrtpError::InvalidAddress` if `index` or `count` is zero, or if
    /// the resulting protocol offset does not fit in 16 bits.
    ///
    /// # Example
    ///
    /// ```
    /// use ge_srtp::{MemoryType, RegisterAddress};
    ///
    /// let addr = RegisterAddress::new(MemoryType::R, 5, 1).unwrap();
    /// assert_eq!(addr.offset(), 4);
    /// assert!(RegisterAddress::new(MemoryType::R, 0, 1).is_err());
    /// ```
    pub fn new(memory_type: MemoryType, index: u32, count: u8) -> Result<Self> {
        let input = format!("%{memory_type}{index}:{count}");
        Self::validate(&input, memory_type, index, u32::from(count))
    }

    /// Parses `[%]TYPE<digits>[:<digits>]`.
    ///
    /// # Errors
    ///
    /// Returns `SrtpError::InvalidAddress` if the text does not match the
    /// grammar, names an unknown memory type, or holds out-of-range numbers.
    pub fn parse(input: &str) -> Result<Self> {
        let invalid = |reason: String| SrtpError::invalid_address(input, reason);

        let rest = input.strip_prefix('%').unwrap_or(input);
        let symbol_len = rest
            .find(|c: char| !c.is_ascii_uppercase())
            .unwrap_or(rest.len());
        let (symbol, rest) = rest.split_at(symbol_len);
        if symbol.is_empty() {
            return Err(invalid("missing memory type".to_string()));
        }
        let memory_type = MemoryType::from_symbol(symbol)
            .ok_or_else(|| invalid(format!("unknown memory type '{symbol}'")))?;

        let (index_text, count_text) = match rest.split_once(':') {
            Some((index, count)) => (index, Some(count)),
            None => (rest, None),
        };
        let index = parse_number(index_text).map_err(|r| invalid(format!("index {r}")))?;
        let count = match count_text {
            Some(text) => parse_number(text).map_err(|r| invalid(format!("count {r}")))?,
            None => 1,
        };

        Self::validate(input, memory_type, index, count)
    }

    fn validate(input: &str, memory_type: MemoryType, index: u32, count: u32) -> Result<Self> {
        if index == 0 {
            return Err(SrtpError::invalid_address(input, "index must be at least 1"));
        }
        let count = match u8::try_from(count) {
            Ok(count) if count > 0 => count,
            _ => {
                return Err(SrtpError::invalid_address(
                    input,
                    format!("count must be between 1 and {MAX_REGISTERS_PER_READ}"),
                ))
            }
        };

        let zero_based = index - 1;
        let offset = if memory_type.is_byte_addressed() {
            zero_based / 8
        } else {
            zero_based
        };
        let offset = u16::try_from(offset).map_err(|_| {
            SrtpError::invalid_address(
                input,
                format!("index {index} is beyond the 16-bit address range"),
            )
        })?;

        Ok(Self {
            memory_type,
            index,
            count,
            offset,
        })
    }

    /// Returns a copy of this address with a different register count.
    ///
    /// # Errors
    ///
    /// Returns `SrtpError::InvalidAddress` if `count` is zero.
    pub fn with_count(self, count: u8) -> Result<Self> {
        Self::new(self.memory_type, self.index, count)
    }

    /// Memory type of the address.
    pub fn memory_type(&self) -> MemoryType {
        self.memory_type
    }

    /// 1-based index as written in the address text.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Number of registers to read.
    pub fn count(&self) -> u8 {
        self.count
    }

    /// 0-based protocol offset, in bytes for byte-addressed types.
    pub fn offset(&self) -> u16 {
        self.offset
    }
}

fn parse_number(text: &str) -> std::result::Result<u32, &'static str> {
    if text.is_empty() {
        return Err("is missing");
    }
    if !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err("must contain only decimal digits");
    }
    text.parse().map_err(|_| "is out of range")
}

impl FromStr for RegisterAddress {
    type Err = SrtpError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for RegisterAddress {
    type Error = SrtpError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<RegisterAddress> for String {
    fn from(value: RegisterAddress) -> Self {
        value.to_string()
    }
}

impl std::fmt::Display for RegisterAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "%{}{}", self.memory_type, self.index)?;
        if self.count != 1 {
            write!(f, ":{}", self.count)?;
        }
        Ok(())
    }
}
