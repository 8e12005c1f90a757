//! Memory type definitions for the SRTP protocol.
//!
//! This module defines the [`MemoryType`] enum, the closed set of register
//! classes a GE PLC exposes to SRTP reads. Each type maps to a one-byte segment
//! selector placed in the request frame.
//!
//! # Memory Types Overview
//!
//! | Symbol | Description | Segment | Addressing |
//! |--------|-------------|:-------:|:----------:|
//! | R | Registers | 0x08 | word |
//! | AI | Analog inputs | 0x0A | word |
//! | AQ | Analog outputs | 0x0C | word |
//! | I | Discrete inputs | 0x46 | bit |
//! | Q | Discrete outputs | 0x48 | bit |
//! | M | Internal memory | 0x4C | bit |
//! | QB | Discrete outputs | 0x12 | byte |
//! | MB | Internal memory | 0x16 | byte |
//!
//! # Example
//!
//! ```
//! use ge_srtp::MemoryType;
//!
//! assert!(MemoryType::MB.is_byte_addressed());
//! assert!(!MemoryType::R.is_byte_addressed());
//! assert_eq!(MemoryType::AI.to_string(), "AI");
//! ```

/// Register classes readable over SRTP.
///
/// Types whose symbol ends in `B` are byte-addressed: a 1-based bit index is
/// turned into a byte offset by the address resolver. All others use the
/// 1-based index directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MemoryType {
    /// %R registers.
    R,
    /// %AI analog inputs.
    AI,
    /// %AQ analog outputs.
    AQ,
    /// %I discrete inputs, bit mode.
    I,
    /// %Q discrete outputs, bit mode.
    Q,
    /// %Q discrete outputs, byte mode.
    QB,
    /// %M internal memory, bit mode.
    M,
    /// %M internal memory, byte mode.
    MB,
}

impl MemoryType {
    /// All memory types, in table order.
    pub const ALL: [MemoryType; 8] = [
        MemoryType::R,
        MemoryType::AI,
        MemoryType::AQ,
        MemoryType::I,
        MemoryType::Q,
        MemoryType::QB,
        MemoryType::M,
        MemoryType::MB,
    ];

    /// Returns the SRTP segment selector for this memory type.
    pub(crate) fn code(self) -> u8 {
        match self {
            MemoryType::R => 0x08,
            MemoryType::AI => 0x0A,
            MemoryType::AQ => 0x0C,
            MemoryType::I => 0x46,
            MemoryType::Q => 0x48,
            MemoryType::QB => 0x12,
            MemoryType::M => 0x4C,
            MemoryType::MB => 0x16,
        }
    }

    /// Returns the textual symbol used in register addresses.
    pub fn symbol(self) -> &'static str {
        match self {
            MemoryType::R => "R",
            MemoryType::AI => "AI",
            MemoryType::AQ => "AQ",
            MemoryType::I => "I",
            MemoryType::Q => "Q",
            MemoryType::QB => "QB",
            MemoryType::M => "M",
            MemoryType::MB => "MB",
        }
    }

    /// Looks up a memory type by its exact symbol.
    ///
    /// # Example
    ///
    /// ```
    /// use ge_srtp::MemoryType;
    ///
    /// assert_eq!(MemoryType::from_symbol("QB"), Some(MemoryType::QB));
    /// assert_eq!(MemoryType::from_symbol("X"), None);
    /// ```
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.symbol() == symbol)
    }

    /// Returns whether addresses of this type are byte offsets.
    pub fn is_byte_addressed(self) -> bool {
        self.symbol().contains('B')
    }
}

impl std::fmt::Display for MemoryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(MemoryType::R.code(), 0x08);
        assert_eq!(MemoryType::AI.code(), 0x0A);
        assert_eq!(MemoryType::AQ.code(), 0x0C);
        assert_eq!(MemoryType::I.code(), 0x46);
        assert_eq!(MemoryType::Q.code(), 0x48);
        assert_eq!(MemoryType::QB.code(), 0x12);
        assert_eq!(MemoryType::M.code(), 0x4C);
        assert_eq!(MemoryType::MB.code(), 0x16);
    }

    #[test]
    fn test_byte_addressing() {
        let byte_types: Vec<_> = MemoryType::ALL
            .into_iter()
            .filter(|t| t.is_byte_addressed())
            .collect();
        assert_eq!(byte_types, vec![MemoryType::QB, MemoryType::MB]);
    }

    #[test]
    fn test_symbol_lookup() {
        for t in MemoryType::ALL {
            assert_eq!(MemoryType::from_symbol(t.symbol()), Some(t));
        }
        assert_eq!(MemoryType::from_symbol("r"), None);
        assert_eq!(MemoryType::from_symbol("IB"), None);
        assert_eq!(MemoryType::from_symbol(""), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(MemoryType::R.to_string(), "R");
        assert_eq!(MemoryType::MB.to_string(), "MB");
    }
}
