// libcedula/src/types.rs

use crate::{Error, Result};

/// Card UID - Newtype Pattern (length depends on the card family)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Uid(Vec<u8>);

impl Uid {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_hex(&self) -> String {
        crate::utils::bytes_to_hex(&self.0)
    }

    /// UID as a 64-bit integer: the bytes in reading order, interpreted as a
    /// big-endian number (the hex rendering parsed base-16).
    pub fn to_u64(&self) -> Result<u64> {
        if self.0.is_empty() || self.0.len() > 8 {
            return Err(Error::InvalidLength {
                expected: 8,
                actual: self.0.len(),
            });
        }
        Ok(self.0.iter().fold(0u64, |acc, &b| (acc << 8) | b as u64))
    }

    /// UID as a 32-bit integer with the first four bytes reversed before
    /// conversion. This rendering originated as a truncation bug in an early
    /// deployment, but a downstream access-control system stores card numbers
    /// in exactly this form, so it is kept as a separate named output. It is
    /// not interchangeable with [`Uid::to_u64`].
    pub fn to_u32_compat(&self) -> Result<u32> {
        if self.0.len() < 4 {
            return Err(Error::InvalidLength {
                expected: 4,
                actual: self.0.len(),
            });
        }
        Ok(self.0[..4]
            .iter()
            .rev()
            .fold(0u32, |acc, &b| (acc << 8) | b as u32))
    }
}

impl std::fmt::Display for Uid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Card/tag families recognizable from an ATR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CardType {
    #[display(fmt = "Unknown")]
    Unknown,
    #[display(fmt = "Felica 212K")]
    Felica212K,
    #[display(fmt = "Felica 424K")]
    Felica424K,
    #[display(fmt = "Topaz")]
    Topaz,
    #[display(fmt = "Mifare Ultralight family")]
    MifareUltralightFamily,
    #[display(fmt = "Mifare DESFire")]
    MifareDesfire,
    #[display(fmt = "Mifare Mini")]
    MifareMini,
    #[display(fmt = "Mifare Classic 1K")]
    MifareStandard1K,
    #[display(fmt = "Mifare Classic 4K")]
    MifareStandard4K,
    #[display(fmt = "Mifare Plus 2K")]
    MifarePlus2K,
    #[display(fmt = "Mifare Plus 4K")]
    MifarePlus4K,
    #[display(fmt = "ISO 14443-A")]
    Iso14443a,
    #[display(fmt = "ISO 14443-A part 1")]
    Iso14443aPart1,
    #[display(fmt = "ISO 14443-A part 2")]
    Iso14443aPart2,
    #[display(fmt = "ISO 14443-A part 3")]
    Iso14443aPart3,
    #[display(fmt = "ISO 14443-B")]
    Iso14443b,
    #[display(fmt = "ISO 14443-B part 1")]
    Iso14443bPart1,
    #[display(fmt = "ISO 14443-B part 2")]
    Iso14443bPart2,
    #[display(fmt = "ISO 14443-B part 3")]
    Iso14443bPart3,
    #[display(fmt = "ISO 15693")]
    Iso15693,
    #[display(fmt = "ISO 15693 part 1")]
    Iso15693Part1,
    #[display(fmt = "ISO 15693 part 2")]
    Iso15693Part2,
    #[display(fmt = "ISO 15693 part 3")]
    Iso15693Part3,
    #[display(fmt = "ISO 15693 part 4")]
    Iso15693Part4,
    #[display(fmt = "ISO 7816-10 contact card (I2C)")]
    Contact7816I2c,
    #[display(fmt = "ISO 7816-10 contact card (extended I2C)")]
    Contact7816ExtendedI2c,
    #[display(fmt = "ISO 7816-10 contact card (2-wire)")]
    Contact7816TwoWire,
    #[display(fmt = "ISO 7816-10 contact card (3-wire)")]
    Contact7816ThreeWire,
}

/// Reader hardware families, each speaking its own APDU dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReaderBrand {
    Acs,
    Duali,
    Identive,
    Unknown,
}

impl ReaderBrand {
    /// Derive the brand from the reader name reported by the resource
    /// manager. Matching is done once at discovery time.
    pub fn from_reader_name(name: &str) -> Self {
        if name.starts_with("DUALi") {
            ReaderBrand::Duali
        } else if name.starts_with("ACS") {
            ReaderBrand::Acs
        } else if name.starts_with("SCM")
            || (name.starts_with("Identive") && name.contains("Contactless"))
        {
            ReaderBrand::Identive
        } else {
            ReaderBrand::Unknown
        }
    }
}

/// A discovered reader: name plus the brand derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReaderDescriptor {
    pub name: String,
    pub brand: ReaderBrand,
}

impl ReaderDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let brand = ReaderBrand::from_reader_name(&name);
        Self { name, brand }
    }
}

/// Mifare sector key slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum KeyType {
    #[display(fmt = "key A")]
    TypeA,
    #[display(fmt = "key B")]
    TypeB,
}

/// Reader state bitmask as reported by GetStatusChange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StateFlags(pub u32);

impl StateFlags {
    pub const UNAWARE: StateFlags = StateFlags(crate::constants::STATE_UNAWARE);

    pub fn contains(self, mask: u32) -> bool {
        self.0 & mask == mask
    }

    pub fn is_changed(self) -> bool {
        self.contains(crate::constants::STATE_CHANGED)
    }

    pub fn is_present(self) -> bool {
        self.contains(crate::constants::STATE_PRESENT)
    }

    pub fn is_empty_slot(self) -> bool {
        self.contains(crate::constants::STATE_EMPTY)
    }
}
