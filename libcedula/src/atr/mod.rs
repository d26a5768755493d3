// libcedula/src/atr/mod.rs
//! ATR classification.
//!
//! Two ATR dialects exist in the field and are kept as separate pure
//! functions. [`classify_pcsc_bridge`] handles the generic PC/SC contactless
//! bridge layout used by ACS and Identive readers; [`classify_fixed_offset`]
//! handles the single-byte family code emitted by DUALi readers, which also
//! embeds the card UID directly in the ATR.
//!
//! Classification is a pure function of the byte buffer: no I/O, no
//! failures. Unrecognized ATRs come back as [`CardType::Unknown`].

use crate::constants::{DESFIRE_RID, PCSC_WORKGROUP_RID};
use crate::types::{CardType, Uid};

/// Classify an ATR in the PC/SC contactless bridge layout.
///
/// Long form (`len > 14`): the five-byte RID sits at offsets 7..12; when it
/// is the PC/SC Workgroup RID, byte 12 discriminates the standard. The
/// triplet at offsets 12..15 then overrides with a concrete Felica / Topaz /
/// Mifare classification when it matches a known card name.
///
/// Short form (`len == 11`): a fixed six-byte RID at offsets 4..10 announces
/// a Mifare DESFire running ISO 14443-4. This check is independent of the
/// long form.
pub fn classify_pcsc_bridge(atr: &[u8]) -> CardType {
    if atr.len() == 11 && atr[4..10] == DESFIRE_RID {
        return CardType::MifareDesfire;
    }

    if atr.len() > 14 {
        let mut card_type = CardType::Unknown;

        if atr[7..12] == PCSC_WORKGROUP_RID {
            card_type = standard_discriminator(atr[12]);
        }

        if let Some(named) = card_name_override(atr[12], atr[13], atr[14]) {
            card_type = named;
        }

        return card_type;
    }

    CardType::Unknown
}

/// "Std" byte value -> standard family, per the ISO 14443 part 3
/// supplemental document.
fn standard_discriminator(std_byte: u8) -> CardType {
    match std_byte {
        0x01 => CardType::Iso14443aPart1,
        0x02 => CardType::Iso14443aPart2,
        0x03 => CardType::Iso14443aPart3,
        0x05 => CardType::Iso14443bPart1,
        0x06 => CardType::Iso14443bPart2,
        0x07 => CardType::Iso14443bPart3,
        0x09 => CardType::Iso15693Part1,
        0x0A => CardType::Iso15693Part2,
        0x0B => CardType::Iso15693Part3,
        0x0C => CardType::Iso15693Part4,
        0x0D => CardType::Contact7816I2c,
        0x0E => CardType::Contact7816ExtendedI2c,
        0x0F => CardType::Contact7816TwoWire,
        0x10 => CardType::Contact7816ThreeWire,
        _ => CardType::Unknown,
    }
}

/// Card-name triplet at ATR offsets 12..15 -> concrete card family.
fn card_name_override(b12: u8, b13: u8, b14: u8) -> Option<CardType> {
    match (b12, b13, b14) {
        (0x03, 0xF0, 0x11) => Some(CardType::Felica212K),
        (0x03, 0xF0, 0x12) => Some(CardType::Felica424K),
        (0x03, 0xF0, 0x04) => Some(CardType::Topaz),
        (0x03, 0x00, 0x01) => Some(CardType::MifareStandard1K),
        (0x03, 0x00, 0x02) => Some(CardType::MifareStandard4K),
        (0x03, 0x00, 0x03) => Some(CardType::MifareUltralightFamily),
        (0x03, 0x00, 0x26) => Some(CardType::MifareMini),
        (0x03, 0xFF, 0x09) => Some(CardType::MifareMini),
        _ => None,
    }
}

/// Classify an ATR carrying a single-byte family code at offset 4 (DUALi
/// dialect). Mifare subtypes are selected on the *last* ATR byte.
pub fn classify_fixed_offset(atr: &[u8]) -> CardType {
    let family = match atr.get(4) {
        Some(&b) => b,
        None => return CardType::Unknown,
    };

    match family {
        0xF0 | 0x01 => match atr[atr.len() - 1] {
            0x30 => CardType::MifareStandard1K,
            0x31 => CardType::MifareUltralightFamily,
            0x32 => CardType::MifareStandard4K,
            0x33 => CardType::MifareMini,
            0x34 => CardType::MifarePlus2K,
            0x35 => CardType::MifarePlus4K,
            _ => CardType::Unknown,
        },
        0xFD | 0x02 => CardType::Iso15693Part1,
        0xFC | 0x03 => CardType::Felica212K,
        0xF1 => CardType::Topaz,
        _ => CardType::Unknown,
    }
}

/// Extract the UID embedded in a fixed-offset-dialect ATR. Only ISO 14443-A
/// family ATRs carry one; everything else yields `None`.
pub fn uid_from_atr(atr: &[u8]) -> Option<Uid> {
    match atr.get(4) {
        Some(0xF0) | Some(0x01) if atr.len() > 6 => Some(Uid::from_bytes(atr[6..].to_vec())),
        _ => None,
    }
}
