// libcedula/src/reader/duali.rs
//! APDU dialect for DUALi readers.
//!
//! DUALi firmware exposes a private command set on CLA `FD`. The card UID is
//! not fetched with a command at all: it is sliced out of the ATR (see
//! [`crate::atr::uid_from_atr`]). There is no authenticate primitive.

use crate::protocol::ApduCommand;
use crate::types::KeyType;
use crate::Result;

fn key_code(key_type: KeyType) -> u8 {
    match key_type {
        KeyType::TypeA => 0x00,
        KeyType::TypeB => 0x04,
    }
}

fn key_slot(key_type: KeyType) -> u8 {
    match key_type {
        KeyType::TypeA => 0x10,
        KeyType::TypeB => 0x11,
    }
}

/// Load a sector key: `FD 2F <keyT> <slot> 06 <key>`
pub fn load_key(key_type: KeyType, key: &[u8; 6]) -> Result<ApduCommand> {
    ApduCommand::case3(
        0xFD,
        0x2F,
        key_code(key_type),
        key_slot(key_type),
        0x06,
        key.to_vec(),
    )
}

/// Read one 4-byte page: `FD 35 00 FF 01 <page>`
pub fn read_page(page: u8) -> Result<ApduCommand> {
    ApduCommand::case3(0xFD, 0x35, 0x00, 0xFF, 0x01, vec![page])
}

/// Write one 4-byte page: `FD 37 00 FF 05 <page> <data>`
pub fn write_page(page: u8, data: &[u8; 4]) -> Result<ApduCommand> {
    let mut body = Vec::with_capacity(5);
    body.push(page);
    body.extend_from_slice(data);
    ApduCommand::case3(0xFD, 0x37, 0x00, 0xFF, 0x05, body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_key_wire_bytes() {
        let cmd = load_key(KeyType::TypeB, &[0xB0, 0xB1, 0xB2, 0xB3, 0xB4, 0xB5]).unwrap();
        assert_eq!(
            cmd.encode(),
            vec![0xFD, 0x2F, 0x04, 0x11, 0x06, 0xB0, 0xB1, 0xB2, 0xB3, 0xB4, 0xB5]
        );
    }

    #[test]
    fn page_io_wire_bytes() {
        assert_eq!(
            read_page(0x09).unwrap().encode(),
            vec![0xFD, 0x35, 0x00, 0xFF, 0x01, 0x09]
        );
        assert_eq!(
            write_page(0x09, &[5, 6, 7, 8]).unwrap().encode(),
            vec![0xFD, 0x37, 0x00, 0xFF, 0x05, 0x09, 5, 6, 7, 8]
        );
    }
}
