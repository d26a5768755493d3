// libcedula/src/reader/acs.rs
//! APDU dialect for ACS contactless readers (ACR122 and friends).
//!
//! Storage-card commands ride on CLA `FF`; keys go to volatile slot 0 or 1
//! depending on the key type.

use crate::protocol::ApduCommand;
use crate::types::KeyType;
use crate::Result;

fn key_slot(key_type: KeyType) -> u8 {
    match key_type {
        KeyType::TypeA => 0x00,
        KeyType::TypeB => 0x01,
    }
}

fn key_code(key_type: KeyType) -> u8 {
    match key_type {
        KeyType::TypeA => 0x60,
        KeyType::TypeB => 0x61,
    }
}

/// LOAD KEYS: `FF 82 00 <slot> 06 <key>`
pub fn load_key(key_type: KeyType, key: &[u8; 6]) -> Result<ApduCommand> {
    ApduCommand::case3(0xFF, 0x82, 0x00, key_slot(key_type), 0x06, key.to_vec())
}

/// GENERAL AUTHENTICATE: `FF 86 00 00 05 01 00 <sector> <keyT> <slot>`
pub fn authenticate(key_type: KeyType, sector: u8) -> Result<ApduCommand> {
    ApduCommand::case3(
        0xFF,
        0x86,
        0x00,
        0x00,
        0x05,
        vec![0x01, 0x00, sector, key_code(key_type), key_slot(key_type)],
    )
}

/// READ BINARY, one 4-byte page: `FF B0 00 <page> 04`
pub fn read_page(page: u8) -> ApduCommand {
    ApduCommand::case2(0xFF, 0xB0, 0x00, page, 0x04)
}

/// UPDATE BINARY, one 4-byte page: `FF D6 00 <page> 04 <data>`
pub fn write_page(page: u8, data: &[u8; 4]) -> Result<ApduCommand> {
    ApduCommand::case3(0xFF, 0xD6, 0x00, page, 0x04, data.to_vec())
}

/// GET DATA for the card UID: `FF CA 00 00 00`
pub fn get_uid() -> ApduCommand {
    ApduCommand::case2(0xFF, 0xCA, 0x00, 0x00, 0x00)
}
