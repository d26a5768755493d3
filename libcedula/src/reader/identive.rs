// libcedula/src/reader/identive.rs
//! APDU dialect for SCM/Identive contactless readers.
//!
//! Shares the storage-card INS set with ACS but addresses the key slot by
//! key code (60/61) instead of slot number, and pins the authenticate key
//! number to 1.

use crate::protocol::ApduCommand;
use crate::types::KeyType;
use crate::Result;

fn key_code(key_type: KeyType) -> u8 {
    match key_type {
        KeyType::TypeA => 0x60,
        KeyType::TypeB => 0x61,
    }
}

/// LOAD KEYS: `FF 82 00 <keyT> 06 <key>`
pub fn load_key(key_type: KeyType, key: &[u8; 6]) -> Result<ApduCommand> {
    ApduCommand::case3(0xFF, 0x82, 0x00, key_code(key_type), 0x06, key.to_vec())
}

/// GENERAL AUTHENTICATE: `FF 86 00 00 05 01 00 <sector> <keyT> 01`
pub fn authenticate(key_type: KeyType, sector: u8) -> Result<ApduCommand> {
    ApduCommand::case3(
        0xFF,
        0x86,
        0x00,
        0x00,
        0x05,
        vec![0x01, 0x00, sector, key_code(key_type), 0x01],
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
