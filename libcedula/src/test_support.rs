// libcedula/src/test_support.rs
//! Test support helpers intended for use by unit and integration tests.
//!
//! These helpers centralize common MockTransport setup so tests across the
//! crate and tests/ directory can reuse the same fixtures.
#![allow(dead_code)]

use crate::cedula::reader::{BIOGRAPHIC_FILE, PHOTO_FILE};
use crate::transport::mock::MockTransport;

/// Reader names used throughout the test suite.
pub const DUALI_READER: &str = "DUALi DE-620";
pub const ACS_READER: &str = "ACS ACR122U PICC Interface 00";

/// Fixed-offset-dialect ATR: family byte `F0` (ISO 14443-A), trailing `31`
/// (Ultralight), UID `DE AD BE EF 31` embedded from offset 6.
pub const DUALI_ULTRALIGHT_ATR: [u8; 11] = [
    0x3B, 0x8A, 0x80, 0x01, 0xF0, 0x00, 0xDE, 0xAD, 0xBE, 0xEF, 0x31,
];

/// PC/SC bridge ATR announcing a Mifare Ultralight (card-name triplet
/// `03 00 03`).
pub const BRIDGE_ULTRALIGHT_ATR: [u8; 20] = [
    0x3B, 0x8F, 0x80, 0x01, 0x80, 0x4F, 0x0C, 0xA0, 0x00, 0x00, 0x03, 0x06, 0x03, 0x00, 0x03,
    0x00, 0x00, 0x00, 0x00, 0x68,
];

/// Append a success trailer to response data.
pub fn ok_response(data: &[u8]) -> Vec<u8> {
    let mut out = data.to_vec();
    out.extend_from_slice(&[0x90, 0x00]);
    out
}

/// A bare status-word response.
pub fn sw(sw1: u8, sw2: u8) -> Vec<u8> {
    vec![sw1, sw2]
}

/// A mock transport with one DUALi reader holding a card with the given
/// ATR. The UID comes from the ATR, so no response seeding is needed for
/// connect.
pub fn duali_transport_with_card(atr: Vec<u8>) -> MockTransport {
    let mock = MockTransport::new();
    mock.add_reader(DUALI_READER);
    mock.set_atr(atr);
    mock
}

/// A mock transport with one ACS reader holding a card with the given ATR.
/// Connecting issues a get-UID command, so the UID response is pre-seeded.
pub fn acs_transport_with_card(atr: Vec<u8>, uid: &[u8]) -> MockTransport {
    let mock = MockTransport::new();
    mock.add_reader(ACS_READER);
    mock.set_atr(atr);
    mock.push_response(ok_response(uid));
    mock
}

/// The biographic TLV record documented by the issuer, byte for byte.
pub fn sample_biographic_tlv() -> Vec<u8> {
    let mut out = Vec::new();
    let mut push = |tag: u8, value: &[u8]| {
        out.push(0x1F);
        out.push(tag);
        out.push(value.len() as u8);
        out.extend_from_slice(value);
    };
    push(0x01, "CHACÓN RANGEL".as_bytes());
    push(0x02, b"");
    push(0x03, b"JHOLLMAN");
    push(0x04, b"COL");
    push(0x05, b"18041975");
    push(0x06, b"SANTANDER/COL");
    push(0x07, b"54969846");
    push(0x08, &[0x14, 0x08, 0x20, 0x16]);
    push(0x09, b"30062019");
    push(0x0A, b"RESIDENTE LEGAL DNM 1114/05");
    out
}

/// An FCI template announcing `size` bytes for the given file.
pub fn fci_template(file_id: [u8; 2], size: u16) -> Vec<u8> {
    let [hi, lo] = size.to_be_bytes();
    vec![
        0x6F, 0x13, 0x81, 0x02, hi, lo, 0x82, 0x01, 0x01, 0x83, 0x02, file_id[0], file_id[1],
        0x8A, 0x01, 0x05, 0x8C, 0x03, 0x03,
    ]
}

/// Photo file contents: the `3F 01 82 <len16>` header followed by the
/// image bytes.
pub fn photo_file(image: &[u8]) -> Vec<u8> {
    let [hi, lo] = (image.len() as u16).to_be_bytes();
    let mut out = vec![0x3F, 0x01, 0x82, hi, lo];
    out.extend_from_slice(image);
    out
}

/// Queue every response a full document read will consume, in order:
/// applet select, biographic select/GET RESPONSE/read, photo
/// select/GET RESPONSE/chunked reads.
pub fn seed_document_read(mock: &MockTransport, biographic: &[u8], image: &[u8]) {
    // SELECT applet
    mock.push_response(sw(0x90, 0x00));
    // SELECT biographic file -> 61 xx, GET RESPONSE -> FCI
    mock.push_response(sw(0x61, 0x13));
    mock.push_response(ok_response(&fci_template(
        BIOGRAPHIC_FILE,
        biographic.len() as u16,
    )));
    // READ BINARY (fits one chunk)
    mock.push_response(ok_response(biographic));

    // SELECT applet again for the photo path
    mock.push_response(sw(0x90, 0x00));
    let file = photo_file(image);
    mock.push_response(sw(0x61, 0x13));
    mock.push_response(ok_response(&fci_template(PHOTO_FILE, file.len() as u16)));
    for chunk in file.chunks(255) {
        mock.push_response(ok_response(chunk));
    }
}
