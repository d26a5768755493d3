// libcedula/src/cedula/reader.rs
//! Reading the document files off the card.
//!
//! The sequence mirrors what the issuer's applet expects: SELECT the IAS
//! applet by AID, SELECT the target file by identifier, fetch the FCI
//! template (via GET RESPONSE when the card answers `61 xx`), take the file
//! size from it, then pull the contents with successive READ BINARY
//! commands of at most 255 bytes, rolling the offset forward.

use log::{debug, info};

use crate::card::CardSession;
use crate::cedula::{decode, CedulaRecord};
use crate::protocol::{ApduCommand, ApduResponse};
use crate::{Error, Result};

/// AID of the IAS applet hosting the document files.
pub const APPLET_AID: [u8; 12] = [
    0xA0, 0x00, 0x00, 0x00, 0x18, 0x40, 0x00, 0x00, 0x01, 0x63, 0x42, 0x00,
];

/// File identifier of the biographic TLV record.
pub const BIOGRAPHIC_FILE: [u8; 2] = [0x70, 0x02];

/// File identifier of the holder's photo.
pub const PHOTO_FILE: [u8; 2] = [0x70, 0x04];

/// The photo file starts with `3F 01 82 <len16>` before the image payload.
const PHOTO_HEADER_LEN: usize = 5;

/// Largest slice a single READ BINARY may return.
const READ_CHUNK: usize = 255;

/// Read the full document: biographics plus photo.
pub fn read_document(session: &mut CardSession) -> Result<CedulaRecord> {
    let mut record = decode(&read_biographic(session)?)?;
    record.photo = Some(read_photo(session)?);
    info!(
        "read document {} from '{}'",
        record.document_number,
        session.reader_name()
    );
    Ok(record)
}

/// Read the raw biographic TLV buffer.
pub fn read_biographic(session: &mut CardSession) -> Result<Vec<u8>> {
    select_applet(session)?;
    let size = select_file(session, BIOGRAPHIC_FILE)?;
    debug!("biographic file: {} bytes", size);
    read_binary_all(session, size)
}

/// Read the photo payload: the file contents minus the five header bytes.
/// The bytes are handed back opaque; decoding the image format is the
/// caller's business.
pub fn read_photo(session: &mut CardSession) -> Result<Vec<u8>> {
    select_applet(session)?;
    let size = select_file(session, PHOTO_FILE)?;
    debug!("photo file: {} bytes", size);
    let raw = read_binary_all(session, size)?;
    if raw.len() < PHOTO_HEADER_LEN {
        return Err(Error::Parse(format!(
            "photo file shorter than its {}-byte header",
            PHOTO_HEADER_LEN
        )));
    }
    Ok(raw[PHOTO_HEADER_LEN..].to_vec())
}

/// SELECT the IAS applet by AID.
fn select_applet(session: &mut CardSession) -> Result<()> {
    let cmd = ApduCommand::case3(
        0x00,
        0xA4,
        0x04,
        0x00,
        APPLET_AID.len() as u8,
        APPLET_AID.to_vec(),
    )?;
    let resp = session.exchange(&cmd)?;
    if resp.is_success() || resp.sw1 == 0x61 {
        Ok(())
    } else {
        Err(Error::Status(resp.outcome))
    }
}

/// SELECT a file by identifier and return its size from the FCI template.
fn select_file(session: &mut CardSession, file_id: [u8; 2]) -> Result<u16> {
    let cmd = ApduCommand::case4(0x00, 0xA4, 0x00, 0x00, 0x02, file_id.to_vec(), 0x00)?;
    let resp = session.exchange(&cmd)?;

    let fci = if resp.sw1 == 0x61 {
        // T=0 flow: the FCI waits behind a GET RESPONSE of sw2 bytes.
        let resp = expect_success(session.exchange(&ApduCommand::case2(
            0x00, 0xC0, 0x00, 0x00, resp.sw2,
        ))?)?;
        resp.data
    } else if resp.is_success() && !resp.data.is_empty() {
        // T=1 stacks return the FCI directly.
        resp.data
    } else {
        return Err(Error::Status(resp.outcome));
    };

    fci_file_size(&fci)
}

/// Extract the file size from an FCI template: `6F <len> 81 02 <size16> ...`
/// with the size big-endian at offsets 4..6.
pub fn fci_file_size(fci: &[u8]) -> Result<u16> {
    if fci.len() < 6 {
        return Err(Error::Parse(format!(
            "FCI template too short: {} bytes",
            fci.len()
        )));
    }
    if fci[0] != 0x6F {
        return Err(Error::Parse(format!(
            "not an FCI template (leading byte {:02x})",
            fci[0]
        )));
    }
    Ok(u16::from_be_bytes([fci[4], fci[5]]))
}

/// Pull `size` bytes of the selected file with READ BINARY commands, at
/// most [`READ_CHUNK`] bytes each, the 16-bit offset split across P1/P2.
fn read_binary_all(session: &mut CardSession, size: u16) -> Result<Vec<u8>> {
    let size = size as usize;
    let mut out = Vec::with_capacity(size);
    while out.len() < size {
        let remaining = size - out.len();
        let le = remaining.min(READ_CHUNK) as u8;
        let [p1, p2] = (out.len() as u16).to_be_bytes();
        let resp = expect_success(session.exchange(&ApduCommand::case2(0x00, 0xB0, p1, p2, le))?)?;
        if resp.data.is_empty() {
            return Err(Error::Parse(format!(
                "short read: got {} of {} bytes",
                out.len(),
                size
            )));
        }
        out.extend_from_slice(&resp.data);
    }
    out.truncate(size);
    Ok(out)
}

fn expect_success(resp: ApduResponse) -> Result<ApduResponse> {
    if resp.is_success() {
        Ok(resp)
    } else {
        Err(Error::Status(resp.outcome))
    }
}
