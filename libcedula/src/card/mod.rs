// libcedula/src/card/mod.rs
//! Live card sessions.
//!
//! A [`CardSession`] is created by [`crate::reader::Reader::connect`] after a
//! successful connect and status query. It owns the card handle exclusively;
//! all I/O against one physical card is serialized by that ownership. Two
//! sessions on two different readers are fully independent.

mod info;

pub use info::CardInfo;

use log::debug;

use crate::constants::{KEY_LEN, PAGE_SIZE};
use crate::protocol::{ApduCommand, ApduResponse};
use crate::reader::{acs, duali, identive};
use crate::transport::CardIo;
use crate::types::{CardType, KeyType, ReaderBrand, ReaderDescriptor, Uid};
use crate::{Error, Result};

/// First page of the Ultralight user area; pages 0..4 hold UID, lock bytes
/// and the capability container.
const FIRST_USER_PAGE: u8 = 4;

/// The live handle to a connected card.
pub struct CardSession {
    handle: Box<dyn CardIo>,
    descriptor: ReaderDescriptor,
    atr: Vec<u8>,
    uid: Uid,
    card_type: CardType,
}

impl CardSession {
    pub(crate) fn new(
        handle: Box<dyn CardIo>,
        descriptor: ReaderDescriptor,
        atr: Vec<u8>,
        uid: Uid,
        card_type: CardType,
    ) -> Self {
        Self {
            handle,
            descriptor,
            atr,
            uid,
            card_type,
        }
    }

    pub fn reader_name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn brand(&self) -> ReaderBrand {
        self.descriptor.brand
    }

    pub fn atr(&self) -> &[u8] {
        &self.atr
    }

    pub fn atr_hex(&self) -> String {
        crate::utils::bytes_to_hex_spaced(&self.atr)
    }

    pub fn uid(&self) -> &Uid {
        &self.uid
    }

    pub fn card_type(&self) -> CardType {
        self.card_type
    }

    /// Load a six-byte sector key into the reader.
    pub fn load_key(&mut self, key_type: KeyType, key: &[u8]) -> Result<()> {
        let key: &[u8; KEY_LEN] = key.try_into().map_err(|_| Error::InvalidLength {
            expected: KEY_LEN,
            actual: key.len(),
        })?;
        let cmd = match self.descriptor.brand {
            ReaderBrand::Duali => duali::load_key(key_type, key)?,
            ReaderBrand::Identive => identive::load_key(key_type, key)?,
            ReaderBrand::Acs | ReaderBrand::Unknown => acs::load_key(key_type, key)?,
        };
        self.transmit(&cmd).map(|_| ())
    }

    /// Authenticate a sector with a previously loaded key.
    pub fn authenticate(&mut self, key_type: KeyType, sector: u8) -> Result<()> {
        let cmd = match self.descriptor.brand {
            ReaderBrand::Duali => return Err(Error::UnsupportedOperation("authenticate")),
            ReaderBrand::Identive => identive::authenticate(key_type, sector)?,
            ReaderBrand::Acs | ReaderBrand::Unknown => acs::authenticate(key_type, sector)?,
        };
        self.transmit(&cmd).map(|_| ())
    }

    /// Read one 4-byte page. Readers may append trailing bytes; the returned
    /// buffer is at least [`PAGE_SIZE`] bytes on success.
    pub fn read_page(&mut self, page: u8) -> Result<Vec<u8>> {
        let cmd = match self.descriptor.brand {
            ReaderBrand::Duali => duali::read_page(page)?,
            ReaderBrand::Identive => identive::read_page(page),
            ReaderBrand::Acs | ReaderBrand::Unknown => acs::read_page(page),
        };
        let resp = self.transmit(&cmd)?;
        if resp.data.len() < PAGE_SIZE {
            return Err(Error::InvalidLength {
                expected: PAGE_SIZE,
                actual: resp.data.len(),
            });
        }
        Ok(resp.data)
    }

    /// Write one page. The buffer must be exactly four bytes.
    pub fn write_page(&mut self, page: u8, data: &[u8]) -> Result<()> {
        let data: &[u8; PAGE_SIZE] = data.try_into().map_err(|_| Error::InvalidLength {
            expected: PAGE_SIZE,
            actual: data.len(),
        })?;
        let cmd = match self.descriptor.brand {
            ReaderBrand::Duali => duali::write_page(page, data)?,
            ReaderBrand::Identive => identive::write_page(page, data)?,
            ReaderBrand::Acs | ReaderBrand::Unknown => acs::write_page(page, data)?,
        };
        self.transmit(&cmd).map(|_| ())
    }

    /// Send an arbitrary command, requiring a successful status word.
    pub fn transmit(&mut self, cmd: &ApduCommand) -> Result<ApduResponse> {
        crate::reader::transmit(self.handle.as_mut(), cmd)
    }

    /// Send an arbitrary command and return the response as-is, leaving
    /// status-word interpretation to the caller.
    pub fn exchange(&mut self, cmd: &ApduCommand) -> Result<ApduResponse> {
        crate::reader::exchange(self.handle.as_mut(), cmd)
    }

    /// Query the reader for basic information about the card on the RF
    /// field (escape command `FF CC 00 00 01 11`).
    pub fn card_info(&mut self) -> Result<CardInfo> {
        let cmd = ApduCommand::case3(0xFF, 0xCC, 0x00, 0x00, 0x01, vec![0x11])?;
        let resp = self.transmit(&cmd)?;
        CardInfo::from_response(&resp.data)
    }

    fn require_ultralight(&self) -> Result<()> {
        if self.card_type != CardType::MifareUltralightFamily {
            return Err(Error::UnsupportedOperation(
                "only Mifare Ultralight family tags support this",
            ));
        }
        Ok(())
    }

    /// Read the 144-byte user area (pages 4..40).
    pub fn read_all(&mut self) -> Result<Vec<u8>> {
        self.require_ultralight()?;
        const USER_BYTES: usize = 144;
        let pages = USER_BYTES / PAGE_SIZE;
        let mut out = Vec::with_capacity(USER_BYTES);
        for i in 0..pages {
            let page = self.read_page(FIRST_USER_PAGE + i as u8)?;
            out.extend_from_slice(&page[..PAGE_SIZE]);
        }
        Ok(out)
    }

    /// Write `data` into the user area starting at page 4. The buffer must
    /// be a whole number of pages.
    pub fn write_all(&mut self, data: &[u8]) -> Result<()> {
        self.require_ultralight()?;
        if data.is_empty() || data.len() % PAGE_SIZE != 0 {
            return Err(Error::InvalidLength {
                expected: data.len().div_ceil(PAGE_SIZE).max(1) * PAGE_SIZE,
                actual: data.len(),
            });
        }
        for (i, chunk) in data.chunks(PAGE_SIZE).enumerate() {
            self.write_page(FIRST_USER_PAGE + i as u8, chunk)?;
        }
        Ok(())
    }

    /// Format the tag for NDEF: write the capability container and an empty
    /// NDEF TLV. Refuses tags that are locked or already formatted.
    pub fn ndef_format(&mut self) -> Result<()> {
        self.require_ultralight()?;

        let lock_page = self.read_page(0x02)?;
        if lock_page[2] != 0x00 || lock_page[3] != 0x00 {
            return Err(Error::NotFormattable("tag is locked"));
        }
        let cc_page = self.read_page(0x03)?;
        if cc_page[..PAGE_SIZE].iter().any(|&b| b != 0x00) {
            return Err(Error::NotFormattable("tag is already formatted"));
        }

        // CC for NTAG203/Ultralight C capacity
        self.write_page(0x03, &[0xE1, 0x10, 0x12, 0x00])?;
        // Empty NDEF record plus terminator
        self.write_page(0x04, &[0x03, 0x00, 0xFE, 0x00])
    }

    /// Set the lock bytes, making the tag read-only. Irreversible.
    pub fn lock(&mut self) -> Result<()> {
        self.require_ultralight()?;
        self.write_page(0x02, &[0x00, 0x00, 0xFF, 0xFF])
    }

    /// Release the underlying handle early. Dropping the session does the
    /// same.
    pub fn disconnect(mut self) -> Result<()> {
        debug!("disconnecting card on '{}'", self.descriptor.name);
        self.handle.disconnect()
    }
}

impl std::fmt::Debug for CardSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardSession")
            .field("reader", &self.descriptor.name)
            .field("brand", &self.descriptor.brand)
            .field("card_type", &self.card_type)
            .field("uid", &self.uid.to_hex())
            .finish()
    }
}
