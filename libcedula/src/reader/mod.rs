// libcedula/src/reader/mod.rs
//! Brand-aware reader handles.
//!
//! Each supported reader family speaks its own APDU dialect; the dialects
//! are closed, so dispatch is a plain `match` on [`ReaderBrand`] rather than
//! dynamic dispatch. The per-brand byte encodings live in the sibling
//! modules and stay bit-exact to the hardware.

pub mod acs;
pub mod duali;
pub mod identive;

use std::sync::Arc;

use log::{debug, warn};

use crate::atr;
use crate::card::CardSession;
use crate::protocol::{ApduCommand, ApduResponse};
use crate::transport::{CardIo, Transport};
use crate::types::{CardType, ReaderBrand, ReaderDescriptor, Uid};
use crate::{Error, Result};

/// A discovered reader, bound to the transport it was discovered on.
pub struct Reader {
    descriptor: ReaderDescriptor,
    transport: Arc<dyn Transport>,
}

impl Reader {
    pub fn new(descriptor: ReaderDescriptor, transport: Arc<dyn Transport>) -> Self {
        Self {
            descriptor,
            transport,
        }
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn brand(&self) -> ReaderBrand {
        self.descriptor.brand
    }

    pub fn descriptor(&self) -> &ReaderDescriptor {
        &self.descriptor
    }

    /// Connect to the card currently on the reader and build a live session:
    /// fetch the ATR, classify the card and derive its UID in the way this
    /// brand supports.
    pub fn connect(&self) -> Result<CardSession> {
        let mut handle = self.transport.connect(&self.descriptor.name)?;
        let atr_bytes = handle.atr()?;
        debug!(
            "reader '{}': ATR {}",
            self.descriptor.name,
            crate::utils::bytes_to_hex_spaced(&atr_bytes)
        );

        let card_type = classify(self.descriptor.brand, &atr_bytes);
        let uid = fetch_uid(self.descriptor.brand, handle.as_mut(), &atr_bytes)?;

        Ok(CardSession::new(
            handle,
            self.descriptor.clone(),
            atr_bytes,
            uid,
            card_type,
        ))
    }
}

/// Classify an ATR using the dialect this brand emits.
pub fn classify(brand: ReaderBrand, atr_bytes: &[u8]) -> CardType {
    match brand {
        ReaderBrand::Duali => atr::classify_fixed_offset(atr_bytes),
        ReaderBrand::Acs | ReaderBrand::Identive | ReaderBrand::Unknown => {
            atr::classify_pcsc_bridge(atr_bytes)
        }
    }
}

fn fetch_uid(brand: ReaderBrand, handle: &mut dyn CardIo, atr_bytes: &[u8]) -> Result<Uid> {
    match brand {
        ReaderBrand::Duali => atr::uid_from_atr(atr_bytes)
            .ok_or_else(|| Error::Parse("ATR carries no UID for this card family".to_string())),
        ReaderBrand::Acs | ReaderBrand::Identive | ReaderBrand::Unknown => {
            let resp = transmit(handle, &acs::get_uid())?;
            Ok(Uid::from_bytes(resp.data))
        }
    }
}

/// Send a command and require a successful status word.
///
/// `63 00` and `6A 81` come back as their short-form errors; any other
/// non-success trailer is surfaced with its full catalog outcome. An
/// all-zero trailer on an empty body is tolerated (a quirk of some bridge
/// firmware for commands without a response phase) but logged.
pub(crate) fn transmit(handle: &mut dyn CardIo, cmd: &ApduCommand) -> Result<ApduResponse> {
    let resp = exchange(handle, cmd)?;
    if resp.is_success() {
        return Ok(resp);
    }
    if resp.is_blank() {
        warn!("tolerating blank status word for {}", cmd.to_hex());
        return Ok(resp);
    }
    match (resp.sw1, resp.sw2) {
        (0x63, 0x00) => Err(Error::OperationFailed(resp.outcome)),
        (0x6A, 0x81) => Err(Error::OperationNotSupported(resp.outcome)),
        _ => Err(Error::Status(resp.outcome)),
    }
}

/// Send a command and hand back the parsed response without judging the
/// status word. Needed wherever `61 xx` (more data) is part of normal flow.
pub(crate) fn exchange(handle: &mut dyn CardIo, cmd: &ApduCommand) -> Result<ApduResponse> {
    let raw = handle.transceive(&cmd.encode())?;
    ApduResponse::parse(&raw)
}
