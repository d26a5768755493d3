// libcedula/src/transport/pcsc.rs
//! PC/SC-backed [`Transport`]. Enabled with the `pcsc` feature.
//!
//! The platform resource manager (winscard on Windows, pcsc-lite elsewhere)
//! is reached through the pcsc crate. The context is owned by the
//! [`PcscTransport`] value and released when it is dropped, on every exit
//! path.

use std::ffi::CString;
use std::time::Duration;

use log::debug;
use pcsc::{Attribute, Card, Context, Disposition, Protocols, Scope, ShareMode, MAX_BUFFER_SIZE};

use crate::transport::traits::{CardIo, ReaderStatus, Transport};
use crate::types::StateFlags;
use crate::{Error, Result};

pub struct PcscTransport {
    ctx: Context,
}

impl PcscTransport {
    /// Establish a user-scope context with the resource manager.
    pub fn new() -> Result<Self> {
        Ok(Self {
            ctx: Context::establish(Scope::User)?,
        })
    }
}

fn reader_cname(name: &str) -> Result<CString> {
    CString::new(name).map_err(|_| Error::ReaderNotFound(name.to_string()))
}

impl Transport for PcscTransport {
    fn list_readers(&self) -> Result<Vec<String>> {
        let mut buf = [0u8; 2048];
        let readers = self.ctx.list_readers(&mut buf)?;
        Ok(readers
            .map(|r| r.to_string_lossy().into_owned())
            .collect())
    }

    fn connect(&self, reader_name: &str) -> Result<Box<dyn CardIo>> {
        let cname = reader_cname(reader_name)?;
        let card = self
            .ctx
            .connect(&cname, ShareMode::Shared, Protocols::ANY)?;
        debug!("connected to card on {}", reader_name);
        Ok(Box::new(PcscCard { card: Some(card) }))
    }

    fn get_status_change(&self, timeout_ms: u64, states: &mut [ReaderStatus]) -> Result<bool> {
        let mut reader_states = Vec::with_capacity(states.len());
        for state in states.iter() {
            // DWORD is wider than u32 on some platforms; the flag bits fit
            // either way.
            reader_states.push(pcsc::ReaderState::new(
                reader_cname(&state.name)?,
                pcsc::State::from_bits_truncate(state.current.0.into()),
            ));
        }

        match self
            .ctx
            .get_status_change(Duration::from_millis(timeout_ms), &mut reader_states)
        {
            Ok(()) => {
                for (state, reader_state) in states.iter_mut().zip(reader_states.iter()) {
                    state.event = StateFlags(reader_state.event_state().bits() as u32);
                }
                Ok(true)
            }
            Err(pcsc::Error::Timeout) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

struct PcscCard {
    card: Option<Card>,
}

impl PcscCard {
    fn card(&self) -> Result<&Card> {
        self.card
            .as_ref()
            .ok_or_else(|| Error::Transport("card disconnected".to_string()))
    }
}

impl CardIo for PcscCard {
    fn transceive(&mut self, command: &[u8]) -> Result<Vec<u8>> {
        debug!("TX: {}", crate::utils::bytes_to_hex_spaced(command));
        let mut buf = [0u8; MAX_BUFFER_SIZE];
        let received = self.card()?.transmit(command, &mut buf)?;
        debug!("RX: {}", crate::utils::bytes_to_hex_spaced(received));
        Ok(received.to_vec())
    }

    fn atr(&self) -> Result<Vec<u8>> {
        Ok(self.card()?.get_attribute_owned(Attribute::AtrString)?)
    }

    fn disconnect(&mut self) -> Result<()> {
        if let Some(card) = self.card.take() {
            card.disconnect(Disposition::UnpowerCard)
                .map_err(|(_, e)| Error::from(e))?;
        }
        Ok(())
    }
}
