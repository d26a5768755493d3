// libcedula/src/transport/traits.rs

use crate::types::StateFlags;
use crate::Result;

/// Per-reader slot status exchanged with [`Transport::get_status_change`].
#[derive(Debug, Clone)]
pub struct ReaderStatus {
    pub name: String,
    pub current: StateFlags,
    pub event: StateFlags,
}

impl ReaderStatus {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            current: StateFlags::UNAWARE,
            event: StateFlags::UNAWARE,
        }
    }
}

/// Transport trait abstracts the platform resource manager away from the
/// protocol layer. Implementations own the underlying context and release it
/// when dropped.
pub trait Transport: Send + Sync {
    /// Enumerate reader names, in the order the resource manager reports
    /// them.
    fn list_readers(&self) -> Result<Vec<String>>;

    /// Connect to the card currently present in the named reader.
    fn connect(&self, reader_name: &str) -> Result<Box<dyn CardIo>>;

    /// Block until a reader state changes or the timeout expires.
    ///
    /// Returns `Ok(true)` when `states` was updated with fresh event flags,
    /// `Ok(false)` on timeout (normal flow for a polling loop), and an error
    /// for any real transport failure.
    fn get_status_change(&self, timeout_ms: u64, states: &mut [ReaderStatus]) -> Result<bool>;
}

/// A connected card handle. Single-owner: all I/O against one physical card
/// is serialized by ownership, not locks.
pub trait CardIo: Send {
    /// Send raw command bytes and return the raw response bytes.
    fn transceive(&mut self, command: &[u8]) -> Result<Vec<u8>>;

    /// Fetch the card's ATR.
    fn atr(&self) -> Result<Vec<u8>>;

    /// Release the handle early. Implementations also release on drop, so
    /// calling this is optional and must be idempotent.
    fn disconnect(&mut self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::mock::MockTransport;

    #[test]
    fn trait_object_connect_and_transceive() {
        let mock = MockTransport::new();
        mock.add_reader("ACS ACR122U 00");
        mock.push_response(vec![0x01, 0x02, 0x90, 0x00]);

        let transport: &dyn Transport = &mock;
        assert_eq!(transport.list_readers().unwrap(), vec!["ACS ACR122U 00"]);

        let mut card = transport.connect("ACS ACR122U 00").unwrap();
        let resp = card.transceive(&[0xFF, 0xCA, 0x00, 0x00, 0x00]).unwrap();
        assert_eq!(resp, vec![0x01, 0x02, 0x90, 0x00]);
        assert_eq!(mock.sent(), vec![vec![0xFF, 0xCA, 0x00, 0x00, 0x00]]);
    }

    #[test]
    fn reader_status_starts_unaware() {
        let status = ReaderStatus::new("reader");
        assert_eq!(status.current, StateFlags::UNAWARE);
        assert_eq!(status.event, StateFlags::UNAWARE);
    }
}
