// libcedula/src/prelude.rs

pub use crate::card::{CardInfo, CardSession};
pub use crate::cedula::{CedulaRecord, Date};
pub use crate::context::SmartcardContext;
pub use crate::monitor::{CardEvent, PollingMonitor};
pub use crate::protocol::{ApduCommand, ApduResponse, Category, StatusOutcome};
pub use crate::reader::Reader;
pub use crate::transport::{CardIo, ReaderStatus, Transport};
pub use crate::{
    CardType, Error, KeyType, ReaderBrand, ReaderDescriptor, Result, StateFlags, Uid,
};

// Re-export small utilities for convenience
pub use crate::utils::{bytes_to_hex, bytes_to_hex_spaced, default_read_timeout, ms, parse_hex};
