// libcedula/src/transport/mod.rs

pub mod mock;
#[cfg(feature = "pcsc")]
pub mod pcsc;
pub mod traits;

pub use traits::{CardIo, ReaderStatus, Transport};

#[cfg(feature = "pcsc")]
pub use self::pcsc::PcscTransport;
