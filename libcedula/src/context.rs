// libcedula/src/context.rs
//! Owned entry point tying a transport to readers and monitors.
//!
//! A [`SmartcardContext`] is a plain value: construct it with
//! [`SmartcardContext::open`], let it go out of scope to release the
//! underlying transport context on every exit path. Nothing here is
//! process-global.

use std::sync::mpsc::Receiver;
use std::sync::Arc;

use log::info;

use crate::monitor::{CardEvent, PollingMonitor};
use crate::reader::Reader;
use crate::transport::Transport;
use crate::types::ReaderDescriptor;
use crate::{Error, Result};

pub struct SmartcardContext {
    transport: Arc<dyn Transport>,
    readers: Vec<ReaderDescriptor>,
}

impl SmartcardContext {
    /// Open a context over the given transport and enumerate its readers.
    /// Brands are derived from the reader names once, here.
    pub fn open(transport: Arc<dyn Transport>) -> Result<Self> {
        let readers: Vec<ReaderDescriptor> = transport
            .list_readers()?
            .into_iter()
            .map(ReaderDescriptor::new)
            .collect();
        info!("found {} reader(s)", readers.len());
        Ok(Self { transport, readers })
    }

    /// Open a context on the platform PC/SC resource manager.
    #[cfg(feature = "pcsc")]
    pub fn open_pcsc() -> Result<Self> {
        Self::open(Arc::new(crate::transport::PcscTransport::new()?))
    }

    /// The readers discovered at open time, in resource-manager order.
    pub fn readers(&self) -> &[ReaderDescriptor] {
        &self.readers
    }

    /// A handle to the named reader.
    pub fn reader(&self, name: &str) -> Result<Reader> {
        let descriptor = self
            .readers
            .iter()
            .find(|r| r.name == name)
            .cloned()
            .ok_or_else(|| Error::ReaderNotFound(name.to_string()))?;
        Ok(Reader::new(descriptor, Arc::clone(&self.transport)))
    }

    /// A handle to the first discovered reader.
    pub fn first_reader(&self) -> Result<Reader> {
        let descriptor = self
            .readers
            .first()
            .cloned()
            .ok_or(Error::NoReadersAvailable)?;
        Ok(Reader::new(descriptor, Arc::clone(&self.transport)))
    }

    /// Start presence polling on the named reader.
    pub fn monitor(&self, name: &str) -> Result<(PollingMonitor, Receiver<CardEvent>)> {
        let descriptor = self
            .readers
            .iter()
            .find(|r| r.name == name)
            .cloned()
            .ok_or_else(|| Error::ReaderNotFound(name.to_string()))?;
        Ok(PollingMonitor::spawn(
            Arc::clone(&self.transport),
            descriptor,
        ))
    }
}
