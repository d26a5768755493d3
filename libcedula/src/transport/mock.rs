// libcedula/src/transport/mock.rs

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::transport::traits::{CardIo, ReaderStatus, Transport};
use crate::types::StateFlags;
use crate::{Error, Result};

/// One scripted result for a `get_status_change` call.
#[derive(Debug, Clone)]
pub enum StatusStep {
    /// The wait elapsed with no change.
    Timeout,
    /// The wait returned with these event flags for the first reader.
    Event(u32),
    /// The wait failed at the transport level.
    Fail(String),
}

#[derive(Debug, Default)]
struct MockInner {
    readers: Vec<String>,
    atr: Vec<u8>,
    status_script: VecDeque<StatusStep>,
    responses: VecDeque<Vec<u8>>,
    sent: Vec<Vec<u8>>,
    connect_failures: usize,
}

/// Mock transport for unit tests. It records transmitted payloads, returns
/// queued responses, and plays back a scripted sequence of status changes.
///
/// Cloning yields another handle onto the same state so tests can keep
/// asserting after handing the transport to a session or monitor.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    inner: Arc<Mutex<MockInner>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_reader(&self, name: impl Into<String>) {
        self.inner.lock().unwrap().readers.push(name.into());
    }

    pub fn set_atr(&self, atr: Vec<u8>) {
        self.inner.lock().unwrap().atr = atr;
    }

    pub fn push_response(&self, resp: Vec<u8>) {
        self.inner.lock().unwrap().responses.push_back(resp);
    }

    pub fn push_status(&self, step: StatusStep) {
        self.inner.lock().unwrap().status_script.push_back(step);
    }

    /// Set how many subsequent connect calls should fail (for tests).
    pub fn set_connect_failures(&self, n: usize) {
        self.inner.lock().unwrap().connect_failures = n;
    }

    /// Every payload transmitted so far, oldest first.
    pub fn sent(&self) -> Vec<Vec<u8>> {
        self.inner.lock().unwrap().sent.clone()
    }
}

impl Transport for MockTransport {
    fn list_readers(&self) -> Result<Vec<String>> {
        Ok(self.inner.lock().unwrap().readers.clone())
    }

    fn connect(&self, reader_name: &str) -> Result<Box<dyn CardIo>> {
        let mut inner = self.inner.lock().unwrap();
        if !inner.readers.iter().any(|r| r == reader_name) {
            return Err(Error::ReaderNotFound(reader_name.to_string()));
        }
        if inner.connect_failures > 0 {
            inner.connect_failures -= 1;
            return Err(Error::Transport("no smartcard in reader".to_string()));
        }
        Ok(Box::new(MockCard {
            inner: Arc::clone(&self.inner),
            open: true,
        }))
    }

    fn get_status_change(&self, _timeout_ms: u64, states: &mut [ReaderStatus]) -> Result<bool> {
        let step = self.inner.lock().unwrap().status_script.pop_front();
        match step {
            // Exhausted script behaves like an idle reader.
            None | Some(StatusStep::Timeout) => Ok(false),
            Some(StatusStep::Event(flags)) => {
                if let Some(state) = states.first_mut() {
                    state.event = StateFlags(flags);
                }
                Ok(true)
            }
            Some(StatusStep::Fail(msg)) => Err(Error::Transport(msg)),
        }
    }
}

/// Card handle produced by [`MockTransport::connect`]. Shares the response
/// queue and sent log with its transport.
#[derive(Debug)]
pub struct MockCard {
    inner: Arc<Mutex<MockInner>>,
    open: bool,
}

impl CardIo for MockCard {
    fn transceive(&mut self, command: &[u8]) -> Result<Vec<u8>> {
        if !self.open {
            return Err(Error::Transport("card disconnected".to_string()));
        }
        let mut inner = self.inner.lock().unwrap();
        inner.sent.push(command.to_vec());
        inner.responses.pop_front().ok_or(Error::Timeout)
    }

    fn atr(&self) -> Result<Vec<u8>> {
        Ok(self.inner.lock().unwrap().atr.clone())
    }

    fn disconnect(&mut self) -> Result<()> {
        self.open = false;
        Ok(())
    }
}
