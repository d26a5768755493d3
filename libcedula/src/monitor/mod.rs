// libcedula/src/monitor/mod.rs
//! Background presence polling.
//!
//! Each [`PollingMonitor`] owns one thread blocking on
//! [`Transport::get_status_change`] for a single reader. Insert/remove edges
//! are delivered as [`CardEvent`]s over an mpsc channel; consumers read them
//! on their own schedule. The polling thread is the only writer of the
//! per-reader state, so no locks are involved.
//!
//! Stopping is cooperative: a flag checked once per wait cycle. The blocking
//! wait itself is not interrupted, so shutdown latency is bounded by the
//! polling interval.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use log::{debug, error, info, warn};

use crate::card::CardSession;
use crate::constants::{POLL_INTERVAL_MS, PRIME_TIMEOUT_MS};
use crate::reader::Reader;
use crate::transport::{ReaderStatus, Transport};
use crate::types::ReaderDescriptor;
use crate::{Error, Result};

/// An edge observed on a reader.
#[derive(Debug)]
pub enum CardEvent {
    /// A card appeared and a session was established.
    Inserted(CardSession),
    /// The card left the field.
    Removed,
}

/// Handle to a running per-reader polling thread.
pub struct PollingMonitor {
    stop: Arc<AtomicBool>,
    handle: JoinHandle<Result<()>>,
}

impl PollingMonitor {
    /// Start polling the given reader. Events arrive on the returned
    /// channel.
    pub fn spawn(
        transport: Arc<dyn Transport>,
        descriptor: ReaderDescriptor,
    ) -> (Self, Receiver<CardEvent>) {
        Self::spawn_with_interval(transport, descriptor, POLL_INTERVAL_MS)
    }

    /// As [`PollingMonitor::spawn`], with an explicit blocking interval in
    /// milliseconds.
    pub fn spawn_with_interval(
        transport: Arc<dyn Transport>,
        descriptor: ReaderDescriptor,
        interval_ms: u64,
    ) -> (Self, Receiver<CardEvent>) {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        let (tx, rx) = mpsc::channel();
        let handle = thread::spawn(move || run(transport, descriptor, tx, flag, interval_ms));
        (Self { stop, handle }, rx)
    }

    /// Request the loop to stop, wait for the thread, and surface its
    /// result. A monitor that died on a transport failure reports that
    /// failure here.
    pub fn stop(self) -> Result<()> {
        self.stop.store(true, Ordering::Relaxed);
        match self.handle.join() {
            Ok(result) => result,
            Err(_) => Err(Error::Transport("polling thread panicked".to_string())),
        }
    }

    /// Whether the polling thread is still running.
    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }
}

fn run(
    transport: Arc<dyn Transport>,
    descriptor: ReaderDescriptor,
    events: Sender<CardEvent>,
    stop: Arc<AtomicBool>,
    interval_ms: u64,
) -> Result<()> {
    let reader = Reader::new(descriptor.clone(), Arc::clone(&transport));
    let mut states = vec![ReaderStatus::new(descriptor.name.clone())];

    // Priming call: learn the baseline state without emitting events. A
    // timeout here just leaves the baseline unaware.
    if transport.get_status_change(PRIME_TIMEOUT_MS, &mut states)? {
        states[0].current = states[0].event;
    }
    info!("polling '{}'", descriptor.name);

    while !stop.load(Ordering::Relaxed) {
        match transport.get_status_change(interval_ms, &mut states) {
            // Timeout: nothing changed, keep waiting.
            Ok(false) => continue,
            Ok(true) => {
                let state = &mut states[0];
                if state.event.is_changed() {
                    if state.event.is_present() && !state.current.is_present() {
                        debug!("'{}': card inserted", descriptor.name);
                        match reader.connect() {
                            Ok(session) => {
                                if events.send(CardEvent::Inserted(session)).is_err() {
                                    // Receiver gone; nothing left to notify.
                                    return Ok(());
                                }
                            }
                            // No session, no event.
                            Err(e) => warn!("'{}': connect failed: {}", descriptor.name, e),
                        }
                    } else if state.event.is_empty_slot() && !state.current.is_empty_slot() {
                        debug!("'{}': card removed", descriptor.name);
                        if events.send(CardEvent::Removed).is_err() {
                            return Ok(());
                        }
                    }
                }
                // Always compare the next wakeup against the latest
                // observed state.
                state.current = state.event;
            }
            Err(e) => {
                error!("'{}': status wait failed: {}", descriptor.name, e);
                return Err(e);
            }
        }
    }

    info!("stopped polling '{}'", descriptor.name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{STATE_CHANGED, STATE_EMPTY, STATE_PRESENT};
    use crate::test_support;
    use crate::transport::mock::{MockTransport, StatusStep};
    use std::time::Duration;

    fn recv(rx: &Receiver<CardEvent>) -> CardEvent {
        rx.recv_timeout(Duration::from_secs(2)).expect("event")
    }

    fn duali_mock() -> MockTransport {
        test_support::duali_transport_with_card(test_support::DUALI_ULTRALIGHT_ATR.to_vec())
    }

    #[test]
    fn insert_then_remove_fires_one_event_each() {
        let mock = duali_mock();
        mock.push_status(StatusStep::Event(STATE_EMPTY)); // priming baseline
        mock.push_status(StatusStep::Event(STATE_CHANGED | STATE_PRESENT));
        mock.push_status(StatusStep::Timeout);
        mock.push_status(StatusStep::Event(STATE_CHANGED | STATE_EMPTY));

        let (monitor, rx) = PollingMonitor::spawn_with_interval(
            Arc::new(mock),
            ReaderDescriptor::new("DUALi DE-620"),
            5,
        );

        match recv(&rx) {
            CardEvent::Inserted(session) => {
                assert_eq!(session.reader_name(), "DUALi DE-620");
            }
            other => panic!("expected insert, got {:?}", other),
        }
        match recv(&rx) {
            CardEvent::Removed => {}
            other => panic!("expected removal, got {:?}", other),
        }

        // The surrounding no-change polls must not have produced duplicates.
        assert!(rx.try_recv().is_err());
        monitor.stop().unwrap();
    }

    #[test]
    fn repeated_present_state_does_not_duplicate_insert() {
        let mock = duali_mock();
        mock.push_status(StatusStep::Event(STATE_EMPTY)); // priming
        mock.push_status(StatusStep::Event(STATE_CHANGED | STATE_PRESENT));
        // Same edge reported again, e.g. an exclusive-bit flip.
        mock.push_status(StatusStep::Event(STATE_CHANGED | STATE_PRESENT));

        let (monitor, rx) = PollingMonitor::spawn_with_interval(
            Arc::new(mock),
            ReaderDescriptor::new("DUALi DE-620"),
            5,
        );

        assert!(matches!(recv(&rx), CardEvent::Inserted(_)));
        assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());
        monitor.stop().unwrap();
    }

    #[test]
    fn failed_connect_swallows_the_event() {
        let mock = duali_mock();
        mock.set_connect_failures(1);
        mock.push_status(StatusStep::Event(STATE_EMPTY)); // priming
        mock.push_status(StatusStep::Event(STATE_CHANGED | STATE_PRESENT));

        let (monitor, rx) = PollingMonitor::spawn_with_interval(
            Arc::new(mock),
            ReaderDescriptor::new("DUALi DE-620"),
            5,
        );

        assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());
        monitor.stop().unwrap();
    }

    #[test]
    fn transport_failure_is_fatal_and_surfaced() {
        let mock = duali_mock();
        mock.push_status(StatusStep::Event(STATE_EMPTY)); // priming
        mock.push_status(StatusStep::Fail("resource manager shut down".to_string()));

        let (monitor, _rx) = PollingMonitor::spawn_with_interval(
            Arc::new(mock),
            ReaderDescriptor::new("DUALi DE-620"),
            5,
        );

        // Give the loop a moment to hit the failure.
        std::thread::sleep(Duration::from_millis(100));
        assert!(!monitor.is_running());
        assert!(matches!(monitor.stop(), Err(Error::Transport(_))));
    }

    #[test]
    fn stop_is_cooperative() {
        let mock = duali_mock();
        mock.push_status(StatusStep::Event(STATE_EMPTY)); // priming

        let (monitor, rx) = PollingMonitor::spawn_with_interval(
            Arc::new(mock),
            ReaderDescriptor::new("DUALi DE-620"),
            5,
        );
        monitor.stop().unwrap();
        // Channel closes with the thread.
        assert!(rx.recv().is_err());
    }
}
