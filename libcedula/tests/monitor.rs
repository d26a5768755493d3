// Presence-polling integration: events drive a full document read.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::fixtures::{self, DUALI_READER};
use libcedula::cedula;
use libcedula::constants::{STATE_CHANGED, STATE_EMPTY, STATE_PRESENT};
use libcedula::prelude::*;
use libcedula::transport::mock::StatusStep;

#[test]
fn inserted_session_is_usable_until_removal() {
    fixtures::init_logger();

    let mock = fixtures::duali_transport_with_card(fixtures::DUALI_ULTRALIGHT_ATR.to_vec());
    let biographic = fixtures::sample_biographic_tlv();
    let image = fixtures::large_fake_image();
    fixtures::seed_document_read(&mock, &biographic, &image);

    mock.push_status(StatusStep::Event(STATE_EMPTY)); // priming baseline
    mock.push_status(StatusStep::Event(STATE_CHANGED | STATE_PRESENT));
    mock.push_status(StatusStep::Timeout);
    mock.push_status(StatusStep::Event(STATE_CHANGED | STATE_EMPTY));

    let ctx = SmartcardContext::open(Arc::new(mock)).unwrap();
    let (monitor, events) = ctx.monitor(DUALI_READER).unwrap();

    let mut session = match events.recv_timeout(Duration::from_secs(2)).unwrap() {
        CardEvent::Inserted(session) => session,
        CardEvent::Removed => panic!("removal before insertion"),
    };

    let record = cedula::read_document(&mut session).unwrap();
    assert_eq!(record.given_names, "JHOLLMAN");
    assert_eq!(
        record.birth_date.map(|d| d.to_string()).as_deref(),
        Some("1975-04-18")
    );

    match events.recv_timeout(Duration::from_secs(2)).unwrap() {
        CardEvent::Removed => {}
        CardEvent::Inserted(_) => panic!("duplicate insertion"),
    }

    monitor.stop().unwrap();
}

#[test]
fn two_monitors_on_two_readers_are_independent() {
    // Each monitor owns its own thread and state; stopping one must not
    // disturb the other.
    let first = fixtures::duali_transport_with_card(fixtures::DUALI_ULTRALIGHT_ATR.to_vec());
    first.push_status(StatusStep::Event(STATE_EMPTY));
    first.push_status(StatusStep::Event(STATE_CHANGED | STATE_PRESENT));

    let second = fixtures::duali_transport_with_card(fixtures::DUALI_ULTRALIGHT_ATR.to_vec());
    second.push_status(StatusStep::Event(STATE_EMPTY));

    let (monitor_a, events_a) = PollingMonitor::spawn_with_interval(
        Arc::new(first),
        ReaderDescriptor::new(DUALI_READER),
        5,
    );
    let (monitor_b, events_b) = PollingMonitor::spawn_with_interval(
        Arc::new(second),
        ReaderDescriptor::new(DUALI_READER),
        5,
    );

    assert!(matches!(
        events_a.recv_timeout(Duration::from_secs(2)).unwrap(),
        CardEvent::Inserted(_)
    ));
    monitor_a.stop().unwrap();

    // The second monitor saw nothing and is still alive.
    assert!(events_b.try_recv().is_err());
    assert!(monitor_b.is_running());
    monitor_b.stop().unwrap();
}
