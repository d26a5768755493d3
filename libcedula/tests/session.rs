// End-to-end document reading over the mock transport.

mod common;

use std::sync::Arc;

use common::fixtures::{self, ACS_READER, DUALI_READER};
use libcedula::cedula;
use libcedula::prelude::*;

#[test]
fn full_document_read_over_mock_card() {
    fixtures::init_logger();

    let mock = fixtures::duali_transport_with_card(fixtures::DUALI_ULTRALIGHT_ATR.to_vec());
    let biographic = fixtures::sample_biographic_tlv();
    let image = fixtures::large_fake_image();
    fixtures::seed_document_read(&mock, &biographic, &image);

    let ctx = SmartcardContext::open(Arc::new(mock.clone())).unwrap();
    let mut session = ctx.reader(DUALI_READER).unwrap().connect().unwrap();
    assert_eq!(session.card_type(), CardType::MifareUltralightFamily);

    let record = cedula::read_document(&mut session).unwrap();
    assert_eq!(record.first_surname, "CHACÓN RANGEL");
    assert_eq!(record.second_surname, "");
    assert_eq!(record.given_names, "JHOLLMAN");
    assert_eq!(record.document_number, "54969846");
    assert_eq!(record.photo.as_deref(), Some(&image[..]));

    let sent = mock.sent();
    // The exchange opens by selecting the IAS applet.
    assert_eq!(
        sent[0],
        vec![
            0x00, 0xA4, 0x04, 0x00, 0x0C, 0xA0, 0x00, 0x00, 0x00, 0x18, 0x40, 0x00, 0x00, 0x01,
            0x63, 0x42, 0x00
        ]
    );
    // File selects carry the two-byte identifiers.
    assert_eq!(
        sent[1],
        vec![0x00, 0xA4, 0x00, 0x00, 0x02, 0x70, 0x02, 0x00]
    );
    assert_eq!(
        sent[5],
        vec![0x00, 0xA4, 0x00, 0x00, 0x02, 0x70, 0x04, 0x00]
    );
}

#[test]
fn photo_reads_roll_the_offset_forward() {
    let mock = fixtures::duali_transport_with_card(fixtures::DUALI_ULTRALIGHT_ATR.to_vec());
    let image = fixtures::large_fake_image();

    // Seed only the photo path.
    mock.push_response(fixtures::sw(0x90, 0x00)); // SELECT applet
    let file = fixtures::photo_file(&image);
    mock.push_response(fixtures::sw(0x61, 0x13));
    mock.push_response(fixtures::ok_response(&fixtures::fci_template(
        [0x70, 0x04],
        file.len() as u16,
    )));
    for chunk in file.chunks(255) {
        mock.push_response(fixtures::ok_response(chunk));
    }

    let reader = Reader::new(ReaderDescriptor::new(DUALI_READER), Arc::new(mock.clone()));
    let mut session = reader.connect().unwrap();

    let photo = cedula::read_photo(&mut session).unwrap();
    assert_eq!(photo, image);

    // READ BINARY offsets: 0x0000, 0x00FF, 0x01FE ...
    let reads: Vec<(u8, u8)> = mock
        .sent()
        .iter()
        .filter(|cmd| cmd[1] == 0xB0)
        .map(|cmd| (cmd[2], cmd[3]))
        .collect();
    assert_eq!(reads[0], (0x00, 0x00));
    assert_eq!(reads[1], (0x00, 0xFF));
    assert_eq!(reads[2], (0x01, 0xFE));
}

#[test]
fn missing_file_surfaces_the_status_outcome() {
    let mock = fixtures::duali_transport_with_card(fixtures::DUALI_ULTRALIGHT_ATR.to_vec());
    mock.push_response(fixtures::sw(0x90, 0x00)); // SELECT applet
    mock.push_response(fixtures::sw(0x6A, 0x82)); // SELECT file fails

    let reader = Reader::new(ReaderDescriptor::new(DUALI_READER), Arc::new(mock));
    let mut session = reader.connect().unwrap();

    match cedula::read_biographic(&mut session) {
        Err(Error::Status(outcome)) => {
            assert_eq!(outcome.category, Category::Error);
            assert_eq!((outcome.sw1, outcome.sw2), (0x6A, 0x82));
        }
        other => panic!("expected status error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn acs_session_reads_pages_after_connect() {
    let mock = fixtures::acs_transport_with_card(
        fixtures::BRIDGE_ULTRALIGHT_ATR.to_vec(),
        &[0x04, 0x8C, 0x51, 0xEA],
    );
    mock.push_response(fixtures::ok_response(&[0x11, 0x22, 0x33, 0x44]));

    let ctx = SmartcardContext::open(Arc::new(mock.clone())).unwrap();
    let mut session = ctx.reader(ACS_READER).unwrap().connect().unwrap();

    assert_eq!(session.uid().to_hex(), "048c51ea");
    assert_eq!(session.uid().to_u64().unwrap(), 0x048C_51EA);
    assert_eq!(session.uid().to_u32_compat().unwrap(), 0xEA51_8C04);

    let page = session.read_page(0x04).unwrap();
    assert_eq!(&page[..4], &[0x11, 0x22, 0x33, 0x44]);
    assert_eq!(
        mock.sent().last().unwrap(),
        &vec![0xFF, 0xB0, 0x00, 0x04, 0x04]
    );
}
