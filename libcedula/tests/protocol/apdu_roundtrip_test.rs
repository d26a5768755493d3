use libcedula::protocol::{ApduCommand, ApduResponse};
use proptest::prelude::*;

#[test]
fn build_then_parse_recovers_payload() {
    let payload = vec![0xA0, 0x00, 0x00, 0x00, 0x18, 0x40];
    let cmd = ApduCommand::case3(0x00, 0xA4, 0x04, 0x00, 0x06, payload.clone()).unwrap();
    let wire = cmd.encode();

    // Echo the data portion back with a success trailer, as a loopback
    // card would.
    let mut echoed = wire[5..].to_vec();
    echoed.extend_from_slice(&[0x90, 0x00]);

    let resp = ApduResponse::parse(&echoed).unwrap();
    assert_eq!(resp.data, payload);
    assert!(resp.is_success());

    // The crate's own hex rendering agrees with the hex crate.
    assert_eq!(libcedula::bytes_to_hex(&wire), hex::encode(&wire));
}

proptest! {
    #[test]
    fn case3_roundtrip_prop(payload in prop::collection::vec(any::<u8>(), 0..=255)) {
        let lc = payload.len() as u8;
        let cmd = ApduCommand::case3(0x00, 0xD6, 0x00, 0x00, lc, payload.clone()).unwrap();
        let wire = cmd.encode();
        prop_assert_eq!(wire.len(), 5 + payload.len());
        prop_assert_eq!(wire[4], lc);

        let mut echoed = wire[5..].to_vec();
        echoed.extend_from_slice(&[0x90, 0x00]);
        let resp = ApduResponse::parse(&echoed).unwrap();
        prop_assert!(resp.is_success());
        prop_assert_eq!(resp.data, payload);
    }

    #[test]
    fn parse_never_reads_out_of_bounds(raw in prop::collection::vec(any::<u8>(), 0..300)) {
        match ApduResponse::parse(&raw) {
            Ok(resp) => {
                prop_assert!(raw.len() >= 2);
                prop_assert_eq!(resp.data.len(), raw.len() - 2);
            }
            Err(_) => prop_assert!(raw.len() < 2),
        }
    }
}
