use libcedula::protocol::{describe, Category};

#[test]
fn canonical_outcomes() {
    assert_eq!(describe(0x90, 0x00).category, Category::Info);
    assert_eq!(describe(0x6A, 0x82).category, Category::Error);
    assert_eq!(describe(0x62, 0x81).category, Category::Warning);
    assert_eq!(describe(0x66, 0x00).category, Category::Security);
}

#[test]
fn every_pair_is_described() {
    // Totality: no (SW1, SW2) pair may panic or come back empty.
    for sw1 in 0u8..=0xFF {
        for sw2 in 0u8..=0xFF {
            let outcome = describe(sw1, sw2);
            assert_eq!(outcome.sw1, sw1);
            assert_eq!(outcome.sw2, sw2);
            assert!(!outcome.text.is_empty());
        }
    }
}

#[test]
fn fallback_outcome_for_unlisted_codes() {
    let outcome = describe(0x42, 0x42);
    assert_eq!(outcome.category, Category::Error);
    assert_eq!(outcome.text, "unrecognized status word");
}

#[test]
fn parameterized_families() {
    assert!(describe(0x61, 0x7B).text.contains("123 bytes"));
    assert!(describe(0x6C, 0x04).text.contains("04"));
    assert!(describe(0x63, 0xC0).text.contains("0 tries left"));
    assert!(describe(0x92, 0x03).text.contains("3 attempts"));
}
