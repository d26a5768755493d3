// fixtures.rs — integration-test fixtures on top of libcedula::test_support

#![allow(dead_code)]

pub use libcedula::test_support::*;

use std::sync::Once;

static LOGGER: Once = Once::new();

/// Install the test logger once. `RUST_LOG=debug cargo test` shows wire
/// traffic.
pub fn init_logger() {
    LOGGER.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// A tiny stand-in for the JPEG payload: just enough bytes to exercise the
/// chunked read path across several READ BINARY commands.
pub fn large_fake_image() -> Vec<u8> {
    let mut image = vec![0xFF, 0xD8, 0xFF, 0xE0];
    image.extend((0..700usize).map(|i| (i % 251) as u8));
    image
}
