#![no_main]

use libfuzzer_sys::fuzz_target;
use pubrecon::sources::symplectic;

fuzz_target!(|data: &[u8]| {
    if let Ok(xml) = std::str::from_utf8(data) {
        let _ = symplectic::parse_feed(xml);
        let _ = symplectic::parse_relationships(xml);
    }
});
