#![no_main]

use libfuzzer_sys::fuzz_target;
use pubrecon::sources::arxiv;

fuzz_target!(|data: &[u8]| {
    if let Ok(xml) = std::str::from_utf8(data) {
        // Zero page size must not divide by zero either
        let _ = arxiv::parse_feed(xml, 0);
        let _ = arxiv::parse_feed(xml, 50);
    }
});
