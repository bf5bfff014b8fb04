#![no_main]

use libfuzzer_sys::fuzz_target;
use pubrecon::models::FilterQuery;

fuzz_target!(|data: &[u8]| {
    if let Ok(query) = serde_json::from_slice::<FilterQuery>(data) {
        let _ = query.validate();
    }
});
