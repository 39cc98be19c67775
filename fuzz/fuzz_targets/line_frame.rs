#![no_main]

use libfuzzer_sys::fuzz_target;
use msgpost_bridge::classifier;

fuzz_target!(|data: &[u8]| {
    if let Ok(raw) = std::str::from_utf8(data) {
        let framed = classifier::frame(raw);
        let _ = classifier::classify(framed.content, framed.source);
    }
});
