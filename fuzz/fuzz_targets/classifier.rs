#![no_main]

use libfuzzer_sys::fuzz_target;
use msgpost_bridge::classifier;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        let _ = classifier::classify(content, "User Authenticator #1");
        let _ = classifier::classify(content, "Server thread");
        let _ = classifier::chat_utterance(content);
        let _ = classifier::leave_signal(content);
    }
});
