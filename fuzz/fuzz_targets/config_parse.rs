#![no_main]

use libfuzzer_sys::fuzz_target;
use msgpost_core::MsgpostConfig;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(config) = MsgpostConfig::parse(text) {
            // 파싱에 성공한 설정은 다시 직렬화 가능해야 합니다.
            let _ = serde_json::to_string(&config);
            let _ = config.validate();
        }
    }
});
