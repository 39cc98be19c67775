#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use msgpost_bridge::classifier::LogEvent;
use msgpost_bridge::reconciler::Reconciler;

/// 퍼저용 구조적 입력
#[derive(Arbitrary, Debug)]
enum FuzzEvent {
    Join { name: String, identity: String },
    Nick { name: String, nickname: String },
    Clear { name: String },
    Chat { name: String, text: String },
    Leave { name: String },
}

fuzz_target!(|events: Vec<FuzzEvent>| {
    let mut reconciler = Reconciler::new();
    // 이벤트 수 제한 (과도한 입력으로 인한 타임아웃 방지)
    for event in events.into_iter().take(64) {
        match event {
            FuzzEvent::Join { name, identity } => {
                let _ = reconciler.apply(&LogEvent::IdentityResolved {
                    original_name: name,
                    identity,
                });
            }
            FuzzEvent::Nick { name, nickname } => {
                let _ = reconciler.apply(&LogEvent::NicknameSet {
                    original_name: name,
                    new_nickname: nickname,
                });
            }
            FuzzEvent::Clear { name } => {
                let _ = reconciler.apply(&LogEvent::NicknameCleared {
                    original_name: name,
                });
            }
            FuzzEvent::Chat { name, text } => {
                let _ = reconciler.apply(&LogEvent::PlainChat {
                    player_name: name,
                    text,
                });
            }
            FuzzEvent::Leave { name } => {
                let _ = reconciler.player_left(&name);
            }
        }
    }
});
