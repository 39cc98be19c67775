//! 브리지 통합 테스트
//!
//! 로그 라인 스트림이 프레임 분리 → 분류 → 재조정 → 포매팅을 거쳐
//! 올바른 전송 형태로 나오는지, 그리고 파이프라인 전체가 파일
//! 수집부터 게임 내 응답까지 동작하는지 검증합니다.

use std::io::Write;
use std::time::Duration;

use tokio::time::timeout;

use msgpost_core::{Lang, MsgpostConfig, Notification, Pipeline, WebhookPayload};
use msgpost_bridge::classifier::{self, COMMAND_PREFIX};
use msgpost_bridge::notify::{format_notification, Outbound};
use msgpost_bridge::pipeline::{BridgePipelineBuilder, TellMessage};
use msgpost_bridge::reconciler::Reconciler;

/// 표준 서버 로그 라인을 만듭니다.
fn log_line(source: &str, content: &str) -> String {
    format!("[12:00:00] [{source}/INFO]: {content}")
}

/// 파이프라인 처리 루프와 동일한 라우팅으로 한 라인을 처리합니다.
fn process(reconciler: &mut Reconciler, line: &str, lang: Lang) -> Vec<Outbound> {
    let framed = classifier::frame(line);
    if let Some(name) = classifier::leave_signal(framed.content) {
        let notification = reconciler.player_left(name);
        return vec![format_notification(&notification, lang)];
    }
    if let Some((_, text)) = classifier::chat_utterance(framed.content) {
        if text.starts_with(COMMAND_PREFIX) {
            return Vec::new();
        }
    }
    let event = classifier::classify(framed.content, framed.source);
    reconciler
        .apply(&event)
        .iter()
        .map(|n| format_notification(n, lang))
        .collect()
}

#[test]
fn full_session_produces_expected_payloads() {
    let mut reconciler = Reconciler::new();
    let lang = Lang::EnUs;

    // 접속: 식별자 해석 라인에서 입장 embed가 나옵니다.
    let out = process(
        &mut reconciler,
        &log_line(
            "User Authenticator #1",
            "UUID of player Alice is aaaa-bbbb",
        ),
        lang,
    );
    assert_eq!(out.len(), 1);
    let Outbound::Webhook(WebhookPayload::Embeds { embeds }) = &out[0] else {
        panic!("expected join embed, got {:?}", out[0]);
    };
    assert_eq!(embeds[0].author.name, "Alice joined the game");
    assert!(embeds[0].author.icon_url.contains("aaaa-bbbb"));
    assert_eq!(embeds[0].color, 65280);

    // 채팅: 계정 이름으로 발화, 아바타 포함.
    let out = process(
        &mut reconciler,
        &log_line("Server thread", "<Alice> hello world"),
        lang,
    );
    let Outbound::Webhook(WebhookPayload::Chat {
        content,
        username,
        avatar_url,
    }) = &out[0]
    else {
        panic!("expected chat payload");
    };
    assert_eq!(content, "hello world");
    assert_eq!(username, "Alice");
    assert!(avatar_url.as_deref().unwrap().contains("aaaa-bbbb"));

    // 닉네임 설정: 플레이어에게 확인 응답이 갑니다.
    let out = process(
        &mut reconciler,
        &log_line("Server thread", "Set Alice's nickname to 'literal{Wonder}'."),
        lang,
    );
    assert_eq!(out.len(), 1);
    let Outbound::Tell { player, text } = &out[0] else {
        panic!("expected tell reply");
    };
    assert_eq!(player, "Alice");
    assert!(text.contains("Wonder"));

    // 닉네임 하의 채팅: 표시 이름은 닉네임, 아바타는 원 식별자.
    let out = process(
        &mut reconciler,
        &log_line("Server thread", "<Wonder> still me"),
        lang,
    );
    let Outbound::Webhook(WebhookPayload::Chat {
        username,
        avatar_url,
        ..
    }) = &out[0]
    else {
        panic!("expected chat payload");
    };
    assert_eq!(username, "Wonder");
    assert!(avatar_url.as_deref().unwrap().contains("aaaa-bbbb"));

    // 퇴장: 닉네임으로 표시되고 아바타가 유지됩니다.
    let out = process(
        &mut reconciler,
        &log_line("Server thread", "Wonder left the game"),
        lang,
    );
    let Outbound::Webhook(WebhookPayload::Embeds { embeds }) = &out[0] else {
        panic!("expected leave embed");
    };
    assert_eq!(embeds[0].author.name, "Wonder left the game");
    assert!(embeds[0].author.icon_url.contains("aaaa-bbbb"));
    assert_eq!(embeds[0].color, 16711680);

    // 퇴장 후 테이블은 비어 있습니다.
    assert!(reconciler.table().is_empty());
}

#[test]
fn untracked_player_chat_has_no_avatar() {
    let mut reconciler = Reconciler::new();
    let out = process(
        &mut reconciler,
        &log_line("Server thread", "<Ghost> anyone here"),
        Lang::EnUs,
    );
    let Outbound::Webhook(WebhookPayload::Chat { avatar_url, .. }) = &out[0] else {
        panic!("expected chat payload");
    };
    assert!(avatar_url.is_none());

    // 직렬화 결과에도 avatar_url 키가 없어야 합니다.
    let Outbound::Webhook(payload) = &out[0] else {
        unreachable!()
    };
    let json = serde_json::to_value(payload).unwrap();
    assert!(json.get("avatar_url").is_none());
}

#[test]
fn out_of_order_nickname_is_skipped() {
    let mut reconciler = Reconciler::new();
    // 식별자 해석 전에 닉네임 라인이 도착하는 경합.
    let out = process(
        &mut reconciler,
        &log_line("Server thread", "Set Alice's nickname to 'literal{Wonder}'."),
        Lang::EnUs,
    );
    assert!(out.is_empty());
    assert!(reconciler.table().is_empty());
    assert_eq!(reconciler.skipped(), 1);
}

#[test]
fn command_chat_is_not_forwarded() {
    let mut reconciler = Reconciler::new();
    let out = process(
        &mut reconciler,
        &log_line("Server thread", "<Alice> !!mp url https://example.com"),
        Lang::EnUs,
    );
    assert!(out.is_empty());
}

#[test]
fn leave_notification_localizes() {
    let mut reconciler = Reconciler::new();
    let notification = reconciler.player_left("Alice");
    assert!(matches!(notification, Notification::PlayerLeft { .. }));
    let Outbound::Webhook(WebhookPayload::Embeds { embeds }) =
        format_notification(&notification, Lang::ZhTw)
    else {
        panic!("expected embed");
    };
    assert_eq!(embeds[0].author.name, "Alice 離開了遊戲");
}

fn pipeline_config(dir: &std::path::Path) -> MsgpostConfig {
    let mut config = MsgpostConfig::default();
    config.watch.server_log = dir.join("latest.log").display().to_string();
    config.watch.poll_interval_ms = 10;
    config.admins = vec!["Alice".to_owned()];
    config
}

async fn append_line(path: &std::path::Path, line: &str) {
    // 수집기가 파일 끝으로 seek할 시간을 준 뒤에 덧붙입니다.
    tokio::time::sleep(Duration::from_millis(50)).await;
    let mut file = std::fs::OpenOptions::new().append(true).open(path).unwrap();
    writeln!(file, "{line}").unwrap();
    file.flush().unwrap();
}

#[tokio::test]
async fn pipeline_routes_help_command_to_tell_channel() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("latest.log");
    std::fs::write(&log_path, "").unwrap();

    let (mut pipeline, mut tell_rx) = BridgePipelineBuilder::new(pipeline_config(dir.path()))
        .build()
        .unwrap();
    pipeline.start().await.unwrap();

    append_line(&log_path, &log_line("Server thread", "<Alice> !!mp")).await;

    // 도움말은 헤더 + 부명령 두 줄, 총 세 줄입니다.
    let mut replies: Vec<TellMessage> = Vec::new();
    for _ in 0..3 {
        let msg = timeout(Duration::from_secs(3), tell_rx.recv())
            .await
            .expect("timed out waiting for reply")
            .expect("tell channel closed");
        replies.push(msg);
    }
    assert!(replies.iter().all(|m| m.player == "Alice"));
    assert!(replies[0].text.contains("msgpost"));
    assert!(replies[1].text.contains("url"));
    assert!(replies[2].text.contains("lang"));

    pipeline.stop().await.unwrap();
}

#[tokio::test]
async fn pipeline_persists_config_changed_by_command() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("latest.log");
    std::fs::write(&log_path, "").unwrap();
    let config_path = dir.path().join("config.json");

    let (mut pipeline, mut tell_rx) = BridgePipelineBuilder::new(pipeline_config(dir.path()))
        .config_path(&config_path)
        .build()
        .unwrap();
    pipeline.start().await.unwrap();

    append_line(&log_path, &log_line("Server thread", "<Alice> !!mp lang ZHTW")).await;

    // 응답은 새 언어로 옵니다.
    let msg = timeout(Duration::from_secs(3), tell_rx.recv())
        .await
        .expect("timed out waiting for reply")
        .expect("tell channel closed");
    assert!(msg.text.contains("完成!"));

    // 변경된 설정이 파일로 저장됩니다.
    let saved = timeout(Duration::from_secs(3), async {
        loop {
            if let Ok(text) = tokio::fs::read_to_string(&config_path).await {
                if text.contains("ZHTW") {
                    return text;
                }
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .expect("config file was not persisted");
    let parsed = MsgpostConfig::parse(&saved).unwrap();
    assert_eq!(parsed.lang, Lang::ZhTw);

    pipeline.stop().await.unwrap();
}

#[tokio::test]
async fn pipeline_denies_non_admin_command() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("latest.log");
    std::fs::write(&log_path, "").unwrap();

    let (mut pipeline, mut tell_rx) = BridgePipelineBuilder::new(pipeline_config(dir.path()))
        .build()
        .unwrap();
    pipeline.start().await.unwrap();

    append_line(
        &log_path,
        &log_line("Server thread", "<Bob> !!mp url https://example.com/hook"),
    )
    .await;

    let msg = timeout(Duration::from_secs(3), tell_rx.recv())
        .await
        .expect("timed out waiting for reply")
        .expect("tell channel closed");
    assert_eq!(msg.player, "Bob");
    assert!(msg.text.contains("Permission denied"));

    pipeline.stop().await.unwrap();
}
