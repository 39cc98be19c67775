//! 알림 포매터 -- 도메인 알림을 외부 전송 형태로 변환
//!
//! 순수 함수로 구성됩니다. [`Notification`]과 활성 언어를 받아
//! webhook payload 또는 게임 내 응답 텍스트를 만듭니다. 식별자가
//! 없으면 avatar 참조를 아예 생략합니다 (깨진 URL을 만들지 않음).

use msgpost_core::types::{
    COLOR_JOIN, COLOR_LEAVE, Embed, EmbedAuthor, Lang, Notification, PlayerMessage, WebhookPayload,
};

use crate::lang::catalog;

/// 아바타 이미지 서비스의 기본 URL
pub const AVATAR_BASE_URL: &str = "https://crafatar.com/avatars/";

/// 게임 내 텍스트 색상 코드
pub mod color {
    /// 하늘색 (브랜드 프리픽스)
    pub const AQUA: &str = "§b";
    /// 흰색 (본문 복귀)
    pub const WHITE: &str = "§f";
    /// 적색 (에러, 명령 강조)
    pub const RED: &str = "§c";
    /// 녹색 (성공)
    pub const GREEN: &str = "§a";
    /// 황색 (부가 정보)
    pub const YELLOW: &str = "§e";
}

/// 포매터 출력 — 외부 webhook 또는 게임 내 로컬 응답
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    /// webhook endpoint로 전송할 payload
    Webhook(WebhookPayload),
    /// 게임 서버 콘솔을 통해 플레이어에게 전달할 텍스트
    Tell {
        /// 대상 플레이어 (계정 이름)
        player: String,
        /// 색상 코드가 포함된 응답 텍스트
        text: String,
    },
}

/// 식별자의 아바타 URL을 만듭니다.
pub fn avatar_url(identity: &str) -> String {
    format!("{AVATAR_BASE_URL}{identity}")
}

/// 브랜드 프리픽스가 붙은 게임 내 텍스트를 만듭니다.
pub fn branded(body: &str) -> String {
    format!("[{}msgpost{}] {body}", color::AQUA, color::WHITE)
}

/// 알림 하나를 전송 형태로 변환합니다.
pub fn format_notification(notification: &Notification, lang: Lang) -> Outbound {
    let cat = catalog(lang);
    match notification {
        Notification::PlayerJoined {
            display_name,
            identity,
        } => Outbound::Webhook(WebhookPayload::Embeds {
            embeds: vec![Embed {
                author: EmbedAuthor {
                    name: format!("{display_name} {}", cat.join),
                    icon_url: avatar_url(identity),
                },
                color: COLOR_JOIN,
            }],
        }),
        Notification::PlayerLeft {
            display_name,
            identity,
        } => Outbound::Webhook(WebhookPayload::Embeds {
            embeds: vec![Embed {
                author: EmbedAuthor {
                    name: format!("{display_name} {}", cat.left),
                    // 미해석 퇴장은 빈 icon_url (아바타 없음)
                    icon_url: identity.as_deref().map(avatar_url).unwrap_or_default(),
                },
                color: COLOR_LEAVE,
            }],
        }),
        Notification::Chat {
            display_name,
            text,
            identity,
        } => Outbound::Webhook(WebhookPayload::Chat {
            content: text.clone(),
            username: display_name.clone(),
            avatar_url: identity.as_deref().map(avatar_url),
        }),
        Notification::TellPlayer { player, message } => {
            let text = match message {
                PlayerMessage::NicknameUpdated { nickname } => branded(&format!(
                    "{}{} {nickname}",
                    color::GREEN,
                    cat.nickname_update
                )),
                PlayerMessage::NicknameRemoved => {
                    branded(&format!("{}{}", color::GREEN, cat.nickname_remove))
                }
            };
            Outbound::Tell {
                player: player.clone(),
                text,
            }
        }
    }
}
