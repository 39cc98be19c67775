//! 도메인 타입 — 시스템 전역에서 사용되는 공통 타입
//!
//! 브리지 파이프라인이 생성하는 알림과 webhook으로 전송되는
//! payload 구조를 정의합니다. payload는 표준 채팅 webhook JSON
//! 바디와 비트 호환이어야 합니다.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// 입장 알림 embed 색상 (녹색)
pub const COLOR_JOIN: u32 = 65280;
/// 퇴장 알림 embed 색상 (적색)
pub const COLOR_LEAVE: u32 = 16711680;

/// 알림 메시지 언어
///
/// 설정 파일과 `!!mp lang` 명령에서 사용하는 태그는
/// `"ENUS"` / `"ZHTW"` 두 가지만 허용됩니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lang {
    /// 영어 (기본값)
    #[default]
    #[serde(rename = "ENUS")]
    EnUs,
    /// 정체자 중국어
    #[serde(rename = "ZHTW")]
    ZhTw,
}

impl Lang {
    /// 설정 파일에 기록되는 언어 태그를 반환합니다.
    pub fn tag(&self) -> &'static str {
        match self {
            Lang::EnUs => "ENUS",
            Lang::ZhTw => "ZHTW",
        }
    }
}

impl FromStr for Lang {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ENUS" => Ok(Lang::EnUs),
            "ZHTW" => Ok(Lang::ZhTw),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// 플레이어에게 전달되는 로컬 응답 메시지
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerMessage {
    /// 닉네임이 새 표시 이름으로 변경됨
    NicknameUpdated { nickname: String },
    /// 닉네임이 제거되어 계정 이름으로 복귀함
    NicknameRemoved,
}

/// 재조정기가 생성하는 파생 알림
///
/// 식별자(identity)는 세션 중 불변인 불투명 토큰입니다.
/// 표시 이름은 계정 이름이거나 현재 닉네임일 수 있습니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// 플레이어 입장 — 식별자 해석 시점에 발생
    PlayerJoined {
        /// 현재 표시 이름 (닉네임이 추적 중이면 닉네임)
        display_name: String,
        /// 해석된 플레이어 식별자
        identity: String,
    },
    /// 플레이어 퇴장
    PlayerLeft {
        /// 퇴장한 플레이어의 표시 이름
        display_name: String,
        /// 추적 중이던 식별자 (미해석 상태로 퇴장하면 None)
        identity: Option<String>,
    },
    /// 채팅 메시지 중계
    Chat {
        /// 발화자 표시 이름
        display_name: String,
        /// 메시지 본문 (원문 그대로)
        text: String,
        /// 발화자 식별자 (미해석이면 None — avatar 생략)
        identity: Option<String>,
    },
    /// 게임 내 플레이어에게 보내는 로컬 응답
    TellPlayer {
        /// 대상 플레이어의 계정 이름
        player: String,
        /// 응답 내용
        message: PlayerMessage,
    },
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notification::PlayerJoined {
                display_name,
                identity,
            } => write!(f, "PlayerJoined[{display_name}] identity={identity}"),
            Notification::PlayerLeft {
                display_name,
                identity,
            } => write!(
                f,
                "PlayerLeft[{display_name}] identity={}",
                identity.as_deref().unwrap_or("unknown"),
            ),
            Notification::Chat {
                display_name, text, ..
            } => write!(f, "Chat[{display_name}] {text}"),
            Notification::TellPlayer { player, .. } => write!(f, "TellPlayer[{player}]"),
        }
    }
}

/// embed 작성자 블록
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedAuthor {
    /// 작성자 표시 문자열 (예: "Alice joined the game")
    pub name: String,
    /// 아바타 이미지 URL
    pub icon_url: String,
}

/// 입장/퇴장 알림 embed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Embed {
    /// 작성자 블록
    pub author: EmbedAuthor,
    /// 색상 코드 ([`COLOR_JOIN`] / [`COLOR_LEAVE`])
    pub color: u32,
}

/// 외부 webhook으로 전송되는 payload
///
/// 두 가지 와이어 형태만 존재합니다. `untagged` 직렬화로
/// JSON 바디에 variant 이름이 노출되지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WebhookPayload {
    /// 채팅 중계: `{content, username, avatar_url?}`
    Chat {
        /// 메시지 본문
        content: String,
        /// 발화자 표시 이름
        username: String,
        /// 아바타 URL — 식별자가 없으면 필드 자체를 생략
        #[serde(skip_serializing_if = "Option::is_none")]
        avatar_url: Option<String>,
    },
    /// 입장/퇴장: `{embeds: [{author, color}]}`
    Embeds {
        /// embed 목록 (항상 1개)
        embeds: Vec<Embed>,
    },
}
