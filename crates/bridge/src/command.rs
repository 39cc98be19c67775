//! 채팅 명령 -- `!!mp` 명령 계열 처리
//!
//! 명령은 채팅 발화로 도착하며 (`<Alice> !!mp lang ZHTW`) 절대
//! webhook으로 중계되지 않습니다. 응답 대상은 [`CommandSource`]
//! capability trait 뒤에 있어 플레이어/콘솔 어느 쪽이든 동일하게
//! 처리됩니다.
//!
//! # 명령 표면
//! - `!!mp` — 도움말
//! - `!!mp url <webhook>` — webhook URL 설정 (권한 레벨 4 필요)
//! - `!!mp lang <lang>` — 언어 설정 (권한 레벨 4 필요, 알 수 없는
//!   태그 거부)

use msgpost_core::config::MsgpostConfig;
use msgpost_core::types::Lang;

use crate::lang::catalog;
use crate::notify::{branded, color};

/// 명령 루트 토큰
pub const COMMAND_ROOT: &str = "!!mp";

/// 설정을 변경하는 명령에 필요한 권한 레벨
pub const PERMISSION_ADMIN: u8 = 4;

/// 파싱된 명령
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `!!mp`
    Help,
    /// `!!mp url <webhook>`
    SetUrl(String),
    /// `!!mp lang <lang>`
    SetLang(String),
}

/// 명령 실행 주체
///
/// 원 구현의 덕 타이핑된 플레이어/콘솔 소스를 단일 `reply` 연산을
/// 갖는 capability trait으로 재설계한 것입니다.
pub trait CommandSource {
    /// 주체 이름 (플레이어 이름 또는 "console")
    fn name(&self) -> &str;

    /// 권한 레벨 (관리자 명령은 [`PERMISSION_ADMIN`] 이상)
    fn permission_level(&self) -> u8;

    /// 주체에게 텍스트 한 줄을 응답합니다.
    fn reply(&mut self, text: String);
}

/// 게임 내 플레이어 명령 주체
///
/// 응답은 내부 버퍼에 쌓이고, 파이프라인이 꺼내 게임 서버
/// 콘솔(`tell`)로 전달합니다.
#[derive(Debug)]
pub struct PlayerSource {
    name: String,
    permission_level: u8,
    replies: Vec<String>,
}

impl PlayerSource {
    /// 설정의 관리자 목록을 반영하여 플레이어 주체를 만듭니다.
    pub fn new(name: impl Into<String>, config: &MsgpostConfig) -> Self {
        let name = name.into();
        let permission_level = if config.admins.iter().any(|admin| admin == &name) {
            PERMISSION_ADMIN
        } else {
            1
        };
        Self {
            name,
            permission_level,
            replies: Vec::new(),
        }
    }

    /// 쌓인 응답을 비우고 반환합니다.
    pub fn take_replies(&mut self) -> Vec<String> {
        std::mem::take(&mut self.replies)
    }
}

impl CommandSource for PlayerSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn permission_level(&self) -> u8 {
        self.permission_level
    }

    fn reply(&mut self, text: String) {
        self.replies.push(text);
    }
}

/// 서버 콘솔 명령 주체 — 항상 관리자 권한을 갖습니다.
#[derive(Debug, Default)]
pub struct ConsoleSource {
    replies: Vec<String>,
}

impl ConsoleSource {
    /// 콘솔 주체를 만듭니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 쌓인 응답을 비우고 반환합니다.
    pub fn take_replies(&mut self) -> Vec<String> {
        std::mem::take(&mut self.replies)
    }
}

impl CommandSource for ConsoleSource {
    fn name(&self) -> &str {
        "console"
    }

    fn permission_level(&self) -> u8 {
        PERMISSION_ADMIN
    }

    fn reply(&mut self, text: String) {
        self.replies.push(text);
    }
}

/// 발화 텍스트를 명령으로 파싱합니다.
///
/// `!!mp`로 시작하지 않거나 인자 형태가 맞지 않으면 `None`입니다
/// (파이프라인은 무시합니다).
pub fn parse(text: &str) -> Option<Command> {
    let rest = text.strip_prefix(COMMAND_ROOT)?;
    let args: Vec<&str> = rest.split_whitespace().collect();
    match args.as_slice() {
        [] => Some(Command::Help),
        ["url", webhook] => Some(Command::SetUrl((*webhook).to_owned())),
        ["lang", lang] => Some(Command::SetLang((*lang).to_owned())),
        _ => None,
    }
}

/// 명령을 실행합니다.
///
/// 설정이 변경되어 저장이 필요하면 `true`를 반환합니다.
pub fn handle(config: &mut MsgpostConfig, src: &mut dyn CommandSource, command: Command) -> bool {
    let cat = catalog(config.lang);
    match command {
        Command::Help => {
            src.reply(branded(&format!("{}:", cat.help)));
            src.reply(format!(
                "    {}!!mp url <url>{} {}",
                color::RED,
                color::WHITE,
                cat.set_webhook_url
            ));
            src.reply(format!(
                "    {}!!mp lang <language (ZHTW/ENUS)>{} {}",
                color::RED,
                color::WHITE,
                cat.set_language
            ));
            false
        }

        Command::SetUrl(webhook) => {
            if src.permission_level() < PERMISSION_ADMIN {
                src.reply(branded(&format!("{}{}", color::RED, cat.permission_denied)));
                tracing::info!(source = src.name(), "url command denied");
                return false;
            }
            if !webhook.starts_with("http://") && !webhook.starts_with("https://") {
                src.reply(branded(&format!(
                    "{}{} {}invalid url{}!",
                    color::RED,
                    cat.error,
                    color::YELLOW,
                    color::RED
                )));
                return false;
            }
            config.webhook_url = webhook;
            src.reply(branded(&format!("{}{}", color::GREEN, cat.done)));
            tracing::info!(source = src.name(), "webhook url updated");
            true
        }

        Command::SetLang(tag) => {
            if src.permission_level() < PERMISSION_ADMIN {
                src.reply(branded(&format!("{}{}", color::RED, cat.permission_denied)));
                tracing::info!(source = src.name(), "lang command denied");
                return false;
            }
            let Ok(lang) = tag.parse::<Lang>() else {
                src.reply(branded(&format!("{}{}", color::RED, cat.invalid_language)));
                return false;
            };
            config.lang = lang;
            // 응답은 새로 설정된 언어로
            let cat = catalog(lang);
            src.reply(branded(&format!("{}{}", color::GREEN, cat.done)));
            tracing::info!(source = src.name(), lang = %lang, "language updated");
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin_config() -> MsgpostConfig {
        MsgpostConfig {
            admins: vec!["Alice".to_owned()],
            ..Default::default()
        }
    }

    #[test]
    fn parses_command_forms() {
        assert_eq!(parse("!!mp"), Some(Command::Help));
        assert_eq!(
            parse("!!mp url https://example.com/hook"),
            Some(Command::SetUrl("https://example.com/hook".to_owned()))
        );
        assert_eq!(
            parse("!!mp lang ZHTW"),
            Some(Command::SetLang("ZHTW".to_owned()))
        );
        assert_eq!(parse("!!mp bogus"), None);
        assert_eq!(parse("hello"), None);
    }

    #[test]
    fn help_replies_usage_without_mutating_config() {
        let mut config = MsgpostConfig::default();
        let mut src = ConsoleSource::new();
        let changed = handle(&mut config, &mut src, Command::Help);

        assert!(!changed);
        let replies = src.take_replies();
        assert_eq!(replies.len(), 3);
        assert!(replies[1].contains("!!mp url"));
        assert!(replies[2].contains("!!mp lang"));
    }

    #[test]
    fn admin_player_can_set_url() {
        let config_src = admin_config();
        let mut config = config_src.clone();
        let mut src = PlayerSource::new("Alice", &config_src);
        let changed = handle(
            &mut config,
            &mut src,
            Command::SetUrl("https://example.com/hook".to_owned()),
        );

        assert!(changed);
        assert_eq!(config.webhook_url, "https://example.com/hook");
        assert!(src.take_replies()[0].contains(color::GREEN));
    }

    #[test]
    fn non_admin_player_is_denied() {
        let config_src = admin_config();
        let mut config = config_src.clone();
        let mut src = PlayerSource::new("Bob", &config_src);
        let changed = handle(
            &mut config,
            &mut src,
            Command::SetUrl("https://example.com/hook".to_owned()),
        );

        assert!(!changed);
        assert_eq!(config.webhook_url, "");
        assert!(src.take_replies()[0].contains("Permission denied"));
    }

    #[test]
    fn malformed_url_is_rejected() {
        let mut config = MsgpostConfig::default();
        let mut src = ConsoleSource::new();
        let changed = handle(
            &mut config,
            &mut src,
            Command::SetUrl("not-a-url".to_owned()),
        );

        assert!(!changed);
        assert_eq!(config.webhook_url, "");
    }

    #[test]
    fn set_lang_replies_in_new_language() {
        let mut config = MsgpostConfig::default();
        let mut src = ConsoleSource::new();
        let changed = handle(&mut config, &mut src, Command::SetLang("ZHTW".to_owned()));

        assert!(changed);
        assert_eq!(config.lang, Lang::ZhTw);
        assert!(src.take_replies()[0].contains("完成"));
    }

    #[test]
    fn unknown_lang_tag_is_rejected() {
        let mut config = MsgpostConfig::default();
        let mut src = ConsoleSource::new();
        let changed = handle(&mut config, &mut src, Command::SetLang("KOKR".to_owned()));

        assert!(!changed);
        assert_eq!(config.lang, Lang::EnUs);
        assert!(src.take_replies()[0].contains("Invalid language"));
    }

    #[test]
    fn console_always_has_admin_permission() {
        let src = ConsoleSource::new();
        assert_eq!(src.permission_level(), PERMISSION_ADMIN);
        assert_eq!(src.name(), "console");
    }
}
