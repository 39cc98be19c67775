//! 설정 관리 — msgpost.json 파싱 및 런타임 설정
//!
//! [`MsgpostConfig`]는 브리지 전체의 설정을 담는 최상위 구조체입니다.
//! 설정 파일은 JSON 객체이며 최상위에 `webhook_url`과 `lang`을
//! 둡니다. 두 필드만 있는 파일도 그대로 로드됩니다.
//!
//! # 설정 로딩 우선순위
//! 1. 환경변수 (`MSGPOST_WEBHOOK_URL=...` 형식)
//! 2. 설정 파일 (`msgpost.json`)
//! 3. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), msgpost_core::error::MsgpostError> {
//! use msgpost_core::config::MsgpostConfig;
//!
//! // 파일에서 로드 (없으면 기본값으로 생성) + 환경변수 오버라이드
//! let config = MsgpostConfig::load("msgpost.json").await?;
//!
//! // JSON 문자열에서 직접 파싱
//! let config = MsgpostConfig::parse(r#"{"webhook_url": "", "lang": "ENUS"}"#)?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, MsgpostError};
use crate::types::Lang;

/// msgpost 통합 설정
///
/// `webhook_url`과 `lang`은 채팅 명령(`!!mp url`, `!!mp lang`)으로
/// 런타임에 변경되고 파일에 다시 저장됩니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MsgpostConfig {
    /// 알림을 전송할 webhook endpoint. 비어 있으면 전송이 비활성화됩니다.
    #[serde(default)]
    pub webhook_url: String,
    /// 알림 메시지 언어
    #[serde(default)]
    pub lang: Lang,
    /// 관리자 권한(레벨 4)을 갖는 플레이어 이름 목록
    ///
    /// 원 호스트는 자체 권한 시스템을 갖지만, 독립 실행 데몬은
    /// 이 목록으로 `!!mp url` / `!!mp lang` 명령 권한을 판정합니다.
    #[serde(default)]
    pub admins: Vec<String>,
    /// 일반 설정 (로깅)
    #[serde(default)]
    pub general: GeneralConfig,
    /// 서버 로그 감시 설정
    #[serde(default)]
    pub watch: WatchConfig,
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 출력 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

/// 서버 로그 감시 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// 감시할 게임 서버 로그 파일 경로
    pub server_log: String,
    /// 파일 상태 체크 주기 (밀리초)
    pub poll_interval_ms: u64,
    /// 한 번에 읽을 최대 라인 수
    pub max_lines_per_read: usize,
    /// 최대 라인 길이 (바이트)
    pub max_line_length: usize,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            server_log: "logs/latest.log".to_owned(),
            poll_interval_ms: 500,
            max_lines_per_read: 1000,
            max_line_length: 16 * 1024,
        }
    }
}

impl MsgpostConfig {
    /// JSON 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    ///
    /// 파일이 없으면 기본 설정으로 파일을 생성한 뒤 기본값을
    /// 반환합니다 (최초 실행 시나리오).
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, MsgpostError> {
        let path = path.as_ref();
        let mut config = match Self::from_file(path).await {
            Ok(config) => config,
            Err(MsgpostError::Config(ConfigError::FileNotFound { .. })) => {
                let config = Self::default();
                config.save(path).await?;
                tracing::info!(path = %path.display(), "created default config file");
                config
            }
            Err(e) => return Err(e),
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// JSON 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, MsgpostError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                MsgpostError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                MsgpostError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// JSON 문자열에서 설정을 파싱합니다.
    pub fn parse(json_str: &str) -> Result<Self, MsgpostError> {
        serde_json::from_str(json_str).map_err(|e| {
            MsgpostError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 설정을 JSON 파일로 저장합니다.
    ///
    /// 채팅 명령으로 webhook URL이나 언어가 바뀔 때 호출됩니다.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<(), MsgpostError> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            MsgpostError::Config(ConfigError::WriteFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })
        })?;
        tokio::fs::write(path, content).await.map_err(|e| {
            MsgpostError::Config(ConfigError::WriteFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })
        })?;
        Ok(())
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `MSGPOST_{SECTION}_{FIELD}`
    /// 예: `MSGPOST_WATCH_SERVER_LOG=/srv/mc/logs/latest.log`
    pub fn apply_env_overrides(&mut self) {
        override_string(&mut self.webhook_url, "MSGPOST_WEBHOOK_URL");
        override_lang(&mut self.lang, "MSGPOST_LANG");
        override_csv(&mut self.admins, "MSGPOST_ADMINS");

        // General
        override_string(&mut self.general.log_level, "MSGPOST_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "MSGPOST_GENERAL_LOG_FORMAT");

        // Watch
        override_string(&mut self.watch.server_log, "MSGPOST_WATCH_SERVER_LOG");
        override_u64(
            &mut self.watch.poll_interval_ms,
            "MSGPOST_WATCH_POLL_INTERVAL_MS",
        );
        override_usize(
            &mut self.watch.max_lines_per_read,
            "MSGPOST_WATCH_MAX_LINES_PER_READ",
        );
        override_usize(
            &mut self.watch.max_line_length,
            "MSGPOST_WATCH_MAX_LINE_LENGTH",
        );
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), MsgpostError> {
        const MAX_POLL_INTERVAL_MS: u64 = 60_000;

        // log_level 검증
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        // log_format 검증
        if !["json", "pretty"].contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: "must be 'json' or 'pretty'".to_owned(),
            }
            .into());
        }

        // webhook_url은 비어 있거나 http(s) endpoint여야 함
        if !self.webhook_url.is_empty()
            && !self.webhook_url.starts_with("http://")
            && !self.webhook_url.starts_with("https://")
        {
            return Err(ConfigError::InvalidValue {
                field: "webhook_url".to_owned(),
                reason: "must be empty or start with http:// or https://".to_owned(),
            }
            .into());
        }

        if self.watch.poll_interval_ms == 0 || self.watch.poll_interval_ms > MAX_POLL_INTERVAL_MS {
            return Err(ConfigError::InvalidValue {
                field: "watch.poll_interval_ms".to_owned(),
                reason: format!("must be 1-{MAX_POLL_INTERVAL_MS}"),
            }
            .into());
        }

        if self.watch.max_lines_per_read == 0 {
            return Err(ConfigError::InvalidValue {
                field: "watch.max_lines_per_read".to_owned(),
                reason: "must be greater than 0".to_owned(),
            }
            .into());
        }

        if self.watch.max_line_length == 0 {
            return Err(ConfigError::InvalidValue {
                field: "watch.max_line_length".to_owned(),
                reason: "must be greater than 0".to_owned(),
            }
            .into());
        }

        Ok(())
    }
}

/// 환경변수 값으로 String 필드를 오버라이드합니다.
fn override_string(field: &mut String, var: &str) {
    if let Ok(value) = std::env::var(var) {
        *field = value;
    }
}

/// 환경변수 값으로 u64 필드를 오버라이드합니다.
fn override_u64(field: &mut u64, var: &str) {
    if let Ok(value) = std::env::var(var) {
        match value.parse() {
            Ok(parsed) => *field = parsed,
            Err(_) => warn!(var, value, "ignoring non-numeric env override"),
        }
    }
}

/// 환경변수 값으로 usize 필드를 오버라이드합니다.
fn override_usize(field: &mut usize, var: &str) {
    if let Ok(value) = std::env::var(var) {
        match value.parse() {
            Ok(parsed) => *field = parsed,
            Err(_) => warn!(var, value, "ignoring non-numeric env override"),
        }
    }
}

/// 쉼표로 구분된 환경변수 값으로 Vec<String> 필드를 오버라이드합니다.
fn override_csv(field: &mut Vec<String>, var: &str) {
    if let Ok(value) = std::env::var(var) {
        *field = value
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .collect();
    }
}

/// 환경변수 값으로 Lang 필드를 오버라이드합니다.
fn override_lang(field: &mut Lang, var: &str) {
    if let Ok(value) = std::env::var(var) {
        match value.parse() {
            Ok(parsed) => *field = parsed,
            Err(()) => warn!(var, value, "ignoring unknown language tag"),
        }
    }
}
