//! 로그 이벤트 분류기 -- 원시 로그 라인을 타입 있는 이벤트로 변환
//!
//! 게임 서버 로그는 반구조화 텍스트입니다. 분류기는 고정 부분 문자열
//! 패턴으로 소수의 이벤트(식별자 해석, 닉네임 설정/해제, 일반 채팅)를
//! 인식하고, 나머지는 전부 [`LogEvent::Unrecognized`]로 분류합니다.
//!
//! 패턴에 부분적으로만 일치하는 라인(구분자 누락 등)은 에러 없이
//! `Unrecognized`로 떨어집니다. split 결과를 검사 없이 인덱싱하는
//! 코드는 이 모듈에 존재하지 않습니다.

/// 채팅 명령 접두어 — 이 접두어로 시작하는 발화는 절대 중계되지 않습니다.
pub const COMMAND_PREFIX: &str = "!!";

/// 식별자 해석 라인의 고정 마커
const UUID_LINE_PREFIX: &str = "UUID of player";
const UUID_PLAYER_MARKER: &str = " player ";
const UUID_IS_MARKER: &str = " is ";
/// 인증 서브시스템 소스 태그 마커
const AUTH_SOURCE_MARKER: &str = "User Authenticator";

/// 닉네임 설정 라인의 고정 마커
const NICK_SET_MARKER: &str = "'s nickname to 'literal{";
const NICK_SET_PREFIX: &str = "Set ";
const NICK_SET_SUFFIX: &str = "}'.";

/// 닉네임 해제 라인의 고정 마커
const NICK_CLEAR_PREFIX: &str = "Cleared ";
const NICK_CLEAR_SUFFIX: &str = "'s nickname";

/// 퇴장 라인의 고정 마커
const LEAVE_SUFFIX: &str = " left the game";

/// 분류된 로그 이벤트
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEvent {
    /// 서버가 계정 이름과 안정 식별자의 매핑을 공개함
    IdentityResolved {
        /// 접속한 계정 이름
        original_name: String,
        /// 안정 식별자 (불투명 토큰)
        identity: String,
    },
    /// 플레이어 닉네임이 설정됨
    NicknameSet {
        /// 계정 이름
        original_name: String,
        /// 새 닉네임
        new_nickname: String,
    },
    /// 플레이어 닉네임이 해제됨
    NicknameCleared {
        /// 계정 이름
        original_name: String,
    },
    /// 접속 중인 플레이어의 일반 채팅 발화
    PlainChat {
        /// 발화자 이름
        player_name: String,
        /// 발화 내용
        text: String,
    },
    /// 인식되지 않은 라인 (무시됨)
    Unrecognized,
}

/// 프레임이 분리된 로그 라인
///
/// 서버 로그의 표준 형태 `[HH:MM:SS] [Source/LEVEL]: content`에서
/// 소스 태그와 본문을 분리한 결과입니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineFrame<'a> {
    /// 소스 태그 (스레드/서브시스템 이름). 프레임이 없으면 빈 문자열.
    pub source: &'a str,
    /// 라인 본문
    pub content: &'a str,
}

/// 원시 로그 라인을 `(source, content)`로 분리합니다.
///
/// 표준 프레임에 맞지 않는 라인은 전체를 본문으로, 소스는 빈
/// 문자열로 반환합니다 (분류는 그대로 진행됩니다).
pub fn frame(raw_line: &str) -> LineFrame<'_> {
    let unframed = LineFrame {
        source: "",
        content: raw_line,
    };

    // "[12:34:56] [Source/LEVEL]: content"
    let Some(rest) = raw_line.strip_prefix('[') else {
        return unframed;
    };
    let Some((_timestamp, rest)) = rest.split_once("] [") else {
        return unframed;
    };
    let Some((tag, content)) = rest.split_once("]: ") else {
        return unframed;
    };
    // 태그에서 로그 레벨 분리: "User Authenticator #1/INFO"
    let source = match tag.rsplit_once('/') {
        Some((source, _level)) => source,
        None => tag,
    };
    LineFrame { source, content }
}

/// 본문과 소스 태그를 로그 이벤트로 분류합니다.
///
/// 같은 입력은 항상 같은 variant를 반환합니다 (결정적).
pub fn classify(content: &str, source: &str) -> LogEvent {
    if content.is_empty() || content.starts_with(COMMAND_PREFIX) {
        return LogEvent::Unrecognized;
    }

    if source.contains(AUTH_SOURCE_MARKER) && content.starts_with(UUID_LINE_PREFIX) {
        return classify_identity_resolved(content);
    }

    if content.contains(NICK_SET_MARKER) {
        return classify_nickname_set(content);
    }

    if content.starts_with(NICK_CLEAR_PREFIX) && content.contains(NICK_CLEAR_SUFFIX) {
        return classify_nickname_cleared(content);
    }

    if let Some((player_name, text)) = chat_utterance(content) {
        if text.starts_with(COMMAND_PREFIX) {
            return LogEvent::Unrecognized;
        }
        return LogEvent::PlainChat {
            player_name: player_name.to_owned(),
            text: text.to_owned(),
        };
    }

    LogEvent::Unrecognized
}

/// "UUID of player <name> is <identity>" 라인을 분해합니다.
fn classify_identity_resolved(content: &str) -> LogEvent {
    let Some((left, identity)) = content.split_once(UUID_IS_MARKER) else {
        return LogEvent::Unrecognized;
    };
    let Some((_, original_name)) = left.split_once(UUID_PLAYER_MARKER) else {
        return LogEvent::Unrecognized;
    };
    if original_name.is_empty() || identity.is_empty() {
        return LogEvent::Unrecognized;
    }
    LogEvent::IdentityResolved {
        original_name: original_name.to_owned(),
        identity: identity.to_owned(),
    }
}

/// "Set <name>'s nickname to 'literal{<nick>}'." 라인을 분해합니다.
fn classify_nickname_set(content: &str) -> LogEvent {
    let Some((prefix, suffix)) = content.split_once(NICK_SET_MARKER) else {
        return LogEvent::Unrecognized;
    };
    let Some(original_name) = prefix.strip_prefix(NICK_SET_PREFIX) else {
        return LogEvent::Unrecognized;
    };
    let Some(new_nickname) = suffix.strip_suffix(NICK_SET_SUFFIX) else {
        return LogEvent::Unrecognized;
    };
    if original_name.is_empty() || new_nickname.is_empty() {
        return LogEvent::Unrecognized;
    }
    LogEvent::NicknameSet {
        original_name: original_name.to_owned(),
        new_nickname: new_nickname.to_owned(),
    }
}

/// "Cleared <name>'s nickname" 라인을 분해합니다.
fn classify_nickname_cleared(content: &str) -> LogEvent {
    let stripped = match content.strip_prefix(NICK_CLEAR_PREFIX) {
        Some(stripped) => stripped,
        None => return LogEvent::Unrecognized,
    };
    let Some(original_name) = stripped.strip_suffix(NICK_CLEAR_SUFFIX) else {
        return LogEvent::Unrecognized;
    };
    if original_name.is_empty() {
        return LogEvent::Unrecognized;
    }
    LogEvent::NicknameCleared {
        original_name: original_name.to_owned(),
    }
}

/// 채팅 발화 `<name> text`를 분해합니다.
///
/// 명령 접두어 필터링은 호출 측 책임입니다 ([`classify`]는
/// `Unrecognized`로, 파이프라인은 명령 처리로 라우팅합니다).
pub fn chat_utterance(content: &str) -> Option<(&str, &str)> {
    let rest = content.strip_prefix('<')?;
    let (player_name, text) = rest.split_once("> ")?;
    if player_name.is_empty() || player_name.contains(' ') || text.is_empty() {
        return None;
    }
    Some((player_name, text))
}

/// 퇴장 신호 `<name> left the game`에서 플레이어 이름을 추출합니다.
///
/// 퇴장은 로그 이벤트가 아니라 호스트 수준 신호로 취급되어
/// 분류기를 거치지 않고 재조정기의 제거 경로로 직접 전달됩니다.
pub fn leave_signal(content: &str) -> Option<&str> {
    let name = content.strip_suffix(LEAVE_SUFFIX)?;
    if name.is_empty() || name.contains(' ') {
        return None;
    }
    Some(name)
}
