//! 언어 카탈로그 -- 알림/응답 메시지의 현지화 문자열
//!
//! 지원 언어는 [`Lang`]의 두 태그(ENUS, ZHTW)뿐입니다. 카탈로그는
//! 정적 데이터이며 런타임 로딩이 없습니다.

use msgpost_core::types::Lang;

/// 한 언어의 메시지 문자열 집합
#[derive(Debug)]
pub struct Catalog {
    /// 도움말 헤더
    pub help: &'static str,
    /// `!!mp url` 설명
    pub set_webhook_url: &'static str,
    /// `!!mp lang` 설명
    pub set_language: &'static str,
    /// 입장 알림 접미사
    pub join: &'static str,
    /// 퇴장 알림 접미사
    pub left: &'static str,
    /// 알 수 없는 언어 태그
    pub invalid_language: &'static str,
    /// 명령 성공
    pub done: &'static str,
    /// 권한 부족
    pub permission_denied: &'static str,
    /// 닉네임 변경 확인
    pub nickname_update: &'static str,
    /// 닉네임 해제 확인
    pub nickname_remove: &'static str,
    /// 에러 표시
    pub error: &'static str,
}

static ENUS: Catalog = Catalog {
    help: "help",
    set_webhook_url: "Set Discord webhook url",
    set_language: "Set language",
    join: "joined the game",
    left: "left the game",
    invalid_language: "Invalid language! (ZHTW, ENUS)",
    done: "Done!",
    permission_denied: "Permission denied!",
    nickname_update: "Nickname updated to",
    nickname_remove: "Nickname removed",
    error: "ERROR",
};

static ZHTW: Catalog = Catalog {
    help: "幫助",
    set_webhook_url: "設定 Discord webhook url",
    set_language: "設定語言",
    join: "加入了遊戲",
    left: "離開了遊戲",
    invalid_language: "無效的語言! (ZHTW, ENUS)",
    done: "完成!",
    permission_denied: "權限不足!",
    nickname_update: "暱稱已更新為",
    nickname_remove: "已清除暱稱",
    error: "錯誤",
};

/// 언어에 해당하는 카탈로그를 반환합니다.
pub fn catalog(lang: Lang) -> &'static Catalog {
    match lang {
        Lang::EnUs => &ENUS,
        Lang::ZhTw => &ZHTW,
    }
}
