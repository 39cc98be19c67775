//! 브리지 에러 타입
//!
//! [`BridgeError`]는 브리지 파이프라인 내부에서 발생하는 모든 에러를 표현합니다.
//! `From<BridgeError> for MsgpostError` 변환이 구현되어 있어
//! 상위 레이어에서 `?` 연산자로 자연스럽게 전파할 수 있습니다.

use msgpost_core::error::{MsgpostError, PipelineError};

/// 브리지 도메인 에러
///
/// 식별자 재조정, 수집, 명령 처리, 채널 통신 등 파이프라인 내부의
/// 에러 상황을 포괄합니다. 분류 실패는 에러가 아니라
/// `LogEvent::Unrecognized`로 처리되므로 여기에 없습니다.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// 식별자가 추적되지 않는 플레이어에 대한 닉네임 변경/해제
    ///
    /// 닉네임 로그 라인이 식별자 해석 라인보다 먼저 도착하는 경합에서
    /// 발생합니다. 호출 측은 해당 이벤트를 건너뛰고 테이블을 건드리지
    /// 않습니다.
    #[error("no tracked identity for player '{player}'")]
    UnknownIdentity {
        /// 계정 이름 (닉네임이 아닌 원래 이름)
        player: String,
    },

    /// 수집기 에러 (파일 I/O 등)
    #[error("collector error: {source_type}: {reason}")]
    Collector {
        /// 수집 소스 유형 (file 등)
        source_type: String,
        /// 에러 사유
        reason: String,
    },

    /// 권한 부족으로 거부된 명령
    #[error("permission denied for '{command}'")]
    PermissionDenied {
        /// 거부된 명령
        command: String,
    },

    /// 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },

    /// 채널 통신 에러
    #[error("channel error: {0}")]
    Channel(String),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<BridgeError> for MsgpostError {
    fn from(err: BridgeError) -> Self {
        MsgpostError::Pipeline(PipelineError::InitFailed(err.to_string()))
    }
}
