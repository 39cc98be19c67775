//! 에러 타입 — 도메인별 에러 정의

/// msgpost 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum MsgpostError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 파이프라인 처리 에러
    #[error("pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// webhook 전송 에러
    #[error("delivery error: {0}")]
    Delivery(#[from] DeliveryError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    /// 설정 저장 실패
    #[error("failed to write config: {path}: {reason}")]
    WriteFailed { path: String, reason: String },
}

/// 파이프라인 처리 에러
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// 채널 전송 실패
    #[error("channel send failed: {0}")]
    ChannelSend(String),

    /// 채널 수신 실패
    #[error("channel receive failed: {0}")]
    ChannelRecv(String),

    /// 파이프라인 초기화 실패
    #[error("pipeline init failed: {0}")]
    InitFailed(String),

    /// 이미 실행 중인 파이프라인을 다시 시작
    #[error("pipeline already running")]
    AlreadyRunning,

    /// 실행 중이 아닌 파이프라인을 정지
    #[error("pipeline not running")]
    NotRunning,
}

/// webhook 전송 에러
///
/// 전송 실패는 로깅만 하고 재시도하지 않습니다. 테이블 상태는
/// 전송 결과와 무관하게 유지됩니다.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    /// 네트워크 수준 실패 (연결 거부, DNS 등)
    #[error("request failed: {0}")]
    Request(String),

    /// HTTP 에러 응답
    #[error("endpoint returned status {code}")]
    Status { code: u16 },

    /// 전송 타임아웃
    #[error("delivery timed out after {secs}s")]
    Timeout { secs: u64 },
}
