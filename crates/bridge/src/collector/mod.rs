//! 로그 수집 모듈 -- 게임 서버 로그에서 원시 라인을 수집합니다.
//!
//! 수집기는 자체 tokio 태스크에서 실행되며, 수집된 라인을
//! `tokio::mpsc::Sender<RawLine>` 채널로 파이프라인에 전달합니다.
//! 원 구현은 호스트 콜백으로 라인을 받았지만, 독립 실행 데몬은
//! [`FileCollector`]가 서버 로그 파일을 tail 방식으로 따라갑니다.

pub mod file;

pub use file::{FileCollector, FileCollectorConfig};

/// 수집된 원시 로그 라인
///
/// 수집기가 생성하고 분류기가 소비하는 중간 데이터 형식입니다.
#[derive(Debug, Clone)]
pub struct RawLine {
    /// 라인 텍스트 (개행 제거됨)
    pub line: String,
    /// 수집 소스 식별자 (예: "file:logs/latest.log")
    pub source: String,
    /// 수집 시각
    pub received_at: std::time::SystemTime,
}

impl RawLine {
    /// 새 RawLine을 생성합니다.
    pub fn new(line: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            line: line.into(),
            source: source.into(),
            received_at: std::time::SystemTime::now(),
        }
    }
}
